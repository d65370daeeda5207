//! Unified error type for the mibae-filter public API.
//!
//! [`FilterError`] wraps the palette and color parsing errors together with
//! configuration and buffer errors, so application code can `?` everything
//! through one type.

use thiserror::Error;

use crate::palette::{PaletteError, ParseColorError};

/// Unified error type for the mibae-filter public API.
///
/// Degenerate input (flat or fully transparent windows) is not an error;
/// the filter handles those with fallbacks.
///
/// # Example
///
/// ```
/// use mibae_filter::{FilterError, Palette};
///
/// fn create_palette() -> Result<Palette, FilterError> {
///     let palette = Palette::from_strs(&[vec!["#ffffff"], vec!["#cccccc"]])?;
///     Ok(palette)
/// }
/// # assert!(create_palette().is_ok());
/// ```
#[derive(Debug, Error)]
pub enum FilterError {
    /// Tone name or id not present in the tone library
    #[error("unknown tone: {0}")]
    UnknownTone(String),
    /// Malformed custom tone definition
    #[error("invalid tone '{name}': {reason}")]
    InvalidTone {
        /// Name of the offending tone
        name: String,
        /// What is wrong with it
        reason: String,
    },
    /// Pattern search called without candidates
    #[error("pattern search needs at least one candidate")]
    EmptyCandidates,
    /// Palette validation error
    #[error("palette error: {0}")]
    Palette(#[from] PaletteError),
    /// Color parsing error
    #[error("color parse error: {0}")]
    ParseColor(#[from] ParseColorError),
    /// Filter option outside its valid range
    #[error("invalid option {option}: {reason}")]
    InvalidOption {
        /// Option name
        option: &'static str,
        /// Why the value was rejected
        reason: String,
    },
    /// Pixel buffer length does not match its dimensions
    #[error("buffer of {actual} pixels does not match {width}x{height}")]
    BufferSize {
        /// Declared width
        width: usize,
        /// Declared height
        height: usize,
        /// Actual pixel count
        actual: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_palette_error() {
        let err: FilterError = PaletteError::EmptyPalette.into();
        assert!(matches!(err, FilterError::Palette(PaletteError::EmptyPalette)));
        assert_eq!(err.to_string(), "palette error: palette cannot be empty");
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(
            FilterError::UnknownTone("zigzag".to_string()).to_string(),
            "unknown tone: zigzag"
        );
        assert_eq!(
            FilterError::BufferSize {
                width: 4,
                height: 4,
                actual: 15
            }
            .to_string(),
            "buffer of 15 pixels does not match 4x4"
        );
    }
}
