//! Error types for palette operations

use std::num::ParseIntError;

use thiserror::Error;

use crate::color::Rgb;

/// Error type for parsing color strings.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseColorError {
    /// Hex string has invalid length (must be 3 or 6 characters after stripping '#')
    #[error("invalid hex color length (expected 3 or 6 characters)")]
    InvalidLength,
    /// Invalid hexadecimal character encountered
    #[error("invalid hex character: {0}")]
    InvalidHex(#[from] ParseIntError),
    /// Malformed `hsl(h, s%, l%)` expression
    #[error("invalid hsl color: {0}")]
    InvalidHsl(String),
}

/// Error type for palette validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PaletteError {
    /// No tiers provided
    #[error("palette cannot be empty")]
    EmptyPalette,
    /// A tier without colors
    #[error("palette tier {tier} has no colors")]
    EmptyTier {
        /// Index of the empty tier
        tier: usize,
    },
    /// The same color listed in two tiers
    #[error("color {color} appears in both tier {first} and tier {second}")]
    DuplicateColor {
        /// The repeated color
        color: Rgb,
        /// Earlier tier holding it
        first: usize,
        /// Later tier holding it
        second: usize,
    },
    /// Invalid color string
    #[error("invalid color in tier {tier}: {source}")]
    ParseColor {
        /// Tier holding the bad color
        tier: usize,
        /// Underlying parse failure
        source: ParseColorError,
    },
}
