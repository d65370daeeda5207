//! Dithering options and configuration.

use std::fmt;
use std::str::FromStr;

use super::kernel::{Kernel, ATKINSON, FLOYD_STEINBERG, SIERRA_LITE};
use crate::api::FilterError;

/// Error diffusion kernel selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DitherAlgorithm {
    /// Classic 7/3/5/1 kernel.
    #[default]
    FloydSteinberg,
    /// 6/8 propagation, crisper with small palettes.
    Atkinson,
    /// Three-neighbor 2/1/1 kernel.
    SierraLite,
    /// No diffusion; every cell is matched on its own.
    None,
}

impl DitherAlgorithm {
    /// The diffusion kernel, or `None` when diffusion is off.
    pub fn kernel(self) -> Option<Kernel> {
        match self {
            DitherAlgorithm::FloydSteinberg => Some(FLOYD_STEINBERG),
            DitherAlgorithm::Atkinson => Some(ATKINSON),
            DitherAlgorithm::SierraLite => Some(SIERRA_LITE),
            DitherAlgorithm::None => None,
        }
    }

    /// Configuration name of the algorithm.
    pub fn name(self) -> &'static str {
        match self {
            DitherAlgorithm::FloydSteinberg => "floyd-steinberg",
            DitherAlgorithm::Atkinson => "atkinson",
            DitherAlgorithm::SierraLite => "sierra-lite",
            DitherAlgorithm::None => "none",
        }
    }
}

impl FromStr for DitherAlgorithm {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "floyd-steinberg" | "fs" => Ok(DitherAlgorithm::FloydSteinberg),
            "atkinson" => Ok(DitherAlgorithm::Atkinson),
            "sierra-lite" => Ok(DitherAlgorithm::SierraLite),
            "none" | "off" => Ok(DitherAlgorithm::None),
            other => Err(FilterError::InvalidOption {
                option: "dither",
                reason: format!("unknown algorithm '{other}'"),
            }),
        }
    }
}

impl fmt::Display for DitherAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Configuration options for error diffusion.
///
/// # Defaults
///
/// - Algorithm: Floyd-Steinberg
/// - Intensity: 0.8 (each kernel weight is scaled by this factor)
///
/// # Example
///
/// ```
/// use mibae_filter::{DitherAlgorithm, DitherOptions};
///
/// let options = DitherOptions::new()
///     .algorithm(DitherAlgorithm::Atkinson)
///     .intensity(0.5);
/// assert!(options.validate().is_ok());
/// assert!(DitherOptions::new().intensity(1.5).validate().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DitherOptions {
    /// Kernel used to spread error.
    ///
    /// Default: [`DitherAlgorithm::FloydSteinberg`]
    pub algorithm: DitherAlgorithm,

    /// Scale applied to every kernel weight, in `[0, 1]`.
    ///
    /// Default: `0.8`
    pub intensity: f32,
}

impl Default for DitherOptions {
    fn default() -> Self {
        Self {
            algorithm: DitherAlgorithm::FloydSteinberg,
            intensity: 0.8,
        }
    }
}

impl DitherOptions {
    /// Create new dither options with default values.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the diffusion kernel.
    #[inline]
    pub fn algorithm(mut self, algorithm: DitherAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Set the diffusion intensity.
    #[inline]
    pub fn intensity(mut self, intensity: f32) -> Self {
        self.intensity = intensity;
        self
    }

    /// Check that the intensity lies in `[0, 1]`.
    ///
    /// # Errors
    ///
    /// [`FilterError::InvalidOption`] for NaN or out-of-range intensity.
    pub fn validate(&self) -> Result<(), FilterError> {
        if !(0.0..=1.0).contains(&self.intensity) {
            return Err(FilterError::InvalidOption {
                option: "intensity",
                reason: format!("{} is outside [0, 1]", self.intensity),
            });
        }
        Ok(())
    }
}
