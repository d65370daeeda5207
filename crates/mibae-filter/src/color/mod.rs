//! Color types and conversion utilities
//!
//! Pixels travel through the filter as 8-bit [`Rgb`] / [`Rgba`] values; the
//! float color spaces exist only for distance math and resampling.
//!
//! # Color Spaces
//!
//! - **Rgb / Rgba**: 8-bit sRGB, hashable, used for buffers, palettes and cache keys.
//! - **LinearRgb**: Linear light intensity. Used when averaging pixels.
//! - **Lab**: CIE L\*a\*b\* (D65). Used by the perceptual distance metric.
//!
//! # Example
//!
//! ```
//! use mibae_filter::{Lab, LinearRgb, Rgb};
//!
//! let color: Rgb = "#808080".parse().unwrap();
//! let linear = LinearRgb::from(color);
//! let lab = Lab::from(linear);
//! assert!(lab.a.abs() < 0.01);
//! ```

mod lab;
mod linear_rgb;
mod lut;
mod rgb;

pub use lab::Lab;
pub use linear_rgb::LinearRgb;
pub use rgb::{Rgb, Rgba};
