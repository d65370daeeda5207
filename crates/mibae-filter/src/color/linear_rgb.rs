//! Linear RGB color type
//!
//! Light adds linearly only in this space, so pixel averaging during
//! downsampling happens here.

use super::lut::{linear_to_srgb, srgb8_to_linear};
use super::rgb::Rgb;

/// A color in linear RGB color space.
///
/// Values are typically in the range 0.0..=1.0.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LinearRgb {
    /// Red channel (linear light intensity)
    pub r: f32,
    /// Green channel (linear light intensity)
    pub g: f32,
    /// Blue channel (linear light intensity)
    pub b: f32,
}

impl LinearRgb {
    /// Create a new LinearRgb color from linear RGB values.
    #[inline]
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Encode back to 8-bit sRGB, rounding and clamping each channel.
    #[inline]
    pub fn to_rgb(self) -> Rgb {
        let encode = |v: f32| (linear_to_srgb(v) * 255.0).round().clamp(0.0, 255.0) as u8;
        Rgb::new(encode(self.r), encode(self.g), encode(self.b))
    }
}

impl From<Rgb> for LinearRgb {
    fn from(rgb: Rgb) -> Self {
        Self {
            r: srgb8_to_linear(rgb.r),
            g: srgb8_to_linear(rgb.g),
            b: srgb8_to_linear(rgb.b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_gamma_values() {
        // sRGB 128 -> linear ~0.2158
        let mid = LinearRgb::from(Rgb::new(128, 128, 128));
        assert!((mid.r - 0.2158).abs() < 0.001, "got {}", mid.r);

        // linear 0.5 -> sRGB ~188
        let back = LinearRgb::new(0.5, 0.5, 0.5).to_rgb();
        assert_eq!(back, Rgb::new(188, 188, 188));
    }

    #[test]
    fn test_round_trip_extremes() {
        for rgb in [Rgb::new(0, 0, 0), Rgb::new(255, 255, 255), Rgb::new(255, 0, 10)] {
            assert_eq!(LinearRgb::from(rgb).to_rgb(), rgb);
        }
    }
}
