//! Gamma lookup table access functions
//!
//! Tables are generated at compile time by build.rs.

include!(concat!(env!("OUT_DIR"), "/gamma_lut.rs"));

/// Convert an 8-bit sRGB channel to linear light. Exact, no interpolation.
#[inline]
pub fn srgb8_to_linear(value: u8) -> f32 {
    SRGB8_TO_LINEAR[value as usize]
}

/// Convert a linear RGB value (0.0..=1.0) to sRGB using LUT with linear interpolation.
///
/// Out-of-range input is clamped.
#[inline]
pub fn linear_to_srgb(linear: f32) -> f32 {
    let linear = linear.clamp(0.0, 1.0);

    let scaled = linear * 4095.0;
    let index = scaled as usize;

    if index >= 4095 {
        return LINEAR_TO_SRGB[4095];
    }

    let frac = scaled - index as f32;
    let a = LINEAR_TO_SRGB[index];
    let b = LINEAR_TO_SRGB[index + 1];
    a + (b - a) * frac
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries() {
        assert!(srgb8_to_linear(0).abs() < 1e-6);
        assert!((srgb8_to_linear(255) - 1.0).abs() < 1e-6);
        assert!(linear_to_srgb(0.0).abs() < 1e-6);
        assert!((linear_to_srgb(1.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_byte_round_trip() {
        for i in 0..=255u8 {
            let back = (linear_to_srgb(srgb8_to_linear(i)) * 255.0).round() as i32;
            assert!(
                (back - i as i32).abs() <= 1,
                "round trip of {i} came back as {back}"
            );
        }
    }

    #[test]
    fn test_monotonicity() {
        let mut prev = srgb8_to_linear(0);
        for i in 1..=255u8 {
            let curr = srgb8_to_linear(i);
            assert!(curr > prev, "srgb8_to_linear not increasing at {i}");
            prev = curr;
        }
    }
}
