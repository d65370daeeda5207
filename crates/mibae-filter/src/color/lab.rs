//! CIE L\*a\*b\* color space (D65 white point)
//!
//! Used by the perceptual distance metric. ΔE\*76 is plain Euclidean
//! distance in this space.

use super::linear_rgb::LinearRgb;

/// D65 reference white, X component.
const X_N: f32 = 0.950_47;
/// D65 reference white, Z component (Y_N is 1.0).
const Z_N: f32 = 1.088_83;

/// (6/29)^3
const EPSILON: f32 = 216.0 / 24389.0;
/// 1 / (3 * (6/29)^2)
const KAPPA_INV: f32 = 841.0 / 108.0;

/// Linear sRGB to XYZ (D65).
const RGB_TO_XYZ: [[f32; 3]; 3] = [
    [0.412_456_4, 0.357_576_1, 0.180_437_5],
    [0.212_672_9, 0.715_152_2, 0.072_175_0],
    [0.019_333_9, 0.119_192_0, 0.950_304_1],
];

#[inline]
fn lab_f(t: f32) -> f32 {
    if t > EPSILON {
        t.cbrt()
    } else {
        KAPPA_INV * t + 16.0 / 116.0
    }
}

/// A color in CIE L\*a\*b\*.
///
/// - `l`: Lightness, 0.0 (black) to 100.0 (white)
/// - `a`: Green-red axis, roughly -128..127
/// - `b`: Blue-yellow axis, roughly -128..127
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lab {
    /// Lightness
    pub l: f32,
    /// Green-red axis
    pub a: f32,
    /// Blue-yellow axis
    pub b: f32,
}

impl Lab {
    /// Create a new Lab color.
    #[inline]
    pub fn new(l: f32, a: f32, b: f32) -> Self {
        Self { l, a, b }
    }

    /// CIE76 color difference (ΔE\*ab): Euclidean distance in Lab.
    ///
    /// ```
    /// use mibae_filter::Lab;
    ///
    /// let white = Lab::new(100.0, 0.0, 0.0);
    /// let black = Lab::new(0.0, 0.0, 0.0);
    /// assert!((white.delta_e(black) - 100.0).abs() < 1e-4);
    /// ```
    #[inline]
    pub fn delta_e(self, other: Lab) -> f32 {
        let dl = self.l - other.l;
        let da = self.a - other.a;
        let db = self.b - other.b;
        (dl * dl + da * da + db * db).sqrt()
    }
}

impl From<LinearRgb> for Lab {
    fn from(rgb: LinearRgb) -> Self {
        let x = (RGB_TO_XYZ[0][0] * rgb.r + RGB_TO_XYZ[0][1] * rgb.g + RGB_TO_XYZ[0][2] * rgb.b)
            / X_N;
        let y = RGB_TO_XYZ[1][0] * rgb.r + RGB_TO_XYZ[1][1] * rgb.g + RGB_TO_XYZ[1][2] * rgb.b;
        let z = (RGB_TO_XYZ[2][0] * rgb.r + RGB_TO_XYZ[2][1] * rgb.g + RGB_TO_XYZ[2][2] * rgb.b)
            / Z_N;

        let fx = lab_f(x);
        let fy = lab_f(y);
        let fz = lab_f(z);

        Lab {
            l: 116.0 * fy - 16.0,
            a: 500.0 * (fx - fy),
            b: 200.0 * (fy - fz),
        }
    }
}
