//! 8-bit sRGB color and pixel types
//!
//! [`Rgb`] is the color currency of the filter: palettes hold it, patterns
//! are keyed by it and the distance cache memoizes over pairs of it.

use std::str::FromStr;

use crate::palette::ParseColorError;

/// Luma weight of the red channel (Rec. 601).
pub const LUMA_R: f32 = 0.299;
/// Luma weight of the green channel (Rec. 601).
pub const LUMA_G: f32 = 0.587;
/// Luma weight of the blue channel (Rec. 601).
pub const LUMA_B: f32 = 0.114;

/// An 8-bit sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Rgb {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

impl Rgb {
    /// Pure black.
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    /// Pure white.
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    /// Create a color from its channels.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create a gray with all three channels set to `v`.
    #[inline]
    pub const fn gray(v: u8) -> Self {
        Self::new(v, v, v)
    }

    /// Create a color from a byte array [R, G, B].
    #[inline]
    pub fn from_bytes(bytes: [u8; 3]) -> Self {
        Self::new(bytes[0], bytes[1], bytes[2])
    }

    /// Convert to a byte array [R, G, B].
    #[inline]
    pub fn to_bytes(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Attach an alpha channel.
    #[inline]
    pub fn with_alpha(self, a: u8) -> Rgba {
        Rgba::new(self.r, self.g, self.b, a)
    }

    /// Fixed-weight luma (0.0..=255.0).
    #[inline]
    pub fn luma(self) -> f32 {
        LUMA_R * self.r as f32 + LUMA_G * self.g as f32 + LUMA_B * self.b as f32
    }

    /// Convert HSL to RGB.
    ///
    /// `hue` is in degrees (wrapped into 0..360), `saturation` and
    /// `lightness` in 0.0..=1.0.
    pub fn from_hsl(hue: f32, saturation: f32, lightness: f32) -> Self {
        let h = hue.rem_euclid(360.0) / 60.0;
        let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
        let x = c * (1.0 - (h % 2.0 - 1.0).abs());
        let m = lightness - c / 2.0;

        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };

        let encode = |v: f32| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        Self::new(encode(r), encode(g), encode(b))
    }

    fn parse_hex(s: &str) -> Result<Self, ParseColorError> {
        let s = s.strip_prefix('#').unwrap_or(s);
        if !s.is_ascii() {
            return Err(ParseColorError::InvalidLength);
        }

        match s.len() {
            3 => {
                // Shorthand: expand each digit by multiplying by 17 (0xF -> 0xFF)
                let r = u8::from_str_radix(&s[0..1], 16)? * 17;
                let g = u8::from_str_radix(&s[1..2], 16)? * 17;
                let b = u8::from_str_radix(&s[2..3], 16)? * 17;
                Ok(Self::new(r, g, b))
            }
            6 => {
                let r = u8::from_str_radix(&s[0..2], 16)?;
                let g = u8::from_str_radix(&s[2..4], 16)?;
                let b = u8::from_str_radix(&s[4..6], 16)?;
                Ok(Self::new(r, g, b))
            }
            _ => Err(ParseColorError::InvalidLength),
        }
    }

    fn parse_hsl(body: &str) -> Result<Self, ParseColorError> {
        let invalid = || ParseColorError::InvalidHsl(body.to_string());

        let parts: Vec<&str> = body
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|p| !p.is_empty())
            .collect();
        let [hue, saturation, lightness] = parts.as_slice() else {
            return Err(invalid());
        };

        let hue: f32 = hue
            .trim_end_matches("deg")
            .parse()
            .map_err(|_| invalid())?;
        let percent = |p: &str| -> Result<f32, ParseColorError> {
            let v: f32 = p.trim_end_matches('%').parse().map_err(|_| invalid())?;
            if !(0.0..=100.0).contains(&v) {
                return Err(invalid());
            }
            Ok(v / 100.0)
        };

        Ok(Self::from_hsl(hue, percent(saturation)?, percent(lightness)?))
    }
}

impl FromStr for Rgb {
    type Err = ParseColorError;

    /// Parse a color string.
    ///
    /// Supports `#RRGGBB`, `RRGGBB`, `#RGB`, `RGB` and `hsl(h, s%, l%)`.
    /// Parsing is case-insensitive. Leading and trailing whitespace is trimmed.
    ///
    /// # Examples
    ///
    /// ```
    /// use mibae_filter::Rgb;
    ///
    /// let red: Rgb = "#F00".parse().unwrap();
    /// assert_eq!(red, Rgb::new(255, 0, 0));
    ///
    /// let green: Rgb = "hsl(120, 100%, 50%)".parse().unwrap();
    /// assert_eq!(green, Rgb::new(0, 255, 0));
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let lower = s.to_ascii_lowercase();

        if let Some(rest) = lower.strip_prefix("hsl(") {
            let body = rest
                .strip_suffix(')')
                .ok_or_else(|| ParseColorError::InvalidHsl(s.to_string()))?;
            return Self::parse_hsl(body);
        }

        Self::parse_hex(s)
    }
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// An 8-bit sRGB pixel with alpha.
///
/// Only fully opaque pixels (`a == 255`) take part in pattern matching;
/// anything else counts as "outside the canvas".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgba {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
    /// Alpha channel
    pub a: u8,
}

impl Rgba {
    /// Fully transparent black.
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);

    /// Create a pixel from its channels.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create a fully opaque pixel.
    #[inline]
    pub const fn opaque(rgb: Rgb) -> Self {
        Self::new(rgb.r, rgb.g, rgb.b, 255)
    }

    /// Whether the pixel is fully opaque.
    #[inline]
    pub fn is_opaque(self) -> bool {
        self.a == 255
    }

    /// The color channels without alpha.
    #[inline]
    pub fn rgb(self) -> Rgb {
        Rgb::new(self.r, self.g, self.b)
    }

    /// Create a pixel from a byte array [R, G, B, A].
    #[inline]
    pub fn from_bytes(bytes: [u8; 4]) -> Self {
        Self::new(bytes[0], bytes[1], bytes[2], bytes[3])
    }

    /// Convert to a byte array [R, G, B, A].
    #[inline]
    pub fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}
