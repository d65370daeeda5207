//! Tiered palette storage.
//!
//! Colors are grouped into lightness tiers so the quantizer can resolve a
//! color in two short searches (tier, then color within the tier) instead
//! of one joint search over every color.

use std::collections::HashMap;

use super::error::PaletteError;
use crate::color::Rgb;

/// An ordered set of color tiers.
///
/// Invariants enforced at construction: at least one tier, every tier
/// holds at least one color, and no color sits in two tiers. The first color of each tier is its
/// representative during the tier search; the first color of tier 0 is the
/// palette's anchor.
///
/// # Example
///
/// ```
/// use mibae_filter::{Palette, Rgb};
///
/// let palette = Palette::from_strs(&[
///     vec!["#ffffff", "#fff8e7"],
///     vec!["hsl(0, 0%, 50%)"],
/// ]).unwrap();
///
/// assert_eq!(palette.tier_count(), 2);
/// assert_eq!(palette.anchor(), Rgb::WHITE);
/// assert_eq!(palette.representative(1), Some(Rgb::gray(128)));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    tiers: Vec<Vec<Rgb>>,
}

impl Palette {
    /// Create a palette from already-parsed tiers.
    ///
    /// # Errors
    ///
    /// - [`PaletteError::EmptyPalette`] if `tiers` is empty
    /// - [`PaletteError::EmptyTier`] if any tier is empty
    /// - [`PaletteError::DuplicateColor`] if a color appears in two tiers
    pub fn new(tiers: Vec<Vec<Rgb>>) -> Result<Self, PaletteError> {
        if tiers.is_empty() {
            return Err(PaletteError::EmptyPalette);
        }
        if let Some(tier) = tiers.iter().position(|t| t.is_empty()) {
            return Err(PaletteError::EmptyTier { tier });
        }

        let mut seen: HashMap<Rgb, usize> = HashMap::new();
        for (tier, colors) in tiers.iter().enumerate() {
            for &color in colors {
                match seen.get(&color) {
                    Some(&first) if first != tier => {
                        return Err(PaletteError::DuplicateColor {
                            color,
                            first,
                            second: tier,
                        });
                    }
                    Some(_) => {}
                    None => {
                        seen.insert(color, tier);
                    }
                }
            }
        }
        Ok(Self { tiers })
    }

    /// Create a palette from color strings (hex or `hsl(...)`).
    ///
    /// # Errors
    ///
    /// Returns [`PaletteError::ParseColor`] naming the tier of the first
    /// unparseable color, or any error from [`Palette::new`].
    pub fn from_strs<S: AsRef<str>>(tiers: &[Vec<S>]) -> Result<Self, PaletteError> {
        let parsed = tiers
            .iter()
            .enumerate()
            .map(|(tier, colors)| {
                colors
                    .iter()
                    .map(|c| {
                        c.as_ref()
                            .parse::<Rgb>()
                            .map_err(|source| PaletteError::ParseColor { tier, source })
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(parsed)
    }

    /// Number of tiers.
    #[inline]
    pub fn tier_count(&self) -> usize {
        self.tiers.len()
    }

    /// Total number of colors across all tiers.
    pub fn len(&self) -> usize {
        self.tiers.iter().map(Vec::len).sum()
    }

    /// Always false; construction rejects empty palettes.
    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    /// Colors of one tier.
    #[inline]
    pub fn tier(&self, tier: usize) -> Option<&[Rgb]> {
        self.tiers.get(tier).map(Vec::as_slice)
    }

    /// Iterate over all tiers in order.
    pub fn tiers(&self) -> impl Iterator<Item = &[Rgb]> {
        self.tiers.iter().map(Vec::as_slice)
    }

    /// First color of a tier.
    #[inline]
    pub fn representative(&self, tier: usize) -> Option<Rgb> {
        self.tiers.get(tier).and_then(|t| t.first().copied())
    }

    /// First color of tier 0.
    #[inline]
    pub fn anchor(&self) -> Rgb {
        // Construction guarantees a non-empty tier 0.
        self.tiers[0][0]
    }
}

/// The two palette families used by the quantizer.
///
/// Background colors come from the light family, foreground colors from
/// the dark family. Their anchors are the fixed colors used while the tone
/// is being chosen.
#[derive(Debug, Clone, PartialEq)]
pub struct PaletteSet {
    /// Light family: paper tones.
    pub background: Palette,
    /// Dark family: ink tones.
    pub foreground: Palette,
}

impl PaletteSet {
    /// Pair a background and a foreground palette.
    pub fn new(background: Palette, foreground: Palette) -> Self {
        Self {
            background,
            foreground,
        }
    }

    /// Anchor background color (light family, tier 0).
    #[inline]
    pub fn background_anchor(&self) -> Rgb {
        self.background.anchor()
    }

    /// Anchor foreground color (dark family, tier 0).
    #[inline]
    pub fn foreground_anchor(&self) -> Rgb {
        self.foreground.anchor()
    }

    /// The built-in sketchbook palette: warm paper tones over graphite and
    /// colored inks.
    pub fn sketchbook() -> Self {
        // Literal tiers below are all non-empty.
        let background = Palette {
            tiers: vec![
                vec![Rgb::new(0xff, 0xff, 0xff), Rgb::new(0xff, 0xf8, 0xe7)],
                vec![
                    Rgb::new(0xe6, 0xe6, 0xe6),
                    Rgb::new(0xf2, 0xe0, 0xd0),
                    Rgb::new(0xdd, 0xe8, 0xf0),
                ],
                vec![
                    Rgb::new(0xb8, 0xb8, 0xb8),
                    Rgb::new(0xd8, 0xb4, 0xa0),
                    Rgb::new(0xa8, 0xc0, 0xd8),
                ],
                vec![
                    Rgb::new(0x80, 0x80, 0x80),
                    Rgb::new(0xb0, 0x78, 0x50),
                    Rgb::new(0x60, 0x80, 0xa8),
                ],
            ],
        };
        let foreground = Palette {
            tiers: vec![
                vec![Rgb::new(0x00, 0x00, 0x00), Rgb::new(0x1a, 0x1a, 0x2e)],
                vec![
                    Rgb::new(0x3c, 0x3c, 0x3c),
                    Rgb::new(0x5a, 0x2e, 0x1e),
                    Rgb::new(0x1e, 0x3a, 0x5a),
                ],
                vec![
                    Rgb::new(0x70, 0x70, 0x70),
                    Rgb::new(0xa0, 0x3c, 0x28),
                    Rgb::new(0x28, 0x60, 0xa0),
                ],
                vec![
                    Rgb::new(0xd0, 0x40, 0x40),
                    Rgb::new(0x40, 0xa0, 0x40),
                    Rgb::new(0x40, 0x60, 0xd0),
                ],
            ],
        };

        Self::new(background, foreground)
    }
}

impl Default for PaletteSet {
    fn default() -> Self {
        Self::sketchbook()
    }
}
