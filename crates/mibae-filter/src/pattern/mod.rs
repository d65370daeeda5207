//! Patterns and their rendered tiles.
//!
//! A [`Pattern`] names a tone, a color pair and a phase. Rendering it yields a
//! [`PatternTile`], which [`PatternCache`] keeps for the life of the cache.

mod cache;

pub use cache::PatternCache;

use crate::color::{Rgb, Rgba};
use crate::tone::{Tone, ToneId, PERIOD, TILE_AREA};

/// A tone drawn in two colors at a given phase.
///
/// Offsets are always reduced into `0..PERIOD`, so two patterns that render
/// the same tile also compare and hash equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pattern {
    tone: ToneId,
    background: Rgb,
    foreground: Rgb,
    offset_y: u8,
    offset_x: u8,
}

impl Pattern {
    /// Create a pattern. Offsets are taken modulo [`PERIOD`].
    pub fn new(
        tone: ToneId,
        background: Rgb,
        foreground: Rgb,
        offset_y: usize,
        offset_x: usize,
    ) -> Self {
        Self {
            tone,
            background,
            foreground,
            offset_y: (offset_y % PERIOD) as u8,
            offset_x: (offset_x % PERIOD) as u8,
        }
    }

    /// Same tone and phase, different colors.
    #[inline]
    pub fn with_colors(self, background: Rgb, foreground: Rgb) -> Self {
        Self {
            background,
            foreground,
            ..self
        }
    }

    #[inline]
    pub fn tone(&self) -> ToneId {
        self.tone
    }

    #[inline]
    pub fn background(&self) -> Rgb {
        self.background
    }

    #[inline]
    pub fn foreground(&self) -> Rgb {
        self.foreground
    }

    /// Phase as `(offset_y, offset_x)`.
    #[inline]
    pub fn offset(&self) -> (usize, usize) {
        (self.offset_y as usize, self.offset_x as usize)
    }
}

/// One fully opaque `PERIOD x PERIOD` rendering of a [`Pattern`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternTile {
    pixels: [Rgba; TILE_AREA],
}

impl PatternTile {
    /// Render `pattern` using the bitmap of `tone`.
    ///
    /// Pixel `(x, y)` is the foreground color where the tone is set at
    /// `(x + offset_x, y + offset_y)` and the background color elsewhere.
    pub fn render(tone: &Tone, pattern: &Pattern) -> Self {
        let (offset_y, offset_x) = pattern.offset();
        let bg = Rgba::opaque(pattern.background);
        let fg = Rgba::opaque(pattern.foreground);

        let mut pixels = [bg; TILE_AREA];
        for y in 0..PERIOD {
            for x in 0..PERIOD {
                if tone.is_foreground(x + offset_x, y + offset_y) {
                    pixels[y * PERIOD + x] = fg;
                }
            }
        }
        Self { pixels }
    }

    /// Pixel at `(x, y)`, both in `0..PERIOD`.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Rgba {
        self.pixels[y * PERIOD + x]
    }

    /// The pixel that lands on the cell a window is centered on.
    #[inline]
    pub fn center(&self) -> Rgba {
        self.get(PERIOD / 2, PERIOD / 2)
    }

    /// All pixels, row-major.
    #[inline]
    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tone::ToneLibrary;

    #[test]
    fn test_offsets_wrap() {
        let lib = ToneLibrary::builtin();
        let id = lib.find("checker").unwrap();
        let a = Pattern::new(id, Rgb::WHITE, Rgb::BLACK, 3, 9);
        let b = Pattern::new(id, Rgb::WHITE, Rgb::BLACK, 3 + PERIOD, 1);
        assert_eq!(a, b);
        assert_eq!(a.offset(), (3, 1));
    }

    #[test]
    fn test_render_follows_bitmap() {
        let lib = ToneLibrary::builtin();
        let id = lib.find("hline").unwrap();
        let tone = lib.get(id).unwrap();
        let pattern = Pattern::new(id, Rgb::WHITE, Rgb::BLACK, 0, 0);
        let tile = PatternTile::render(tone, &pattern);

        for x in 0..PERIOD {
            assert_eq!(tile.get(x, 0), Rgba::opaque(Rgb::BLACK));
            assert_eq!(tile.get(x, 1), Rgba::opaque(Rgb::WHITE));
        }
        assert!(tile.pixels().iter().all(|p| p.is_opaque()));
    }

    #[test]
    fn test_render_applies_phase() {
        let lib = ToneLibrary::builtin();
        let id = lib.find("hline").unwrap();
        let tone = lib.get(id).unwrap();
        let shifted = Pattern::new(id, Rgb::WHITE, Rgb::BLACK, 1, 0);
        let tile = PatternTile::render(tone, &shifted);

        // Row 0 of the tile is row 1 of the tone.
        assert_eq!(tile.get(0, 0), Rgba::opaque(Rgb::WHITE));
        assert_eq!(tile.get(0, 1), Rgba::opaque(Rgb::BLACK));
    }

    #[test]
    fn test_center_pixel() {
        let lib = ToneLibrary::builtin();
        let id = lib.find("solid").unwrap();
        let tone = lib.get(id).unwrap();
        let pattern = Pattern::new(id, Rgb::WHITE, Rgb::gray(40), 0, 0);
        let tile = PatternTile::render(tone, &pattern);
        assert_eq!(tile.center(), Rgba::opaque(Rgb::gray(40)));
    }
}
