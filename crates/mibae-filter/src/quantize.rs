//! Per-cell pattern selection.
//!
//! A cell's pattern is resolved in sequence instead of jointly:
//!
//! 1. tone, with both colors pinned to the palette anchors, against the
//!    contrast-normalized window;
//! 2. background tier (by representative), then background color within it;
//! 3. foreground tier, then foreground color within it.
//!
//! Steps 2 and 3 match against the raw window. Each search sees the results
//! of the previous ones. This is a greedy approximation: the tier whose
//! representative wins is not always the tier holding the best color.

use crate::api::FilterError;
use crate::color::Rgb;
use crate::distance::ColorDistance;
use crate::palette::{Palette, PaletteSet};
use crate::pattern::{Pattern, PatternCache};
use crate::pipeline::normalize_window;
use crate::search::{best_index, Window};
use crate::tone::ToneId;

/// Chooses one [`Pattern`] per cell.
pub struct Quantizer<'a> {
    palettes: &'a PaletteSet,
    tones: &'a [ToneId],
    tiles: &'a PatternCache,
    distance: &'a dyn ColorDistance,
}

impl<'a> Quantizer<'a> {
    pub fn new(
        palettes: &'a PaletteSet,
        tones: &'a [ToneId],
        tiles: &'a PatternCache,
        distance: &'a dyn ColorDistance,
    ) -> Self {
        Self {
            palettes,
            tones,
            tiles,
            distance,
        }
    }

    /// Pick the pattern for `window` at the given phase `(offset_y, offset_x)`.
    ///
    /// # Errors
    ///
    /// [`FilterError::EmptyCandidates`] when no tones are enabled, or any
    /// tile rendering error.
    pub fn quantize(&self, window: &Window, phase: (usize, usize)) -> Result<Pattern, FilterError> {
        let (offset_y, offset_x) = phase;
        let bg_anchor = self.palettes.background_anchor();
        let fg_anchor = self.palettes.foreground_anchor();

        let (normalized, _) = normalize_window(window);
        let tone_candidates: Vec<Pattern> = self
            .tones
            .iter()
            .map(|&tone| Pattern::new(tone, bg_anchor, fg_anchor, offset_y, offset_x))
            .collect();
        let (tone_index, _) = best_index(&normalized, &tone_candidates, self.tiles, self.distance)?;
        let toned = tone_candidates[tone_index];

        let background = self.resolve(window, &self.palettes.background, |c| {
            toned.with_colors(c, fg_anchor)
        })?;
        let foreground = self.resolve(window, &self.palettes.foreground, |c| {
            toned.with_colors(background, c)
        })?;

        Ok(toned.with_colors(background, foreground))
    }

    /// Tier search followed by a search within the winning tier.
    fn resolve(
        &self,
        window: &Window,
        palette: &Palette,
        pattern_for: impl Fn(Rgb) -> Pattern,
    ) -> Result<Rgb, FilterError> {
        let representatives: Vec<Pattern> = palette
            .tiers()
            .filter_map(|tier| tier.first().copied())
            .map(&pattern_for)
            .collect();
        let (tier, _) = best_index(window, &representatives, self.tiles, self.distance)?;

        let colors = palette.tier(tier).ok_or(FilterError::EmptyCandidates)?;
        let candidates: Vec<Pattern> = colors.iter().copied().map(&pattern_for).collect();
        let (index, _) = best_index(window, &candidates, self.tiles, self.distance)?;
        Ok(colors[index])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;
    use crate::distance::{DistanceMetric, Euclidean};
    use crate::tone::ToneLibrary;
    use std::sync::Arc;

    fn cache() -> PatternCache {
        PatternCache::new(Arc::new(ToneLibrary::builtin()))
    }

    #[test]
    fn test_mid_gray_resolves_to_matching_background() {
        let tiles = cache();
        let tones: Vec<ToneId> = tiles.tones().ids().collect();
        let palettes = PaletteSet::sketchbook();
        let quantizer = Quantizer::new(&palettes, &tones, &tiles, &DistanceMetric::Perceptual);

        let window = Window::uniform(Rgba::opaque(Rgb::gray(128)));
        let pattern = quantizer.quantize(&window, (0, 0)).unwrap();

        assert_eq!(tiles.tones().name(pattern.tone()), "blank");
        assert_eq!(pattern.background(), Rgb::gray(128));
        assert_eq!(pattern.foreground(), Rgb::BLACK);
    }

    #[test]
    fn test_dark_window_picks_solid_tone() {
        let tiles = cache();
        let tones: Vec<ToneId> = tiles.tones().ids().collect();
        let palettes = PaletteSet::sketchbook();
        let quantizer = Quantizer::new(&palettes, &tones, &tiles, &DistanceMetric::Perceptual);

        // Near-black everywhere with one lighter pixel so the window stretches.
        let mut window = Window::uniform(Rgba::opaque(Rgb::gray(10)));
        window.pixels_mut()[0] = Rgba::opaque(Rgb::gray(250));
        let pattern = quantizer.quantize(&window, (0, 0)).unwrap();

        assert_eq!(tiles.tones().name(pattern.tone()), "solid");
        assert_eq!(pattern.foreground(), Rgb::BLACK);
    }

    #[test]
    fn test_phase_is_kept() {
        let tiles = cache();
        let tones = tiles.tones().select(&["checker"]).unwrap();
        let palettes = PaletteSet::sketchbook();
        let quantizer = Quantizer::new(&palettes, &tones, &tiles, &Euclidean);

        let window = Window::uniform(Rgba::opaque(Rgb::gray(90)));
        let pattern = quantizer.quantize(&window, (3, 6)).unwrap();
        assert_eq!(pattern.offset(), (3, 6));
    }

    #[test]
    fn test_no_tones_is_error() {
        let tiles = cache();
        let palettes = PaletteSet::sketchbook();
        let quantizer = Quantizer::new(&palettes, &[], &tiles, &Euclidean);
        let window = Window::uniform(Rgba::opaque(Rgb::WHITE));
        assert!(matches!(
            quantizer.quantize(&window, (0, 0)),
            Err(FilterError::EmptyCandidates)
        ));
    }
}
