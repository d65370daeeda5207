//! Search windows and nearest-pattern search.

use crate::api::FilterError;
use crate::buffer::PixelBuffer;
use crate::color::Rgba;
use crate::distance::ColorDistance;
use crate::pattern::{Pattern, PatternCache};
use crate::tone::{PERIOD, TILE_AREA};

/// A `PERIOD x PERIOD` neighborhood of source pixels.
///
/// Pixels that fell outside the source buffer are transparent and take no
/// part in matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window {
    pixels: [Rgba; TILE_AREA],
}

impl Window {
    pub fn new(pixels: [Rgba; TILE_AREA]) -> Self {
        Self { pixels }
    }

    /// A window filled with one pixel value.
    pub fn uniform(pixel: Rgba) -> Self {
        Self::new([pixel; TILE_AREA])
    }

    /// Cut the window centered on cell `(cx, cy)`.
    ///
    /// The top-left corner is `(cx - PERIOD/2, cy - PERIOD/2)`. Returns the
    /// window together with the pattern phase `(y0 mod PERIOD, x0 mod PERIOD)`
    /// that keeps tones aligned to the global pixel grid.
    pub fn around(source: &PixelBuffer, cx: usize, cy: usize) -> (Self, (usize, usize)) {
        let half = (PERIOD / 2) as isize;
        let x0 = cx as isize - half;
        let y0 = cy as isize - half;

        let mut pixels = [Rgba::TRANSPARENT; TILE_AREA];
        for dy in 0..PERIOD {
            for dx in 0..PERIOD {
                pixels[dy * PERIOD + dx] =
                    source.get_or_transparent(x0 + dx as isize, y0 + dy as isize);
            }
        }

        let period = PERIOD as isize;
        let phase = (
            y0.rem_euclid(period) as usize,
            x0.rem_euclid(period) as usize,
        );
        (Self { pixels }, phase)
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Rgba {
        self.pixels[y * PERIOD + x]
    }

    #[inline]
    pub fn pixels(&self) -> &[Rgba; TILE_AREA] {
        &self.pixels
    }

    #[inline]
    pub(crate) fn pixels_mut(&mut self) -> &mut [Rgba; TILE_AREA] {
        &mut self.pixels
    }

    /// Number of fully opaque pixels.
    pub fn opaque_count(&self) -> usize {
        self.pixels.iter().filter(|p| p.is_opaque()).count()
    }
}

/// Total distance between a window and the tile of `pattern`, over opaque
/// window pixels only.
pub fn window_distance(
    window: &Window,
    pattern: &Pattern,
    tiles: &PatternCache,
    distance: &dyn ColorDistance,
) -> Result<f32, FilterError> {
    let tile = tiles.render_or_fetch(pattern)?;
    Ok(window
        .pixels()
        .iter()
        .zip(tile.pixels())
        .filter(|(w, _)| w.is_opaque())
        .map(|(w, t)| distance.distance(w.rgb(), t.rgb()))
        .sum())
}

/// Pick the candidate whose tile is closest to `window`.
///
/// Returns the candidate itself. Only a strictly lower total replaces the
/// current best, so ties go to the earliest candidate, and a window with no
/// opaque pixels always yields the first candidate.
///
/// # Errors
///
/// [`FilterError::EmptyCandidates`] for an empty candidate list, or any
/// error from rendering a tile.
pub fn best_pattern(
    window: &Window,
    candidates: &[Pattern],
    tiles: &PatternCache,
    distance: &dyn ColorDistance,
) -> Result<Pattern, FilterError> {
    best_pattern_scored(window, candidates, tiles, distance).map(|(pattern, _)| pattern)
}

/// Like [`best_pattern`], also returning the winning distance.
pub fn best_pattern_scored(
    window: &Window,
    candidates: &[Pattern],
    tiles: &PatternCache,
    distance: &dyn ColorDistance,
) -> Result<(Pattern, f32), FilterError> {
    let (index, score) = best_index(window, candidates, tiles, distance)?;
    Ok((candidates[index], score))
}

/// Position and score of the winning candidate.
pub(crate) fn best_index(
    window: &Window,
    candidates: &[Pattern],
    tiles: &PatternCache,
    distance: &dyn ColorDistance,
) -> Result<(usize, f32), FilterError> {
    let first = candidates.first().ok_or(FilterError::EmptyCandidates)?;

    let mut best = (0, window_distance(window, first, tiles, distance)?);
    for (index, candidate) in candidates.iter().enumerate().skip(1) {
        let d = window_distance(window, candidate, tiles, distance)?;
        if d < best.1 {
            best = (index, d);
        }
    }
    Ok(best)
}
