//! MibaeFilter builder -- the primary entry point for the crate.
//!
//! [`MibaeFilter`] bundles palettes, enabled tones, diffusion options and the
//! shared caches behind a fluent configuration API.

use std::ops::ControlFlow;
use std::sync::Arc;

use tracing::debug;

use super::FilterError;
use crate::buffer::PixelBuffer;
use crate::distance::{CachedDistance, DistanceMetric};
use crate::dither::{DitherAlgorithm, DitherOptions};
use crate::output::FilteredImage;
use crate::palette::PaletteSet;
use crate::pattern::PatternCache;
use crate::pipeline::{FilterRun, RowProgress};
use crate::tone::{ToneId, ToneLibrary};

/// High-level halftone filter.
///
/// # Design
///
/// - Constructor requires a [`PaletteSet`]; every other setting has a default
/// - Configuration methods consume and return `self`
/// - [`apply()`](Self::apply) takes `&self`, so one filter serves many images
/// - Pattern tiles and color distances are cached behind `Arc`s and survive
///   across runs; [`share_caches`](Self::share_caches) lets several filters
///   reuse the same caches
///
/// # Example
///
/// ```
/// use mibae_filter::{DitherAlgorithm, MibaeFilter, PaletteSet, PixelBuffer, Rgb, Rgba};
///
/// let filter = MibaeFilter::new(PaletteSet::sketchbook())
///     .tones(&["blank", "dot25", "checker", "solid"])
///     .unwrap()
///     .dither(DitherAlgorithm::FloydSteinberg)
///     .intensity(0.8);
///
/// let input = PixelBuffer::from_pixels(vec![Rgba::opaque(Rgb::gray(128)); 16], 4, 4).unwrap();
/// let image = filter.apply(&input).unwrap();
///
/// assert_eq!(image.width(), 4);
/// assert_eq!(image.height(), 4);
/// ```
#[derive(Debug)]
pub struct MibaeFilter {
    palettes: PaletteSet,
    tones: Vec<ToneId>,
    tiles: Arc<PatternCache>,
    distance: Arc<CachedDistance>,
    dither: DitherOptions,
    zoom: usize,
    container: Option<(usize, usize)>,
}

impl MibaeFilter {
    /// Create a filter over `palettes` with every built-in tone enabled.
    ///
    /// Defaults: perceptual distance, Floyd-Steinberg at intensity 0.8,
    /// zoom 1, no container.
    pub fn new(palettes: PaletteSet) -> Self {
        Self::with_library(palettes, ToneLibrary::builtin())
    }

    /// Create a filter over a custom tone library, all tones enabled.
    pub fn with_library(palettes: PaletteSet, library: ToneLibrary) -> Self {
        let tones = library.ids().collect();
        Self {
            palettes,
            tones,
            tiles: Arc::new(PatternCache::new(Arc::new(library))),
            distance: Arc::new(CachedDistance::new(DistanceMetric::default())),
            dither: DitherOptions::default(),
            zoom: 1,
            container: None,
        }
    }

    /// Enable the named tones, in search order.
    ///
    /// Earlier tones win ties.
    ///
    /// # Errors
    ///
    /// [`FilterError::UnknownTone`] for a name missing from the library.
    pub fn tones<S: AsRef<str>>(mut self, names: &[S]) -> Result<Self, FilterError> {
        self.tones = self.tiles.tones().select(names)?;
        Ok(self)
    }

    /// Set the color distance metric.
    ///
    /// Switching metric starts a fresh distance cache.
    pub fn metric(mut self, metric: DistanceMetric) -> Self {
        if self.distance.metric() != metric {
            self.distance = Arc::new(CachedDistance::new(metric));
        }
        self
    }

    /// Set the diffusion kernel.
    #[inline]
    pub fn dither(mut self, algorithm: DitherAlgorithm) -> Self {
        self.dither = self.dither.algorithm(algorithm);
        self
    }

    /// Set the diffusion intensity, `[0, 1]`.
    #[inline]
    pub fn intensity(mut self, intensity: f32) -> Self {
        self.dither = self.dither.intensity(intensity);
        self
    }

    /// Set the output zoom (display pixels per working cell, at least 1).
    #[inline]
    pub fn zoom(mut self, zoom: usize) -> Self {
        self.zoom = zoom;
        self
    }

    /// Fit the output into a `width x height` container.
    #[inline]
    pub fn container(mut self, width: usize, height: usize) -> Self {
        self.container = Some((width, height));
        self
    }

    /// Reuse the caches of `other`.
    ///
    /// Adopts `other`'s tone library and metric along with its caches. Enabled
    /// tones are looked up by name in the adopted library; if any is missing
    /// the enabled list of `other` is used instead.
    pub fn share_caches(mut self, other: &MibaeFilter) -> Self {
        if !Arc::ptr_eq(self.tiles.tones(), other.tiles.tones()) {
            let names: Vec<&str> = self
                .tones
                .iter()
                .map(|&id| self.tiles.tones().name(id))
                .collect();
            let remapped = other
                .tiles
                .tones()
                .select(&names)
                .unwrap_or_else(|_| other.tones.clone());
            self.tones = remapped;
        }
        self.tiles = Arc::clone(&other.tiles);
        self.distance = Arc::clone(&other.distance);
        self
    }

    /// Check option ranges.
    ///
    /// # Errors
    ///
    /// [`FilterError::InvalidOption`] for out-of-range intensity, zoom 0, or
    /// an empty tone list.
    pub fn validate(&self) -> Result<(), FilterError> {
        self.dither.validate()?;
        if self.zoom == 0 {
            return Err(FilterError::InvalidOption {
                option: "zoom",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.tones.is_empty() {
            return Err(FilterError::InvalidOption {
                option: "tones",
                reason: "at least one tone must be enabled".to_string(),
            });
        }
        Ok(())
    }

    /// Filter a whole image.
    ///
    /// # Errors
    ///
    /// Invalid options, an empty input, or a pattern search failure.
    pub fn apply(&self, input: &PixelBuffer) -> Result<FilteredImage, FilterError> {
        self.apply_with(input, |_| ControlFlow::Continue(()))
    }

    /// Filter an image, calling `hook` after every row.
    ///
    /// Returning [`ControlFlow::Break`] from the hook stops the run after the
    /// current row; the partial image is returned.
    ///
    /// ```
    /// use std::ops::ControlFlow;
    /// use mibae_filter::{MibaeFilter, PaletteSet, PixelBuffer, Rgb, Rgba};
    ///
    /// let filter = MibaeFilter::new(PaletteSet::sketchbook());
    /// let input = PixelBuffer::from_pixels(vec![Rgba::opaque(Rgb::gray(40)); 64], 8, 8).unwrap();
    ///
    /// let image = filter
    ///     .apply_with(&input, |progress| {
    ///         if progress.rows_completed == 3 {
    ///             ControlFlow::Break(())
    ///         } else {
    ///             ControlFlow::Continue(())
    ///         }
    ///     })
    ///     .unwrap();
    /// assert_eq!(image.rows_completed(), 3);
    /// ```
    pub fn apply_with<F>(&self, input: &PixelBuffer, mut hook: F) -> Result<FilteredImage, FilterError>
    where
        F: FnMut(RowProgress) -> ControlFlow<()>,
    {
        let mut run = FilterRun::new(self, input)?;
        while let Some(progress) = run.step_row()? {
            if hook(progress).is_break() {
                debug!(rows = progress.rows_completed, "Filter run stopped early");
                break;
            }
        }
        Ok(run.finish())
    }

    /// Filter interleaved RGBA bytes.
    ///
    /// # Errors
    ///
    /// [`FilterError::BufferSize`] if the byte count does not match, plus
    /// everything [`apply`](Self::apply) can return.
    pub fn apply_rgba8(
        &self,
        bytes: &[u8],
        width: usize,
        height: usize,
    ) -> Result<FilteredImage, FilterError> {
        let input = PixelBuffer::from_rgba8(bytes, width, height)?;
        self.apply(&input)
    }

    #[inline]
    pub fn palettes(&self) -> &PaletteSet {
        &self.palettes
    }

    /// Tone library shared with the pattern cache.
    #[inline]
    pub fn library(&self) -> &ToneLibrary {
        self.tiles.tones()
    }

    /// Enabled tones in search order.
    #[inline]
    pub fn enabled_tones(&self) -> &[ToneId] {
        &self.tones
    }

    #[inline]
    pub fn pattern_cache(&self) -> &Arc<PatternCache> {
        &self.tiles
    }

    #[inline]
    pub fn distance_cache(&self) -> &Arc<CachedDistance> {
        &self.distance
    }

    #[inline]
    pub fn dither_options(&self) -> &DitherOptions {
        &self.dither
    }

    /// Display pixels per working cell.
    #[inline]
    pub fn zoom_level(&self) -> usize {
        self.zoom
    }

    #[inline]
    pub fn container_size(&self) -> Option<(usize, usize)> {
        self.container
    }
}
