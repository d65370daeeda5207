use std::ops::Deref;

use tracing::{debug, trace};

use super::Layout;
use crate::api::{FilterError, MibaeFilter};
use crate::buffer::PixelBuffer;
use crate::dither::{color_error, diffuse};
use crate::output::FilteredImage;
use crate::pattern::Pattern;
use crate::preprocess::resize_area;
use crate::quantize::Quantizer;
use crate::search::Window;

/// Progress reported after each processed row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowProgress {
    /// Index of the row just finished.
    pub row: usize,
    /// Rows finished so far.
    pub rows_completed: usize,
    /// Rows in the working grid.
    pub rows_total: usize,
}

/// One in-progress filter run, advanced a row at a time.
///
/// Rows go top to bottom and cells left to right; error diffusion makes each
/// cell depend on every cell before it, so the order is fixed. Between two
/// [`step_row`](Self::step_row) calls the caller is free to yield, report
/// progress or abandon the run.
///
/// `F` is how the run holds its filter: a plain reference for blocking use,
/// or an `Arc<MibaeFilter>` when the run has to move between threads.
///
/// # Example
///
/// ```
/// use mibae_filter::{FilterRun, MibaeFilter, PaletteSet, PixelBuffer, Rgb, Rgba};
///
/// let filter = MibaeFilter::new(PaletteSet::sketchbook());
/// let input = PixelBuffer::from_pixels(vec![Rgba::opaque(Rgb::gray(90)); 12], 4, 3).unwrap();
///
/// let mut run = FilterRun::new(&filter, &input).unwrap();
/// while let Some(progress) = run.step_row().unwrap() {
///     assert!(progress.rows_completed <= progress.rows_total);
/// }
/// let image = run.finish();
/// assert!(image.is_complete());
/// ```
pub struct FilterRun<F> {
    filter: F,
    layout: Layout,
    source: PixelBuffer,
    output: PixelBuffer,
    cells: Vec<Option<Pattern>>,
    next_row: usize,
}

impl<F: Deref<Target = MibaeFilter>> FilterRun<F> {
    /// Lay out the run and downsample `input` to the working grid.
    ///
    /// # Errors
    ///
    /// Invalid filter options, or an empty input.
    pub fn new(filter: F, input: &PixelBuffer) -> Result<Self, FilterError> {
        filter.validate()?;
        let layout = Layout::compute(
            input.width(),
            input.height(),
            filter.container_size(),
            filter.zoom_level(),
        )?;
        let (width, height) = layout.working();
        let (out_width, out_height) = layout.output();

        debug!(
            natural = ?layout.natural(),
            working = ?layout.working(),
            zoom = layout.zoom(),
            cached_tiles = filter.pattern_cache().len(),
            cached_distances = filter.distance_cache().len(),
            "Starting filter run"
        );

        Ok(Self {
            filter,
            layout,
            source: resize_area(input, width, height),
            output: PixelBuffer::new(out_width, out_height),
            cells: vec![None; width * height],
            next_row: 0,
        })
    }

    #[inline]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    #[inline]
    pub fn rows_completed(&self) -> usize {
        self.next_row
    }

    #[inline]
    pub fn is_done(&self) -> bool {
        self.next_row >= self.layout.working().1
    }

    /// Process the next row. Returns `None` once every row is done.
    ///
    /// # Errors
    ///
    /// Pattern search errors; the run should be abandoned after one.
    pub fn step_row(&mut self) -> Result<Option<RowProgress>, FilterError> {
        let (width, height) = self.layout.working();
        if self.next_row >= height {
            return Ok(None);
        }

        let filter = &*self.filter;
        let quantizer = Quantizer::new(
            filter.palettes(),
            filter.enabled_tones(),
            filter.pattern_cache(),
            &**filter.distance_cache(),
        );
        let kernel = filter.dither_options().algorithm.kernel();
        let intensity = filter.dither_options().intensity;
        let zoom = self.layout.zoom();

        let cy = self.next_row;
        for cx in 0..width {
            let Some(wanted) = self.source.get(cx, cy).filter(|p| p.is_opaque()) else {
                continue;
            };

            let (window, phase) = Window::around(&self.source, cx, cy);
            let pattern = quantizer.quantize(&window, phase)?;
            let tile = filter.pattern_cache().render_or_fetch(&pattern)?;

            self.output.fill_block(cx * zoom, cy * zoom, zoom, tile.center());
            self.cells[cy * width + cx] = Some(pattern);

            if let Some(kernel) = &kernel {
                let drawn = self
                    .output
                    .get(cx * zoom, cy * zoom)
                    .unwrap_or_else(|| tile.center());
                let error = color_error(wanted.rgb(), drawn.rgb());
                diffuse(&mut self.source, cx, cy, error, kernel, intensity);
            }
        }

        self.next_row += 1;
        trace!(row = cy, of = height, "Row filtered");

        Ok(Some(RowProgress {
            row: cy,
            rows_completed: self.next_row,
            rows_total: height,
        }))
    }

    /// Stop here and hand over what has been produced so far.
    pub fn finish(self) -> FilteredImage {
        FilteredImage::new(self.output, self.cells, self.layout, self.next_row)
    }
}
