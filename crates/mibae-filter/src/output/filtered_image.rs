//! FilteredImage: the result of a filter run.
//!
//! The per-cell [`Pattern`] record is canonical; the display buffer is what
//! those patterns stamped at the chosen zoom.

use std::collections::BTreeMap;

use crate::buffer::PixelBuffer;
use crate::pattern::Pattern;
use crate::pipeline::Layout;
use crate::tone::ToneId;

/// Output of [`MibaeFilter::apply`](crate::MibaeFilter::apply).
///
/// Cells are stored row-major over the working grid. A cell is `None` when
/// its source pixel was not opaque or the run stopped before reaching it.
#[derive(Debug, Clone)]
pub struct FilteredImage {
    buffer: PixelBuffer,
    cells: Vec<Option<Pattern>>,
    layout: Layout,
    rows_completed: usize,
}

impl FilteredImage {
    pub(crate) fn new(
        buffer: PixelBuffer,
        cells: Vec<Option<Pattern>>,
        layout: Layout,
        rows_completed: usize,
    ) -> Self {
        debug_assert_eq!(
            cells.len(),
            layout.working().0 * layout.working().1,
            "one cell per working pixel"
        );
        Self {
            buffer,
            cells,
            layout,
            rows_completed,
        }
    }

    /// Output width in pixels.
    #[inline]
    pub fn width(&self) -> usize {
        self.buffer.width()
    }

    /// Output height in pixels.
    #[inline]
    pub fn height(&self) -> usize {
        self.buffer.height()
    }

    /// The stamped display buffer.
    #[inline]
    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    /// Consume the image, keeping only the display buffer.
    pub fn into_buffer(self) -> PixelBuffer {
        self.buffer
    }

    /// Interleaved RGBA bytes of the display buffer.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.buffer.to_rgba8()
    }

    #[inline]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Chosen pattern per working cell, row-major.
    #[inline]
    pub fn cells(&self) -> &[Option<Pattern>] {
        &self.cells
    }

    /// Pattern chosen for cell `(cx, cy)`.
    pub fn cell(&self, cx: usize, cy: usize) -> Option<Pattern> {
        let (w, h) = self.layout.working();
        if cx >= w || cy >= h {
            return None;
        }
        self.cells[cy * w + cx]
    }

    /// Rows of the working grid that were fully processed.
    #[inline]
    pub fn rows_completed(&self) -> usize {
        self.rows_completed
    }

    /// Whether every row was processed.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.rows_completed == self.layout.working().1
    }

    /// How many cells use each tone.
    pub fn tone_counts(&self) -> BTreeMap<ToneId, usize> {
        let mut counts = BTreeMap::new();
        for pattern in self.cells.iter().flatten() {
            *counts.entry(pattern.tone()).or_insert(0) += 1;
        }
        counts
    }
}
