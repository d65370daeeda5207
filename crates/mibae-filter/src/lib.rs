#![allow(clippy::excessive_precision, clippy::module_inception)]

//! mibae-filter: halftone tone-pattern quantization with error diffusion
//!
//! This library turns an RGBA raster into a stylized image drawn with a small
//! tiered palette and a set of periodic dot and line screens ("tones").
//!
//! # Quick Start
//!
//! The [`MibaeFilter`] builder is the primary entry point:
//!
//! ```
//! use mibae_filter::{MibaeFilter, PaletteSet, PixelBuffer, Rgb, Rgba};
//!
//! let filter = MibaeFilter::new(PaletteSet::sketchbook()).zoom(2).container(8, 8);
//! let input = PixelBuffer::from_pixels(vec![Rgba::opaque(Rgb::gray(128)); 16], 4, 4).unwrap();
//! let image = filter.apply(&input).unwrap();
//!
//! assert_eq!((image.width(), image.height()), (8, 8));
//! ```
//!
//! # How a cell is drawn
//!
//! The input is downsampled to a working grid. Cells are visited top to
//! bottom, left to right. For each opaque cell:
//!
//! 1. A [`PERIOD`]-square [`Window`] centered on the cell is cut from the
//!    working buffer; pixels outside the buffer are transparent.
//! 2. The [`Quantizer`] picks a [`Pattern`]: the tone on a
//!    contrast-normalized copy of the window, then the background and
//!    foreground colors tier by tier.
//! 3. The pattern's tile pixel at the window center is stamped into the
//!    output as a `zoom x zoom` block.
//! 4. The difference between the cell's source color and the stamped color
//!    is diffused onto unvisited cells.
//!
//! Tones are phase-locked to the global pixel grid, so neighboring cells
//! using the same tone continue the same dot screen.
//!
//! # Caches
//!
//! [`PatternCache`] and [`CachedDistance`] are grow-only and shared through
//! `Arc`, so repeated runs get cheaper and concurrent runs on different
//! images are safe.

pub mod api;
pub mod buffer;
pub mod color;
pub mod distance;
pub mod dither;
pub mod output;
pub mod palette;
pub mod pattern;
pub mod pipeline;
pub mod preprocess;
pub mod quantize;
pub mod search;
pub mod tone;


pub use api::{FilterError, MibaeFilter};
pub use buffer::PixelBuffer;
pub use color::{Lab, LinearRgb, Rgb, Rgba};
pub use distance::{CachedDistance, ColorDistance, DistanceMetric, Euclidean, Perceptual};
pub use dither::{DitherAlgorithm, DitherOptions};
pub use output::FilteredImage;
pub use palette::{Palette, PaletteError, PaletteSet, ParseColorError};
pub use pattern::{Pattern, PatternCache, PatternTile};
pub use pipeline::{
    normalize_window, FilterRun, Layout, Normalization, RowProgress, MAX_OUTPUT_PIXELS,
};
pub use quantize::Quantizer;
pub use search::{best_pattern, best_pattern_scored, Window};
pub use tone::{Tone, ToneId, ToneLibrary, PERIOD};
