//! Tiered palettes
//!
//! A [`Palette`] groups its colors into lightness tiers; a [`PaletteSet`]
//! pairs the background (light) family with the foreground (dark) family.

mod error;
mod palette;

pub use error::{PaletteError, ParseColorError};
pub use palette::{Palette, PaletteSet};
