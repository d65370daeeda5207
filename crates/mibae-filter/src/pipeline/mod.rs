//! The filter pipeline: layout, downsampling, row-by-row quantization and
//! diffusion.
//!
//! [`FilterRun`] is the resumable form; [`MibaeFilter::apply`](crate::MibaeFilter::apply)
//! drives one to completion.

mod layout;
mod normalize;
mod run;

pub use layout::{Layout, MAX_OUTPUT_PIXELS};
pub use normalize::{normalize_window, Normalization};
pub use run::{FilterRun, RowProgress};
