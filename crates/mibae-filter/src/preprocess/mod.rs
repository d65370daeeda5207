//! Preprocessing applied before quantization.
//!
//! The only step is resampling the input to the working resolution chosen by
//! the layout.

mod resize;

pub use resize::resize_area;
