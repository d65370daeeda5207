//! Output types.
//!
//! [`FilteredImage`] holds the stamped display buffer together with the
//! pattern chosen for every working cell.

mod filtered_image;

pub use filtered_image::FilteredImage;
