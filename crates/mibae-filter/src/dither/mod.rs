//! Error diffusion over the working source buffer.
//!
//! After a cell is stamped, the difference between what the source asked
//! for and what was drawn is pushed onto source cells not yet visited.
//! The source buffer is 8-bit, so every push rounds and clamps in place.
//!
//! # Kernels
//!
//! - **Floyd-Steinberg**: 7/16 right, 3/16 bottom-left, 5/16 bottom,
//!   1/16 bottom-right (default)
//! - **Atkinson**: 75% propagation over six neighbors
//! - **Sierra Lite**: 2/4 right, 1/4 bottom-left, 1/4 bottom

mod kernel;
mod options;

pub use kernel::{Kernel, ATKINSON, FLOYD_STEINBERG, SIERRA_LITE};
pub use options::{DitherAlgorithm, DitherOptions};

use crate::buffer::PixelBuffer;
use crate::color::{Rgb, Rgba};

/// Per-channel error `wanted - drawn`.
#[inline]
pub fn color_error(wanted: Rgb, drawn: Rgb) -> [f32; 3] {
    [
        wanted.r as f32 - drawn.r as f32,
        wanted.g as f32 - drawn.g as f32,
        wanted.b as f32 - drawn.b as f32,
    ]
}

/// Spread `error` from cell `(cx, cy)` onto its kernel neighbors.
///
/// Neighbors outside the buffer or not fully opaque are skipped; their
/// share is dropped.
pub fn diffuse(
    source: &mut PixelBuffer,
    cx: usize,
    cy: usize,
    error: [f32; 3],
    kernel: &Kernel,
    intensity: f32,
) {
    if error == [0.0; 3] {
        return;
    }

    for (dx, dy, factor) in kernel.scaled(intensity) {
        let x = cx as isize + dx as isize;
        let y = cy as isize + dy as isize;
        if x < 0 || y < 0 {
            continue;
        }
        let (x, y) = (x as usize, y as usize);
        let Some(pixel) = source.get(x, y).filter(|p| p.is_opaque()) else {
            continue;
        };

        let push = |channel: u8, e: f32| (channel as f32 + e * factor).round().clamp(0.0, 255.0) as u8;
        source.set(
            x,
            y,
            Rgba::new(
                push(pixel.r, error[0]),
                push(pixel.g, error[1]),
                push(pixel.b, error[2]),
                pixel.a,
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray_buffer(width: usize, height: usize, v: u8) -> PixelBuffer {
        PixelBuffer::from_pixels(vec![Rgba::opaque(Rgb::gray(v)); width * height], width, height)
            .unwrap()
    }

    #[test]
    fn test_floyd_steinberg_shares() {
        let mut source = gray_buffer(3, 2, 100);
        diffuse(&mut source, 1, 0, [32.0, 32.0, 32.0], &FLOYD_STEINBERG, 1.0);

        assert_eq!(source.get(2, 0).unwrap().r, 114); // 7/16 * 32
        assert_eq!(source.get(0, 1).unwrap().r, 106); // 3/16 * 32
        assert_eq!(source.get(1, 1).unwrap().r, 110); // 5/16 * 32
        assert_eq!(source.get(2, 1).unwrap().r, 102); // 1/16 * 32
        assert_eq!(source.get(0, 0).unwrap().r, 100, "visited cells are untouched");
    }

    #[test]
    fn test_intensity_scales_error() {
        let mut source = gray_buffer(2, 1, 100);
        diffuse(&mut source, 0, 0, [-32.0, 0.0, 16.0], &FLOYD_STEINBERG, 0.5);
        assert_eq!(source.get(1, 0).unwrap(), Rgba::new(93, 100, 104, 255));
    }

    #[test]
    fn test_clamps_to_byte_range() {
        let mut source = gray_buffer(2, 1, 250);
        diffuse(&mut source, 0, 0, [255.0, 255.0, 255.0], &FLOYD_STEINBERG, 1.0);
        assert_eq!(source.get(1, 0).unwrap(), Rgba::opaque(Rgb::WHITE));

        let mut source = gray_buffer(2, 1, 5);
        diffuse(&mut source, 0, 0, [-255.0, -255.0, -255.0], &FLOYD_STEINBERG, 1.0);
        assert_eq!(source.get(1, 0).unwrap(), Rgba::opaque(Rgb::BLACK));
    }

    #[test]
    fn test_skips_non_opaque_and_edges() {
        let mut source = gray_buffer(2, 2, 100);
        source.set(1, 0, Rgba::new(100, 100, 100, 128));
        // Right edge cell: only bottom-left and bottom exist.
        diffuse(&mut source, 1, 0, [16.0, 16.0, 16.0], &FLOYD_STEINBERG, 1.0);
        diffuse(&mut source, 0, 0, [16.0, 16.0, 16.0], &FLOYD_STEINBERG, 1.0);

        assert_eq!(source.get(1, 0).unwrap(), Rgba::new(100, 100, 100, 128));
        assert_eq!(source.get(0, 1).unwrap().r, 103 + 5);
    }

    #[test]
    fn test_color_error() {
        assert_eq!(
            color_error(Rgb::new(10, 200, 128), Rgb::new(0, 255, 128)),
            [10.0, -55.0, 0.0]
        );
    }
}
