//! Test fixtures: synthetic images and config snippets.

use mibae_filter::{PixelBuffer, Rgb, Rgba};
use std::path::{Path, PathBuf};

/// Uniform opaque gray image
pub fn gray(width: usize, height: usize, v: u8) -> PixelBuffer {
    PixelBuffer::from_pixels(
        vec![Rgba::opaque(Rgb::gray(v)); width * height],
        width,
        height,
    )
    .unwrap()
}

/// Red rises to the right, green rises downward, blue fixed at 128
pub fn gradient(width: usize, height: usize) -> PixelBuffer {
    let pixels = (0..height)
        .flat_map(|y| {
            (0..width).map(move |x| {
                Rgba::new(
                    (x * 255 / (width - 1).max(1)) as u8,
                    (y * 255 / (height - 1).max(1)) as u8,
                    128,
                    255,
                )
            })
        })
        .collect();
    PixelBuffer::from_pixels(pixels, width, height).unwrap()
}

/// A config limited to black and white with only the blank tone
pub const BLACK_WHITE_YAML: &str = r##"
tones: [blank]
palettes:
  background: [["#ffffff"], ["#000000"]]
  foreground: [["#000000"]]
filter:
  metric: euclidean
  zoom: 1
"##;

/// Write `yaml` to `name` inside `dir`
pub fn write_config(dir: &Path, name: &str, yaml: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, yaml).unwrap();
    path
}
