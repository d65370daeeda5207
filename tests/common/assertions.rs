//! Assertion helpers for tests.

use mibae_filter::{PixelBuffer, Rgb};
use pretty_assertions::assert_eq;

/// Assert bytes start with the PNG signature
pub fn assert_png(bytes: &[u8]) {
    assert!(
        bytes.starts_with(b"\x89PNG\r\n\x1a\n"),
        "Expected PNG image, got {} bytes starting with {:?}",
        bytes.len(),
        &bytes[..8.min(bytes.len())]
    );
}

/// Assert every opaque pixel is one of `colors`
pub fn assert_only_colors(buffer: &PixelBuffer, colors: &[Rgb]) {
    for (i, p) in buffer.pixels().iter().enumerate() {
        if p.is_opaque() {
            assert!(
                colors.contains(&p.rgb()),
                "Pixel {i} has unexpected color {}",
                p.rgb()
            );
        }
    }
}

/// Assert two buffers have the same size and pixels
pub fn assert_same_image(actual: &PixelBuffer, expected: &PixelBuffer) {
    assert_eq!(
        (actual.width(), actual.height()),
        (expected.width(), expected.height()),
        "Image sizes differ"
    );
    assert!(actual == expected, "Image pixels differ");
}
