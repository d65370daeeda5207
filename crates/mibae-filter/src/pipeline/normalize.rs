//! Local contrast normalization of a search window.
//!
//! Tones are chosen on a lightness-only copy of the window stretched to the
//! full 0..=255 range, so the choice depends on local structure rather than
//! on absolute brightness.

use crate::color::{Rgb, Rgba};
use crate::search::Window;

/// How a window was normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Normalization {
    /// Lightness stretched from `[min, max]` to `[0, 255]`.
    Stretched,
    /// All opaque pixels share one lightness; kept unstretched.
    Flat,
    /// No opaque pixels; window returned unchanged.
    Empty,
}

/// Map every opaque pixel to a gray of its stretched luma.
///
/// Transparent pixels are left as they are. When the window has no spread
/// in lightness each opaque pixel keeps its own (rounded) luma as gray.
pub fn normalize_window(window: &Window) -> (Window, Normalization) {
    let mut lo = f32::INFINITY;
    let mut hi = f32::NEG_INFINITY;
    for p in window.pixels().iter().filter(|p| p.is_opaque()) {
        let l = p.rgb().luma();
        lo = lo.min(l);
        hi = hi.max(l);
    }

    if lo > hi {
        return (window.clone(), Normalization::Empty);
    }

    let span = hi - lo;
    let kind = if span > 0.0 {
        Normalization::Stretched
    } else {
        Normalization::Flat
    };

    let mut out = window.clone();
    for p in out.pixels_mut().iter_mut().filter(|p| p.is_opaque()) {
        let l = p.rgb().luma();
        let v = match kind {
            Normalization::Stretched => (l - lo) * 255.0 / span,
            _ => l,
        };
        *p = Rgba::opaque(Rgb::gray(v.round().clamp(0.0, 255.0) as u8));
    }
    (out, kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tone::TILE_AREA;

    #[test]
    fn test_stretch_to_full_range() {
        let mut pixels = [Rgba::opaque(Rgb::gray(100)); TILE_AREA];
        pixels[0] = Rgba::opaque(Rgb::gray(20));
        pixels[1] = Rgba::opaque(Rgb::gray(220));
        let (out, kind) = normalize_window(&Window::new(pixels));

        assert_eq!(kind, Normalization::Stretched);
        assert_eq!(out.pixels()[0], Rgba::opaque(Rgb::gray(0)));
        assert_eq!(out.pixels()[1], Rgba::opaque(Rgb::gray(255)));
        // (100 - 20) * 255 / 200 = 102
        assert_eq!(out.pixels()[2], Rgba::opaque(Rgb::gray(102)));
    }

    #[test]
    fn test_transparent_untouched() {
        let mut pixels = [Rgba::TRANSPARENT; TILE_AREA];
        pixels[5] = Rgba::opaque(Rgb::new(255, 0, 0));
        pixels[6] = Rgba::opaque(Rgb::new(0, 0, 255));
        pixels[7] = Rgba::new(10, 20, 30, 128);
        let (out, _) = normalize_window(&Window::new(pixels));

        assert_eq!(out.pixels()[0], Rgba::TRANSPARENT);
        assert_eq!(out.pixels()[7], Rgba::new(10, 20, 30, 128));
        // Red is lighter than blue under the luma weights.
        assert_eq!(out.pixels()[5], Rgba::opaque(Rgb::WHITE));
        assert_eq!(out.pixels()[6], Rgba::opaque(Rgb::BLACK));
    }

    #[test]
    fn test_flat_window_keeps_lightness() {
        let window = Window::uniform(Rgba::opaque(Rgb::gray(128)));
        let (out, kind) = normalize_window(&window);
        assert_eq!(kind, Normalization::Flat);
        assert!(out.pixels().iter().all(|&p| p == Rgba::opaque(Rgb::gray(128))));
    }

    #[test]
    fn test_single_opaque_pixel_is_flat() {
        let mut pixels = [Rgba::TRANSPARENT; TILE_AREA];
        pixels[9] = Rgba::opaque(Rgb::new(200, 200, 200));
        let (out, kind) = normalize_window(&Window::new(pixels));
        assert_eq!(kind, Normalization::Flat);
        assert_eq!(out.pixels()[9], Rgba::opaque(Rgb::gray(200)));
    }

    #[test]
    fn test_empty_window_unchanged() {
        let window = Window::uniform(Rgba::new(1, 2, 3, 0));
        let (out, kind) = normalize_window(&window);
        assert_eq!(kind, Normalization::Empty);
        assert_eq!(out, window);
    }
}
