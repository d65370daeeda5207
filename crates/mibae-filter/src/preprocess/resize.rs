//! Area-average downsampling in linear light.

use crate::buffer::PixelBuffer;
use crate::color::{LinearRgb, Rgb};

/// Resize `source` to `new_width x new_height` by area averaging.
///
/// Each output pixel averages the source area it covers, weighting partial
/// pixels by overlap and colors by alpha. Averaging happens in linear light.
/// A resampled pixel is opaque when at least half of its area is covered
/// and fully transparent otherwise. Same-size requests return an exact copy.
pub fn resize_area(source: &PixelBuffer, new_width: usize, new_height: usize) -> PixelBuffer {
    if source.width() == new_width && source.height() == new_height {
        return source.clone();
    }

    let mut out = PixelBuffer::new(new_width, new_height);
    if source.width() == 0 || source.height() == 0 {
        return out;
    }

    let sx = source.width() as f64 / new_width as f64;
    let sy = source.height() as f64 / new_height as f64;

    for oy in 0..new_height {
        let rows = spans(oy, sy, source.height());
        for ox in 0..new_width {
            let cols = spans(ox, sx, source.width());

            let mut weight = 0.0f64;
            let mut alpha = 0.0f64;
            let mut color = [0.0f64; 3];
            for &(y, wy) in &rows {
                for &(x, wx) in &cols {
                    let Some(p) = source.get(x, y) else { continue };
                    let w = wx * wy;
                    let a = p.a as f64 / 255.0;
                    let lin = LinearRgb::from(p.rgb());
                    weight += w;
                    alpha += w * a;
                    color[0] += w * a * lin.r as f64;
                    color[1] += w * a * lin.g as f64;
                    color[2] += w * a * lin.b as f64;
                }
            }

            if weight <= 0.0 || alpha <= 0.0 {
                continue;
            }
            let rgb = LinearRgb::new(
                (color[0] / alpha) as f32,
                (color[1] / alpha) as f32,
                (color[2] / alpha) as f32,
            )
            .to_rgb();
            if alpha / weight >= 0.5 {
                out.set(ox, oy, rgb.with_alpha(255));
            }
        }
    }
    out
}

/// Source indices covered by output index `o` with their overlap lengths.
fn spans(o: usize, scale: f64, limit: usize) -> Vec<(usize, f64)> {
    let start = o as f64 * scale;
    let end = ((o + 1) as f64 * scale).min(limit as f64);
    let first = start.floor() as usize;
    let last = (end.ceil() as usize).min(limit);

    (first..last)
        .filter_map(|i| {
            let overlap = end.min(i as f64 + 1.0) - start.max(i as f64);
            (overlap > 0.0).then_some((i, overlap))
        })
        .collect()
}
