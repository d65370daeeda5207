//! PNG decoding to and encoding from [`PixelBuffer`]s.

use crate::error::{AppError, ImageError};
use mibae_filter::{PixelBuffer, Rgb, Rgba};
use std::io::Cursor;
use std::path::Path;

/// Decode a PNG of any color type and bit depth to RGBA8.
///
/// Palettes and `tRNS` are expanded, 16-bit channels are stripped to 8 bits.
pub fn decode_png(data: &[u8]) -> Result<PixelBuffer, ImageError> {
    let mut decoder = png::Decoder::new(Cursor::new(data));
    decoder.set_transformations(png::Transformations::normalize_to_color8());
    let mut reader = decoder
        .read_info()
        .map_err(|e| ImageError::PngDecode(e.to_string()))?;

    let mut buf = vec![0u8; reader.output_buffer_size()];
    let frame = reader
        .next_frame(&mut buf)
        .map_err(|e| ImageError::PngDecode(e.to_string()))?;
    buf.truncate(frame.buffer_size());

    let rgba: Vec<u8> = match frame.color_type {
        png::ColorType::Rgba => buf,
        png::ColorType::Rgb => buf
            .chunks_exact(3)
            .flat_map(|c| [c[0], c[1], c[2], 255])
            .collect(),
        png::ColorType::GrayscaleAlpha => buf
            .chunks_exact(2)
            .flat_map(|c| [c[0], c[0], c[0], c[1]])
            .collect(),
        png::ColorType::Grayscale => buf.iter().flat_map(|&g| [g, g, g, 255]).collect(),
        other => {
            return Err(ImageError::UnsupportedLayout(format!(
                "{other:?} after expansion"
            )))
        }
    };

    let (width, height) = (frame.width as usize, frame.height as usize);
    tracing::trace!(width, height, color = ?frame.color_type, "Decoded PNG");
    PixelBuffer::from_rgba8(&rgba, width, height)
        .map_err(|e| ImageError::PngDecode(e.to_string()))
}

/// Composite partially transparent pixels over `background`.
///
/// Fully transparent pixels stay transparent so the filter skips them.
pub fn flatten(buffer: &PixelBuffer, background: Rgb) -> PixelBuffer {
    let blend = |c: u8, b: u8, a: u8| -> u8 {
        let (c, b, a) = (c as u32, b as u32, a as u32);
        ((c * a + b * (255 - a) + 127) / 255) as u8
    };

    let mut flat = buffer.clone();
    for y in 0..buffer.height() {
        for x in 0..buffer.width() {
            let Some(p) = buffer.get(x, y) else { continue };
            if p.a == 0 || p.a == 255 {
                continue;
            }
            flat.set(
                x,
                y,
                Rgba::new(
                    blend(p.r, background.r, p.a),
                    blend(p.g, background.g, p.a),
                    blend(p.b, background.b, p.a),
                    255,
                ),
            );
        }
    }
    flat
}

/// Encode an RGBA8 PNG.
pub fn encode_png(
    buffer: &PixelBuffer,
    compression: png::Compression,
) -> Result<Vec<u8>, ImageError> {
    let too_large = || ImageError::TooLarge {
        width: buffer.width(),
        height: buffer.height(),
    };
    let width = u32::try_from(buffer.width()).map_err(|_| too_large())?;
    let height = u32::try_from(buffer.height()).map_err(|_| too_large())?;

    let mut out = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut out, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(compression);
        let mut writer = encoder
            .write_header()
            .map_err(|e| ImageError::PngEncode(e.to_string()))?;
        writer
            .write_image_data(&buffer.to_rgba8())
            .map_err(|e| ImageError::PngEncode(e.to_string()))?;
    }
    Ok(out.into_inner())
}

/// Encode with fast settings, then re-compress with oxipng.
///
/// Falls back to the fast encoding if oxipng fails.
pub fn encode_png_optimized(buffer: &PixelBuffer) -> Result<Vec<u8>, ImageError> {
    let png_bytes = encode_png(buffer, png::Compression::Fast)?;
    let optimized = oxipng::optimize_from_memory(
        &png_bytes,
        &oxipng::Options {
            strip: oxipng::StripChunks::Safe,
            optimize_alpha: false,
            ..Default::default()
        },
    );
    match optimized {
        Ok(bytes) => {
            tracing::debug!(
                before = png_bytes.len(),
                after = bytes.len(),
                "Optimized PNG"
            );
            Ok(bytes)
        }
        Err(e) => {
            tracing::warn!(%e, "PNG optimization failed, keeping fast encoding");
            Ok(png_bytes)
        }
    }
}

/// Read and decode a PNG file.
pub fn read_png(path: &Path) -> Result<PixelBuffer, AppError> {
    let data = std::fs::read(path)?;
    Ok(decode_png(&data)?)
}

/// Encode `buffer` and write it to `path`. Returns the file size.
pub fn write_png(path: &Path, buffer: &PixelBuffer, optimize: bool) -> Result<usize, AppError> {
    let bytes = if optimize {
        encode_png_optimized(buffer)?
    } else {
        encode_png(buffer, png::Compression::Default)?
    };
    std::fs::write(path, &bytes)?;
    Ok(bytes.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PixelBuffer {
        let pixels = (0..12)
            .map(|i| Rgba::new(i * 20, 255 - i * 20, 100, if i == 5 { 0 } else { 255 }))
            .collect();
        PixelBuffer::from_pixels(pixels, 4, 3).unwrap()
    }

    #[test]
    fn test_encode_decode_keeps_pixels() {
        let buffer = sample();
        let bytes = encode_png(&buffer, png::Compression::Default).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
        assert_eq!(decode_png(&bytes).unwrap(), buffer);
    }

    #[test]
    fn test_optimized_decodes_to_same_pixels() {
        let buffer = sample();
        let bytes = encode_png_optimized(&buffer).unwrap();
        assert_eq!(decode_png(&bytes).unwrap(), buffer);
    }

    #[test]
    fn test_decode_grayscale() {
        let mut out = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut out, 2, 1);
            encoder.set_color(png::ColorType::Grayscale);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(&[10, 200]).unwrap();
        }

        let buffer = decode_png(&out).unwrap();
        assert_eq!(buffer.get(0, 0), Some(Rgba::new(10, 10, 10, 255)));
        assert_eq!(buffer.get(1, 0), Some(Rgba::new(200, 200, 200, 255)));
    }

    #[test]
    fn test_decode_garbage() {
        assert!(matches!(
            decode_png(b"not a png"),
            Err(ImageError::PngDecode(_))
        ));
    }

    #[test]
    fn test_flatten() {
        let pixels = vec![
            Rgba::new(0, 0, 0, 128),
            Rgba::new(10, 20, 30, 0),
            Rgba::new(1, 2, 3, 255),
        ];
        let buffer = PixelBuffer::from_pixels(pixels, 3, 1).unwrap();
        let flat = flatten(&buffer, Rgb::WHITE);

        assert_eq!(flat.get(0, 0), Some(Rgba::new(127, 127, 127, 255)));
        assert_eq!(flat.get(1, 0), Some(Rgba::new(10, 20, 30, 0)));
        assert_eq!(flat.get(2, 0), Some(Rgba::new(1, 2, 3, 255)));
    }
}
