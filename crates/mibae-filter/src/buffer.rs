//! RGBA8 pixel grid shared by the source and output sides of a run.

use crate::api::FilterError;
use crate::color::Rgba;

/// A row-major grid of [`Rgba`] pixels.
///
/// # Example
///
/// ```
/// use mibae_filter::{PixelBuffer, Rgb, Rgba};
///
/// let mut buffer = PixelBuffer::new(3, 2);
/// buffer.set(2, 1, Rgba::opaque(Rgb::WHITE));
///
/// assert_eq!(buffer.get(2, 1), Some(Rgba::opaque(Rgb::WHITE)));
/// assert_eq!(buffer.get(3, 0), None);
/// assert_eq!(buffer.to_rgba8().len(), 3 * 2 * 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    pixels: Vec<Rgba>,
}

impl PixelBuffer {
    /// A fully transparent buffer.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgba::TRANSPARENT; width * height],
        }
    }

    /// Wrap existing pixels.
    ///
    /// # Errors
    ///
    /// [`FilterError::BufferSize`] if `pixels.len() != width * height`.
    pub fn from_pixels(pixels: Vec<Rgba>, width: usize, height: usize) -> Result<Self, FilterError> {
        if pixels.len() != width * height {
            return Err(FilterError::BufferSize {
                width,
                height,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Build from interleaved `[R, G, B, A, ...]` bytes.
    ///
    /// # Errors
    ///
    /// [`FilterError::BufferSize`] if the byte count is not `width * height * 4`.
    pub fn from_rgba8(bytes: &[u8], width: usize, height: usize) -> Result<Self, FilterError> {
        if bytes.len() != width * height * 4 {
            return Err(FilterError::BufferSize {
                width,
                height,
                actual: bytes.len() / 4,
            });
        }
        let pixels = bytes
            .chunks_exact(4)
            .map(|c| Rgba::new(c[0], c[1], c[2], c[3]))
            .collect();
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Interleaved `[R, G, B, A, ...]` bytes.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 4);
        for p in &self.pixels {
            bytes.extend_from_slice(&p.to_bytes());
        }
        bytes
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    /// Pixel at `(x, y)`, or `None` outside the grid.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<Rgba> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }

    /// Pixel at signed coordinates; anything off the grid reads as transparent.
    #[inline]
    pub fn get_or_transparent(&self, x: isize, y: isize) -> Rgba {
        if x < 0 || y < 0 {
            return Rgba::TRANSPARENT;
        }
        self.get(x as usize, y as usize).unwrap_or(Rgba::TRANSPARENT)
    }

    /// Overwrite one pixel. Writes outside the grid are ignored.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, pixel: Rgba) {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = pixel;
        }
    }

    /// Fill a `size x size` block whose top-left corner is `(x, y)`,
    /// clipped to the grid.
    pub fn fill_block(&mut self, x: usize, y: usize, size: usize, pixel: Rgba) {
        let x_end = (x + size).min(self.width);
        let y_end = (y + size).min(self.height);
        for row in y.min(y_end)..y_end {
            let start = row * self.width;
            self.pixels[start + x.min(x_end)..start + x_end].fill(pixel);
        }
    }

    /// Mirror the rows top to bottom.
    pub fn flip_vertical(&mut self) {
        let width = self.width;
        for top in 0..self.height / 2 {
            let bottom = self.height - 1 - top;
            let (upper, lower) = self.pixels.split_at_mut(bottom * width);
            upper[top * width..(top + 1) * width].swap_with_slice(&mut lower[..width]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;

    #[test]
    fn test_size_mismatch() {
        assert!(matches!(
            PixelBuffer::from_rgba8(&[0; 15], 2, 2),
            Err(FilterError::BufferSize { actual: 3, .. })
        ));
        assert!(PixelBuffer::from_pixels(vec![Rgba::TRANSPARENT; 6], 3, 2).is_ok());
    }

    #[test]
    fn test_out_of_range_reads_transparent() {
        let buffer = PixelBuffer::from_pixels(vec![Rgba::opaque(Rgb::WHITE); 4], 2, 2).unwrap();
        assert_eq!(buffer.get_or_transparent(-1, 0), Rgba::TRANSPARENT);
        assert_eq!(buffer.get_or_transparent(0, 2), Rgba::TRANSPARENT);
        assert_eq!(buffer.get_or_transparent(1, 1), Rgba::opaque(Rgb::WHITE));
    }

    #[test]
    fn test_fill_block_clips() {
        let mut buffer = PixelBuffer::new(3, 3);
        buffer.fill_block(2, 1, 4, Rgba::opaque(Rgb::BLACK));
        let opaque: Vec<_> = (0..3)
            .flat_map(|y| (0..3).map(move |x| (x, y)))
            .filter(|&(x, y)| buffer.get(x, y).is_some_and(|p| p.is_opaque()))
            .collect();
        assert_eq!(opaque, vec![(2, 1), (2, 2)]);
    }

    #[test]
    fn test_flip_vertical() {
        let rows = [Rgb::gray(1), Rgb::gray(2), Rgb::gray(3)];
        let pixels = rows
            .iter()
            .flat_map(|&c| [Rgba::opaque(c); 2])
            .collect();
        let mut buffer = PixelBuffer::from_pixels(pixels, 2, 3).unwrap();
        buffer.flip_vertical();
        assert_eq!(buffer.get(1, 0), Some(Rgba::opaque(Rgb::gray(3))));
        assert_eq!(buffer.get(0, 1), Some(Rgba::opaque(Rgb::gray(2))));
        assert_eq!(buffer.get(0, 2), Some(Rgba::opaque(Rgb::gray(1))));
    }

    #[test]
    fn test_rgba8_round_trip() {
        let bytes: Vec<u8> = (0..16).collect();
        let buffer = PixelBuffer::from_rgba8(&bytes, 2, 2).unwrap();
        assert_eq!(buffer.get(1, 0), Some(Rgba::new(4, 5, 6, 7)));
        assert_eq!(buffer.to_rgba8(), bytes);
    }
}
