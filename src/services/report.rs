//! JSON summary of a filter run.

use crate::error::AppError;
use chrono::{DateTime, Utc};
use mibae_filter::{FilteredImage, MibaeFilter, PixelBuffer};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub width: usize,
    pub height: usize,
}

impl From<(usize, usize)> for Size {
    fn from((width, height): (usize, usize)) -> Self {
        Self { width, height }
    }
}

/// What a run did, for logs and determinism checks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub generated_at: DateTime<Utc>,
    pub input: Size,
    pub working: Size,
    pub output: Size,
    pub zoom: usize,
    pub metric: String,
    pub dither: String,
    pub intensity: f32,
    pub rows_completed: usize,
    pub rows_total: usize,
    pub complete: bool,
    /// Cells per tone name
    pub tone_counts: BTreeMap<String, usize>,
    pub cached_tiles: usize,
    pub cached_distances: usize,
    /// SHA-256 of the output size and pixels, hex encoded
    pub fingerprint: String,
}

impl RunReport {
    pub fn new(filter: &MibaeFilter, image: &FilteredImage) -> Self {
        let layout = image.layout();
        let options = filter.dither_options();
        let tone_counts = image
            .tone_counts()
            .into_iter()
            .map(|(id, count)| (filter.library().name(id).to_string(), count))
            .collect();

        Self {
            generated_at: Utc::now(),
            input: layout.natural().into(),
            working: layout.working().into(),
            output: layout.output().into(),
            zoom: layout.zoom(),
            metric: filter.distance_cache().metric().name().to_string(),
            dither: options.algorithm.name().to_string(),
            intensity: options.intensity,
            rows_completed: image.rows_completed(),
            rows_total: layout.working().1,
            complete: image.is_complete(),
            tone_counts,
            cached_tiles: filter.pattern_cache().len(),
            cached_distances: filter.distance_cache().len(),
            fingerprint: fingerprint(image.buffer()),
        }
    }

    pub fn to_json(&self) -> Result<String, AppError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write(&self, path: &Path) -> Result<(), AppError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

/// Hash a buffer's dimensions and RGBA bytes.
pub fn fingerprint(buffer: &PixelBuffer) -> String {
    let mut hasher = Sha256::new();
    hasher.update((buffer.width() as u64).to_le_bytes());
    hasher.update((buffer.height() as u64).to_le_bytes());
    hasher.update(buffer.to_rgba8());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mibae_filter::{PaletteSet, Rgb, Rgba};

    #[test]
    fn test_report_fields() {
        let filter = MibaeFilter::new(PaletteSet::sketchbook())
            .zoom(2)
            .container(8, 6);
        let input =
            PixelBuffer::from_pixels(vec![Rgba::opaque(Rgb::gray(128)); 12], 4, 3).unwrap();
        let image = filter.apply(&input).unwrap();
        let report = RunReport::new(&filter, &image);

        assert_eq!(report.input, Size { width: 4, height: 3 });
        assert_eq!(report.working, Size { width: 4, height: 3 });
        assert_eq!(report.output, Size { width: 8, height: 6 });
        assert_eq!(report.metric, "perceptual");
        assert_eq!(report.dither, "floyd-steinberg");
        assert!(report.complete);
        assert_eq!(report.tone_counts.values().sum::<usize>(), 12);
        assert!(report.cached_tiles > 0);
        assert_eq!(report.fingerprint.len(), 64);
    }

    #[test]
    fn test_fingerprint_depends_on_shape() {
        let pixels = vec![Rgba::opaque(Rgb::WHITE); 4];
        let wide = PixelBuffer::from_pixels(pixels.clone(), 4, 1).unwrap();
        let tall = PixelBuffer::from_pixels(pixels, 1, 4).unwrap();

        assert_ne!(fingerprint(&wide), fingerprint(&tall));
        assert_eq!(fingerprint(&wide), fingerprint(&wide.clone()));
    }

    #[test]
    fn test_report_json() {
        let filter = MibaeFilter::new(PaletteSet::sketchbook());
        let input = PixelBuffer::from_pixels(vec![Rgba::opaque(Rgb::BLACK); 4], 2, 2).unwrap();
        let report = RunReport::new(&filter, &filter.apply(&input).unwrap());

        let json = report.to_json().unwrap();
        let parsed: RunReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, report);
        assert!(json.contains("\"fingerprint\""));
    }
}
