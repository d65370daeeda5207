use crate::assets::AssetLoader;
use crate::error::AppError;
use mibae_filter::{
    DistanceMetric, DitherAlgorithm, FilterError, MibaeFilter, Palette, PaletteSet, Rgb, Tone,
    ToneLibrary,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Application configuration loaded from mibae.yaml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Enabled tones, in search order
    pub tones: Vec<String>,

    /// Background and foreground palettes
    pub palettes: PaletteConfig,

    /// Filter options
    pub filter: FilterSettings,

    /// Extra tones: name to eight rows of '#' and '.'
    pub custom_tones: BTreeMap<String, Vec<String>>,
}

/// Palettes as lists of tiers of color strings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteConfig {
    pub background: Vec<Vec<String>>,
    pub foreground: Vec<Vec<String>>,
}

/// Options passed to the filter builder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSettings {
    /// Color distance: "perceptual" or "euclidean"
    pub metric: String,

    /// Diffusion kernel name
    pub dither: String,

    /// Diffusion intensity in [0, 1]
    pub intensity: f32,

    /// Display pixels per working cell
    pub zoom: usize,

    /// Color partially transparent input is flattened onto
    pub background: String,

    /// Output width budget
    pub max_width: Option<usize>,

    /// Output height budget
    pub max_height: Option<usize>,
}

/// Values given on the command line, taking precedence over the file
#[derive(Debug, Clone, Default)]
pub struct FilterOverrides {
    pub metric: Option<String>,
    pub dither: Option<String>,
    pub intensity: Option<f32>,
    pub zoom: Option<usize>,
    pub background: Option<String>,
    pub max_width: Option<usize>,
    pub max_height: Option<usize>,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        let to_strings = |palette: &Palette| -> Vec<Vec<String>> {
            palette
                .tiers()
                .map(|tier| tier.iter().map(Rgb::to_string).collect())
                .collect()
        };
        let sketchbook = PaletteSet::sketchbook();
        Self {
            background: to_strings(&sketchbook.background),
            foreground: to_strings(&sketchbook.foreground),
        }
    }
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            metric: DistanceMetric::default().name().to_string(),
            dither: DitherAlgorithm::default().name().to_string(),
            intensity: 0.8,
            zoom: 2,
            background: "#ffffff".to_string(),
            max_width: None,
            max_height: None,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        let library = ToneLibrary::builtin();
        Self {
            tones: library
                .ids()
                .map(|id| library.name(id).to_string())
                .collect(),
            palettes: PaletteConfig::default(),
            filter: FilterSettings::default(),
            custom_tones: BTreeMap::new(),
        }
    }
}

impl AppConfig {
    /// Parse a YAML document. Missing keys take their defaults.
    pub fn from_yaml(text: &str) -> Result<Self, AppError> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Load configuration from AssetLoader (external file or embedded)
    pub fn load_from_assets(loader: &AssetLoader) -> Result<Self, AppError> {
        let content = loader.read_config_string()?;
        let config = Self::from_yaml(&content)?;
        tracing::info!(
            source = ?loader.config_source(),
            tones = config.tones.len(),
            custom_tones = config.custom_tones.len(),
            background_tiers = config.palettes.background.len(),
            foreground_tiers = config.palettes.foreground.len(),
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Replace file values with any command line values.
    pub fn apply_overrides(&mut self, overrides: &FilterOverrides) {
        let filter = &mut self.filter;
        if let Some(ref metric) = overrides.metric {
            filter.metric = metric.clone();
        }
        if let Some(ref dither) = overrides.dither {
            filter.dither = dither.clone();
        }
        if let Some(intensity) = overrides.intensity {
            filter.intensity = intensity;
        }
        if let Some(zoom) = overrides.zoom {
            filter.zoom = zoom;
        }
        if let Some(ref background) = overrides.background {
            filter.background = background.clone();
        }
        if overrides.max_width.is_some() {
            filter.max_width = overrides.max_width;
        }
        if overrides.max_height.is_some() {
            filter.max_height = overrides.max_height;
        }
    }

    /// Built-in tones plus the custom ones.
    pub fn tone_library(&self) -> Result<ToneLibrary, AppError> {
        let mut library = ToneLibrary::builtin();
        for (name, rows) in &self.custom_tones {
            library = library.with_tone(Tone::parse(name, rows.as_slice())?);
        }
        Ok(library)
    }

    pub fn palette_set(&self) -> Result<PaletteSet, AppError> {
        let background =
            Palette::from_strs(self.palettes.background.as_slice()).map_err(FilterError::from)?;
        let foreground =
            Palette::from_strs(self.palettes.foreground.as_slice()).map_err(FilterError::from)?;
        Ok(PaletteSet::new(background, foreground))
    }

    /// Flatten color for partially transparent input.
    pub fn background_color(&self) -> Result<Rgb, AppError> {
        self.filter.background.parse().map_err(|e| {
            AppError::Config(format!(
                "invalid background color '{}': {e}",
                self.filter.background
            ))
        })
    }

    /// Output budget. A missing side is unbounded.
    pub fn container(&self) -> Option<(usize, usize)> {
        match (self.filter.max_width, self.filter.max_height) {
            (None, None) => None,
            (w, h) => Some((w.unwrap_or(usize::MAX), h.unwrap_or(usize::MAX))),
        }
    }

    /// Build a validated filter from this configuration.
    pub fn build_filter(&self) -> Result<MibaeFilter, AppError> {
        let metric: DistanceMetric = self.filter.metric.parse()?;
        let dither: DitherAlgorithm = self.filter.dither.parse()?;

        let mut filter = MibaeFilter::with_library(self.palette_set()?, self.tone_library()?)
            .tones(self.tones.as_slice())?
            .metric(metric)
            .dither(dither)
            .intensity(self.filter.intensity)
            .zoom(self.filter.zoom);
        if let Some((width, height)) = self.container() {
            filter = filter.container(width, height);
        }
        filter.validate()?;

        tracing::debug!(
            %metric,
            %dither,
            intensity = self.filter.intensity,
            zoom = self.filter.zoom,
            tones = self.tones.len(),
            "Built filter"
        );
        Ok(filter)
    }
}
