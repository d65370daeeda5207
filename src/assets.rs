//! Configuration loading with an embedded fallback
//!
//! - If no config path is given: use the embedded `mibae.yaml` (no filesystem access)
//! - If a path is given and the file exists: use the file
//! - If a path is given and the file is missing: fall back to the embedded default

use rust_embed::RustEmbed;
use std::borrow::Cow;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Name of the default config inside the embedded assets.
pub const CONFIG_NAME: &str = "mibae.yaml";

/// Embedded default config
#[derive(RustEmbed)]
#[folder = "assets/"]
#[include = "mibae.yaml"]
struct EmbeddedConfig;

/// Where a config was read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Embedded,
}

/// Report of init (extraction) operations
#[derive(Debug, Default)]
pub struct InitReport {
    pub written: Vec<String>,
    pub skipped: Vec<String>,
}

/// Config loader with optional filesystem override
pub struct AssetLoader {
    /// External config file path (from --config or MIBAE_CONFIG)
    config_file: Option<PathBuf>,
}

impl AssetLoader {
    /// Create a new asset loader
    ///
    /// `config_file` should be `Some` only if the user named a file.
    pub fn new(config_file: Option<PathBuf>) -> Self {
        Self { config_file }
    }

    /// Which config [`read_config`](Self::read_config) will use.
    pub fn config_source(&self) -> ConfigSource {
        match self.config_file {
            Some(ref path) if path.exists() => ConfigSource::File(path.clone()),
            _ => ConfigSource::Embedded,
        }
    }

    /// Read the config file
    ///
    /// If an external path is configured and exists, uses that.
    /// Otherwise falls back to the embedded config.
    pub fn read_config(&self) -> io::Result<Cow<'static, [u8]>> {
        if let Some(ref path) = self.config_file {
            if path.exists() {
                tracing::trace!(path = %path.display(), "Loading config from filesystem");
                return Ok(Cow::Owned(fs::read(path)?));
            }
            tracing::warn!(path = %path.display(), "Config file not found, using embedded default");
        }

        Self::embedded_config()
    }

    /// Read config as a UTF-8 string
    pub fn read_config_string(&self) -> io::Result<String> {
        let bytes = self.read_config()?;
        String::from_utf8(bytes.into_owned())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// The embedded default config
    pub fn embedded_config() -> io::Result<Cow<'static, [u8]>> {
        EmbeddedConfig::get(CONFIG_NAME)
            .map(|f| {
                tracing::trace!("Loading config from embedded assets");
                f.data
            })
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("Embedded {CONFIG_NAME} not found"),
                )
            })
    }

    /// Write the embedded config to `path` (init command)
    ///
    /// Existing files are skipped unless `force` is set.
    pub fn init(path: &Path, force: bool) -> io::Result<InitReport> {
        let mut report = InitReport::default();

        if !force && path.exists() {
            report.skipped.push(path.display().to_string());
            return Ok(report);
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let data = Self::embedded_config()?;
        fs::write(path, &*data)?;
        report.written.push(path.display().to_string());

        Ok(report)
    }

    /// List embedded assets (for display)
    pub fn list_embedded() -> Vec<String> {
        EmbeddedConfig::iter().map(|s| s.to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_config_present() {
        assert_eq!(AssetLoader::list_embedded(), vec![CONFIG_NAME.to_string()]);
        let text = AssetLoader::new(None).read_config_string().unwrap();
        assert!(text.contains("palettes:"));
        assert_eq!(AssetLoader::new(None).config_source(), ConfigSource::Embedded);
    }

    #[test]
    fn test_missing_file_falls_back() {
        let loader = AssetLoader::new(Some(PathBuf::from("/nonexistent/mibae.yaml")));
        assert_eq!(loader.config_source(), ConfigSource::Embedded);
        assert!(loader.read_config().is_ok());
    }
}
