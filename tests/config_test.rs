//! Tests for configuration loading and the init command.

mod common;

use common::fixtures;
use mibae::assets::{AssetLoader, ConfigSource};
use mibae::error::AppError;
use mibae::models::AppConfig;
use mibae_filter::Rgb;
use pretty_assertions::assert_eq;

#[test]
fn test_external_config_is_used() {
    let dir = tempfile::tempdir().unwrap();
    let path = fixtures::write_config(dir.path(), "bw.yaml", fixtures::BLACK_WHITE_YAML);
    let loader = AssetLoader::new(Some(path.clone()));

    assert_eq!(loader.config_source(), ConfigSource::File(path));
    let config = AppConfig::load_from_assets(&loader).unwrap();
    assert_eq!(config.tones, vec!["blank".to_string()]);
    assert_eq!(config.filter.zoom, 1);
    // Keys the file leaves out keep their defaults.
    assert_eq!(config.filter.dither, "floyd-steinberg");

    let filter = config.build_filter().unwrap();
    let image = filter.apply(&fixtures::gray(16, 16, 128)).unwrap();
    common::assert_only_colors(image.buffer(), &[Rgb::WHITE, Rgb::BLACK]);
}

#[test]
fn test_missing_config_falls_back_to_embedded() {
    let dir = tempfile::tempdir().unwrap();
    let loader = AssetLoader::new(Some(dir.path().join("absent.yaml")));

    assert_eq!(loader.config_source(), ConfigSource::Embedded);
    let config = AppConfig::load_from_assets(&loader).unwrap();
    assert_eq!(config, AppConfig::default());
}

#[test]
fn test_init_writes_default_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("mibae.yaml");

    let report = AssetLoader::init(&path, false).unwrap();
    assert_eq!(report.written.len(), 1);
    assert!(report.skipped.is_empty());

    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(AppConfig::from_yaml(&written).unwrap(), AppConfig::default());

    std::fs::write(&path, "filter:\n  zoom: 5\n").unwrap();
    let report = AssetLoader::init(&path, false).unwrap();
    assert_eq!(report.skipped.len(), 1);
    assert!(std::fs::read_to_string(&path).unwrap().contains("zoom: 5"));

    let report = AssetLoader::init(&path, true).unwrap();
    assert_eq!(report.written.len(), 1);
    assert!(!std::fs::read_to_string(&path).unwrap().contains("zoom: 5"));
}

#[test]
fn test_malformed_yaml_is_an_error() {
    let result = AppConfig::from_yaml("filter:\n  zoom: many\n");
    assert!(matches!(result, Err(AppError::ConfigParse(_))));
}

#[test]
fn test_unknown_metric_is_an_error() {
    let mut config = AppConfig::default();
    config.filter.metric = "manhattan".to_string();
    let err = config.build_filter().unwrap_err();
    assert!(
        err.to_string().contains("metric"),
        "Unexpected error: {err}"
    );
}
