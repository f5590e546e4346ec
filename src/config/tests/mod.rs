//! Unit tests for config module
//!
//! Tests configuration types, defaults, validation and file loading.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]

use std::fs;
use std::time::Duration;

use tempfile::TempDir;

use crate::WavecontrolError;
use crate::config::{Config, LogLevel, PlayerConfig};
use crate::services::waveform::{RefreshMode, RenderBackend};

#[test]
fn defaults_match_stock_player_setup() {
    let config = Config::default();
    let player = &config.player;

    assert_eq!(config.general.log_level, LogLevel::Info);
    assert_eq!(player.theme.wave_color, "#BF74C9");
    assert_eq!(player.theme.progress_color, "purple");
    assert_eq!(player.render_backend, RenderBackend::MediaElement);
    assert_eq!(player.zoom.scale, 0.1);
    assert_eq!(player.zoom.delta_threshold, 5.0);
    assert_eq!(player.zoom.max_zoom, 400.0);
    assert_eq!(player.refresh_mode, RefreshMode::Auto);
    assert_eq!(player.refresh_policy().interval, Duration::from_millis(10));
    assert_eq!(*player.initial_volume(), 100.0);
    assert!(player.reseek_after_rate_change);
}

#[test]
fn config_empty_toml() {
    let config = Config::from_toml_str("").unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn config_partial_toml() {
    let config = Config::from_toml_str(
        r#"
        [general]
        log_level = "debug"

        [player]
        refresh_mode = "poll"
        refresh_interval_ms = 40
        render_backend = "web_audio"

        [player.zoom]
        max_zoom = 800.0
        "#,
    )
    .unwrap();

    assert_eq!(config.general.log_level, LogLevel::Debug);
    assert_eq!(config.player.refresh_mode, RefreshMode::Poll);
    assert_eq!(
        config.player.refresh_policy().interval,
        Duration::from_millis(40)
    );
    assert_eq!(config.player.render_backend, RenderBackend::WebAudio);
    assert_eq!(config.player.zoom.max_zoom, 800.0);
    assert_eq!(config.player.zoom.scale, 0.1);
}

#[test]
fn config_serialize_roundtrip() {
    let original = Config::default();
    let toml_str = original.to_toml_string().unwrap();
    assert!(toml_str.contains("[player]"));

    let parsed = Config::from_toml_str(&toml_str).unwrap();
    assert_eq!(original, parsed);
}

#[test]
fn zero_interval_is_rejected() {
    let err = Config::from_toml_str("[player]\nrefresh_interval_ms = 0").unwrap_err();
    match err {
        WavecontrolError::InvalidConfigField { field, .. } => {
            assert_eq!(field, "refresh_interval_ms")
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn out_of_range_volume_is_rejected() {
    let config = PlayerConfig {
        initial_volume: 140.0,
        ..PlayerConfig::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn non_positive_zoom_is_rejected() {
    let err = Config::from_toml_str("[player.zoom]\nscale = -1.0").unwrap_err();
    assert!(err.to_string().contains("zoom.scale"));
}

#[test]
fn invalid_toml_reports_location() {
    let err = Config::from_toml_str("[player\n").unwrap_err();
    match err {
        WavecontrolError::TomlParseError { location, .. } => assert_eq!(location, "string"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn loads_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[player]\ninitial_volume = 35.0\n").unwrap();

    let config = Config::load_from_path(&path).unwrap();
    assert_eq!(*config.player.initial_volume(), 35.0);
}

#[test]
fn missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let err = Config::load_from_path(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, WavecontrolError::IoError { .. }));
}
