use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::services::waveform::{
    PlayerOptions, RefreshMode, RefreshPolicy, RenderBackend, Theme, VolumePercent, ZoomOptions,
};
use crate::{Result, WavecontrolError};

const COMPONENT: &str = "player";

/// Waveform player configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct PlayerConfig {
    /// Playback backend requested from the player library.
    pub render_backend: RenderBackend,

    /// How time views are kept current: `auto`, `push` or `poll`.
    pub refresh_mode: RefreshMode,

    /// Polling period in milliseconds when polling is used.
    pub refresh_interval_ms: u64,

    /// Volume percentage a new session starts with.
    pub initial_volume: f64,

    /// Pin the playback position again after every rate change.
    pub reseek_after_rate_change: bool,

    /// Waveform colours.
    pub theme: Theme,

    /// Zoom-by-scroll extension settings.
    pub zoom: ZoomOptions,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            render_backend: RenderBackend::default(),
            refresh_mode: RefreshMode::default(),
            refresh_interval_ms: 10,
            initial_volume: 100.0,
            reseek_after_rate_change: true,
            theme: Theme::default(),
            zoom: ZoomOptions::default(),
        }
    }
}

impl PlayerConfig {
    /// Options passed to the backend when creating a player.
    pub fn player_options(&self) -> PlayerOptions {
        PlayerOptions {
            theme: self.theme.clone(),
            render_backend: self.render_backend,
        }
    }

    /// Refresh settings for the session.
    pub fn refresh_policy(&self) -> RefreshPolicy {
        RefreshPolicy {
            mode: self.refresh_mode,
            interval: Duration::from_millis(self.refresh_interval_ms.max(1)),
        }
    }

    /// Starting volume, clamped into range.
    pub fn initial_volume(&self) -> VolumePercent {
        VolumePercent::new(self.initial_volume)
    }

    /// Check values the types alone cannot rule out.
    ///
    /// # Errors
    ///
    /// Returns `WavecontrolError::InvalidConfigField` for a zero refresh
    /// interval, a volume outside 0..=100 or non-positive zoom values.
    pub fn validate(&self) -> Result<()> {
        if self.refresh_interval_ms == 0 {
            return Err(WavecontrolError::invalid_field(
                COMPONENT,
                "refresh_interval_ms",
                "must be greater than zero",
            ));
        }

        if !(0.0..=100.0).contains(&self.initial_volume) {
            return Err(WavecontrolError::invalid_field(
                COMPONENT,
                "initial_volume",
                format!("{} is outside 0..=100", self.initial_volume),
            ));
        }

        let zoom = [
            ("zoom.scale", self.zoom.scale),
            ("zoom.delta_threshold", self.zoom.delta_threshold),
            ("zoom.max_zoom", self.zoom.max_zoom),
        ];
        for (field, value) in zoom {
            if !value.is_finite() || value <= 0.0 {
                return Err(WavecontrolError::invalid_field(
                    COMPONENT,
                    field,
                    format!("{value} must be a positive number"),
                ));
            }
        }

        Ok(())
    }
}
