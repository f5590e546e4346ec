//! Transport scripts for driving a session from the command line.
//!
//! A script is a TOML file: `[[media]]` entries register sources with the
//! headless backend, `[[steps]]` entries are executed in order.
//!
//! ```toml
//! [[media]]
//! url = "take-1.wav"
//! duration = 42.0
//!
//! [[steps]]
//! action = "initialize"
//! surface = "waveform"
//!
//! [[steps]]
//! action = "load"
//! url = "take-1.wav"
//!
//! [[steps]]
//! action = "play"
//!
//! [[steps]]
//! action = "wait"
//! millis = 500
//! ```

use std::{fs, path::Path, sync::Arc, time::Duration};

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::config::PlayerConfig;
use crate::services::waveform::{
    ControlOutcome, HeadlessBackend, PlaybackSnapshot, SurfaceId, WaveformSession,
};
use crate::{Result, WavecontrolError};

/// Largest blob a `load_data` step may allocate.
pub const MAX_BLOB_BYTES: usize = 256 * 1024 * 1024;

/// A source the headless backend should know about.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MediaEntry {
    /// URL passed to `load`
    pub url: String,
    /// Length in seconds
    pub duration: f64,
}

/// One scripted action.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    /// Create and publish a player
    Initialize {
        /// Surface name
        surface: String,
    },
    /// Load by URL
    Load {
        /// Media URL
        url: String,
    },
    /// Load a silent blob of the given size
    LoadData {
        /// Blob length in bytes
        bytes: usize,
    },
    /// Start playback
    Play,
    /// Pause playback
    Pause,
    /// Toggle playback
    Toggle,
    /// Seek to an absolute position
    Seek {
        /// Target in seconds
        seconds: f64,
    },
    /// Set an absolute rate
    Speed {
        /// New rate
        rate: f64,
    },
    /// Multiply the current rate
    Rate {
        /// Rate multiplier
        multiplier: f64,
    },
    /// Shift the volume
    Volume {
        /// Fraction of full scale
        delta: f64,
    },
    /// Let the clock run
    Wait {
        /// Milliseconds to wait
        millis: u64,
    },
    /// Stop the refresher, keep the player
    Teardown,
    /// Release the player
    Dispose,
}

impl Step {
    /// Action name as written in the script.
    pub fn action(&self) -> &'static str {
        match self {
            Step::Initialize { .. } => "initialize",
            Step::Load { .. } => "load",
            Step::LoadData { .. } => "load_data",
            Step::Play => "play",
            Step::Pause => "pause",
            Step::Toggle => "toggle",
            Step::Seek { .. } => "seek",
            Step::Speed { .. } => "speed",
            Step::Rate { .. } => "rate",
            Step::Volume { .. } => "volume",
            Step::Wait { .. } => "wait",
            Step::Teardown => "teardown",
            Step::Dispose => "dispose",
        }
    }

    fn check(&self) -> std::result::Result<(), String> {
        match self {
            Step::LoadData { bytes } if *bytes > MAX_BLOB_BYTES => Err(format!(
                "blob of {bytes} bytes exceeds the limit of {MAX_BLOB_BYTES}"
            )),
            _ => Ok(()),
        }
    }
}

/// A parsed transport script.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Script {
    /// Sources known to the headless backend
    #[serde(default)]
    pub media: Vec<MediaEntry>,
    /// Actions in execution order
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// State after one executed step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepReport {
    /// One-based step number
    pub step: usize,
    /// Action name
    pub action: &'static str,
    /// Transport outcome, for steps that touch the player
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<ControlOutcome>,
    /// Session state after the step
    pub snapshot: PlaybackSnapshot,
}

impl Script {
    /// Parse a script from TOML.
    ///
    /// # Errors
    ///
    /// Returns `WavecontrolError::TomlParseError` for malformed scripts.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| WavecontrolError::toml_parse(e, None))
    }

    /// Read and parse a script file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| WavecontrolError::io_at(e, path))?;
        toml::from_str(&content).map_err(|e| WavecontrolError::toml_parse(e, Some(path)))
    }

    /// Build a headless backend knowing this script's media.
    pub fn backend(&self) -> HeadlessBackend {
        let backend = HeadlessBackend::new();
        for entry in &self.media {
            backend.register_media(entry.url.clone(), entry.duration);
        }
        backend
    }

    /// Run every step against a fresh session and report after each.
    ///
    /// # Errors
    ///
    /// Returns `WavecontrolError::Script` when a player cannot be created.
    #[instrument(skip_all, fields(steps = self.steps.len()))]
    pub async fn run(&self, config: &PlayerConfig) -> Result<Vec<StepReport>> {
        let mut session = WaveformSession::with_config(Arc::new(self.backend()), config);
        let mut reports = Vec::with_capacity(self.steps.len());

        for (index, step) in self.steps.iter().enumerate() {
            let number = index + 1;
            debug!("Step {}: {}", number, step.action());

            let outcome = match step.check() {
                Ok(()) => Self::apply(&mut session, step)
                    .await
                    .map_err(|e| e.to_string()),
                Err(reason) => Err(reason),
            }
            .map_err(|reason| WavecontrolError::Script {
                step: number,
                action: step.action().to_string(),
                reason,
            })?;

            reports.push(StepReport {
                step: number,
                action: step.action(),
                outcome,
                snapshot: session.snapshot(),
            });
        }

        session.dispose();
        Ok(reports)
    }

    async fn apply(session: &mut WaveformSession, step: &Step) -> Result<Option<ControlOutcome>> {
        let outcome = match step {
            Step::Initialize { surface } => {
                session.initialize(SurfaceId::new(surface.as_str()))?;
                None
            }
            Step::Load { url } => Some(session.load(url)),
            Step::LoadData { bytes } => Some(session.load_from_data(&vec![0; *bytes])),
            Step::Play => Some(session.play()),
            Step::Pause => Some(session.pause()),
            Step::Toggle => Some(session.toggle_play_pause()),
            Step::Seek { seconds } => Some(session.seek_to(*seconds)),
            Step::Speed { rate } => Some(session.set_playback_speed(*rate)),
            Step::Rate { multiplier } => Some(session.adjust_playback_rate(*multiplier)),
            Step::Volume { delta } => {
                session.adjust_volume(*delta);
                None
            }
            Step::Wait { millis } => {
                tokio::time::sleep(Duration::from_millis(*millis)).await;
                None
            }
            Step::Teardown => {
                session.teardown();
                None
            }
            Step::Dispose => {
                session.dispose();
                None
            }
        };

        Ok(outcome)
    }
}
