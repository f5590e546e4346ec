//! Seam between the session and the waveform player library.
//!
//! The session never draws, decodes or tracks regions itself. It talks to a
//! [`WaveformPlayer`] built by a [`PlayerBackend`], and everything a UI sees
//! is read back through that trait.

/// In-memory player without audio output
pub mod headless;

use std::fmt::{self, Debug};
use std::sync::Arc;

use futures::stream::BoxStream;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{SurfaceId, WaveformError};

/// How the player produces sound.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RenderBackend {
    /// Native media element decoding; widest format support.
    #[default]
    MediaElement,

    /// Decode into memory and play through an audio graph.
    WebAudio,
}

/// Colours of the drawn waveform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Theme {
    /// Colour of the unplayed part of the waveform
    pub wave_color: String,

    /// Colour of the played part of the waveform
    pub progress_color: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            wave_color: String::from("#BF74C9"),
            progress_color: String::from("purple"),
        }
    }
}

/// Everything a backend needs to construct a player.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerOptions {
    /// Waveform colours
    pub theme: Theme,

    /// Playback backend selection
    pub render_backend: RenderBackend,
}

/// Zoom-by-scroll extension settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ZoomOptions {
    /// Magnification per wheel notch (0.1 is 10%)
    pub scale: f64,

    /// Wheel delta in pixels before zooming starts
    pub delta_threshold: f64,

    /// Upper bound on pixels-per-second while zooming
    pub max_zoom: f64,
}

impl Default for ZoomOptions {
    fn default() -> Self {
        Self {
            scale: 0.1,
            delta_threshold: 5.0,
            max_zoom: 400.0,
        }
    }
}

/// Identifier of an annotation region.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RegionId(String);

impl RegionId {
    /// Wrap an id string
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Request to create a region.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegionSpec {
    /// Explicit id; the extension picks one when absent
    pub id: Option<RegionId>,
    /// Start in seconds
    pub start: f64,
    /// End in seconds; equal to `start` for a marker
    pub end: f64,
    /// Optional label shown on the region
    pub content: Option<String>,
}

/// An annotation region as reported by the extension.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Region {
    /// Region id
    pub id: RegionId,
    /// Start in seconds
    pub start: f64,
    /// End in seconds
    pub end: f64,
    /// Optional label
    pub content: Option<String>,
}

/// Region annotation extension attached to a player.
pub trait RegionsExtension: Send + Sync + Debug {
    /// Add a region and return it as stored.
    fn add_region(&self, spec: RegionSpec) -> Region;

    /// Remove a region; `false` when no region had that id.
    fn remove_region(&self, id: &RegionId) -> bool;

    /// All regions, ordered by start.
    fn regions(&self) -> Vec<Region>;

    /// Remove every region.
    fn clear_regions(&self);
}

/// A stateful waveform player.
///
/// Calls are synchronous and fast; loading is fire-and-forget and its
/// outcome shows up only through later reads.
pub trait WaveformPlayer: Send + Sync + Debug {
    /// Replace the media source by URL.
    fn load(&self, url: &str);

    /// Replace the media source with an in-memory blob.
    fn load_blob(&self, data: &[u8]);

    /// Start or resume playback.
    fn play(&self);

    /// Pause playback.
    fn pause(&self);

    /// Whether playback is running.
    fn is_playing(&self) -> bool;

    /// Seek to a fraction of the media length, `0.0..1.0`.
    fn seek_to(&self, fraction: f64);

    /// Playback position in seconds.
    fn current_time(&self) -> f64;

    /// Media length in seconds; 0 while nothing is loaded.
    fn duration(&self) -> f64;

    /// Current playback rate.
    fn playback_rate(&self) -> f64;

    /// Set the playback rate.
    fn set_playback_rate(&self, rate: f64);

    /// Set output gain, `0.0..=1.0`.
    fn set_volume(&self, gain: f64);

    /// Attach the zoom-by-scroll extension.
    fn register_zoom(&self, options: ZoomOptions);

    /// Attach the region annotation extension.
    fn register_regions(&self) -> Arc<dyn RegionsExtension>;

    /// Native time-update events carrying the position in seconds.
    ///
    /// Players without such events return `None` and are polled instead.
    fn time_updates(&self) -> Option<BoxStream<'static, f64>> {
        None
    }
}

/// Builds players bound to UI surfaces.
pub trait PlayerBackend: Send + Sync {
    /// Create a player rendering into `surface`.
    ///
    /// # Errors
    ///
    /// Returns `WaveformError::SurfaceUnavailable` when the surface cannot
    /// host a player, or `WaveformError::CreationFailed` for other failures.
    fn create(
        &self,
        surface: &SurfaceId,
        options: &PlayerOptions,
    ) -> Result<Arc<dyn WaveformPlayer>, WaveformError>;
}
