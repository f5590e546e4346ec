use std::fmt;
use std::ops::Deref;

use serde::Serialize;

use super::math::clamp;

/// Identifier of the UI surface a player renders into.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SurfaceId(String);

impl SurfaceId {
    /// Create a surface id from an element name
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The element name
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifies one player instance within a session.
///
/// A fresh id is handed out on every initialisation, so a stale handle
/// never compares equal to its replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PlayerId(u64);

impl PlayerId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw counter value
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player-{}", self.0)
    }
}

/// Volume as a percentage in `0.0..=100.0`
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct VolumePercent(f64);

impl VolumePercent {
    /// Full volume
    pub const MAX: Self = Self(100.0);

    /// Create a volume, clamping into range
    pub fn new(percent: f64) -> Self {
        Self(clamp(percent, 0.0, 100.0))
    }

    /// Shift by `delta`, a fraction of full scale (`0.1` is ten points)
    pub fn adjusted(self, delta: f64) -> Self {
        if !delta.is_finite() {
            return self;
        }
        Self::new(self.0 + delta * 100.0)
    }

    /// Volume as the `0.0..=1.0` gain a player expects
    pub fn as_gain(&self) -> f64 {
        self.0 / 100.0
    }
}

impl Default for VolumePercent {
    fn default() -> Self {
        Self::MAX
    }
}

impl Deref for VolumePercent {
    type Target = f64;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<f64> for VolumePercent {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

/// Result of a transport operation.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlOutcome {
    /// The player accepted the operation
    Applied,

    /// No player has been initialised; nothing happened
    NotInitialized,

    /// The argument was unusable (non-finite or non-positive rate)
    Rejected,
}

impl ControlOutcome {
    /// Whether the operation reached a player
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Point-in-time view of a session, used for logging and the CLI.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaybackSnapshot {
    /// Id of the published player, if any
    pub player: Option<PlayerId>,
    /// Whether the player is playing
    pub playing: bool,
    /// Playback position in seconds
    pub current_time: f64,
    /// Media length in seconds
    pub duration: f64,
    /// Playback rate
    pub rate: f64,
    /// Volume percentage
    pub volume: VolumePercent,
    /// Number of annotation regions
    pub regions: usize,
}
