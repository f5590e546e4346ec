//! Reactive session around a waveform player.
//!
//! A [`WaveformSession`] owns one player slot and publishes it through
//! [`ObservableState`]. Transport operations drive the player and
//! republish; a [`PollingRefresher`] keeps time views current while the
//! player runs on its own clock.

/// Player library seam and the headless implementation
pub mod backend;
mod control;
mod error;
mod handle;
/// Seek and rate arithmetic
pub mod math;
mod refresher;
mod session;
mod state;
mod types;

pub use backend::headless::{HeadlessBackend, HeadlessPlayer};
pub use backend::{
    PlayerBackend, PlayerOptions, Region, RegionId, RegionSpec, RegionsExtension, RenderBackend,
    Theme, WaveformPlayer, ZoomOptions,
};
pub use error::WaveformError;
pub use handle::{AnnotationHandle, PlayerHandle};
pub use refresher::{PollingRefresher, RefreshMode, RefreshPolicy};
pub use session::WaveformSession;
pub use state::ObservableState;
pub use types::{ControlOutcome, PlaybackSnapshot, PlayerId, SurfaceId, VolumePercent};
