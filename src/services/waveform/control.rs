//! Transport operations on a session.
//!
//! Every operation that needs a player answers `NotInitialized` when none
//! is published. Mutations republish the player container afterwards so
//! derived views re-read; queries never do.

use tracing::{debug, instrument};

use super::math::normalized_seek_fraction;
use super::{ControlOutcome, PlayerHandle, VolumePercent, WaveformSession};

impl WaveformSession {
    /// Run `op` against the published player and republish it.
    fn with_player(&self, op: impl FnOnce(&PlayerHandle)) -> ControlOutcome {
        let Some(handle) = self.state.player.get() else {
            return ControlOutcome::NotInitialized;
        };

        op(&handle);
        self.state.player.notify();
        ControlOutcome::Applied
    }

    /// Replace the media source by URL.
    #[instrument(skip(self))]
    pub fn load(&self, url: &str) -> ControlOutcome {
        self.with_player(|handle| handle.player().load(url))
    }

    /// Replace the media source with an in-memory blob.
    #[instrument(skip(self, data), fields(len = data.len()))]
    pub fn load_from_data(&self, data: &[u8]) -> ControlOutcome {
        self.with_player(|handle| handle.player().load_blob(data))
    }

    /// Start playback.
    pub fn play(&self) -> ControlOutcome {
        self.with_player(|handle| handle.player().play())
    }

    /// Pause playback.
    pub fn pause(&self) -> ControlOutcome {
        self.with_player(|handle| handle.player().pause())
    }

    /// Pause when playing, play otherwise.
    pub fn toggle_play_pause(&self) -> ControlOutcome {
        self.with_player(|handle| {
            let player = handle.player();
            if player.is_playing() {
                player.pause();
            } else {
                player.play();
            }
        })
    }

    /// Seek to an absolute position in seconds.
    ///
    /// The position is clamped to the media; a player with no known length
    /// seeks to the start.
    pub fn seek_to(&self, seconds: f64) -> ControlOutcome {
        self.with_player(|handle| {
            let player = handle.player();
            player.seek_to(normalized_seek_fraction(seconds, player.duration()));
        })
    }

    /// Current playback rate, 1.0 without a player.
    pub fn playback_rate(&self) -> f64 {
        self.state
            .player
            .with(|handle| handle.as_ref().map_or(1.0, |h| h.player().playback_rate()))
    }

    /// Whether the published player is playing.
    pub fn is_playing(&self) -> bool {
        self.state
            .player
            .with(|handle| handle.as_ref().is_some_and(|h| h.player().is_playing()))
    }

    /// Set an absolute playback rate.
    pub fn set_playback_speed(&self, rate: f64) -> ControlOutcome {
        self.change_rate(|_| rate)
    }

    /// Multiply the current playback rate by `multiplier`.
    pub fn adjust_playback_rate(&self, multiplier: f64) -> ControlOutcome {
        self.change_rate(|current| current * multiplier)
    }

    fn change_rate(&self, next: impl FnOnce(f64) -> f64) -> ControlOutcome {
        let Some(handle) = self.state.player.get() else {
            return ControlOutcome::NotInitialized;
        };

        let player = handle.player();
        let rate = next(player.playback_rate());
        if !rate.is_finite() || rate <= 0.0 {
            debug!("Ignoring playback rate {}", rate);
            return ControlOutcome::Rejected;
        }

        let position = player.current_time();
        player.set_playback_rate(rate);
        if self.reseek_after_rate_change {
            // Some players jump after a rate change; pin the position.
            player.seek_to(normalized_seek_fraction(position, player.duration()));
        }

        debug!("Playback rate now {}", rate);
        self.state.player.notify();
        ControlOutcome::Applied
    }

    /// Shift the volume by `delta`, a fraction of full scale.
    ///
    /// The volume container changes even without a player; the player, when
    /// present, receives the new gain. Returns the new volume.
    pub fn adjust_volume(&self, delta: f64) -> VolumePercent {
        let volume = self.state.volume.get().adjusted(delta);
        self.state.volume.set(volume);

        if let Some(handle) = self.state.player.get() {
            handle.player().set_volume(volume.as_gain());
        }

        volume
    }
}
