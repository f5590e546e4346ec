use crate::services::common::{DerivedProperty, Property};

use super::{AnnotationHandle, PlaybackSnapshot, PlayerHandle, VolumePercent};

/// Observable containers a UI binds to.
///
/// Player and annotation values are only ever replaced whole, so a watcher
/// never sees a player paired with another player's annotations mid-update.
#[derive(Clone, Debug)]
pub struct ObservableState {
    /// Published player, `None` before initialisation and after dispose
    pub player: Property<Option<PlayerHandle>>,
    /// Region extension of the published player
    pub annotations: Property<Option<AnnotationHandle>>,
    /// Volume percentage, kept across re-initialisation
    pub volume: Property<VolumePercent>,
    /// Playback position in seconds, 0 without a player
    pub current_time: DerivedProperty<Option<PlayerHandle>, f64>,
    /// Media length in seconds, 0 without a player
    pub duration: DerivedProperty<Option<PlayerHandle>, f64>,
}

impl ObservableState {
    /// Create empty state with the given starting volume.
    pub fn new(volume: VolumePercent) -> Self {
        let player: Property<Option<PlayerHandle>> = Property::new(None);

        let current_time = DerivedProperty::new(player.clone(), |handle: &Option<PlayerHandle>| {
            handle
                .as_ref()
                .map_or(0.0, |handle| handle.player().current_time())
        });
        let duration = DerivedProperty::new(player.clone(), |handle: &Option<PlayerHandle>| {
            handle
                .as_ref()
                .map_or(0.0, |handle| handle.player().duration())
        });

        Self {
            player,
            annotations: Property::new(None),
            volume: Property::new(volume),
            current_time,
            duration,
        }
    }

    /// Whether the annotation container belongs to the published player.
    pub fn annotations_current(&self) -> bool {
        match (self.player.get(), self.annotations.get()) {
            (Some(player), Some(annotations)) => annotations.belongs_to(&player),
            _ => false,
        }
    }

    /// Read everything at once. Never notifies.
    pub fn snapshot(&self) -> PlaybackSnapshot {
        let player = self.player.get();
        let regions = self
            .annotations
            .with(|annotations| annotations.as_ref().map_or(0, |a| a.regions().regions().len()));

        PlaybackSnapshot {
            player: player.as_ref().map(|handle| handle.id),
            playing: player
                .as_ref()
                .is_some_and(|handle| handle.player().is_playing()),
            current_time: self.current_time.get(),
            duration: self.duration.get(),
            rate: player
                .as_ref()
                .map_or(1.0, |handle| handle.player().playback_rate()),
            volume: self.volume.get(),
            regions,
        }
    }
}

impl Default for ObservableState {
    fn default() -> Self {
        Self::new(VolumePercent::default())
    }
}
