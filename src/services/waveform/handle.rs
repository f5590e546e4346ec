use std::sync::Arc;

use super::backend::{RegionsExtension, WaveformPlayer};
use super::{PlayerId, SurfaceId};

/// Exclusive handle to one player instance bound to one surface.
///
/// Cloning shares the same player. Two handles are equal only when they
/// come from the same initialisation.
#[derive(Clone, Debug)]
pub struct PlayerHandle {
    /// Unique id of this player within its session
    pub id: PlayerId,
    /// Surface the player renders into
    pub surface: SurfaceId,
    player: Arc<dyn WaveformPlayer>,
}

impl PartialEq for PlayerHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && Arc::ptr_eq(&self.player, &other.player)
    }
}

impl PlayerHandle {
    pub(crate) fn new(id: PlayerId, surface: SurfaceId, player: Arc<dyn WaveformPlayer>) -> Self {
        Self {
            id,
            surface,
            player,
        }
    }

    /// The wrapped player.
    pub fn player(&self) -> &dyn WaveformPlayer {
        self.player.as_ref()
    }
}

/// Handle to the region extension of one player.
#[derive(Clone, Debug)]
pub struct AnnotationHandle {
    /// Player the extension is attached to
    pub player_id: PlayerId,
    regions: Arc<dyn RegionsExtension>,
}

impl PartialEq for AnnotationHandle {
    fn eq(&self, other: &Self) -> bool {
        self.player_id == other.player_id && Arc::ptr_eq(&self.regions, &other.regions)
    }
}

impl AnnotationHandle {
    pub(crate) fn new(player_id: PlayerId, regions: Arc<dyn RegionsExtension>) -> Self {
        Self { player_id, regions }
    }

    /// The region extension.
    pub fn regions(&self) -> &dyn RegionsExtension {
        self.regions.as_ref()
    }

    /// Whether this handle belongs to `player`.
    pub fn belongs_to(&self, player: &PlayerHandle) -> bool {
        self.player_id == player.id
    }
}
