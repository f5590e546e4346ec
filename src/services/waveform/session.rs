use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::runtime::Handle;
use tracing::{debug, info, instrument};

use crate::config::PlayerConfig;

use super::backend::{PlayerBackend, PlayerOptions, ZoomOptions};
use super::refresher::{PollingRefresher, RefreshPolicy};
use super::{
    AnnotationHandle, ObservableState, PlaybackSnapshot, PlayerHandle, PlayerId, SurfaceId,
    WaveformError,
};

/// Owns one player slot, its observable state and its refresher.
///
/// Each session is independent; several can live in one process. All
/// transport operations (see the `control` module) take `&self`, while
/// lifecycle changes take `&mut self`.
pub struct WaveformSession {
    backend: Arc<dyn PlayerBackend>,
    options: PlayerOptions,
    zoom: ZoomOptions,
    refresh: RefreshPolicy,
    pub(crate) reseek_after_rate_change: bool,
    pub(crate) state: ObservableState,
    refresher: Option<PollingRefresher>,
    refresh_ticks: Arc<AtomicU64>,
    next_player_id: u64,
}

impl WaveformSession {
    /// Create a session with default settings.
    pub fn new(backend: Arc<dyn PlayerBackend>) -> Self {
        Self::with_config(backend, &PlayerConfig::default())
    }

    /// Create a session configured by `config`.
    pub fn with_config(backend: Arc<dyn PlayerBackend>, config: &PlayerConfig) -> Self {
        Self {
            backend,
            options: config.player_options(),
            zoom: config.zoom,
            refresh: config.refresh_policy(),
            reseek_after_rate_change: config.reseek_after_rate_change,
            state: ObservableState::new(config.initial_volume()),
            refresher: None,
            refresh_ticks: Arc::new(AtomicU64::new(0)),
            next_player_id: 0,
        }
    }

    /// Observable containers for UI binding.
    pub fn state(&self) -> &ObservableState {
        &self.state
    }

    /// Current values of every container. Never notifies.
    pub fn snapshot(&self) -> PlaybackSnapshot {
        self.state.snapshot()
    }

    /// Whether a player is published.
    pub fn is_initialized(&self) -> bool {
        self.state.player.with(Option::is_some)
    }

    /// The active refresher, if one is running.
    pub fn refresher(&self) -> Option<&PollingRefresher> {
        self.refresher.as_ref()
    }

    /// Republishes made by every refresher this session has run.
    pub fn refresh_ticks(&self) -> u64 {
        self.refresh_ticks.load(Ordering::Relaxed)
    }

    /// Create a player on `surface` and publish it.
    ///
    /// Any previous player is replaced and its refresher aborted. The stored
    /// volume is applied to the new player. On error nothing changes.
    ///
    /// # Errors
    ///
    /// Returns `WaveformError::RuntimeUnavailable` outside a tokio runtime,
    /// or whatever the backend reports for the surface.
    #[instrument(skip(self, surface), fields(surface = %surface))]
    pub fn initialize(&mut self, surface: SurfaceId) -> Result<PlayerId, WaveformError> {
        let runtime = Handle::try_current().map_err(|_| WaveformError::RuntimeUnavailable)?;

        let player = self.backend.create(&surface, &self.options)?;
        player.register_zoom(self.zoom);
        let regions = player.register_regions();
        player.set_volume(self.state.volume.get().as_gain());

        self.next_player_id += 1;
        let id = PlayerId::new(self.next_player_id);
        let handle = PlayerHandle::new(id, surface, player);

        self.stop_refresher();
        self.state.player.replace(Some(handle));
        self.state
            .annotations
            .replace(Some(AnnotationHandle::new(id, regions)));

        self.refresher = Some(PollingRefresher::start(
            &runtime,
            self.state.player.clone(),
            self.refresh,
            Arc::clone(&self.refresh_ticks),
        ));

        info!("Initialized {}", id);
        Ok(id)
    }

    /// Stop the refresher, leaving the player published.
    #[instrument(skip(self))]
    pub fn teardown(&mut self) {
        self.stop_refresher();
    }

    /// Stop the refresher and release the player.
    ///
    /// Derived views read 0 afterwards. The volume is kept.
    #[instrument(skip(self))]
    pub fn dispose(&mut self) {
        self.stop_refresher();
        self.state.annotations.replace(None);
        if let Some(handle) = self.state.player.get() {
            debug!("Releasing {}", handle.id);
        }
        self.state.player.replace(None);
    }

    fn stop_refresher(&mut self) {
        if let Some(refresher) = self.refresher.take() {
            refresher.stop();
            debug!("Stopped refresher after {} ticks", refresher.ticks());
        }
    }
}

impl std::fmt::Debug for WaveformSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WaveformSession")
            .field("options", &self.options)
            .field("zoom", &self.zoom)
            .field("refresh", &self.refresh)
            .field("state", &self.state)
            .field("refresher", &self.refresher)
            .finish()
    }
}
