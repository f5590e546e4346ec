use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::{Mutex, RwLock};
use tokio::time::Instant;
use tracing::{debug, warn};

use super::{
    PlayerBackend, PlayerOptions, Region, RegionId, RegionSpec, RegionsExtension, WaveformPlayer,
    ZoomOptions,
};
use crate::services::waveform::{SurfaceId, WaveformError};

/// Bytes per second of 16-bit stereo PCM at 44.1 kHz.
pub const DEFAULT_BLOB_BYTE_RATE: f64 = 176_400.0;

/// Backend producing [`HeadlessPlayer`]s.
///
/// Media lengths come from a catalog of known URLs; blobs are sized by a
/// fixed byte rate. Clones share the catalog and the registry of live
/// players. The registry holds weak references, so a released player is
/// dropped as soon as its session lets go of it.
#[derive(Debug, Clone)]
pub struct HeadlessBackend {
    catalog: Arc<RwLock<HashMap<String, f64>>>,
    blob_byte_rate: f64,
    players: Arc<Mutex<Vec<Weak<HeadlessPlayer>>>>,
}

impl HeadlessBackend {
    /// Create a backend with an empty catalog.
    pub fn new() -> Self {
        Self {
            catalog: Arc::new(RwLock::new(HashMap::new())),
            blob_byte_rate: DEFAULT_BLOB_BYTE_RATE,
            players: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Register a URL and its length in seconds.
    pub fn with_media(self, url: impl Into<String>, duration: f64) -> Self {
        self.register_media(url, duration);
        self
    }

    /// Use `bytes_per_second` to size loaded blobs.
    pub fn with_blob_byte_rate(mut self, bytes_per_second: f64) -> Self {
        if bytes_per_second.is_finite() && bytes_per_second > 0.0 {
            self.blob_byte_rate = bytes_per_second;
        }
        self
    }

    /// Register a URL and its length in seconds.
    pub fn register_media(&self, url: impl Into<String>, duration: f64) {
        self.catalog.write().insert(url.into(), duration.max(0.0));
    }

    /// Players created by this backend that are still alive, oldest first.
    pub fn players(&self) -> Vec<Arc<HeadlessPlayer>> {
        self.players.lock().iter().filter_map(Weak::upgrade).collect()
    }

    /// The most recently created player, if it is still alive.
    pub fn latest_player(&self) -> Option<Arc<HeadlessPlayer>> {
        self.players.lock().last().and_then(Weak::upgrade)
    }
}

impl Default for HeadlessBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerBackend for HeadlessBackend {
    fn create(
        &self,
        surface: &SurfaceId,
        options: &PlayerOptions,
    ) -> Result<Arc<dyn WaveformPlayer>, WaveformError> {
        if surface.as_str().trim().is_empty() {
            return Err(WaveformError::SurfaceUnavailable(surface.clone()));
        }

        let player = Arc::new(HeadlessPlayer {
            surface: surface.clone(),
            options: options.clone(),
            catalog: Arc::clone(&self.catalog),
            blob_byte_rate: self.blob_byte_rate,
            transport: Mutex::new(Transport::default()),
            zoom: Mutex::new(None),
            regions: Mutex::new(None),
        });
        let mut players = self.players.lock();
        players.retain(|p| p.strong_count() > 0);
        players.push(Arc::downgrade(&player));
        drop(players);

        debug!("Created headless player on surface {}", surface);
        Ok(player)
    }
}

/// What a headless player has loaded.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaSource {
    /// Loaded by URL
    Url(String),
    /// Loaded from memory
    Blob {
        /// Blob length in bytes
        len: usize,
    },
}

#[derive(Debug)]
struct Transport {
    source: Option<MediaSource>,
    duration: f64,
    anchor: f64,
    started_at: Option<Instant>,
    rate: f64,
    gain: f64,
}

impl Default for Transport {
    fn default() -> Self {
        Self {
            source: None,
            duration: 0.0,
            anchor: 0.0,
            started_at: None,
            rate: 1.0,
            gain: 1.0,
        }
    }
}

impl Transport {
    fn position(&self, now: Instant) -> f64 {
        match self.started_at {
            Some(started) => {
                let elapsed = now.saturating_duration_since(started).as_secs_f64();
                (self.anchor + elapsed * self.rate).min(self.duration)
            }
            None => self.anchor,
        }
    }

    /// Fold elapsed play time into the anchor so rate or seek changes
    /// start from the right place.
    fn rebase(&mut self, now: Instant) {
        self.anchor = self.position(now);
        if self.started_at.is_some() {
            self.started_at = Some(now);
        }
    }

    fn replace_source(&mut self, source: MediaSource, duration: f64) {
        self.source = Some(source);
        self.duration = duration;
        self.anchor = 0.0;
        self.started_at = None;
    }
}

/// A player that keeps transport state against the tokio clock.
///
/// Nothing is decoded or drawn. Position advances by wall time times the
/// playback rate and stops at the media length.
#[derive(Debug)]
pub struct HeadlessPlayer {
    surface: SurfaceId,
    options: PlayerOptions,
    catalog: Arc<RwLock<HashMap<String, f64>>>,
    blob_byte_rate: f64,
    transport: Mutex<Transport>,
    zoom: Mutex<Option<ZoomOptions>>,
    regions: Mutex<Option<Arc<HeadlessRegions>>>,
}

impl HeadlessPlayer {
    /// Surface the player was created on
    pub fn surface(&self) -> &SurfaceId {
        &self.surface
    }

    /// Options the player was created with
    pub fn options(&self) -> &PlayerOptions {
        &self.options
    }

    /// Zoom settings, once the extension is registered
    pub fn zoom_options(&self) -> Option<ZoomOptions> {
        *self.zoom.lock()
    }

    /// Whether a regions extension is attached
    pub fn has_regions(&self) -> bool {
        self.regions.lock().is_some()
    }

    /// Output gain last applied
    pub fn gain(&self) -> f64 {
        self.transport.lock().gain
    }

    /// Currently loaded source
    pub fn source(&self) -> Option<MediaSource> {
        self.transport.lock().source.clone()
    }
}

impl WaveformPlayer for HeadlessPlayer {
    fn load(&self, url: &str) {
        let duration = self.catalog.read().get(url).copied();
        let duration = duration.unwrap_or_else(|| {
            warn!("Unknown media {}, reporting zero length", url);
            0.0
        });

        self.transport
            .lock()
            .replace_source(MediaSource::Url(url.to_string()), duration);
        debug!("Loaded {} ({:.3}s)", url, duration);
    }

    fn load_blob(&self, data: &[u8]) {
        let duration = data.len() as f64 / self.blob_byte_rate;
        self.transport
            .lock()
            .replace_source(MediaSource::Blob { len: data.len() }, duration);
        debug!("Loaded {} byte blob ({:.3}s)", data.len(), duration);
    }

    fn play(&self) {
        let mut transport = self.transport.lock();
        if transport.duration <= 0.0 {
            debug!("Nothing loaded, ignoring play");
            return;
        }
        let now = Instant::now();
        if transport.position(now) >= transport.duration {
            transport.anchor = 0.0;
            transport.started_at = Some(now);
        } else if transport.started_at.is_none() {
            transport.started_at = Some(now);
        }
    }

    fn pause(&self) {
        let mut transport = self.transport.lock();
        transport.rebase(Instant::now());
        transport.started_at = None;
    }

    fn is_playing(&self) -> bool {
        let transport = self.transport.lock();
        transport.started_at.is_some() && transport.position(Instant::now()) < transport.duration
    }

    fn seek_to(&self, fraction: f64) {
        let mut transport = self.transport.lock();
        let now = Instant::now();
        transport.rebase(now);
        let fraction = if fraction.is_finite() {
            fraction.clamp(0.0, 1.0)
        } else {
            0.0
        };
        transport.anchor = fraction * transport.duration;
    }

    fn current_time(&self) -> f64 {
        self.transport.lock().position(Instant::now())
    }

    fn duration(&self) -> f64 {
        self.transport.lock().duration
    }

    fn playback_rate(&self) -> f64 {
        self.transport.lock().rate
    }

    fn set_playback_rate(&self, rate: f64) {
        let mut transport = self.transport.lock();
        transport.rebase(Instant::now());
        transport.rate = rate;
    }

    fn set_volume(&self, gain: f64) {
        self.transport.lock().gain = gain.clamp(0.0, 1.0);
    }

    fn register_zoom(&self, options: ZoomOptions) {
        *self.zoom.lock() = Some(options);
    }

    fn register_regions(&self) -> Arc<dyn RegionsExtension> {
        let regions = Arc::new(HeadlessRegions::default());
        *self.regions.lock() = Some(Arc::clone(&regions));
        regions
    }
}

/// In-memory region store.
#[derive(Debug, Default)]
pub struct HeadlessRegions {
    next_id: AtomicU64,
    regions: Mutex<Vec<Region>>,
}

impl RegionsExtension for HeadlessRegions {
    fn add_region(&self, spec: RegionSpec) -> Region {
        let id = spec.id.unwrap_or_else(|| {
            let n = self.next_id.fetch_add(1, Ordering::Relaxed);
            RegionId::new(format!("region-{n}"))
        });
        let region = Region {
            id,
            start: spec.start,
            end: spec.end.max(spec.start),
            content: spec.content,
        };

        let mut regions = self.regions.lock();
        regions.retain(|existing| existing.id != region.id);
        regions.push(region.clone());
        regions.sort_by(|a, b| a.start.total_cmp(&b.start));
        region
    }

    fn remove_region(&self, id: &RegionId) -> bool {
        let mut regions = self.regions.lock();
        let before = regions.len();
        regions.retain(|region| &region.id != id);
        regions.len() != before
    }

    fn regions(&self) -> Vec<Region> {
        self.regions.lock().clone()
    }

    fn clear_regions(&self) {
        self.regions.lock().clear();
    }
}
