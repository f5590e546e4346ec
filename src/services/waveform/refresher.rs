use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use futures::StreamExt;
use futures::stream::BoxStream;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, trace, warn};

use crate::services::common::Property;

use super::PlayerHandle;

/// How time-dependent views learn that the player clock moved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum RefreshMode {
    /// Use native time-update events when the player has them, poll otherwise.
    #[default]
    Auto,

    /// Require native events; poll with a warning when the player has none.
    Push,

    /// Always poll.
    Poll,
}

/// Refresh settings resolved from configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RefreshPolicy {
    /// Source selection
    pub mode: RefreshMode,
    /// Polling period
    pub interval: Duration,
}

impl Default for RefreshPolicy {
    fn default() -> Self {
        Self {
            mode: RefreshMode::Auto,
            interval: Duration::from_millis(10),
        }
    }
}

/// Keeps derived time views fresh by republishing the player container.
///
/// The player clock advances without telling the container, so something
/// has to nudge watchers. One task per refresher; dropping or stopping the
/// refresher aborts it. Republishes are counted on a counter shared with
/// the owning session.
#[derive(Debug)]
pub struct PollingRefresher {
    task: JoinHandle<()>,
    ticks: Arc<AtomicU64>,
    pushed: bool,
}

impl PollingRefresher {
    /// Start refreshing `player` on the given runtime.
    pub(crate) fn start(
        runtime: &Handle,
        player: Property<Option<PlayerHandle>>,
        policy: RefreshPolicy,
        ticks: Arc<AtomicU64>,
    ) -> Self {
        let events = Self::native_events(&player, policy.mode);
        let pushed = events.is_some();

        let counter = Arc::clone(&ticks);
        let interval = policy.interval.max(Duration::from_millis(1));
        let task = match events {
            Some(events) => {
                debug!("Refreshing from native time updates");
                runtime.spawn(Self::run_push(player, events, interval, counter))
            }
            None => {
                debug!("Refreshing by polling every {:?}", interval);
                runtime.spawn(Self::run_poll(player, interval, counter))
            }
        };

        Self {
            task,
            ticks,
            pushed,
        }
    }

    fn native_events(
        player: &Property<Option<PlayerHandle>>,
        mode: RefreshMode,
    ) -> Option<BoxStream<'static, f64>> {
        if mode == RefreshMode::Poll {
            return None;
        }

        let events = player.with(|handle| handle.as_ref().and_then(|h| h.player().time_updates()));
        if events.is_none() && mode == RefreshMode::Push {
            warn!("Player has no native time updates, falling back to polling");
        }
        events
    }

    async fn run_poll(
        player: Property<Option<PlayerHandle>>,
        interval: Duration,
        ticks: Arc<AtomicU64>,
    ) {
        let mut timer = time::interval_at(time::Instant::now() + interval, interval);
        timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            timer.tick().await;
            Self::republish(&player, &ticks);
        }
    }

    async fn run_push(
        player: Property<Option<PlayerHandle>>,
        mut events: BoxStream<'static, f64>,
        interval: Duration,
        ticks: Arc<AtomicU64>,
    ) {
        while let Some(position) = events.next().await {
            trace!("Native time update at {:.3}s", position);
            Self::republish(&player, &ticks);
        }

        warn!(
            "Native time updates ended, polling every {:?} instead",
            interval
        );
        Self::run_poll(player, interval, ticks).await;
    }

    fn republish(player: &Property<Option<PlayerHandle>>, ticks: &AtomicU64) {
        if player.with(Option::is_some) {
            player.notify();
            let tick = ticks.fetch_add(1, Ordering::Relaxed) + 1;
            trace!("Refresh tick {}", tick);
        }
    }

    /// Republishes counted on the shared counter so far.
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }

    /// Whether the refresher started on native events rather than a timer.
    ///
    /// Stays true after the event stream ends and polling takes over.
    pub fn is_push(&self) -> bool {
        self.pushed
    }

    /// Whether the task is still running.
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Abort the task.
    pub fn stop(&self) {
        self.task.abort();
    }
}

impl Drop for PollingRefresher {
    fn drop(&mut self) {
        self.task.abort();
    }
}
