//! Generic polling coordinator
//!
//! A [`Coordinator`] owns one [`Refresh`] implementation and the snapshot it
//! last produced. Every refresh moves it through
//! `Idle -> Refreshing -> {Published, Failed}`:
//!
//! - Until the first refresh succeeds there is no snapshot at all, and
//!   [`Coordinator::first_refresh`] hands the failure to whoever started it.
//! - Once a snapshot exists a failed refresh never replaces it. The old data
//!   stays readable and is flagged stale until a later refresh succeeds.
//!
//! Timer ticks and forced refreshes are serialized, so whichever runs last
//! determines the published snapshot.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tokio::sync::{Mutex, Notify};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::error::{CoordinatorError, Result};

/// Shortest polling interval; shorter ones, including zero, are raised to it
pub const MIN_INTERVAL: Duration = Duration::from_millis(10);

/// One tick's worth of backend reads
#[async_trait]
pub trait Refresh: Send + Sync + 'static {
    type Output: Send + Sync + 'static;

    /// Name used in logs and errors
    fn name(&self) -> &str;

    async fn refresh(&self) -> Result<Self::Output>;
}

/// Where the coordinator is in its refresh cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Refreshing,
    Published,
    Failed,
}

/// Latest published data plus its staleness
#[derive(Debug)]
pub struct CoordinatorSnapshot<T> {
    pub data: Arc<T>,
    /// Set when refreshes after `updated_at` have failed
    pub stale: bool,
    pub last_error: Option<CoordinatorError>,
    pub updated_at: DateTime<Utc>,
}

impl<T> Clone for CoordinatorSnapshot<T> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
            stale: self.stale,
            last_error: self.last_error.clone(),
            updated_at: self.updated_at,
        }
    }
}

struct State<T> {
    phase: Phase,
    published: Option<(Arc<T>, DateTime<Utc>)>,
    last_error: Option<CoordinatorError>,
}

/// Restores the previous phase if a refresh is dropped before it completes
struct RefreshingGuard<'a, T> {
    state: &'a RwLock<State<T>>,
    previous: Phase,
}

impl<'a, T> RefreshingGuard<'a, T> {
    fn enter(state: &'a RwLock<State<T>>) -> Self {
        let previous = std::mem::replace(&mut state.write().phase, Phase::Refreshing);
        Self { state, previous }
    }
}

impl<T> Drop for RefreshingGuard<'_, T> {
    fn drop(&mut self) {
        let mut state = self.state.write();
        if state.phase == Phase::Refreshing {
            state.phase = self.previous;
        }
    }
}

impl<T> State<T> {
    fn snapshot(&self) -> Option<CoordinatorSnapshot<T>> {
        let (data, updated_at) = self.published.as_ref()?;
        Some(CoordinatorSnapshot {
            data: Arc::clone(data),
            stale: self.last_error.is_some(),
            last_error: self.last_error.clone(),
            updated_at: *updated_at,
        })
    }
}

pub struct Coordinator<R: Refresh> {
    refresher: R,
    interval: Duration,
    state: RwLock<State<R::Output>>,
    refresh_lock: Mutex<()>,
}

impl<R: Refresh> Coordinator<R> {
    pub fn new(refresher: R, interval: Duration) -> Self {
        Self {
            refresher,
            interval: interval.max(MIN_INTERVAL),
            state: RwLock::new(State {
                phase: Phase::Idle,
                published: None,
                last_error: None,
            }),
            refresh_lock: Mutex::new(()),
        }
    }

    pub fn name(&self) -> &str {
        self.refresher.name()
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn refresher(&self) -> &R {
        &self.refresher
    }

    pub fn phase(&self) -> Phase {
        self.state.read().phase
    }

    pub fn is_initialized(&self) -> bool {
        self.state.read().published.is_some()
    }

    /// Latest published snapshot, `None` before the first successful refresh
    pub fn snapshot(&self) -> Option<CoordinatorSnapshot<R::Output>> {
        self.state.read().snapshot()
    }

    /// Initial refresh the host waits on before using the coordinator.
    ///
    /// A failure here is reported as [`CoordinatorError::NotInitialized`] and
    /// nothing is published.
    pub async fn first_refresh(&self) -> Result<CoordinatorSnapshot<R::Output>> {
        match self.refresh().await {
            Ok(snapshot) => Ok(snapshot),
            Err(source) if !self.is_initialized() => Err(CoordinatorError::NotInitialized {
                name: self.name().to_string(),
                source: Box::new(source),
            }),
            Err(e) => Err(e),
        }
    }

    /// Run one refresh now and publish the result.
    ///
    /// On failure the previous snapshot is kept and marked stale; the error is
    /// returned to the caller as well.
    pub async fn refresh(&self) -> Result<CoordinatorSnapshot<R::Output>> {
        let _serialized = self.refresh_lock.lock().await;
        let _refreshing = RefreshingGuard::enter(&self.state);
        debug!(coordinator = self.name(), "Refreshing");

        let outcome = self.refresher.refresh().await;

        let mut state = self.state.write();
        match outcome {
            Ok(data) => {
                let data = Arc::new(data);
                let updated_at = Utc::now();
                state.published = Some((Arc::clone(&data), updated_at));
                state.last_error = None;
                state.phase = Phase::Published;
                info!(coordinator = self.name(), %updated_at, "Snapshot published");
                Ok(CoordinatorSnapshot {
                    data,
                    stale: false,
                    last_error: None,
                    updated_at,
                })
            }
            Err(e) => {
                state.phase = Phase::Failed;
                state.last_error = Some(e.clone());
                if state.published.is_some() {
                    warn!(coordinator = self.name(), error = %e, "Refresh failed, snapshot is stale");
                } else {
                    warn!(coordinator = self.name(), error = %e, "Refresh failed before first snapshot");
                }
                Err(e)
            }
        }
    }

    /// Refresh after a command has been sent, once the backend had `settle`
    /// to apply it
    pub async fn refresh_after(&self, settle: Duration) -> Result<CoordinatorSnapshot<R::Output>> {
        tokio::time::sleep(settle).await;
        self.refresh().await
    }

    /// Blocking first refresh, then periodic polling
    pub async fn start(self: &Arc<Self>) -> Result<PollHandle> {
        self.first_refresh().await?;
        Ok(self.spawn())
    }

    /// Poll every interval on a background task. The first tick fires one
    /// interval from now.
    pub fn spawn(self: &Arc<Self>) -> PollHandle {
        let coordinator = Arc::clone(self);
        let force = Arc::new(Notify::new());
        let forced = Arc::clone(&force);
        let interval = self.interval;

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {}
                    _ = forced.notified() => {
                        debug!(coordinator = coordinator.name(), "Forced refresh");
                        ticker.reset();
                    }
                }
                // failures are kept in the coordinator state
                let _ = coordinator.refresh().await;
            }
        });

        debug!(
            coordinator = self.name(),
            interval_secs = interval.as_secs(),
            "Polling started"
        );
        PollHandle { force, task }
    }
}

/// Handle to a polling task; polling stops when this is dropped
#[derive(Debug)]
pub struct PollHandle {
    force: Arc<Notify>,
    task: JoinHandle<()>,
}

impl PollHandle {
    /// Ask the task to refresh now instead of waiting for the next tick
    pub fn force_refresh(&self) {
        self.force.notify_one();
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    pub fn stop(self) {}
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
