use smartlink_core::{Clock, LinkEvents, Repository, StorageError};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};
use typed_builder::TypedBuilder;

pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Shortest interval the sweeper will run at.
const MIN_SWEEP_INTERVAL: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, TypedBuilder)]
pub struct SweeperSettings {
    /// Time between two sweeps. The first sweep runs immediately on start.
    #[builder(default = DEFAULT_SWEEP_INTERVAL)]
    pub interval: Duration,
}

impl Default for SweeperSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Periodically deletes expired records from a repository.
///
/// A failed sweep is logged and the next tick tries again; the loop only ends
/// when its shutdown future resolves.
pub struct ExpirySweeper<R> {
    repository: Arc<R>,
    events: Arc<dyn LinkEvents>,
    clock: Arc<dyn Clock>,
    settings: SweeperSettings,
}

impl<R: Repository> ExpirySweeper<R> {
    pub fn new(
        repository: Arc<R>,
        events: Arc<dyn LinkEvents>,
        clock: Arc<dyn Clock>,
        settings: SweeperSettings,
    ) -> Self {
        Self {
            repository,
            events,
            clock,
            settings,
        }
    }

    /// Runs a single sweep at the clock's current time and returns how many
    /// records were deleted.
    pub async fn sweep_once(&self) -> Result<u64, StorageError> {
        let now = self.clock.now();
        let removed = self.repository.delete_expired(now).await?;

        if removed > 0 {
            self.events.links_expired(removed);
            info!(removed, "cleaned up expired links");
        } else {
            debug!("no expired links to clean up");
        }

        Ok(removed)
    }

    /// Sweeps on every interval tick until `shutdown` resolves.
    pub async fn run_until<F>(self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let interval = self.settings.interval.max(MIN_SWEEP_INTERVAL);
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        info!(interval = ?interval, "expiry sweeper started");

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    info!("expiry sweeper stopped");
                    return;
                }
                _ = ticker.tick() => {
                    if let Err(err) = self.sweep_once().await {
                        warn!(error = %err, "expiry sweep failed; retrying on next tick");
                    }
                }
            }
        }
    }

    /// Spawns the sweeper on the current tokio runtime for the life of the
    /// process. Abort the returned handle to stop it.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run_until(std::future::pending()))
    }
}
