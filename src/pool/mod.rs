//! Delegate pool.
//!
//! # Data Flow
//! ```text
//! caller → pool.acquire()
//!     → round_robin.rs (next delegate not marked bad)
//!     → Arc<Delegate> loaned to caller
//! caller → delegate.client() → backend operation
//!     → on failure: pool.report_failure(delegate, cause)
//!     → delegate.rs (good → bad, cause recorded)
//! health monitor (every interval)
//!     → ping bad delegates → bad → good on success
//! ```
//!
//! # Design Decisions
//! - The pool lock covers only the delegate list and cursor, never I/O
//! - Delegate health changes without the pool lock (compare-and-swap)
//! - Delegates are never removed; bad ones are skipped
//! - Each pool owns its own cursor and monitor; pools are independent

pub mod delegate;
pub mod error;
pub(crate) mod round_robin;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::client::{Client, ClientError};
use crate::config::HealthCheckConfig;
use crate::health::monitor::{probe_pass, HealthMonitor, ProbeSummary};
use crate::lifecycle::Shutdown;
use crate::observability::metrics;

pub use delegate::{Delegate, DelegateStatus, HealthState};
pub use error::{PoolError, PoolResult};

use round_robin::Roster;

struct MonitorHandle {
    shutdown: Shutdown,
    task: JoinHandle<()>,
}

/// Round-robin pool of backend delegates with background recovery.
pub struct DelegatePool<C> {
    roster: Arc<Roster<C>>,
    config: HealthCheckConfig,
    monitor: Mutex<Option<MonitorHandle>>,
}

impl<C: Client> DelegatePool<C> {
    /// Create an empty pool.
    pub fn new(config: HealthCheckConfig) -> Self {
        Self {
            roster: Arc::new(Roster::new()),
            config,
            monitor: Mutex::new(None),
        }
    }

    /// Wrap each client in a new good delegate, appended in order.
    ///
    /// Adding the same backend twice yields two delegates.
    pub fn add_delegates(&self, clients: impl IntoIterator<Item = C>) {
        let ids = self.roster.extend(clients);
        if ids.is_empty() {
            tracing::debug!("add_delegates called with no clients");
            return;
        }
        tracing::info!(added = ids.len(), total = ids.end, "Delegates added");
        for id in ids {
            metrics::record_delegate_added(id);
        }
    }

    /// Select the next delegate not marked bad, in round-robin order.
    pub fn acquire(&self) -> PoolResult<Arc<Delegate<C>>, C> {
        self.roster.next().map_err(|e| {
            if let PoolError::NoDelegatesAvailable(all) = &e {
                tracing::warn!(delegates = all.len(), "No delegates available, all are marked bad");
                metrics::record_exhausted();
            }
            e
        })
    }

    /// Take a delegate out of rotation after an operation on it failed.
    ///
    /// Returns true if this report moved the delegate from good to bad.
    /// Reports against a delegate that is already bad are dropped and the
    /// cause recorded first is kept.
    pub fn report_failure(&self, delegate: &Delegate<C>, cause: ClientError) -> bool {
        let id = delegate.id();
        let error = cause.to_string();

        if delegate.mark_bad(cause) {
            tracing::warn!(delegate = id, error = %error, "Delegate marked bad");
            metrics::record_delegate_health(id, false);
            true
        } else {
            tracing::debug!(delegate = id, error = %error, "Delegate already bad, failure dropped");
            false
        }
    }

    /// All delegates, good and bad, in pool order.
    pub fn list_all(&self) -> Vec<Arc<Delegate<C>>> {
        self.roster.snapshot()
    }

    /// Serializable health snapshot of every delegate.
    pub fn status(&self) -> Vec<DelegateStatus> {
        self.roster.snapshot().iter().map(|d| d.status()).collect()
    }

    pub fn len(&self) -> usize {
        self.roster.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn config(&self) -> &HealthCheckConfig {
        &self.config
    }

    /// Probe all bad delegates now, outside the monitor schedule.
    pub async fn check_health(&self) -> ProbeSummary {
        probe_pass(&self.roster, self.config.timeout()).await
    }

    /// Start the background health monitor on the current tokio runtime.
    pub fn start(&self) -> PoolResult<(), C> {
        let mut monitor = self.lock_monitor();
        if monitor.as_ref().is_some_and(|m| !m.task.is_finished()) {
            return Err(PoolError::AlreadyRunning);
        }

        if !self.config.enabled {
            tracing::info!("Health checks disabled, bad delegates will not be recovered");
            return Ok(());
        }

        let runtime = Handle::try_current().map_err(|_| PoolError::NoRuntime)?;
        let shutdown = Shutdown::new();
        let task = runtime.spawn(
            HealthMonitor::new(self.roster.clone(), self.config.clone()).run(shutdown.clone()),
        );

        *monitor = Some(MonitorHandle { shutdown, task });
        Ok(())
    }

    /// Stop the background health monitor.
    ///
    /// A probe pass already in progress is allowed to finish; no new pass
    /// starts. The monitor counts as running, and `start()` is refused,
    /// until that pass has finished. Returns false if no monitor was
    /// running or it was already stopped.
    pub fn stop(&self) -> bool {
        match self.lock_monitor().as_ref() {
            Some(handle) if !handle.shutdown.is_triggered() => {
                handle.shutdown.trigger();
                true
            }
            _ => false,
        }
    }

    /// Stop the monitor and wait for its task to exit.
    pub async fn stop_and_wait(&self) {
        let handle = self.lock_monitor().take();
        if let Some(MonitorHandle { shutdown, task }) = handle {
            shutdown.trigger();
            if let Err(e) = task.await {
                tracing::error!(error = %e, "Health monitor task failed");
            }
        }
    }

    /// Whether a monitor task is alive, including one that has been
    /// stopped but is still finishing its last pass.
    pub fn is_running(&self) -> bool {
        self.lock_monitor().as_ref().is_some_and(|m| !m.task.is_finished())
    }
}

impl<C> DelegatePool<C> {
    fn lock_monitor(&self) -> MutexGuard<'_, Option<MonitorHandle>> {
        self.monitor.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<C: Client> Default for DelegatePool<C> {
    fn default() -> Self {
        Self::new(HealthCheckConfig::default())
    }
}

impl<C> Drop for DelegatePool<C> {
    fn drop(&mut self) {
        let monitor = self.monitor.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = monitor.take() {
            handle.shutdown.trigger();
        }
    }
}
