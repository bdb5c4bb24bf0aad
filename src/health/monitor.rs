//! Background health recovery.
//!
//! # Responsibilities
//! - Periodically probe delegates that are marked bad
//! - Restore delegates whose probe succeeds
//!
//! Only bad delegates are probed; good ones are left to passive failure
//! reports from callers.

use futures_util::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::client::Client;
use crate::config::HealthCheckConfig;
use crate::lifecycle::Shutdown;
use crate::observability::metrics::{self, ProbeOutcome};
use crate::pool::delegate::Delegate;
use crate::pool::round_robin::Roster;

/// Result of one probe pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProbeSummary {
    /// Bad delegates probed during the pass.
    pub probed: usize,
    /// Delegates this pass restored to service.
    pub recovered: usize,
    /// Delegates left bad after their probe failed.
    pub still_bad: usize,
}

pub(crate) struct HealthMonitor<C> {
    roster: Arc<Roster<C>>,
    config: HealthCheckConfig,
}

impl<C: Client> HealthMonitor<C> {
    pub(crate) fn new(roster: Arc<Roster<C>>, config: HealthCheckConfig) -> Self {
        Self { roster, config }
    }

    /// Run probe passes every interval until `shutdown` fires.
    ///
    /// The first pass happens one interval after start. A pass in progress
    /// always completes; no pass starts once shutdown has been observed.
    pub(crate) async fn run(self, shutdown: Shutdown) {
        let interval = self.config.interval();
        let mut stop = shutdown.subscribe();

        tracing::info!(
            interval_secs = self.config.interval_secs,
            timeout_secs = self.config.timeout_secs,
            "Health monitor starting"
        );

        let mut ticker = time::interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        while !shutdown.is_triggered() {
            tokio::select! {
                biased;
                _ = stop.recv() => break,
                _ = ticker.tick() => {
                    probe_pass(&self.roster, self.config.timeout()).await;
                }
            }
        }

        tracing::info!("Health monitor stopped");
    }
}

/// Probe every delegate that is currently bad.
///
/// Iterates a snapshot of the roster; the roster lock is not held while
/// probing.
pub(crate) async fn probe_pass<C: Client>(roster: &Roster<C>, timeout: Duration) -> ProbeSummary {
    let delegates = roster.snapshot();
    let mut summary = ProbeSummary::default();

    for delegate in delegates.iter().filter(|d| d.is_bad()) {
        summary.probed += 1;
        match probe(delegate, timeout).await {
            ProbeOutcome::Recovered => summary.recovered += 1,
            ProbeOutcome::AlreadyRecovered => {}
            ProbeOutcome::Failed | ProbeOutcome::TimedOut | ProbeOutcome::Panicked => {
                summary.still_bad += 1
            }
        }
    }

    if summary.probed > 0 {
        tracing::debug!(
            probed = summary.probed,
            recovered = summary.recovered,
            still_bad = summary.still_bad,
            "Probe pass complete"
        );
    }
    summary
}

async fn probe<C: Client>(delegate: &Delegate<C>, timeout: Duration) -> ProbeOutcome {
    let id = delegate.id();
    let ping = AssertUnwindSafe(delegate.client().ping()).catch_unwind();

    // Any failure leaves the delegate bad with its original cause.
    let outcome = match time::timeout(timeout, ping).await {
        Ok(Ok(Ok(()))) => {
            if delegate.mark_good() {
                tracing::info!(delegate = id, "Delegate recovered");
                metrics::record_delegate_health(id, true);
                ProbeOutcome::Recovered
            } else {
                ProbeOutcome::AlreadyRecovered
            }
        }
        Ok(Ok(Err(e))) if e.is_transport() => {
            tracing::debug!(delegate = id, error = %e, "Probe failed, delegate still bad");
            ProbeOutcome::Failed
        }
        Ok(Ok(Err(e))) => {
            tracing::warn!(delegate = id, error = %e, "Probe failed with unexpected error, delegate still bad");
            ProbeOutcome::Failed
        }
        Ok(Err(_)) => {
            tracing::error!(delegate = id, "Probe panicked, delegate still bad");
            ProbeOutcome::Panicked
        }
        Err(_) => {
            tracing::debug!(delegate = id, timeout = ?timeout, "Probe timed out, delegate still bad");
            ProbeOutcome::TimedOut
        }
    };

    metrics::record_probe(outcome);
    outcome
}
