//! Metrics collection.
//!
//! # Responsibilities
//! - Define pool metrics (delegate health, transitions, probes, exhaustion)
//! - Record through the `metrics` facade; the embedding application
//!   installs whichever recorder/exporter it uses
//!
//! # Metrics
//! - `delegate_pool_delegate_healthy` (gauge): 1=good, 0=bad, per delegate
//! - `delegate_pool_transitions_total` (counter): health transitions by target state
//! - `delegate_pool_probes_total` (counter): probe outcomes
//! - `delegate_pool_exhausted_total` (counter): acquires failed with every delegate bad

use std::sync::atomic::{AtomicBool, Ordering};

static ENABLED: AtomicBool = AtomicBool::new(true);

/// Turn metric recording on or off process-wide.
pub fn set_enabled(enabled: bool) {
    ENABLED.store(enabled, Ordering::Relaxed);
}

fn enabled() -> bool {
    ENABLED.load(Ordering::Relaxed)
}

/// Outcome of a single health probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    Recovered,
    /// Probe succeeded but the delegate had already been restored.
    AlreadyRecovered,
    Failed,
    TimedOut,
    Panicked,
}

impl ProbeOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProbeOutcome::Recovered => "recovered",
            ProbeOutcome::AlreadyRecovered => "already_recovered",
            ProbeOutcome::Failed => "failed",
            ProbeOutcome::TimedOut => "timed_out",
            ProbeOutcome::Panicked => "panicked",
        }
    }
}

/// Publish the health series for a newly added (good) delegate.
pub fn record_delegate_added(delegate_id: usize) {
    if !enabled() {
        return;
    }
    ::metrics::gauge!("delegate_pool_delegate_healthy", "delegate" => delegate_id.to_string()).set(1.0);
}

pub fn record_delegate_health(delegate_id: usize, healthy: bool) {
    if !enabled() {
        return;
    }
    ::metrics::gauge!("delegate_pool_delegate_healthy", "delegate" => delegate_id.to_string())
        .set(if healthy { 1.0 } else { 0.0 });
    ::metrics::counter!(
        "delegate_pool_transitions_total",
        "to" => if healthy { "good" } else { "bad" }
    )
    .increment(1);
}

pub fn record_probe(outcome: ProbeOutcome) {
    if !enabled() {
        return;
    }
    ::metrics::counter!("delegate_pool_probes_total", "outcome" => outcome.as_str()).increment(1);
}

pub fn record_exhausted() {
    if !enabled() {
        return;
    }
    ::metrics::counter!("delegate_pool_exhausted_total").increment(1);
}
