//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Pool and health monitor produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, gauges via the metrics facade)
//! ```
//!
//! # Design Decisions
//! - Delegate transitions are logged once, on the edge, not per request
//! - Metrics are cheap (atomic increments) and exporter-agnostic

pub mod logging;
pub mod metrics;
