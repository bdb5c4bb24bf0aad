//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! Passive (pool.report_failure):
//!     Caller observes operation failure
//!     → delegate good → bad, cause recorded
//!
//! Active (monitor.rs):
//!     Periodic timer
//!     → ping each bad delegate
//!     → success: bad → good, cause cleared
//!     → failure: stays bad, original cause kept
//! ```
//!
//! # Design Decisions
//! - A single failure report takes a delegate out of rotation
//! - A single successful probe puts it back
//! - Probe passes never overlap

pub mod monitor;

pub use monitor::ProbeSummary;
