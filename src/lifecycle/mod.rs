//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Shutdown (shutdown.rs):
//!     pool.stop() / process exit → broadcast → health monitor leaves its loop
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → binary stops traffic, stops the pool, exits
//! ```
//!
//! # Design Decisions
//! - Shutdown is cooperative: in-flight work finishes first
//! - No forced aborts of background tasks

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
