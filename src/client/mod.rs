//! Backend client capability.
//!
//! # Responsibilities
//! - Define the narrow `Client` contract the pool depends on
//! - Classify client failures recorded against delegates
//!
//! # Design Decisions
//! - The pool only ever calls `ping`; request operations are issued by the
//!   caller directly on the client it borrowed from a delegate
//! - Errors are cheap to share: delegates keep them behind an `Arc`

pub mod tcp;

use std::future::Future;
use std::time::Duration;
use thiserror::Error;

pub use tcp::TcpClient;

/// Errors produced by a backend client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection-level failure talking to the backend.
    #[error("transport error: {0}")]
    Transport(#[from] std::io::Error),

    /// The backend did not answer in time.
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// Any failure the transport layer does not classify.
    #[error("{0}")]
    Other(String),
}

impl ClientError {
    /// Whether this error is a known transport-level failure.
    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Transport(_) | ClientError::Timeout(_))
    }
}

/// A connection to one backend server.
pub trait Client: Send + Sync + 'static {
    /// Lightweight liveness probe.
    fn ping(&self) -> impl Future<Output = Result<(), ClientError>> + Send;
}
