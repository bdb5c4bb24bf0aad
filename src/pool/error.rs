//! Pool error definitions.

use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use crate::pool::delegate::Delegate;

/// Errors returned by [`DelegatePool`](crate::pool::DelegatePool) operations.
#[derive(Error)]
pub enum PoolError<C> {
    /// Every delegate is currently marked bad.
    ///
    /// Carries all handles so the caller can report each one's last error.
    #[error("no delegates available: all {} delegates are marked bad", .0.len())]
    NoDelegatesAvailable(Vec<Arc<Delegate<C>>>),

    /// The pool has no delegates at all.
    #[error("delegate pool is empty")]
    Empty,

    /// A health monitor is already running for this pool.
    #[error("health monitor already running")]
    AlreadyRunning,

    /// The health monitor needs a tokio runtime to run on.
    #[error("health monitor requires a tokio runtime")]
    NoRuntime,
}

impl<C> PoolError<C> {
    /// Handles attached to a `NoDelegatesAvailable` error.
    pub fn delegates(&self) -> &[Arc<Delegate<C>>] {
        match self {
            PoolError::NoDelegatesAvailable(delegates) => delegates,
            _ => &[],
        }
    }
}

impl<C> fmt::Debug for PoolError<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoolError::NoDelegatesAvailable(delegates) => {
                f.debug_tuple("NoDelegatesAvailable").field(delegates).finish()
            }
            PoolError::Empty => f.write_str("Empty"),
            PoolError::AlreadyRunning => f.write_str("AlreadyRunning"),
            PoolError::NoRuntime => f.write_str("NoRuntime"),
        }
    }
}

/// Result type for pool operations.
pub type PoolResult<T, C> = Result<T, PoolError<C>>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ClientError;

    #[test]
    fn test_error_display() {
        let a = Arc::new(Delegate::new(0, ()));
        let b = Arc::new(Delegate::new(1, ()));
        a.mark_bad(ClientError::Other("down".into()));
        b.mark_bad(ClientError::Other("down".into()));

        let err = PoolError::NoDelegatesAvailable(vec![a, b]);
        assert_eq!(err.to_string(), "no delegates available: all 2 delegates are marked bad");
        assert_eq!(err.delegates().len(), 2);

        let err: PoolError<()> = PoolError::Empty;
        assert_eq!(err.to_string(), "delegate pool is empty");
        assert!(err.delegates().is_empty());
    }
}
