//! Delegate abstraction.
//!
//! # Responsibilities
//! - Own a single backend client
//! - Track health state (Good/Bad) together with the failure that caused it
//!
//! # Design Decisions
//! - Health is one immutable value swapped with compare-and-swap, so the
//!   bad flag and its cause can never be observed out of step
//! - Only the first failure after a good→bad edge is recorded

use arc_swap::ArcSwap;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use crate::client::ClientError;

/// Health of a delegate.
#[derive(Debug)]
pub enum HealthState {
    Good,
    Bad {
        /// The failure that moved the delegate out of rotation.
        cause: Arc<ClientError>,
        since: Instant,
    },
}

impl HealthState {
    pub fn is_bad(&self) -> bool {
        matches!(self, HealthState::Bad { .. })
    }
}

/// A single backend in the pool.
pub struct Delegate<C> {
    id: usize,
    client: C,
    state: ArcSwap<HealthState>,
}

impl<C> Delegate<C> {
    pub(crate) fn new(id: usize, client: C) -> Self {
        Self {
            id,
            client,
            state: ArcSwap::from_pointee(HealthState::Good),
        }
    }

    /// Position of this delegate in its pool.
    pub fn id(&self) -> usize {
        self.id
    }

    /// The wrapped client, for issuing operations against this backend.
    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn is_bad(&self) -> bool {
        self.state.load().is_bad()
    }

    /// Current health state.
    pub fn health(&self) -> Arc<HealthState> {
        self.state.load_full()
    }

    /// The failure recorded when this delegate went bad, if it is bad.
    pub fn last_error(&self) -> Option<Arc<ClientError>> {
        match &**self.state.load() {
            HealthState::Bad { cause, .. } => Some(cause.clone()),
            HealthState::Good => None,
        }
    }

    /// Transition good→bad, recording `cause`.
    ///
    /// Returns false without touching the stored cause if already bad.
    pub(crate) fn mark_bad(&self, cause: ClientError) -> bool {
        let next = Arc::new(HealthState::Bad {
            cause: Arc::new(cause),
            since: Instant::now(),
        });
        self.transition(|current| !current.is_bad(), next)
    }

    /// Transition bad→good, clearing the stored cause.
    pub(crate) fn mark_good(&self) -> bool {
        self.transition(HealthState::is_bad, Arc::new(HealthState::Good))
    }

    fn transition(&self, allowed: impl Fn(&HealthState) -> bool, next: Arc<HealthState>) -> bool {
        let mut current = self.state.load();
        loop {
            if !allowed(&**current) {
                return false;
            }
            let prev = self.state.compare_and_swap(&*current, next.clone());
            if Arc::ptr_eq(&*prev, &*current) {
                return true;
            }
            current = prev;
        }
    }

    /// Serializable snapshot for diagnostics.
    pub fn status(&self) -> DelegateStatus {
        match &**self.state.load() {
            HealthState::Good => DelegateStatus {
                id: self.id,
                healthy: true,
                last_error: None,
                bad_for_ms: None,
            },
            HealthState::Bad { cause, since } => DelegateStatus {
                id: self.id,
                healthy: false,
                last_error: Some(cause.to_string()),
                bad_for_ms: Some(since.elapsed().as_millis() as u64),
            },
        }
    }
}

impl<C> fmt::Debug for Delegate<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Delegate")
            .field("id", &self.id)
            .field("state", &self.state.load_full())
            .finish()
    }
}

/// Point-in-time view of a delegate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DelegateStatus {
    pub id: usize,
    pub healthy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bad_for_ms: Option<u64>,
}
