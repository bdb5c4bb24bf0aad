//! Round-robin selection over the delegate list.

use std::ops::Range;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::pool::delegate::Delegate;
use crate::pool::error::{PoolError, PoolResult};

/// Ordered delegates plus the shared selection cursor.
/// One lock guards both; it is never held across I/O.
pub(crate) struct Roster<C> {
    inner: Mutex<Rotation<C>>,
}

struct Rotation<C> {
    delegates: Vec<Arc<Delegate<C>>>,
    cursor: usize,
}

impl<C> Roster<C> {
    pub(crate) fn new() -> Self {
        Self {
            inner: Mutex::new(Rotation {
                delegates: Vec::new(),
                cursor: 0,
            }),
        }
    }

    // The guarded state is a vector and an index; both stay valid across a
    // panicking holder, so poisoning is ignored.
    fn lock(&self) -> MutexGuard<'_, Rotation<C>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append a good delegate per client, in order. Returns the new ids.
    pub(crate) fn extend(&self, clients: impl IntoIterator<Item = C>) -> Range<usize> {
        let mut rotation = self.lock();
        let before = rotation.delegates.len();
        for client in clients {
            let id = rotation.delegates.len();
            rotation.delegates.push(Arc::new(Delegate::new(id, client)));
        }
        before..rotation.delegates.len()
    }

    /// Next delegate that is not bad, starting at the cursor.
    ///
    /// The cursor moves one slot per candidate examined, so the following
    /// call resumes where this one stopped.
    pub(crate) fn next(&self) -> PoolResult<Arc<Delegate<C>>, C> {
        let mut rotation = self.lock();
        let len = rotation.delegates.len();
        if len == 0 {
            return Err(PoolError::Empty);
        }

        for _ in 0..len {
            let index = rotation.cursor % len;
            rotation.cursor = (index + 1) % len;
            let candidate = &rotation.delegates[index];
            if !candidate.is_bad() {
                return Ok(candidate.clone());
            }
        }

        Err(PoolError::NoDelegatesAvailable(rotation.delegates.clone()))
    }

    pub(crate) fn snapshot(&self) -> Vec<Arc<Delegate<C>>> {
        self.lock().delegates.clone()
    }

    pub(crate) fn len(&self) -> usize {
        self.lock().delegates.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ClientError;

    fn roster(n: usize) -> Roster<usize> {
        let roster = Roster::new();
        roster.extend(0..n);
        roster
    }

    fn next_id(roster: &Roster<usize>) -> usize {
        *roster.next().unwrap().client()
    }

    #[test]
    fn test_round_robin() {
        let roster = roster(3);
        let picks: Vec<_> = (0..6).map(|_| next_id(&roster)).collect();
        assert_eq!(picks, vec![0, 1, 2, 0, 1, 2]);
    }

    #[test]
    fn test_skips_bad_and_resumes_after_it() {
        let roster = roster(3);
        roster.snapshot()[1].mark_bad(ClientError::Other("down".into()));

        let picks: Vec<_> = (0..4).map(|_| next_id(&roster)).collect();
        assert_eq!(picks, vec![0, 2, 0, 2]);

        // Cursor now rests on the recovered slot.
        roster.snapshot()[1].mark_good();
        assert_eq!(next_id(&roster), 1);
    }

    #[test]
    fn test_empty() {
        let roster: Roster<usize> = Roster::new();
        assert!(matches!(roster.next(), Err(PoolError::Empty)));
    }

    #[test]
    fn test_all_bad() {
        let roster = roster(2);
        for d in roster.snapshot() {
            d.mark_bad(ClientError::Other("down".into()));
        }

        match roster.next() {
            Err(PoolError::NoDelegatesAvailable(all)) => {
                let ids: Vec<_> = all.iter().map(|d| d.id()).collect();
                assert_eq!(ids, vec![0, 1]);
            }
            other => panic!("expected NoDelegatesAvailable, got {:?}", other),
        }
    }

    #[test]
    fn test_extend_keeps_order_and_ids() {
        let roster = roster(2);
        assert_eq!(roster.extend(vec![10, 11]), 2..4);

        let all = roster.snapshot();
        assert_eq!(roster.len(), 4);
        assert_eq!(all.iter().map(|d| d.id()).collect::<Vec<_>>(), vec![0, 1, 2, 3]);
        assert_eq!(*all[2].client(), 10);
    }
}
