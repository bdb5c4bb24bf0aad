//! Shared utilities for integration testing.

use std::sync::atomic::{AtomicU64, AtomicU8, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use delegate_pool::config::HealthCheckConfig;
use delegate_pool::{Client, ClientError, DelegatePool};

/// How a mock backend answers a ping.
#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Fault {
    Up = 0,
    Refused = 1,
    Garbled = 2,
    Panic = 3,
}

impl Fault {
    fn from_u8(v: u8) -> Self {
        match v {
            0 => Fault::Up,
            1 => Fault::Refused,
            2 => Fault::Garbled,
            _ => Fault::Panic,
        }
    }
}

#[derive(Debug)]
struct MockState {
    fault: AtomicU8,
    delay_ms: AtomicU64,
    pings: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

/// A programmable backend. Clones share state, so a test can keep one
/// clone and flip the backend up or down after handing the other to a pool.
#[derive(Debug, Clone)]
pub struct MockClient {
    pub name: &'static str,
    state: Arc<MockState>,
}

impl MockClient {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            state: Arc::new(MockState {
                fault: AtomicU8::new(Fault::Up as u8),
                delay_ms: AtomicU64::new(0),
                pings: AtomicUsize::new(0),
                in_flight: AtomicUsize::new(0),
                max_in_flight: AtomicUsize::new(0),
            }),
        }
    }

    pub fn set_up(&self, up: bool) {
        self.set_fault(if up { Fault::Up } else { Fault::Refused });
    }

    pub fn set_fault(&self, fault: Fault) {
        self.state.fault.store(fault as u8, Ordering::SeqCst);
    }

    /// Make every ping take `delay` before answering.
    #[allow(dead_code)]
    pub fn set_delay(&self, delay: Duration) {
        self.state.delay_ms.store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    #[allow(dead_code)]
    pub fn pings(&self) -> usize {
        self.state.pings.load(Ordering::SeqCst)
    }

    /// Most pings ever outstanding at once against this backend.
    #[allow(dead_code)]
    pub fn max_concurrent_pings(&self) -> usize {
        self.state.max_in_flight.load(Ordering::SeqCst)
    }
}

impl Client for MockClient {
    async fn ping(&self) -> Result<(), ClientError> {
        let state = &self.state;
        state.pings.fetch_add(1, Ordering::SeqCst);
        let now = state.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        state.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let delay = state.delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        state.in_flight.fetch_sub(1, Ordering::SeqCst);

        match Fault::from_u8(state.fault.load(Ordering::SeqCst)) {
            Fault::Up => Ok(()),
            Fault::Refused => Err(std::io::Error::from(std::io::ErrorKind::ConnectionRefused).into()),
            Fault::Garbled => Err(ClientError::Other("garbled reply".into())),
            Fault::Panic => panic!("{} blew up mid-ping", self.name),
        }
    }
}

/// A transport failure as a caller would report it.
pub fn refused() -> ClientError {
    std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused").into()
}

/// Build a pool over the named mock backends, returning clones for control.
#[allow(dead_code)]
pub fn pool_of(names: &[&'static str], config: HealthCheckConfig) -> (DelegatePool<MockClient>, Vec<MockClient>) {
    let clients: Vec<_> = names.iter().map(|&n| MockClient::new(n)).collect();
    let pool = DelegatePool::new(config);
    pool.add_delegates(clients.clone());
    (pool, clients)
}
