//! Client-side delegate pool with round-robin selection, failure isolation,
//! and background health recovery.

pub mod client;
pub mod config;
pub mod health;
pub mod lifecycle;
pub mod observability;
pub mod pool;

pub use client::{Client, ClientError, TcpClient};
pub use config::schema::PoolConfig;
pub use health::ProbeSummary;
pub use lifecycle::Shutdown;
pub use pool::{Delegate, DelegatePool, DelegateStatus, PoolError};
