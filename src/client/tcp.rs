//! TCP reachability client.

use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time;

use crate::client::{Client, ClientError};
use crate::config::DelegateConfig;

/// Client that considers a backend alive when it accepts a TCP connection.
#[derive(Debug, Clone)]
pub struct TcpClient {
    name: String,
    address: String,
    connect_timeout: Duration,
}

impl TcpClient {
    pub fn new(name: impl Into<String>, address: impl Into<String>, connect_timeout: Duration) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            connect_timeout,
        }
    }

    pub fn from_config(config: &DelegateConfig) -> Self {
        Self::new(
            config.name.clone(),
            config.address.clone(),
            Duration::from_millis(config.connect_timeout_ms),
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address(&self) -> &str {
        &self.address
    }
}

impl Client for TcpClient {
    async fn ping(&self) -> Result<(), ClientError> {
        match time::timeout(self.connect_timeout, TcpStream::connect(self.address.as_str())).await {
            Ok(Ok(_stream)) => Ok(()),
            Ok(Err(e)) => Err(ClientError::Transport(e)),
            Err(_) => Err(ClientError::Timeout(self.connect_timeout)),
        }
    }
}
