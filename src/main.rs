use clap::{Parser, Subcommand};
use serde::Serialize;
use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;
use tokio::time;

use delegate_pool::config::load_config;
use delegate_pool::lifecycle::signals::shutdown_signal;
use delegate_pool::observability::{logging, metrics};
use delegate_pool::{Client, DelegatePool, DelegateStatus, PoolError, TcpClient};

#[derive(Parser)]
#[command(name = "delegate-pool")]
#[command(about = "Round-robin backend pool with background health recovery", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "delegate-pool.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Route probe traffic through the pool until interrupted
    Run {
        /// Milliseconds between dispatched requests
        #[arg(long, default_value_t = 1000)]
        request_interval_ms: u64,
    },
    /// Ping every delegate once and print pool health as JSON
    Status,
}

#[derive(Serialize)]
struct DelegateReport<'a> {
    name: &'a str,
    address: &'a str,
    #[serde(flatten)]
    status: DelegateStatus,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    logging::init_logging(&config.observability);
    metrics::set_enabled(config.observability.metrics_enabled);

    if config.delegates.is_empty() {
        return Err(format!("no delegates configured in {}", cli.config.display()).into());
    }

    let pool = DelegatePool::new(config.health_check.clone());
    pool.add_delegates(config.delegates.iter().map(TcpClient::from_config));

    match cli.command {
        Commands::Run { request_interval_ms } => {
            run(&pool, Duration::from_millis(request_interval_ms.max(1))).await?
        }
        Commands::Status => status(&pool).await?,
    }

    Ok(())
}

async fn run(pool: &DelegatePool<TcpClient>, request_interval: Duration) -> Result<(), Box<dyn Error>> {
    pool.start()?;
    tracing::info!(delegates = pool.len(), "delegate-pool running");

    let mut ticker = time::interval(request_interval);
    let signal = shutdown_signal();
    tokio::pin!(signal);

    loop {
        tokio::select! {
            _ = &mut signal => break,
            _ = ticker.tick() => dispatch(pool).await,
        }
    }

    pool.stop_and_wait().await;
    tracing::info!("Shutdown complete");
    Ok(())
}

/// Send one request: a ping stands in for a real backend operation.
async fn dispatch(pool: &DelegatePool<TcpClient>) {
    match pool.acquire() {
        Ok(delegate) => {
            let client = delegate.client();
            match client.ping().await {
                Ok(()) => tracing::debug!(delegate = delegate.id(), name = client.name(), "Request served"),
                Err(e) => {
                    pool.report_failure(&delegate, e);
                }
            }
        }
        Err(PoolError::NoDelegatesAvailable(all)) => {
            for d in &all {
                let cause = d.last_error().map(|e| e.to_string()).unwrap_or_default();
                tracing::warn!(delegate = d.id(), name = d.client().name(), cause = %cause, "Delegate down");
            }
        }
        Err(e) => tracing::error!(error = %e, "Acquire failed"),
    }
}

async fn status(pool: &DelegatePool<TcpClient>) -> Result<(), Box<dyn Error>> {
    let delegates = pool.list_all();
    for delegate in &delegates {
        if let Err(e) = delegate.client().ping().await {
            pool.report_failure(delegate, e);
        }
    }

    let report: Vec<_> = delegates
        .iter()
        .map(|d| DelegateReport {
            name: d.client().name(),
            address: d.client().address(),
            status: d.status(),
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
