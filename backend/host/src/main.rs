//! Launchpad pool host entry point.
//!
//! Restores the engine from SQLite, then reads newline-delimited JSON
//! commands from stdin and answers each with one JSON line on stdout.

use pool_host::commands::{Request, Response};
use pool_host::config::Config;
use pool_host::errors::HostError;
use pool_host::{db, host::Host};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialise structured logging (RUST_LOG controls verbosity).
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    // Load optional .env file (ignored if missing).
    let _ = dotenvy::dotenv();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!("{e}"))?;
    let params = config.engine_params()?;

    let pool = db::init_pool(&config.database_url).await?;
    info!(
        events = db::count_events(&pool).await?,
        "Event log opened at {}", config.database_url
    );

    let host = Host::open(pool, params, config.bridge_fees.clone()).await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let result = match serde_json::from_str::<Request>(line) {
            Ok(request) => {
                let op = request.command.name();
                let mutating = request.command.is_mutating();
                let result = host.execute(request).await;
                match &result {
                    Ok(_) => info!(op, mutating, "Command completed"),
                    Err(e @ (HostError::Engine(_) | HostError::FeeEstimate(_))) => {
                        warn!(op, code = e.code(), "Command rejected: {e}")
                    }
                    Err(e) => error!(op, "Command failed: {e}"),
                }
                result
            }
            Err(e) => {
                warn!("Malformed command: {e}");
                Err(HostError::Json(e))
            }
        };

        let mut out = serde_json::to_string(&Response::from(result))?;
        out.push('\n');
        stdout.write_all(out.as_bytes()).await?;
        stdout.flush().await?;
    }

    info!("Input closed; shutting down");
    Ok(())
}
