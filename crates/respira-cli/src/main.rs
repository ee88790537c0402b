//! Respira+ session binary.
//!
//! Reads newline-delimited JSON commands on stdin and writes one JSON
//! result per line on stdout. Logs go to stderr.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `RESPIRA_CONFIG` or `respira-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Build the starting catalogs and the engagement store
//! 4. Create the calculation client
//! 5. Watch snapshots for debug logging
//! 6. Serve stdin until EOF

mod error;
mod session;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use respira_calculator::CalculatorClient;
use respira_engagement::{EngagementConfig, EngagementStore, starting_catalogs};

use crate::session::Session;

/// Environment variable naming the configuration file.
const CONFIG_PATH_ENV: &str = "RESPIRA_CONFIG";

/// Configuration file used when `RESPIRA_CONFIG` is unset.
const DEFAULT_CONFIG_PATH: &str = "respira-config.yaml";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = load_config()?;
    init_logging(&config);

    info!(
        initial_balance = %config.store.initial_balance,
        calculator = %config.calculator.base_url,
        "respira starting"
    );

    let catalogs = Arc::new(starting_catalogs().context("built-in catalog is inconsistent")?);
    info!(
        missions = catalogs.missions.len(),
        items = catalogs.items.len(),
        "Catalogs loaded"
    );

    let store = Arc::new(
        EngagementStore::new(&config.store, catalogs).context("failed to open engagement store")?,
    );
    let calculator =
        CalculatorClient::new(&config.calculator).context("failed to build calculator client")?;

    let mut snapshots = store.subscribe();
    tokio::spawn(async move {
        while snapshots.changed().await.is_ok() {
            let snapshot = Arc::clone(&snapshots.borrow_and_update());
            debug!(
                revision = snapshot.revision,
                balance = %snapshot.balance,
                "Snapshot published"
            );
        }
    });

    let session = Session::new(Arc::clone(&store), calculator);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        if line.trim().is_empty() {
            continue;
        }
        let record = session.handle_line(&line).await;
        let mut out = serde_json::to_vec(&record).context("failed to encode result")?;
        out.push(b'\n');
        stdout.write_all(&out).await.context("failed to write stdout")?;
        stdout.flush().await.context("failed to flush stdout")?;
    }

    let final_snapshot = store.snapshot();
    info!(
        revision = final_snapshot.revision,
        balance = %final_snapshot.balance,
        "respira stopped"
    );
    Ok(())
}

/// Load configuration, falling back to defaults when the default file is
/// absent, then apply environment overrides. An explicit `RESPIRA_CONFIG`
/// path must exist.
fn load_config() -> anyhow::Result<EngagementConfig> {
    let config = if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
        let path = PathBuf::from(path);
        EngagementConfig::from_file(&path)
            .with_context(|| format!("failed to load config from {}", path.display()))?
    } else {
        let path = PathBuf::from(DEFAULT_CONFIG_PATH);
        if path.exists() {
            EngagementConfig::from_file(&path)
                .with_context(|| format!("failed to load config from {}", path.display()))?
        } else {
            EngagementConfig::default()
        }
    };
    config
        .with_env_overrides()
        .context("invalid configuration after environment overrides")
}

fn init_logging(config: &EngagementConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    if config.logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}
