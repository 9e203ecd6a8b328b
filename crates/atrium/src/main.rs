//! Runs the user directory demo.
//!
//! Configuration is read from `$ATRIUM_CONFIG` or `./atrium.toml` when
//! present, then overridden by `ATRIUM__<SECTION>__<KEY>` environment
//! variables (a `.env` file is honored).

use std::sync::Arc;

use anyhow::Context;
use atrium::config::{AtriumConfig, ConfigLoader};
use atrium::server::{Server, ServerSettings};
use atrium::{demo, telemetry};

const CONFIG_ENV: &str = "ATRIUM_CONFIG";
const DEFAULT_CONFIG_FILE: &str = "atrium.toml";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = load_config()?;

    telemetry::init_logging(&config.logging.to_log_config())
        .context("failed to initialize logging")?;
    telemetry::metrics::describe_metrics();

    let store = demo::store(&config.store).context("failed to load record store")?;
    tracing::info!(records = store.len(), "record store ready");

    let app = demo::app(&config, Arc::new(store)).context("failed to assemble application")?;
    let settings = ServerSettings::from(&config.server);

    Server::new(app, settings).run().await?;
    Ok(())
}

fn load_config() -> anyhow::Result<AtriumConfig> {
    let loader = ConfigLoader::new().with_dotenv()?;
    let loader = match std::env::var_os(CONFIG_ENV) {
        Some(path) => loader
            .with_file(&path)
            .with_context(|| format!("failed to read {}", path.to_string_lossy()))?,
        None => loader.with_optional_file(DEFAULT_CONFIG_FILE)?,
    };

    Ok(loader.with_env_prefix("ATRIUM").load()?)
}
