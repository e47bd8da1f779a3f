use anyhow::{anyhow, Context, Result};
use std::fs::{self, OpenOptions};
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{default_log_file, AppConfig};

/// Sends tracing output to the log file; the terminal belongs to the UI.
///
/// `RUST_LOG` overrides the configured level when set.
pub fn init_logging(config: &AppConfig) -> Result<()> {
    let path = match &config.log_file {
        Some(path) => path.clone(),
        None => default_log_file()?,
    };
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating log directory {}", parent.display()))?;
        }
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .map_err(|err| anyhow!("invalid log level '{}': {}", config.log_level, err))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false),
        )
        .try_init()
        .map_err(|err| anyhow!(err))?;

    tracing::info!(path = %path.display(), "logging initialised");
    Ok(())
}
