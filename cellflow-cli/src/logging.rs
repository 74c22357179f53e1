//! Tracing subscriber setup.
//!
//! The filter comes from `CELLFLOW_LOG` and defaults to `warn`. The TUI owns
//! the terminal, so in that mode logs go to a file in the cache directory.

use std::fs;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::errors::Result;

pub const LOG_ENV: &str = "CELLFLOW_LOG";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Install the global subscriber. Keep the returned guard alive until exit so
/// buffered file logs are flushed.
pub fn init(to_file: bool) -> Result<Option<WorkerGuard>> {
    if !to_file {
        tracing_subscriber::registry()
            .with(env_filter())
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()
            .ok();
        return Ok(None);
    }

    let Some(log_dir) = dirs::cache_dir().map(|p| p.join("cellflow")) else {
        tracing_subscriber::registry().with(env_filter()).try_init().ok();
        return Ok(None);
    };
    fs::create_dir_all(&log_dir)?;

    let file_appender = tracing_appender::rolling::never(&log_dir, "cellflow.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(env_filter())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(false),
        )
        .try_init()
        .ok();

    Ok(Some(guard))
}
