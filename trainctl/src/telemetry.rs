//! Tracing initialization (fmt subscriber with `RUST_LOG` filtering).
//!
//! Repository methods are wrapped in `#[instrument(..., err)]` spans, so running with
//! `RUST_LOG=trainctl=debug` shows every database call with its arguments and any error,
//! and `RUST_LOG=sqlx=warn` surfaces slow statements.

use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Initialize tracing with console output.
///
/// Filtering comes from `RUST_LOG`, defaulting to `info`.
pub fn init_telemetry() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()?;

    info!("Telemetry initialized");
    Ok(())
}
