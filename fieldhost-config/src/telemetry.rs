use anyhow::Context;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Crate-specific filter variable, consulted before `RUST_LOG`.
pub const LOG_ENV: &str = "FIELDHOST_LOG";

const DEFAULT_FILTER: &str = "info";

/// Filter from `$FIELDHOST_LOG`, then `$RUST_LOG`, then `info`.
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| DEFAULT_FILTER.into())
}

/// Install the global fmt subscriber. Fails if one is already installed.
pub fn init_tracing() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .context("failed to install tracing subscriber")
}
