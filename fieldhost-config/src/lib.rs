//! Configuration for fieldhost panels.
//!
//! Loads [`HostingConfig`] from the environment or a config file, validates
//! it into the engine's [`VirtualizationSettings`], and sets up `tracing`
//! output for hosts that do not bring their own subscriber.

pub mod models;
pub mod telemetry;
pub mod validation;

pub use fieldhost_core::VirtualizationSettings;
pub use models::{CONFIG_JSON_ENV, CONFIG_PATH_ENV, HostingConfig, HostingConfigSource};
pub use telemetry::init_tracing;
pub use validation::HostingConfigError;

use std::path::Path;

use tracing::info;

/// Load, validate and log the hosting configuration for this process.
pub fn load_settings() -> anyhow::Result<(VirtualizationSettings, HostingConfigSource)> {
    load_settings_with(|key| std::env::var(key).ok(), Path::new("."))
}

/// [`load_settings`] with the environment lookup and the directory searched
/// for default files supplied by the caller.
pub fn load_settings_with<E>(
    lookup: E,
    base_dir: &Path,
) -> anyhow::Result<(VirtualizationSettings, HostingConfigSource)>
where
    E: Fn(&str) -> Option<String>,
{
    let (config, source) = HostingConfig::resolve(lookup, base_dir)?;
    let settings = config.to_settings()?;

    match &source {
        HostingConfigSource::EnvPath(path) => {
            info!(path = %path.display(), "hosting config loaded from env path")
        }
        HostingConfigSource::EnvInline => {
            info!("hosting config loaded from inline environment json")
        }
        HostingConfigSource::File(path) => {
            info!(path = %path.display(), "hosting config loaded from file")
        }
        HostingConfigSource::Default => info!("hosting config defaults in use"),
    }

    Ok((settings, source))
}
