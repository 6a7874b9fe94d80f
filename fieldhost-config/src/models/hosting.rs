use anyhow::{Context, anyhow};
use fieldhost_core::{
    DEFAULT_MARGIN_X, DEFAULT_MARGIN_Y, DEFAULT_MAX_VISIBLE_RATIO, DEFAULT_MIN_CONTENT_AREA,
    VirtualizationSettings,
};
use fieldhost_model::{MemoryPolicy, Size};
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
};

use crate::validation::HostingConfigError;

pub const CONFIG_PATH_ENV: &str = "FIELDHOST_CONFIG_PATH";
pub const CONFIG_JSON_ENV: &str = "FIELDHOST_CONFIG_JSON";

/// Source that produced the hosting configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum HostingConfigSource {
    #[default]
    Default,
    EnvPath(PathBuf),
    EnvInline,
    File(PathBuf),
}

/// Virtualization tuning for a panel. Every field is optional in the file;
/// missing ones keep their defaults.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct HostingConfig {
    /// Flags such as `"RELEASE_HANDLE_ON_REMOVE"` or
    /// `"HOST_ALWAYS | DISPOSE_ON_REMOVE"`.
    pub policy: MemoryPolicy,
    /// Horizontal slack around the viewport, in layout units.
    pub margin_x: f32,
    /// Vertical slack around the viewport, in layout units.
    pub margin_y: f32,
    /// Visible/content ratio above which every item is hosted. Must lie in
    /// `(0, 1]`.
    pub max_visible_ratio: f32,
    /// Content area below which virtualization never kicks in.
    pub min_content_area: f32,
    /// Padding added past the far edges of the content.
    pub content_margin: Size,
    /// Capture a placeholder snapshot when the panel deactivates.
    pub capture_snapshot_on_deactivate: bool,
}

impl Default for HostingConfig {
    fn default() -> Self {
        Self {
            policy: MemoryPolicy::default(),
            margin_x: DEFAULT_MARGIN_X,
            margin_y: DEFAULT_MARGIN_Y,
            max_visible_ratio: DEFAULT_MAX_VISIBLE_RATIO,
            min_content_area: DEFAULT_MIN_CONTENT_AREA,
            content_margin: Size::ZERO,
            capture_snapshot_on_deactivate: true,
        }
    }
}

impl HostingConfig {
    /// Load hosting configuration from the process environment.
    /// Evaluation order:
    /// 1) `$FIELDHOST_CONFIG_PATH` (TOML or JSON file),
    /// 2) `$FIELDHOST_CONFIG_JSON` (inline JSON),
    /// 3) `fieldhost.toml` / `fieldhost.json` / `config/fieldhost.*` in the
    ///    working directory,
    /// 4) defaults.
    pub fn load_from_env() -> anyhow::Result<(Self, HostingConfigSource)> {
        Self::resolve(|key| env::var(key).ok(), Path::new("."))
    }

    /// Same order as [`Self::load_from_env`], with the environment and the
    /// directory searched for default files supplied by the caller.
    pub fn resolve<E>(lookup: E, base_dir: &Path) -> anyhow::Result<(Self, HostingConfigSource)>
    where
        E: Fn(&str) -> Option<String>,
    {
        if let Some(path_str) = lookup(CONFIG_PATH_ENV)
            && !path_str.trim().is_empty()
        {
            let path = PathBuf::from(path_str);
            let config = Self::load_from_file(&path)?;
            return Ok((config, HostingConfigSource::EnvPath(path)));
        }

        if let Some(raw) = lookup(CONFIG_JSON_ENV)
            && !raw.trim().is_empty()
        {
            let parsed = Self::parse_json(&raw)
                .with_context(|| format!("failed to parse {CONFIG_JSON_ENV}"))?;
            return Ok((parsed, HostingConfigSource::EnvInline));
        }

        if let Some(path) = Self::find_default_file(base_dir) {
            let config = Self::load_from_file(&path)?;
            return Ok((config, HostingConfigSource::File(path)));
        }

        Ok((Self::default(), HostingConfigSource::Default))
    }

    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path).with_context(|| {
            format!("failed to read hosting config from {}", path.display())
        })?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::parse_json(&contents)
                .with_context(|| format!("invalid hosting config {}", path.display())),
            Some("toml") => toml::from_str(&contents).map_err(|err| {
                anyhow!("invalid hosting config {}: {}", path.display(), err)
            }),
            _ => Self::parse_from_str(&contents, &path.display().to_string()),
        }
    }

    /// Parse without knowing the format: TOML first, then JSON.
    pub fn parse_from_str(contents: &str, origin: &str) -> anyhow::Result<Self> {
        toml::from_str(contents).or_else(|toml_err| {
            serde_json::from_str(contents).map_err(|json_err| {
                anyhow!(
                    "failed to parse hosting config {}: toml error: {}; json error: {}",
                    origin,
                    toml_err,
                    json_err
                )
            })
        })
    }

    pub fn parse_json(raw: &str) -> anyhow::Result<Self> {
        serde_json::from_str(raw).map_err(|err| anyhow!("invalid hosting config json: {err}"))
    }

    /// Validate and convert into the engine's settings.
    pub fn to_settings(&self) -> Result<VirtualizationSettings, HostingConfigError> {
        self.validate()?;
        Ok(VirtualizationSettings {
            policy: self.policy,
            margin_x: self.margin_x,
            margin_y: self.margin_y,
            max_visible_ratio: self.max_visible_ratio,
            min_content_area: self.min_content_area,
            content_margin: self.content_margin,
            capture_snapshot_on_deactivate: self.capture_snapshot_on_deactivate,
        })
    }

    fn find_default_file(base_dir: &Path) -> Option<PathBuf> {
        const CANDIDATES: &[&str] = &[
            "fieldhost.toml",
            "fieldhost.json",
            "config/fieldhost.toml",
            "config/fieldhost.json",
        ];

        CANDIDATES
            .iter()
            .map(|candidate| base_dir.join(candidate))
            .find(|path| path.exists())
    }
}

impl From<VirtualizationSettings> for HostingConfig {
    fn from(settings: VirtualizationSettings) -> Self {
        Self {
            policy: settings.policy,
            margin_x: settings.margin_x,
            margin_y: settings.margin_y,
            max_visible_ratio: settings.max_visible_ratio,
            min_content_area: settings.min_content_area,
            content_margin: settings.content_margin,
            capture_snapshot_on_deactivate: settings.capture_snapshot_on_deactivate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_engine_defaults() {
        let settings = HostingConfig::default().to_settings().unwrap();
        assert_eq!(settings, VirtualizationSettings::default());
    }

    #[test]
    fn partial_toml_keeps_remaining_defaults() {
        let config = HostingConfig::parse_from_str(
            r#"
            policy = "HOST_ALWAYS | DISPOSE_ON_REMOVE"
            margin_y = 120.0

            [content_margin]
            width = 8.0
            height = 16.0
            "#,
            "inline",
        )
        .unwrap();

        assert!(config.policy.hosts_always());
        assert!(config.policy.disposes_on_remove());
        assert_eq!(config.margin_y, 120.0);
        assert_eq!(config.margin_x, DEFAULT_MARGIN_X);
        assert_eq!(config.content_margin, Size::new(8.0, 16.0));
    }

    #[test]
    fn parse_from_str_falls_back_to_json() {
        let config =
            HostingConfig::parse_from_str(r#"{"max_visible_ratio": 0.75}"#, "inline").unwrap();
        assert_eq!(config.max_visible_ratio, 0.75);
    }

    #[test]
    fn garbage_reports_both_parsers() {
        let err = HostingConfig::parse_from_str("margin_x = [", "broken.cfg").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("broken.cfg"));
        assert!(message.contains("toml error"));
        assert!(message.contains("json error"));
    }

    #[test]
    fn settings_round_trip_through_config() {
        let settings = VirtualizationSettings::default()
            .with_margins(10.0, 20.0)
            .with_policy(MemoryPolicy::empty());
        let config = HostingConfig::from(settings);
        assert_eq!(config.to_settings().unwrap(), settings);
    }
}
