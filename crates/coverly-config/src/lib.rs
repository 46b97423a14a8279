//! Shared configuration for the coverly CLI and TUI.
//!
//! TOML profiles merged with `COVERLY_` environment variables, and
//! translation to `coverly_core::PanelConfig`. Both binaries depend on
//! this crate; the CLI layers its global flags on top.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use coverly_core::{PanelConfig, ReconnectConfig};

/// Environment prefix. Nested keys use `__`, e.g.
/// `COVERLY_PROFILES__HOME__URL=http://192.168.1.40`.
pub const ENV_PREFIX: &str = "COVERLY_";

const DEFAULT_TIMEOUT_SECS: u64 = 10;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found")]
    UnknownProfile { name: String },

    #[error("no profile selected and no default_profile set")]
    NoProfile,

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration shared by CLI and TUI.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when none is named on the command line.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named controller profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    /// CLI output format: "table" or "json".
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// One controller.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
    /// Controller base URL (e.g., "http://192.168.1.40").
    pub url: String,

    /// Per-request timeout; falls back to `defaults.timeout_secs`.
    pub timeout_secs: Option<u64>,

    /// Reconnect the push channel after it drops. Default: true.
    pub reconnect: Option<bool>,

    /// Operator log lines kept on screen. Default: 20.
    pub log_capacity: Option<usize>,
}

impl Profile {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout_secs: None,
            reconnect: None,
            log_capacity: None,
        }
    }
}

impl Config {
    /// Look up `name`, or the default profile when `name` is `None`.
    pub fn profile(&self, name: Option<&str>) -> Result<(&str, &Profile), ConfigError> {
        let name = name
            .or(self.default_profile.as_deref())
            .ok_or(ConfigError::NoProfile)?;
        self.profiles
            .get_key_value(name)
            .map(|(k, p)| (k.as_str(), p))
            .ok_or_else(|| ConfigError::UnknownProfile { name: name.into() })
    }

    /// Build the panel config for a profile.
    pub fn panel_config(&self, name: Option<&str>) -> Result<PanelConfig, ConfigError> {
        let (_, profile) = self.profile(name)?;
        profile_to_panel_config(profile, &self.defaults)
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "coverly", "coverly").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("coverly");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file, still merging the environment on top.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file is missing or unreadable.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Translation ─────────────────────────────────────────────────────

/// Parse and check a controller URL.
pub fn parse_url(raw: &str) -> Result<url::Url, ConfigError> {
    let url: url::Url = raw.trim().parse().map_err(|_| ConfigError::Validation {
        field: "url".into(),
        reason: format!("invalid URL: {raw}"),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::Validation {
            field: "url".into(),
            reason: format!("expected http or https, got '{other}'"),
        }),
    }
}

/// Build a `PanelConfig` from a profile, with no CLI overrides.
pub fn profile_to_panel_config(
    profile: &Profile,
    defaults: &Defaults,
) -> Result<PanelConfig, ConfigError> {
    let mut config = PanelConfig::new(parse_url(&profile.url)?);
    config.timeout = Duration::from_secs(profile.timeout_secs.unwrap_or(defaults.timeout_secs));
    config.reconnect = profile
        .reconnect
        .unwrap_or(true)
        .then(ReconnectConfig::default);
    if let Some(capacity) = profile.log_capacity {
        if capacity == 0 {
            return Err(ConfigError::Validation {
                field: "log_capacity".into(),
                reason: "must be at least 1".into(),
            });
        }
        config.log_capacity = capacity;
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.default_profile.as_deref(), Some("default"));
        assert_eq!(cfg.defaults.timeout_secs, 10);
        assert!(cfg.profiles.is_empty());
    }

    #[test]
    fn save_then_load_keeps_profiles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        let mut home = Profile::new("http://192.168.1.40");
        home.reconnect = Some(false);
        home.log_capacity = Some(50);
        cfg.profiles.insert("default".into(), home);
        save_config_to(&cfg, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn profile_translates_to_panel_config() {
        let cfg: Config = toml::from_str(
            r#"
            default_profile = "home"

            [profiles.home]
            url = "http://192.168.1.40"
            timeout_secs = 3
            reconnect = false
            log_capacity = 50
            "#,
        )
        .unwrap();
        let panel = cfg.panel_config(None).unwrap();
        assert_eq!(panel.url.as_str(), "http://192.168.1.40/");
        assert_eq!(panel.timeout, Duration::from_secs(3));
        assert!(panel.reconnect.is_none());
        assert_eq!(panel.log_capacity, 50);
    }

    #[test]
    fn defaults_apply_when_profile_is_sparse() {
        let mut cfg = Config::default();
        cfg.profiles
            .insert("default".into(), Profile::new("http://cover.local"));
        let panel = cfg.panel_config(None).unwrap();
        assert_eq!(panel.timeout, Duration::from_secs(10));
        assert!(panel.reconnect.is_some());
        assert_eq!(panel.log_capacity, 20);
    }

    #[test]
    fn unknown_profile_and_bad_url() {
        let cfg = Config::default();
        assert!(matches!(
            cfg.panel_config(Some("attic")),
            Err(ConfigError::UnknownProfile { .. })
        ));
        assert!(matches!(
            parse_url("ftp://cover.local"),
            Err(ConfigError::Validation { .. })
        ));
        assert!(parse_url("not a url").is_err());
    }

    #[test]
    fn zero_log_capacity_is_rejected() {
        let mut profile = Profile::new("http://cover.local");
        profile.log_capacity = Some(0);
        assert!(profile_to_panel_config(&profile, &Defaults::default()).is_err());
    }
}
