//! Shared configuration for the doorman controller.
//!
//! TOML settings layered with environment variables, secret resolution
//! (environment + system keyring), and translation into
//! `doorman_core::DoorConfig`. Everything here runs once, before any door
//! logic; failures abort the invocation.

pub mod secrets;

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use chrono::Weekday;
use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use thiserror::Error;
use tracing::debug;

use doorman_api::myq::client::DEFAULT_BASE_URL;
use doorman_api::{Credentials, TlsMode};
use doorman_core::policy::{DEFAULT_EARLIEST_HOUR, DEFAULT_LATEST_HOUR};
use doorman_core::{AccessPolicy, DoorConfig};

pub use secrets::{EnvSecrets, KeyringSecrets, SecretChain, SecretSource};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("secret '{key}' is not configured")]
    MissingSecret { key: String },

    #[error("failed to serialize settings: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("settings loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

impl From<ConfigError> for doorman_core::CoreError {
    fn from(err: ConfigError) -> Self {
        Self::config(err.to_string())
    }
}

// ── Log level ───────────────────────────────────────────────────────

/// Log verbosity accepted in settings and `LOG_LEVEL`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
#[serde(try_from = "String", into = "String")]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Directive for `tracing_subscriber::EnvFilter`.
    pub fn as_filter(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl TryFrom<String> for LogLevel {
    type Error = String;

    fn try_from(value: String) -> Result<Self, <Self as TryFrom<String>>::Error> {
        Self::from_str(&value)
            .map_err(|_| format!("expected one of INFO, DEBUG, WARN, ERROR, got '{value}'"))
    }
}

impl From<LogLevel> for String {
    fn from(level: LogLevel) -> Self {
        level.to_string()
    }
}

// ── Settings ────────────────────────────────────────────────────────

/// Non-secret settings, from `config.toml` and `DOORMAN_*` variables.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Settings {
    /// MyQ API base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Cleaner window start, EST hour (exclusive).
    #[serde(default = "default_earliest_hour")]
    pub earliest_hour: u8,

    /// Cleaner window end, EST hour (exclusive).
    #[serde(default = "default_latest_hour")]
    pub latest_hour: u8,

    #[serde(default)]
    pub log_level: LogLevel,

    /// Extra CA certificate to trust (PEM).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<PathBuf>,

    /// Keyring service name secrets are stored under.
    #[serde(default = "default_keyring_service")]
    pub keyring_service: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            earliest_hour: default_earliest_hour(),
            latest_hour: default_latest_hour(),
            log_level: LogLevel::default(),
            ca_cert: None,
            keyring_service: default_keyring_service(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.into()
}
fn default_timeout() -> u64 {
    30
}
fn default_earliest_hour() -> u8 {
    DEFAULT_EARLIEST_HOUR
}
fn default_latest_hour() -> u8 {
    DEFAULT_LATEST_HOUR
}
fn default_keyring_service() -> String {
    "doorman".into()
}

// ── Settings file path ──────────────────────────────────────────────

/// Resolve the settings file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "doorman", "doorman").map_or_else(
        || {
            let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
            p.push(".config");
            p.push("doorman");
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

// ── Settings loading ────────────────────────────────────────────────

/// Load settings: defaults, then the TOML file (if present), then
/// `DOORMAN_*` variables, then a bare `LOG_LEVEL`.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, ConfigError> {
    let path = path.map_or_else(config_path, Path::to_path_buf);
    debug!(path = %path.display(), "loading settings");

    let settings: Settings = Figment::new()
        .merge(Serialized::defaults(Settings::default()))
        .merge(Toml::file(&path))
        .merge(Env::prefixed("DOORMAN_"))
        .merge(Env::raw().only(&["LOG_LEVEL"]))
        .extract()?;
    Ok(settings)
}

/// Render settings as TOML.
pub fn render_settings(settings: &Settings) -> Result<String, ConfigError> {
    Ok(toml::to_string_pretty(settings)?)
}

// ── Translation into runtime config ─────────────────────────────────

/// Resolve every secret and build the immutable `DoorConfig`.
pub fn build_door_config(
    settings: &Settings,
    secrets: &dyn SecretSource,
) -> Result<DoorConfig, ConfigError> {
    let username = secrets.secret(secrets::ACCOUNT)?;
    let password = secrets.secret(secrets::PASSWORD)?;
    let cleaner_code = secrets.secret(secrets::CLEANER_CODE)?;
    let family_code = secrets.secret(secrets::FAMILY_CODE)?;
    let cleaner_day = secrets.secret(secrets::CLEANER_DAY)?;

    let cleaner_day = parse_weekday(cleaner_day.expose_secret())?;

    let policy = AccessPolicy::new(cleaner_code, family_code, cleaner_day)
        .with_window(settings.earliest_hour, settings.latest_hour);
    policy.validate().map_err(|e| ConfigError::Validation {
        field: "access policy".into(),
        reason: e.to_string(),
    })?;

    let base_url: url::Url = settings
        .base_url
        .parse()
        .map_err(|_| ConfigError::Validation {
            field: "base_url".into(),
            reason: format!("invalid URL: {}", settings.base_url),
        })?;

    let tls = settings
        .ca_cert
        .clone()
        .map_or(TlsMode::System, TlsMode::CustomCa);

    Ok(DoorConfig {
        credentials: Credentials::new(username.expose_secret(), password),
        policy,
        base_url,
        tls,
        timeout: Duration::from_secs(settings.timeout_secs),
    })
}

/// Parse a weekday name: full or three-letter English, any case.
pub fn parse_weekday(value: &str) -> Result<Weekday, ConfigError> {
    Weekday::from_str(value.trim()).map_err(|_| ConfigError::Validation {
        field: secrets::CLEANER_DAY.into(),
        reason: format!("expected a weekday name, got '{value}'"),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;
    use secrecy::SecretString;

    use super::*;

    struct MapSecrets(HashMap<&'static str, &'static str>);

    impl SecretSource for MapSecrets {
        fn secret(&self, key: &str) -> Result<SecretString, ConfigError> {
            self.0
                .get(key)
                .map(|v| SecretString::from((*v).to_owned()))
                .ok_or_else(|| ConfigError::MissingSecret { key: key.into() })
        }
    }

    fn secrets() -> MapSecrets {
        MapSecrets(HashMap::from([
            ("ACCOUNT", "owner@example.com"),
            ("PASSWORD", "pw"),
            ("CLEANER_CODE", "2468"),
            ("FAMILY_CODE", "1357"),
            ("CLEANER_DAY", "Thursday"),
        ]))
    }

    #[test]
    fn builds_door_config_from_secrets() {
        let config = build_door_config(&Settings::default(), &secrets()).unwrap();
        assert_eq!(config.credentials.username, "owner@example.com");
        assert_eq!(config.policy.cleaner_day, Weekday::Thu);
        assert_eq!(config.policy.earliest_hour, 7);
        assert_eq!(config.policy.latest_hour, 17);
        assert_eq!(config.base_url.as_str(), "https://myqexternal.myqdevice.com/");
        assert_eq!(config.tls, TlsMode::System);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn missing_secret_is_fatal() {
        let mut s = secrets();
        s.0.remove("FAMILY_CODE");
        match build_door_config(&Settings::default(), &s) {
            Err(ConfigError::MissingSecret { key }) => assert_eq!(key, "FAMILY_CODE"),
            other => panic!("expected MissingSecret, got {other:?}"),
        }
    }

    #[test]
    fn bad_weekday_is_rejected() {
        let mut s = secrets();
        s.0.insert("CLEANER_DAY", "Caturday");
        assert!(matches!(
            build_door_config(&Settings::default(), &s),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn empty_codes_are_rejected() {
        let mut s = secrets();
        s.0.insert("CLEANER_CODE", "");
        assert!(matches!(
            build_door_config(&Settings::default(), &s),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn weekday_names() {
        assert_eq!(parse_weekday("Thursday").unwrap(), Weekday::Thu);
        assert_eq!(parse_weekday("thu").unwrap(), Weekday::Thu);
        assert_eq!(parse_weekday("SUNDAY").unwrap(), Weekday::Sun);
        assert!(parse_weekday("").is_err());
    }

    #[test]
    fn log_levels_parse_case_insensitively() {
        assert_eq!(LogLevel::try_from("DEBUG".to_string()).unwrap(), LogLevel::Debug);
        assert_eq!(LogLevel::try_from("warn".to_string()).unwrap(), LogLevel::Warn);
        assert!(LogLevel::try_from("TRACE".to_string()).is_err());
        assert_eq!(LogLevel::Error.to_string(), "ERROR");
        assert_eq!(LogLevel::default().as_filter(), "info");
    }

    #[test]
    fn settings_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "base_url = \"http://127.0.0.1:9000\"\nearliest_hour = 8\nlog_level = \"warn\"\n",
        )
        .unwrap();

        let settings = load_settings(Some(&path)).unwrap();
        assert_eq!(settings.base_url, "http://127.0.0.1:9000");
        assert_eq!(settings.earliest_hour, 8);
        assert_eq!(settings.latest_hour, 17);
        assert_eq!(settings.timeout_secs, 30);
    }

    #[test]
    fn missing_settings_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load_settings(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(settings.earliest_hour, Settings::default().earliest_hour);
        assert_eq!(settings.keyring_service, "doorman");
    }

    #[test]
    fn settings_render_as_toml() {
        let rendered = render_settings(&Settings::default()).unwrap();
        assert!(rendered.contains("log_level = \"INFO\""), "got:\n{rendered}");
        assert!(rendered.contains("earliest_hour = 7"));
    }
}
