//! Profile configuration for the hwolt CLI.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext),
//! and translation to `hwolt_core::SessionConfig`. The CLI adds
//! `GlobalOpts`-aware overrides on top.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use hwolt_core::{Credentials, DEFAULT_SSH_PORT, Endpoint, SessionConfig, config::DEFAULT_TIMEOUT_SECS};

/// Keyring service name for stored device passwords.
pub const KEYRING_SERVICE: &str = "hwolt";

/// Environment variable prefix for config overrides.
pub const ENV_PREFIX: &str = "HWOLT_";

/// Overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "HWOLT_CONFIG";

const PASSWORD_ENV: &str = "HWOLT_PASSWORD";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no username configured for profile '{profile}'")]
    NoUsername { profile: String },

    #[error("no password configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

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

/// Top-level TOML configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when `--profile` is not given.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named OLT profiles.
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

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Defaults {
    /// Output format: `text`, `json` or `yaml`.
    #[serde(default = "default_output")]
    pub output: String,

    /// Channel timeout in seconds; `0` blocks until output arrives.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default)]
    pub debug: bool,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            timeout: default_timeout(),
            debug: false,
        }
    }
}

fn default_output() -> String {
    "text".into()
}
fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// A named OLT profile.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Profile {
    /// OLT management address (name or IP).
    pub host: String,

    /// SSH port. Defaults to 22.
    pub port: Option<u16>,

    pub username: Option<String>,

    /// Password (plaintext; prefer keyring or `password_env`).
    pub password: Option<String>,

    /// Environment variable holding the password.
    pub password_env: Option<String>,

    /// SOCKS5 proxy as `host:port`.
    pub proxy: Option<String>,

    /// Override the default timeout.
    pub timeout: Option<u64>,

    /// Override the default debug echo.
    pub debug: Option<bool>,

    /// Reject commands sent outside their CLI mode.
    pub enforce_modes: Option<bool>,
}

impl Profile {
    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_SSH_PORT)
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path: `$HWOLT_CONFIG`, else the platform
/// config directory.
pub fn config_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
        return PathBuf::from(path);
    }
    ProjectDirs::from("com", "hwolt", "hwolt").map_or_else(
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
    p.push("hwolt");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file path, layering `HWOLT_*` env overrides on top.
///
/// Nested keys use a double underscore: `HWOLT_DEFAULTS__TIMEOUT=5`,
/// `HWOLT_PROFILES__LAB__HOST=10.0.0.2`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");
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
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    debug!(path = %path.display(), "config saved");
    Ok(())
}

// ── Credential resolution (without CLI flags) ───────────────────────

/// Keyring entry holding the password for `profile_name`.
pub fn keyring_entry(profile_name: &str) -> Result<keyring::Entry, ConfigError> {
    Ok(keyring::Entry::new(
        KEYRING_SERVICE,
        &format!("{profile_name}/password"),
    )?)
}

/// Resolve the device password from the credential chain.
///
/// Order: the profile's `password_env` variable, `HWOLT_PASSWORD`, the
/// system keyring, then the plaintext `password` field.
pub fn resolve_password(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    // 1. Profile's password_env → env var lookup
    if let Some(ref env_name) = profile.password_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. Global env var
    if let Ok(pw) = std::env::var(PASSWORD_ENV) {
        return Ok(SecretString::from(pw));
    }

    // 3. System keyring
    if let Ok(entry) = keyring_entry(profile_name) {
        if let Ok(pw) = entry.get_password() {
            return Ok(SecretString::from(pw));
        }
    }

    // 4. Plaintext in config
    if let Some(ref pw) = profile.password {
        return Ok(SecretString::from(pw.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Username from the profile, else `HWOLT_USERNAME`.
pub fn resolve_username(profile: &Profile, profile_name: &str) -> Result<String, ConfigError> {
    profile
        .username
        .clone()
        .or_else(|| std::env::var("HWOLT_USERNAME").ok())
        .ok_or_else(|| ConfigError::NoUsername {
            profile: profile_name.into(),
        })
}

/// Parse an optional `host:port` proxy string.
pub fn parse_proxy(proxy: Option<&str>) -> Result<Option<Endpoint>, ConfigError> {
    proxy
        .filter(|p| !p.is_empty())
        .map(|p| {
            p.parse::<Endpoint>().map_err(|e| ConfigError::Validation {
                field: "proxy".into(),
                reason: e.to_string(),
            })
        })
        .transpose()
}

/// Build a `SessionConfig` from a profile, no CLI flag overrides.
pub fn profile_to_session_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<SessionConfig, ConfigError> {
    let target = profile_target(profile)?;
    let username = resolve_username(profile, profile_name)?;
    let password = resolve_password(profile, profile_name)?;
    session_config_from(profile, defaults, target, Credentials::new(username, password))
}

/// The OLT endpoint a profile points at.
pub fn profile_target(profile: &Profile) -> Result<Endpoint, ConfigError> {
    Endpoint::new(profile.host.clone(), profile.port()).map_err(|e| ConfigError::Validation {
        field: "host".into(),
        reason: e.to_string(),
    })
}

/// Apply a profile's tuning (timeout, debug, proxy, mode checks) to
/// already-resolved target and credentials.
pub fn session_config_from(
    profile: &Profile,
    defaults: &Defaults,
    target: Endpoint,
    credentials: Credentials,
) -> Result<SessionConfig, ConfigError> {
    Ok(SessionConfig::new(target, credentials)
        .with_timeout_secs(profile.timeout.unwrap_or(defaults.timeout))
        .with_debug(profile.debug.unwrap_or(defaults.debug))
        .with_proxy(parse_proxy(profile.proxy.as_deref())?)
        .with_enforce_modes(profile.enforce_modes.unwrap_or(false)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    use super::*;

    const SAMPLE: &str = r#"
default_profile = "lab"

[defaults]
output = "json"
timeout = 5

[profiles.lab]
host = "10.0.0.2"
username = "root"
password = "admin123"
proxy = "127.0.0.1:1080"
enforce_modes = true

[profiles.edge]
host = "olt-edge.example.net"
port = 2222
timeout = 0
"#;

    fn write_sample() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, SAMPLE).unwrap();
        (dir, path)
    }

    #[test]
    fn loads_profiles_and_defaults() {
        let (_dir, path) = write_sample();
        let cfg = load_config_from(&path).unwrap();

        assert_eq!(cfg.default_profile.as_deref(), Some("lab"));
        assert_eq!(cfg.defaults.output, "json");
        assert_eq!(cfg.defaults.timeout, 5);
        assert!(!cfg.defaults.debug);
        assert_eq!(cfg.profiles.len(), 2);
        assert_eq!(cfg.profiles["edge"].port(), 2222);
        assert_eq!(cfg.profiles["lab"].port(), 22);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.default_profile.as_deref(), Some("default"));
        assert_eq!(cfg.defaults.timeout, 2);
        assert_eq!(cfg.defaults.output, "text");
        assert!(cfg.profiles.is_empty());
    }

    #[test]
    fn save_then_load_keeps_profiles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.profiles.insert(
            "core".into(),
            Profile {
                host: "10.1.1.1".into(),
                username: Some("noc".into()),
                ..Profile::default()
            },
        );
        save_config_to(&cfg, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded.profiles["core"].host, "10.1.1.1");
        assert_eq!(loaded.profiles["core"].username.as_deref(), Some("noc"));
    }

    #[test]
    fn profile_builds_session_config() {
        let (_dir, path) = write_sample();
        let cfg = load_config_from(&path).unwrap();

        let session = profile_to_session_config(&cfg.profiles["lab"], "lab", &cfg.defaults).unwrap();
        assert_eq!(session.target.to_string(), "10.0.0.2:22");
        assert_eq!(session.credentials.username(), "root");
        assert_eq!(session.timeout, Some(Duration::from_secs(5)));
        assert_eq!(session.proxy.unwrap().to_string(), "127.0.0.1:1080");
        assert!(session.enforce_modes);
    }

    #[test]
    fn plaintext_password_is_last_resort() {
        let profile = Profile {
            host: "10.0.0.2".into(),
            password: Some("plain".into()),
            password_env: Some("HWOLT_TEST_UNSET_PASSWORD_VAR".into()),
            ..Profile::default()
        };
        // Only meaningful when no global override is exported.
        if std::env::var(PASSWORD_ENV).is_err() {
            let pw = resolve_password(&profile, "hwolt-test-no-such-profile").unwrap();
            assert_eq!(pw.expose_secret(), "plain");
        }
    }

    #[test]
    fn invalid_proxy_is_validation_error() {
        let err = parse_proxy(Some("no-port")).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "proxy"));
        assert!(parse_proxy(Some("")).unwrap().is_none());
        assert!(parse_proxy(None).unwrap().is_none());
    }

    #[test]
    fn empty_host_is_validation_error() {
        let profile = Profile {
            username: Some("root".into()),
            password: Some("x".into()),
            ..Profile::default()
        };
        let err = profile_to_session_config(&profile, "blank", &Defaults::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "host"));
    }
}
