//! Configuration for the bot
//!
//! Two records, both loaded once at process start and never mutated:
//!
//! - [`Settings`]: tunables read from an optional TOML file, all defaulted.
//! - [`Credentials`]: the four platform secrets read from the environment.

use std::path::{Path, PathBuf};
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

pub const CONSUMER_KEY_VAR: &str = "TWITTER_CONSUMER_KEY";
pub const CONSUMER_SECRET_VAR: &str = "TWITTER_CONSUMER_SECRET";
pub const ACCESS_TOKEN_VAR: &str = "TWITTER_ACCESS_TOKEN";
pub const ACCESS_SECRET_VAR: &str = "TWITTER_ACCESS_SECRET";

/// Which joke field is compared against the recent-history set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchField {
    /// Compare the joke text (historical behavior)
    #[default]
    Text,
    /// Compare the joke id, which is what the short links carry
    Id,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Account whose timeline is scanned
    pub screen_name: String,
    /// Short-link prefix marking a joke link in a post, e.g. `vlz.one/`
    pub short_link_prefix: String,
    /// Number of posts scanned for recently used jokes
    pub history_count: u32,
    /// Number of posts fetched when looking up the last post time
    pub timestamp_count: u32,
    /// Joke catalog document
    pub catalog_url: String,
    /// Platform API root
    pub api_base: String,
    /// Source label attached to every post
    pub source: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Selection attempts before giving up
    pub max_attempts: usize,
    pub match_on: MatchField,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            screen_name: "BadJokesZone".to_string(),
            short_link_prefix: "vlz.one/".to_string(),
            history_count: 25,
            timestamp_count: 10,
            catalog_url: "https://badjokes.zone/jokes.json".to_string(),
            api_base: "https://api.twitter.com".to_string(),
            source: "badjokes-bot".to_string(),
            timeout_secs: 60,
            max_attempts: 100,
            match_on: MatchField::Text,
        }
    }
}

impl Settings {
    /// Load settings from `BADJOKES_CONFIG` or the default location
    ///
    /// A missing file at the default location yields the defaults. A missing
    /// file named explicitly through `BADJOKES_CONFIG` is an error.
    pub fn load() -> Result<Self> {
        if let Ok(path) = std::env::var("BADJOKES_CONFIG") {
            let path = PathBuf::from(shellexpand::tilde(&path).to_string());
            return Self::load_from_path(&path);
        }

        let path = default_config_path()?;
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        Self::load_from_path(&path)
    }

    /// Load settings from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        let settings: Settings = toml::from_str(&content).map_err(ConfigError::ParseError)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_attempts == 0 {
            return Err(ConfigError::Invalid("max_attempts must be at least 1".to_string()).into());
        }
        if self.history_count == 0 {
            return Err(ConfigError::Invalid("history_count must be at least 1".to_string()).into());
        }
        if self.timestamp_count == 0 {
            return Err(ConfigError::Invalid("timestamp_count must be at least 1".to_string()).into());
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid("timeout_secs must be at least 1".to_string()).into());
        }
        if self.short_link_prefix.is_empty() {
            return Err(ConfigError::Invalid("short_link_prefix cannot be empty".to_string()).into());
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Resolve the default configuration file path following the XDG layout
pub fn default_config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| ConfigError::Invalid("no config directory for this user".to_string()))?;

    Ok(config_dir.join("badjokes").join("config.toml"))
}

/// Platform credentials
///
/// Values are kept in [`SecretString`] so `Debug` output never leaks them.
/// Empty environment values count as absent.
#[derive(Debug, Default)]
pub struct Credentials {
    pub consumer_key: Option<SecretString>,
    pub consumer_secret: Option<SecretString>,
    pub access_token: Option<SecretString>,
    pub access_secret: Option<SecretString>,
}

impl Credentials {
    pub fn new(
        consumer_key: &str,
        consumer_secret: &str,
        access_token: &str,
        access_secret: &str,
    ) -> Self {
        Self {
            consumer_key: non_empty(consumer_key.to_string()),
            consumer_secret: non_empty(consumer_secret.to_string()),
            access_token: non_empty(access_token.to_string()),
            access_secret: non_empty(access_secret.to_string()),
        }
    }

    /// Read the four `TWITTER_*` variables
    pub fn from_env() -> Self {
        let read = |name: &str| std::env::var(name).ok().and_then(non_empty);

        Self {
            consumer_key: read(CONSUMER_KEY_VAR),
            consumer_secret: read(CONSUMER_SECRET_VAR),
            access_token: read(ACCESS_TOKEN_VAR),
            access_secret: read(ACCESS_SECRET_VAR),
        }
    }

    /// Fail unless both consumer-level values are present
    pub fn require_consumer(&self) -> Result<()> {
        if self.consumer_key.is_none() || self.consumer_secret.is_none() {
            return Err(ConfigError::MissingCredential(format!(
                "{} and {}",
                CONSUMER_KEY_VAR, CONSUMER_SECRET_VAR
            ))
            .into());
        }
        Ok(())
    }

    pub fn consumer_key(&self) -> &str {
        exposed(&self.consumer_key)
    }

    pub fn consumer_secret(&self) -> &str {
        exposed(&self.consumer_secret)
    }

    pub fn access_token(&self) -> &str {
        exposed(&self.access_token)
    }

    pub fn access_secret(&self) -> &str {
        exposed(&self.access_secret)
    }
}

fn non_empty(value: String) -> Option<SecretString> {
    if value.trim().is_empty() {
        None
    } else {
        Some(SecretString::from(value))
    }
}

fn exposed(secret: &Option<SecretString>) -> &str {
    secret.as_ref().map(|s| s.expose_secret()).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn clear_env() {
        for var in [
            CONSUMER_KEY_VAR,
            CONSUMER_SECRET_VAR,
            ACCESS_TOKEN_VAR,
            ACCESS_SECRET_VAR,
        ] {
            std::env::remove_var(var);
        }
    }

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.screen_name, "BadJokesZone");
        assert_eq!(settings.short_link_prefix, "vlz.one/");
        assert_eq!(settings.history_count, 25);
        assert_eq!(settings.timestamp_count, 10);
        assert_eq!(settings.timeout(), Duration::from_secs(60));
        assert_eq!(settings.max_attempts, 100);
        assert_eq!(settings.match_on, MatchField::Text);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_load_partial_file_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "screen_name = \"SomeoneElse\"").unwrap();
        writeln!(file, "match_on = \"id\"").unwrap();

        let settings = Settings::load_from_path(file.path()).unwrap();
        assert_eq!(settings.screen_name, "SomeoneElse");
        assert_eq!(settings.match_on, MatchField::Id);
        assert_eq!(settings.history_count, 25);
        assert_eq!(settings.source, "badjokes-bot");
    }

    #[test]
    fn test_load_empty_file_is_default() {
        let file = NamedTempFile::new().unwrap();
        let settings = Settings::load_from_path(file.path()).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_load_invalid_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "screen_name = ").unwrap();

        let err = Settings::load_from_path(file.path()).unwrap_err();
        assert!(matches!(
            err,
            crate::BotError::Config(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_load_rejects_zero_attempts() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "max_attempts = 0").unwrap();

        let err = Settings::load_from_path(file.path()).unwrap_err();
        assert!(err.to_string().contains("max_attempts"));
    }

    #[test]
    fn test_validate_rejects_zero_counts() {
        let settings = Settings {
            history_count: 0,
            ..Default::default()
        };
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("history_count"));

        let settings = Settings {
            timestamp_count: 0,
            ..Default::default()
        };
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("timestamp_count"));
    }

    #[test]
    #[serial]
    fn test_load_missing_explicit_file_is_error() {
        std::env::set_var("BADJOKES_CONFIG", "/nonexistent/badjokes/config.toml");
        let result = Settings::load();
        std::env::remove_var("BADJOKES_CONFIG");

        assert!(matches!(
            result,
            Err(crate::BotError::Config(ConfigError::ReadError(_)))
        ));
    }

    #[test]
    #[serial]
    fn test_credentials_from_env() {
        clear_env();
        std::env::set_var(CONSUMER_KEY_VAR, "ck");
        std::env::set_var(CONSUMER_SECRET_VAR, "cs");
        std::env::set_var(ACCESS_TOKEN_VAR, "at");
        std::env::set_var(ACCESS_SECRET_VAR, "");

        let creds = Credentials::from_env();
        clear_env();

        assert_eq!(creds.consumer_key(), "ck");
        assert_eq!(creds.consumer_secret(), "cs");
        assert_eq!(creds.access_token(), "at");
        assert!(creds.access_secret.is_none());
        assert_eq!(creds.access_secret(), "");
        assert!(creds.require_consumer().is_ok());
    }

    #[test]
    #[serial]
    fn test_credentials_missing_consumer() {
        clear_env();
        std::env::set_var(CONSUMER_KEY_VAR, "ck");

        let creds = Credentials::from_env();
        clear_env();

        let err = creds.require_consumer().unwrap_err();
        assert_eq!(err.exit_code(), 3);
        assert!(err.to_string().contains(CONSUMER_SECRET_VAR));
    }

    #[test]
    fn test_credentials_debug_is_redacted() {
        let creds = Credentials::new("key-value", "secret-value", "token-value", "access-value");
        let debug = format!("{:?}", creds);
        assert!(!debug.contains("secret-value"));
        assert!(!debug.contains("token-value"));
    }
}
