// * Runtime Settings
// * Loaded once at startup: optional JSON file first, environment variables on top.

use crate::config::constants::{
    FETCH_MAX_ATTEMPTS, FETCH_TIMEOUT_SECS, MAX_BODY_BYTES, MAX_REDIRECTS, MODEL_PATH,
    RANK_API_HOST, RANK_ENDPOINT, RANK_TIMEOUT_SECS,
};
use crate::refinery::{ContentFallback, ContentRules, IframeRule};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

// * Environment variable names
pub const ENV_RANK_API_KEY: &str = "PHISHNET_RANK_API_KEY";
pub const ENV_RANK_ENDPOINT: &str = "PHISHNET_RANK_ENDPOINT";
pub const ENV_RANK_HOST: &str = "PHISHNET_RANK_HOST";
pub const ENV_MODEL_PATH: &str = "PHISHNET_MODEL_PATH";
pub const ENV_FETCH_TIMEOUT_SECS: &str = "PHISHNET_FETCH_TIMEOUT_SECS";
pub const ENV_FETCH_MAX_ATTEMPTS: &str = "PHISHNET_FETCH_MAX_ATTEMPTS";
pub const ENV_CONTENT_FALLBACK: &str = "PHISHNET_CONTENT_FALLBACK";
pub const ENV_IFRAME_RULE: &str = "PHISHNET_IFRAME_RULE";
pub const ENV_DOMAIN_GATE: &str = "PHISHNET_DOMAIN_GATE";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid value {value:?} for {key}")]
    InvalidValue { key: &'static str, value: String },
}

/// Secret credential for the ranking service. Never printed.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Ranking service connection settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RankSettings {
    /// Credential sent as `X-RapidAPI-Key`; lookups are skipped without it
    pub api_key: Option<ApiKey>,
    pub endpoint: String,
    /// Value of the `X-RapidAPI-Host` header
    pub api_host: String,
    pub timeout_secs: u64,
}

impl Default for RankSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: RANK_ENDPOINT.to_string(),
            api_host: RANK_API_HOST.to_string(),
            timeout_secs: RANK_TIMEOUT_SECS,
        }
    }
}

impl RankSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Target page fetch settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchSettings {
    /// Per-attempt timeout
    pub timeout_secs: u64,
    /// Attempts including the first one
    pub max_attempts: u32,
    pub max_body_bytes: usize,
    pub max_redirects: usize,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout_secs: FETCH_TIMEOUT_SECS,
            max_attempts: FETCH_MAX_ATTEMPTS,
            max_body_bytes: MAX_BODY_BYTES,
            max_redirects: MAX_REDIRECTS,
        }
    }
}

impl FetchSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Top-level settings for a detector process
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub rank: RankSettings,
    pub fetch: FetchSettings,
    /// Versioned classifier artifact
    pub model_path: PathBuf,
    /// Content feature values used when the page cannot be fetched
    pub content_fallback: ContentFallback,
    pub iframe_rule: IframeRule,
    /// Label anything but `https://...(.com|.net)` as phishing without the model
    pub domain_gate: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rank: RankSettings::default(),
            fetch: FetchSettings::default(),
            model_path: PathBuf::from(MODEL_PATH),
            content_fallback: ContentFallback::default(),
            iframe_rule: IframeRule::default(),
            domain_gate: false,
        }
    }
}

impl Settings {
    /// Loads settings from an optional JSON file, then applies process environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let base = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        base.with_env(|key| std::env::var(key).ok())
    }

    /// Parses a JSON settings file. Missing fields take their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Self = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        settings.validate()
    }

    /// Applies overrides from an environment lookup function.
    pub fn with_env<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(ENV_RANK_API_KEY).filter(|k| !k.trim().is_empty()) {
            self.rank.api_key = Some(ApiKey::new(key.trim()));
        }
        if let Some(endpoint) = lookup(ENV_RANK_ENDPOINT) {
            self.rank.endpoint = endpoint;
        }
        if let Some(host) = lookup(ENV_RANK_HOST) {
            self.rank.api_host = host;
        }
        if let Some(path) = lookup(ENV_MODEL_PATH) {
            self.model_path = PathBuf::from(path);
        }
        if let Some(value) = lookup(ENV_FETCH_TIMEOUT_SECS) {
            self.fetch.timeout_secs = parse_env(ENV_FETCH_TIMEOUT_SECS, &value)?;
        }
        if let Some(value) = lookup(ENV_FETCH_MAX_ATTEMPTS) {
            self.fetch.max_attempts = parse_env(ENV_FETCH_MAX_ATTEMPTS, &value)?;
        }
        if let Some(value) = lookup(ENV_CONTENT_FALLBACK) {
            self.content_fallback = parse_env(ENV_CONTENT_FALLBACK, &value)?;
        }
        if let Some(value) = lookup(ENV_IFRAME_RULE) {
            self.iframe_rule = parse_env(ENV_IFRAME_RULE, &value)?;
        }
        if let Some(value) = lookup(ENV_DOMAIN_GATE) {
            self.domain_gate = parse_env(ENV_DOMAIN_GATE, &value)?;
        }
        self.validate()
    }

    pub fn content_rules(&self) -> ContentRules {
        ContentRules {
            fallback: self.content_fallback,
            iframe: self.iframe_rule,
        }
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.fetch.max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                key: "fetch.max_attempts",
                value: "0".to_string(),
            });
        }
        if self.fetch.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "fetch.timeout_secs",
                value: "0".to_string(),
            });
        }
        Ok(self)
    }
}

fn parse_env<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_match_constants() {
        let settings = Settings::default();
        assert_eq!(settings.fetch.timeout_secs, 5);
        assert_eq!(settings.fetch.max_attempts, 3);
        assert_eq!(settings.rank.endpoint, RANK_ENDPOINT);
        assert!(settings.rank.api_key.is_none());
        assert_eq!(settings.content_fallback, ContentFallback::Suspicious);
    }

    #[test]
    fn test_api_key_from_env() {
        let settings = Settings::default()
            .with_env(env(&[(ENV_RANK_API_KEY, " secret-key ")]))
            .unwrap();
        assert_eq!(settings.rank.api_key.unwrap().expose(), "secret-key");
    }

    #[test]
    fn test_blank_api_key_is_ignored() {
        let settings = Settings::default()
            .with_env(env(&[(ENV_RANK_API_KEY, "   ")]))
            .unwrap();
        assert!(settings.rank.api_key.is_none());
    }

    #[test]
    fn test_api_key_is_redacted_in_debug() {
        let mut settings = Settings::default();
        settings.rank.api_key = Some(ApiKey::new("hunter2"));
        let printed = format!("{:?}", settings);
        assert!(!printed.contains("hunter2"));
        assert!(printed.contains("ApiKey(***)"));
    }

    #[test]
    fn test_invalid_env_number() {
        let result = Settings::default().with_env(env(&[(ENV_FETCH_MAX_ATTEMPTS, "many")]));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { key: ENV_FETCH_MAX_ATTEMPTS, .. })
        ));
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let result = Settings::default().with_env(env(&[(ENV_FETCH_MAX_ATTEMPTS, "0")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_content_fallback_from_env() {
        let settings = Settings::default()
            .with_env(env(&[(ENV_CONTENT_FALLBACK, "zero")]))
            .unwrap();
        assert_eq!(settings.content_fallback, ContentFallback::ZeroFill);
    }

    #[test]
    fn test_iframe_rule_and_domain_gate_from_env() {
        let defaults = Settings::default();
        assert_eq!(defaults.iframe_rule, IframeRule::Markers);
        assert!(!defaults.domain_gate);

        let settings = defaults
            .with_env(env(&[(ENV_IFRAME_RULE, "elements"), (ENV_DOMAIN_GATE, "true")]))
            .unwrap();
        assert_eq!(settings.content_rules().iframe, IframeRule::Elements);
        assert!(settings.domain_gate);
    }

    #[test]
    fn test_invalid_domain_gate() {
        let result = Settings::default().with_env(env(&[(ENV_DOMAIN_GATE, "yes")]));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { key: ENV_DOMAIN_GATE, .. })
        ));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "rank": {{ "api_key": "from-file" }}, "content_fallback": "zero" }}"#
        )
        .unwrap();

        let settings = Settings::from_file(file.path()).unwrap();
        assert_eq!(settings.rank.api_key.unwrap().expose(), "from-file");
        assert_eq!(settings.rank.api_host, RANK_API_HOST);
        assert_eq!(settings.fetch.max_attempts, FETCH_MAX_ATTEMPTS);
        assert_eq!(settings.content_fallback, ContentFallback::ZeroFill);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = Settings::from_file(Path::new("/nonexistent/phishnet.json"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
