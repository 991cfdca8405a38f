//! Application configuration structures.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cache::{CacheSettings, DEFAULT_CLEANUP_INTERVAL};
use crate::hetzner::DEFAULT_BASE_URL;

use super::validation::{ConfigError, duration_serde, expand_env_vars, split_listen_address};

// =============================================================================
// Constants
// =============================================================================

/// Default listen address (all interfaces, port 9509).
pub const DEFAULT_LISTEN_ADDRESS: &str = ":9509";

/// Default metrics path.
pub const DEFAULT_METRICS_PATH: &str = "/metrics";

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Path reserved for the liveness endpoint.
pub const HEALTH_PATH: &str = "/health";

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

fn default_cleanup_interval() -> Duration {
    DEFAULT_CLEANUP_INTERVAL
}

// =============================================================================
// Server Configuration
// =============================================================================

/// Web server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address, `host:port` or `:port` (default: ":9509").
    pub listen_address: String,

    /// Path serving the metrics (default: "/metrics").
    pub metrics_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_address: DEFAULT_LISTEN_ADDRESS.to_string(),
            metrics_path: DEFAULT_METRICS_PATH.to_string(),
        }
    }
}

impl ServerConfig {
    /// Address suitable for `TcpListener::bind`; an empty host binds all interfaces.
    pub fn bind_address(&self) -> Result<String, ConfigError> {
        let (host, port) = split_listen_address(&self.listen_address)?;
        let host = if host.is_empty() { "0.0.0.0" } else { host };
        Ok(format!("{host}:{port}"))
    }
}

// =============================================================================
// Hetzner Configuration
// =============================================================================

/// Upstream API configuration.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HetznerConfig {
    /// API token. Supports `${VAR}` expansion when read from YAML.
    pub token: Option<String>,

    /// File holding the API token. Mutually exclusive with `token`.
    pub token_file: Option<PathBuf>,

    /// API base URL (default: "https://api.hetzner.com/v1").
    pub api_base_url: String,
}

impl Default for HetznerConfig {
    fn default() -> Self {
        Self {
            token: None,
            token_file: None,
            api_base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl std::fmt::Debug for HetznerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HetznerConfig")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("token_file", &self.token_file)
            .field("api_base_url", &self.api_base_url)
            .finish()
    }
}

// =============================================================================
// Cache Configuration
// =============================================================================

/// Response cache configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Time-to-live of cached listings; zero disables caching (default: 0).
    #[serde(with = "duration_serde")]
    pub ttl: Duration,

    /// Advisory byte budget; zero means unlimited (default: 0).
    pub max_size: u64,

    /// Interval between cleanup passes (default: 10s).
    #[serde(with = "duration_serde")]
    pub cleanup_interval: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::ZERO,
            max_size: 0,
            cleanup_interval: default_cleanup_interval(),
        }
    }
}

// =============================================================================
// Overrides
// =============================================================================

/// Values from CLI flags or environment variables. `None` keeps the file value.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub listen_address: Option<String>,
    pub metrics_path: Option<String>,
    pub log_level: Option<String>,
    pub token: Option<String>,
    pub token_file: Option<PathBuf>,
    pub api_base_url: Option<String>,
    pub cache_ttl: Option<Duration>,
    pub cache_max_size: Option<u64>,
    pub cache_cleanup_interval: Option<Duration>,
}

// =============================================================================
// Application Configuration
// =============================================================================

/// Top-level application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Web server configuration.
    pub server: ServerConfig,

    /// Hetzner API configuration.
    pub hetzner: HetznerConfig,

    /// Response cache configuration.
    pub cache: CacheConfig,

    /// Log level used when `RUST_LOG` is unset (default: "info").
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            hetzner: HetznerConfig::default(),
            cache: CacheConfig::default(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a YAML file.
    ///
    /// The file is not validated here: overrides still have to be applied.
    ///
    /// # Errors
    /// Returns `ConfigError` if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text, expanding `${VAR}` in the token.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yaml::from_str(content)?;
        if let Some(token) = config.hetzner.token.take() {
            let token = expand_env_vars(&token);
            config.hetzner.token = (!token.trim().is_empty()).then_some(token);
        }
        Ok(config)
    }

    /// Apply CLI/env overrides on top of the loaded values.
    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(listen_address) = overrides.listen_address {
            self.server.listen_address = listen_address;
        }
        if let Some(metrics_path) = overrides.metrics_path {
            self.server.metrics_path = metrics_path;
        }
        if let Some(log_level) = overrides.log_level {
            self.log_level = log_level;
        }
        if let Some(token) = overrides.token.filter(|t| !t.is_empty()) {
            self.hetzner.token = Some(token);
        }
        if let Some(token_file) = overrides.token_file.filter(|p| !p.as_os_str().is_empty()) {
            self.hetzner.token_file = Some(token_file);
        }
        if let Some(api_base_url) = overrides.api_base_url {
            self.hetzner.api_base_url = api_base_url;
        }
        if let Some(ttl) = overrides.cache_ttl {
            self.cache.ttl = ttl;
        }
        if let Some(max_size) = overrides.cache_max_size {
            self.cache.max_size = max_size;
        }
        if let Some(cleanup_interval) = overrides.cache_cleanup_interval {
            self.cache.cleanup_interval = cleanup_interval;
        }
    }

    /// Validate configuration values.
    ///
    /// Token presence is checked by [`resolve_token`](Self::resolve_token),
    /// which has to read the token file anyway.
    ///
    /// # Errors
    /// Returns `ConfigError::ValidationError` if any field is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.hetzner.token.is_some() && self.hetzner.token_file.is_some() {
            return Err(ConfigError::ValidationError(
                "hetzner token and token file are mutually exclusive".to_string(),
            ));
        }

        let path = &self.server.metrics_path;
        if !path.starts_with('/') {
            return Err(ConfigError::ValidationError(format!(
                "metrics path must start with '/': '{path}'"
            )));
        }
        if path == "/" || path == HEALTH_PATH {
            return Err(ConfigError::ValidationError(format!(
                "metrics path '{path}' collides with a built-in route"
            )));
        }

        split_listen_address(&self.server.listen_address)?;

        if !LOG_LEVELS.contains(&self.log_level.to_ascii_lowercase().as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "invalid log level '{}': expected one of {}",
                self.log_level,
                LOG_LEVELS.join(", ")
            )));
        }

        if self.hetzner.api_base_url.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "hetzner api base url must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Return the API token, reading and trimming the token file if one is set.
    ///
    /// # Errors
    /// Returns `ConfigError` if the file cannot be read, is empty, or no token
    /// is configured at all.
    pub fn resolve_token(&self) -> Result<String, ConfigError> {
        if let Some(path) = &self.hetzner.token_file {
            let content = std::fs::read_to_string(path).map_err(|source| ConfigError::TokenFile {
                path: path.clone(),
                source,
            })?;
            let token = content.trim();
            if token.is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "token file '{}' is empty",
                    path.display()
                )));
            }
            return Ok(token.to_string());
        }

        match &self.hetzner.token {
            Some(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
            _ => Err(ConfigError::ValidationError(
                "a Hetzner API token is required (HETZNER_TOKEN or HETZNER_TOKEN_FILE)"
                    .to_string(),
            )),
        }
    }

    /// Cache settings with the zero cleanup interval replaced by the default.
    pub fn cache_settings(&self) -> CacheSettings {
        let cleanup_interval = if self.cache.cleanup_interval.is_zero() {
            DEFAULT_CLEANUP_INTERVAL
        } else {
            self.cache.cleanup_interval
        };
        CacheSettings {
            ttl: self.cache.ttl,
            max_size: self.cache.max_size,
            cleanup_interval,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn with_token(token: &str) -> AppConfig {
        let mut config = AppConfig::default();
        config.hetzner.token = Some(token.to_string());
        config
    }

    // =========================================================================
    // Defaults
    // =========================================================================

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.listen_address, ":9509");
        assert_eq!(config.server.metrics_path, "/metrics");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.hetzner.api_base_url, "https://api.hetzner.com/v1");
        assert_eq!(config.cache.ttl, Duration::ZERO);
        assert_eq!(config.cache.max_size, 0);
        assert_eq!(config.cache.cleanup_interval, Duration::from_secs(10));
        assert!(!config.cache_settings().is_enabled());
    }

    #[test]
    fn test_bind_address() {
        let mut config = AppConfig::default();
        assert_eq!(config.server.bind_address().unwrap(), "0.0.0.0:9509");

        config.server.listen_address = "127.0.0.1:8080".to_string();
        assert_eq!(config.server.bind_address().unwrap(), "127.0.0.1:8080");
    }

    // =========================================================================
    // YAML
    // =========================================================================

    #[test]
    fn test_from_yaml() {
        let yaml = r#"
server:
  listen_address: "127.0.0.1:9000"
  metrics_path: /probe
hetzner:
  token: abc
cache:
  ttl: 60
  cleanup_interval: 30s
log_level: debug
"#;
        let config = AppConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.server.listen_address, "127.0.0.1:9000");
        assert_eq!(config.server.metrics_path, "/probe");
        assert_eq!(config.hetzner.token.as_deref(), Some("abc"));
        assert_eq!(config.cache.ttl, Duration::from_secs(60));
        assert_eq!(config.cache.cleanup_interval, Duration::from_secs(30));
        assert_eq!(config.cache.max_size, 0);
        assert_eq!(config.log_level, "debug");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_yaml_partial_uses_defaults() {
        let config = AppConfig::from_yaml("cache:\n  ttl: 1m\n").unwrap();
        assert_eq!(config.cache.ttl, Duration::from_secs(60));
        assert_eq!(config.server, ServerConfig::default());
        assert_eq!(config.cache.cleanup_interval, DEFAULT_CLEANUP_INTERVAL);
    }

    #[test]
    fn test_from_yaml_expands_token() {
        let config =
            AppConfig::from_yaml("hetzner:\n  token: ${NONEXISTENT_STORAGEBOX_TOKEN:-from-default}\n")
                .unwrap();
        assert_eq!(config.hetzner.token.as_deref(), Some("from-default"));

        let config =
            AppConfig::from_yaml("hetzner:\n  token: ${NONEXISTENT_STORAGEBOX_TOKEN}\n").unwrap();
        assert_eq!(config.hetzner.token, None);
    }

    #[test]
    fn test_from_yaml_invalid_duration() {
        assert!(matches!(
            AppConfig::from_yaml("cache:\n  ttl: soon\n"),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            AppConfig::load("/nonexistent/storagebox.yaml"),
            Err(ConfigError::IoError(_))
        ));
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "server:\n  listen_address: \":9100\"").unwrap();
        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.server.listen_address, ":9100");
    }

    // =========================================================================
    // Overrides
    // =========================================================================

    #[test]
    fn test_apply_overrides() {
        let mut config = with_token("from-file");
        config.apply_overrides(ConfigOverrides {
            listen_address: Some(":9999".to_string()),
            token: Some("from-env".to_string()),
            cache_ttl: Some(Duration::from_secs(120)),
            ..Default::default()
        });

        assert_eq!(config.server.listen_address, ":9999");
        assert_eq!(config.server.metrics_path, "/metrics");
        assert_eq!(config.hetzner.token.as_deref(), Some("from-env"));
        assert_eq!(config.cache.ttl, Duration::from_secs(120));
    }

    #[test]
    fn test_apply_overrides_ignores_empty_token() {
        let mut config = with_token("from-file");
        config.apply_overrides(ConfigOverrides {
            token: Some(String::new()),
            ..Default::default()
        });
        assert_eq!(config.hetzner.token.as_deref(), Some("from-file"));
    }

    // =========================================================================
    // Validation
    // =========================================================================

    #[test]
    fn test_validate_token_exclusive() {
        let mut config = with_token("abc");
        config.hetzner.token_file = Some(PathBuf::from("/run/secrets/token"));
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("mutually exclusive"));
    }

    #[test]
    fn test_validate_metrics_path() {
        for path in ["metrics", "/", "/health"] {
            let mut config = with_token("abc");
            config.server.metrics_path = path.to_string();
            assert!(config.validate().is_err(), "{path}");
        }

        let mut config = with_token("abc");
        config.server.metrics_path = "/custom/metrics".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_listen_address() {
        let mut config = with_token("abc");
        config.server.listen_address = "9509".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_log_level() {
        let mut config = with_token("abc");
        config.log_level = "WARN".to_string();
        assert!(config.validate().is_ok());

        config.log_level = "verbose".to_string();
        assert!(config.validate().is_err());
    }

    // =========================================================================
    // Token resolution
    // =========================================================================

    #[test]
    fn test_resolve_token_direct() {
        assert_eq!(with_token(" abc \n").resolve_token().unwrap(), "abc");
    }

    #[test]
    fn test_resolve_token_missing() {
        let err = AppConfig::default().resolve_token().unwrap_err();
        assert!(err.to_string().contains("token is required"));
    }

    #[test]
    fn test_resolve_token_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "  file-token  ").unwrap();

        let mut config = AppConfig::default();
        config.hetzner.token_file = Some(file.path().to_path_buf());
        assert_eq!(config.resolve_token().unwrap(), "file-token");
    }

    #[test]
    fn test_resolve_token_file_empty() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "   ").unwrap();

        let mut config = AppConfig::default();
        config.hetzner.token_file = Some(file.path().to_path_buf());
        let err = config.resolve_token().unwrap_err();
        assert!(err.to_string().contains("is empty"));
    }

    #[test]
    fn test_resolve_token_file_unreadable() {
        let mut config = AppConfig::default();
        config.hetzner.token_file = Some(PathBuf::from("/nonexistent/token"));
        assert!(matches!(
            config.resolve_token(),
            Err(ConfigError::TokenFile { .. })
        ));
    }

    // =========================================================================
    // Cache settings
    // =========================================================================

    #[test]
    fn test_cache_settings_zero_cleanup_falls_back() {
        let mut config = AppConfig::default();
        config.cache.ttl = Duration::from_secs(60);
        config.cache.cleanup_interval = Duration::ZERO;
        config.cache.max_size = 1024;

        let settings = config.cache_settings();
        assert!(settings.is_enabled());
        assert_eq!(settings.ttl, Duration::from_secs(60));
        assert_eq!(settings.max_size, 1024);
        assert_eq!(settings.cleanup_interval, DEFAULT_CLEANUP_INTERVAL);
    }

    #[test]
    fn test_hetzner_config_debug_redacts_token() {
        let config = with_token("super-secret");
        let debug = format!("{:?}", config.hetzner);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
    }
}
