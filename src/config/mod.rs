//! Configuration module for the Storage Box exporter.
//!
//! Provides YAML-based configuration loading, CLI/env overrides and
//! validation for:
//! - Server settings (listen address, metrics path)
//! - Hetzner API settings (token, token file, base URL)
//! - Response cache settings (TTL, size, cleanup interval)

mod app;
mod validation;

pub use app::{
    AppConfig, CacheConfig, ConfigOverrides, HetznerConfig, ServerConfig,
    DEFAULT_LISTEN_ADDRESS, DEFAULT_LOG_LEVEL, DEFAULT_METRICS_PATH, HEALTH_PATH,
};
pub use validation::{ConfigError, expand_env_vars, parse_duration, split_listen_address};
