//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub feed: FeedConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub cors_origins: Vec<String>,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8086
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: vec![
                "http://localhost:8088".to_string(),
                "http://127.0.0.1:8088".to_string(),
            ],
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// Simulated sensor feed configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    #[serde(default = "default_feed_enabled")]
    pub enabled: bool,

    #[serde(default = "default_tick_interval")]
    pub tick_interval_ms: u64,

    #[serde(default = "default_mean_size")]
    pub mean_size_mm: f64,

    #[serde(default = "default_size_jitter")]
    pub size_jitter_mm: f64,

    #[serde(default = "default_pellets_per_tick")]
    pub pellets_per_tick: u32,
}

fn default_feed_enabled() -> bool {
    false
}

fn default_tick_interval() -> u64 {
    3000
}

fn default_mean_size() -> f64 {
    10.0
}

fn default_size_jitter() -> f64 {
    1.5
}

fn default_pellets_per_tick() -> u32 {
    40
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            enabled: default_feed_enabled(),
            tick_interval_ms: default_tick_interval(),
            mean_size_mm: default_mean_size(),
            size_jitter_mm: default_size_jitter(),
            pellets_per_tick: default_pellets_per_tick(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,

    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        // Try default config locations
        let config_paths = [
            dirs::config_dir().map(|p| p.join("pelletmon").join("config.toml")),
            Some(PathBuf::from("/etc/pelletmon/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        // Fall back to environment-only config
        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        // API overrides
        if let Ok(host) = std::env::var("PELLETMON_API_HOST") {
            self.api.host = host;
        }
        if let Ok(port) = std::env::var("PELLETMON_API_PORT") {
            if let Ok(p) = port.parse() {
                self.api.port = p;
            }
        }

        // Feed overrides
        if let Ok(enabled) = std::env::var("PELLETMON_FEED_ENABLED") {
            self.feed.enabled = enabled.to_lowercase() != "false" && enabled != "0";
        }
        if let Ok(interval) = std::env::var("PELLETMON_FEED_INTERVAL_MS") {
            if let Ok(ms) = interval.parse() {
                self.feed.tick_interval_ms = ms;
            }
        }

        // Logging overrides
        if let Ok(level) = std::env::var("PELLETMON_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("PELLETMON_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Pelletmon Configuration
#
# Environment variables override these settings:
# - PELLETMON_API_HOST
# - PELLETMON_API_PORT
# - PELLETMON_FEED_ENABLED
# - PELLETMON_FEED_INTERVAL_MS
# - PELLETMON_LOG_LEVEL
# - PELLETMON_LOG_FORMAT

[api]
# API server host
host = "0.0.0.0"

# API server port
port = 8086

# Allowed CORS origins
cors_origins = ["http://localhost:8088", "http://127.0.0.1:8088"]

# Request timeout in seconds
request_timeout_secs = 30

[feed]
# Start a simulated sensor feed on startup
enabled = false

# Sampling tick interval (ms)
tick_interval_ms = 3000

# Center of the simulated size distribution (mm)
mean_size_mm = 10.0

# Simulated size spread around the mean (mm)
size_jitter_mm = 1.5

# Pellets counted per tick
pellets_per_tick = 40

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"

# Optional log file path
# file = "/var/log/pelletmon/pelletmon.log"
"#
    .to_string()
}
