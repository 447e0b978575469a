use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub bootstrap: BootstrapSettings,
    #[serde(default)]
    pub engine: EngineSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Static catalog inputs, loaded once before any live event is processed.
#[derive(Debug, Clone, Deserialize)]
pub struct BootstrapSettings {
    pub riders_file: String,
    pub businesses_file: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EngineSettings {
    #[serde(default = "default_partitions")]
    pub partitions: usize,
    #[serde(default = "default_queue_depth")]
    pub queue_depth: usize,
    /// Anti-flicker threshold for interest updates, in milliseconds.
    #[serde(default = "default_interest_min_duration_ms")]
    pub interest_min_duration_ms: i64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            partitions: default_partitions(),
            queue_depth: default_queue_depth(),
            interest_min_duration_ms: default_interest_min_duration_ms(),
        }
    }
}

fn default_partitions() -> usize {
    4
}
fn default_queue_depth() -> usize {
    256
}
fn default_interest_min_duration_ms() -> i64 {
    5 * 60 * 1000
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Environment variables (prefixed with ADMATCH_)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            // Add default config file
            .add_source(File::with_name("config/default").required(false))
            // Add local config file (for development overrides)
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables (prefixed with ADMATCH_)
            // e.g., ADMATCH_SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("ADMATCH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("ADMATCH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_engine_settings() {
        let engine = EngineSettings::default();
        assert_eq!(engine.partitions, 4);
        assert_eq!(engine.queue_depth, 256);
        assert_eq!(engine.interest_min_duration_ms, 300_000);
    }

    #[test]
    fn test_default_logging() {
        let logging = LoggingSettings::default();
        assert_eq!(logging.level, "info");
        assert_eq!(logging.format, "json");
    }
}
