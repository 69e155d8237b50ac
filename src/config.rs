use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Catalog source configuration
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Favorite storage configuration
    #[serde(default)]
    pub state: StateConfig,

    /// Facade behaviour
    #[serde(default)]
    pub service: ServiceConfig,

    /// External recommendation function
    #[serde(default)]
    pub advisor: AdvisorConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self, config::ConfigError> {
        let config_path = std::env::var("PROPERTY_BROWSER_CONFIG")
            .unwrap_or_else(|_| "config/property-browser.toml".to_string());

        config::Config::builder()
            // Start with default values
            .add_source(config::File::from_str(
                include_str!("../config/default.toml"),
                config::FileFormat::Toml,
            ))
            // Override with config file if it exists
            .add_source(config::File::with_name(&config_path).required(false))
            // Override with environment variables (prefix: PROPERTY_BROWSER__)
            .add_source(
                config::Environment::with_prefix("PROPERTY_BROWSER")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// JSON file holding the property array; no path means an empty catalog
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateConfig {
    /// State backend type
    #[serde(default)]
    pub backend: StateBackend,

    /// Path for the embedded database
    pub path: Option<PathBuf>,

    /// Storage key holding the serialized favorite ids
    #[serde(default = "default_favorites_key")]
    pub favorites_key: String,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            backend: StateBackend::default(),
            path: None,
            favorites_key: default_favorites_key(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum StateBackend {
    #[default]
    Sled,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Artificial delay applied to every read (milliseconds)
    #[serde(default = "default_read_latency")]
    pub read_latency_ms: u64,

    /// Artificial delay applied to favorite toggles (milliseconds)
    #[serde(default = "default_toggle_latency")]
    pub toggle_latency_ms: u64,

    /// When set, every Nth collection read fails with a transient error
    #[serde(default)]
    pub fault_injection_every: Option<u32>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            read_latency_ms: default_read_latency(),
            toggle_latency_ms: default_toggle_latency(),
            fault_injection_every: None,
        }
    }
}

impl ServiceConfig {
    /// Configuration without artificial latency, for tests and batch tools
    pub fn immediate() -> Self {
        Self {
            read_latency_ms: 0,
            toggle_latency_ms: 0,
            fault_injection_every: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisorConfig {
    /// Enable the recommendation function
    #[serde(default)]
    pub enabled: bool,

    /// Function endpoint URL
    pub endpoint: Option<String>,

    /// Environment variable holding the API key
    pub api_key_env: Option<String>,

    /// Request timeout (seconds)
    #[serde(default = "default_advisor_timeout")]
    pub timeout_secs: u64,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: None,
            api_key_env: None,
            timeout_secs: default_advisor_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub json_logs: bool,

    /// Enable Prometheus metrics
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logs: false,
            metrics_enabled: true,
        }
    }
}

// Default value functions
fn default_favorites_key() -> String {
    "propertyFavorites".to_string()
}

fn default_read_latency() -> u64 {
    300
}

fn default_toggle_latency() -> u64 {
    100
}

fn default_advisor_timeout() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        assert_eq!(default_read_latency(), 300);
        assert_eq!(default_toggle_latency(), 100);
        assert_eq!(default_favorites_key(), "propertyFavorites");
        assert_eq!(default_log_level(), "info");
        assert!(default_true());
    }

    #[test]
    fn test_state_backend() {
        assert_eq!(StateBackend::default(), StateBackend::Sled);
    }

    #[test]
    fn test_embedded_defaults_parse() {
        let config: Config = config::Config::builder()
            .add_source(config::File::from_str(
                include_str!("../config/default.toml"),
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.state.favorites_key, "propertyFavorites");
        assert_eq!(config.service.read_latency_ms, 300);
        assert!(config.service.fault_injection_every.is_none());
        assert!(!config.advisor.enabled);
    }
}
