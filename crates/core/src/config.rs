use serde::Deserialize;

/// Root application configuration. Loaded from environment variables
/// with the prefix `SEGMENT_RELAY__`.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_node_id")]
    pub node_id: String,
    #[serde(default)]
    pub delivery: DeliveryConfig,
    #[serde(default)]
    pub suggestions: SuggestionConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeliveryConfig {
    /// Maximum communication-log writes submitted concurrently; batches
    /// beyond this size are processed strictly one after another.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Probability that the simulated transport reports a message as sent.
    #[serde(default = "default_success_rate")]
    pub success_rate: f64,
    /// Cadence for read-side progress polling.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SuggestionConfig {
    #[serde(default = "default_suggestions_enabled")]
    pub enabled: bool,
    /// API key for a remote text-generation provider. Absent in
    /// development; the template provider is used instead.
    #[serde(default)]
    pub api_key: Option<String>,
}

fn default_node_id() -> String {
    "node-01".to_string()
}
fn default_batch_size() -> usize {
    50
}
fn default_success_rate() -> f64 {
    0.9
}
fn default_poll_interval_ms() -> u64 {
    2000
}
fn default_suggestions_enabled() -> bool {
    true
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            success_rate: default_success_rate(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            enabled: default_suggestions_enabled(),
            api_key: None,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            node_id: default_node_id(),
            delivery: DeliveryConfig::default(),
            suggestions: SuggestionConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder().add_source(
            config::Environment::with_prefix("SEGMENT_RELAY")
                .separator("__")
                .try_parsing(true)
                .list_separator(","),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.delivery.batch_size, 50);
        assert!(config.delivery.success_rate > 0.0 && config.delivery.success_rate <= 1.0);
        assert!(config.suggestions.enabled);
        assert!(config.suggestions.api_key.is_none());
    }
}
