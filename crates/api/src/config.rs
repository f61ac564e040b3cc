//! Service configuration
//!
//! Loaded from an optional `config/fleet-scoring.{toml,yaml,json}` file and
//! `FLEET__`-prefixed environment variables (e.g. `FLEET__SCORING__FATIGUE_PENALTY=15`).

use serde::{Deserialize, Serialize};
use sobriety::InterlockConfig;
use trust_score::{ClassifierConfig, EfficiencyConfig, ScoringConfig};

pub const DEFAULT_CONFIG_PATH: &str = "config/fleet-scoring";

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Max level: trace, debug, info, warn, error
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Top-level service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub bind_addr: String,
    /// Expose Prometheus metrics at /metrics
    pub metrics_enabled: bool,
    pub logging: LoggingConfig,
    pub scoring: ScoringConfig,
    pub classifier: ClassifierConfig,
    pub efficiency: EfficiencyConfig,
    pub interlock: InterlockConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            metrics_enabled: true,
            logging: LoggingConfig::default(),
            scoring: ScoringConfig::default(),
            classifier: ClassifierConfig::default(),
            efficiency: EfficiencyConfig::default(),
            interlock: InterlockConfig::default(),
        }
    }
}

/// Load configuration; a missing file falls back to defaults
///
/// Scoring weights are validated before the config is returned.
pub fn load_config(path: &str) -> anyhow::Result<ServiceConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name(path).required(false))
        .add_source(
            config::Environment::with_prefix("FLEET")
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?;

    let config: ServiceConfig = settings.try_deserialize()?;
    config.scoring.validate()?;
    Ok(config)
}
