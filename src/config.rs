use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use crate::core::DEFAULT_MAX_RESULTS;
use crate::models::WeightVector;
use crate::services::TextGenConfig;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub catalog: CatalogSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub explainer: ExplainerSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogSettings {
    /// JSON file with the plan catalog; the built-in catalog is used when unset
    pub path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            max_results: default_max_results(),
        }
    }
}

fn default_max_results() -> usize { DEFAULT_MAX_RESULTS }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
}

/// Base weights before priority adjustments
#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_coverage_weight")]
    pub coverage: f64,
    #[serde(default = "default_price_weight")]
    pub price: f64,
    #[serde(default = "default_features_weight")]
    pub features: f64,
    #[serde(default = "default_demographics_weight")]
    pub demographics: f64,
    #[serde(default = "default_priorities_weight")]
    pub priorities: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            coverage: default_coverage_weight(),
            price: default_price_weight(),
            features: default_features_weight(),
            demographics: default_demographics_weight(),
            priorities: default_priorities_weight(),
        }
    }
}

impl From<&WeightsConfig> for WeightVector {
    fn from(config: &WeightsConfig) -> Self {
        WeightVector {
            coverage: config.coverage,
            price: config.price,
            features: config.features,
            demographics: config.demographics,
            priorities: config.priorities,
        }
    }
}

fn default_coverage_weight() -> f64 { 0.25 }
fn default_price_weight() -> f64 { 0.25 }
fn default_features_weight() -> f64 { 0.20 }
fn default_demographics_weight() -> f64 { 0.15 }
fn default_priorities_weight() -> f64 { 0.15 }

/// Text-generation collaborator settings
#[derive(Debug, Clone, Deserialize)]
pub struct ExplainerSettings {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_explainer_endpoint")]
    pub endpoint: String,
    pub api_key: Option<String>,
    #[serde(default = "default_explainer_model")]
    pub model: String,
    #[serde(default = "default_explainer_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_explainer_timeout")]
    pub timeout_secs: u64,
}

impl Default for ExplainerSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: default_explainer_endpoint(),
            api_key: None,
            model: default_explainer_model(),
            max_tokens: default_explainer_max_tokens(),
            timeout_secs: default_explainer_timeout(),
        }
    }
}

impl ExplainerSettings {
    /// Connection settings, if the collaborator is enabled and has a key
    pub fn text_gen_config(&self) -> Option<TextGenConfig> {
        if !self.enabled {
            return None;
        }

        let api_key = self.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())?;

        Some(TextGenConfig {
            endpoint: self.endpoint.clone(),
            api_key: api_key.to_string(),
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            timeout: Duration::from_secs(self.timeout_secs),
        })
    }
}

fn default_explainer_endpoint() -> String { "https://api.anthropic.com/v1/messages".to_string() }
fn default_explainer_model() -> String { "claude-sonnet-4-5".to_string() }
fn default_explainer_max_tokens() -> u32 { 1024 }
fn default_explainer_timeout() -> u64 { 10 }

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

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with PLANMATCH_)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., PLANMATCH__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("PLANMATCH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = substitute_env_vars(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a single required file
    ///
    /// Used when `PLANMATCH_CONFIG` points at a file; environment variables
    /// still override it.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            .add_source(File::from(path.as_ref()).required(true))
            .add_source(
                Environment::with_prefix("PLANMATCH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = substitute_env_vars(settings)?;

        settings.try_deserialize()
    }
}

/// Pick up the text-generation API key from the conventional variable
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    let mut builder = Config::builder().add_source(settings);

    if let Ok(api_key) = std::env::var("TEXTGEN_API_KEY") {
        builder = builder.set_override("explainer.api_key", api_key)?;
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights() {
        let weights = WeightVector::from(&WeightsConfig::default());
        assert_eq!(weights, WeightVector::default());
    }

    #[test]
    fn test_default_logging() {
        let level = default_log_level();
        let format = default_log_format();
        assert_eq!(level, "info");
        assert_eq!(format, "json");
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let settings: Settings = Config::builder()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.matching.max_results, 3);
        assert!(settings.catalog.path.is_none());
        assert!(!settings.explainer.enabled);
    }

    #[test]
    fn test_explainer_requires_enabled_and_key() {
        let mut explainer = ExplainerSettings::default();
        assert!(explainer.text_gen_config().is_none());

        explainer.enabled = true;
        assert!(explainer.text_gen_config().is_none());

        explainer.api_key = Some("   ".to_string());
        assert!(explainer.text_gen_config().is_none());

        explainer.api_key = Some("secret".to_string());
        let config = explainer.text_gen_config().unwrap();
        assert_eq!(config.api_key, "secret");
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    fn write_temp_config(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("{}-{}.toml", name, uuid::Uuid::new_v4()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_from_file() {
        let path = write_temp_config(
            "plan-match-config",
            r#"
[server]
port = 9191

[matching]
max_results = 5

[scoring.weights]
price = 0.4

[catalog]
path = "data/plans.json"
"#,
        );

        let settings = Settings::load_from(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(settings.server.port, 9191);
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.matching.max_results, 5);
        assert_eq!(settings.scoring.weights.price, 0.4);
        assert_eq!(settings.scoring.weights.coverage, 0.25);
        assert_eq!(settings.catalog.path.as_deref(), Some("data/plans.json"));
    }

    #[test]
    fn test_load_from_missing_file_fails() {
        let path = std::env::temp_dir().join(format!("plan-match-missing-{}.toml", uuid::Uuid::new_v4()));
        assert!(Settings::load_from(&path).is_err());
    }

    #[test]
    fn test_partial_config_section() {
        let settings: Settings = Config::builder()
            .set_override("scoring.weights.price", 0.5)
            .unwrap()
            .set_override("explainer.enabled", true)
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.scoring.weights.price, 0.5);
        assert_eq!(settings.scoring.weights.coverage, 0.25);
        assert!(settings.explainer.enabled);
    }
}
