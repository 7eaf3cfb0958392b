use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::catalog::{DEFAULT_MODEL, EndpointKind};
use crate::client::ClientOptions;
use crate::error::{ChatError, Result};
use crate::models::GenerationSettings;

/// Main configuration structure for the chat client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub hub: HubConfig,
    #[serde(default)]
    pub generation: GenerationSettings,
    #[serde(default)]
    pub timeouts: TimeoutConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HubConfig {
    #[serde(default)]
    pub token: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub endpoint_type: EndpointKind,
    /// Used verbatim for custom and space endpoints
    #[serde(default)]
    pub custom_url: Option<String>,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    pub request_secs: u64,
    pub probe_secs: u64,
    pub warmup_backoff_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 30,
            probe_secs: 10,
            warmup_backoff_secs: 20,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hub: HubConfig {
                token: String::new(),
                model: default_model(),
                endpoint_type: EndpointKind::InferenceApi,
                custom_url: None,
            },
            generation: GenerationSettings::default(),
            timeouts: TimeoutConfig::default(),
        }
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!("Ignoring unparsable {}={:?}", key, raw);
            None
        }
    }
}

impl Config {
    /// Load configuration from file with environment variable overrides.
    /// Falls back to defaults when the file is missing or broken; only
    /// [`Config::validate`] decides whether the result is usable.
    pub fn load() -> Self {
        let env_paths = ["../.env", ".env"];
        let mut env_loaded = false;
        for path in &env_paths {
            if dotenvy::from_path(path).is_ok() {
                tracing::info!("Loaded .env from: {}", path);
                env_loaded = true;
                break;
            }
        }
        if !env_loaded {
            tracing::debug!("No .env file found - continuing with env vars only");
        }

        let config_path =
            env::var("JARVIS_CONFIG_PATH").unwrap_or_else(|_| "config.yaml".to_string());

        let mut config = if Path::new(&config_path).exists() {
            match fs::read_to_string(&config_path) {
                Ok(contents) => match Self::from_yaml(&contents) {
                    Ok(config) => {
                        tracing::info!("Loaded configuration from {}", config_path);
                        config
                    }
                    Err(e) => {
                        tracing::error!("{} in {} - using defaults", e, config_path);
                        Self::default()
                    }
                },
                Err(e) => {
                    tracing::error!(
                        "Failed to read config file {}: {} - using defaults",
                        config_path,
                        e
                    );
                    Self::default()
                }
            }
        } else {
            tracing::debug!("Config file not found at {} - using defaults", config_path);
            Self::default()
        };

        config.apply_env_overrides();
        config
    }

    pub fn from_yaml(contents: &str) -> Result<Self> {
        serde_yaml::from_str(contents)
            .map_err(|e| ChatError::Config(format!("Failed to parse config: {e}")))
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    /// Overlay settings from `lookup` (the process environment in production)
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(token) = lookup("HUGGINGFACE_TOKEN") {
            self.hub.token = token;
        }
        if let Some(model) = lookup("DEFAULT_MODEL") {
            self.hub.model = model;
        }
        if let Some(kind) = lookup("DEFAULT_ENDPOINT_TYPE") {
            match kind.parse() {
                Ok(kind) => self.hub.endpoint_type = kind,
                Err(e) => tracing::warn!("{} - keeping {}", e, self.hub.endpoint_type),
            }
        }
        if let Some(url) = lookup("CUSTOM_ENDPOINT_URL") {
            self.hub.custom_url = Some(url);
        }

        if let Some(v) = parse_var(&lookup, "MAX_RESPONSE_LENGTH") {
            self.generation.max_new_tokens = v;
        }
        if let Some(v) = parse_var(&lookup, "TEMPERATURE") {
            self.generation.temperature = v;
        }
        if let Some(v) = parse_var(&lookup, "TOP_P") {
            self.generation.top_p = v;
        }
        if let Some(v) = parse_var(&lookup, "HISTORY_WINDOW") {
            self.generation.history_window = v;
        }

        if let Some(v) = parse_var(&lookup, "REQUEST_TIMEOUT_SECS") {
            self.timeouts.request_secs = v;
        }
        if let Some(v) = parse_var(&lookup, "WARMUP_BACKOFF_SECS") {
            self.timeouts.warmup_backoff_secs = v;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.hub.token.trim().is_empty() {
            return Err(ChatError::Config(
                "HUGGINGFACE_TOKEN not found in environment or config".into(),
            ));
        }
        if self.hub.model.trim().is_empty() {
            return Err(ChatError::Config("Model id cannot be empty".into()));
        }
        validate_generation(&self.generation)?;
        if self.endpoint().is_none() {
            return Err(ChatError::Config(format!(
                "Endpoint type '{}' requires CUSTOM_ENDPOINT_URL",
                self.hub.endpoint_type
            )));
        }
        if self.timeouts.request_secs == 0 || self.timeouts.probe_secs == 0 {
            return Err(ChatError::Config("Timeouts must be at least one second".into()));
        }
        Ok(())
    }

    /// URL turns are posted to for the configured model
    pub fn endpoint(&self) -> Option<String> {
        self.hub
            .endpoint_type
            .endpoint_for(&self.hub.model, self.hub.custom_url.as_deref())
    }

    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            request_timeout: Duration::from_secs(self.timeouts.request_secs),
            probe_timeout: Duration::from_secs(self.timeouts.probe_secs),
            warmup_backoff: Duration::from_secs(self.timeouts.warmup_backoff_secs),
        }
    }
}

/// Range checks shared by startup validation and the `/set` command
pub fn validate_generation(settings: &GenerationSettings) -> Result<()> {
    if !(50..=500).contains(&settings.max_new_tokens) {
        return Err(ChatError::Config(
            "Max response length must be between 50 and 500".into(),
        ));
    }
    if !(0.1..=2.0).contains(&settings.temperature) {
        return Err(ChatError::Config(
            "Temperature must be between 0.1 and 2.0".into(),
        ));
    }
    if !(0.1..=1.0).contains(&settings.top_p) {
        return Err(ChatError::Config("Top P must be between 0.1 and 1.0".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn with_token() -> Config {
        let mut cfg = Config::default();
        cfg.hub.token = "hf_test".to_string();
        cfg
    }

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.hub.model, "microsoft/DialoGPT-large");
        assert_eq!(cfg.generation.max_new_tokens, 200);
        assert!((cfg.generation.temperature - 0.7).abs() < 1e-6);
        assert!((cfg.generation.top_p - 0.9).abs() < 1e-6);
        let opts = cfg.client_options();
        assert_eq!(opts.request_timeout, Duration::from_secs(30));
        assert_eq!(opts.probe_timeout, Duration::from_secs(10));
        assert_eq!(opts.warmup_backoff, Duration::from_secs(20));
    }

    #[test]
    fn test_missing_token_is_rejected() {
        let err = Config::default().validate().unwrap_err();
        assert!(matches!(err, ChatError::Config(_)));
        assert!(with_token().validate().is_ok());
    }

    #[test]
    fn test_generation_ranges() {
        let mut cfg = with_token();
        cfg.generation.temperature = 2.5;
        assert!(cfg.validate().is_err());

        let mut cfg = with_token();
        cfg.generation.max_new_tokens = 10;
        assert!(cfg.validate().is_err());

        let mut cfg = with_token();
        cfg.generation.top_p = 1.0;
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_custom_endpoint_requires_url() {
        let mut cfg = with_token();
        cfg.hub.endpoint_type = EndpointKind::CustomUrl;
        assert!(cfg.validate().is_err());

        cfg.hub.custom_url = Some("https://my-endpoint.test/generate".to_string());
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.endpoint().as_deref(), Some("https://my-endpoint.test/generate"));
    }

    #[test]
    fn test_from_yaml_fills_defaults() {
        let yaml = r#"
hub:
  token: hf_yaml
  model: google/flan-t5-large
  endpoint_type: Inference API
generation:
  max_new_tokens: 150
  temperature: 0.5
  top_p: 0.8
  history_window: 4
"#;
        let cfg = Config::from_yaml(yaml).expect("yaml should parse");
        assert_eq!(cfg.hub.token, "hf_yaml");
        assert_eq!(cfg.hub.endpoint_type, EndpointKind::InferenceApi);
        assert_eq!(cfg.generation.max_new_tokens, 150);
        assert_eq!(cfg.generation.history_window, 4);
        assert_eq!(cfg.timeouts.warmup_backoff_secs, 20);
        assert_eq!(
            cfg.endpoint().as_deref(),
            Some("https://api-inference.huggingface.co/models/google/flan-t5-large")
        );
    }

    #[test]
    fn test_from_yaml_rejects_garbage() {
        assert!(matches!(
            Config::from_yaml("hub: [unclosed"),
            Err(ChatError::Config(_))
        ));
    }

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_overrides_replace_file_values() {
        let mut cfg = Config::default();
        cfg.apply_overrides(vars(&[
            ("HUGGINGFACE_TOKEN", "hf_env"),
            ("DEFAULT_MODEL", "google/flan-t5-large"),
            ("DEFAULT_ENDPOINT_TYPE", "Custom URL"),
            ("CUSTOM_ENDPOINT_URL", "https://my-endpoint.test/generate"),
            ("MAX_RESPONSE_LENGTH", "300"),
            ("TEMPERATURE", " 1.2 "),
            ("HISTORY_WINDOW", "2"),
            ("WARMUP_BACKOFF_SECS", "5"),
        ]));

        assert_eq!(cfg.hub.token, "hf_env");
        assert_eq!(cfg.hub.model, "google/flan-t5-large");
        assert_eq!(cfg.hub.endpoint_type, EndpointKind::CustomUrl);
        assert_eq!(cfg.endpoint().as_deref(), Some("https://my-endpoint.test/generate"));
        assert_eq!(cfg.generation.max_new_tokens, 300);
        assert!((cfg.generation.temperature - 1.2).abs() < 1e-6);
        assert_eq!(cfg.generation.history_window, 2);
        assert_eq!(cfg.timeouts.warmup_backoff_secs, 5);
        assert_eq!(cfg.timeouts.request_secs, 30);
    }

    #[test]
    fn test_unparsable_overrides_are_ignored() {
        let mut cfg = Config::default();
        cfg.apply_overrides(vars(&[
            ("DEFAULT_ENDPOINT_TYPE", "carrier pigeon"),
            ("MAX_RESPONSE_LENGTH", "lots"),
            ("TOP_P", ""),
        ]));

        assert_eq!(cfg.hub.endpoint_type, EndpointKind::InferenceApi);
        assert_eq!(cfg.generation.max_new_tokens, 200);
        assert!((cfg.generation.top_p - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_parse_var_trims_and_rejects() {
        let lookup = vars(&[("A", " 42 "), ("B", "4x2")]);
        assert_eq!(parse_var::<u32>(&lookup, "A"), Some(42));
        assert_eq!(parse_var::<u32>(&lookup, "B"), None);
        assert_eq!(parse_var::<u32>(&lookup, "MISSING"), None);
    }
}
