//! Configuration file parsing for the server.
//!
//! Loads settings from TOML files including bind address, LLM endpoint
//! credentials, model identifier and the use case table.

use jarvis_domain::{UseCaseDefinition, UseCaseRegistry};
use jarvis_extractor::ExtractorConfig;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Environment variable that overrides `llm.api_key`
pub const API_KEY_ENV: &str = "JARVIS_LLM_API_KEY";

/// Server configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Missing required field
    #[error("Missing required configuration field: {0}")]
    MissingField(String),

    /// Field present but unusable
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Server configuration loaded from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1")
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Bind port (e.g., 8080)
    #[serde(default = "default_bind_port")]
    pub bind_port: u16,

    /// Minimum confidence for extracted entities
    ///
    /// Accepted for compatibility but not used by the extraction logic.
    #[serde(default)]
    pub confidence_threshold: Option<f64>,

    /// LLM endpoint settings
    pub llm: LlmConfig,

    /// Optional function naming overrides (`[extractor]`)
    #[serde(default)]
    pub extractor: ExtractorConfig,

    /// Use case table, keyed by use case name
    #[serde(default)]
    pub cases: BTreeMap<String, UseCaseFields>,
}

/// LLM endpoint settings
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    /// Azure OpenAI resource endpoint
    pub endpoint: String,

    /// Resource key (may be supplied via `JARVIS_LLM_API_KEY` instead)
    #[serde(default)]
    pub api_key: String,

    /// Model deployment identifier
    pub model: String,

    /// REST API version
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Optional per-request timeout; unset means no timeout
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

/// Field governance for one use case
#[derive(Debug, Clone, Deserialize)]
pub struct UseCaseFields {
    /// The only keys a result may contain
    pub allowed_fields: BTreeSet<String>,

    /// Keys whose absence is reported as missing
    #[serde(default)]
    pub required_fields: BTreeSet<String>,
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_bind_port() -> u16 {
    8080
}

fn default_api_version() -> String {
    jarvis_llm::azure::DEFAULT_API_VERSION.to_string()
}

impl ServerConfig {
    /// Load configuration from a TOML file
    ///
    /// `JARVIS_LLM_API_KEY`, when set, replaces `llm.api_key`.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&contents)?;

        if let Ok(key) = std::env::var(API_KEY_ENV) {
            config.llm.api_key = key;
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a TOML string without validating it
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Validate required fields
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.llm.endpoint.trim().is_empty() {
            return Err(ConfigError::MissingField("llm.endpoint".to_string()));
        }
        if self.llm.api_key.trim().is_empty() {
            return Err(ConfigError::MissingField(format!(
                "llm.api_key (or {})",
                API_KEY_ENV
            )));
        }
        if self.llm.model.trim().is_empty() {
            return Err(ConfigError::MissingField("llm.model".to_string()));
        }
        if self.llm.request_timeout_secs == Some(0) {
            return Err(ConfigError::Invalid(
                "llm.request_timeout_secs must be greater than 0".to_string(),
            ));
        }
        self.extractor_config()
            .validate()
            .map_err(|e| ConfigError::Invalid(format!("extractor: {}", e)))?;
        if self.cases.is_empty() {
            return Err(ConfigError::MissingField("cases".to_string()));
        }
        for (name, fields) in &self.cases {
            if name.trim().is_empty() {
                return Err(ConfigError::Invalid("use case name must not be blank".to_string()));
            }
            if fields.allowed_fields.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "use case '{}' has no allowed_fields",
                    name
                )));
            }
        }
        Ok(())
    }

    /// Create a default configuration for testing
    pub fn default_test_config() -> Self {
        let mut cases = BTreeMap::new();
        cases.insert(
            "CreateShipment".to_string(),
            UseCaseFields {
                allowed_fields: ["origin", "destination", "weight"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
                required_fields: ["origin", "destination"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            },
        );

        ServerConfig {
            bind_address: default_bind_address(),
            bind_port: default_bind_port(),
            confidence_threshold: None,
            llm: LlmConfig {
                endpoint: "https://example.openai.azure.com".to_string(),
                api_key: "test-key-do-not-use-in-production".to_string(),
                model: "gpt-4o".to_string(),
                api_version: default_api_version(),
                request_timeout_secs: None,
            },
            extractor: ExtractorConfig::default(),
            cases,
        }
    }

    /// Get the full bind address (address:port)
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.bind_port)
    }

    /// Build the immutable use case registry
    pub fn registry(&self) -> UseCaseRegistry {
        UseCaseRegistry::from_definitions(self.cases.iter().map(|(name, fields)| {
            UseCaseDefinition::new(
                name.clone(),
                fields.allowed_fields.iter().cloned(),
                fields.required_fields.iter().cloned(),
            )
        }))
    }

    /// Extractor settings: `[extractor]` naming plus the LLM section's model
    pub fn extractor_config(&self) -> ExtractorConfig {
        ExtractorConfig {
            model: self.llm.model.clone(),
            ..self.extractor.clone()
        }
    }

    /// Outbound request timeout, if configured
    pub fn request_timeout(&self) -> Option<Duration> {
        self.llm.request_timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        bind_address = "0.0.0.0"
        bind_port = 9000
        confidence_threshold = 0.8

        [llm]
        endpoint = "https://acme.openai.azure.com"
        api_key = "secret"
        model = "gpt-4o"
        request_timeout_secs = 20

        [cases.CreateShipment]
        allowed_fields = ["origin", "destination", "weight"]
        required_fields = ["origin", "destination"]

        [cases.TrackShipment]
        allowed_fields = ["tracking_number"]
    "#;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default_test_config();
        assert_eq!(config.bind_address, "127.0.0.1");
        assert_eq!(config.bind_port, 8080);
        assert_eq!(config.cases.len(), 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bind_addr() {
        let config = ServerConfig::default_test_config();
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
    }

    #[test]
    fn test_parse_toml() {
        let config = ServerConfig::from_toml_str(SAMPLE).unwrap();
        assert_eq!(config.bind_address, "0.0.0.0");
        assert_eq!(config.bind_port, 9000);
        assert_eq!(config.confidence_threshold, Some(0.8));
        assert_eq!(config.llm.api_version, jarvis_llm::azure::DEFAULT_API_VERSION);
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(20)));
        assert_eq!(config.cases.len(), 2);
        assert!(config.cases["TrackShipment"].required_fields.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_registry_from_cases() {
        let registry = ServerConfig::from_toml_str(SAMPLE).unwrap().registry();
        assert_eq!(registry.names(), vec!["CreateShipment", "TrackShipment"]);

        let def = registry.lookup("CreateShipment").unwrap();
        assert!(def.is_allowed("weight"));
        assert!(def.is_required("destination"));
    }

    #[test]
    fn test_missing_api_key() {
        let mut config = ServerConfig::default_test_config();
        config.llm.api_key = String::new();
        assert!(matches!(config.validate(), Err(ConfigError::MissingField(_))));
    }

    #[test]
    fn test_no_cases() {
        let mut config = ServerConfig::default_test_config();
        config.cases.clear();
        assert!(matches!(config.validate(), Err(ConfigError::MissingField(_))));
    }

    #[test]
    fn test_empty_allowed_fields() {
        let mut config = ServerConfig::default_test_config();
        config.cases.insert(
            "Empty".to_string(),
            UseCaseFields {
                allowed_fields: BTreeSet::new(),
                required_fields: BTreeSet::new(),
            },
        );
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = ServerConfig::default_test_config();
        config.llm.request_timeout_secs = Some(0);
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_extractor_section_defaults() {
        let config = ServerConfig::from_toml_str(SAMPLE).unwrap();
        let extractor = config.extractor_config();
        assert_eq!(extractor.model, "gpt-4o");
        assert_eq!(extractor.function_name, "extract_entities");
    }

    #[test]
    fn test_extractor_section_overrides_naming() {
        let contents = format!(
            "{}{}",
            SAMPLE,
            r#"
            [extractor]
            function_name = "pull_fields"
            function_description = "Pull fields."
            "#
        );
        let config = ServerConfig::from_toml_str(&contents).unwrap();
        assert!(config.validate().is_ok());

        let extractor = config.extractor_config();
        assert_eq!(extractor.model, "gpt-4o");
        assert_eq!(extractor.function_name, "pull_fields");
        assert_eq!(extractor.function_description, "Pull fields.");
    }

    #[test]
    fn test_invalid_function_name_rejected() {
        let mut config = ServerConfig::default_test_config();
        config.extractor.function_name = "extract entities".to_string();
        match config.validate() {
            Err(ConfigError::Invalid(msg)) => assert!(msg.starts_with("extractor:")),
            other => panic!("Expected Invalid, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_llm_section() {
        let result = ServerConfig::from_toml_str("bind_port = 8080");
        assert!(matches!(result, Err(ConfigError::TomlParse(_))));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jarvis.toml");
        std::fs::write(&path, SAMPLE).unwrap();

        let config = ServerConfig::from_file(&path).unwrap();
        assert_eq!(config.bind_port, 9000);
    }

    #[test]
    fn test_from_missing_file() {
        let result = ServerConfig::from_file("/nonexistent/jarvis.toml");
        assert!(matches!(result, Err(ConfigError::FileRead(_))));
    }
}
