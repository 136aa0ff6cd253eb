use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::{Error, Result};

/// Limits and defaults of the summarization pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub chunk_token_budget: usize,
    pub max_summary_length: usize,
    pub default_summary_length: usize,
    pub min_summary_floor: usize,
    pub default_num_beams: usize,
    pub max_num_beams: usize,
    /// Merge levels allowed after the first chunk pass.
    pub max_merge_depth: usize,
    pub classifier_char_limit: usize,
    pub request_timeout_secs: u64,
    pub max_concurrent_requests: usize,
    pub default_lang: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            chunk_token_budget: 1024,
            max_summary_length: 1024,
            default_summary_length: 150,
            min_summary_floor: 50,
            default_num_beams: 4,
            max_num_beams: 8,
            max_merge_depth: 4,
            classifier_char_limit: 1024,
            request_timeout_secs: 120,
            max_concurrent_requests: 2,
            default_lang: "en".to_string(),
        }
    }
}

impl PipelineConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn validate(&self) -> Result<()> {
        let non_zero = [
            ("chunk_token_budget", self.chunk_token_budget),
            ("max_summary_length", self.max_summary_length),
            ("default_summary_length", self.default_summary_length),
            ("default_num_beams", self.default_num_beams),
            ("max_num_beams", self.max_num_beams),
            ("classifier_char_limit", self.classifier_char_limit),
            ("max_concurrent_requests", self.max_concurrent_requests),
            ("request_timeout_secs", self.request_timeout_secs as usize),
        ];
        for (name, value) in non_zero {
            if value == 0 {
                return Err(Error::Config(format!("{} must be greater than zero", name)));
            }
        }
        if self.default_lang.trim().is_empty() {
            return Err(Error::Config("default_lang must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Selects and reaches the model backends.
#[derive(Debug, Clone)]
pub struct InferenceConfig {
    pub model: String,
    pub model_url: Option<String>,
    pub api_key: Option<String>,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            model: "remote".to_string(),
            model_url: None,
            api_key: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.chunk_token_budget, 1024);
        assert_eq!(config.request_timeout(), Duration::from_secs(120));
    }

    #[test]
    fn test_zero_budget_is_rejected() {
        let config = PipelineConfig {
            chunk_token_budget: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("chunk_token_budget"));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: PipelineConfig = serde_json::from_str(r#"{"max_merge_depth": 2}"#).unwrap();
        assert_eq!(config.max_merge_depth, 2);
        assert_eq!(config.max_num_beams, 8);
    }
}
