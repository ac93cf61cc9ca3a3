//! Engine configuration loaded from a YAML file with environment overrides

use std::fs;
use std::path::Path;

use serde::Deserialize;

const ENV_CONFIG_PATH: &str = "DOCDRIFT_CONFIG_PATH";
const DEFAULT_CONFIG_PATH: &str = "docdrift.yaml";

const ENV_VERIFY_MODEL: &str = "DOCDRIFT_VERIFY_MODEL";
const DEFAULT_VERIFY_MODEL: &str = "gpt-4o-mini";

/// Documents larger than this are rejected before extraction
const DEFAULT_MAX_DOCUMENT_BYTES: usize = 100 * 1024;
/// Claim text recorded for code-example and convention claims is capped
const DEFAULT_MAX_CLAIM_TEXT_LEN: usize = 300;

const DEFAULT_LLM_TEMPERATURE: f32 = 0.0;
const DEFAULT_LLM_MAX_TOKENS: u32 = 1024;
const DEFAULT_LLM_TIMEOUT_MS: u64 = 30_000;

const DEFAULT_URL_PER_HOST_LIMIT: u32 = 5;
const DEFAULT_URL_TIMEOUT_SECS: u64 = 4;

/// Tier-3 LLM call configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Per-attempt timeout; a timed-out attempt consumes the retry budget
    #[serde(default = "default_llm_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            temperature: DEFAULT_LLM_TEMPERATURE,
            max_tokens: DEFAULT_LLM_MAX_TOKENS,
            timeout_ms: DEFAULT_LLM_TIMEOUT_MS,
        }
    }
}

/// Tier-1 URL reachability configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UrlCheckConfig {
    /// Outbound checks allowed per target hostname per scan
    #[serde(default = "default_per_host_limit")]
    pub per_host_limit: u32,
    #[serde(default = "default_url_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for UrlCheckConfig {
    fn default() -> Self {
        Self {
            per_host_limit: DEFAULT_URL_PER_HOST_LIMIT,
            timeout_secs: DEFAULT_URL_TIMEOUT_SECS,
        }
    }
}

/// Engine configuration
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_max_document_bytes")]
    pub max_document_bytes: usize,
    #[serde(default = "default_max_claim_text_len")]
    pub max_claim_text_len: usize,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub url_check: UrlCheckConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_document_bytes: DEFAULT_MAX_DOCUMENT_BYTES,
            max_claim_text_len: DEFAULT_MAX_CLAIM_TEXT_LEN,
            llm: LlmConfig::default(),
            url_check: UrlCheckConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from the config file (if present) and environment
    pub fn from_env() -> Self {
        let config_path =
            std::env::var(ENV_CONFIG_PATH).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let mut config = Self::load_config_file(&config_path).unwrap_or_default();

        if let Ok(model) = std::env::var(ENV_VERIFY_MODEL) {
            if !model.trim().is_empty() {
                config.llm.model = model;
            }
        }

        config
    }

    /// Load configuration from a YAML file, falling back to defaults
    fn load_config_file(path: &str) -> Option<EngineConfig> {
        let path = Path::new(path);

        if !path.exists() {
            tracing::debug!(path = %path.display(), "Config file not found, using defaults");
            return None;
        }

        match fs::read_to_string(path) {
            Ok(contents) => {
                let contents = contents.trim();
                if contents.is_empty() {
                    tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
                    return Some(EngineConfig::default());
                }

                match serde_yaml::from_str(contents) {
                    Ok(config) => {
                        tracing::info!(path = %path.display(), "Loaded configuration from file");
                        Some(config)
                    }
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "Failed to parse config file, using defaults");
                        None
                    }
                }
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read config file, using defaults");
                None
            }
        }
    }
}

fn default_model() -> String {
    DEFAULT_VERIFY_MODEL.to_string()
}

fn default_temperature() -> f32 {
    DEFAULT_LLM_TEMPERATURE
}

fn default_max_tokens() -> u32 {
    DEFAULT_LLM_MAX_TOKENS
}

fn default_llm_timeout_ms() -> u64 {
    DEFAULT_LLM_TIMEOUT_MS
}

fn default_per_host_limit() -> u32 {
    DEFAULT_URL_PER_HOST_LIMIT
}

fn default_url_timeout_secs() -> u64 {
    DEFAULT_URL_TIMEOUT_SECS
}

fn default_max_document_bytes() -> usize {
    DEFAULT_MAX_DOCUMENT_BYTES
}

fn default_max_claim_text_len() -> usize {
    DEFAULT_MAX_CLAIM_TEXT_LEN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_pipeline_ceilings() {
        let config = EngineConfig::default();
        assert_eq!(config.max_document_bytes, 100 * 1024);
        assert_eq!(config.url_check.per_host_limit, 5);
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let config: EngineConfig =
            serde_yaml::from_str("llm:\n  model: gpt-4o\n").expect("valid yaml");
        assert_eq!(config.llm.model, "gpt-4o");
        assert_eq!(config.llm.max_tokens, DEFAULT_LLM_MAX_TOKENS);
        assert_eq!(config.max_document_bytes, DEFAULT_MAX_DOCUMENT_BYTES);
    }
}
