//! Runtime configuration
//!
//! Settings are read from an optional TOML file and then overridden by
//! environment variables. Secrets (API keys) are only ever taken from the
//! environment so they never end up in a checked-in config file.

use crate::core::error::{PilotError, Result};
use serde::Deserialize;
use std::path::Path;

/// Configuration for the assistant
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Chat-completion endpoint URL
    ///
    /// Anthropic URLs are detected from the hostname; everything else is
    /// treated as an OpenAI-compatible endpoint.
    pub llm_api_url: String,

    /// Model identifier sent with every completion request
    pub llm_model: String,

    /// API key for the completion endpoint (env only: LLM_API_KEY)
    #[serde(skip)]
    pub llm_api_key: Option<String>,

    /// Request timeout for the completion endpoint, in seconds
    ///
    /// A timeout is not an error for the pipeline: the turn is treated
    /// as having produced no directives.
    pub llm_timeout_secs: u64,

    /// Name or path of the todo CLI binary
    pub todo_bin: String,

    /// API key for the forecast lookup (env only: OPENWEATHERMAP_API_KEY)
    #[serde(skip)]
    pub weather_api_key: Option<String>,

    /// City used for scheduling-conflict forecasts, e.g. "Istanbul"
    pub home_location: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            llm_api_url: "https://api.anthropic.com/v1/messages".into(),
            llm_model: "claude-3-haiku-20240307".into(),
            llm_api_key: None,
            llm_timeout_secs: 30,
            todo_bin: "todo".into(),
            weather_api_key: None,
            home_location: None,
        }
    }
}

impl AppConfig {
    /// Load configuration: TOML file (if present) + environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => {
                let content = std::fs::read_to_string(p)?;
                toml::from_str(&content)
                    .map_err(|e| PilotError::ConfigError(format!("{}: {}", p.display(), e)))?
            }
            None => Self::default(),
        };
        config.apply_env();
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("LLM_API_URL") {
            self.llm_api_url = url;
        }
        if let Ok(model) = std::env::var("LLM_MODEL") {
            self.llm_model = model;
        }
        if let Ok(key) = std::env::var("LLM_API_KEY") {
            self.llm_api_key = Some(key);
        }
        if let Ok(bin) = std::env::var("TODO_BIN") {
            self.todo_bin = bin;
        }
        if let Ok(key) = std::env::var("OPENWEATHERMAP_API_KEY") {
            self.weather_api_key = Some(key);
        }
        if let Ok(loc) = std::env::var("HOME_LOCATION") {
            self.home_location = Some(loc);
        }
    }
}
