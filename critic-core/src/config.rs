//! Configuration management for critic
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables (CRITIC_*)
//! 3. Config file (~/.config/critic/config.toml)
//! 4. Default values

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Default OpenAI-compatible API base URL
pub const DEFAULT_API_URL: &str = "https://api.openai.com/v1";

/// Default chat model
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Default number of sessions kept in memory
pub const DEFAULT_MAX_SESSIONS: usize = 100;

/// Analysis service configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Base URL of the chat completions API
    pub api_url: String,

    /// Model identifier sent with every request
    pub model: String,

    /// Deadline for a single analysis request
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,

    /// Natural language the reviewer should answer in
    pub reply_language: Option<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(60),
            reply_language: None,
        }
    }
}

/// Feedback log configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FeedbackConfig {
    /// Path of the JSON feedback log
    pub path: PathBuf,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        let path = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("critic")
            .join("feedback_data.json");

        Self { path }
    }
}

/// Session store configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Oldest sessions are evicted beyond this many
    pub max_sessions: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_sessions: DEFAULT_MAX_SESSIONS,
        }
    }
}

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Analysis service configuration
    pub analysis: AnalysisConfig,

    /// Feedback log configuration
    pub feedback: FeedbackConfig,

    /// Session store configuration
    pub sessions: SessionConfig,
}

impl Config {
    /// Load configuration from the default config file location
    ///
    /// Returns default config if file doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();

        if let Some(path) = config_path {
            if path.exists() {
                return Self::load_from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(Error::Io)?;
        let config: Self = toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path
    ///
    /// Returns `~/.config/critic/config.toml` on Unix
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("critic").join("config.toml"))
    }

    /// Reject values no component can work with
    pub fn validate(&self) -> Result<()> {
        if self.sessions.max_sessions == 0 {
            return Err(Error::Config(
                "sessions.max_sessions must be at least 1".to_string(),
            ));
        }
        if self.analysis.model.trim().is_empty() {
            return Err(Error::Config("analysis.model must not be empty".to_string()));
        }
        Ok(())
    }

    /// Apply environment variable overrides
    ///
    /// Supported variables:
    /// - CRITIC_API_URL: Base URL of the chat completions API
    /// - CRITIC_MODEL: Model to use
    /// - CRITIC_FEEDBACK_PATH: Location of the feedback log
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(api_url) = std::env::var("CRITIC_API_URL") {
            self.analysis.api_url = api_url;
        }

        if let Ok(model) = std::env::var("CRITIC_MODEL") {
            self.analysis.model = model;
        }

        if let Ok(path) = std::env::var("CRITIC_FEEDBACK_PATH") {
            self.feedback.path = PathBuf::from(path);
        }

        self
    }

    /// Apply CLI flag overrides
    pub fn with_cli_overrides(
        mut self,
        model: Option<String>,
        feedback_path: Option<PathBuf>,
    ) -> Self {
        if let Some(m) = model {
            self.analysis.model = m;
        }

        if let Some(path) = feedback_path {
            self.feedback.path = path;
        }

        self
    }

    /// Load configuration with all overrides applied
    ///
    /// Priority: CLI > env > config file > defaults
    pub fn load_with_overrides(
        model: Option<String>,
        feedback_path: Option<PathBuf>,
    ) -> Result<Self> {
        let config = Self::load()?
            .with_env_overrides()
            .with_cli_overrides(model, feedback_path);
        config.validate()?;
        Ok(config)
    }
}
