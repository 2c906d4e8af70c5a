//! Chat-completions client implementing the analysis service

use async_trait::async_trait;
use critic_core::config::AnalysisConfig;
use critic_core::{secrets, AnalysisService};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};
use url::Url;

use crate::prompts::{self, Capability};
use crate::{Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

impl ChatMessage {
    fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Analysis service backed by an OpenAI-compatible chat completions API
pub struct OpenAiAnalyzer {
    http: reqwest::Client,
    endpoint: Url,
    api_key: String,
    model: String,
    reply_language: Option<String>,
}

impl OpenAiAnalyzer {
    /// Create an analyzer with an explicit API key
    pub fn new(api_key: impl Into<String>, config: &AnalysisConfig) -> Result<Self> {
        let api_key = api_key.into().trim().to_string();
        if api_key.is_empty() {
            return Err(Error::Auth("API key is empty".to_string()));
        }

        let endpoint = endpoint_url(&config.api_url)?;
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;

        info!(endpoint = %endpoint, model = %config.model, "Created analysis client");

        Ok(Self {
            http,
            endpoint,
            api_key,
            model: config.model.clone(),
            reply_language: config.reply_language.clone(),
        })
    }

    /// Create an analyzer, loading the API key
    ///
    /// Key is loaded from (in priority order):
    /// 1. OPENAI_API_KEY environment variable
    /// 2. ~/.config/critic/secrets.toml
    pub fn from_config(config: &AnalysisConfig) -> Result<Self> {
        let key = secrets::resolve_api_key()
            .map_err(|e| Error::Auth(e.to_string()))?
            .ok_or_else(|| {
                Error::Auth(format!(
                    "API key not found. Set {} or add api_key to ~/.config/critic/secrets.toml",
                    secrets::API_KEY_ENV
                ))
            })?;

        debug!(source = %key.source(), "Resolved API key");
        Self::new(key.value(), config)
    }

    /// Model sent with every request
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Full chat completions URL
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn complete(
        &self,
        capability: Capability,
        language: &str,
        user_message: String,
    ) -> Result<String> {
        let sampling = capability.sampling();
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage::system(prompts::system_prompt(
                    capability,
                    language,
                    self.reply_language.as_deref(),
                )),
                ChatMessage::user(user_message),
            ],
            temperature: sampling.temperature,
            max_tokens: sampling.max_tokens,
            stream: false,
        };

        debug!(
            capability = ?capability,
            model = %self.model,
            max_tokens = sampling.max_tokens,
            "Sending chat completion request"
        );

        let response = self
            .http
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Chat completion request failed");
                Error::Http(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "(failed to read error body)".to_string());
            error!(status = status.as_u16(), body = %body, "Analysis API returned an error");
            return Err(match status.as_u16() {
                401 | 403 => Error::Auth(format!("API rejected credentials: {}", body)),
                code => Error::Api { status: code, body },
            });
        }

        let body = response.text().await?;
        let parsed: ChatResponse =
            serde_json::from_str(&body).map_err(|e| Error::Parse(e.to_string()))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty());

        match content {
            Some(text) => {
                debug!(chars = text.chars().count(), "Received analysis");
                Ok(text)
            }
            None => {
                warn!("Analysis API returned no message content");
                Err(Error::EmptyResponse)
            }
        }
    }
}

impl std::fmt::Debug for OpenAiAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiAnalyzer")
            .field("endpoint", &self.endpoint.as_str())
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl AnalysisService for OpenAiAnalyzer {
    fn name(&self) -> &str {
        "openai"
    }

    async fn analyze(&self, code: &str, language: &str) -> critic_core::Result<String> {
        let message = prompts::user_message(Capability::Review, code, language, None);
        Ok(self.complete(Capability::Review, language, message).await?)
    }

    async fn generate_tests(&self, code: &str, language: &str) -> critic_core::Result<String> {
        let message = prompts::user_message(Capability::Tests, code, language, None);
        Ok(self.complete(Capability::Tests, language, message).await?)
    }

    async fn quick_fix(
        &self,
        code: &str,
        issue: &str,
        language: &str,
    ) -> critic_core::Result<String> {
        let message = prompts::user_message(Capability::Fix, code, language, Some(issue));
        Ok(self.complete(Capability::Fix, language, message).await?)
    }
}

/// Append `chat/completions` to an API base URL
///
/// Accepts the base with or without a trailing slash, e.g.
/// `https://api.openai.com/v1`.
pub fn endpoint_url(base: &str) -> Result<Url> {
    let trimmed = base.trim();
    let mut base = Url::parse(trimmed)?;
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base.join("chat/completions")?)
}
