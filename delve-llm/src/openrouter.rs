//! OpenRouter chat-completions client for reasoning-capable models.
//!
//! Single-shot only: one user message in, reasoning trace plus content out.
//! Conversation state is the agent's problem, not the client's.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;

use delve_core::{DelveError, ReasoningEffort, ReasoningModel};

const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
const DEFAULT_MODEL: &str = "deepseek/deepseek-r1:free";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    reasoning: ReasoningOptions,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ReasoningOptions {
    effort: ReasoningEffort,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    reasoning: Option<String>,
    #[serde(default)]
    content: String,
}

/// Client for an OpenRouter-style chat completions endpoint.
#[derive(Clone, Debug)]
pub struct OpenRouterClient {
    http: Client,
    base_url: String,
    api_key: SecretString,
    model: String,
}

pub struct OpenRouterBuilder {
    base_url: String,
    api_key: Option<SecretString>,
    model: String,
    timeout: Duration,
}

impl OpenRouterBuilder {
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::new(api_key.into()));
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<OpenRouterClient, DelveError> {
        let api_key = self.api_key.ok_or_else(|| {
            DelveError::InvalidConfig("OpenRouter API key is not configured".to_string())
        })?;
        let http = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|err| DelveError::InvalidConfig(err.to_string()))?;
        Ok(OpenRouterClient {
            http,
            base_url: self.base_url,
            api_key,
            model: self.model,
        })
    }
}

impl OpenRouterClient {
    pub fn builder() -> OpenRouterBuilder {
        OpenRouterBuilder {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Builds a client from `OPENROUTER_API_KEY`. Fails fast when the key is
    /// absent: no amount of retrying fixes missing credentials.
    pub fn from_env() -> Result<Self, DelveError> {
        let api_key = std::env::var("OPENROUTER_API_KEY").map_err(|_| {
            DelveError::InvalidConfig("OPENROUTER_API_KEY is not set".to_string())
        })?;
        Self::builder().api_key(api_key).build()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn request(
        &self,
        prompt: &str,
        effort: ReasoningEffort,
    ) -> Result<String, DelveError> {
        let request = ChatCompletionRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            reasoning: ReasoningOptions { effort },
        };
        let url = format!(
            "{}/chat/completions",
            self.base_url.trim_end_matches('/')
        );
        debug!(%url, model = %self.model, "sending chat completion request");

        let response = self
            .http
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|err| DelveError::LlmProvider(err.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| DelveError::LlmProvider(err.to_string()))?;
        if !status.is_success() {
            return Err(DelveError::LlmProvider(format!(
                "request failed with status {status}: {body}"
            )));
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&body)?;
        let message = parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message)
            .ok_or_else(|| {
                DelveError::LlmProvider("response contained no choices".to_string())
            })?;

        // Exposed reasoning trace first, final content after, so downstream
        // `<think>` stripping and JSON extraction see the same shape the
        // provider's chat UI shows.
        Ok(match message.reasoning {
            Some(reasoning) if !reasoning.is_empty() => {
                format!("{reasoning}\n{}", message.content)
            }
            _ => message.content,
        })
    }
}

#[async_trait]
impl ReasoningModel for OpenRouterClient {
    async fn generate(
        &self,
        prompt: &str,
        effort: ReasoningEffort,
    ) -> Result<String, DelveError> {
        self.request(prompt, effort).await
    }
}
