//! OpenRouter chat backend implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info};

use studium_core::defaults;
use studium_core::{ChatBackend, ChatMessage, Error, ResponseStyle, Result};

use super::streaming::{parse_sse_stream, ChatStreaming, TokenStream};
use super::types::{ChatCompletionRequest, ChatCompletionResponse, WireMessage};

/// Configuration for the OpenRouter backend.
#[derive(Debug, Clone)]
pub struct OpenRouterConfig {
    /// Base URL for the API endpoint.
    pub base_url: String,
    /// API key; `None` means calls fail with `Error::Config`.
    pub api_key: Option<String>,
    /// Model used for detailed answers.
    pub detailed_model: String,
    /// Model used for concise answers.
    pub concise_model: String,
    /// HTTP-Referer header for OpenRouter rankings (optional).
    pub http_referer: Option<String>,
    /// X-Title header carrying the app name (optional).
    pub x_title: Option<String>,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for OpenRouterConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::OPENROUTER_BASE_URL.to_string(),
            api_key: None,
            detailed_model: defaults::CHAT_DETAILED_MODEL.to_string(),
            concise_model: defaults::CHAT_CONCISE_MODEL.to_string(),
            http_referer: None,
            x_title: None,
            timeout_seconds: defaults::PROVIDER_TIMEOUT_SECS,
        }
    }
}

/// OpenRouter chat backend.
#[derive(Clone)]
pub struct OpenRouterBackend {
    client: Client,
    config: OpenRouterConfig,
}

impl OpenRouterBackend {
    /// Create a new OpenRouter backend with the given configuration.
    pub fn new(config: OpenRouterConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| Error::Inference(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            subsystem = "inference",
            component = "openrouter",
            base_url = %config.base_url,
            detailed_model = %config.detailed_model,
            concise_model = %config.concise_model,
            key_configured = config.api_key.is_some(),
            "Initializing OpenRouter backend"
        );

        Ok(Self { client, config })
    }

    /// Create from environment variables.
    ///
    /// Reads `OPENROUTER_API_KEY`, and optionally `OPENROUTER_BASE_URL`,
    /// `CHAT_DETAILED_MODEL`, `CHAT_CONCISE_MODEL`, `APP_URL` (referer),
    /// `APP_NAME` (title), `OPENROUTER_TIMEOUT`.
    pub fn from_env() -> Result<Self> {
        let config = OpenRouterConfig {
            base_url: std::env::var("OPENROUTER_BASE_URL")
                .unwrap_or_else(|_| defaults::OPENROUTER_BASE_URL.to_string()),
            api_key: std::env::var("OPENROUTER_API_KEY")
                .ok()
                .filter(|k| !k.is_empty()),
            detailed_model: std::env::var("CHAT_DETAILED_MODEL")
                .unwrap_or_else(|_| defaults::CHAT_DETAILED_MODEL.to_string()),
            concise_model: std::env::var("CHAT_CONCISE_MODEL")
                .unwrap_or_else(|_| defaults::CHAT_CONCISE_MODEL.to_string()),
            http_referer: std::env::var("APP_URL").ok(),
            x_title: std::env::var("APP_NAME").ok(),
            timeout_seconds: std::env::var("OPENROUTER_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults::PROVIDER_TIMEOUT_SECS),
        };
        Self::new(config)
    }

    /// Get the current configuration.
    pub fn config(&self) -> &OpenRouterConfig {
        &self.config
    }

    /// The model slug used for a given answer style.
    pub fn model_for(&self, style: ResponseStyle) -> &str {
        match style {
            ResponseStyle::Detailed => &self.config.detailed_model,
            ResponseStyle::Concise => &self.config.concise_model,
        }
    }

    fn build_request(&self) -> Result<reqwest::RequestBuilder> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| Error::Config("OPENROUTER_API_KEY is not configured".to_string()))?;

        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );
        let mut req = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json");

        if let Some(ref referer) = self.config.http_referer {
            req = req.header("HTTP-Referer", referer);
        }
        if let Some(ref title) = self.config.x_title {
            req = req.header("X-Title", title);
        }

        Ok(req)
    }

    fn wire_messages(messages: &[ChatMessage]) -> Vec<WireMessage> {
        messages
            .iter()
            .map(|m| WireMessage {
                role: m.role.as_str().to_string(),
                content: m.content.clone(),
            })
            .collect()
    }

    /// Run a blocking chat completion with the model for `style`.
    pub async fn chat_with_style(
        &self,
        messages: &[ChatMessage],
        style: ResponseStyle,
    ) -> Result<String> {
        let model = self.model_for(style).to_string();
        let request = ChatCompletionRequest {
            model: model.clone(),
            messages: Self::wire_messages(messages),
            stream: false,
        };

        let response = self
            .build_request()?
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Inference(format!("OpenRouter request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Inference(format!(
                "OpenRouter API error ({}): {}",
                status,
                body.chars().take(500).collect::<String>()
            )));
        }

        let payload: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| Error::Inference(format!("Invalid OpenRouter response: {}", e)))?;

        let content = payload
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .unwrap_or_default();

        if content.is_empty() {
            return Err(Error::Inference(
                "OpenRouter returned an empty completion".to_string(),
            ));
        }

        debug!(
            subsystem = "inference",
            component = "openrouter",
            op = "chat",
            model = %model,
            response_len = content.len(),
            "Chat completion finished"
        );
        Ok(content)
    }

    /// Run a streaming chat completion with the model for `style`.
    pub async fn chat_stream_with_style(
        &self,
        messages: &[ChatMessage],
        style: ResponseStyle,
    ) -> Result<TokenStream> {
        let model = self.model_for(style).to_string();
        let request = ChatCompletionRequest {
            model: model.clone(),
            messages: Self::wire_messages(messages),
            stream: true,
        };

        let response = self
            .build_request()?
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Inference(format!("OpenRouter request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Inference(format!(
                "OpenRouter API error ({}): {}",
                status,
                body.chars().take(500).collect::<String>()
            )));
        }

        debug!(
            subsystem = "inference",
            component = "openrouter",
            op = "chat_stream",
            model = %model,
            "Streaming chat completion started"
        );
        Ok(parse_sse_stream(response.bytes_stream()))
    }
}

#[async_trait]
impl ChatBackend for OpenRouterBackend {
    async fn chat(&self, messages: &[ChatMessage]) -> Result<String> {
        self.chat_with_style(messages, ResponseStyle::Detailed).await
    }

    fn model_name(&self) -> &str {
        &self.config.detailed_model
    }
}

#[async_trait]
impl ChatStreaming for OpenRouterBackend {
    async fn chat_stream(&self, messages: &[ChatMessage]) -> Result<TokenStream> {
        self.chat_stream_with_style(messages, ResponseStyle::Detailed)
            .await
    }
}
