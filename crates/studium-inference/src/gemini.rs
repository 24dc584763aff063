//! Gemini-style generation backend.
//!
//! Drives the Google Generative Language REST surface: raw media upload
//! (for document/image ingestion) and `generateContent` over text parts
//! plus uploaded-file references. Credentials are optional at construction
//! so the server can boot without them; the first call without a key fails
//! with a configuration error.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use studium_core::defaults;
use studium_core::{
    AttachmentGeneration, Error, GenerationBackend, ProviderAttachment, Result,
};

/// Configuration for the Gemini backend.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// Base URL for the API (no trailing slash).
    pub base_url: String,
    /// API key; `None` means calls fail with `Error::Config`.
    pub api_key: Option<String>,
    /// Model used for document conversion and structured generation.
    pub gen_model: String,
    /// Cheaper model used for short title generation.
    pub title_model: String,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::GEMINI_BASE_URL.to_string(),
            api_key: None,
            gen_model: defaults::GEMINI_GEN_MODEL.to_string(),
            title_model: defaults::GEMINI_TITLE_MODEL.to_string(),
            timeout_seconds: defaults::PROVIDER_TIMEOUT_SECS,
        }
    }
}

/// Gemini-style generation backend.
#[derive(Clone)]
pub struct GeminiBackend {
    client: Client,
    config: GeminiConfig,
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(rename = "fileData", skip_serializing_if = "Option::is_none")]
    file_data: Option<FileData>,
}

impl Part {
    fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            file_data: None,
        }
    }

    fn file(attachment: &ProviderAttachment) -> Self {
        Self {
            text: None,
            file_data: Some(FileData {
                mime_type: attachment.mime_type.clone(),
                file_uri: attachment.uri.clone(),
            }),
        }
    }
}

#[derive(Debug, Serialize)]
struct FileData {
    #[serde(rename = "mimeType")]
    mime_type: String,
    #[serde(rename = "fileUri")]
    file_uri: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    file: UploadedFile,
}

#[derive(Debug, Deserialize)]
struct UploadedFile {
    uri: String,
    #[serde(rename = "mimeType")]
    mime_type: Option<String>,
}

// ---------------------------------------------------------------------------
// Backend
// ---------------------------------------------------------------------------

impl GeminiBackend {
    /// Create a new Gemini backend with the given configuration.
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| Error::Inference(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            subsystem = "inference",
            component = "gemini",
            base_url = %config.base_url,
            gen_model = %config.gen_model,
            title_model = %config.title_model,
            key_configured = config.api_key.is_some(),
            "Initializing Gemini backend"
        );

        Ok(Self { client, config })
    }

    /// Create from environment variables.
    ///
    /// Reads `GEMINI_API_KEY`, and optionally `GEMINI_BASE_URL`,
    /// `GEMINI_GEN_MODEL`, `GEMINI_TITLE_MODEL`, `GEMINI_TIMEOUT`.
    pub fn from_env() -> Result<Self> {
        let config = GeminiConfig {
            base_url: std::env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| defaults::GEMINI_BASE_URL.to_string()),
            api_key: std::env::var("GEMINI_API_KEY").ok().filter(|k| !k.is_empty()),
            gen_model: std::env::var("GEMINI_GEN_MODEL")
                .unwrap_or_else(|_| defaults::GEMINI_GEN_MODEL.to_string()),
            title_model: std::env::var("GEMINI_TITLE_MODEL")
                .unwrap_or_else(|_| defaults::GEMINI_TITLE_MODEL.to_string()),
            timeout_seconds: std::env::var("GEMINI_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults::PROVIDER_TIMEOUT_SECS),
        };
        Self::new(config)
    }

    /// Get the current configuration.
    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    /// A clone of this backend with the generation model swapped for the
    /// configured title model. Used for the cheap secondary title call.
    pub fn title_backend(&self) -> Self {
        let mut clone = self.clone();
        clone.config.gen_model = self.config.title_model.clone();
        clone
    }

    fn api_key(&self) -> Result<&str> {
        self.config
            .api_key
            .as_deref()
            .ok_or_else(|| Error::Config("GEMINI_API_KEY is not configured".to_string()))
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn generate_content(&self, parts: Vec<Part>) -> Result<String> {
        let key = self.api_key()?;
        let url = self.endpoint(&format!(
            "/v1beta/models/{}:generateContent",
            self.config.gen_model
        ));

        let request = GenerateContentRequest {
            contents: vec![Content { parts }],
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", key)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Inference(format!("Gemini request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Inference(format!(
                "Gemini API error ({}): {}",
                status,
                truncate(&body, 500)
            )));
        }

        let payload: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| Error::Inference(format!("Invalid Gemini response: {}", e)))?;

        let text = payload
            .candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .filter_map(|p| p.text)
            .collect::<Vec<_>>()
            .join("");

        if text.trim().is_empty() {
            return Err(Error::Inference(
                "Gemini returned an empty response".to_string(),
            ));
        }

        debug!(
            subsystem = "inference",
            component = "gemini",
            op = "generate",
            model = %self.config.gen_model,
            response_len = text.len(),
            "Generation completed"
        );
        Ok(text)
    }
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[async_trait]
impl GenerationBackend for GeminiBackend {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.generate_content(vec![Part::text(prompt)]).await
    }

    fn model_name(&self) -> &str {
        &self.config.gen_model
    }
}

#[async_trait]
impl AttachmentGeneration for GeminiBackend {
    async fn upload(
        &self,
        data: Vec<u8>,
        mime_type: &str,
        display_name: &str,
    ) -> Result<ProviderAttachment> {
        let key = self.api_key()?;
        let url = self.endpoint("/upload/v1beta/files");

        debug!(
            subsystem = "inference",
            component = "gemini",
            op = "upload",
            file_name = display_name,
            mime_type = mime_type,
            size = data.len(),
            "Uploading file to provider"
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", key)
            .header("X-Goog-Upload-Protocol", "raw")
            .header("X-Goog-File-Name", sanitize_header_value(display_name))
            .header("Content-Type", mime_type.to_string())
            .body(data)
            .send()
            .await
            .map_err(|e| Error::Inference(format!("Gemini upload failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Inference(format!(
                "Gemini upload error ({}): {}",
                status,
                truncate(&body, 500)
            )));
        }

        let payload: UploadResponse = response
            .json()
            .await
            .map_err(|e| Error::Inference(format!("Invalid Gemini upload response: {}", e)))?;

        Ok(ProviderAttachment {
            uri: payload.file.uri,
            mime_type: payload
                .file
                .mime_type
                .unwrap_or_else(|| mime_type.to_string()),
        })
    }

    async fn generate_with_attachments(
        &self,
        prompts: &[String],
        attachments: &[ProviderAttachment],
    ) -> Result<String> {
        let mut parts: Vec<Part> = prompts.iter().map(Part::text).collect();
        parts.extend(attachments.iter().map(Part::file));
        self.generate_content(parts).await
    }
}

/// Strip characters that cannot appear in an HTTP header value.
fn sanitize_header_value(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_graphic() || c == ' ' { c } else { '_' })
        .collect()
}
