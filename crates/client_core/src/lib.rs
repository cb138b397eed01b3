use async_trait::async_trait;
use reqwest::Client;
use shared::protocol::{ApiErrorEnvelope, GenerateContentResponse};
use tracing::{debug, info};

pub mod download;
pub mod error;
pub mod request;

pub use download::{download_file_name, save_data_uri};
pub use error::{DownloadError, GenerationError};
pub use request::{render_prompt, GenerationRequest};

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-image";
pub const API_KEY_HEADER: &str = "x-goog-api-key";

/// Something that turns one [`GenerationRequest`] into an image data URI.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError>;
}

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_base: String,
    pub model: String,
    pub api_key: Option<String>,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
        }
    }
}

pub struct GeminiClient {
    http: Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    pub fn endpoint(&self) -> String {
        let model = self.config.model.trim();
        let model_path = if model.starts_with("models/") {
            model.to_string()
        } else {
            format!("models/{model}")
        };
        format!(
            "{}/{model_path}:generateContent",
            self.config.api_base.trim().trim_end_matches('/')
        )
    }

    fn api_key(&self) -> Result<&str, GenerationError> {
        self.config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(GenerationError::MissingApiKey)
    }

    async fn generate_impl(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        let api_key = self.api_key()?;
        let payload = request.to_wire();
        let endpoint = self.endpoint();

        info!(
            model = self.model(),
            mode = request.mode.as_str(),
            function = request.function.as_str(),
            aspect_ratio = request.aspect_ratio.as_str(),
            parts = payload.contents[0].parts.len(),
            "dispatching generation request"
        );

        let response = self
            .http
            .post(&endpoint)
            .header(API_KEY_HEADER, api_key)
            .json(&payload)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;
        if !status.is_success() {
            return Err(GenerationError::Service {
                status: status.as_u16(),
                message: service_error_message(&body),
            });
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|err| GenerationError::MalformedResponse(err.to_string()))?;
        debug!(candidates = parsed.candidates.len(), "received generation response");

        let image = parsed
            .first_inline_image()
            .ok_or(GenerationError::NoImageInResponse)?;
        Ok(image.to_data_uri())
    }
}

#[async_trait]
impl ImageGenerator for GeminiClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        self.generate_impl(request).await
    }
}

/// Endpoint URLs stay out of error text so nothing request-specific lands in logs.
fn transport_error(err: reqwest::Error) -> GenerationError {
    GenerationError::Transport(err.without_url())
}

fn service_error_message(body: &str) -> String {
    match serde_json::from_str::<ApiErrorEnvelope>(body) {
        Ok(envelope) if !envelope.error.message.is_empty() => envelope.error.message,
        _ if body.trim().is_empty() => "empty error body".to_string(),
        _ => body.trim().to_string(),
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
