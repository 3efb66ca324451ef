use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error, trace, warn};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::errors::ProviderError;
use super::{CompletionRequest, OutputSchema, Provider};

/// Default endpoint of the public OpenAI API
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1";

/// Default chat model
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Client for OpenAI-compatible chat completion APIs
#[derive(Debug)]
pub struct OpenAI {
    /// HTTP client for API requests
    client: Client,
    /// API key for bearer authentication
    api_key: String,
    /// Base URL, without the `/chat/completions` suffix
    endpoint: String,
    /// Model name
    model: String,
    /// Sampling temperature, omitted from the request when unset
    temperature: Option<f32>,
    /// Maximum number of retry attempts
    max_retries: u32,
    /// Base backoff time in milliseconds for exponential backoff
    backoff_base_ms: u64,
}

/// Chat completion request body
#[derive(Debug, Serialize)]
pub struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

/// Chat message
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// Structured output request
#[derive(Debug, Serialize)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
    json_schema: JsonSchemaFormat,
}

#[derive(Debug, Serialize)]
pub struct JsonSchemaFormat {
    name: String,
    schema: serde_json::Value,
    strict: bool,
}

/// Chat completion response body
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
    #[serde(default)]
    pub error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: ChatMessage,
}

/// Error object some compatible servers return with a 200 status
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: String,
    #[serde(rename = "type", default)]
    pub error_type: String,
}

impl From<OutputSchema> for ResponseFormat {
    fn from(schema: OutputSchema) -> Self {
        Self {
            format_type: "json_schema".to_string(),
            json_schema: JsonSchemaFormat {
                name: schema.name,
                schema: schema.schema,
                strict: true,
            },
        }
    }
}

impl OpenAI {
    /// Create a new client
    ///
    /// An empty endpoint or model falls back to the public API defaults.
    pub fn new(api_key: impl Into<String>, endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        let endpoint = endpoint.into();
        let model = model.into();

        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(60))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            endpoint: if endpoint.is_empty() { DEFAULT_ENDPOINT.to_string() } else { endpoint },
            model: if model.is_empty() { DEFAULT_MODEL.to_string() } else { model },
            temperature: None,
            max_retries: 3,
            backoff_base_ms: 1000,
        }
    }

    /// Set retry count and exponential backoff base
    pub fn with_retry(mut self, max_retries: u32, backoff_base_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.backoff_base_ms = backoff_base_ms;
        self
    }

    /// Set the HTTP transport timeout
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .unwrap_or_default();
        self
    }

    /// Set the sampling temperature
    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Full URL of the chat completions endpoint
    pub fn completions_url(&self) -> Result<Url, ProviderError> {
        let base = format!("{}/chat/completions", self.endpoint.trim_end_matches('/'));
        Url::parse(&base)
            .map_err(|e| ProviderError::RequestFailed(format!("Invalid endpoint {}: {}", self.endpoint, e)))
    }

    /// Build the request body for one completion
    pub fn build_request(&self, request: CompletionRequest) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: request.prompt,
            }],
            temperature: self.temperature,
            response_format: request.schema.map(ResponseFormat::from),
        }
    }

    /// Extract the message content from a response body
    pub fn extract_text(body: &str) -> Result<String, ProviderError> {
        let response: ChatResponse = serde_json::from_str(body)
            .map_err(|e| ProviderError::ParseError(format!("{}. Response body: {}", e, body)))?;

        if let Some(err) = response.error {
            return Err(ProviderError::ApiError {
                status_code: 200,
                message: format!("{}: {}", err.error_type, err.message),
            });
        }

        response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.trim().to_string())
            .ok_or_else(|| ProviderError::ParseError("no translation received".to_string()))
    }

    async fn send_once(&self, url: &Url, body: &ChatRequest) -> Result<String, (ProviderError, bool)> {
        let response = self
            .client
            .post(url.clone())
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                let retryable = !e.is_builder();
                if e.is_timeout() {
                    (ProviderError::ConnectionError(format!("request timed out: {}", e)), retryable)
                } else {
                    (ProviderError::ConnectionError(e.to_string()), retryable)
                }
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| (ProviderError::ConnectionError(format!("Failed to read API response: {}", e)), true))?;

        debug!("API response status: {}, body length: {}", status.as_u16(), text.len());
        trace!("Raw API response body: {}", text);

        if status.is_success() {
            return Self::extract_text(&text).map_err(|e| (e, false));
        }

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err((ProviderError::AuthenticationError(text), false))
            }
            StatusCode::TOO_MANY_REQUESTS => Err((ProviderError::RateLimitExceeded(text), true)),
            _ => Err((
                ProviderError::ApiError {
                    status_code: status.as_u16(),
                    message: text,
                },
                status.is_server_error(),
            )),
        }
    }
}

#[async_trait]
impl Provider for OpenAI {
    async fn complete(&self, request: CompletionRequest) -> Result<String, ProviderError> {
        let url = self.completions_url()?;
        let body = self.build_request(request);

        let mut attempt = 0;
        loop {
            match self.send_once(&url, &body).await {
                Ok(text) => return Ok(text),
                Err((err, retryable)) => {
                    if !retryable || attempt >= self.max_retries {
                        error!("OpenAI request failed: {}", err);
                        return Err(err);
                    }

                    attempt += 1;
                    let backoff_ms = self.backoff_base_ms * (1u64 << (attempt - 1));
                    warn!(
                        "OpenAI request failed ({}), retrying in {}ms - attempt {}/{}",
                        err,
                        backoff_ms,
                        attempt,
                        self.max_retries
                    );
                    tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                }
            }
        }
    }

    fn name(&self) -> &str {
        "openai"
    }
}
