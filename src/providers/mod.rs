/*!
 * Translation service clients.
 *
 * The translation service is modeled as an opaque completion endpoint: it
 * receives a rendered prompt, optionally with a named JSON output schema, and
 * returns a raw text payload. Decoding that payload is the job of
 * [`crate::translation::codec`], not of the providers.
 *
 * - OpenAI: any OpenAI-compatible chat completions API
 * - Mock: scripted provider used by the test suite
 */

use async_trait::async_trait;
use serde::Serialize;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// A named JSON schema the service is asked to honour
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputSchema {
    /// Schema name sent alongside the schema
    pub name: String,
    /// JSON schema document
    pub schema: serde_json::Value,
}

/// One request to the translation service
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// The rendered prompt
    pub prompt: String,
    /// Optional structured output schema
    pub schema: Option<OutputSchema>,
}

impl CompletionRequest {
    /// Create a plain text request
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            schema: None,
        }
    }

    /// Attach a structured output schema
    pub fn with_schema(mut self, schema: OutputSchema) -> Self {
        self.schema = Some(schema);
        self
    }
}

/// Common trait for all translation service clients
///
/// Implementations must be safe to share between the workers of one
/// translation run.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// Send a request and return the raw response text
    async fn complete(&self, request: CompletionRequest) -> Result<String, ProviderError>;

    /// Short name used in logs
    fn name(&self) -> &str;
}

pub mod mock;
pub mod openai;
