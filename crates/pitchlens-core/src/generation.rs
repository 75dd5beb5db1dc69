//! Model-client abstraction for the narrative analyzer.
//!
//! The analyzer needs two capabilities: abstractive summarization and
//! free-form text generation. Each is a trait so backends (Hugging Face
//! Inference API, Ollama, test stubs) can be swapped without touching the
//! analysis logic.
//!
//! Clients are constructed once at process start and shared read-only
//! behind an `Arc` for the lifetime of the process.

use async_trait::async_trait;
use thiserror::Error;

/// Failure of a single model call.
#[derive(Debug, Error)]
pub enum ModelError {
    /// No model backend is configured.
    #[error("model provider is disabled")]
    Disabled,

    /// The request never produced an HTTP response (connect, timeout).
    #[error("model request failed: {0}")]
    Request(String),

    /// The backend answered with a non-success status.
    #[error("model API error {status}: {message}")]
    Api { status: u16, message: String },

    /// The backend answered but the body had an unexpected shape.
    #[error("invalid model response: {0}")]
    InvalidResponse(String),
}

/// Decoding settings for a summarization call.
#[derive(Debug, Clone, PartialEq)]
pub struct SummarizeParams {
    pub max_length: u32,
    pub min_length: u32,
    pub do_sample: bool,
}

/// Decoding settings for a text-generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateParams {
    /// Maximum total length (prompt plus continuation).
    pub max_length: u32,
    pub num_return_sequences: u32,
    pub temperature: f32,
    pub do_sample: bool,
    /// Use the model's end-of-sequence token as the pad token.
    pub pad_with_eos: bool,
}

/// Abstractive summarization backend.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Returns the model identifier (e.g. `"facebook/bart-large-cnn"`).
    fn model_name(&self) -> &str;

    /// Summarize `text`. `Ok(None)` means the model produced no output.
    async fn summarize(
        &self,
        text: &str,
        params: &SummarizeParams,
    ) -> Result<Option<String>, ModelError>;
}

/// Free-form text generation backend.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Returns the model identifier (e.g. `"distilgpt2"`).
    fn model_name(&self) -> &str;

    /// Continue `prompt`. The returned text may or may not echo the prompt.
    async fn generate(&self, prompt: &str, params: &GenerateParams)
        -> Result<String, ModelError>;
}

/// A backend that rejects every call.
///
/// Used when `models.provider = "disabled"`; every analysis degrades.
pub struct DisabledModel;

#[async_trait]
impl Summarizer for DisabledModel {
    fn model_name(&self) -> &str {
        "disabled"
    }

    async fn summarize(
        &self,
        _text: &str,
        _params: &SummarizeParams,
    ) -> Result<Option<String>, ModelError> {
        Err(ModelError::Disabled)
    }
}

#[async_trait]
impl TextGenerator for DisabledModel {
    fn model_name(&self) -> &str {
        "disabled"
    }

    async fn generate(
        &self,
        _prompt: &str,
        _params: &GenerateParams,
    ) -> Result<String, ModelError> {
        Err(ModelError::Disabled)
    }
}
