//! Model-client implementations for the narrative analyzer.
//!
//! Implements the [`Summarizer`] and [`TextGenerator`] traits from
//! `pitchlens-core` over HTTP:
//!
//! - **[`HuggingFaceClient`]**: the Hugging Face Inference API
//!   (`POST {url}/{model}`), token from `HF_API_TOKEN` when set.
//! - **[`OllamaClient`]**: a local Ollama instance's `/api/generate`.
//! - **[`DisabledModel`]**: rejects every call; analyses degrade.
//!
//! # Provider Selection
//!
//! | Config Value | Provider |
//! |-------------|----------|
//! | `"disabled"` | [`DisabledModel`] |
//! | `"huggingface"` | [`HuggingFaceClient`] |
//! | `"ollama"` | [`OllamaClient`] |
//!
//! There is no retry: a failed call is reported once and the analyzer
//! degrades in place. Every request carries `models.timeout_secs`.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{info, warn};

use pitchlens_core::analysis::Analyzer;
use pitchlens_core::generation::{
    DisabledModel, GenerateParams, ModelError, SummarizeParams, Summarizer, TextGenerator,
};

use crate::config::ModelConfig;

pub const DEFAULT_HUGGINGFACE_URL: &str = "https://api-inference.huggingface.co/models";
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

/// Instruction prepended to the section text for chat-style summarizers.
const OLLAMA_SUMMARY_INSTRUCTION: &str =
    "Summarize the following startup pitch in a few sentences.\n\n";

/// Build the analyzer for the configured provider.
///
/// Called once at process start; the returned analyzer is shared across
/// requests.
pub fn build_analyzer(config: &ModelConfig) -> Result<Analyzer> {
    if !config.is_enabled() {
        warn!("model provider is disabled; analyses will be degraded");
    }
    let analyzer = match config.provider.as_str() {
        "disabled" => Analyzer::new(Arc::new(DisabledModel), Arc::new(DisabledModel)),
        "huggingface" => {
            let token = std::env::var("HF_API_TOKEN").ok();
            let summarizer =
                HuggingFaceClient::new(config, &config.summarizer_model, token.clone())?;
            let generator = HuggingFaceClient::new(config, &config.generator_model, token)?;
            Analyzer::new(Arc::new(summarizer), Arc::new(generator))
        }
        "ollama" => {
            let summarizer = OllamaClient::new(config, &config.summarizer_model)?;
            let generator = OllamaClient::new(config, &config.generator_model)?;
            Analyzer::new(Arc::new(summarizer), Arc::new(generator))
        }
        other => bail!("Unknown model provider: {}", other),
    };

    info!(
        provider = %config.provider,
        summarizer = %config.summarizer_model,
        generator = %config.generator_model,
        "model clients ready"
    );
    Ok(analyzer)
}

fn http_client(config: &ModelConfig) -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?)
}

/// POST a JSON body and return the parsed JSON response.
async fn post_json(
    request: reqwest::RequestBuilder,
    body: &Value,
) -> Result<Value, ModelError> {
    let response = request
        .json(body)
        .send()
        .await
        .map_err(|e| ModelError::Request(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        let body_text = response.text().await.unwrap_or_default();
        return Err(ModelError::Api {
            status: status.as_u16(),
            message: api_error_message(&body_text),
        });
    }

    response
        .json()
        .await
        .map_err(|e| ModelError::InvalidResponse(e.to_string()))
}

/// Pull `{"error": "..."}` out of an error body, else return it verbatim.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}

// ============ Hugging Face ============

/// A single model on the Hugging Face Inference API.
///
/// Serves as either a summarizer (`summarization` task, response
/// `[{"summary_text": ...}]`) or a generator (`text-generation` task,
/// response `[{"generated_text": ...}]`).
pub struct HuggingFaceClient {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    token: Option<String>,
    eos_token_id: Option<u32>,
}

impl HuggingFaceClient {
    pub fn new(config: &ModelConfig, model: &str, token: Option<String>) -> Result<Self> {
        let base = config
            .url
            .as_deref()
            .unwrap_or(DEFAULT_HUGGINGFACE_URL)
            .trim_end_matches('/');
        Ok(Self {
            client: http_client(config)?,
            endpoint: format!("{}/{}", base, model),
            model: model.to_string(),
            token,
            eos_token_id: config.eos_token_id,
        })
    }

    fn request(&self) -> reqwest::RequestBuilder {
        let request = self.client.post(&self.endpoint);
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[async_trait]
impl Summarizer for HuggingFaceClient {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn summarize(
        &self,
        text: &str,
        params: &SummarizeParams,
    ) -> Result<Option<String>, ModelError> {
        let body = json!({
            "inputs": text,
            "parameters": {
                "max_length": params.max_length,
                "min_length": params.min_length,
                "do_sample": params.do_sample,
            },
            "options": { "wait_for_model": true },
        });
        let json = post_json(self.request(), &body).await?;
        parse_hf_summary(&json)
    }
}

#[async_trait]
impl TextGenerator for HuggingFaceClient {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn generate(
        &self,
        prompt: &str,
        params: &GenerateParams,
    ) -> Result<String, ModelError> {
        let mut parameters = json!({
            "max_length": params.max_length,
            "num_return_sequences": params.num_return_sequences,
            "temperature": params.temperature,
            "do_sample": params.do_sample,
        });
        if let (true, Some(eos)) = (params.pad_with_eos, self.eos_token_id) {
            parameters["pad_token_id"] = json!(eos);
        }
        let body = json!({
            "inputs": prompt,
            "parameters": parameters,
            "options": { "wait_for_model": true },
        });
        let json = post_json(self.request(), &body).await?;
        parse_hf_generation(&json)
    }
}

/// `[{"summary_text": "..."}]` → first summary; `[]` → `None`.
fn parse_hf_summary(json: &Value) -> Result<Option<String>, ModelError> {
    let items = json
        .as_array()
        .ok_or_else(|| ModelError::InvalidResponse("expected a JSON array".to_string()))?;
    match items.first() {
        None => Ok(None),
        Some(item) => item
            .get("summary_text")
            .and_then(|s| s.as_str())
            .map(|s| Some(s.to_string()))
            .ok_or_else(|| ModelError::InvalidResponse("missing summary_text".to_string())),
    }
}

/// `[{"generated_text": "..."}]` → first generation.
fn parse_hf_generation(json: &Value) -> Result<String, ModelError> {
    json.as_array()
        .and_then(|items| items.first())
        .and_then(|item| item.get("generated_text"))
        .and_then(|s| s.as_str())
        .map(str::to_string)
        .ok_or_else(|| ModelError::InvalidResponse("missing generated_text".to_string()))
}

// ============ Ollama ============

/// A single model served by Ollama's `/api/generate` endpoint.
///
/// Ollama has no summarization task, so summaries are requested with a
/// fixed instruction prefix. Length budgets map to `num_predict`; greedy
/// decoding maps to `temperature = 0`.
///
/// `max_length` counts prompt plus continuation, but `num_predict` counts
/// only new tokens, so Ollama's generation budget is larger than the Hugging
/// Face one for the same parameters.
pub struct OllamaClient {
    client: reqwest::Client,
    url: String,
    model: String,
}

impl OllamaClient {
    pub fn new(config: &ModelConfig, model: &str) -> Result<Self> {
        let url = config
            .url
            .as_deref()
            .unwrap_or(DEFAULT_OLLAMA_URL)
            .trim_end_matches('/')
            .to_string();
        Ok(Self {
            client: http_client(config)?,
            url,
            model: model.to_string(),
        })
    }

    async fn call(&self, prompt: &str, num_predict: u32, temperature: f32) -> Result<String, ModelError> {
        let body = json!({
            "model": self.model,
            "prompt": prompt,
            "stream": false,
            "options": {
                "num_predict": num_predict,
                "temperature": temperature,
            },
        });
        let request = self.client.post(format!("{}/api/generate", self.url));
        let json = post_json(request, &body).await?;
        parse_ollama_response(&json)
    }
}

#[async_trait]
impl Summarizer for OllamaClient {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn summarize(
        &self,
        text: &str,
        params: &SummarizeParams,
    ) -> Result<Option<String>, ModelError> {
        let temperature = if params.do_sample { 0.8 } else { 0.0 };
        let prompt = format!("{}{}", OLLAMA_SUMMARY_INSTRUCTION, text);
        let response = self.call(&prompt, params.max_length, temperature).await?;
        let trimmed = response.trim();
        Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
    }
}

#[async_trait]
impl TextGenerator for OllamaClient {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn generate(
        &self,
        prompt: &str,
        params: &GenerateParams,
    ) -> Result<String, ModelError> {
        let temperature = if params.do_sample {
            params.temperature
        } else {
            0.0
        };
        self.call(prompt, params.max_length, temperature).await
    }
}

fn parse_ollama_response(json: &Value) -> Result<String, ModelError> {
    json.get("response")
        .and_then(|r| r.as_str())
        .map(str::to_string)
        .ok_or_else(|| ModelError::InvalidResponse("missing response field".to_string()))
}
