use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::GenerationConfig;
use crate::error::{RagError, Result};
use crate::ports::{GenerationRequest, TextGenerator};

/// Completion over an Ollama-compatible `/api/generate` endpoint.
///
/// The prompt is sent raw so base (non-chat) models see the template as is.
pub struct OllamaGenerator {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

#[derive(Serialize)]
struct GenerateBody<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    raw: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    num_predict: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_k: Option<u32>,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

impl OllamaGenerator {
    pub fn new(config: &GenerationConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }

    fn body<'a>(&'a self, request: &'a GenerationRequest) -> GenerateBody<'a> {
        let options = if request.sampling {
            GenerateOptions {
                num_predict: request.max_new_tokens,
                temperature: request.temperature,
                top_k: None,
            }
        } else {
            GenerateOptions {
                num_predict: request.max_new_tokens,
                temperature: 0.0,
                top_k: Some(1),
            }
        };

        GenerateBody {
            model: &self.model,
            prompt: &request.prompt,
            stream: false,
            raw: true,
            options,
        }
    }
}

#[async_trait]
impl TextGenerator for OllamaGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        let url = format!("{}/api/generate", self.base_url);
        tracing::debug!(model = %self.model, "POST {}", url);

        let response = self
            .client
            .post(&url)
            .json(&self.body(request))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RagError::Generation(format!("{status}: {body}")));
        }

        let parsed: GenerateResponse = response.json().await?;
        Ok(parsed.response)
    }
}
