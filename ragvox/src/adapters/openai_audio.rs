use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};

use crate::config::SpeechConfig;
use crate::error::{RagError, Result};
use crate::ports::{Synthesizer, Transcriber, Transcription};

/// Speech over an OpenAI-compatible audio server (`/v1/audio/transcriptions`
/// and `/v1/audio/speech`).
pub struct OpenAiAudioClient {
    client: reqwest::Client,
    base_url: String,
    transcription_model: String,
    synthesis_model: String,
    voice: String,
}

#[derive(Debug, Deserialize)]
struct VerboseTranscription {
    #[serde(default)]
    text: String,
    language: Option<String>,
    language_probability: Option<f32>,
    #[serde(default)]
    segments: Vec<Segment>,
}

#[derive(Debug, Deserialize)]
struct Segment {
    text: String,
}

impl From<VerboseTranscription> for Transcription {
    fn from(v: VerboseTranscription) -> Self {
        let segments = if v.segments.is_empty() {
            vec![v.text]
        } else {
            v.segments.into_iter().map(|s| s.text).collect()
        };
        Self {
            language: v.language,
            language_probability: v.language_probability,
            segments,
        }
    }
}

#[derive(Serialize)]
struct SpeechBody<'a> {
    model: &'a str,
    input: &'a str,
    voice: &'a str,
    response_format: &'a str,
}

impl OpenAiAudioClient {
    pub fn new(base_url: &str, config: &SpeechConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            transcription_model: config.transcription_model.clone(),
            synthesis_model: config.synthesis_model.clone(),
            voice: config.voice.clone(),
        })
    }
}

#[async_trait]
impl Transcriber for OpenAiAudioClient {
    async fn transcribe(&self, wav_path: &Path) -> Result<Transcription> {
        tracing::info!("Carrying out transcription for {}", wav_path.display());
        let bytes = tokio::fs::read(wav_path).await?;
        let file = Part::bytes(bytes)
            .file_name("recording.wav")
            .mime_str("audio/wav")?;
        let form = Form::new()
            .part("file", file)
            .text("model", self.transcription_model.clone())
            .text("response_format", "verbose_json");

        let response = self
            .client
            .post(format!("{}/v1/audio/transcriptions", self.base_url))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RagError::Transcription(format!("{status}: {body}")));
        }

        let parsed: VerboseTranscription = response.json().await?;
        Ok(parsed.into())
    }
}

#[async_trait]
impl Synthesizer for OpenAiAudioClient {
    async fn synthesize(&self, text: &str, output: &Path) -> Result<()> {
        let body = SpeechBody {
            model: &self.synthesis_model,
            input: text,
            voice: &self.voice,
            response_format: "wav",
        };

        let response = self
            .client
            .post(format!("{}/v1/audio/speech", self.base_url))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RagError::Synthesis(format!("{status}: {body}")));
        }

        let audio = response.bytes().await?;
        if audio.is_empty() {
            return Err(RagError::Synthesis("empty audio response".to_string()));
        }
        tokio::fs::write(output, &audio).await?;
        Ok(())
    }
}
