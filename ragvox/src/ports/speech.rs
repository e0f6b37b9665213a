use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, wav_path: &Path) -> Result<Transcription>;
}

#[async_trait]
pub trait Synthesizer: Send + Sync {
    /// Writes a WAV rendering of `text` to `output`.
    async fn synthesize(&self, text: &str, output: &Path) -> Result<()>;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transcription {
    pub language: Option<String>,
    pub language_probability: Option<f32>,
    pub segments: Vec<String>,
}

impl Transcription {
    /// Segment texts joined with single spaces.
    pub fn text(&self) -> String {
        self.segments
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
