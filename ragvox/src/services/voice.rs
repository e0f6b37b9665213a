use std::path::PathBuf;
use std::sync::Arc;

use crate::audio::{AudioArtifacts, write_wav};
use crate::domain::{AudioInput, ChatReply, Document};
use crate::error::{RagError, Result};
use crate::ports::{Synthesizer, Transcriber};
use crate::services::session::ChatSession;

/// Text and voice entry points used by the chat front-end.
///
/// Failures never escape: they become the fixed fallback reply without
/// audio. A failed synthesis only drops the audio.
pub struct VoiceBot {
    session: Arc<ChatSession>,
    transcriber: Option<Arc<dyn Transcriber>>,
    synthesizer: Option<Arc<dyn Synthesizer>>,
    artifacts: AudioArtifacts,
}

impl VoiceBot {
    pub const fn new(session: Arc<ChatSession>, artifacts: AudioArtifacts) -> Self {
        Self {
            session,
            transcriber: None,
            synthesizer: None,
            artifacts,
        }
    }

    #[must_use]
    pub fn with_transcriber(mut self, transcriber: Arc<dyn Transcriber>) -> Self {
        self.transcriber = Some(transcriber);
        self
    }

    #[must_use]
    pub fn with_synthesizer(mut self, synthesizer: Arc<dyn Synthesizer>) -> Self {
        self.synthesizer = Some(synthesizer);
        self
    }

    pub const fn session(&self) -> &Arc<ChatSession> {
        &self.session
    }

    pub async fn upload(&self, documents: &[Document]) -> String {
        self.session.ingest(documents).await
    }

    pub async fn respond_text(&self, query: &str) -> ChatReply {
        tracing::info!("Getting the response for the query asked in text");
        self.answer(query.to_string()).await
    }

    pub async fn respond_audio(&self, input: &AudioInput) -> ChatReply {
        tracing::info!("Getting the response for the query asked in audio");
        match self.transcribe(input).await {
            Ok(text) => self.answer(text).await,
            Err(e) => {
                tracing::error!("Error during transcription: {}", e);
                ChatReply::fallback()
            }
        }
    }

    async fn answer(&self, query: String) -> ChatReply {
        match self.session.try_respond(&query).await {
            Ok(answer) => {
                let audio = self.speak(&answer).await;
                ChatReply::new(query, answer).with_audio(audio)
            }
            Err(e) => {
                tracing::error!("Error answering query: {}", e);
                ChatReply::fallback()
            }
        }
    }

    /// Persists the waveform to a fresh WAV file and transcribes it. The
    /// file is removed before returning.
    pub async fn transcribe(&self, input: &AudioInput) -> Result<String> {
        let transcriber = self
            .transcriber
            .as_ref()
            .ok_or_else(|| RagError::Transcription("no transcriber configured".to_string()))?;
        if input.samples.is_empty() {
            return Err(RagError::Transcription("empty recording".to_string()));
        }

        let recording = self.artifacts.new_recording()?;
        write_wav(recording.path(), input)?;
        tracing::debug!("Recording written to {}", recording.path().display());

        let transcription = transcriber.transcribe(recording.path()).await?;
        drop(recording);

        tracing::info!(
            "Detected language '{}' with probability {:.3}",
            transcription.language.as_deref().unwrap_or("unknown"),
            transcription.language_probability.unwrap_or_default()
        );
        Ok(transcription.text())
    }

    async fn speak(&self, text: &str) -> Option<PathBuf> {
        let synthesizer = self.synthesizer.as_ref()?;

        let path = match self.artifacts.new_reply() {
            Ok(path) => path,
            Err(e) => {
                tracing::error!("Error creating reply audio file: {}", e);
                return None;
            }
        };

        tracing::info!("Converting text to speech");
        if let Err(e) = synthesizer.synthesize(text, &path).await {
            tracing::error!("Error in converting text to speech: {}", e);
            self.artifacts.discard(&path);
            return None;
        }
        tracing::info!("Audio saved in file '{}'", path.display());

        if let Err(e) = self.artifacts.prune_replies() {
            tracing::warn!("Failed to prune reply audio: {}", e);
        }
        Some(path)
    }
}
