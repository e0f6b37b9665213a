use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use ragvox::adapters::{CompositeExtractor, FastEmbedder, OllamaGenerator, OpenAiAudioClient};
use ragvox::audio::AudioArtifacts;
use ragvox::config::Config;
use ragvox::domain::Document;
use ragvox::error::Result;
use ragvox::services::{ChatSession, Retriever, VoiceBot};

/// Wires the configured collaborators into a bot.
pub fn build_bot(config: &Config, speak: bool) -> Result<VoiceBot> {
    let extractor = Arc::new(CompositeExtractor::with_defaults());
    let embedder = Arc::new(FastEmbedder::new(&config.embedding));
    let retriever = Retriever::new(extractor, embedder, config.chunking)
        .with_max_upload_bytes(config.ingest.max_upload_bytes);

    let generator = Arc::new(OllamaGenerator::new(&config.generation)?);
    let session = Arc::new(ChatSession::new(retriever, generator, config));

    let mut bot = VoiceBot::new(session, AudioArtifacts::from_config(&config.speech));
    if let Some(url) = &config.speech.url {
        let audio = Arc::new(OpenAiAudioClient::new(url, &config.speech)?);
        bot = bot.with_transcriber(audio.clone());
        if speak {
            bot = bot.with_synthesizer(audio);
        }
    }
    Ok(bot)
}

pub fn documents(paths: Vec<PathBuf>) -> Vec<Document> {
    paths.into_iter().map(Document::from_path).collect()
}

/// Ingests with a spinner on stderr and returns the status line.
pub async fn upload(bot: &VoiceBot, documents: &[Document]) -> String {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(format!("Indexing {} document(s)", documents.len()));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let status = bot.upload(documents).await;
    spinner.finish_and_clear();
    status
}
