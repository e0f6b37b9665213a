#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use ragvox::audio::read_wav;
use ragvox::config::{ChunkingConfig, Config};
use ragvox::domain::Document;
use ragvox::ports::{
    EmbeddingGenerator, GenerationRequest, Synthesizer, TextExtractor, TextGenerator, Transcriber,
    Transcription,
};
use ragvox::services::{ChatSession, Retriever};
use ragvox::{RagError, Result};
use tempfile::TempDir;

pub const VOCABULARY: [&str; 4] = ["apple", "banana", "cherry", "date"];

/// Reads uploads as UTF-8; files starting with `FAIL` are unreadable.
pub struct FileExtractor;

#[async_trait]
impl TextExtractor for FileExtractor {
    fn supports(&self, _doc: &Document) -> bool {
        true
    }

    async fn extract(&self, doc: &Document) -> Result<String> {
        let text = tokio::fs::read_to_string(&doc.path).await?;
        if text.starts_with("FAIL") {
            return Err(RagError::extraction(&doc.filename, "unreadable"));
        }
        Ok(text)
    }
}

/// Counts vocabulary words, one dimension per word.
pub struct KeywordEmbedder {
    dimension: usize,
}

impl KeywordEmbedder {
    pub const fn new() -> Self {
        Self {
            dimension: VOCABULARY.len(),
        }
    }

    fn vector(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0.0; self.dimension];
        for word in text.split_whitespace() {
            let word = word
                .trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase();
            if let Some(i) = VOCABULARY.iter().position(|w| *w == word) {
                v[i] += 1.0;
            }
        }
        v
    }
}

#[async_trait]
impl EmbeddingGenerator for KeywordEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.vector(text))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.vector(t)).collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        "keyword"
    }
}

/// Echoes the prompt followed by a fixed completion, like a raw causal LM.
#[derive(Default)]
pub struct EchoGenerator {
    pub completion: String,
    pub fail: bool,
    pub requests: Mutex<Vec<GenerationRequest>>,
}

impl EchoGenerator {
    pub fn answering(completion: &str) -> Self {
        Self {
            completion: completion.to_string(),
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for EchoGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        self.requests.lock().unwrap().push(request.clone());
        if self.fail {
            return Err(RagError::Generation("model unavailable".to_string()));
        }
        Ok(format!("{} {}", request.prompt, self.completion))
    }
}

/// Returns fixed segments and records the sample count of each recording.
#[derive(Default)]
pub struct ScriptedTranscriber {
    pub segments: Vec<String>,
    pub fail: bool,
    pub heard: Mutex<Vec<(PathBuf, usize)>>,
}

impl ScriptedTranscriber {
    pub fn saying(segments: &[&str]) -> Self {
        Self {
            segments: segments.iter().map(|s| (*s).to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl Transcriber for ScriptedTranscriber {
    async fn transcribe(&self, wav_path: &Path) -> Result<Transcription> {
        let input = read_wav(wav_path)?;
        self.heard
            .lock()
            .unwrap()
            .push((wav_path.to_path_buf(), input.samples.len()));
        if self.fail {
            return Err(RagError::Transcription("decoder crashed".to_string()));
        }
        Ok(Transcription {
            language: Some("en".to_string()),
            language_probability: Some(0.98),
            segments: self.segments.clone(),
        })
    }
}

#[derive(Default)]
pub struct FileSynthesizer {
    pub fail: bool,
}

#[async_trait]
impl Synthesizer for FileSynthesizer {
    async fn synthesize(&self, text: &str, output: &Path) -> Result<()> {
        if self.fail {
            return Err(RagError::Synthesis("voice not installed".to_string()));
        }
        tokio::fs::write(output, text.as_bytes()).await?;
        Ok(())
    }
}

/// Four-word chunks without overlap, two chunks per query.
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.chunking = ChunkingConfig::new(4, 0);
    config.retrieval.top_k = 2;
    config
}

pub fn session_with(
    embedder: Arc<dyn EmbeddingGenerator>,
    generator: Arc<dyn TextGenerator>,
    config: &Config,
) -> ChatSession {
    let retriever = Retriever::new(Arc::new(FileExtractor), embedder, config.chunking)
        .with_max_upload_bytes(config.ingest.max_upload_bytes);
    ChatSession::new(retriever, generator, config)
}

pub fn write_doc(dir: &TempDir, name: &str, text: &str) -> Document {
    let path = dir.path().join(name);
    std::fs::write(&path, text).unwrap();
    Document::from_path(path)
}

pub fn files_in(dir: &Path) -> Vec<PathBuf> {
    match std::fs::read_dir(dir) {
        Ok(entries) => entries.map(|e| e.unwrap().path()).collect(),
        Err(_) => Vec::new(),
    }
}
