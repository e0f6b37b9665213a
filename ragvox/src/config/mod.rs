use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{RagError, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub chunking: ChunkingConfig,
    pub retrieval: RetrievalConfig,
    pub embedding: EmbeddingConfig,
    pub generation: GenerationConfig,
    pub speech: SpeechConfig,
    pub ingest: IngestConfig,
}

/// Word-window chunking parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    pub chunk_size: usize,
    pub overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            overlap: 50,
        }
    }
}

impl ChunkingConfig {
    pub const fn new(chunk_size: usize, overlap: usize) -> Self {
        Self {
            chunk_size,
            overlap,
        }
    }

    /// Number of words the window start advances per chunk.
    pub fn step(&self) -> Result<usize> {
        if self.chunk_size == 0 || self.overlap >= self.chunk_size {
            return Err(RagError::ChunkConfig {
                chunk_size: self.chunk_size,
                overlap: self.overlap,
            });
        }
        Ok(self.chunk_size - self.overlap)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { top_k: 2 }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmbeddingModelChoice {
    #[default]
    #[serde(rename = "all-MiniLM-L6-v2")]
    AllMinilmL6V2,
    #[serde(rename = "all-MiniLM-L12-v2")]
    AllMinilmL12V2,
    #[serde(rename = "bge-small-en-v1.5")]
    BgeSmallEnV15,
    #[serde(rename = "bge-base-en-v1.5")]
    BgeBaseEnV15,
}

impl EmbeddingModelChoice {
    pub const fn dimension(self) -> usize {
        match self {
            Self::AllMinilmL6V2 | Self::AllMinilmL12V2 | Self::BgeSmallEnV15 => 384,
            Self::BgeBaseEnV15 => 768,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::AllMinilmL6V2 => "all-MiniLM-L6-v2",
            Self::AllMinilmL12V2 => "all-MiniLM-L12-v2",
            Self::BgeSmallEnV15 => "bge-small-en-v1.5",
            Self::BgeBaseEnV15 => "bge-base-en-v1.5",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub model: EmbeddingModelChoice,
    pub cache_dir: Option<PathBuf>,
    pub batch_size: usize,
    pub show_download_progress: bool,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: EmbeddingModelChoice::default(),
            cache_dir: None,
            batch_size: 32,
            show_download_progress: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub url: String,
    pub model: String,
    pub max_new_tokens: u32,
    pub sampling: bool,
    pub temperature: f32,
    pub timeout_secs: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:11434".to_string(),
            model: "smollm:135m".to_string(),
            max_new_tokens: 50,
            sampling: true,
            temperature: 0.1,
            timeout_secs: 120,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// Base URL of an OpenAI-compatible audio server; speech is off when unset.
    pub url: Option<String>,
    pub transcription_model: String,
    pub synthesis_model: String,
    pub voice: String,
    pub recordings_dir: PathBuf,
    pub replies_dir: PathBuf,
    pub keep_replies: usize,
    pub timeout_secs: u64,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            url: None,
            transcription_model: "whisper-small".to_string(),
            synthesis_model: "tts-1".to_string(),
            voice: "alloy".to_string(),
            recordings_dir: PathBuf::from("./audio_files"),
            replies_dir: PathBuf::from("./generated_audio_files"),
            keep_replies: 20,
            timeout_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    pub max_upload_bytes: u64,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: 50 * 1024 * 1024,
        }
    }
}

impl Config {
    /// Global file, then the project file key by key, then environment.
    pub fn load() -> Result<Self> {
        let mut table = Self::load_global()?.unwrap_or_default();
        if let Some(project) = Self::load_project()? {
            merge_tables(&mut table, project);
        }
        let config = Self::from_table(table)?.with_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn load_global() -> Result<Option<toml::Table>> {
        let config_dir = directories::ProjectDirs::from("", "", "ragvox").map_or_else(
            || PathBuf::from("~/.config/ragvox"),
            |d| d.config_dir().to_path_buf(),
        );

        Self::load_file(&config_dir.join("config.toml"))
    }

    fn load_project() -> Result<Option<toml::Table>> {
        Self::load_file(&PathBuf::from(".ragvox/config.toml"))
    }

    fn load_file(path: &std::path::Path) -> Result<Option<toml::Table>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path)?;
        parse_table(&content).map(Some)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Self::from_table(parse_table(content)?)
    }

    fn from_table(table: toml::Table) -> Result<Self> {
        toml::Value::Table(table)
            .try_into()
            .map_err(|e: toml::de::Error| RagError::Config(e.to_string()))
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var("RAGVOX_GENERATOR_URL") {
            self.generation.url = url;
        }
        if let Ok(model) = std::env::var("RAGVOX_GENERATOR_MODEL") {
            self.generation.model = model;
        }
        if let Ok(url) = std::env::var("RAGVOX_SPEECH_URL") {
            self.speech.url = Some(url);
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.chunking.step()?;
        if self.retrieval.top_k == 0 {
            return Err(RagError::Config("retrieval.top_k must be at least 1".to_string()));
        }
        if self.embedding.batch_size == 0 {
            return Err(RagError::Config(
                "embedding.batch_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_table(content: &str) -> Result<toml::Table> {
    content
        .parse::<toml::Table>()
        .map_err(|e| RagError::Config(e.to_string()))
}

/// Overlays `overlay` onto `base`; nested tables merge, other values replace.
fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match value {
            toml::Value::Table(table) => {
                if let Some(toml::Value::Table(existing)) = base.get_mut(&key) {
                    merge_tables(existing, table);
                } else {
                    base.insert(key, toml::Value::Table(table));
                }
            }
            value => {
                base.insert(key, value);
            }
        }
    }
}
