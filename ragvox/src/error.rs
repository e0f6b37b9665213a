use thiserror::Error;

#[derive(Error, Debug)]
pub enum RagError {
    #[error("Failed to extract text from {filename}: {reason}")]
    Extraction { filename: String, reason: String },

    #[error("Upload {filename} is {size} bytes, limit is {limit}")]
    UploadTooLarge {
        filename: String,
        size: u64,
        limit: u64,
    },

    #[error("Invalid chunking: overlap {overlap} must be smaller than chunk size {chunk_size}")]
    ChunkConfig { chunk_size: usize, overlap: usize },

    #[error("Embedding dimension mismatch: index holds {expected}, got {actual}")]
    EmbeddingDimension { expected: usize, actual: usize },

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("No reference data available, upload documents first")]
    IndexNotReady,

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Transcription error: {0}")]
    Transcription(String),

    #[error("Speech synthesis error: {0}")]
    Synthesis(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl RagError {
    pub fn extraction(filename: impl Into<String>, reason: impl ToString) -> Self {
        Self::Extraction {
            filename: filename.into(),
            reason: reason.to_string(),
        }
    }

    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Extraction { .. } | Self::UploadTooLarge { .. } => 1,
            Self::ChunkConfig { .. } | Self::Config(_) => 3,
            Self::EmbeddingDimension { .. } | Self::Embedding(_) => 4,
            Self::IndexNotReady => 5,
            Self::Generation(_) => 6,
            Self::Transcription(_) | Self::Synthesis(_) => 7,
            Self::Io(_) | Self::Wav(_) | Self::Serialization(_) | Self::Http(_) => 10,
        }
    }
}

pub type Result<T> = std::result::Result<T, RagError>;
