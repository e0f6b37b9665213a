pub mod embed;
pub mod extract;
pub mod generate;
pub mod speech;

pub use embed::EmbeddingGenerator;
pub use extract::TextExtractor;
pub use generate::{GenerationRequest, TextGenerator};
pub use speech::{Synthesizer, Transcriber, Transcription};
