//! Concrete collaborators behind the ports.

pub mod composite;
pub mod embedder;
pub mod markdown;
pub mod ollama;
pub mod openai_audio;
pub mod pdf;
pub mod text;

pub use composite::CompositeExtractor;
pub use embedder::FastEmbedder;
pub use markdown::MarkdownExtractor;
pub use ollama::OllamaGenerator;
pub use openai_audio::OpenAiAudioClient;
pub use pdf::PdfExtractor;
pub use text::PlainTextExtractor;
