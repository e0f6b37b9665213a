pub mod chunker;
pub mod prompt;
pub mod retrieval;
pub mod session;
pub mod voice;

pub use chunker::chunk_text;
pub use prompt::{build_prompt, extract_answer};
pub use retrieval::{IngestOutcome, IngestReport, KnowledgeBase, Retriever};
pub use session::ChatSession;
pub use voice::VoiceBot;
