pub mod chunk;
pub mod conversation;
pub mod document;
pub mod id;
pub mod search;

pub use chunk::Chunk;
pub use conversation::{AudioInput, ChatReply, Samples};
pub use document::Document;
pub use id::DocId;
pub use search::{RetrievedChunk, SearchQuery};
