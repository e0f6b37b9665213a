use serde::{Deserialize, Serialize};

use super::DocId;

/// A word window of one document. `position` is its row in the vector index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub position: usize,
    pub doc_id: DocId,
    pub source: String,
    pub text: String,
}

impl Chunk {
    pub fn new(position: usize, doc_id: DocId, source: impl Into<String>, text: String) -> Self {
        Self {
            position,
            doc_id,
            source: source.into(),
            text,
        }
    }
}
