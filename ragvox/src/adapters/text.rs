use async_trait::async_trait;

use crate::domain::Document;
use crate::error::{RagError, Result};
use crate::ports::TextExtractor;

#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextExtractor;

#[async_trait]
impl TextExtractor for PlainTextExtractor {
    fn supports(&self, doc: &Document) -> bool {
        matches!(doc.extension().as_deref(), Some("txt" | "text"))
    }

    async fn extract(&self, doc: &Document) -> Result<String> {
        let bytes = tokio::fs::read(&doc.path)
            .await
            .map_err(|e| RagError::extraction(&doc.filename, e))?;
        String::from_utf8(bytes).map_err(|_| RagError::extraction(&doc.filename, "not valid UTF-8"))
    }
}
