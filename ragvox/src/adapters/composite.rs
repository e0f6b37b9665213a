use std::sync::Arc;

use async_trait::async_trait;

use crate::adapters::{MarkdownExtractor, PdfExtractor, PlainTextExtractor};
use crate::domain::Document;
use crate::error::{RagError, Result};
use crate::ports::TextExtractor;

/// Dispatches each document to the first extractor that supports it.
#[derive(Clone)]
pub struct CompositeExtractor {
    extractors: Vec<Arc<dyn TextExtractor>>,
}

impl CompositeExtractor {
    pub fn new(extractors: Vec<Arc<dyn TextExtractor>>) -> Self {
        Self { extractors }
    }

    /// PDF, Markdown and plain text.
    pub fn with_defaults() -> Self {
        Self::new(vec![
            Arc::new(PdfExtractor),
            Arc::new(MarkdownExtractor),
            Arc::new(PlainTextExtractor),
        ])
    }
}

#[async_trait]
impl TextExtractor for CompositeExtractor {
    fn supports(&self, doc: &Document) -> bool {
        self.extractors.iter().any(|e| e.supports(doc))
    }

    async fn extract(&self, doc: &Document) -> Result<String> {
        let extractor = self
            .extractors
            .iter()
            .find(|e| e.supports(doc))
            .ok_or_else(|| RagError::extraction(&doc.filename, "unsupported document type"))?;
        extractor.extract(doc).await
    }
}
