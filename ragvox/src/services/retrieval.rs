use std::fmt::Write as _;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;

use crate::config::ChunkingConfig;
use crate::domain::conversation::NO_FILES_STATUS;
use crate::domain::{Chunk, DocId, Document, RetrievedChunk, SearchQuery};
use crate::error::{RagError, Result};
use crate::index::FlatL2Index;
use crate::ports::{EmbeddingGenerator, TextExtractor};
use crate::services::chunker::chunk_text;

/// The chunk sequence and the vector index built over it.
///
/// Row `i` of the index always embeds `chunks[i]`.
#[derive(Debug, Default)]
pub struct KnowledgeBase {
    chunks: Vec<Chunk>,
    index: Option<FlatL2Index>,
}

impl KnowledgeBase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub const fn index(&self) -> Option<&FlatL2Index> {
        self.index.as_ref()
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn is_ready(&self) -> bool {
        self.index.as_ref().is_some_and(|i| !i.is_empty()) && !self.chunks.is_empty()
    }

    /// Appends a prepared batch. On error nothing is changed.
    pub fn commit(&mut self, batch: PreparedBatch) -> Result<IngestReport> {
        let chunk_count: usize = batch.documents.iter().map(|d| d.chunks.len()).sum();
        if chunk_count != batch.embeddings.len() {
            return Err(RagError::Embedding(format!(
                "{} vectors for {chunk_count} chunks",
                batch.embeddings.len()
            )));
        }

        let mut index = self.index.take().unwrap_or_default();
        let appended = index.add_batch(&batch.embeddings);
        if !index.is_empty() {
            self.index = Some(index);
        }
        let first_row = appended?;
        debug_assert_eq!(first_row, self.chunks.len());

        let mut documents = Vec::with_capacity(batch.documents.len());
        let mut chunks_added = 0;

        for prepared in batch.documents {
            let count = prepared.chunks.len();
            for text in prepared.chunks {
                let position = self.chunks.len();
                self.chunks.push(Chunk::new(
                    position,
                    prepared.document.id.clone(),
                    prepared.document.filename.clone(),
                    text,
                ));
            }
            chunks_added += count;
            documents.push(IngestedDocument {
                doc_id: prepared.document.id,
                filename: prepared.document.filename,
                chunks: count,
            });
        }

        tracing::info!(
            added = chunks_added,
            total = self.chunks.len(),
            "Vector index updated"
        );

        Ok(IngestReport {
            documents,
            skipped: batch.skipped,
            chunks_added,
            total_chunks: self.chunks.len(),
        })
    }

    /// The `k` chunks nearest to `embedding`, closest first.
    pub fn search(&self, embedding: &[f32], k: usize) -> Result<Vec<RetrievedChunk>> {
        let index = match &self.index {
            Some(index) if self.is_ready() => index,
            _ => return Err(RagError::IndexNotReady),
        };

        let hits = index
            .search(embedding, k)?
            .into_iter()
            .filter_map(|n| {
                self.chunks.get(n.row).map(|chunk| RetrievedChunk {
                    position: chunk.position,
                    source: chunk.source.clone(),
                    text: chunk.text.clone(),
                    distance: n.distance,
                })
            })
            .collect();
        Ok(hits)
    }
}

/// Extracted, chunked and embedded documents not yet visible to queries.
#[derive(Debug, Default)]
pub struct PreparedBatch {
    pub documents: Vec<PreparedDocument>,
    pub skipped: Vec<SkippedDocument>,
    pub embeddings: Vec<Vec<f32>>,
}

#[derive(Debug)]
pub struct PreparedDocument {
    pub document: Document,
    pub chunks: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestedDocument {
    pub doc_id: DocId,
    pub filename: String,
    pub chunks: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedDocument {
    pub filename: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct IngestReport {
    pub documents: Vec<IngestedDocument>,
    pub skipped: Vec<SkippedDocument>,
    pub chunks_added: usize,
    pub total_chunks: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum IngestOutcome {
    NoFiles,
    Ingested(IngestReport),
}

impl IngestOutcome {
    /// Human-readable status for the upload view.
    pub fn status(&self) -> String {
        match self {
            Self::NoFiles => NO_FILES_STATUS.to_string(),
            Self::Ingested(report) => {
                let n = report.documents.len();
                let total = report.total_chunks;
                let mut status = format!(
                    "{n} {} processed and indexed ({total} {})",
                    if n == 1 { "document" } else { "documents" },
                    if total == 1 { "chunk" } else { "chunks" },
                );
                if !report.skipped.is_empty() {
                    status.push_str("; skipped: ");
                    for (i, s) in report.skipped.iter().enumerate() {
                        if i > 0 {
                            status.push_str(", ");
                        }
                        let _ = write!(status, "{} ({})", s.filename, s.reason);
                    }
                }
                status
            }
        }
    }
}

/// Runs extraction, chunking and embedding for uploads, and query embedding
/// plus nearest-neighbour search for questions.
pub struct Retriever {
    extractor: Arc<dyn TextExtractor>,
    embedder: Arc<dyn EmbeddingGenerator>,
    chunking: ChunkingConfig,
    max_upload_bytes: u64,
}

impl Retriever {
    pub fn new(
        extractor: Arc<dyn TextExtractor>,
        embedder: Arc<dyn EmbeddingGenerator>,
        chunking: ChunkingConfig,
    ) -> Self {
        Self {
            extractor,
            embedder,
            chunking,
            max_upload_bytes: u64::MAX,
        }
    }

    #[must_use]
    pub const fn with_max_upload_bytes(mut self, limit: u64) -> Self {
        self.max_upload_bytes = limit;
        self
    }

    /// Extracts, chunks and embeds `documents` in upload order.
    ///
    /// Documents that fail extraction are skipped. If all of them fail the
    /// first failure is returned.
    pub async fn prepare(&self, documents: &[Document]) -> Result<PreparedBatch> {
        let mut batch = PreparedBatch::default();
        let mut first_error = None;

        for doc in documents {
            let chunks = match self.extract_checked(doc).await {
                Ok(text) => chunk_text(&text, &self.chunking)?,
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", doc.filename, e);
                    batch.skipped.push(SkippedDocument {
                        filename: doc.filename.clone(),
                        reason: skip_reason(&e),
                    });
                    first_error.get_or_insert(e);
                    continue;
                }
            };

            tracing::info!(
                doc = %doc.id,
                chunks = chunks.len(),
                "Extracted {}",
                doc.filename
            );
            batch.documents.push(PreparedDocument {
                document: doc.clone(),
                chunks,
            });
        }

        if batch.documents.is_empty()
            && let Some(e) = first_error
        {
            return Err(e);
        }

        let texts: Vec<&str> = batch
            .documents
            .iter()
            .flat_map(|d| d.chunks.iter().map(String::as_str))
            .collect();

        if !texts.is_empty() {
            tracing::info!(
                chunks = texts.len(),
                model = self.embedder.model_name(),
                "Embedding chunks"
            );
            let embeddings = self.embedder.embed_batch(&texts).await?;
            if embeddings.len() != texts.len() {
                return Err(RagError::Embedding(format!(
                    "embedder returned {} vectors for {} chunks",
                    embeddings.len(),
                    texts.len()
                )));
            }
            let dimension = self.embedder.dimension();
            if let Some(v) = embeddings.iter().find(|v| v.len() != dimension) {
                return Err(RagError::EmbeddingDimension {
                    expected: dimension,
                    actual: v.len(),
                });
            }
            batch.embeddings = embeddings;
        }

        Ok(batch)
    }

    async fn extract_checked(&self, doc: &Document) -> Result<String> {
        let size = tokio::fs::metadata(&doc.path)
            .await
            .map_err(|e| RagError::extraction(&doc.filename, e))?
            .len();
        if size > self.max_upload_bytes {
            return Err(RagError::UploadTooLarge {
                filename: doc.filename.clone(),
                size,
                limit: self.max_upload_bytes,
            });
        }
        self.extractor.extract(doc).await
    }

    /// Embeds the question and returns its nearest chunks.
    pub async fn retrieve(
        &self,
        knowledge: &RwLock<KnowledgeBase>,
        query: &SearchQuery,
    ) -> Result<Vec<RetrievedChunk>> {
        if !knowledge.read().await.is_ready() {
            return Err(RagError::IndexNotReady);
        }

        tracing::debug!("Converting the query to embeddings");
        let embedding = self.embedder.embed(&query.query).await?;

        let hits = knowledge.read().await.search(&embedding, query.limit)?;
        tracing::info!(hits = hits.len(), "Relevant chunks for the query fetched");
        Ok(hits)
    }
}

fn skip_reason(error: &RagError) -> String {
    match error {
        RagError::Extraction { reason, .. } => reason.clone(),
        other => other.to_string(),
    }
}
