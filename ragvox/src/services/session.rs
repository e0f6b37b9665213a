use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use crate::config::{Config, GenerationConfig};
use crate::domain::conversation::{FALLBACK_ANSWER, NO_REFERENCE_DATA};
use crate::domain::{Document, SearchQuery};
use crate::error::{RagError, Result};
use crate::ports::TextGenerator;
use crate::services::prompt::{build_prompt, extract_answer};
use crate::services::retrieval::{IngestOutcome, KnowledgeBase, Retriever};

/// One conversation's documents and the operations over them.
///
/// Queries read a consistent snapshot: an ingest becomes visible only once
/// its chunks and vectors are both appended.
pub struct ChatSession {
    retriever: Retriever,
    generator: Arc<dyn TextGenerator>,
    generation: GenerationConfig,
    top_k: usize,
    knowledge: RwLock<KnowledgeBase>,
    ingest_lock: Mutex<()>,
}

impl ChatSession {
    pub fn new(retriever: Retriever, generator: Arc<dyn TextGenerator>, config: &Config) -> Self {
        Self {
            retriever,
            generator,
            generation: config.generation.clone(),
            top_k: config.retrieval.top_k,
            knowledge: RwLock::new(KnowledgeBase::new()),
            ingest_lock: Mutex::new(()),
        }
    }

    pub async fn try_ingest(&self, documents: &[Document]) -> Result<IngestOutcome> {
        if documents.is_empty() {
            tracing::info!("Ingest called without files");
            return Ok(IngestOutcome::NoFiles);
        }

        let _serial = self.ingest_lock.lock().await;
        tracing::info!(documents = documents.len(), "Processing uploaded files");

        let batch = self.retriever.prepare(documents).await?;
        let report = self.knowledge.write().await.commit(batch)?;
        Ok(IngestOutcome::Ingested(report))
    }

    /// Ingests `documents` and renders the outcome as a status line.
    pub async fn ingest(&self, documents: &[Document]) -> String {
        match self.try_ingest(documents).await {
            Ok(outcome) => outcome.status(),
            Err(e) => {
                tracing::error!("Error building knowledge base: {}", e);
                format!("Error building knowledge base: {e}")
            }
        }
    }

    pub async fn try_respond(&self, query: &str) -> Result<String> {
        let search = SearchQuery::new(query).with_limit(self.top_k);
        let hits = match self.retriever.retrieve(&self.knowledge, &search).await {
            Err(RagError::IndexNotReady) => {
                tracing::info!("Query received before any documents were indexed");
                return Ok(NO_REFERENCE_DATA.to_string());
            }
            other => other?,
        };

        let request = build_prompt(query, &hits, &self.generation);
        tracing::info!("Generate the response for the query");
        let raw = self.generator.generate(&request).await?;
        let answer = extract_answer(&request, &raw);
        tracing::debug!(chars = answer.len(), "Response for the query generated");
        Ok(answer)
    }

    /// Answers `query`, degrading to a fixed message on failure.
    pub async fn respond(&self, query: &str) -> String {
        match self.try_respond(query).await {
            Ok(answer) => answer,
            Err(e) => {
                tracing::error!("Error answering query: {}", e);
                FALLBACK_ANSWER.to_string()
            }
        }
    }

    pub async fn chunk_count(&self) -> usize {
        self.knowledge.read().await.len()
    }

    pub async fn is_ready(&self) -> bool {
        self.knowledge.read().await.is_ready()
    }
}
