use std::sync::Arc;

use async_trait::async_trait;
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use tokio::sync::OnceCell;

use crate::config::{EmbeddingConfig, EmbeddingModelChoice};
use crate::error::{RagError, Result};
use crate::ports::EmbeddingGenerator;

/// Local ONNX sentence embeddings. The model is downloaded and loaded on
/// first use, then shared.
pub struct FastEmbedder {
    config: EmbeddingConfig,
    model: OnceCell<Arc<TextEmbedding>>,
}

impl FastEmbedder {
    pub fn new(config: &EmbeddingConfig) -> Self {
        Self {
            config: config.clone(),
            model: OnceCell::new(),
        }
    }

    fn init_options(&self) -> InitOptions {
        let model = match self.config.model {
            EmbeddingModelChoice::AllMinilmL6V2 => EmbeddingModel::AllMiniLML6V2,
            EmbeddingModelChoice::AllMinilmL12V2 => EmbeddingModel::AllMiniLML12V2,
            EmbeddingModelChoice::BgeSmallEnV15 => EmbeddingModel::BGESmallENV15,
            EmbeddingModelChoice::BgeBaseEnV15 => EmbeddingModel::BGEBaseENV15,
        };

        let mut options = InitOptions::new(model)
            .with_show_download_progress(self.config.show_download_progress);
        if let Some(dir) = &self.config.cache_dir {
            options = options.with_cache_dir(dir.clone());
        }
        options
    }

    async fn model(&self) -> Result<Arc<TextEmbedding>> {
        self.model
            .get_or_try_init(|| async {
                tracing::info!("Loading embedding model {}", self.config.model.name());
                let options = self.init_options();
                let model = tokio::task::spawn_blocking(move || TextEmbedding::try_new(options))
                    .await
                    .map_err(|e| RagError::Embedding(e.to_string()))?
                    .map_err(encoder_error)?;
                Ok(Arc::new(model))
            })
            .await
            .cloned()
    }

    async fn encode(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>> {
        let model = self.model().await?;
        let batch_size = self.config.batch_size;
        tokio::task::spawn_blocking(move || model.embed(texts, Some(batch_size)))
            .await
            .map_err(|e| RagError::Embedding(e.to_string()))?
            .map_err(encoder_error)
    }
}

fn encoder_error(e: anyhow::Error) -> RagError {
    RagError::Embedding(format!("{e:#}"))
}

#[async_trait]
impl EmbeddingGenerator for FastEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.encode(vec![text.to_string()])
            .await?
            .pop()
            .ok_or_else(|| RagError::Embedding("encoder returned no vector".to_string()))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        self.encode(texts.iter().map(|t| (*t).to_string()).collect())
            .await
    }

    fn dimension(&self) -> usize {
        self.config.model.dimension()
    }

    fn model_name(&self) -> &str {
        self.config.model.name()
    }
}
