use async_trait::async_trait;

use crate::error::Result;

/// Sentence encoder shared by ingestion and queries.
///
/// Every vector it returns has `dimension()` components; ingestion rejects
/// batches that do not.
#[async_trait]
pub trait EmbeddingGenerator: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embeds `texts` in order, one vector per input.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>>;

    fn dimension(&self) -> usize;

    /// Name used in logs.
    fn model_name(&self) -> &str;
}
