use async_trait::async_trait;

use crate::domain::Document;
use crate::error::Result;

#[async_trait]
pub trait TextExtractor: Send + Sync {
    fn supports(&self, doc: &Document) -> bool;
    async fn extract(&self, doc: &Document) -> Result<String>;
}
