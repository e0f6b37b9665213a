use async_trait::async_trait;

use crate::error::Result;

#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Returns the completion. Backends that echo the prompt may include it.
    async fn generate(&self, request: &GenerationRequest) -> Result<String>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub context: Vec<String>,
    pub question: String,
    pub max_new_tokens: u32,
    pub sampling: bool,
    pub temperature: f32,
}
