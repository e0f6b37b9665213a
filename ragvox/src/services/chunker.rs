use crate::config::ChunkingConfig;
use crate::error::Result;

/// Splits `text` into overlapping windows of whitespace-delimited words.
///
/// Window starts advance by `chunk_size - overlap` words; the last window may
/// be shorter. Words are rejoined with single spaces.
pub fn chunk_text(text: &str, config: &ChunkingConfig) -> Result<Vec<String>> {
    let step = config.step()?;
    let words: Vec<&str> = text.split_whitespace().collect();

    let chunks: Vec<String> = (0..words.len())
        .step_by(step)
        .map(|start| {
            let end = (start + config.chunk_size).min(words.len());
            words[start..end].join(" ")
        })
        .collect();

    tracing::debug!(
        words = words.len(),
        chunks = chunks.len(),
        "Text split into chunks"
    );
    Ok(chunks)
}
