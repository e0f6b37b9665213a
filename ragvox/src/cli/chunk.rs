use std::path::PathBuf;

use console::style;
use ragvox::adapters::CompositeExtractor;
use ragvox::config::Config;
use ragvox::domain::Document;
use ragvox::error::Result;
use ragvox::ports::TextExtractor;
use ragvox::services::chunk_text;
use serde_json::json;

const PREVIEW_CHARS: usize = 120;

pub async fn run(config: &Config, file: PathBuf, json: bool) -> Result<()> {
    let doc = Document::from_path(file);
    let text = CompositeExtractor::with_defaults().extract(&doc).await?;
    let chunks = chunk_text(&text, &config.chunking)?;

    if json {
        let value = json!({
            "file": doc.filename,
            "chunk_size": config.chunking.chunk_size,
            "overlap": config.chunking.overlap,
            "chunks": chunks,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!(
        "{}: {} chunks (size {}, overlap {})",
        style(&doc.filename).bold(),
        chunks.len(),
        config.chunking.chunk_size,
        config.chunking.overlap
    );
    for (i, chunk) in chunks.iter().enumerate() {
        let words = chunk.split(' ').count();
        let preview: String = chunk.chars().take(PREVIEW_CHARS).collect();
        let ellipsis = if chunk.chars().count() > PREVIEW_CHARS { "…" } else { "" };
        println!("[{i}] ({words} words) {preview}{ellipsis}");
    }
    Ok(())
}
