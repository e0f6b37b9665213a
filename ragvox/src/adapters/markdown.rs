use async_trait::async_trait;
use pulldown_cmark::{Event, Parser, TagEnd};

use crate::domain::Document;
use crate::error::{RagError, Result};
use crate::ports::TextExtractor;

/// Markdown rendered to plain text: markup dropped, block boundaries kept
/// as line breaks.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownExtractor;

#[async_trait]
impl TextExtractor for MarkdownExtractor {
    fn supports(&self, doc: &Document) -> bool {
        matches!(doc.extension().as_deref(), Some("md" | "markdown" | "mdx"))
    }

    async fn extract(&self, doc: &Document) -> Result<String> {
        let source = tokio::fs::read_to_string(&doc.path)
            .await
            .map_err(|e| RagError::extraction(&doc.filename, e))?;
        Ok(markdown_to_text(&source))
    }
}

pub fn markdown_to_text(source: &str) -> String {
    let mut text = String::with_capacity(source.len());

    for event in Parser::new(source) {
        match event {
            Event::Text(t) | Event::Code(t) => text.push_str(&t),
            Event::SoftBreak => text.push(' '),
            Event::HardBreak
            | Event::Rule
            | Event::End(
                TagEnd::Paragraph
                | TagEnd::Heading(_)
                | TagEnd::Item
                | TagEnd::CodeBlock
                | TagEnd::TableRow,
            ) => text.push('\n'),
            Event::End(TagEnd::TableCell) => text.push(' '),
            _ => {}
        }
    }

    text
}
