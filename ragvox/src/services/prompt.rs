use crate::config::GenerationConfig;
use crate::domain::RetrievedChunk;
use crate::ports::GenerationRequest;

pub const ANSWER_MARKER: &str = "Answer:";

/// Renders the generation prompt for `question` over `chunks`, best first.
pub fn build_prompt(
    question: &str,
    chunks: &[RetrievedChunk],
    config: &GenerationConfig,
) -> GenerationRequest {
    let context: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();

    let mut prompt = String::from("Context:\n");
    for text in &context {
        prompt.push_str(text);
        prompt.push('\n');
    }
    prompt.push_str("\nQuestion:");
    prompt.push_str(question);
    prompt.push('\n');
    prompt.push_str(ANSWER_MARKER);

    GenerationRequest {
        prompt,
        context,
        question: question.to_string(),
        max_new_tokens: config.max_new_tokens,
        sampling: config.sampling,
        temperature: config.temperature,
    }
}

/// Separates the answer from raw generator output.
///
/// An echoed prompt is stripped as a prefix. Otherwise the text after the
/// last answer marker is used, or the whole output when there is none.
pub fn extract_answer(request: &GenerationRequest, raw: &str) -> String {
    let completion = raw.strip_prefix(request.prompt.as_str()).unwrap_or_else(|| {
        raw.rsplit_once(ANSWER_MARKER)
            .map_or(raw, |(_, after)| after)
    });
    completion.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn chunk(text: &str) -> RetrievedChunk {
        RetrievedChunk {
            position: 0,
            source: "doc.pdf".to_string(),
            text: text.to_string(),
            distance: 0.0,
        }
    }

    #[test]
    fn test_prompt_template() {
        let request = build_prompt(
            "When is checkout?",
            &[chunk("Checkout is at 11am."), chunk("Breakfast runs until 10.")],
            &GenerationConfig::default(),
        );
        assert_eq!(
            request.prompt,
            "Context:\nCheckout is at 11am.\nBreakfast runs until 10.\n\nQuestion:When is checkout?\nAnswer:"
        );
        assert_eq!(request.context.len(), 2);
        assert_eq!(request.question, "When is checkout?");
        assert_eq!(request.max_new_tokens, 50);
    }

    #[test]
    fn test_echoed_prompt_stripped() {
        let request = build_prompt("Q?", &[chunk("ctx")], &GenerationConfig::default());
        let raw = format!("{} At noon.\n", request.prompt);
        assert_eq!(extract_answer(&request, &raw), "At noon.");
    }

    #[test]
    fn test_echo_stripped_even_when_context_contains_marker() {
        let request = build_prompt(
            "Q?",
            &[chunk("FAQ Answer: always restart")],
            &GenerationConfig::default(),
        );
        let raw = format!("{} Answer: twice", request.prompt);
        assert_eq!(extract_answer(&request, &raw), "Answer: twice");
    }

    #[test]
    fn test_falls_back_to_last_marker() {
        let request = build_prompt("Q?", &[chunk("ctx")], &GenerationConfig::default());
        assert_eq!(
            extract_answer(&request, "rephrased prompt\nAnswer: forty two"),
            "forty two"
        );
    }

    #[test]
    fn test_plain_completion_returned_whole() {
        let request = build_prompt("Q?", &[chunk("ctx")], &GenerationConfig::default());
        assert_eq!(extract_answer(&request, "  Forty two. "), "Forty two.");
    }
}
