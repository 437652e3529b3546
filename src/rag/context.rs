//! Context and citation formatting.

use super::SourceReference;
use crate::vector_store::SearchResult;

/// Format retrieved chunks as the context block of a prompt.
///
/// Chunks keep the order they were retrieved in, each tagged with its source.
pub fn format_context_for_prompt(results: &[SearchResult<'_>]) -> String {
    results
        .iter()
        .map(|r| format!("[Source {}]: {}\n", r.chunk.source_id(), r.chunk.content()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format the citation block appended to chat answers.
pub fn format_sources(sources: &[SourceReference]) -> String {
    let mut output = String::from("Sources:");
    for (i, source) in sources.iter().enumerate() {
        output.push_str(&format!(
            "\n{}. Source: {}, Chunk: {}\n   Similarity: {:.3}\n   URL: {}",
            i + 1,
            source.source_id,
            source.chunk_index,
            source.similarity,
            source.url()
        ));
    }
    output
}

/// Cut `content` to `max_chars` characters, appending "..." if anything was cut.
pub fn excerpt(content: &str, max_chars: usize) -> String {
    match content.char_indices().nth(max_chars) {
        Some((byte_index, _)) => format!("{}...", &content[..byte_index]),
        None => content.to_string(),
    }
}
