//! Sliding-window chunker.

use super::TextChunk;
use crate::config::ChunkingSettings;
use crate::ingest::{reference_url, TranscriptSource};
use std::collections::BTreeMap;

/// How far back from a window's end to look for a sentence break.
const SENTENCE_LOOKBACK: usize = 100;
/// How far back from a window's end to look for a word break.
const WORD_LOOKBACK: usize = 50;

/// Splits text into overlapping chunks of at most `chunk_size` characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextChunker {
    chunk_size: usize,
    overlap: usize,
}

impl TextChunker {
    /// Create a chunker. A `chunk_size` of 0 is treated as 1.
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
            overlap,
        }
    }

    pub fn from_settings(settings: &ChunkingSettings) -> Self {
        Self::new(settings.chunk_size, settings.chunk_overlap)
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn overlap(&self) -> usize {
        self.overlap
    }

    /// Split `text` into chunks tagged with `source_id`.
    ///
    /// Returns nothing for empty or whitespace-only input. Offsets stored in
    /// the metadata count characters, not bytes.
    pub fn chunk(&self, text: &str, source_id: &str) -> Vec<TextChunk> {
        let mut chunks = Vec::new();

        if text.trim().is_empty() {
            return chunks;
        }

        let chars: Vec<char> = text.chars().collect();
        let len = chars.len();
        let mut start = 0;
        let mut chunk_index = 0;

        while start < len {
            let mut end = (start + self.chunk_size).min(len);
            if end < len {
                end = find_boundary(&chars, start, end);
            }

            let window: String = chars[start..end].iter().collect();
            let content = window.trim();

            if !content.is_empty() {
                let mut metadata = BTreeMap::new();
                metadata.insert("source_id".to_string(), source_id.to_string());
                metadata.insert("chunk_id".to_string(), chunk_index.to_string());
                metadata.insert("start_position".to_string(), start.to_string());
                metadata.insert("end_position".to_string(), end.to_string());

                chunks.push(TextChunk::new(content, chunk_index, source_id, metadata));
                chunk_index += 1;
            }

            if end >= len {
                break;
            }

            // Step back by the overlap, but never to or behind the current start
            let next = end.saturating_sub(self.overlap);
            start = if next <= start { end } else { next };
        }

        chunks
    }

    /// Chunk one transcript, attaching its title, duration, and url.
    pub fn chunk_source(&self, source: &TranscriptSource) -> Vec<TextChunk> {
        let url = reference_url(&source.source_id);

        self.chunk(&source.text, &source.source_id)
            .into_iter()
            .map(|chunk| {
                chunk.with_metadata([
                    ("title".to_string(), source.title.clone()),
                    ("duration".to_string(), source.duration_label.clone()),
                    ("url".to_string(), url.clone()),
                ])
            })
            .collect()
    }

    /// Chunk several transcripts, concatenating the results in input order.
    pub fn chunk_multiple(&self, sources: &[TranscriptSource]) -> Vec<TextChunk> {
        sources
            .iter()
            .flat_map(|source| self.chunk_source(source))
            .collect()
    }
}

/// Pull a window end back to a sentence or word break if one is close.
///
/// Breaks must lie strictly after `start`; otherwise `end` is returned as is.
fn find_boundary(chars: &[char], start: usize, end: usize) -> usize {
    let span = end - start;

    // ". " whose space may sit exactly at `end`
    let sentence_window = span.min(SENTENCE_LOOKBACK);
    let lowest = end + 1 - sentence_window;
    for p in (lowest..end).rev() {
        if chars[p] == '.' && chars[p + 1] == ' ' && p > start {
            return p + 1;
        }
    }

    let word_window = span.min(WORD_LOOKBACK);
    for p in (end - word_window..end).rev() {
        if chars[p] == ' ' && p > start {
            return p;
        }
    }

    end
}

#[cfg(test)]
mod tests {
    use super::*;

    fn non_whitespace(s: &str) -> String {
        s.chars().filter(|c| !c.is_whitespace()).collect()
    }

    #[test]
    fn test_empty_input_yields_nothing() {
        let chunker = TextChunker::new(1000, 200);
        assert!(chunker.chunk("", "s1").is_empty());
        assert!(chunker.chunk("   \n\t  ", "s1").is_empty());
    }

    #[test]
    fn test_short_text_is_single_chunk() {
        let chunker = TextChunker::new(1000, 200);
        let chunks = chunker.chunk("  Hello there. General Kenobi.  ", "s1");

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content(), "Hello there. General Kenobi.");
        assert_eq!(chunks[0].chunk_index(), 0);
        assert_eq!(chunks[0].source_id(), "s1");
        assert_eq!(chunks[0].start_position(), Some(0));
        assert_eq!(chunks[0].end_position(), Some(32));
    }

    #[test]
    fn test_sentence_prefix_then_long_word() {
        let text = format!("a. b. {}", "x".repeat(2000));
        let chunks = TextChunker::new(1000, 200).chunk(&text, "s1");

        assert!(chunks.len() >= 2);
        for chunk in &chunks {
            assert!(chunk.content().chars().count() <= 1000);
        }
        for pair in chunks.windows(2) {
            let prev_end = pair[0].end_position().unwrap();
            let next_start = pair[1].start_position().unwrap();
            assert_eq!(prev_end - next_start, 200);
        }
        assert_eq!(chunks.last().unwrap().end_position(), Some(text.chars().count()));
    }

    #[test]
    fn test_breaks_at_sentence_end() {
        let text = "The first sentence is here. The second sentence follows after it.";
        let chunks = TextChunker::new(40, 0).chunk(text, "s1");

        assert_eq!(chunks[0].content(), "The first sentence is here.");
        assert_eq!(chunks[1].content(), "The second sentence follows after it.");
    }

    #[test]
    fn test_breaks_at_word_when_no_sentence() {
        let text = "alpha beta gamma delta epsilon zeta eta theta";
        let chunks = TextChunker::new(20, 0).chunk(text, "s1");

        assert_eq!(chunks[0].content(), "alpha beta gamma");
        for chunk in &chunks {
            assert!(!chunk.content().starts_with(' '));
            assert!(chunk.content().chars().count() <= 20);
        }
        let rebuilt: String = chunks.iter().map(|c| c.content()).collect::<Vec<_>>().join(" ");
        assert_eq!(rebuilt, text);
    }

    #[test]
    fn test_windows_cover_text_without_gaps() {
        let text = "Rust is a systems language. It has ownership. Borrowing is checked at compile time. \
                    Lifetimes describe how long references live. Traits define shared behaviour. "
            .repeat(12);
        let chunks = TextChunker::new(150, 30).chunk(&text, "lecture");

        assert_eq!(chunks[0].start_position(), Some(0));
        assert_eq!(chunks.last().unwrap().end_position(), Some(text.chars().count()));
        for pair in chunks.windows(2) {
            assert!(pair[1].start_position().unwrap() <= pair[0].end_position().unwrap());
            assert!(pair[1].start_position().unwrap() > pair[0].start_position().unwrap());
        }

        // Every non-whitespace character shows up in some chunk at its offset
        let chars: Vec<char> = text.chars().collect();
        let mut covered = vec![false; chars.len()];
        for chunk in &chunks {
            let (s, e) = (chunk.start_position().unwrap(), chunk.end_position().unwrap());
            let window: String = chars[s..e].iter().collect();
            assert_eq!(non_whitespace(&window), non_whitespace(chunk.content()));
            covered[s..e].iter_mut().for_each(|c| *c = true);
        }
        assert!(chars
            .iter()
            .zip(&covered)
            .all(|(ch, seen)| ch.is_whitespace() || *seen));
    }

    #[test]
    fn test_overlap_larger_than_chunk_terminates() {
        let text = "word ".repeat(400);
        let chunker = TextChunker::new(10, 50);
        let chunks = chunker.chunk(&text, "s1");

        // Forced progress: each window starts where the previous ended
        for pair in chunks.windows(2) {
            assert_eq!(
                pair[1].start_position().unwrap(),
                pair[0].end_position().unwrap()
            );
        }
        assert!(chunks.len() <= text.len() / 4);
    }

    #[test]
    fn test_zero_chunk_size_terminates() {
        let chunks = TextChunker::new(0, 0).chunk("abc", "s1");
        let contents: Vec<&str> = chunks.iter().map(|c| c.content()).collect();
        assert_eq!(contents, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_chunk_indexes_skip_blank_windows() {
        // The middle window is pure whitespace and must not consume an index
        let text = "aaaa\n\n\n\nbbbb";
        let chunks = TextChunker::new(4, 0).chunk(text, "s1");

        let indexes: Vec<usize> = chunks.iter().map(|c| c.chunk_index()).collect();
        assert_eq!(indexes, vec![0, 1]);
        assert_eq!(chunks[1].content(), "bbbb");
    }

    #[test]
    fn test_multibyte_text_uses_char_offsets() {
        let text = "Ærlig talt. Øl er godt. Å være her er fint.";
        let chunks = TextChunker::new(15, 0).chunk(text, "no");

        assert_eq!(chunks[0].content(), "Ærlig talt.");
        assert_eq!(chunks.last().unwrap().end_position(), Some(text.chars().count()));
    }

    #[test]
    fn test_chunk_multiple_restarts_indexes() {
        let sources = vec![
            TranscriptSource::new("vidA", "One. Two. Three. Four.", "Video A", "00:01:00"),
            TranscriptSource::new("empty", "   ", "Nothing", "00:00:00"),
            TranscriptSource::new("vidB", "Five. Six. Seven. Eight.", "Video B", "00:02:00"),
        ];
        let chunks = TextChunker::new(10, 0).chunk_multiple(&sources);

        let first_b = chunks.iter().position(|c| c.source_id() == "vidB").unwrap();
        assert!(chunks[..first_b].iter().all(|c| c.source_id() == "vidA"));
        assert_eq!(chunks[0].chunk_index(), 0);
        assert_eq!(chunks[first_b].chunk_index(), 0);
        assert!(chunks.iter().all(|c| c.source_id() != "empty"));

        let meta = chunks[first_b].metadata();
        assert_eq!(meta.get("title").map(String::as_str), Some("Video B"));
        assert_eq!(meta.get("duration").map(String::as_str), Some("00:02:00"));
        assert_eq!(
            meta.get("url").map(String::as_str),
            Some("https://www.youtube.com/watch?v=vidB")
        );
    }
}
