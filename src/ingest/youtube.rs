//! YouTube identifiers and links.

use regex::Regex;
use std::sync::LazyLock;
use url::Url;

const WATCH_URL: &str = "https://www.youtube.com/watch";

// Matches various YouTube URL formats and bare video IDs
static VIDEO_ID_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)
        (?:
            # Full YouTube URLs
            (?:https?://)?
            (?:www\.|m\.)?
            (?:youtube\.com/watch\?(?:.*&)?v=|youtu\.be/|youtube\.com/embed/|youtube\.com/v/)
            ([a-zA-Z0-9_-]{11})
        )
        |
        # Bare video ID (11 characters)
        ^([a-zA-Z0-9_-]{11})$
    ",
    )
    .expect("Invalid regex")
});

/// Extract a video ID from a YouTube URL or bare ID.
pub fn extract_video_id(input: &str) -> Option<String> {
    let caps = VIDEO_ID_REGEX.captures(input.trim())?;

    caps.get(1)
        .or_else(|| caps.get(2))
        .map(|m| m.as_str().to_string())
}

/// Canonical watch URL for a source ID.
pub fn reference_url(source_id: &str) -> String {
    Url::parse_with_params(WATCH_URL, &[("v", source_id)])
        .map(String::from)
        .unwrap_or_else(|_| format!("{}?v={}", WATCH_URL, source_id))
}
