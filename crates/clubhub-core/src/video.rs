//! YouTube video identifier extraction for reel and podcast fields.

use std::sync::LazyLock;

use regex::Regex;

use crate::constants::YOUTUBE_ID_LENGTH;

static YOUTUBE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:https?://)?(?:www\.|m\.)?(?:youtube\.com/(?:watch\?(?:.*&)?v=|shorts/|embed/|live/)|youtu\.be/)([A-Za-z0-9_-]{11})(?:[?&#/].*)?$",
    )
    .expect("YouTube URL pattern is valid")
});

static BARE_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{11}$").expect("YouTube id pattern is valid"));

/// Extract the 11-character video id from a YouTube URL.
///
/// Accepts `watch?v=`, `youtu.be/`, `/shorts/`, `/embed/` and `/live/` shapes as well
/// as a bare id. Returns `None` for anything else.
pub fn extract_youtube_id(input: &str) -> Option<String> {
    let input = input.trim();
    if input.len() == YOUTUBE_ID_LENGTH && BARE_ID.is_match(input) {
        return Some(input.to_string());
    }

    YOUTUBE_URL
        .captures(input)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Canonical watch URL for a video id.
pub fn youtube_watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", video_id)
}
