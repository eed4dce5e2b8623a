/// YouTube-facing collaborators: URL handling, metadata and transcript fetch
///
/// These are thin I/O wrappers; the digest core only sees the plain data types
/// defined here.

pub mod metadata;
pub mod transcript;
pub mod urls;

pub use metadata::{fetch_video_metadata, YouTubeClient};
pub use transcript::{fetch_transcript, TranscriptClient};
pub use urls::{combine_urls, extract_urls, extract_video_id};

use crate::timestamp::format_timestamp;
use serde::{Deserialize, Serialize};

/// Video metadata as returned by the YouTube Data API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VideoMetadata {
    pub video_id: String,
    pub title: String,
    pub channel_title: String,
    pub channel_id: String,
    /// ISO-8601 duration, e.g. `PT1H2M30S`
    pub duration: String,
    pub published_at: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pinned_comment: Option<String>,
}

/// One caption line; entries arrive in chronological order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TranscriptEntry {
    pub text: String,
    /// Offset from video start in seconds
    pub offset: f64,
    /// Duration in seconds
    pub duration: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
}

/// Render transcript entries as `[M:SS] text` lines for the prompt
pub fn format_transcript(entries: &[TranscriptEntry]) -> String {
    entries
        .iter()
        .map(|entry| {
            let seconds = entry.offset.max(0.0).floor() as u32;
            format!("[{}] {}", format_timestamp(seconds), entry.text.trim())
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_transcript() {
        let entries = vec![
            TranscriptEntry {
                text: " hello ".into(),
                offset: 0.4,
                duration: 2.0,
                lang: None,
            },
            TranscriptEntry {
                text: "world".into(),
                offset: 65.9,
                duration: 1.5,
                lang: Some("en".into()),
            },
        ];
        assert_eq!(format_transcript(&entries), "[0:00] hello\n[1:05] world");
    }
}
