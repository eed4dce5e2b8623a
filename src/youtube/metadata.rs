/// YouTube Data API v3 metadata fetcher
use super::VideoMetadata;
use anyhow::{anyhow, Result};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

const API_BASE: &str = "https://www.googleapis.com/youtube/v3";

#[derive(Debug, Deserialize)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoItem {
    snippet: Option<Snippet>,
    content_details: Option<ContentDetails>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snippet {
    title: Option<String>,
    channel_title: Option<String>,
    channel_id: Option<String>,
    published_at: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ContentDetails {
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CommentThreadListResponse {
    #[serde(default)]
    items: Vec<CommentThread>,
}

#[derive(Debug, Deserialize)]
struct CommentThread {
    snippet: Option<CommentThreadSnippet>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentThreadSnippet {
    top_level_comment: Option<Comment>,
}

#[derive(Debug, Deserialize)]
struct Comment {
    snippet: Option<CommentSnippet>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentSnippet {
    text_original: Option<String>,
}

/// YouTube Data API client; the key is passed in, never read from globals
#[derive(Clone)]
pub struct YouTubeClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl YouTubeClient {
    pub fn new(api_key: String, timeout_seconds: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            api_key,
            base_url: API_BASE.to_string(),
        })
    }

    async fn fetch_pinned_comment(&self, video_id: &str) -> Result<Option<String>> {
        let response = self
            .client
            .get(format!("{}/commentThreads", self.base_url))
            .query(&[
                ("videoId", video_id),
                ("part", "snippet"),
                ("maxResults", "20"),
                ("order", "relevance"),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let threads: CommentThreadListResponse = response.json().await?;
        Ok(first_comment_text(threads))
    }
}

fn first_comment_text(threads: CommentThreadListResponse) -> Option<String> {
    threads.items.into_iter().find_map(|thread| {
        thread
            .snippet?
            .top_level_comment?
            .snippet?
            .text_original
            .filter(|text| !text.is_empty())
    })
}

fn metadata_from_response(video_id: &str, response: VideoListResponse) -> Result<VideoMetadata> {
    let video = response
        .items
        .into_iter()
        .next()
        .ok_or_else(|| anyhow!("Video not found or unavailable (may be private or deleted)"))?;

    let (Some(snippet), Some(details)) = (video.snippet, video.content_details) else {
        return Err(anyhow!("Incomplete video data received from YouTube API"));
    };

    Ok(VideoMetadata {
        video_id: video_id.to_string(),
        title: snippet.title.unwrap_or_else(|| "Untitled".to_string()),
        channel_title: snippet
            .channel_title
            .unwrap_or_else(|| "Unknown Channel".to_string()),
        channel_id: snippet.channel_id.unwrap_or_default(),
        duration: details.duration.unwrap_or_else(|| "PT0S".to_string()),
        published_at: snippet
            .published_at
            .unwrap_or_else(|| chrono::Utc::now().to_rfc3339()),
        description: snippet.description.unwrap_or_default(),
        pinned_comment: None,
    })
}

fn describe_status(status: StatusCode, body: &str) -> anyhow::Error {
    match status {
        StatusCode::BAD_REQUEST => anyhow!("Invalid video ID format"),
        StatusCode::FORBIDDEN if body.contains("quota") => anyhow!(
            "YouTube API quota exceeded. Try again tomorrow or use a different API key."
        ),
        StatusCode::FORBIDDEN => anyhow!(
            "Invalid YouTube API key or insufficient permissions. Get a key at: https://console.cloud.google.com/"
        ),
        StatusCode::NOT_FOUND => anyhow!("Video not found"),
        other => anyhow!("Failed to fetch video metadata: HTTP {}: {}", other, body),
    }
}

/// Fetch title, channel, duration, description and pinned comment for a video
pub async fn fetch_video_metadata(youtube: &YouTubeClient, video_id: &str) -> Result<VideoMetadata> {
    debug!("Fetching metadata for video {}", video_id);

    let response = youtube
        .client
        .get(format!("{}/videos", youtube.base_url))
        .query(&[
            ("id", video_id),
            ("part", "snippet,contentDetails"),
            ("key", youtube.api_key.as_str()),
        ])
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(describe_status(status, &body));
    }

    let mut metadata = metadata_from_response(video_id, response.json().await?)?;

    // Comments may be disabled; metadata is still usable without them.
    metadata.pinned_comment = youtube.fetch_pinned_comment(video_id).await.unwrap_or_else(|e| {
        debug!("Pinned comment unavailable for {}: {}", video_id, e);
        None
    });

    info!("📺 Fetched metadata: \"{}\" ({})", metadata.title, metadata.channel_title);
    Ok(metadata)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_defaults() {
        let response: VideoListResponse = serde_json::from_str(
            r#"{"items":[{"snippet":{"channelId":"UC1","publishedAt":"2024-01-01T00:00:00Z"},"contentDetails":{}}]}"#,
        )
        .unwrap();
        let metadata = metadata_from_response("abc", response).unwrap();
        assert_eq!(metadata.title, "Untitled");
        assert_eq!(metadata.channel_title, "Unknown Channel");
        assert_eq!(metadata.duration, "PT0S");
        assert_eq!(metadata.channel_id, "UC1");
        assert_eq!(metadata.description, "");
    }

    #[test]
    fn test_metadata_missing_video() {
        let response: VideoListResponse = serde_json::from_str(r#"{"items":[]}"#).unwrap();
        let err = metadata_from_response("abc", response).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_first_comment_text() {
        let threads: CommentThreadListResponse = serde_json::from_str(
            r#"{"items":[{"snippet":{}},{"snippet":{"topLevelComment":{"snippet":{"textOriginal":"Links: https://x.com"}}}}]}"#,
        )
        .unwrap();
        assert_eq!(first_comment_text(threads).as_deref(), Some("Links: https://x.com"));
    }

    #[test]
    fn test_status_messages() {
        assert!(describe_status(StatusCode::FORBIDDEN, "quotaExceeded")
            .to_string()
            .contains("quota"));
        assert!(describe_status(StatusCode::FORBIDDEN, "forbidden")
            .to_string()
            .contains("Invalid YouTube API key"));
        assert_eq!(describe_status(StatusCode::NOT_FOUND, "").to_string(), "Video not found");
    }
}
