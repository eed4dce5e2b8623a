/// Transcript fetcher backed by the Supadata transcript API
use super::TranscriptEntry;
use anyhow::{anyhow, Result};
use reqwest::Client;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tracing::{info, warn};

const DEFAULT_ENDPOINT: &str = "https://api.supadata.ai/v1/youtube/transcript";

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TranscriptResponse {
    Job {
        #[serde(rename = "jobId")]
        job_id: String,
    },
    Transcript {
        content: TranscriptContent,
        #[serde(default)]
        lang: Option<String>,
    },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TranscriptContent {
    Segments(Vec<Segment>),
    Text(String),
}

#[derive(Debug, Deserialize)]
struct Segment {
    text: String,
    /// Milliseconds
    offset: f64,
    /// Milliseconds
    duration: f64,
}

/// Transcript API client
#[derive(Clone)]
pub struct TranscriptClient {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl TranscriptClient {
    pub fn new(api_key: String, endpoint: Option<String>, timeout_seconds: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            api_key,
            endpoint: endpoint.unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
        })
    }
}

fn entries_from_response(response: TranscriptResponse) -> Result<Vec<TranscriptEntry>> {
    match response {
        TranscriptResponse::Job { job_id } => Err(anyhow!(
            "Transcript generation queued as job {} - not supported yet",
            job_id
        )),
        TranscriptResponse::Transcript {
            content: TranscriptContent::Text(_),
            ..
        } => Err(anyhow!(
            "Transcript returned without timestamps - cannot process"
        )),
        TranscriptResponse::Transcript {
            content: TranscriptContent::Segments(segments),
            lang,
        } => Ok(segments
            .into_iter()
            .map(|s| TranscriptEntry {
                text: s.text,
                offset: s.offset / 1000.0,
                duration: s.duration / 1000.0,
                lang: lang.clone(),
            })
            .collect()),
    }
}

fn describe_failure(body: &str) -> anyhow::Error {
    let lower = body.to_lowercase();
    if lower.contains("disabled") || lower.contains("not available") {
        anyhow!("No captions/transcript available for this video. Try a video with auto-generated or manual captions.")
    } else if lower.contains("unavailable") {
        anyhow!("Video is unavailable or has been removed")
    } else if lower.contains("invalid") {
        anyhow!("Invalid video ID")
    } else {
        anyhow!("Failed to fetch transcript: {}", body)
    }
}

/// Fetch the timestamped transcript of a video
pub async fn fetch_transcript(transcripts: &TranscriptClient, video_id: &str) -> Result<Vec<TranscriptEntry>> {
    let started = Instant::now();
    info!("📜 Fetching transcript for {}", video_id);

    let response = transcripts
        .client
        .get(&transcripts.endpoint)
        .header("x-api-key", &transcripts.api_key)
        .query(&[("videoId", video_id)])
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        warn!(
            "Transcript fetch failed in {}ms: {} {}",
            started.elapsed().as_millis(),
            status,
            body
        );
        return Err(describe_failure(&body));
    }

    let entries = entries_from_response(response.json().await?)?;
    info!(
        "✅ Transcript fetched in {}ms, {} entries",
        started.elapsed().as_millis(),
        entries.len()
    );
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segments_converted_to_seconds() {
        let response: TranscriptResponse = serde_json::from_str(
            r#"{"content":[{"text":"hi","offset":1500,"duration":2000,"lang":"en"}],"lang":"en","availableLangs":["en"]}"#,
        )
        .unwrap();
        let entries = entries_from_response(response).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].offset, 1.5);
        assert_eq!(entries[0].duration, 2.0);
        assert_eq!(entries[0].lang.as_deref(), Some("en"));
    }

    #[test]
    fn test_plain_text_rejected() {
        let response: TranscriptResponse =
            serde_json::from_str(r#"{"content":"just text","lang":"en"}"#).unwrap();
        assert!(entries_from_response(response).is_err());
    }

    #[test]
    fn test_job_rejected() {
        let response: TranscriptResponse = serde_json::from_str(r#"{"jobId":"123"}"#).unwrap();
        let err = entries_from_response(response).unwrap_err();
        assert!(err.to_string().contains("queued"));
    }

    #[test]
    fn test_failure_messages() {
        assert!(describe_failure("Transcripts are disabled")
            .to_string()
            .starts_with("No captions"));
        assert_eq!(
            describe_failure("video unavailable").to_string(),
            "Video is unavailable or has been removed"
        );
    }
}
