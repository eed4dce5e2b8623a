/// Prompt construction for digest generation
///
/// The sizing heuristic keeps the model from producing too few chapters on
/// short videos and too many on long ones. With creator chapters the
/// structure is fixed and the model only fills in key points.
use crate::chapters::Chapter;
use crate::youtube::{combine_urls, format_transcript, TranscriptEntry, VideoMetadata};
use serde_json::{json, Value};
use std::ops::RangeInclusive;

/// Key points requested per creator chapter, regardless of duration
pub const CREATOR_CHAPTER_KEY_POINTS: RangeInclusive<u32> = 2..=4;

/// Target chapter count and key points per chapter for model-inferred chapters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterGuidance {
    pub min_chapters: u32,
    pub max_chapters: u32,
    pub key_points_per_chapter: RangeInclusive<u32>,
}

impl ChapterGuidance {
    /// Guidance for a video of the given length in minutes
    pub fn for_duration(minutes: f64) -> Self {
        let (min_chapters, max_chapters, key_points_per_chapter) = if minutes <= 15.0 {
            (3, 5, 2..=3)
        } else if minutes <= 30.0 {
            (4, 6, 2..=4)
        } else if minutes <= 60.0 {
            (5, 8, 2..=4)
        } else if minutes <= 120.0 {
            (8, 12, 3..=5)
        } else {
            let target = (minutes / 12.0).round();
            let min = ((target * 0.8).round() as u32).max(10);
            let max = ((target * 1.2).round() as u32).min(25);
            (min, max, 3..=5)
        };

        Self {
            min_chapters,
            max_chapters,
            key_points_per_chapter,
        }
    }

    fn describe(&self) -> String {
        format!(
            "Organize the video into {}-{} chapters with {}-{} key points each.",
            self.min_chapters,
            self.max_chapters,
            self.key_points_per_chapter.start(),
            self.key_points_per_chapter.end()
        )
    }
}

/// Everything the model call needs
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub system_prompt: String,
    pub user_prompt: String,
    pub output_schema: Value,
}

/// Fixed system prompt
pub const SYSTEM_PROMPT: &str = r#"You are a content summarizer specializing in video transcripts. Your task is to create a structured summary with a short overview, chronological chapters and categorized links.

## Summary
Write a brief 2-3 sentence summary that captures the essence of the video.

## Chapters
Organize the video into broad topic chapters - major shifts, not every small topic change.

**All video time must be accounted for.** Chapter timestamps are continuous with no gaps: each chapter's end matches the next chapter's start.

For each chapter:
- A descriptive heading that captures the topic
- Start and end timestamps (M:SS)
- Key points that synthesize the takeaways, each with the approximate timestamp (M:SS) where it is discussed

Each key point should consolidate related statements into one meaningful insight. Skip filler content.

## Tangents
If the speaker goes off-topic for 30 seconds or more (personal stories, rants, extended sponsor reads), add a key point for it in the chapter where it happens and set "isTangent": true. Only flag genuinely off-topic content.

## Links
You will be given URLs found in the description and pinned comment. Categorize them:

**relatedLinks** - documentation, tools, repositories, referenced videos or resources discussed in the video.
**otherLinks** - social profiles, sponsors, affiliate links, gear lists, memberships and donations.

For each link give a short title (2-5 words) and a description of what it is and, for related links, why it is relevant.

Output ONLY a JSON object matching the provided schema, no markdown and no explanation."#;

/// JSON schema of the model output
pub fn digest_output_schema() -> Value {
    let link = json!({
        "type": "object",
        "properties": {
            "url": { "type": "string" },
            "title": { "type": "string", "description": "Short title, 2-5 words" },
            "description": { "type": "string" }
        },
        "required": ["url", "title", "description"]
    });

    json!({
        "type": "object",
        "properties": {
            "summary": { "type": "string", "description": "2-3 sentence overview" },
            "sections": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "title": { "type": "string" },
                        "timestampStart": { "type": "string", "description": "M:SS" },
                        "timestampEnd": { "type": "string", "description": "M:SS" },
                        "keyPoints": {
                            "type": "array",
                            "items": {
                                "type": "object",
                                "properties": {
                                    "text": { "type": "string" },
                                    "timestamp": { "type": "string", "description": "M:SS" },
                                    "isTangent": { "type": "boolean" }
                                },
                                "required": ["text", "timestamp"]
                            }
                        }
                    },
                    "required": ["title", "timestampStart", "timestampEnd", "keyPoints"]
                }
            },
            "relatedLinks": { "type": "array", "items": link.clone() },
            "otherLinks": { "type": "array", "items": link }
        },
        "required": ["summary", "sections", "relatedLinks", "otherLinks"]
    })
}

fn urls_block(urls: &[String]) -> String {
    if urls.is_empty() {
        String::new()
    } else {
        format!("URLs found in description/comments:\n{}", urls.join("\n"))
    }
}

/// User prompt for model-inferred chapters
pub fn build_user_prompt(
    title: &str,
    channel_title: &str,
    formatted_transcript: &str,
    urls: &[String],
    guidance: &ChapterGuidance,
) -> String {
    format!(
        "Video Title: {title}\nChannel: {channel}\n\nTranscript:\n{transcript}\n\n{urls}\n\n{guidance}\n\nPlease create a structured summary with chapters and categorized links.",
        title = title,
        channel = channel_title,
        transcript = formatted_transcript,
        urls = urls_block(urls),
        guidance = guidance.describe(),
    )
}

/// User prompt when the creator's chapters are authoritative
pub fn build_chapter_user_prompt(
    title: &str,
    channel_title: &str,
    formatted_transcript: &str,
    urls: &[String],
    chapters: &[Chapter],
) -> String {
    let chapter_list = chapters
        .iter()
        .map(|c| format!("- {} - {}: {}", c.timestamp_start, c.timestamp_end, c.title))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Video Title: {title}\nChannel: {channel}\n\nThe creator defined these chapters. Use them exactly as given: same titles, same timestamps, same order. Do not add, merge or split chapters.\n{chapters}\n\nFor each chapter write {min}-{max} key points.\n\nTranscript:\n{transcript}\n\n{urls}\n\nPlease create a structured summary using the creator's chapters and categorized links.",
        title = title,
        channel = channel_title,
        chapters = chapter_list,
        min = CREATOR_CHAPTER_KEY_POINTS.start(),
        max = CREATOR_CHAPTER_KEY_POINTS.end(),
        transcript = formatted_transcript,
        urls = urls_block(urls),
    )
}

/// Assemble the model input for a video
pub fn build_generation_request(
    metadata: &VideoMetadata,
    transcript: &[TranscriptEntry],
    chapters: Option<&[Chapter]>,
    duration_seconds: u32,
) -> GenerationRequest {
    let formatted = format_transcript(transcript);
    let urls = combine_urls(&[Some(metadata.description.as_str()), metadata.pinned_comment.as_deref()]);

    let user_prompt = match chapters {
        Some(chapters) => build_chapter_user_prompt(
            &metadata.title,
            &metadata.channel_title,
            &formatted,
            &urls,
            chapters,
        ),
        None => {
            let guidance = ChapterGuidance::for_duration(f64::from(duration_seconds) / 60.0);
            build_user_prompt(
                &metadata.title,
                &metadata.channel_title,
                &formatted,
                &urls,
                &guidance,
            )
        }
    };

    GenerationRequest {
        system_prompt: SYSTEM_PROMPT.to_string(),
        user_prompt,
        output_schema: digest_output_schema(),
    }
}
