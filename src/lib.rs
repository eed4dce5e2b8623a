/// YouTube Digest - Rust Implementation
///
/// Turns a YouTube video's transcript and metadata into a structured digest:
/// a short summary, chronological chapters with timestamped key points and
/// categorized links. Creator chapters from the description are honored as a
/// fixed structure; model output is reconciled before it is stored.

pub mod chapters;
pub mod config;
pub mod digest;
pub mod error;
pub mod formatter;
pub mod llm;
pub mod prompts;
pub mod summarize;
pub mod timestamp;
pub mod youtube;

// Re-export main types for easy access
pub use crate::config::{Config, ConfigBuilder};
pub use crate::error::{DigestError, Result};
pub use crate::chapters::{extract_chapters, Chapter};
pub use crate::digest::{
    interleave_digest, interleave_section, reconcile, upgrade_tangents, ChapterOrigin,
    ContentItem, ContentSection, KeyPoint, KeyPoints, LegacyDigest, Link, StructuredDigest,
    Tangent,
};
pub use crate::formatter::{create_slug, format_markdown, save_digest};
pub use crate::llm::{create_llm, LLMConfig, LLMProvider, LLM};
pub use crate::prompts::{build_generation_request, ChapterGuidance, GenerationRequest};
pub use crate::summarize::{DigestOutcome, Digester};
pub use crate::timestamp::{format_timestamp, parse_iso_duration, parse_timestamp, TimeRange};
pub use crate::youtube::{TranscriptEntry, VideoMetadata};
