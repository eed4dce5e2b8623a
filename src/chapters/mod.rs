/// Creator chapter extraction
///
/// YouTube creators list chapters in the video description as lines of
/// `timestamp title`. This module turns that free text into validated,
/// gapless chapter boundaries that the prompt builder can hand to the model
/// as a fixed structure.

pub mod extractor;
pub mod parser;

pub use extractor::{extract_chapters, MIN_CHAPTERS, PROXIMITY_TOLERANCE_SECONDS};
pub use parser::{parse_description, RawChapter};

use serde::{Deserialize, Serialize};

/// A creator-defined chapter with computed end time
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    /// Chapter title as written in the description
    pub title: String,
    /// Start offset in seconds
    pub start_seconds: u32,
    /// End offset in seconds (next chapter's start, or video duration)
    pub end_seconds: u32,
    /// Start as `M:SS`
    pub timestamp_start: String,
    /// End as `M:SS`
    pub timestamp_end: String,
}
