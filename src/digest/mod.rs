/// Structured digest model and the passes that clean up model output
///
/// The types here mirror the JSON the model is asked to produce and the form
/// that is stored and rendered, so they serialize with camelCase keys.

pub mod interleave;
pub mod legacy;
pub mod reconcile;

pub use interleave::{interleave_digest, interleave_section, ContentItem};
pub use legacy::{upgrade_tangents, LegacyDigest};
pub use reconcile::{
    merge_tangent_only_sections, reconcile, remove_duplicate_sections, sort_chronologically,
    ChapterOrigin,
};

use crate::error::Result;
use crate::timestamp::parse_timestamp;
use serde::{Deserialize, Serialize};

/// One synthesized insight tied to a moment in the video
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct KeyPoint {
    pub text: String,
    /// Approximate moment the point is discussed, `M:SS`
    pub timestamp: String,
    /// Marks a point inside a 30+ second digression from the chapter topic
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_tangent: Option<bool>,
}

impl KeyPoint {
    pub fn new(text: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            timestamp: timestamp.into(),
            is_tangent: None,
        }
    }

    pub fn tangent(text: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            is_tangent: Some(true),
            ..Self::new(text, timestamp)
        }
    }

    pub fn is_tangent(&self) -> bool {
        self.is_tangent == Some(true)
    }

    pub fn seconds(&self) -> Result<u32> {
        parse_timestamp(&self.timestamp)
    }
}

/// Key points of a section in either schema generation.
///
/// Digests written before timestamps were introduced store plain strings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum KeyPoints {
    Timestamped(Vec<KeyPoint>),
    Legacy(Vec<String>),
}

impl KeyPoints {
    pub fn len(&self) -> usize {
        match self {
            KeyPoints::Timestamped(points) => points.len(),
            KeyPoints::Legacy(points) => points.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when every point is flagged as a tangent.
    ///
    /// Empty lists and legacy strings count as substantive content.
    pub fn is_tangent_only(&self) -> bool {
        match self {
            KeyPoints::Timestamped(points) => {
                !points.is_empty() && points.iter().all(KeyPoint::is_tangent)
            }
            KeyPoints::Legacy(_) => false,
        }
    }
}

impl Default for KeyPoints {
    fn default() -> Self {
        KeyPoints::Timestamped(Vec::new())
    }
}

/// A chapter of the final digest
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ContentSection {
    pub title: String,
    pub timestamp_start: String,
    pub timestamp_end: String,
    #[serde(default)]
    pub key_points: KeyPoints,
}

impl ContentSection {
    /// Lowercased, trimmed title used for duplicate detection
    pub fn normalized_title(&self) -> String {
        self.title.trim().to_lowercase()
    }

    pub fn start_seconds(&self) -> Result<u32> {
        parse_timestamp(&self.timestamp_start)
    }
}

/// Span-level digression from an older digest schema
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Tangent {
    pub title: String,
    pub timestamp_start: String,
    pub timestamp_end: String,
    pub summary: String,
}

impl Tangent {
    pub fn start_seconds(&self) -> Result<u32> {
        parse_timestamp(&self.timestamp_start)
    }
}

/// A link found in the description or pinned comment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Link {
    pub url: String,
    pub title: String,
    pub description: String,
}

/// The reconciled digest handed to storage and rendering
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StructuredDigest {
    /// "At a glance" overview
    pub summary: String,
    pub sections: Vec<ContentSection>,
    #[serde(default)]
    pub related_links: Vec<Link>,
    #[serde(default)]
    pub other_links: Vec<Link>,
}

impl StructuredDigest {
    /// Drop links with an empty url
    pub fn retain_valid_links(&mut self) {
        self.related_links.retain(|l| !l.url.trim().is_empty());
        self.other_links.retain(|l| !l.url.trim().is_empty());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_points_deserialize_both_generations() {
        let timestamped: KeyPoints =
            serde_json::from_str(r#"[{"text":"a","timestamp":"1:00","isTangent":true}]"#).unwrap();
        assert!(matches!(timestamped, KeyPoints::Timestamped(ref p) if p[0].is_tangent()));

        let legacy: KeyPoints = serde_json::from_str(r#"["a","b"]"#).unwrap();
        assert_eq!(legacy, KeyPoints::Legacy(vec!["a".into(), "b".into()]));

        let empty: KeyPoints = serde_json::from_str("[]").unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_tangent_only_detection() {
        let all = KeyPoints::Timestamped(vec![KeyPoint::tangent("x", "1:00")]);
        assert!(all.is_tangent_only());

        let mixed = KeyPoints::Timestamped(vec![
            KeyPoint::tangent("x", "1:00"),
            KeyPoint::new("y", "1:30"),
        ]);
        assert!(!mixed.is_tangent_only());

        assert!(!KeyPoints::Timestamped(vec![]).is_tangent_only());
        assert!(!KeyPoints::Legacy(vec!["x".into()]).is_tangent_only());
    }

    #[test]
    fn test_digest_serializes_camel_case() {
        let digest = StructuredDigest {
            summary: "s".into(),
            sections: vec![ContentSection {
                title: "Intro".into(),
                timestamp_start: "0:00".into(),
                timestamp_end: "1:00".into(),
                key_points: KeyPoints::Timestamped(vec![KeyPoint::new("p", "0:10")]),
            }],
            related_links: vec![],
            other_links: vec![],
        };
        let json = serde_json::to_value(&digest).unwrap();
        assert_eq!(json["sections"][0]["timestampStart"], "0:00");
        assert_eq!(json["sections"][0]["keyPoints"][0]["timestamp"], "0:10");
        assert!(json["sections"][0]["keyPoints"][0].get("isTangent").is_none());
        assert!(json.get("relatedLinks").is_some());
    }
}
