/// Upgrade of digests that carry span-level tangents
///
/// Older digests kept tangents in a separate `tangents` array. The current form
/// flags tangent key points inline, so those digests are converted once when
/// loaded.
use super::interleave::{section_window, select_tangents};
use super::{ContentSection, KeyPoint, KeyPoints, Link, StructuredDigest, Tangent};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, warn};

/// A stored digest that may still carry a `tangents` array
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyDigest {
    #[serde(default)]
    pub summary: String,
    pub sections: Vec<ContentSection>,
    #[serde(default)]
    pub related_links: Vec<Link>,
    #[serde(default)]
    pub other_links: Vec<Link>,
    #[serde(default)]
    pub tangents: Vec<Tangent>,
}

impl LegacyDigest {
    pub fn into_digest(self) -> Result<StructuredDigest> {
        let digest = StructuredDigest {
            summary: self.summary,
            sections: self.sections,
            related_links: self.related_links,
            other_links: self.other_links,
        };
        upgrade_tangents(digest, &self.tangents)
    }
}

fn tangent_text(tangent: &Tangent) -> String {
    format!("{}: {}", tangent.title, tangent.summary)
}

/// Fold span-level tangents into their sections as flagged key points.
///
/// Sections are put in start order first, then each tangent lands in the
/// section whose window contains its start. Legacy string sections receive
/// the rendered text appended after their own points. Tangents outside every
/// window are dropped.
pub fn upgrade_tangents(mut digest: StructuredDigest, tangents: &[Tangent]) -> Result<StructuredDigest> {
    if tangents.is_empty() {
        return Ok(digest);
    }

    let mut keyed = digest
        .sections
        .drain(..)
        .map(|section| -> Result<(u32, ContentSection)> { Ok((section.start_seconds()?, section)) })
        .collect::<Result<Vec<_>>>()?;
    keyed.sort_by_key(|(start, _)| *start);
    digest.sections = keyed.into_iter().map(|(_, section)| section).collect();

    let mut windows = Vec::with_capacity(digest.sections.len());
    for (i, section) in digest.sections.iter().enumerate() {
        let next_start = digest.sections.get(i + 1).map(|s| s.timestamp_start.as_str());
        windows.push(section_window(section, next_start)?);
    }

    let mut placed: HashSet<usize> = HashSet::new();
    for (section, window) in digest.sections.iter_mut().zip(windows) {
        let selected = select_tangents(window, tangents)?;
        if selected.is_empty() {
            continue;
        }
        debug!(
            "Placing {} tangents into section '{}'",
            selected.len(),
            section.title
        );

        for tangent in &selected {
            if let Some(idx) = tangents.iter().position(|t| std::ptr::eq(t, *tangent)) {
                placed.insert(idx);
            }
        }

        match &mut section.key_points {
            KeyPoints::Timestamped(points) => points.extend(
                selected
                    .into_iter()
                    .map(|t| KeyPoint::tangent(tangent_text(t), t.timestamp_start.clone())),
            ),
            KeyPoints::Legacy(points) => points.extend(selected.into_iter().map(tangent_text)),
        }
    }

    let dropped = tangents.len() - placed.len();
    if dropped > 0 {
        warn!("Dropped {} tangents that fall outside every section", dropped);
    }

    Ok(digest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upgrade_flags_tangents_inline() {
        let json = r#"{
            "summary": "s",
            "sections": [
                {"title": "A", "timestampStart": "0:00", "timestampEnd": "3:00",
                 "keyPoints": [{"text": "a", "timestamp": "0:30"}]},
                {"title": "B", "timestampStart": "3:00", "timestampEnd": "6:00",
                 "keyPoints": ["legacy b"]}
            ],
            "relatedLinks": [],
            "otherLinks": [],
            "tangents": [
                {"title": "Story", "timestampStart": "1:00", "timestampEnd": "1:40", "summary": "a story"},
                {"title": "Ad", "timestampStart": "4:00", "timestampEnd": "4:30", "summary": "sponsor"},
                {"title": "Outro", "timestampStart": "9:00", "timestampEnd": "9:30", "summary": "late"}
            ]
        }"#;
        let legacy: LegacyDigest = serde_json::from_str(json).unwrap();
        let digest = legacy.into_digest().unwrap();

        match &digest.sections[0].key_points {
            KeyPoints::Timestamped(points) => {
                assert_eq!(points.len(), 2);
                assert!(points[1].is_tangent());
                assert_eq!(points[1].text, "Story: a story");
                assert_eq!(points[1].timestamp, "1:00");
            }
            other => panic!("unexpected key points {:?}", other),
        }
        assert_eq!(
            digest.sections[1].key_points,
            KeyPoints::Legacy(vec!["legacy b".into(), "Ad: sponsor".into()])
        );
    }

    #[test]
    fn test_upgrade_places_tangents_in_unsorted_sections() {
        let json = r#"{
            "summary": "s",
            "sections": [
                {"title": "Two", "timestampStart": "5:00", "timestampEnd": "8:00",
                 "keyPoints": [{"text": "b", "timestamp": "5:30"}]},
                {"title": "One", "timestampStart": "0:00", "timestampEnd": "5:00",
                 "keyPoints": [{"text": "a", "timestamp": "0:30"}]}
            ],
            "tangents": [
                {"title": "Detour", "timestampStart": "6:00", "timestampEnd": "6:30", "summary": "off topic"}
            ]
        }"#;
        let legacy: LegacyDigest = serde_json::from_str(json).unwrap();
        let digest = legacy.into_digest().unwrap();

        let total: usize = digest.sections.iter().map(|s| s.key_points.len()).sum();
        assert_eq!(total, 3);
        assert_eq!(digest.sections[0].title, "One");
        assert_eq!(digest.sections[1].title, "Two");
        match &digest.sections[1].key_points {
            KeyPoints::Timestamped(points) => {
                assert_eq!(points[1].text, "Detour: off topic");
                assert!(points[1].is_tangent());
            }
            other => panic!("unexpected key points {:?}", other),
        }
    }

    #[test]
    fn test_no_tangents_is_noop() {
        let digest = StructuredDigest {
            summary: "s".into(),
            ..Default::default()
        };
        assert_eq!(upgrade_tangents(digest.clone(), &[]).unwrap(), digest);
    }
}
