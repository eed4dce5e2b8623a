/// Cleanup pipeline applied to raw model output.
///
/// Passes run in a fixed order: duplicate removal, tangent-only merge
/// (model-inferred chapters only), chronological sort. Running the pipeline
/// on its own output changes nothing.
use super::{ContentSection, KeyPoint, KeyPoints, StructuredDigest};
use crate::error::Result;
use crate::timestamp::parse_timestamp;
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Where the chapter structure of a digest came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChapterOrigin {
    /// Boundaries taken from the video description; authoritative
    Creator,
    /// Boundaries chosen by the model; best-effort
    Inferred,
}

impl ChapterOrigin {
    pub fn from_creator_chapters(has_creator_chapters: bool) -> Self {
        if has_creator_chapters {
            ChapterOrigin::Creator
        } else {
            ChapterOrigin::Inferred
        }
    }
}

/// Keep the first section per normalized title, dropping later duplicates
/// together with their key points.
pub fn remove_duplicate_sections(sections: Vec<ContentSection>) -> Vec<ContentSection> {
    let mut seen = HashSet::new();
    sections
        .into_iter()
        .filter(|section| {
            let fresh = seen.insert(section.normalized_title());
            if !fresh {
                debug!("Dropping duplicate section '{}'", section.title);
            }
            fresh
        })
        .collect()
}

fn append_points(target: &mut KeyPoints, extra: Vec<KeyPoint>) {
    match target {
        KeyPoints::Timestamped(points) => points.extend(extra),
        KeyPoints::Legacy(points) => points.extend(extra.into_iter().map(|p| p.text)),
    }
}

fn prepend_points(target: &mut KeyPoints, mut leading: Vec<KeyPoint>) {
    match target {
        KeyPoints::Timestamped(points) => {
            leading.append(points);
            *points = leading;
        }
        KeyPoints::Legacy(points) => {
            let mut texts: Vec<String> = leading.into_iter().map(|p| p.text).collect();
            texts.append(points);
            *points = texts;
        }
    }
}

fn take_tangent_points(section: ContentSection) -> Vec<KeyPoint> {
    match section.key_points {
        KeyPoints::Timestamped(points) => points,
        KeyPoints::Legacy(_) => Vec::new(),
    }
}

/// Fold sections whose key points are all tangents into a substantive
/// neighbour.
///
/// A tangent-only section after a substantive one is absorbed by the
/// preceding substantive section, whose end extends to the absorbed end.
/// Tangent-only sections before the first substantive one are prepended to
/// it, moving its start back to the earliest of them, never forward. When no
/// substantive section exists the input is returned unchanged.
pub fn merge_tangent_only_sections(sections: Vec<ContentSection>) -> Result<Vec<ContentSection>> {
    let mut result: Vec<ContentSection> = Vec::with_capacity(sections.len());
    let mut leading: Vec<ContentSection> = Vec::new();

    for section in sections {
        if section.key_points.is_tangent_only() {
            if let Some(previous) = result.last_mut() {
                debug!(
                    "Merging tangent-only section '{}' into '{}'",
                    section.title, previous.title
                );
                let absorbed_end = parse_timestamp(&section.timestamp_end)?;
                if absorbed_end > parse_timestamp(&previous.timestamp_end)? {
                    previous.timestamp_end = section.timestamp_end.clone();
                }
                append_points(&mut previous.key_points, take_tangent_points(section));
            } else {
                leading.push(section);
            }
            continue;
        }

        let mut section = section;
        if !leading.is_empty() {
            let mut earliest: Option<(u32, &str)> = None;
            for buffered in &leading {
                let start = buffered.start_seconds()?;
                if earliest.map_or(true, |(t, _)| start < t) {
                    earliest = Some((start, buffered.timestamp_start.as_str()));
                }
            }
            // Start only moves backwards
            if let Some((t, stamp)) = earliest {
                if t < section.start_seconds()? {
                    section.timestamp_start = stamp.to_string();
                }
            }
            debug!(
                "Prepending {} leading tangent-only sections to '{}'",
                leading.len(),
                section.title
            );

            let points: Vec<KeyPoint> = leading.drain(..).flat_map(take_tangent_points).collect();
            prepend_points(&mut section.key_points, points);
        }
        result.push(section);
    }

    if result.is_empty() && !leading.is_empty() {
        warn!(
            "All {} sections are tangent-only, keeping them as-is",
            leading.len()
        );
        return Ok(leading);
    }

    Ok(result)
}

/// Sort sections by start and timestamped key points by timestamp.
///
/// Both sorts are stable; legacy string points keep their order.
pub fn sort_chronologically(sections: Vec<ContentSection>) -> Result<Vec<ContentSection>> {
    let mut keyed = sections
        .into_iter()
        .map(|section| -> Result<(u32, ContentSection)> { Ok((section.start_seconds()?, section)) })
        .collect::<Result<Vec<_>>>()?;
    keyed.sort_by_key(|(start, _)| *start);

    keyed
        .into_iter()
        .map(|(_, mut section)| -> Result<ContentSection> {
            if let KeyPoints::Timestamped(points) = &mut section.key_points {
                let mut keyed_points = points
                    .drain(..)
                    .map(|p| -> Result<(u32, KeyPoint)> { Ok((p.seconds()?, p)) })
                    .collect::<Result<Vec<_>>>()?;
                keyed_points.sort_by_key(|(t, _)| *t);
                *points = keyed_points.into_iter().map(|(_, p)| p).collect();
            }
            Ok(section)
        })
        .collect()
}

/// Run the full cleanup pipeline over a raw model digest
pub fn reconcile(raw: StructuredDigest, origin: ChapterOrigin) -> Result<StructuredDigest> {
    let StructuredDigest {
        summary,
        sections,
        related_links,
        other_links,
    } = raw;
    let raw_count = sections.len();

    let sections = remove_duplicate_sections(sections);
    let sections = match origin {
        ChapterOrigin::Inferred => merge_tangent_only_sections(sections)?,
        ChapterOrigin::Creator => sections,
    };
    let sections = sort_chronologically(sections)?;

    info!(
        "🧹 Reconciled digest: {} sections ({} from model, {:?} chapters)",
        sections.len(),
        raw_count,
        origin
    );

    let mut digest = StructuredDigest {
        summary,
        sections,
        related_links,
        other_links,
    };
    digest.retain_valid_links();
    Ok(digest)
}
