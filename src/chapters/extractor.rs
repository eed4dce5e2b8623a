/// Creator chapter extraction from a description and ISO-8601 duration
use super::parser::{parse_description, RawChapter};
use super::Chapter;
use crate::timestamp::{format_timestamp, parse_iso_duration};
use std::collections::HashSet;
use tracing::{debug, info};

/// YouTube itself requires at least three chapters
pub const MIN_CHAPTERS: usize = 3;

/// Candidates starting within this many seconds of an accepted chapter are
/// the same marker listed twice (table of contents + detailed notes)
pub const PROXIMITY_TOLERANCE_SECONDS: u32 = 2;

/// Drop candidates whose start exactly matches an earlier one
fn dedup_exact(candidates: Vec<RawChapter>) -> Vec<RawChapter> {
    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|c| seen.insert(c.start))
        .collect()
}

/// Greedy, order-dependent collapse of near-identical starts.
///
/// Walks candidates in source order and keeps one only if no already-kept
/// candidate lies within the tolerance. Reordering the input can change
/// which pairs collapse.
fn dedup_proximity(candidates: Vec<RawChapter>) -> Vec<RawChapter> {
    let mut accepted: Vec<RawChapter> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let too_close = accepted
            .iter()
            .any(|prev| prev.start.abs_diff(candidate.start) <= PROXIMITY_TOLERANCE_SECONDS);
        if too_close {
            debug!(
                "Collapsing chapter '{}' at {}s into an earlier marker",
                candidate.title, candidate.start
            );
        } else {
            accepted.push(candidate);
        }
    }
    accepted
}

/// Build validated creator chapters from a video description.
///
/// Returns `None` when the description carries no usable chapter list: the
/// duration is unknown, fewer than three chapters survive dedup, or the first
/// chapter does not start at zero. Callers fall back to model-inferred
/// chapters in that case.
pub fn extract_chapters(description: &str, duration_iso: &str) -> Option<Vec<Chapter>> {
    let duration_seconds = parse_iso_duration(duration_iso);
    if duration_seconds == 0 {
        debug!("Unknown video duration '{}', skipping chapter extraction", duration_iso);
        return None;
    }

    let unique = dedup_proximity(dedup_exact(parse_description(description)));

    if unique.len() < MIN_CHAPTERS {
        debug!("Only {} creator chapters after dedup, ignoring", unique.len());
        return None;
    }
    if unique[0].start != 0 {
        debug!("First creator chapter starts at {}s, ignoring", unique[0].start);
        return None;
    }

    let ends: Vec<u32> = unique
        .iter()
        .skip(1)
        .map(|c| c.start)
        .chain(std::iter::once(duration_seconds))
        .collect();

    let chapters: Vec<Chapter> = unique
        .into_iter()
        .zip(ends)
        .map(|(raw, end_seconds)| Chapter {
            title: raw.title,
            start_seconds: raw.start,
            end_seconds,
            timestamp_start: format_timestamp(raw.start),
            timestamp_end: format_timestamp(end_seconds),
        })
        .collect();

    info!("📑 Using {} creator chapters from description", chapters.len());
    Some(chapters)
}
