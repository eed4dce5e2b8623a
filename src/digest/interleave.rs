/// Interleaving of key points and span-level tangents for rendering
use super::{ContentSection, KeyPoint, KeyPoints, Tangent};
use crate::error::Result;
use crate::timestamp::{parse_timestamp, TimeRange};

/// One entry of a section's rendered content list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentItem<'a> {
    Point(&'a KeyPoint),
    Legacy(&'a str),
    Tangent(&'a Tangent),
}

impl<'a> ContentItem<'a> {
    pub fn is_tangent(&self) -> bool {
        match self {
            ContentItem::Point(point) => point.is_tangent(),
            ContentItem::Legacy(_) => false,
            ContentItem::Tangent(_) => true,
        }
    }
}

/// The window a section owns for tangent placement: from its start up to the
/// next section's start, or its own end for the last section.
pub fn section_window(section: &ContentSection, next_start: Option<&str>) -> Result<TimeRange> {
    let start = parse_timestamp(&section.timestamp_start)?;
    let end = match next_start {
        Some(next) => parse_timestamp(next)?,
        None => parse_timestamp(&section.timestamp_end)?,
    };
    Ok(TimeRange::new(start, end))
}

/// Tangents whose start falls inside the window, in input order
pub fn select_tangents<'a>(window: TimeRange, tangents: &'a [Tangent]) -> Result<Vec<&'a Tangent>> {
    let mut selected = Vec::new();
    for tangent in tangents {
        if window.contains(tangent.start_seconds()?) {
            selected.push(tangent);
        }
    }
    Ok(selected)
}

/// Build the ordered content list of one section.
///
/// Timestamped sections are merged with their tangents by timestamp; at equal
/// times key points come first. Legacy sections list their strings first and
/// the tangents after them.
pub fn interleave_section<'a>(
    section: &'a ContentSection,
    next_start: Option<&str>,
    tangents: &'a [Tangent],
) -> Result<Vec<ContentItem<'a>>> {
    let window = section_window(section, next_start)?;
    let selected = select_tangents(window, tangents)?;

    match &section.key_points {
        KeyPoints::Timestamped(points) => {
            let mut keyed: Vec<(u32, ContentItem<'a>)> =
                Vec::with_capacity(points.len() + selected.len());
            for point in points {
                keyed.push((point.seconds()?, ContentItem::Point(point)));
            }
            for tangent in selected {
                keyed.push((tangent.start_seconds()?, ContentItem::Tangent(tangent)));
            }
            keyed.sort_by_key(|(t, _)| *t);
            Ok(keyed.into_iter().map(|(_, item)| item).collect())
        }
        KeyPoints::Legacy(points) => Ok(points
            .iter()
            .map(|p| ContentItem::Legacy(p.as_str()))
            .chain(selected.into_iter().map(ContentItem::Tangent))
            .collect()),
    }
}

/// Interleave every section of a digest against the global tangent list
pub fn interleave_digest<'a>(
    sections: &'a [ContentSection],
    tangents: &'a [Tangent],
) -> Result<Vec<Vec<ContentItem<'a>>>> {
    sections
        .iter()
        .enumerate()
        .map(|(i, section)| {
            let next_start = sections.get(i + 1).map(|s| s.timestamp_start.as_str());
            interleave_section(section, next_start, tangents)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tangent(title: &str, start: &str, end: &str) -> Tangent {
        Tangent {
            title: title.to_string(),
            timestamp_start: start.to_string(),
            timestamp_end: end.to_string(),
            summary: format!("{} summary", title),
        }
    }

    #[test]
    fn test_tangent_positioned_between_points() {
        let section = ContentSection {
            title: "Middle".into(),
            timestamp_start: "2:00".into(),
            timestamp_end: "5:00".into(),
            key_points: KeyPoints::Timestamped(vec![
                KeyPoint::new("before", "2:30"),
                KeyPoint::new("after", "4:00"),
            ]),
        };
        let tangents = vec![tangent("Coffee", "3:15", "3:50"), tangent("Other", "6:00", "6:30")];

        let items = interleave_section(&section, Some("5:00"), &tangents).unwrap();
        assert_eq!(items.len(), 3);
        assert!(matches!(items[0], ContentItem::Point(p) if p.text == "before"));
        assert!(matches!(items[1], ContentItem::Tangent(t) if t.title == "Coffee"));
        assert!(matches!(items[2], ContentItem::Point(p) if p.text == "after"));
    }

    #[test]
    fn test_window_uses_next_start_over_own_end() {
        let section = ContentSection {
            title: "A".into(),
            timestamp_start: "0:00".into(),
            timestamp_end: "1:00".into(),
            key_points: KeyPoints::Timestamped(vec![]),
        };
        let tangents = vec![tangent("Gap", "1:30", "1:45")];

        assert_eq!(interleave_section(&section, Some("2:00"), &tangents).unwrap().len(), 1);
        assert!(interleave_section(&section, None, &tangents).unwrap().is_empty());
    }

    #[test]
    fn test_tangent_at_next_start_belongs_to_next_section() {
        let sections = vec![
            ContentSection {
                title: "A".into(),
                timestamp_start: "0:00".into(),
                timestamp_end: "2:00".into(),
                key_points: KeyPoints::Timestamped(vec![KeyPoint::new("a", "0:10")]),
            },
            ContentSection {
                title: "B".into(),
                timestamp_start: "2:00".into(),
                timestamp_end: "4:00".into(),
                key_points: KeyPoints::Timestamped(vec![KeyPoint::new("b", "2:30")]),
            },
        ];
        let tangents = vec![tangent("Edge", "2:00", "2:20")];
        let items = interleave_digest(&sections, &tangents).unwrap();
        assert_eq!(items[0].len(), 1);
        assert_eq!(items[1].len(), 2);
        assert!(items[1][0].is_tangent());
    }

    #[test]
    fn test_legacy_points_then_tangents() {
        let section = ContentSection {
            title: "Old".into(),
            timestamp_start: "0:00".into(),
            timestamp_end: "10:00".into(),
            key_points: KeyPoints::Legacy(vec!["second".into(), "first".into()]),
        };
        let tangents = vec![tangent("Late", "8:00", "9:00"), tangent("Early", "1:00", "2:00")];
        let items = interleave_section(&section, None, &tangents).unwrap();
        assert_eq!(
            items,
            vec![
                ContentItem::Legacy("second"),
                ContentItem::Legacy("first"),
                ContentItem::Tangent(&tangents[0]),
                ContentItem::Tangent(&tangents[1]),
            ]
        );
    }
}
