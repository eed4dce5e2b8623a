/// Timestamp-list parser for video descriptions
use crate::timestamp::parse_timestamp;
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

/// A chapter candidate as found in the description, before any dedup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawChapter {
    pub start: u32,
    pub title: String,
}

fn timestamp_token_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\b(?:\d{1,2}:)?\d{1,2}:\d{2}\b").expect("static timestamp token pattern")
    })
}

const SEPARATORS: &[char] = &['-', '–', '—', ':', '|', '•', '·', '(', ')', '[', ']', '*'];

fn is_separator(c: char) -> bool {
    c.is_whitespace() || SEPARATORS.contains(&c)
}

/// Strip separator runs from both ends; a closing bracket survives when the
/// title itself opened it (`Topic A (part 2)`)
fn clean_title(raw: &str) -> String {
    let mut title = raw.trim_start_matches(is_separator);
    loop {
        let trimmed = title.trim_end_matches(|c: char| is_separator(c) && c != ')' && c != ']');
        let balanced = |open: char, close: char| {
            trimmed.matches(open).count() >= trimmed.matches(close).count()
        };
        match trimmed.chars().last() {
            Some(')') if !balanced('(', ')') => title = &trimmed[..trimmed.len() - 1],
            Some(']') if !balanced('[', ']') => title = &trimmed[..trimmed.len() - 1],
            _ => return trimmed.to_string(),
        }
    }
}

/// Parse a single description line into a chapter candidate.
///
/// The first timestamp token on the line is the chapter start. The title is
/// the text after the token, or the text before it when nothing follows
/// (`Intro - 0:00`). A second timestamp directly after the first is a range
/// end and is skipped.
pub fn parse_line(line: &str) -> Option<RawChapter> {
    let token = timestamp_token_regex().find(line)?;
    let start = parse_timestamp(token.as_str()).ok()?;

    // Range lines (`0:00 - 2:30 Intro`) carry the end right after the start
    let mut rest = &line[token.end()..];
    let stripped = rest.trim_start_matches(is_separator);
    if let Some(end_token) = timestamp_token_regex().find(stripped) {
        if end_token.start() == 0 {
            rest = &stripped[end_token.end()..];
        }
    }

    let after = clean_title(rest);
    let title = if !after.is_empty() {
        after
    } else {
        clean_title(&line[..token.start()])
    };

    if title.is_empty() {
        return None;
    }

    Some(RawChapter { start, title })
}

/// Extract every chapter candidate from a description, in source order
pub fn parse_description(description: &str) -> Vec<RawChapter> {
    let candidates: Vec<RawChapter> = description.lines().filter_map(parse_line).collect();
    debug!("Found {} chapter candidates in description", candidates.len());
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_leading_timestamp() {
        let chapter = parse_line("0:00 Intro").unwrap();
        assert_eq!(chapter.start, 0);
        assert_eq!(chapter.title, "Intro");
    }

    #[test]
    fn test_parse_with_separators_and_brackets() {
        assert_eq!(parse_line("(2:30) - Topic A").unwrap().title, "Topic A");
        assert_eq!(parse_line("[1:02:03] | Deep dive").unwrap().start, 3723);
        assert_eq!(parse_line("• 10:00 – Wrap up").unwrap().title, "Wrap up");
        assert_eq!(parse_line("2:31 Topic A (part 2)").unwrap().title, "Topic A (part 2)");
        assert_eq!(parse_line("Intro (0:00)").unwrap().title, "Intro");
    }

    #[test]
    fn test_parse_trailing_timestamp() {
        let chapter = parse_line("Closing thoughts - 14:20").unwrap();
        assert_eq!(chapter.start, 860);
        assert_eq!(chapter.title, "Closing thoughts");
    }

    #[test]
    fn test_parse_range_line() {
        let chapter = parse_line("0:00 - 2:30 Intro").unwrap();
        assert_eq!(chapter.start, 0);
        assert_eq!(chapter.title, "Intro");

        let chapter = parse_line("[1:00:00-1:05:30] Q&A").unwrap();
        assert_eq!(chapter.start, 3600);
        assert_eq!(chapter.title, "Q&A");

        assert!(parse_line("2:30 - 3:00").is_none());
    }

    #[test]
    fn test_skips_lines_without_title_or_timestamp() {
        assert!(parse_line("0:00").is_none());
        assert!(parse_line("Check out my merch!").is_none());
        assert!(parse_line("Ratio 16:9 display").is_none());
    }

    #[test]
    fn test_parse_description_preserves_order() {
        let description = "My video\n\n5:00 Later\n0:00 Start\nhttps://example.com\n2:00 Middle";
        let starts: Vec<u32> = parse_description(description)
            .iter()
            .map(|c| c.start)
            .collect();
        assert_eq!(starts, vec![300, 0, 120]);
    }
}
