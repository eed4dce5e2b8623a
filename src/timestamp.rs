/// Timestamp algebra shared by chapter extraction, reconciliation and interleaving
///
/// Timestamps are `M:SS` or `H:MM:SS` strings that map losslessly onto whole
/// seconds. Formatting never emits an hour component; minutes simply keep
/// counting past 59, which `parse_timestamp` reads back exactly.
use crate::error::{DigestError, Result};
use regex::Regex;
use std::sync::OnceLock;

/// Parse `M:SS` or `H:MM:SS` into seconds
pub fn parse_timestamp(input: &str) -> Result<u32> {
    let parts: Vec<&str> = input.trim().split(':').collect();

    let mut values = Vec::with_capacity(parts.len());
    for part in &parts {
        let part = part.trim();
        if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
            return Err(DigestError::malformed(input));
        }
        let value = part
            .parse::<u32>()
            .map_err(|_| DigestError::malformed(input))?;
        values.push(value);
    }

    let total = match values.as_slice() {
        [minutes, seconds] => minutes
            .checked_mul(60)
            .and_then(|m| m.checked_add(*seconds)),
        [hours, minutes, seconds] => hours
            .checked_mul(3600)
            .and_then(|h| h.checked_add(minutes.checked_mul(60)?))
            .and_then(|hm| hm.checked_add(*seconds)),
        _ => None,
    };

    total.ok_or_else(|| DigestError::malformed(input))
}

/// Format seconds as `M:SS`
pub fn format_timestamp(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

fn iso_duration_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"PT(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?").expect("static ISO duration pattern")
    })
}

/// Parse an ISO-8601 duration such as `PT1H2M30S` into seconds.
/// Anything that does not match yields 0.
pub fn parse_iso_duration(iso: &str) -> u32 {
    let Some(caps) = iso_duration_regex().captures(iso) else {
        return 0;
    };

    let component = |idx: usize| -> u32 {
        caps.get(idx)
            .and_then(|m| m.as_str().parse::<u32>().ok())
            .unwrap_or(0)
    };

    component(1)
        .saturating_mul(3600)
        .saturating_add(component(2).saturating_mul(60))
        .saturating_add(component(3))
}

/// Half-open interval of seconds, `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: u32,
    pub end: u32,
}

impl TimeRange {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, t: u32) -> bool {
        self.start <= t && t < self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_two_component() {
        assert_eq!(parse_timestamp("0:00").unwrap(), 0);
        assert_eq!(parse_timestamp("2:30").unwrap(), 150);
        assert_eq!(parse_timestamp("75:05").unwrap(), 4505);
    }

    #[test]
    fn test_parse_three_component() {
        assert_eq!(parse_timestamp("1:02:03").unwrap(), 3723);
        assert_eq!(parse_timestamp("0:10:00").unwrap(), 600);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["", "5", "1:2:3:4", "a:00", "1:-5", "1::00", "1:00 pm"] {
            let err = parse_timestamp(bad).unwrap_err();
            assert!(
                matches!(err, DigestError::MalformedTimestamp { .. }),
                "expected malformed for {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0), "0:00");
        assert_eq!(format_timestamp(65), "1:05");
        assert_eq!(format_timestamp(3723), "62:03");
    }

    #[test]
    fn test_round_trip() {
        for seconds in [0, 1, 59, 60, 61, 599, 3599, 3600, 7265, 86_399] {
            assert_eq!(parse_timestamp(&format_timestamp(seconds)).unwrap(), seconds);
        }
    }

    #[test]
    fn test_parse_iso_duration() {
        assert_eq!(parse_iso_duration("PT1H2M30S"), 3750);
        assert_eq!(parse_iso_duration("PT15M"), 900);
        assert_eq!(parse_iso_duration("PT45S"), 45);
        assert_eq!(parse_iso_duration("PT2H"), 7200);
        assert_eq!(parse_iso_duration("PT0S"), 0);
        assert_eq!(parse_iso_duration("garbage"), 0);
    }

    #[test]
    fn test_range_containment() {
        let range = TimeRange::new(120, 300);
        assert!(range.contains(120));
        assert!(range.contains(195));
        assert!(!range.contains(300));
        assert!(!range.contains(119));
    }
}
