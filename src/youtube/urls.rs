use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;
use url::Url;

fn video_id_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            r"(?:youtube\.com/watch\?v=)([^&\n?#]+)",
            r"(?:youtu\.be/)([^&\n?#]+)",
            r"(?:m\.youtube\.com/watch\?v=)([^&\n?#]+)",
            r"(?:youtube\.com/embed/)([^&\n?#]+)",
        ]
        .iter()
        .filter_map(|p| Regex::new(p).ok())
        .collect()
    })
}

/// Extract the video id from the usual YouTube URL shapes
pub fn extract_video_id(url: &str) -> Option<String> {
    video_id_patterns()
        .iter()
        .find_map(|re| re.captures(url))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

fn parse_http_url(token: &str) -> Option<String> {
    let url = Url::parse(token).ok()?;
    matches!(url.scheme(), "http" | "https").then(|| url.to_string())
}

const TRAILING_PUNCTUATION: &[char] = &[',', ';', '.', '!', '?', ')', ']', '}', '>'];

/// Unique http(s) URLs in a block of text, in first-seen order
pub fn extract_urls(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut urls = Vec::new();

    let mut push = |url: String| {
        if seen.insert(url.clone()) {
            urls.push(url);
        }
    };

    for token in text.split_whitespace() {
        if let Some(url) = parse_http_url(token) {
            push(url);
        }

        let cleaned = token.trim_end_matches(TRAILING_PUNCTUATION);
        if cleaned != token {
            if let Some(url) = parse_http_url(cleaned) {
                push(url);
            }
        }
    }

    urls
}

/// Unique URLs across several optional text sources
pub fn combine_urls(sources: &[Option<&str>]) -> Vec<String> {
    let mut seen = HashSet::new();
    sources
        .iter()
        .flatten()
        .flat_map(|text| extract_urls(text))
        .filter(|url| seen.insert(url.clone()))
        .collect()
}
