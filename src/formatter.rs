/// Markdown rendering and on-disk export of digests
use crate::digest::{interleave_section, ContentItem, Link, StructuredDigest};
use crate::error::Result;
use crate::timestamp::parse_iso_duration;
use crate::youtube::VideoMetadata;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use tracing::info;

/// URL-safe slug: lowercase alphanumerics joined by single hyphens
pub fn create_slug(text: &str, max_length: usize) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;

    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    slug.truncate(max_length);
    slug.trim_end_matches('-').to_string()
}

/// Human-readable duration: `1h 2m 3s`
pub fn format_duration(iso: &str) -> String {
    let total = parse_iso_duration(iso);
    let (hours, minutes, seconds) = (total / 3600, (total % 3600) / 60, total % 60);

    let mut parts = Vec::new();
    if hours > 0 {
        parts.push(format!("{}h", hours));
    }
    if minutes > 0 {
        parts.push(format!("{}m", minutes));
    }
    if seconds > 0 || parts.is_empty() {
        parts.push(format!("{}s", seconds));
    }
    parts.join(" ")
}

fn format_published(published_at: &str) -> String {
    DateTime::parse_from_rfc3339(published_at)
        .map(|dt| dt.format("%B %-d, %Y").to_string())
        .unwrap_or_else(|_| published_at.to_string())
}

fn render_links(heading: &str, links: &[Link]) -> Option<String> {
    if links.is_empty() {
        return None;
    }
    let lines = links
        .iter()
        .map(|link| format!("- **[{}]({})** - {}", link.title, link.url, link.description))
        .collect::<Vec<_>>()
        .join("\n");
    Some(format!("## {}\n\n{}", heading, lines))
}

fn render_item(item: &ContentItem<'_>) -> String {
    match item {
        ContentItem::Point(point) if point.is_tangent() => {
            format!("- `{}` *[tangent]* {}", point.timestamp, point.text)
        }
        ContentItem::Point(point) => format!("- `{}` {}", point.timestamp, point.text),
        ContentItem::Legacy(text) => format!("- {}", text),
        ContentItem::Tangent(tangent) => format!(
            "- `{}` *[tangent]* **{}**: {}",
            tangent.timestamp_start, tangent.title, tangent.summary
        ),
    }
}

/// Render a digest as a complete markdown document
pub fn format_markdown(metadata: &VideoMetadata, digest: &StructuredDigest) -> Result<String> {
    let generated = Local::now().format("%B %-d, %Y %H:%M");

    let mut sections = Vec::with_capacity(digest.sections.len());
    for (i, section) in digest.sections.iter().enumerate() {
        let next_start = digest
            .sections
            .get(i + 1)
            .map(|s| s.timestamp_start.as_str());
        let items = interleave_section(section, next_start, &[])?;
        let body = items.iter().map(render_item).collect::<Vec<_>>().join("\n");
        sections.push(format!(
            "## {}\n**{} - {}**\n\n{}",
            section.title, section.timestamp_start, section.timestamp_end, body
        ));
    }

    let mut output = format!(
        "# {title}\n\n**Channel**: {channel}  \n**Duration**: {duration}  \n**Published**: {published}  \n**Video**: https://youtube.com/watch?v={id}  \n**Generated**: {generated}  \n\n---\n\n",
        title = metadata.title,
        channel = metadata.channel_title,
        duration = format_duration(&metadata.duration),
        published = format_published(&metadata.published_at),
        id = metadata.video_id,
        generated = generated,
    );

    if !digest.summary.is_empty() {
        output.push_str("## At a Glance\n\n");
        output.push_str(&digest.summary);
        output.push_str("\n\n");
    }

    output.push_str(&sections.join("\n\n"));
    output.push('\n');

    for links in [
        render_links("Related Links", &digest.related_links),
        render_links("Other Links", &digest.other_links),
    ]
    .into_iter()
    .flatten()
    {
        output.push_str("\n---\n\n");
        output.push_str(&links);
        output.push('\n');
    }

    Ok(output)
}

/// Path a digest is written to: `<base>/<channel-slug>/<title-slug>.md`
pub fn digest_path(base_dir: &Path, metadata: &VideoMetadata) -> PathBuf {
    base_dir
        .join(create_slug(&metadata.channel_title, 60))
        .join(format!("{}.md", create_slug(&metadata.title, 60)))
}

/// Write rendered markdown under the output directory
pub async fn save_digest(content: &str, metadata: &VideoMetadata, base_dir: &Path) -> Result<PathBuf> {
    let path = digest_path(base_dir, metadata);
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(&path, content).await?;
    info!("💾 Saved digest to: {}", path.display());
    Ok(path)
}
