use anyhow::Result;
use clap::{Arg, Command};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use youtube_digest::formatter::{digest_path, format_markdown, save_digest};
use youtube_digest::llm::{create_llm, LLMProvider};
use youtube_digest::youtube::{
    extract_video_id, fetch_transcript, fetch_video_metadata, TranscriptClient, YouTubeClient,
};
use youtube_digest::{Config, DigestError, Digester};

#[tokio::main]
async fn main() -> Result<()> {
    let matches = Command::new("YouTube Digest")
        .version("0.1.0")
        .author("TigreRoll")
        .about("Structured AI digests of YouTube videos")
        .arg(
            Arg::new("url")
                .value_name("URL")
                .help("YouTube video URL")
                .required(true)
        )
        .arg(
            Arg::new("output-dir")
                .short('o')
                .long("output-dir")
                .value_name("DIR")
                .help("Output directory for digests")
        )
        .arg(
            Arg::new("provider")
                .short('p')
                .long("provider")
                .value_name("PROVIDER")
                .help("LLM provider: anthropic, openai or lmstudio")
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Also write the digest as JSON")
                .action(clap::ArgAction::SetTrue)
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging")
                .action(clap::ArgAction::SetTrue)
        )
        .get_matches();

    let mut config = Config::load().unwrap_or_else(|e| {
        eprintln!("Failed to load config, using defaults: {}", e);
        Config::default()
    });

    let verbose = matches.get_flag("verbose");
    let log_level = if verbose {
        "youtube_digest=debug,info".to_string()
    } else {
        config.output.log_level.clone()
    };

    // Initialize logging; RUST_LOG wins over the configured level
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Some(provider) = matches.get_one::<String>("provider") {
        config.set_provider(provider.parse::<LLMProvider>()?);
    }
    if let Some(dir) = matches.get_one::<String>("output-dir") {
        config.output.base_dir = PathBuf::from(dir);
    }
    if matches.get_flag("json") {
        config.output.save_json = true;
    }

    if verbose {
        info!("{}", config.summary());
    }

    let url = matches
        .get_one::<String>("url")
        .ok_or_else(|| anyhow::anyhow!("URL is required"))?;
    let video_id = extract_video_id(url).ok_or_else(|| DigestError::InvalidVideoUrl {
        url: url.to_string(),
    })?;

    config.validate()?;

    // Keys are present past validate()
    let youtube = YouTubeClient::new(
        config.youtube.api_key.clone().unwrap_or_default(),
        config.youtube.timeout_seconds,
    )?;
    let transcripts = TranscriptClient::new(
        config.transcript.api_key.clone().unwrap_or_default(),
        config.transcript.endpoint.clone(),
        config.transcript.timeout_seconds,
    )?;

    info!("🚀 YouTube Digest starting...");
    info!("🎬 Video: {}", video_id);

    let start_time = std::time::Instant::now();
    let (metadata, transcript) = tokio::try_join!(
        fetch_video_metadata(&youtube, &video_id),
        fetch_transcript(&transcripts, &video_id),
    )?;

    if transcript.is_empty() {
        return Err(anyhow::anyhow!("No transcript available for this video"));
    }

    let digester = Digester::new(create_llm(&config.llm)?);
    let outcome = digester.generate(&metadata, &transcript).await?;
    if outcome.has_creator_chapters() {
        info!("📑 Used creator chapters from the description");
    }
    if outcome.digest.sections.is_empty() {
        warn!("Digest has no sections");
    }

    let markdown = format_markdown(&metadata, &outcome.digest)?;
    let saved = save_digest(&markdown, &metadata, &config.output.base_dir).await?;

    if config.output.save_json {
        let json_path = digest_path(&config.output.base_dir, &metadata).with_extension("json");
        tokio::fs::write(&json_path, serde_json::to_string_pretty(&outcome.digest)?).await?;
        info!("💾 Saved JSON to: {}", json_path.display());
    }

    info!(
        "🎉 Digest completed in {:.2}s: {}",
        start_time.elapsed().as_secs_f64(),
        saved.display()
    );

    println!("{}", markdown);
    Ok(())
}
