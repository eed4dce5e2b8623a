/// Digest generation: one model call followed by reconciliation
use crate::chapters::{extract_chapters, Chapter};
use crate::digest::{reconcile, ChapterOrigin, StructuredDigest};
use crate::error::{DigestError, Result};
use crate::llm::{clean_llm_response, ChatMessage, LLM};
use crate::prompts::{build_generation_request, GenerationRequest};
use crate::timestamp::parse_iso_duration;
use crate::youtube::{TranscriptEntry, VideoMetadata};
use std::time::Instant;
use tracing::{debug, info};

/// A reconciled digest together with the chapter structure it was built on
#[derive(Debug, Clone)]
pub struct DigestOutcome {
    pub digest: StructuredDigest,
    pub chapters: Option<Vec<Chapter>>,
}

impl DigestOutcome {
    pub fn has_creator_chapters(&self) -> bool {
        self.chapters.is_some()
    }
}

/// Turn a model failure into something a user can act on
fn describe_upstream_failure(error: &anyhow::Error) -> DigestError {
    let message = error.to_string();
    let lower = message.to_lowercase();

    if lower.contains("401") || lower.contains("authentication") {
        DigestError::Upstream(
            "Invalid API key for the language model provider. Check your configuration.".to_string(),
        )
    } else if lower.contains("429") || lower.contains("rate limit") || lower.contains("rate_limit") {
        DigestError::Upstream("Model API rate limit exceeded. Please wait and try again.".to_string())
    } else {
        DigestError::Upstream(format!("Failed to generate digest: {}", message))
    }
}

/// Generates digests with an explicitly injected model handle
pub struct Digester {
    llm: Box<dyn LLM>,
}

impl Digester {
    pub fn new(llm: Box<dyn LLM>) -> Self {
        Self { llm }
    }

    /// Single model call; the reply must be one JSON digest
    async fn call_model(&self, request: &GenerationRequest) -> Result<StructuredDigest> {
        let system = format!(
            "{}\n\nJSON schema:\n{}",
            request.system_prompt,
            serde_json::to_string_pretty(&request.output_schema)?
        );
        let messages = vec![
            ChatMessage::system(system),
            ChatMessage::user(request.user_prompt.clone()),
        ];

        let response = self
            .llm
            .chat(messages)
            .await
            .map_err(|e| describe_upstream_failure(&e))?;

        if let Some(tokens) = response.tokens_used {
            debug!("Model used {} tokens", tokens);
        }

        let cleaned = clean_llm_response(&response.content);
        Ok(serde_json::from_str(&cleaned)?)
    }

    /// Build, request and reconcile a digest for one video
    pub async fn generate(
        &self,
        metadata: &VideoMetadata,
        transcript: &[TranscriptEntry],
    ) -> Result<DigestOutcome> {
        let started = Instant::now();
        let chapters = extract_chapters(&metadata.description, &metadata.duration);
        let origin = ChapterOrigin::from_creator_chapters(chapters.is_some());

        let request = build_generation_request(
            metadata,
            transcript,
            chapters.as_deref(),
            parse_iso_duration(&metadata.duration),
        );

        info!(
            "🤖 Generating digest with {:?} ({:?} chapters)",
            self.llm.provider_type(),
            origin
        );
        let raw = self.call_model(&request).await?;
        let digest = reconcile(raw, origin)?;

        info!(
            "✅ Digest generated in {:.1}s",
            started.elapsed().as_secs_f64()
        );
        Ok(DigestOutcome { digest, chapters })
    }
}
