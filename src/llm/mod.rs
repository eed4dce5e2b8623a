pub mod providers;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// LLM provider types
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum LLMProvider {
    Anthropic,
    OpenAI,
    LMStudio,
}

impl LLMProvider {
    /// Environment variable holding the provider's API key
    pub fn api_key_env(&self) -> Option<&'static str> {
        match self {
            LLMProvider::Anthropic => Some("ANTHROPIC_API_KEY"),
            LLMProvider::OpenAI => Some("OPENAI_API_KEY"),
            LLMProvider::LMStudio => None,
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            LLMProvider::Anthropic => "claude-sonnet-4-5",
            LLMProvider::OpenAI => "gpt-4o",
            LLMProvider::LMStudio => "local-model",
        }
    }

    pub fn default_endpoint(&self) -> &'static str {
        match self {
            LLMProvider::Anthropic => "https://api.anthropic.com/v1/messages",
            LLMProvider::OpenAI => "https://api.openai.com/v1/chat/completions",
            LLMProvider::LMStudio => "http://localhost:1234/v1/chat/completions",
        }
    }
}

impl std::str::FromStr for LLMProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "anthropic" | "claude" => Ok(LLMProvider::Anthropic),
            "openai" => Ok(LLMProvider::OpenAI),
            "lmstudio" | "lm-studio" => Ok(LLMProvider::LMStudio),
            other => Err(anyhow::anyhow!("Unknown LLM provider: {}", other)),
        }
    }
}

/// LLM configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LLMConfig {
    pub provider: LLMProvider,
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout_seconds: u64,
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            provider: LLMProvider::Anthropic,
            endpoint: None,
            api_key: None,
            model: LLMProvider::Anthropic.default_model().to_string(),
            max_tokens: 8192,
            temperature: 0.3,
            timeout_seconds: 300,
        }
    }
}

impl LLMConfig {
    pub fn endpoint(&self) -> &str {
        self.endpoint
            .as_deref()
            .unwrap_or_else(|| self.provider.default_endpoint())
    }
}

/// Chat message for LLM communication
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// LLM response
#[derive(Debug, Clone)]
pub struct LLMResponse {
    pub content: String,
    pub tokens_used: Option<u32>,
}

/// Trait for LLM providers
#[async_trait]
pub trait LLM: Send + Sync {
    async fn chat(&self, messages: Vec<ChatMessage>) -> Result<LLMResponse>;
    fn provider_type(&self) -> LLMProvider;
}

/// Create LLM instance based on configuration
pub fn create_llm(config: &LLMConfig) -> Result<Box<dyn LLM>> {
    match config.provider {
        LLMProvider::Anthropic => Ok(Box::new(providers::AnthropicProvider::new(config.clone())?)),
        LLMProvider::OpenAI | LLMProvider::LMStudio => {
            Ok(Box::new(providers::ChatCompletionsProvider::new(config.clone())?))
        }
    }
}

/// Strip markdown code fences that models like to wrap JSON in
pub fn clean_llm_response(content: &str) -> String {
    let content = content.trim();

    if content.starts_with("```") {
        if let Some(start) = content.find('\n') {
            if let Some(end) = content.rfind("```") {
                if end > start {
                    return content[start + 1..end].trim().to_string();
                }
            }
        }
    }

    content.replace("```", "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_llm_response_with_markdown() {
        let input = "```json\n{\n  \"summary\": \"s\"\n}\n```";
        assert_eq!(clean_llm_response(input), "{\n  \"summary\": \"s\"\n}");
    }

    #[test]
    fn test_clean_llm_response_without_markdown() {
        let input = "{\"summary\": \"s\"}";
        assert_eq!(clean_llm_response(input), input);
    }

    #[test]
    fn test_provider_from_str() {
        assert_eq!("Claude".parse::<LLMProvider>().unwrap(), LLMProvider::Anthropic);
        assert_eq!("lmstudio".parse::<LLMProvider>().unwrap(), LLMProvider::LMStudio);
        assert!("gemini".parse::<LLMProvider>().is_err());
    }

    #[test]
    fn test_endpoint_falls_back_to_provider_default() {
        let mut config = LLMConfig::default();
        assert_eq!(config.endpoint(), "https://api.anthropic.com/v1/messages");
        config.endpoint = Some("http://proxy/v1/messages".to_string());
        assert_eq!(config.endpoint(), "http://proxy/v1/messages");
    }
}
