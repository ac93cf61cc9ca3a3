//! LLM completion contract and response cleanup.
//!
//! The engine owns prompt construction and response validation; the provider
//! owns transport. Providers are stateless per call.

use async_trait::async_trait;
use thiserror::Error;

/// Per-call completion parameters
#[derive(Debug, Clone)]
pub struct CompletionOptions {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// One completion with its token accounting
#[derive(Debug, Clone)]
pub struct Completion {
    pub content: String,
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl Completion {
    pub fn total_tokens(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }
}

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("LLM request failed: {0}")]
    Request(String),
    #[error("LLM response was empty")]
    EmptyResponse,
}

/// A chat-completion capability
#[async_trait]
pub trait LlmProvider: Send + Sync {
    async fn complete(
        &self,
        system: &str,
        user: &str,
        options: &CompletionOptions,
    ) -> Result<Completion, LlmError>;
}

/// Strip a wrapping markdown code fence from a model response.
///
/// Models asked for JSON frequently return ```json ... ``` anyway; parsing
/// happens on the stripped body.
pub fn strip_markdown_fences(content: &str) -> &str {
    let trimmed = content.trim();

    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed;
    };

    // Drop the info string on the opening fence line
    match body.split_once('\n') {
        Some((_, after)) => after.trim(),
        None => body.trim(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_json_unchanged() {
        assert_eq!(strip_markdown_fences(r#"{"a": 1}"#), r#"{"a": 1}"#);
    }

    #[test]
    fn fenced_json_stripped() {
        let fenced = "```json\n{\"a\": 1}\n```";
        assert_eq!(strip_markdown_fences(fenced), "{\"a\": 1}");
    }

    #[test]
    fn fence_without_language_stripped() {
        let fenced = "```\n{\"a\": 1}\n```";
        assert_eq!(strip_markdown_fences(fenced), "{\"a\": 1}");
    }

    #[test]
    fn unterminated_fence_left_alone() {
        let partial = "```json\n{\"a\": 1}";
        assert_eq!(strip_markdown_fences(partial), partial);
    }

    #[test]
    fn fenced_and_bare_parse_identically() {
        let bare = r#"{"verdict": "verified", "confidence": 0.9, "reasoning": "ok"}"#;
        let fenced = format!("```json\n{bare}\n```");
        let a: serde_json::Value = serde_json::from_str(strip_markdown_fences(bare)).unwrap();
        let b: serde_json::Value =
            serde_json::from_str(strip_markdown_fences(&fenced)).unwrap();
        assert_eq!(a, b);
    }
}
