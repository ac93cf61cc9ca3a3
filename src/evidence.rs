//! Evidence builder contract for Tier-3 verification.
//!
//! Tier 3 never prompts an LLM without codebase evidence; a claim for which
//! the builder finds nothing is left unverified.

use async_trait::async_trait;

use crate::model::Claim;

/// Codebase material supporting or contradicting a claim
#[derive(Debug, Clone, Default)]
pub struct Evidence {
    /// Prompt-ready rendering of the evidence, `None` when nothing was found
    pub formatted: Option<String>,
    /// Repo-relative files the evidence was drawn from
    pub files: Vec<String>,
}

impl Evidence {
    pub fn is_empty(&self) -> bool {
        self.formatted.as_deref().map(str::trim).unwrap_or("").is_empty()
    }
}

/// Gathers codebase evidence for a claim ahead of an LLM verdict
#[async_trait]
pub trait EvidenceBuilder: Send + Sync {
    async fn build_evidence(&self, claim: &Claim) -> Evidence;
}
