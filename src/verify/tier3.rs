//! Tier 3: LLM verdicts over builder-provided evidence.
//!
//! The LLM never sees a claim without codebase evidence. The JSON contract
//! gets exactly one retry; a timed-out attempt consumes the budget like any
//! other failure. Token costs accumulate across both attempts.

use std::time::Duration;

use tokio::time::timeout;

use super::prompts;
use super::validation::validate_response;
use super::TierOutcome;
use crate::evidence::EvidenceBuilder;
use crate::llm::{strip_markdown_fences, CompletionOptions, LlmProvider};
use crate::model::{Claim, LlmConfig, LlmVerdictResponse};

const MAX_ATTEMPTS: u32 = 2;

/// Ask the configured LLM for a verdict on one claim
pub(crate) async fn verify(
    claim: &Claim,
    evidence_builder: &dyn EvidenceBuilder,
    llm: &dyn LlmProvider,
    config: &LlmConfig,
) -> Option<TierOutcome> {
    let evidence = evidence_builder.build_evidence(claim).await;
    if evidence.is_empty() {
        tracing::debug!(claim_id = %claim.id, "No evidence found, leaving claim unverified");
        return None;
    }

    let base_prompt = prompts::build_user_prompt(claim, &evidence);
    let options = CompletionOptions {
        model: config.model.clone(),
        temperature: config.temperature,
        max_tokens: config.max_tokens,
    };

    let mut total_tokens: u64 = 0;

    for attempt in 0..MAX_ATTEMPTS {
        let user_prompt = if attempt == 0 {
            base_prompt.clone()
        } else {
            prompts::with_retry_instruction(&base_prompt)
        };

        let call = llm.complete(prompts::SYSTEM_PROMPT, &user_prompt, &options);
        let completion = match timeout(Duration::from_millis(config.timeout_ms), call).await {
            Ok(Ok(completion)) => completion,
            Ok(Err(err)) => {
                tracing::warn!(claim_id = %claim.id, attempt, error = %err, "LLM call failed");
                continue;
            }
            Err(_) => {
                tracing::warn!(claim_id = %claim.id, attempt, "LLM call timed out");
                continue;
            }
        };

        total_tokens += completion.total_tokens();

        let body = strip_markdown_fences(&completion.content);
        let parsed: LlmVerdictResponse = match serde_json::from_str(body) {
            Ok(parsed) => parsed,
            Err(err) => {
                tracing::debug!(claim_id = %claim.id, attempt, error = %err, "LLM response is not valid JSON");
                continue;
            }
        };

        match validate_response(parsed) {
            Ok(response) => {
                let evidence_files = if response.evidence_files.is_empty() {
                    evidence.files.clone()
                } else {
                    response.evidence_files
                };
                let mut outcome = TierOutcome::llm(
                    response.verdict,
                    response.confidence,
                    response.reasoning,
                    total_tokens,
                )
                .with_evidence(evidence_files);
                outcome.severity = response.severity;
                outcome.specific_mismatch = response.specific_mismatch;
                outcome.suggested_fix = response.suggested_fix;
                return Some(outcome);
            }
            Err(reason) => {
                tracing::debug!(claim_id = %claim.id, attempt, reason, "LLM response failed schema validation");
            }
        }
    }

    tracing::warn!(claim_id = %claim.id, "LLM verification failed after retry, leaving claim unverified");
    None
}
