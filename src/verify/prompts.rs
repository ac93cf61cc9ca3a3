//! Prompt construction for Tier-3 verification

use crate::evidence::Evidence;
use crate::model::Claim;

pub(crate) const SYSTEM_PROMPT: &str = "\
You are a documentation accuracy auditor. You are given one claim made by a \
project's documentation and evidence extracted from the project's current \
codebase. Decide whether the codebase still matches the claim.

Respond with a single JSON object, no prose, matching exactly:
{
  \"verdict\": \"verified\" | \"drifted\" | \"uncertain\",
  \"confidence\": <number between 0 and 1>,
  \"severity\": \"high\" | \"medium\" | \"low\" | null,
  \"reasoning\": \"<one or two sentences>\",
  \"specific_mismatch\": \"<what differs>\" | null,
  \"suggested_fix\": \"<how to fix the doc>\" | null,
  \"evidence_files\": [\"<repo-relative path>\", ...]
}

Rules:
- \"verified\" only when the evidence positively supports the claim.
- \"drifted\" when the evidence contradicts the claim; set severity.
- \"uncertain\" when the evidence is insufficient either way; severity null.
- Base the verdict only on the evidence provided, never on general knowledge.";

const RETRY_INSTRUCTION: &str = "Respond with valid JSON only.";

/// Build the user prompt for one claim and its evidence
pub(crate) fn build_user_prompt(claim: &Claim, evidence: &Evidence) -> String {
    let formatted = evidence.formatted.as_deref().unwrap_or_default();
    format!(
        "Documentation claim (from {file}, line {line}):\n{text}\n\n\
         Claim type: {claim_type:?}\n\n\
         Codebase evidence:\n{formatted}",
        file = claim.source_file,
        line = claim.line_number,
        text = claim.claim_text,
        claim_type = claim.claim_type,
    )
}

/// Append the JSON-only reminder for the single retry attempt
pub(crate) fn with_retry_instruction(user_prompt: &str) -> String {
    format!("{user_prompt}\n\n{RETRY_INSTRUCTION}")
}
