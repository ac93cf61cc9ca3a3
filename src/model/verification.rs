//! Verification outcome model and the LLM-extractable response schema

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Outcome of verifying a claim against the codebase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Verified,
    Drifted,
    Uncertain,
}

/// How badly a drifted claim misleads a reader
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    High,
    Medium,
    Low,
}

/// Result of one verification pass over one claim.
///
/// `tier` records which cascade stage produced the verdict. `severity` is
/// populated only for drifted verdicts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationResult {
    pub claim_id: String,
    pub verdict: Verdict,
    /// Confidence in the verdict, in [0, 1]
    pub confidence: f64,
    pub severity: Option<Severity>,
    pub reasoning: String,
    pub specific_mismatch: Option<String>,
    pub suggested_fix: Option<String>,
    pub evidence_files: Vec<String>,
    /// Cascade stage (1 deterministic, 2 pattern, 3 LLM)
    pub tier: u8,
    /// Total LLM tokens spent, summed across retry attempts
    pub token_cost: u64,
    pub duration_ms: u64,
}

/// JSON contract the Tier-3 LLM response must satisfy
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LlmVerdictResponse {
    pub verdict: Verdict,
    pub confidence: f64,
    #[serde(default)]
    pub severity: Option<Severity>,
    pub reasoning: String,
    #[serde(default)]
    pub specific_mismatch: Option<String>,
    #[serde(default)]
    pub suggested_fix: Option<String>,
    #[serde(default)]
    pub evidence_files: Vec<String>,
}
