//! Tier 2: heuristic pattern checks for environment, config and convention
//! claims.
//!
//! These claims have no single deterministic anchor, so the checks look for
//! corroborating references in the indexed code and stay honest about the
//! weaker signal with sub-1.0 confidence.

use super::TierOutcome;
use crate::index::CodebaseIndex;
use crate::model::{Claim, ExtractedValue, Severity, Verdict};

const ENV_REFERENCED_CONFIDENCE: f64 = 0.9;
const CONFIG_REFERENCED_CONFIDENCE: f64 = 0.7;
const UNCORROBORATED_CONFIDENCE: f64 = 0.5;

const CONVENTION_SEARCH_TOP_K: usize = 3;

/// Run the heuristic check for one pattern-tier claim
pub(crate) async fn verify(claim: &Claim, index: &dyn CodebaseIndex) -> Option<TierOutcome> {
    match &claim.value {
        ExtractedValue::EnvironmentVar { name } => Some(check_env_var(name, index).await),
        ExtractedValue::ConfigSetting { key, .. } => Some(check_config_key(key, index).await),
        ExtractedValue::Convention { statement } => Some(check_convention(statement, index).await),
        _ => None,
    }
}

async fn check_env_var(name: &str, index: &dyn CodebaseIndex) -> TierOutcome {
    let hits = index.find_symbol(name).await;
    if hits.is_empty() {
        TierOutcome::pattern(
            Verdict::Drifted,
            UNCORROBORATED_CONFIDENCE,
            format!("{name} is not referenced anywhere in the codebase"),
        )
        .drifted(
            Severity::Medium,
            format!("no code reads {name}"),
        )
    } else {
        let files = dedupe_files(hits.into_iter().map(|h| h.file));
        TierOutcome::pattern(
            Verdict::Verified,
            ENV_REFERENCED_CONFIDENCE,
            format!("{name} is referenced by the codebase"),
        )
        .with_evidence(files)
    }
}

async fn check_config_key(key: &str, index: &dyn CodebaseIndex) -> TierOutcome {
    // Dotted keys are declared by their leaf segment in most config schemas
    let leaf = key.rsplit(['.', ':']).next().unwrap_or(key);
    let hits = index.find_symbol(leaf).await;

    if hits.is_empty() {
        TierOutcome::pattern(
            Verdict::Uncertain,
            UNCORROBORATED_CONFIDENCE,
            format!("no reference to config key '{key}' was found"),
        )
    } else {
        let files = dedupe_files(hits.into_iter().map(|h| h.file));
        TierOutcome::pattern(
            Verdict::Verified,
            CONFIG_REFERENCED_CONFIDENCE,
            format!("config key '{key}' is referenced by the codebase"),
        )
        .with_evidence(files)
    }
}

async fn check_convention(statement: &str, index: &dyn CodebaseIndex) -> TierOutcome {
    // A stated convention cannot be proven by lookup; the heuristic only
    // gathers the most related code so reviewers know where to look
    let hits = index.search_semantic(statement, CONVENTION_SEARCH_TOP_K).await;
    if hits.is_empty() {
        TierOutcome::pattern(
            Verdict::Uncertain,
            UNCORROBORATED_CONFIDENCE,
            "no code related to this convention was found".to_string(),
        )
    } else {
        let files = dedupe_files(hits.into_iter().map(|h| h.file));
        TierOutcome::pattern(
            Verdict::Uncertain,
            UNCORROBORATED_CONFIDENCE,
            "related code found; convention needs review".to_string(),
        )
        .with_evidence(files)
    }
}

fn dedupe_files(files: impl Iterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for file in files {
        if !out.contains(&file) {
            out.push(file);
        }
    }
    out
}
