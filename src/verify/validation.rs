//! Schema validation for Tier-3 LLM responses

use crate::model::{LlmVerdictResponse, Verdict};

/// Check a parsed response against the verdict contract and normalize it.
///
/// Severity is meaningful only on drifted verdicts; anything else is
/// normalized away rather than rejected.
pub(crate) fn validate_response(
    mut response: LlmVerdictResponse,
) -> Result<LlmVerdictResponse, String> {
    if !(0.0..=1.0).contains(&response.confidence) {
        return Err(format!(
            "confidence {} outside [0, 1]",
            response.confidence
        ));
    }
    if response.reasoning.trim().is_empty() {
        return Err("reasoning is empty".to_string());
    }

    if response.verdict != Verdict::Drifted {
        response.severity = None;
        response.specific_mismatch = None;
    }

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Severity;

    fn response(verdict: Verdict, confidence: f64) -> LlmVerdictResponse {
        LlmVerdictResponse {
            verdict,
            confidence,
            severity: Some(Severity::High),
            reasoning: "the handler moved".to_string(),
            specific_mismatch: Some("file is gone".to_string()),
            suggested_fix: None,
            evidence_files: vec![],
        }
    }

    #[test]
    fn accepts_drifted_with_severity() {
        let validated = validate_response(response(Verdict::Drifted, 0.9)).expect("valid");
        assert_eq!(validated.severity, Some(Severity::High));
        assert!(validated.specific_mismatch.is_some());
    }

    #[test]
    fn rejects_out_of_range_confidence() {
        assert!(validate_response(response(Verdict::Verified, 1.2)).is_err());
        assert!(validate_response(response(Verdict::Verified, -0.1)).is_err());
    }

    #[test]
    fn rejects_empty_reasoning() {
        let mut r = response(Verdict::Verified, 0.8);
        r.reasoning = "  ".to_string();
        assert!(validate_response(r).is_err());
    }

    #[test]
    fn severity_normalized_off_non_drifted() {
        let validated = validate_response(response(Verdict::Verified, 0.8)).expect("valid");
        assert!(validated.severity.is_none());
        assert!(validated.specific_mismatch.is_none());
    }
}
