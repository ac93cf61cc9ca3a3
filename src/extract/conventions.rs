//! Stated coding convention extractor
//!
//! Prose sentences that prescribe behavior ("always use X", "never do Y")
//! become convention claims. These are pattern-checked at Tier 2 rather than
//! resolved deterministically.

use once_cell::sync::Lazy;
use regex::Regex;

use super::ExtractionContext;
use crate::model::{ExtractedValue, PreProcessedDoc, RawExtraction};

static PRESCRIPTIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(always|never|must(?:\s+not)?|should(?:\s+not)?|do not|don't|avoid|prefer)\b")
        .expect("valid regex")
});

/// Topics that anchor a prescriptive sentence to the codebase
static CODE_TOPIC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(import|export|indent|tab|space|naming|name|camelcase|snake_case|kebab-case|test|lint|format|style|commit|prefix|suffix|error|type|function|component|file|folder|directory|module|async|await)\b",
    )
    .expect("valid regex")
});

const MIN_STATEMENT_LEN: usize = 20;
const MAX_STATEMENT_LEN: usize = 300;

/// Extract stated convention claims from prose.
pub fn extract(doc: &PreProcessedDoc, _ctx: &ExtractionContext) -> Vec<RawExtraction> {
    let mut extractions = Vec::new();

    for (i, line) in doc.lines().iter().enumerate() {
        if doc.is_fence_line(i) || doc.is_tag_line(i) {
            continue;
        }
        let trimmed = line.trim();
        // Headings and list markers keep their text, markers dropped
        let statement = trimmed
            .trim_start_matches(['#', '-', '*', '>'])
            .trim()
            .to_string();

        if statement.len() < MIN_STATEMENT_LEN || statement.len() > MAX_STATEMENT_LEN {
            continue;
        }
        if !PRESCRIPTIVE.is_match(&statement) {
            continue;
        }
        // A prescriptive sentence with no code topic is policy prose, not a
        // checkable convention
        if !CODE_TOPIC.is_match(&statement) && !statement.contains('`') {
            continue;
        }

        extractions.push(RawExtraction {
            claim_text: statement.clone(),
            value: ExtractedValue::Convention { statement },
            line_number: doc.original_line(i),
            pattern: "convention_statement",
        });
    }

    extractions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DocFormat;
    use crate::preprocess::preprocess;

    fn extract_conventions(content: &str) -> Vec<RawExtraction> {
        let doc = preprocess(content, DocFormat::Markdown);
        extract(&doc, &ExtractionContext::new("docs/contributing.md"))
    }

    #[test]
    fn extracts_prescriptive_code_statement() {
        let found = extract_conventions("Always use named exports for components.");
        assert_eq!(found.len(), 1);
        match &found[0].value {
            ExtractedValue::Convention { statement } => {
                assert_eq!(statement, "Always use named exports for components.");
            }
            other => panic!("unexpected value: {other:?}"),
        }
    }

    #[test]
    fn list_marker_stripped() {
        let found = extract_conventions("- Never commit directly to the main branch folder.");
        assert_eq!(found.len(), 1);
        assert!(found[0].claim_text.starts_with("Never commit"));
    }

    #[test]
    fn non_prescriptive_prose_ignored() {
        assert!(extract_conventions("The project uses TypeScript for components.").is_empty());
    }

    #[test]
    fn prescriptive_without_code_topic_ignored() {
        assert!(extract_conventions("You should always be kind to your reviewers.").is_empty());
    }

    #[test]
    fn short_fragments_ignored() {
        assert!(extract_conventions("Never do this.").is_empty());
    }

    #[test]
    fn identity_uses_statement_digest() {
        let found = extract_conventions("Always use tabs for indentation in this repo.");
        let key = found[0].value.identity_key();
        assert!(key.starts_with("convention:"));
        assert_eq!(key.len(), "convention:".len() + 16);
    }
}
