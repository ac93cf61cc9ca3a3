//! API route extractor

use once_cell::sync::Lazy;
use regex::Regex;

use super::ExtractionContext;
use crate::model::{ExtractedValue, PreProcessedDoc, RawExtraction};

/// `METHOD /path` mention, bare or backtick-wrapped. Path parameters keep
/// whatever notation the document used (`:id`, `{id}`).
static METHOD_PATH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?i)(GET|POST|PUT|PATCH|DELETE|HEAD|OPTIONS)(?-i)\s+(/[A-Za-z0-9_\-./:{}]*)")
        .expect("valid regex")
});

/// Extract API route claims
pub fn extract(doc: &PreProcessedDoc, _ctx: &ExtractionContext) -> Vec<RawExtraction> {
    let mut extractions = Vec::new();

    for (i, line) in doc.lines().iter().enumerate() {
        if doc.is_fence_line(i) || doc.is_tag_line(i) {
            continue;
        }
        let line_number = doc.original_line(i);

        for caps in METHOD_PATH.captures_iter(line) {
            let method = caps[1].to_uppercase();
            let path = caps[2].trim_end_matches(['.', ',']).to_string();

            extractions.push(RawExtraction {
                claim_text: line.trim().to_string(),
                value: ExtractedValue::Route { method, path },
                line_number,
                pattern: "api_route",
            });
        }
    }

    extractions
}
