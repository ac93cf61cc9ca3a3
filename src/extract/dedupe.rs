//! Within-file deduplication keyed by semantic identity

use std::collections::HashSet;

use crate::model::RawExtraction;

/// Collapse duplicate extractions within one file.
///
/// Extractions are grouped by identity key (claim type + the semantically
/// relevant subset of the value); within a group the earliest line wins, with
/// first-seen order breaking ties. The operation is idempotent.
pub fn deduplicate_within_file(mut extractions: Vec<RawExtraction>) -> Vec<RawExtraction> {
    // Stable sort keeps first-seen order among equal line numbers
    extractions.sort_by_key(|e| e.line_number);

    let mut seen: HashSet<String> = HashSet::new();
    let mut kept = Vec::with_capacity(extractions.len());

    for extraction in extractions {
        let key = extraction.value.identity_key();
        if seen.insert(key) {
            kept.push(extraction);
        } else {
            tracing::debug!(
                line = extraction.line_number,
                pattern = extraction.pattern,
                "Dropping duplicate extraction"
            );
        }
    }

    kept
}
