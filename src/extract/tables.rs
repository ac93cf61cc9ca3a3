//! Markdown table extractor
//!
//! Data-bearing cells (paths, versions) are promoted to claims; decorative
//! comparison tables full of checkmarks are left alone.

use once_cell::sync::Lazy;
use regex::Regex;

use super::validation::is_valid_path;
use super::ExtractionContext;
use crate::model::{ExtractedValue, PreProcessedDoc, RawExtraction};

static VERSION_CELL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[\^~>=<]*v?(\d+\.\d+(?:\.\d+)?(?:-[0-9A-Za-z.]+)?)$").expect("valid regex")
});

static SEPARATOR_ROW: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\|?[\s:|-]+\|?$").expect("valid regex"));

/// Cell contents that carry no data
const DECORATIVE_CELLS: &[&str] = &["✓", "✔", "✗", "✘", "✅", "❌", "x", "-", "yes", "no", "n/a"];

/// Extract path and dependency claims from markdown table cells.
pub fn extract(doc: &PreProcessedDoc, _ctx: &ExtractionContext) -> Vec<RawExtraction> {
    let mut extractions = Vec::new();
    let lines = doc.lines();

    for (i, line) in lines.iter().enumerate() {
        if doc.is_fence_line(i) || doc.is_tag_line(i) {
            continue;
        }
        let trimmed = line.trim();
        if !trimmed.starts_with('|') || !trimmed.ends_with('|') {
            continue;
        }
        if SEPARATOR_ROW.is_match(trimmed) {
            continue;
        }
        // Skip the header row: it precedes a separator row
        if lines
            .get(i + 1)
            .map(|next| SEPARATOR_ROW.is_match(next.trim()) && next.trim().starts_with('|'))
            .unwrap_or(false)
        {
            continue;
        }

        let cells: Vec<&str> = trimmed
            .trim_matches('|')
            .split('|')
            .map(|c| c.trim().trim_matches('`'))
            .collect();

        let line_number = doc.original_line(i);
        let claim_text = trimmed.to_string();
        let first_cell = cells.first().copied().unwrap_or_default();

        for (column, cell) in cells.iter().enumerate() {
            if cell.is_empty() || DECORATIVE_CELLS.contains(&cell.to_lowercase().as_str()) {
                continue;
            }

            if let Some(caps) = VERSION_CELL.captures(cell) {
                // A version cell pairs with the row's first cell as package name
                if column > 0 && looks_like_package(first_cell) {
                    extractions.push(RawExtraction {
                        claim_text: claim_text.clone(),
                        value: ExtractedValue::Dependency {
                            package: first_cell.to_string(),
                            version: caps[1].to_string(),
                        },
                        line_number,
                        pattern: "table_cell",
                    });
                }
                continue;
            }

            if cell.contains('/') && !cell.contains("://") && !cell.contains(' ') {
                if is_valid_path(cell) {
                    extractions.push(RawExtraction {
                        claim_text: claim_text.clone(),
                        value: ExtractedValue::Path {
                            path: cell.to_string(),
                        },
                        line_number,
                        pattern: "table_cell",
                    });
                }
            }
        }
    }

    extractions
}

fn looks_like_package(cell: &str) -> bool {
    !cell.is_empty()
        && !cell.contains(' ')
        && cell
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '@' | '/' | '.' | '_' | '-'))
}
