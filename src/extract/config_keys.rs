//! Configuration setting extractor
//!
//! Backticked dotted or colon-separated lowercase keys (`agent.adapter`,
//! `server:port`) mentioned in prose, with the prescribed value when the
//! sentence states one.

use once_cell::sync::Lazy;
use regex::Regex;

use super::ExtractionContext;
use crate::model::{ExtractedValue, PreProcessedDoc, RawExtraction};

/// Dotted/colon config key inside backticks, two segments or more
static BACKTICK_KEY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"`([a-z][a-z0-9_-]*(?:[.:][a-z][a-z0-9_-]*)+)`").expect("valid regex")
});

/// `` `key` to `value` `` / `` `key` = `value` `` / `` set `key` to value ``
static KEY_VALUE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"`([a-z][a-z0-9_-]*(?:[.:][a-z][a-z0-9_-]*)+)`\s*(?:=|to|:)\s*`?([A-Za-z0-9_./-]+)`?",
    )
    .expect("valid regex")
});

/// Key segments that mark the token as a file, not a config key
const FILE_LIKE_TAILS: &[&str] = &[
    "cjs", "js", "json", "jsx", "md", "mjs", "py", "rs", "toml", "ts", "tsx", "yaml", "yml",
];

/// Extract config setting claims from prose lines.
pub fn extract(doc: &PreProcessedDoc, _ctx: &ExtractionContext) -> Vec<RawExtraction> {
    let mut extractions = Vec::new();

    for (i, line) in doc.lines().iter().enumerate() {
        if doc.is_fence_line(i) || doc.is_tag_line(i) {
            continue;
        }
        let line_number = doc.original_line(i);
        let claim_text = line.trim().to_string();
        if claim_text.is_empty() {
            continue;
        }

        let mut valued_keys: Vec<String> = Vec::new();

        for caps in KEY_VALUE.captures_iter(line) {
            let key = caps[1].to_string();
            if is_file_like(&key) {
                continue;
            }
            valued_keys.push(key.clone());
            extractions.push(RawExtraction {
                claim_text: claim_text.clone(),
                value: ExtractedValue::ConfigSetting {
                    key,
                    value: Some(caps[2].to_string()),
                },
                line_number,
                pattern: "config_key_value",
            });
        }

        for caps in BACKTICK_KEY.captures_iter(line) {
            let key = caps[1].to_string();
            if is_file_like(&key) || valued_keys.contains(&key) {
                continue;
            }
            extractions.push(RawExtraction {
                claim_text: claim_text.clone(),
                value: ExtractedValue::ConfigSetting { key, value: None },
                line_number,
                pattern: "config_key_mention",
            });
        }
    }

    extractions
}

/// `vite.config.ts` matches the key grammar but names a file
fn is_file_like(key: &str) -> bool {
    key.rsplit(['.', ':'])
        .next()
        .map(|tail| FILE_LIKE_TAILS.contains(&tail))
        .unwrap_or(false)
}
