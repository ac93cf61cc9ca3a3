//! Environment variable extractor

use once_cell::sync::Lazy;
use regex::Regex;

use super::ExtractionContext;
use crate::model::{ExtractedValue, PreProcessedDoc, RawExtraction};

static PROCESS_ENV: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"process\.env\.([A-Z][A-Z0-9_]+)").expect("valid regex"));

static SHELL_EXPANSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{?([A-Z][A-Z0-9_]{2,})\}?").expect("valid regex"));

static EXPORT_ASSIGN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bexport\s+([A-Z][A-Z0-9_]+)=").expect("valid regex"));

/// ALL_CAPS token inside backticks; only promoted when the surrounding prose
/// talks about the environment
static BACKTICK_CAPS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"`([A-Z][A-Z0-9_]{2,})`").expect("valid regex"));

static ENV_CONTEXT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(env|environment|variable|var|export|\.env)\b").expect("valid regex")
});

/// Common ALL_CAPS acronyms that are never environment variables
const CAPS_STOPWORDS: &[&str] = &[
    "API", "CDN", "CLI", "CORS", "CPU", "CSS", "DNS", "GET", "GPU", "HTML", "HTTP", "HTTPS",
    "JSON", "JWT", "LLM", "NOTE", "POST", "PUT", "RAM", "README", "REST", "SDK", "SQL", "SSH",
    "SSL", "TCP", "TLS", "TODO", "UDP", "URI", "URL", "UUID", "XML", "YAML",
];

/// Extract environment variable claims from prose lines.
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

        let mut push = |name: &str, pattern: &'static str, out: &mut Vec<RawExtraction>| {
            if CAPS_STOPWORDS.contains(&name) {
                return;
            }
            out.push(RawExtraction {
                claim_text: claim_text.clone(),
                value: ExtractedValue::EnvironmentVar {
                    name: name.to_string(),
                },
                line_number,
                pattern,
            });
        };

        for caps in PROCESS_ENV.captures_iter(line) {
            push(&caps[1], "process_env", &mut extractions);
        }
        for caps in EXPORT_ASSIGN.captures_iter(line) {
            push(&caps[1], "export_assignment", &mut extractions);
        }
        for caps in SHELL_EXPANSION.captures_iter(line) {
            push(&caps[1], "shell_expansion", &mut extractions);
        }

        if ENV_CONTEXT.is_match(line) {
            for caps in BACKTICK_CAPS.captures_iter(line) {
                // Underscore requirement keeps single acronyms out even when
                // they miss the stopword list
                if caps[1].contains('_') {
                    push(&caps[1], "backtick_env_mention", &mut extractions);
                }
            }
        }
    }

    extractions
}
