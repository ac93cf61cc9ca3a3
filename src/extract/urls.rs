//! URL reference extractor

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use super::ExtractionContext;
use crate::model::{ExtractedValue, PreProcessedDoc, RawExtraction};

static HTTP_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"https?://[^\s<>()\[\]"'`]+"#).expect("valid regex"));

/// Hosts that are placeholders or unreachable by definition
const SKIPPED_HOSTS: &[&str] = &[
    "127.0.0.1",
    "0.0.0.0",
    "localhost",
    "example.com",
    "example.net",
    "example.org",
];

/// Extract URL reference claims from prose lines.
pub fn extract(doc: &PreProcessedDoc, _ctx: &ExtractionContext) -> Vec<RawExtraction> {
    let mut extractions = Vec::new();

    for (i, line) in doc.lines().iter().enumerate() {
        if doc.is_fence_line(i) || doc.is_tag_line(i) {
            continue;
        }
        let line_number = doc.original_line(i);
        let claim_text = line.trim().to_string();

        for m in HTTP_URL.find_iter(line) {
            let raw = m.as_str().trim_end_matches(['.', ',', ';', ':', '!', '?']);

            let parsed = match Url::parse(raw) {
                Ok(u) => u,
                Err(err) => {
                    tracing::debug!(url = raw, error = %err, "Skipping unparseable URL");
                    continue;
                }
            };
            let host = match parsed.host_str() {
                Some(h) => h.to_lowercase(),
                None => continue,
            };
            if SKIPPED_HOSTS.contains(&host.as_str())
                || SKIPPED_HOSTS
                    .iter()
                    .any(|s| host.ends_with(&format!(".{s}")))
            {
                continue;
            }

            extractions.push(RawExtraction {
                claim_text: claim_text.clone(),
                value: ExtractedValue::Url {
                    url: raw.to_string(),
                },
                line_number,
                pattern: "url_reference",
            });
        }
    }

    extractions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DocFormat;
    use crate::preprocess::preprocess;

    fn extract_urls(content: &str) -> Vec<RawExtraction> {
        let doc = preprocess(content, DocFormat::Markdown);
        extract(&doc, &ExtractionContext::new("docs/links.md"))
    }

    fn urls(extractions: &[RawExtraction]) -> Vec<String> {
        extractions
            .iter()
            .map(|e| match &e.value {
                ExtractedValue::Url { url } => url.clone(),
                other => panic!("unexpected value: {other:?}"),
            })
            .collect()
    }

    #[test]
    fn extracts_markdown_and_bare_links() {
        let found =
            extract_urls("See [the docs](https://docs.rs/regex) or https://crates.io/crates/url.");
        assert_eq!(
            urls(&found),
            vec!["https://docs.rs/regex", "https://crates.io/crates/url"]
        );
    }

    #[test]
    fn trailing_punctuation_stripped() {
        let found = extract_urls("More at https://github.com/rust-lang/rust.");
        assert_eq!(urls(&found), vec!["https://github.com/rust-lang/rust"]);
    }

    #[test]
    fn placeholder_hosts_skipped() {
        assert!(extract_urls("Open http://localhost:3000 to verify.").is_empty());
        assert!(extract_urls("Try https://api.example.com/v1/users here.").is_empty());
    }

    #[test]
    fn fenced_urls_skipped() {
        let content = "```\ncurl https://api.github.com/repos\n```";
        assert!(extract_urls(content).is_empty());
    }
}
