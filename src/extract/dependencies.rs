//! Dependency version extractor

use once_cell::sync::Lazy;
use regex::Regex;

use super::ExtractionContext;
use crate::model::{ExtractedValue, PreProcessedDoc, RawExtraction};

/// `package 1.2.3` style mention; the word is validated against the known
/// package set to keep prose numbers ("Section 2.1") out
static NAME_VERSION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|[\s`(])(@?[A-Za-z][A-Za-z0-9_./@-]*?)[\s@]+v?(\d+\.\d+(?:\.\d+)?(?:-[0-9A-Za-z.]+)?)\b")
        .expect("valid regex")
});

/// Runtime version mention (`Node.js 20`, `Python 3.12`); always accepted
static RUNTIME_VERSION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(Node\.js|Node|Python|Rust|Go|Java|Ruby|PHP|Deno|Bun)\s+v?(\d+(?:\.\d+){0,2})\b")
        .expect("valid regex")
});

/// Extract dependency version claims from prose.
///
/// Non-runtime candidates must name a package the caller knows about
/// (case-insensitive) or they are discarded as prose noise.
pub fn extract(doc: &PreProcessedDoc, ctx: &ExtractionContext) -> Vec<RawExtraction> {
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

        let mut matched_spans: Vec<(usize, usize)> = Vec::new();

        for caps in RUNTIME_VERSION.captures_iter(line) {
            let (Some(whole), Some(name), Some(version)) =
                (caps.get(0), caps.get(1), caps.get(2))
            else {
                continue;
            };
            matched_spans.push((whole.start(), whole.end()));

            extractions.push(RawExtraction {
                claim_text: claim_text.clone(),
                value: ExtractedValue::Dependency {
                    package: normalize_runtime(name.as_str()),
                    version: version.as_str().to_string(),
                },
                line_number,
                pattern: "runtime_version",
            });
        }

        for caps in NAME_VERSION.captures_iter(line) {
            let Some(whole) = caps.get(0) else { continue };
            // Runtime matches already consumed this span
            if matched_spans
                .iter()
                .any(|(s, e)| whole.start() < *e && whole.end() > *s)
            {
                continue;
            }

            let package = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
            let version = caps.get(2).map(|m| m.as_str()).unwrap_or_default();

            if !ctx.is_known_package(package) {
                tracing::debug!(
                    package = package,
                    line = line_number,
                    "Skipping version mention for unknown package"
                );
                continue;
            }

            extractions.push(RawExtraction {
                claim_text: claim_text.clone(),
                value: ExtractedValue::Dependency {
                    package: package.to_string(),
                    version: version.to_string(),
                },
                line_number,
                pattern: "dependency_version",
            });
        }
    }

    extractions
}

fn normalize_runtime(name: &str) -> String {
    match name {
        "Node.js" | "Node" => "node".to_string(),
        other => other.to_lowercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DocFormat;
    use crate::preprocess::preprocess;

    fn extract_deps(content: &str, known: &[&str]) -> Vec<RawExtraction> {
        let doc = preprocess(content, DocFormat::Markdown);
        let ctx = ExtractionContext::new("docs/setup.md").with_known_packages(known);
        extract(&doc, &ctx)
    }

    fn dep(extraction: &RawExtraction) -> (String, String) {
        match &extraction.value {
            ExtractedValue::Dependency { package, version } => {
                (package.clone(), version.clone())
            }
            other => panic!("unexpected value: {other:?}"),
        }
    }

    #[test]
    fn extracts_known_package_version() {
        let found = extract_deps("Uses React 18.2.0 under the hood.", &["react"]);
        assert_eq!(found.len(), 1);
        assert_eq!(dep(&found[0]), ("React".to_string(), "18.2.0".to_string()));
    }

    #[test]
    fn known_package_match_is_case_insensitive() {
        let found = extract_deps("We pin express 4.18.0 here.", &["Express"]);
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn rejects_prose_numbers() {
        let found = extract_deps("See Section 2.1 for details.", &["react"]);
        assert!(found.is_empty());
    }

    #[test]
    fn runtime_versions_always_accepted() {
        let found = extract_deps("Requires Node.js 20 and Python 3.12.", &[]);
        assert_eq!(found.len(), 2);
        assert_eq!(dep(&found[0]).0, "node");
        assert_eq!(dep(&found[1]), ("python".to_string(), "3.12".to_string()));
    }

    #[test]
    fn scoped_packages_supported() {
        let found = extract_deps(
            "Built on @tanstack/react-query 5.0.0.",
            &["@tanstack/react-query"],
        );
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn skips_fenced_lines() {
        let content = "```\nreact 18.2.0\n```";
        assert!(extract_deps(content, &["react"]).is_empty());
    }
}
