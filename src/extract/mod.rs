//! Claim extraction pipeline
//!
//! Runs the extractor set over a preprocessed document, validates and
//! deduplicates the raw matches, and materializes them into claims. The whole
//! pipeline is synchronous and side-effect-free; callers parallelize across
//! files if they want to.

mod blocks;
pub mod code_examples;
pub mod commands;
pub mod config_keys;
pub mod conventions;
pub mod dedupe;
pub mod dependencies;
pub mod environment;
pub mod keywords;
pub mod paths;
pub mod routes;
pub mod tables;
pub mod urls;
pub mod validation;

use std::collections::HashSet;

use chrono::Utc;
use thiserror::Error;

use crate::model::{
    compute_claim_id, Claim, DocFormat, EngineConfig, ExtractedValue, PreProcessedDoc,
    RawExtraction, Testability, VerificationStatus,
};
use crate::preprocess::preprocess;

/// Per-file extraction settings shared by all extractors
pub struct ExtractionContext<'a> {
    /// Repo-relative path of the document being scanned
    pub source_file: &'a str,
    /// Known dependency names, lowercased, from the target repo's manifests
    pub known_packages: HashSet<String>,
    /// Claim text cap in bytes
    pub max_claim_text_len: usize,
}

impl<'a> ExtractionContext<'a> {
    pub fn new(source_file: &'a str) -> Self {
        Self {
            source_file,
            known_packages: HashSet::new(),
            max_claim_text_len: EngineConfig::default().max_claim_text_len,
        }
    }

    pub fn with_known_packages<S: AsRef<str>>(mut self, packages: &[S]) -> Self {
        self.known_packages = packages
            .iter()
            .map(|p| p.as_ref().to_lowercase())
            .collect();
        self
    }

    pub fn with_max_claim_text_len(mut self, max: usize) -> Self {
        self.max_claim_text_len = max;
        self
    }

    pub fn is_known_package(&self, name: &str) -> bool {
        self.known_packages.contains(&name.to_lowercase())
    }
}

/// Raised when an extractor hands the materializer a value it should never
/// produce; every variant is a bug in the extractor, not in the document
#[derive(Debug, Error)]
pub enum MaterializeError {
    #[error("extraction at line {line} has empty claim text")]
    EmptyClaimText { line: u32 },
    #[error("extractor produced a semantic value for pattern '{pattern}'")]
    SemanticValueFromExtractor { pattern: &'static str },
}

/// Extract all claims from one documentation file.
///
/// Binary, empty, oversize and reStructuredText inputs yield an empty claim
/// list rather than an error; drift scanning treats them as out of scope.
pub fn extract_claims(
    repo_id: &str,
    source_file: &str,
    content: &str,
    config: &EngineConfig,
    known_packages: &[String],
) -> Vec<Claim> {
    let format = DocFormat::from_path(source_file);

    if content.contains('\0') {
        tracing::debug!(file = source_file, "Skipping binary document");
        return Vec::new();
    }
    if content.trim().is_empty() {
        tracing::debug!(file = source_file, "Skipping empty document");
        return Vec::new();
    }
    if content.len() > config.max_document_bytes {
        tracing::debug!(
            file = source_file,
            bytes = content.len(),
            "Skipping oversize document"
        );
        return Vec::new();
    }
    if format == DocFormat::Rst {
        tracing::debug!(file = source_file, "Skipping reStructuredText document");
        return Vec::new();
    }

    let doc = preprocess(content, format);
    let ctx = ExtractionContext {
        source_file,
        known_packages: known_packages.iter().map(|p| p.to_lowercase()).collect(),
        max_claim_text_len: config.max_claim_text_len,
    };

    let raw = run_extractors(&doc, &ctx);
    let deduped = dedupe::deduplicate_within_file(raw);

    let mut claims = Vec::with_capacity(deduped.len());
    for extraction in deduped {
        match materialize(repo_id, source_file, extraction, ctx.max_claim_text_len) {
            Ok(claim) => claims.push(claim),
            Err(err) => {
                tracing::error!(file = source_file, error = %err, "Dropping invalid extraction");
            }
        }
    }

    tracing::debug!(
        file = source_file,
        claims = claims.len(),
        "Extracted claims"
    );
    claims
}

fn run_extractors(doc: &PreProcessedDoc, ctx: &ExtractionContext) -> Vec<RawExtraction> {
    let mut raw = Vec::new();
    raw.extend(paths::extract(doc, ctx));
    raw.extend(commands::extract(doc, ctx));
    raw.extend(dependencies::extract(doc, ctx));
    raw.extend(routes::extract(doc, ctx));
    raw.extend(code_examples::extract(doc, ctx));
    raw.extend(urls::extract(doc, ctx));
    raw.extend(environment::extract(doc, ctx));
    raw.extend(config_keys::extract(doc, ctx));
    raw.extend(conventions::extract(doc, ctx));
    raw.extend(tables::extract(doc, ctx));
    raw
}

/// Turn one validated extraction into a full claim record.
pub fn materialize(
    repo_id: &str,
    source_file: &str,
    extraction: RawExtraction,
    max_claim_text_len: usize,
) -> Result<Claim, MaterializeError> {
    if extraction.claim_text.trim().is_empty() {
        return Err(MaterializeError::EmptyClaimText {
            line: extraction.line_number,
        });
    }
    if matches!(extraction.value, ExtractedValue::Behavior { .. }) {
        return Err(MaterializeError::SemanticValueFromExtractor {
            pattern: extraction.pattern,
        });
    }

    let claim_type = extraction.claim_type();
    let identity_key = extraction.value.identity_key();
    let keywords = keywords::generate_keywords(&extraction.value);

    let mut claim_text = extraction.claim_text;
    if claim_text.len() > max_claim_text_len {
        claim_text = truncate_at_char_boundary(&claim_text, max_claim_text_len);
    }

    Ok(Claim {
        id: compute_claim_id(repo_id, source_file, &identity_key),
        repo_id: repo_id.to_string(),
        source_file: source_file.to_string(),
        line_number: extraction.line_number,
        claim_text,
        claim_type,
        testability: Testability::for_claim_type(claim_type),
        value: extraction.value,
        keywords,
        extraction_confidence: 1.0,
        extraction_method: "regex".to_string(),
        verification_status: VerificationStatus::Pending,
        created_at: Utc::now(),
    })
}

/// Truncate to at most `max` bytes without splitting a UTF-8 sequence
pub(crate) fn truncate_at_char_boundary(text: &str, max: usize) -> String {
    let mut end = max.min(text.len());
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }
    text[..end].to_string()
}
