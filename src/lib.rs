//! docdrift — claim extraction and tiered verification for documentation
//! drift detection.
//!
//! The crate turns documentation files into typed, checkable claims and
//! verifies them against an indexed codebase:
//!
//! 1. [`preprocess`] cleans a document while keeping a line map back to the
//!    original file.
//! 2. [`extract`] runs the extractor set, validates and deduplicates the raw
//!    matches, and materializes [`model::Claim`]s.
//! 3. [`verify`] pushes each claim through a three-tier cascade: deterministic
//!    index lookups, heuristic pattern checks, then an evidence-grounded LLM
//!    verdict.
//!
//! The codebase index, evidence builder and LLM transport are consumed as
//! traits ([`index::CodebaseIndex`], [`evidence::EvidenceBuilder`],
//! [`llm::LlmProvider`]); this crate owns extraction, prompt construction and
//! response validation, never the storage or the transport.

pub mod evidence;
pub mod extract;
pub mod index;
pub mod llm;
pub mod model;
pub mod preprocess;
pub mod verify;

pub use extract::{extract_claims, ExtractionContext, MaterializeError};
pub use model::{Claim, ClaimType, EngineConfig, VerificationResult, Verdict};
pub use verify::rate_limit::UrlRateLimiter;
pub use verify::{EngineError, VerificationEngine};
