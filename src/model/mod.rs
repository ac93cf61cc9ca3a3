pub mod claim;
pub mod config;
pub mod document;
pub mod verification;

pub use claim::{
    compute_claim_id, Claim, ClaimType, ExtractedValue, RawExtraction, Testability,
    VerificationStatus,
};
pub use config::{EngineConfig, LlmConfig, UrlCheckConfig};
pub use document::{DocFormat, PreProcessedDoc};
pub use verification::{LlmVerdictResponse, Severity, VerificationResult, Verdict};
