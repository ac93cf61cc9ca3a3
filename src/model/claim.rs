//! Claim model: structured, checkable assertions extracted from documentation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Claim families the extraction pipeline can produce.
///
/// `Behavior` is the semantic family: it can only be judged by an LLM and is
/// never emitted by the pattern extractors. It exists so testability and
/// identity-key dispatch stay exhaustive when new families are added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimType {
    PathReference,
    Command,
    DependencyVersion,
    ApiRoute,
    CodeExample,
    UrlReference,
    EnvironmentVar,
    ConfigSetting,
    Convention,
    Behavior,
}

/// Whether a claim can be checked deterministically or only via LLM judgment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Testability {
    Syntactic,
    Semantic,
}

impl Testability {
    /// Testability is a pure function of the claim type
    pub fn for_claim_type(claim_type: ClaimType) -> Self {
        match claim_type {
            ClaimType::PathReference
            | ClaimType::Command
            | ClaimType::DependencyVersion
            | ClaimType::ApiRoute
            | ClaimType::CodeExample
            | ClaimType::UrlReference
            | ClaimType::EnvironmentVar
            | ClaimType::ConfigSetting
            | ClaimType::Convention => Testability::Syntactic,
            ClaimType::Behavior => Testability::Semantic,
        }
    }
}

/// Lifecycle state of a claim with respect to verification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    Pending,
    Verified,
    Drifted,
    Uncertain,
}

/// The semantically-relevant payload of a claim, one variant per claim type.
///
/// Identity keys and keyword generation match exhaustively on this enum, so
/// adding a claim family is a compile-time-enforced change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExtractedValue {
    Path {
        path: String,
    },
    Command {
        runner: String,
        script: Option<String>,
        full_command: String,
    },
    Dependency {
        package: String,
        version: String,
    },
    Route {
        method: String,
        path: String,
    },
    CodeExample {
        language: Option<String>,
        fence_line: u32,
        imports: Vec<String>,
        symbols: Vec<String>,
        commands: Vec<String>,
    },
    Url {
        url: String,
    },
    EnvironmentVar {
        name: String,
    },
    ConfigSetting {
        key: String,
        value: Option<String>,
    },
    Convention {
        statement: String,
    },
    Behavior {
        description: String,
    },
}

impl ExtractedValue {
    /// The claim family this value belongs to
    pub fn claim_type(&self) -> ClaimType {
        match self {
            ExtractedValue::Path { .. } => ClaimType::PathReference,
            ExtractedValue::Command { .. } => ClaimType::Command,
            ExtractedValue::Dependency { .. } => ClaimType::DependencyVersion,
            ExtractedValue::Route { .. } => ClaimType::ApiRoute,
            ExtractedValue::CodeExample { .. } => ClaimType::CodeExample,
            ExtractedValue::Url { .. } => ClaimType::UrlReference,
            ExtractedValue::EnvironmentVar { .. } => ClaimType::EnvironmentVar,
            ExtractedValue::ConfigSetting { .. } => ClaimType::ConfigSetting,
            ExtractedValue::Convention { .. } => ClaimType::Convention,
            ExtractedValue::Behavior { .. } => ClaimType::Behavior,
        }
    }

    /// Canonical identity key used for within-file deduplication and cross-file
    /// comparison.
    ///
    /// Keys are namespaced by claim type, so a route `/users` and a path
    /// `/users` never collide. The dependency key deliberately excludes the
    /// version: two mentions of the same package are the same claim, and the
    /// first occurrence's version wins.
    pub fn identity_key(&self) -> String {
        match self {
            ExtractedValue::Path { path } => format!("path:{path}"),
            ExtractedValue::Command { runner, script, .. } => {
                format!("cmd:{}:{}", runner, script.as_deref().unwrap_or(""))
            }
            ExtractedValue::Dependency { package, .. } => {
                format!("dep:{}", package.to_lowercase())
            }
            ExtractedValue::Route { method, path } => format!("route:{method}:{path}"),
            ExtractedValue::CodeExample { fence_line, .. } => format!("code:{fence_line}"),
            ExtractedValue::Url { url } => format!("url:{url}"),
            ExtractedValue::EnvironmentVar { name } => format!("env:{name}"),
            ExtractedValue::ConfigSetting { key, .. } => format!("config:{key}"),
            ExtractedValue::Convention { statement } => {
                format!("convention:{}", short_digest(statement))
            }
            ExtractedValue::Behavior { description } => {
                format!("behavior:{}", short_digest(description))
            }
        }
    }
}

/// A raw candidate extraction, ephemeral within one extraction pass
#[derive(Debug, Clone)]
pub struct RawExtraction {
    /// The documentation text the claim was read from
    pub claim_text: String,
    /// Typed payload; the claim type is derived from the variant
    pub value: ExtractedValue,
    /// 1-based line number in the *original* document
    pub line_number: u32,
    /// Name of the pattern that produced this candidate
    pub pattern: &'static str,
}

impl RawExtraction {
    pub fn claim_type(&self) -> ClaimType {
        self.value.claim_type()
    }
}

/// The durable unit of the pipeline: a materialized, verifiable claim
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claim {
    /// Stable id derived from repo, source file and identity key
    pub id: String,
    pub repo_id: String,
    pub source_file: String,
    /// 1-based line number in the original document
    pub line_number: u32,
    pub claim_text: String,
    pub claim_type: ClaimType,
    pub testability: Testability,
    pub value: ExtractedValue,
    /// Search terms for evidence assembly
    pub keywords: Vec<String>,
    pub extraction_confidence: f64,
    pub extraction_method: String,
    pub verification_status: VerificationStatus,
    pub created_at: DateTime<Utc>,
}

impl Claim {
    /// Canonical identity key (see [`ExtractedValue::identity_key`])
    pub fn identity_key(&self) -> String {
        self.value.identity_key()
    }
}

/// Compute a stable claim id from repo, source file and identity key
pub fn compute_claim_id(repo_id: &str, source_file: &str, identity_key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(repo_id.as_bytes());
    hasher.update(b"/");
    hasher.update(source_file.as_bytes());
    hasher.update(b"/");
    hasher.update(identity_key.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Short content digest for claim families keyed by free text
fn short_digest(text: &str) -> String {
    let normalized: String = text
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let mut hasher = Sha256::new();
    hasher.update(normalized.as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    digest[..16].to_string()
}
