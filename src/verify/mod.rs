//! Tiered verification cascade.
//!
//! Claims are checked by the cheapest tier that can judge them: deterministic
//! index lookups first, heuristic pattern checks second, an evidence-grounded
//! LLM verdict last. The first tier that produces an outcome wins; a claim no
//! tier can judge yields no result at all, which callers must keep distinct
//! from an explicit uncertain verdict.

pub mod rate_limit;

mod prompts;
mod tier1;
mod tier2;
mod tier3;
mod validation;
mod version;

use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;

use crate::evidence::EvidenceBuilder;
use crate::index::CodebaseIndex;
use crate::llm::LlmProvider;
use crate::model::{
    Claim, EngineConfig, Severity, Testability, VerificationResult, Verdict,
};
use rate_limit::UrlRateLimiter;

/// What one tier concluded about one claim; the engine adds identity and
/// timing when turning it into a result
#[derive(Debug, Clone)]
pub(crate) struct TierOutcome {
    pub verdict: Verdict,
    pub confidence: f64,
    pub severity: Option<Severity>,
    pub reasoning: String,
    pub specific_mismatch: Option<String>,
    pub suggested_fix: Option<String>,
    pub evidence_files: Vec<String>,
    pub tier: u8,
    pub token_cost: u64,
}

impl TierOutcome {
    /// Tier-1 outcome: full confidence, no token cost
    pub(crate) fn deterministic(verdict: Verdict, reasoning: String) -> Self {
        Self {
            verdict,
            confidence: 1.0,
            severity: None,
            reasoning,
            specific_mismatch: None,
            suggested_fix: None,
            evidence_files: Vec::new(),
            tier: 1,
            token_cost: 0,
        }
    }

    /// Tier-2 outcome: heuristic confidence, no token cost
    pub(crate) fn pattern(verdict: Verdict, confidence: f64, reasoning: String) -> Self {
        Self {
            confidence,
            tier: 2,
            ..Self::deterministic(verdict, reasoning)
        }
    }

    /// Tier-3 outcome carrying the summed token cost of all attempts
    pub(crate) fn llm(
        verdict: Verdict,
        confidence: f64,
        reasoning: String,
        token_cost: u64,
    ) -> Self {
        Self {
            confidence,
            tier: 3,
            token_cost,
            ..Self::deterministic(verdict, reasoning)
        }
    }

    pub(crate) fn drifted(mut self, severity: Severity, mismatch: String) -> Self {
        self.severity = Some(severity);
        self.specific_mismatch = Some(mismatch);
        self
    }

    pub(crate) fn with_fix(mut self, fix: String) -> Self {
        self.suggested_fix = Some(fix);
        self
    }

    pub(crate) fn with_evidence(mut self, files: Vec<String>) -> Self {
        self.evidence_files = files;
        self
    }

    fn into_result(self, claim: &Claim, elapsed: Duration) -> VerificationResult {
        VerificationResult {
            claim_id: claim.id.clone(),
            verdict: self.verdict,
            confidence: self.confidence,
            severity: self.severity,
            reasoning: self.reasoning,
            specific_mismatch: self.specific_mismatch,
            suggested_fix: self.suggested_fix,
            evidence_files: self.evidence_files,
            tier: self.tier,
            token_cost: self.token_cost,
            duration_ms: elapsed.as_millis() as u64,
        }
    }
}

const USER_AGENT: &str = concat!("docdrift/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Drives the verification cascade for one scan.
///
/// Claims are verified sequentially; the caller owns the [`UrlRateLimiter`]
/// and resets it between scans.
pub struct VerificationEngine {
    index: Arc<dyn CodebaseIndex>,
    evidence_builder: Option<Arc<dyn EvidenceBuilder>>,
    llm: Option<Arc<dyn LlmProvider>>,
    config: EngineConfig,
    http: reqwest::Client,
}

impl VerificationEngine {
    pub fn new(index: Arc<dyn CodebaseIndex>, config: EngineConfig) -> Result<Self, EngineError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.url_check.timeout_secs))
            .build()?;

        Ok(Self {
            index,
            evidence_builder: None,
            llm: None,
            config,
            http,
        })
    }

    /// Enable Tier 3; without this the cascade stops after Tier 2
    pub fn with_llm(
        mut self,
        evidence_builder: Arc<dyn EvidenceBuilder>,
        llm: Arc<dyn LlmProvider>,
    ) -> Self {
        self.evidence_builder = Some(evidence_builder);
        self.llm = Some(llm);
        self
    }

    /// A fresh limiter sized from this engine's configuration
    pub fn new_rate_limiter(&self) -> UrlRateLimiter {
        UrlRateLimiter::new(self.config.url_check.per_host_limit)
    }

    /// Verify one claim through the cascade.
    ///
    /// `None` means no tier was eligible or the LLM contract failed; it is
    /// not a verdict.
    pub async fn verify(
        &self,
        claim: &Claim,
        limiter: &mut UrlRateLimiter,
    ) -> Option<VerificationResult> {
        let started = Instant::now();
        let outcome = self.run_cascade(claim, limiter).await?;

        let result = outcome.into_result(claim, started.elapsed());
        tracing::debug!(
            claim_id = %claim.id,
            verdict = ?result.verdict,
            tier = result.tier,
            duration_ms = result.duration_ms,
            "Claim verified"
        );
        Some(result)
    }

    async fn run_cascade(
        &self,
        claim: &Claim,
        limiter: &mut UrlRateLimiter,
    ) -> Option<TierOutcome> {
        if claim.testability == Testability::Syntactic {
            if let Some(outcome) = tier1::verify(
                claim,
                self.index.as_ref(),
                &self.http,
                &self.config.url_check,
                limiter,
            )
            .await
            {
                return Some(outcome);
            }
            if let Some(outcome) = tier2::verify(claim, self.index.as_ref()).await {
                return Some(outcome);
            }
        }

        let (Some(builder), Some(llm)) = (&self.evidence_builder, &self.llm) else {
            return None;
        };
        tier3::verify(claim, builder.as_ref(), llm.as_ref(), &self.config.llm).await
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::{HashMap, HashSet};

    use async_trait::async_trait;

    use crate::index::{
        CodebaseIndex, DependencySource, IndexedEntity, IndexedRoute, ResolvedDependency,
    };

    /// In-memory index for cascade tests
    #[derive(Default)]
    pub(crate) struct MockIndex {
        files: HashSet<String>,
        routes: HashMap<(String, String), IndexedRoute>,
        dependencies: HashMap<String, ResolvedDependency>,
        scripts: HashSet<String>,
        symbols: HashMap<String, Vec<IndexedEntity>>,
        semantic_hits: Vec<IndexedEntity>,
    }

    impl MockIndex {
        pub fn with_file(mut self, path: &str) -> Self {
            self.files.insert(path.to_string());
            self
        }

        pub fn with_route(mut self, method: &str, path: &str, source_file: &str) -> Self {
            self.routes.insert(
                (method.to_string(), path.to_string()),
                IndexedRoute {
                    method: method.to_string(),
                    path: path.to_string(),
                    source_file: source_file.to_string(),
                },
            );
            self
        }

        pub fn with_lockfile_dependency(mut self, package: &str, version: &str) -> Self {
            self.dependencies.insert(
                package.to_string(),
                ResolvedDependency {
                    version: version.to_string(),
                    source: DependencySource::Lockfile,
                },
            );
            self
        }

        pub fn with_manifest_dependency(mut self, package: &str, version: &str) -> Self {
            self.dependencies.insert(
                package.to_string(),
                ResolvedDependency {
                    version: version.to_string(),
                    source: DependencySource::Manifest,
                },
            );
            self
        }

        pub fn with_script(mut self, name: &str) -> Self {
            self.scripts.insert(name.to_string());
            self
        }

        pub fn with_symbol(mut self, name: &str, file: &str, line: u32) -> Self {
            self.symbols
                .entry(name.to_string())
                .or_default()
                .push(IndexedEntity {
                    name: name.to_string(),
                    file: file.to_string(),
                    line,
                });
            self
        }

        pub fn with_semantic_hit(mut self, file: &str) -> Self {
            self.semantic_hits.push(IndexedEntity {
                name: String::new(),
                file: file.to_string(),
                line: 0,
            });
            self
        }
    }

    #[async_trait]
    impl CodebaseIndex for MockIndex {
        async fn file_exists(&self, path: &str) -> bool {
            self.files.contains(path)
        }

        async fn find_route(&self, method: &str, path: &str) -> Option<IndexedRoute> {
            self.routes
                .get(&(method.to_string(), path.to_string()))
                .cloned()
        }

        async fn dependency_version(&self, package: &str) -> Option<ResolvedDependency> {
            self.dependencies.get(&package.to_lowercase()).cloned()
        }

        async fn script_exists(&self, name: &str) -> bool {
            self.scripts.contains(name)
        }

        async fn find_symbol(&self, name: &str) -> Vec<IndexedEntity> {
            self.symbols.get(name).cloned().unwrap_or_default()
        }

        async fn search_semantic(&self, _query: &str, top_k: usize) -> Vec<IndexedEntity> {
            self.semantic_hits.iter().take(top_k).cloned().collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::testing::MockIndex;
    use super::*;
    use crate::model::{ExtractedValue, RawExtraction};

    fn claim(value: ExtractedValue) -> Claim {
        let raw = RawExtraction {
            claim_text: "doc statement".to_string(),
            value,
            line_number: 1,
            pattern: "test_only",
        };
        crate::extract::materialize("repo", "docs/guide.md", raw, 300).expect("claim")
    }

    fn engine(index: MockIndex) -> VerificationEngine {
        VerificationEngine::new(Arc::new(index), EngineConfig::default()).expect("engine")
    }

    #[tokio::test]
    async fn tier1_short_circuits_for_paths() {
        let engine = engine(MockIndex::default().with_file("src/lib.rs"));
        let mut limiter = engine.new_rate_limiter();
        let claim = claim(ExtractedValue::Path {
            path: "src/lib.rs".to_string(),
        });
        let result = engine.verify(&claim, &mut limiter).await.expect("result");
        assert_eq!(result.verdict, Verdict::Verified);
        assert_eq!(result.tier, 1);
        assert_eq!(result.token_cost, 0);
        assert_eq!(result.claim_id, claim.id);
    }

    #[tokio::test]
    async fn env_claims_reach_tier2() {
        let engine = engine(MockIndex::default().with_symbol("API_KEY", "src/env.ts", 2));
        let mut limiter = engine.new_rate_limiter();
        let claim = claim(ExtractedValue::EnvironmentVar {
            name: "API_KEY".to_string(),
        });
        let result = engine.verify(&claim, &mut limiter).await.expect("result");
        assert_eq!(result.tier, 2);
        assert_eq!(result.verdict, Verdict::Verified);
    }

    #[tokio::test]
    async fn ineligible_claim_yields_no_result() {
        // A plain CLI invocation has no deterministic anchor and no LLM is
        // configured, so the cascade produces nothing
        let engine = engine(MockIndex::default());
        let mut limiter = engine.new_rate_limiter();
        let claim = claim(ExtractedValue::Command {
            runner: "cargo".to_string(),
            script: Some("build".to_string()),
            full_command: "cargo build".to_string(),
        });
        assert!(engine.verify(&claim, &mut limiter).await.is_none());
    }

    #[tokio::test]
    async fn semantic_claim_without_llm_yields_no_result() {
        let engine = engine(MockIndex::default());
        let mut limiter = engine.new_rate_limiter();
        let mut claim = claim(ExtractedValue::Convention {
            statement: "responses are cached".to_string(),
        });
        claim.value = ExtractedValue::Behavior {
            description: "responses are cached".to_string(),
        };
        claim.testability = Testability::Semantic;
        assert!(engine.verify(&claim, &mut limiter).await.is_none());
    }

    #[tokio::test]
    async fn manifest_fallback_is_cited() {
        let engine = engine(MockIndex::default().with_manifest_dependency("vite", "5.0.0"));
        let mut limiter = engine.new_rate_limiter();
        let claim = claim(ExtractedValue::Dependency {
            package: "vite".to_string(),
            version: "4.0.0".to_string(),
        });
        let result = engine.verify(&claim, &mut limiter).await.expect("result");
        assert_eq!(result.verdict, Verdict::Drifted);
        assert!(result.specific_mismatch.expect("mismatch").contains("manifest"));
    }
}
