//! Tier 1: deterministic checks against the codebase index

use url::Url;

use super::rate_limit::UrlRateLimiter;
use super::version::versions_compatible;
use super::TierOutcome;
use crate::index::{CodebaseIndex, DependencySource};
use crate::model::{Claim, ExtractedValue, Severity, UrlCheckConfig, Verdict};

/// Package managers whose `run <script>` commands resolve against the
/// target's script table
const SCRIPT_RUNNERS: &[&str] = &["bun", "npm", "pnpm", "yarn"];

/// Import targets that name a runtime builtin rather than a dependency
const BUILTIN_MODULES: &[&str] = &[
    "assert", "buffer", "child_process", "collections", "crypto", "dataclasses", "datetime",
    "events", "fs", "http", "https", "io", "json", "logging", "net", "os", "path", "pathlib",
    "process", "re", "stream", "subprocess", "sys", "typing", "url", "util", "zlib",
];

/// Run the deterministic check for one syntactic claim.
///
/// Returns `None` when no checker covers the claim's shape; the cascade then
/// falls through to later tiers.
pub(crate) async fn verify(
    claim: &Claim,
    index: &dyn CodebaseIndex,
    http: &reqwest::Client,
    url_config: &UrlCheckConfig,
    limiter: &mut UrlRateLimiter,
) -> Option<TierOutcome> {
    match &claim.value {
        ExtractedValue::Path { path } => Some(check_path(path, index).await),
        ExtractedValue::Command {
            runner,
            script,
            full_command,
        } => check_command(runner, script.as_deref(), full_command, index).await,
        ExtractedValue::Dependency { package, version } => {
            Some(check_dependency(package, version, index).await)
        }
        ExtractedValue::Route { method, path } => Some(check_route(method, path, index).await),
        ExtractedValue::CodeExample {
            imports, symbols, ..
        } => check_code_example(imports, symbols, index).await,
        ExtractedValue::Url { url } => Some(check_url(url, http, url_config, limiter).await),
        _ => None,
    }
}

async fn check_path(path: &str, index: &dyn CodebaseIndex) -> TierOutcome {
    if index.file_exists(path).await {
        TierOutcome::deterministic(
            Verdict::Verified,
            format!("{path} exists in the repository"),
        )
        .with_evidence(vec![path.to_string()])
    } else {
        TierOutcome::deterministic(Verdict::Drifted, format!("{path} does not exist"))
            .drifted(Severity::High, format!("referenced file {path} not found"))
    }
}

async fn check_command(
    runner: &str,
    script: Option<&str>,
    full_command: &str,
    index: &dyn CodebaseIndex,
) -> Option<TierOutcome> {
    // Only `npm run <script>`-shaped commands resolve deterministically;
    // arbitrary CLI invocations have nothing to check against
    if !SCRIPT_RUNNERS.contains(&runner) {
        return None;
    }
    let is_run = full_command.split_whitespace().nth(1) == Some("run");
    if !is_run {
        return None;
    }
    let script = script?;

    if index.script_exists(script).await {
        Some(TierOutcome::deterministic(
            Verdict::Verified,
            format!("script '{script}' is defined"),
        ))
    } else {
        Some(
            TierOutcome::deterministic(
                Verdict::Drifted,
                format!("script '{script}' is not defined"),
            )
            .drifted(
                Severity::High,
                format!("`{full_command}` refers to a script that no longer exists"),
            ),
        )
    }
}

async fn check_dependency(package: &str, version: &str, index: &dyn CodebaseIndex) -> TierOutcome {
    let Some(resolved) = index.dependency_version(package).await else {
        return TierOutcome::deterministic(
            Verdict::Drifted,
            format!("{package} is not a dependency of this project"),
        )
        .drifted(
            Severity::Medium,
            format!("{package} not found in manifest or lockfile"),
        );
    };

    let source = match resolved.source {
        DependencySource::Lockfile => "lockfile",
        DependencySource::Manifest => "manifest",
    };

    if versions_compatible(version, &resolved.version) {
        TierOutcome::deterministic(
            Verdict::Verified,
            format!(
                "documented {package} {version} matches {} from the {source}",
                resolved.version
            ),
        )
    } else {
        TierOutcome::deterministic(
            Verdict::Drifted,
            format!("documented {package} {version} does not match the {source}"),
        )
        .drifted(
            Severity::Medium,
            format!("installed version is {} ({source})", resolved.version),
        )
        .with_fix(format!("update the documented version to {}", resolved.version))
    }
}

async fn check_route(method: &str, path: &str, index: &dyn CodebaseIndex) -> TierOutcome {
    let normalized = normalize_route_path(path);
    match index.find_route(method, &normalized).await {
        Some(route) => TierOutcome::deterministic(
            Verdict::Verified,
            format!("{method} {path} is registered"),
        )
        .with_evidence(vec![route.source_file]),
        None => TierOutcome::deterministic(
            Verdict::Drifted,
            format!("{method} {path} is not registered"),
        )
        .drifted(
            Severity::High,
            format!("no handler found for {method} {path}"),
        ),
    }
}

async fn check_code_example(
    imports: &[String],
    symbols: &[String],
    index: &dyn CodebaseIndex,
) -> Option<TierOutcome> {
    let mut missing = Vec::new();
    let mut checked_any = false;

    for import in imports {
        let Some(package) = import_package(import) else {
            continue;
        };
        checked_any = true;
        if index.dependency_version(&package).await.is_none() {
            missing.push(package);
        }
    }

    if !missing.is_empty() {
        return Some(
            TierOutcome::deterministic(
                Verdict::Drifted,
                format!("example imports packages that are not dependencies: {missing:?}"),
            )
            .drifted(
                Severity::Medium,
                format!("missing dependencies: {}", missing.join(", ")),
            ),
        );
    }
    if checked_any {
        return Some(TierOutcome::deterministic(
            Verdict::Verified,
            "all example imports resolve to project dependencies".to_string(),
        ));
    }

    if symbols.is_empty() {
        return None;
    }

    let mut evidence = Vec::new();
    for symbol in symbols {
        for entity in index.find_symbol(symbol).await {
            if !evidence.contains(&entity.file) {
                evidence.push(entity.file);
            }
        }
    }

    if evidence.is_empty() {
        Some(TierOutcome::deterministic(
            Verdict::Uncertain,
            "no example symbol was found in the codebase".to_string(),
        ))
    } else {
        Some(
            TierOutcome::deterministic(
                Verdict::Verified,
                "example symbols are present in the codebase".to_string(),
            )
            .with_evidence(evidence),
        )
    }
}

async fn check_url(
    url: &str,
    http: &reqwest::Client,
    _config: &UrlCheckConfig,
    limiter: &mut UrlRateLimiter,
) -> TierOutcome {
    let host = Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string));
    let Some(host) = host else {
        return TierOutcome::deterministic(
            Verdict::Uncertain,
            format!("{url} could not be parsed"),
        );
    };

    if !limiter.try_acquire(&host) {
        return TierOutcome::deterministic(
            Verdict::Uncertain,
            format!("per-host check budget for {host} exhausted this scan"),
        );
    }

    match http.head(url).send().await {
        Ok(response) => {
            let status = response.status();
            if status.as_u16() == 404 || status.as_u16() == 410 {
                TierOutcome::deterministic(Verdict::Drifted, format!("{url} returned {status}"))
                    .drifted(Severity::Low, format!("link target is gone ({status})"))
            } else if status.is_server_error() || status.as_u16() == 429 {
                TierOutcome::deterministic(
                    Verdict::Uncertain,
                    format!("{url} returned {status}; reachability unclear"),
                )
            } else {
                TierOutcome::deterministic(Verdict::Verified, format!("{url} is reachable"))
            }
        }
        Err(err) => TierOutcome::deterministic(
            Verdict::Uncertain,
            format!("request to {url} failed: {err}"),
        ),
    }
}

/// Normalize `:id` / `{id}` placeholders so doc and index notations match
pub(crate) fn normalize_route_path(path: &str) -> String {
    path.split('/')
        .map(|segment| {
            if segment.starts_with(':')
                || (segment.starts_with('{') && segment.ends_with('}') && segment.len() > 2)
            {
                ":param"
            } else {
                segment
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn import_package(import: &str) -> Option<String> {
    if import.starts_with('.') || import.starts_with('/') {
        return None;
    }
    let import = import.strip_prefix("node:").unwrap_or(import);

    let mut parts = import.split('/');
    let first = parts.next()?;
    let package = if first.starts_with('@') {
        format!("{first}/{}", parts.next()?)
    } else {
        first.split('.').next().unwrap_or(first).to_string()
    };

    if BUILTIN_MODULES.contains(&package.as_str()) {
        return None;
    }
    Some(package)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RawExtraction;
    use crate::verify::testing::MockIndex;

    fn claim(value: ExtractedValue) -> Claim {
        let raw = RawExtraction {
            claim_text: "doc statement".to_string(),
            value,
            line_number: 1,
            pattern: "test_only",
        };
        crate::extract::materialize("repo", "docs/readme-notes.md", raw, 300).expect("claim")
    }

    fn http() -> reqwest::Client {
        reqwest::Client::new()
    }

    #[tokio::test]
    async fn existing_path_verifies() {
        let index = MockIndex::default().with_file("src/auth/handler.ts");
        let claim = claim(ExtractedValue::Path {
            path: "src/auth/handler.ts".to_string(),
        });
        let mut limiter = UrlRateLimiter::new(5);
        let outcome = verify(
            &claim,
            &index,
            &http(),
            &UrlCheckConfig::default(),
            &mut limiter,
        )
        .await
        .expect("outcome");
        assert_eq!(outcome.verdict, Verdict::Verified);
        assert_eq!(outcome.confidence, 1.0);
        assert_eq!(outcome.evidence_files, vec!["src/auth/handler.ts"]);
    }

    #[tokio::test]
    async fn missing_path_drifts_high() {
        let index = MockIndex::default();
        let claim = claim(ExtractedValue::Path {
            path: "src/gone.ts".to_string(),
        });
        let mut limiter = UrlRateLimiter::new(5);
        let outcome = verify(
            &claim,
            &index,
            &http(),
            &UrlCheckConfig::default(),
            &mut limiter,
        )
        .await
        .expect("outcome");
        assert_eq!(outcome.verdict, Verdict::Drifted);
        assert_eq!(outcome.severity, Some(Severity::High));
        assert!(outcome.specific_mismatch.is_some());
    }

    #[tokio::test]
    async fn lockfile_version_cited_on_drift() {
        let index = MockIndex::default().with_lockfile_dependency("react", "19.0.0");
        let claim = claim(ExtractedValue::Dependency {
            package: "react".to_string(),
            version: "18.2.0".to_string(),
        });
        let mut limiter = UrlRateLimiter::new(5);
        let outcome = verify(
            &claim,
            &index,
            &http(),
            &UrlCheckConfig::default(),
            &mut limiter,
        )
        .await
        .expect("outcome");
        assert_eq!(outcome.verdict, Verdict::Drifted);
        assert_eq!(outcome.severity, Some(Severity::Medium));
        let mismatch = outcome.specific_mismatch.expect("mismatch");
        assert!(mismatch.contains("19.0.0"));
        assert!(mismatch.contains("lockfile"));
    }

    #[tokio::test]
    async fn loose_doc_version_verifies() {
        let index = MockIndex::default().with_lockfile_dependency("react", "18.2.0");
        let claim = claim(ExtractedValue::Dependency {
            package: "react".to_string(),
            version: "18".to_string(),
        });
        let mut limiter = UrlRateLimiter::new(5);
        let outcome = verify(
            &claim,
            &index,
            &http(),
            &UrlCheckConfig::default(),
            &mut limiter,
        )
        .await
        .expect("outcome");
        assert_eq!(outcome.verdict, Verdict::Verified);
    }

    #[tokio::test]
    async fn run_script_checked_plain_invocation_skipped() {
        let index = MockIndex::default().with_script("build");
        let mut limiter = UrlRateLimiter::new(5);

        let run = claim(ExtractedValue::Command {
            runner: "npm".to_string(),
            script: Some("build".to_string()),
            full_command: "npm run build".to_string(),
        });
        let outcome = verify(&run, &index, &http(), &UrlCheckConfig::default(), &mut limiter)
            .await
            .expect("outcome");
        assert_eq!(outcome.verdict, Verdict::Verified);

        let plain = claim(ExtractedValue::Command {
            runner: "cargo".to_string(),
            script: Some("build".to_string()),
            full_command: "cargo build".to_string(),
        });
        assert!(
            verify(&plain, &index, &http(), &UrlCheckConfig::default(), &mut limiter)
                .await
                .is_none()
        );
    }

    #[tokio::test]
    async fn route_lookup_normalizes_parameters() {
        let index = MockIndex::default().with_route("GET", "/users/:param", "src/routes/users.ts");
        let claim = claim(ExtractedValue::Route {
            method: "GET".to_string(),
            path: "/users/{userId}".to_string(),
        });
        let mut limiter = UrlRateLimiter::new(5);
        let outcome = verify(
            &claim,
            &index,
            &http(),
            &UrlCheckConfig::default(),
            &mut limiter,
        )
        .await
        .expect("outcome");
        assert_eq!(outcome.verdict, Verdict::Verified);
        assert_eq!(outcome.evidence_files, vec!["src/routes/users.ts"]);
    }

    #[tokio::test]
    async fn example_with_missing_import_drifts() {
        let index = MockIndex::default().with_lockfile_dependency("react", "18.2.0");
        let claim = claim(ExtractedValue::CodeExample {
            language: Some("ts".to_string()),
            fence_line: 3,
            imports: vec!["react".to_string(), "left-pad".to_string()],
            symbols: vec![],
            commands: vec![],
        });
        let mut limiter = UrlRateLimiter::new(5);
        let outcome = verify(
            &claim,
            &index,
            &http(),
            &UrlCheckConfig::default(),
            &mut limiter,
        )
        .await
        .expect("outcome");
        assert_eq!(outcome.verdict, Verdict::Drifted);
        assert!(outcome.specific_mismatch.expect("mismatch").contains("left-pad"));
    }

    #[tokio::test]
    async fn builtin_and_relative_imports_not_checked() {
        let index = MockIndex::default();
        let claim = claim(ExtractedValue::CodeExample {
            language: Some("ts".to_string()),
            fence_line: 3,
            imports: vec!["node:fs".to_string(), "./local".to_string()],
            symbols: vec![],
            commands: vec![],
        });
        let mut limiter = UrlRateLimiter::new(5);
        assert!(verify(
            &claim,
            &index,
            &http(),
            &UrlCheckConfig::default(),
            &mut limiter
        )
        .await
        .is_none());
    }

    #[tokio::test]
    async fn url_cap_yields_uncertain_without_network() {
        let index = MockIndex::default();
        let claim = claim(ExtractedValue::Url {
            url: "https://docs.rs/regex".to_string(),
        });
        let mut limiter = UrlRateLimiter::new(1);
        assert!(limiter.try_acquire("docs.rs"));
        let outcome = verify(
            &claim,
            &index,
            &http(),
            &UrlCheckConfig::default(),
            &mut limiter,
        )
        .await
        .expect("outcome");
        assert_eq!(outcome.verdict, Verdict::Uncertain);
        assert!(outcome.reasoning.contains("budget"));
    }

    #[test]
    fn route_normalization_examples() {
        assert_eq!(normalize_route_path("/users/:id"), "/users/:param");
        assert_eq!(normalize_route_path("/orgs/{orgId}/repos"), "/orgs/:param/repos");
        assert_eq!(normalize_route_path("/health"), "/health");
    }

    #[test]
    fn import_package_shapes() {
        assert_eq!(import_package("react"), Some("react".to_string()));
        assert_eq!(
            import_package("@tanstack/react-query/core"),
            Some("@tanstack/react-query".to_string())
        );
        assert_eq!(import_package("./util"), None);
        assert_eq!(import_package("node:fs"), None);
        assert_eq!(import_package("fs"), None);
    }
}
