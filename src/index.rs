//! Codebase index contract consumed by the verification cascade.
//!
//! The index answers read-only questions about the target repository; no
//! tier ever writes to it. Implementations typically sit on a database or a
//! search service, so every query is async.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A route registered in the target codebase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexedRoute {
    pub method: String,
    pub path: String,
    /// File that registers the handler
    pub source_file: String,
}

/// Where a resolved dependency version was read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencySource {
    Lockfile,
    Manifest,
}

/// A dependency version resolved from the target repository
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedDependency {
    pub version: String,
    pub source: DependencySource,
}

/// A code entity matched by symbol or semantic lookup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexedEntity {
    pub name: String,
    pub file: String,
    pub line: u32,
}

/// Read-only queries against the indexed target codebase
#[async_trait]
pub trait CodebaseIndex: Send + Sync {
    /// Whether a repo-relative path exists
    async fn file_exists(&self, path: &str) -> bool;

    /// Look up a route by method and parameter-normalized path
    async fn find_route(&self, method: &str, path: &str) -> Option<IndexedRoute>;

    /// Resolve a dependency's installed version, lockfile-first
    async fn dependency_version(&self, package: &str) -> Option<ResolvedDependency>;

    /// Whether a package-manager script with this name is defined
    async fn script_exists(&self, name: &str) -> bool;

    /// Find entities declaring or defining the given symbol
    async fn find_symbol(&self, name: &str) -> Vec<IndexedEntity>;

    /// Semantic search over indexed code, best matches first
    async fn search_semantic(&self, query: &str, top_k: usize) -> Vec<IndexedEntity>;
}
