//! Per-type keyword generation for evidence search

use crate::model::ExtractedValue;

/// Language keywords that never make useful search terms
pub(crate) const LANGUAGE_KEYWORDS: &[&str] = &[
    "abstract",
    "async",
    "await",
    "break",
    "case",
    "catch",
    "class",
    "const",
    "continue",
    "def",
    "default",
    "delete",
    "else",
    "enum",
    "export",
    "extends",
    "false",
    "final",
    "finally",
    "for",
    "from",
    "function",
    "if",
    "impl",
    "implements",
    "import",
    "interface",
    "lambda",
    "let",
    "match",
    "mod",
    "new",
    "none",
    "null",
    "private",
    "public",
    "pub",
    "return",
    "self",
    "static",
    "struct",
    "super",
    "switch",
    "this",
    "throw",
    "trait",
    "true",
    "try",
    "type",
    "typeof",
    "undefined",
    "use",
    "var",
    "void",
    "while",
    "yield",
];

pub(crate) fn is_language_keyword(word: &str) -> bool {
    let lower = word.to_lowercase();
    LANGUAGE_KEYWORDS.contains(&lower.as_str())
}

/// Whether a route path segment is a parameter placeholder (`:id`, `{id}`)
fn is_path_parameter(segment: &str) -> bool {
    segment.starts_with(':') || (segment.starts_with('{') && segment.ends_with('}'))
}

/// Generate search keywords for a claim value.
///
/// Keywords feed the evidence builder's symbol and semantic searches;
/// parameter placeholders and language keywords are skipped because they
/// match everything and mean nothing.
pub fn generate_keywords(value: &ExtractedValue) -> Vec<String> {
    let mut keywords = match value {
        ExtractedValue::Path { path } => {
            let mut out: Vec<String> = path
                .split('/')
                .filter(|s| !s.is_empty() && *s != ".")
                .map(str::to_string)
                .collect();
            // Filename stem is usually the strongest search term
            if let Some(file) = path.rsplit('/').next() {
                if let Some(stem) = file.split('.').next() {
                    if !stem.is_empty() {
                        out.push(stem.to_string());
                    }
                }
            }
            out
        }
        ExtractedValue::Command { runner, script, .. } => {
            let mut out = vec![runner.clone()];
            if let Some(script) = script {
                out.push(script.clone());
            }
            out
        }
        ExtractedValue::Dependency { package, version } => {
            vec![package.clone(), version.clone()]
        }
        ExtractedValue::Route { method, path } => {
            let mut out = vec![method.clone()];
            out.extend(
                path.split('/')
                    .filter(|s| !s.is_empty() && !is_path_parameter(s))
                    .map(str::to_string),
            );
            out
        }
        ExtractedValue::CodeExample {
            imports,
            symbols,
            commands,
            ..
        } => {
            let mut out: Vec<String> = imports.clone();
            out.extend(
                symbols
                    .iter()
                    .filter(|s| !is_language_keyword(s))
                    .cloned(),
            );
            // Only the runner of embedded commands is a useful term
            out.extend(
                commands
                    .iter()
                    .filter_map(|c| c.split_whitespace().next())
                    .map(str::to_string),
            );
            out
        }
        ExtractedValue::Url { url } => {
            let mut out = Vec::new();
            if let Ok(parsed) = url::Url::parse(url) {
                if let Some(host) = parsed.host_str() {
                    out.push(host.to_string());
                }
            }
            out
        }
        ExtractedValue::EnvironmentVar { name } => vec![name.clone()],
        ExtractedValue::ConfigSetting { key, .. } => key
            .split(['.', ':'])
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        ExtractedValue::Convention { statement } | ExtractedValue::Behavior {
            description: statement,
        } => statement
            .split_whitespace()
            .filter(|w| w.len() > 3 && !is_language_keyword(w))
            .take(8)
            .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_string())
            .filter(|w| !w.is_empty())
            .collect(),
    };

    keywords.dedup();
    keywords
}
