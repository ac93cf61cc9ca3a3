//! File path reference extractor

use once_cell::sync::Lazy;
use regex::Regex;

use super::validation::is_valid_path;
use super::ExtractionContext;
use crate::model::{ExtractedValue, PreProcessedDoc, RawExtraction};

/// Extensions that identify a slashless token as a file reference
const CODE_EXTENSIONS: &[&str] = &[
    "bash", "c", "cfg", "cjs", "conf", "cpp", "cs", "env", "go", "graphql", "h", "hpp", "html",
    "ini", "java", "js", "json", "jsx", "kt", "lock", "md", "mdx", "mjs", "php", "proto", "py",
    "rb", "rs", "sh", "sql", "swift", "toml", "ts", "tsx", "txt", "vue", "xml", "yaml", "yml",
    "zsh",
];

/// Asset and style extensions that never denote code the docs could drift from
const NON_CODE_EXTENSIONS: &[&str] = &[
    "avif", "bmp", "eot", "gif", "ico", "jpeg", "jpg", "less", "mp3", "mp4", "otf", "pdf", "png",
    "sass", "scss", "svg", "ttf", "webm", "webp", "woff", "woff2",
];

/// Slash-containing prose idioms that match the path grammar but are not paths
const PROSE_SLASH_TOKENS: &[&str] = &["a/b", "and/or", "i/o", "n/a", "tcp/ip", "24/7", "y/n"];

static BACKTICK_SPAN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"`([^`\n]+)`").expect("valid regex"));

static MARKDOWN_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[[^\]]*\]\(([^)\s]+)\)").expect("valid regex"));

/// Path-like token with at least one slash, or a bare dotted filename
static BARE_PATH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\./)?[A-Za-z0-9_.@~-]+(?:/[A-Za-z0-9_.@{}-]+)+|\b[A-Za-z0-9_-]+\.[A-Za-z0-9]{1,5}\b")
        .expect("valid regex")
});

/// Extract file path references from backticks, markdown link targets and
/// bare text mentions.
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

        for caps in BACKTICK_SPAN.captures_iter(line) {
            push_candidate(
                &mut extractions,
                &caps[1],
                &claim_text,
                line_number,
                "backtick_path",
                ctx,
            );
        }

        for caps in MARKDOWN_LINK.captures_iter(line) {
            push_candidate(
                &mut extractions,
                &caps[1],
                &claim_text,
                line_number,
                "markdown_link_path",
                ctx,
            );
        }

        // Mask backticked spans so bare matching cannot re-extract them
        let masked = BACKTICK_SPAN.replace_all(line, "");
        let masked = MARKDOWN_LINK.replace_all(&masked, "");
        for m in BARE_PATH.find_iter(&masked) {
            push_candidate(
                &mut extractions,
                m.as_str(),
                &claim_text,
                line_number,
                "bare_path",
                ctx,
            );
        }
    }

    extractions
}

fn push_candidate(
    out: &mut Vec<RawExtraction>,
    candidate: &str,
    claim_text: &str,
    line_number: u32,
    pattern: &'static str,
    ctx: &ExtractionContext,
) {
    if let Some(path) = accept_path(candidate, ctx.source_file) {
        out.push(RawExtraction {
            claim_text: claim_text.to_string(),
            value: ExtractedValue::Path { path },
            line_number,
            pattern,
        });
    }
}

/// Apply the path acceptance rules; returns the normalized path on success.
///
/// Paths without a slash are accepted only when they carry a recognized code
/// extension (`tsconfig.json` yes, `agent.adapter` no); paths with a slash
/// are accepted regardless of extension.
fn accept_path(candidate: &str, source_file: &str) -> Option<String> {
    let mut candidate = candidate.trim();

    if candidate.is_empty() || candidate.starts_with('#') {
        return None;
    }
    // Backtick spans capture whole phrases; a path never contains whitespace
    if candidate.contains(char::is_whitespace) {
        return None;
    }
    // URLs belong to the URL extractor
    if candidate.contains("://") || candidate.starts_with("www.") || candidate.starts_with("mailto:")
    {
        return None;
    }

    // Drop a trailing anchor fragment on an otherwise good path
    if let Some(idx) = candidate.find('#') {
        candidate = &candidate[..idx];
    }

    // Self-reference to the document being scanned
    let source_base = source_file.rsplit('/').next().unwrap_or(source_file);
    if candidate == source_file || candidate == source_base {
        return None;
    }

    let file_name = candidate.rsplit('/').next().unwrap_or(candidate);
    let extension = file_name.rsplit('.').next().filter(|e| *e != file_name);

    if let Some(ext) = extension {
        if NON_CODE_EXTENSIONS.contains(&ext.to_lowercase().as_str()) {
            return None;
        }
    }

    if candidate.contains('/') {
        if PROSE_SLASH_TOKENS.contains(&candidate.to_lowercase().as_str()) {
            return None;
        }
    } else {
        // Slashless tokens need a recognized extension; this also rejects
        // dotted config-key notation like `agent.adapter`
        match extension {
            Some(ext) if CODE_EXTENSIONS.contains(&ext.to_lowercase().as_str()) => {}
            _ => return None,
        }
        // Capitalized `.js` tokens in prose are framework names (Node.js),
        // not files
        if extension == Some("js") && file_name.starts_with(|c: char| c.is_ascii_uppercase()) {
            return None;
        }
    }

    if !is_valid_path(candidate) {
        return None;
    }

    Some(candidate.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DocFormat;
    use crate::preprocess::preprocess;

    fn ctx<'a>() -> ExtractionContext<'a> {
        ExtractionContext::new("docs/setup.md")
    }

    fn extract_paths(content: &str) -> Vec<RawExtraction> {
        let doc = preprocess(content, DocFormat::Markdown);
        extract(&doc, &ctx())
    }

    fn paths(extractions: &[RawExtraction]) -> Vec<String> {
        extractions
            .iter()
            .map(|e| match &e.value {
                ExtractedValue::Path { path } => path.clone(),
                other => panic!("unexpected value: {other:?}"),
            })
            .collect()
    }

    #[test]
    fn extracts_backtick_wrapped_path() {
        let found = extract_paths("Check `src/auth/handler.ts` for details.");
        assert_eq!(paths(&found), vec!["src/auth/handler.ts"]);
        assert_eq!(found[0].pattern, "backtick_path");
        assert_eq!(found[0].line_number, 1);
    }

    #[test]
    fn extracts_markdown_link_target() {
        let found = extract_paths("See [the config](config/default.yaml) first.");
        assert_eq!(paths(&found), vec!["config/default.yaml"]);
    }

    #[test]
    fn extracts_bare_mention() {
        let found = extract_paths("The entry point lives in src/main.rs today.");
        assert_eq!(paths(&found), vec!["src/main.rs"]);
        assert_eq!(found[0].pattern, "bare_path");
    }

    #[test]
    fn rejects_urls_and_anchors() {
        assert!(extract_paths("Visit https://example.com/docs/setup.md now").is_empty());
        assert!(extract_paths("Jump to [usage](#usage)").is_empty());
    }

    #[test]
    fn rejects_image_assets() {
        assert!(extract_paths("Logo at `assets/logo.png`").is_empty());
    }

    #[test]
    fn rejects_self_reference() {
        assert!(extract_paths("This file is `docs/setup.md`").is_empty());
        assert!(extract_paths("This file is `setup.md`").is_empty());
    }

    #[test]
    fn slashless_needs_recognized_extension() {
        assert_eq!(paths(&extract_paths("Edit `tsconfig.json`")), vec!["tsconfig.json"]);
        assert!(extract_paths("Set `agent.adapter` to mock").is_empty());
    }

    #[test]
    fn slashed_accepted_regardless_of_extension() {
        let found = extract_paths("Data sits in `data/corpus.bin`");
        assert_eq!(paths(&found), vec!["data/corpus.bin"]);
    }

    #[test]
    fn skips_code_fences() {
        let content = "```\nsrc/inside/fence.ts\n```\nAnd `src/outside.ts` here";
        assert_eq!(paths(&extract_paths(content)), vec!["src/outside.ts"]);
    }

    #[test]
    fn line_numbers_survive_frontmatter() {
        let content = "---\ntitle: x\n---\nCheck `src/lib.rs` here";
        let found = extract_paths(content);
        assert_eq!(found[0].line_number, 4);
    }
}
