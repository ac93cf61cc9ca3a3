//! Document preprocessor: normalizes raw documentation text and builds the
//! positional side tables extraction depends on.
//!
//! The pipeline is an ordered sequence of total functions over an immutable
//! line array. It never fails: malformed input (unclosed frontmatter, dangling
//! fences) degrades to leaving content untouched.

mod fences;

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::{DocFormat, PreProcessedDoc};

pub use fences::{scan_code_fences, scan_svg_blocks};

/// Standard HTML tags (lowercase or `!`-prefixed); leaves uppercase JSX
/// component tags alone so the MDX-gated step stays meaningful.
static HTML_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"</?[a-z!][^>\n]*>").expect("valid regex"));

/// Base64-embedded markdown images
static BASE64_IMAGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!\[[^\]]*\]\(data:image/[^)]*\)").expect("valid regex"));

/// Base64 image data in a src attribute fragment (tags split across lines)
static BASE64_SRC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"src="data:image/[^"]*""#).expect("valid regex"));

/// Self-closing JSX component tag (`<Tabs items={...} />`)
static JSX_SELF_CLOSING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<[A-Z][A-Za-z0-9.]*[^>\n]*/>").expect("valid regex"));

/// Opening or closing JSX component tag (`<Steps>`, `</Steps>`)
static JSX_BLOCK_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"</?[A-Z][A-Za-z0-9.]*[^>\n]*>").expect("valid regex"));

/// Single-line machine-tag convention: `<!-- docdrift:verb key="value" -->`
static MACHINE_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^\s*<!--\s*[a-z][a-z0-9_-]*:[a-z][a-z0-9-]*(?:\s+[A-Za-z_][\w-]*="[^"]*")*\s*-->\s*$"#)
        .expect("valid regex")
});

/// Normalize raw document text into cleaned content plus side tables.
///
/// Pure and total. The returned line map satisfies
/// `original_line_map.len() == cleaned_content.split('\n').count()` and maps
/// cleaned line `i` to original line `i + frontmatter_offset + 1`.
pub fn preprocess(content: &str, format: DocFormat) -> PreProcessedDoc {
    let byte_size = content.len();
    let original_lines: Vec<&str> = content.split('\n').collect();

    // Step 1: leading YAML frontmatter. Only stripped when the very first
    // line is exactly `---` and a closing `---` exists later; otherwise the
    // content is left untouched.
    let frontmatter_offset = frontmatter_line_count(&original_lines);
    let body_lines: Vec<&str> = original_lines[frontmatter_offset..].to_vec();

    // SVG fence state is derived from the un-stripped body lines (steps 2-3
    // may remove the tag fragments the detection depends on).
    let svg_lines = scan_svg_blocks(&body_lines);

    let mut cleaned: Vec<String> = body_lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            // Step 4 (detection done above): blank everything inside an SVG block
            if svg_lines.contains(&i) {
                return String::new();
            }
            // Step 2: strip standard HTML tags
            let line = HTML_TAG.replace_all(line, "");
            // Step 3: strip base64-embedded images
            let line = BASE64_IMAGE.replace_all(&line, "");
            BASE64_SRC.replace_all(&line, "").into_owned()
        })
        .collect();

    // Step 5: MDX-only JSX component stripping; must not fire for other formats
    if format == DocFormat::Mdx {
        for line in &mut cleaned {
            let stripped = JSX_SELF_CLOSING.replace_all(line, "");
            let stripped = JSX_BLOCK_TAG.replace_all(&stripped, "");
            *line = stripped.into_owned();
        }
    }

    // Step 6: line map. Lines are blanked, never deleted, so the map is the
    // identity shifted by the frontmatter offset.
    let original_line_map: Vec<u32> = (0..cleaned.len())
        .map(|i| (i + frontmatter_offset + 1) as u32)
        .collect();

    // Step 7: fenced code blocks over the cleaned lines
    let cleaned_refs: Vec<&str> = cleaned.iter().map(String::as_str).collect();
    let code_fence_lines = scan_code_fences(&cleaned_refs);

    // Step 8: machine-tag lines, matched against the un-stripped body lines
    // (the HTML strip removes comment syntax). Fence classification takes
    // precedence: a tag inside a code fence is documentation, not a directive.
    let tag_lines = scan_tag_lines(&body_lines, &code_fence_lines);

    PreProcessedDoc {
        cleaned_content: cleaned.join("\n"),
        original_line_map,
        format,
        byte_size,
        code_fence_lines,
        tag_lines,
        frontmatter_offset,
    }
}

/// Number of leading lines consumed by a frontmatter block, including both
/// `---` delimiters. Zero when no well-formed block is present.
fn frontmatter_line_count(lines: &[&str]) -> usize {
    if lines.first().map(|l| l.trim_end()) != Some("---") {
        return 0;
    }
    for (i, line) in lines.iter().enumerate().skip(1) {
        if line.trim_end() == "---" {
            return i + 1;
        }
    }
    // No closing delimiter: leave the content untouched
    0
}

fn scan_tag_lines(body_lines: &[&str], fence_lines: &HashSet<usize>) -> HashSet<usize> {
    body_lines
        .iter()
        .enumerate()
        .filter(|(i, line)| !fence_lines.contains(i) && MACHINE_TAG.is_match(line))
        .map(|(i, _)| i)
        .collect()
}
