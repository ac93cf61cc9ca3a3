//! Code example extractor
//!
//! Produces one claim per non-CLI fenced block, summarizing what the example
//! depends on: imported modules, declared symbols and embedded commands.

use once_cell::sync::Lazy;
use regex::Regex;

use super::blocks::fenced_blocks;
use super::commands::SHELL_LANGUAGES;
use super::keywords::is_language_keyword;
use super::{truncate_at_char_boundary, ExtractionContext};
use crate::model::{ExtractedValue, PreProcessedDoc, RawExtraction};

/// `import x from 'mod'`, `import 'mod'`, `export ... from 'mod'`
static JS_IMPORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?:import|export)\s+(?:[\w*{},\s$]+\s+from\s+)?['"]([^'"]+)['"]"#)
        .expect("valid regex")
});

static JS_REQUIRE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"require\(\s*['"]([^'"]+)['"]\s*\)"#).expect("valid regex"));

static PY_IMPORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\s*(?:from\s+([\w.]+)\s+import|import\s+([\w.]+))").expect("valid regex")
});

/// PascalCase or camelCase identifier, at least two words long
static MIXED_CASE_IDENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:[A-Z][a-z0-9]+(?:[A-Z][A-Za-z0-9]*)+|[a-z][a-z0-9]*(?:[A-Z][A-Za-z0-9]*)+)\b")
        .expect("valid regex")
});

const MAX_SYMBOLS: usize = 20;

/// Extract one code-example claim per non-CLI fenced block.
pub fn extract(doc: &PreProcessedDoc, ctx: &ExtractionContext) -> Vec<RawExtraction> {
    let lines = doc.lines();
    let mut extractions = Vec::new();

    for block in fenced_blocks(&lines) {
        let is_shell = block
            .language
            .as_deref()
            .map(|l| SHELL_LANGUAGES.contains(&l))
            .unwrap_or(false);
        if is_shell {
            continue;
        }
        if block.lines.iter().all(|(_, l)| l.trim().is_empty()) {
            continue;
        }

        let body: Vec<&str> = block.lines.iter().map(|(_, l)| *l).collect();
        let body_text = body.join("\n");

        let mut imports = Vec::new();
        for caps in JS_IMPORT.captures_iter(&body_text) {
            push_unique(&mut imports, caps[1].to_string());
        }
        for caps in JS_REQUIRE.captures_iter(&body_text) {
            push_unique(&mut imports, caps[1].to_string());
        }
        for caps in PY_IMPORT.captures_iter(&body_text) {
            let module = caps.get(1).or_else(|| caps.get(2));
            if let Some(m) = module {
                push_unique(&mut imports, m.as_str().to_string());
            }
        }

        let mut symbols = Vec::new();
        for m in MIXED_CASE_IDENT.find_iter(&body_text) {
            if symbols.len() >= MAX_SYMBOLS {
                break;
            }
            if !is_language_keyword(m.as_str()) {
                push_unique(&mut symbols, m.as_str().to_string());
            }
        }

        // Embedded `$ ` prompts inside a code example are still commands
        let mut commands = Vec::new();
        for line in &body {
            if let Some(cmd) = line.trim_start().strip_prefix("$ ") {
                let cmd = cmd.trim();
                if !cmd.is_empty() {
                    push_unique(&mut commands, cmd.to_string());
                }
            }
        }

        let fence_line = doc.original_line(block.open_index);
        let mut claim_text = body_text.trim().to_string();
        if claim_text.len() > ctx.max_claim_text_len {
            claim_text = truncate_at_char_boundary(&claim_text, ctx.max_claim_text_len);
        }

        extractions.push(RawExtraction {
            claim_text,
            value: ExtractedValue::CodeExample {
                language: block.language.clone(),
                fence_line,
                imports,
                symbols,
                commands,
            },
            line_number: fence_line,
            pattern: "code_example",
        });
    }

    extractions
}

fn push_unique(list: &mut Vec<String>, value: String) {
    if !list.contains(&value) {
        list.push(value);
    }
}
