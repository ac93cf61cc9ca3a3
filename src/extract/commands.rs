//! CLI command extractor

use once_cell::sync::Lazy;
use regex::Regex;

use super::blocks::fenced_blocks;
use super::ExtractionContext;
use crate::model::{ExtractedValue, PreProcessedDoc, RawExtraction};

/// Command runners the inline grammar recognizes
pub(crate) const KNOWN_RUNNERS: &[&str] = &[
    "bun",
    "bundle",
    "cargo",
    "composer",
    "deno",
    "docker",
    "docker-compose",
    "git",
    "go",
    "gradle",
    "helm",
    "kubectl",
    "make",
    "mvn",
    "node",
    "npm",
    "npx",
    "pip",
    "pip3",
    "pnpm",
    "poetry",
    "python",
    "python3",
    "rake",
    "rustup",
    "terraform",
    "uv",
    "yarn",
];

/// Fence tags treated as CLI blocks; other tagged blocks belong to the
/// code-example extractor, and untagged blocks are skipped entirely (they
/// are frequently ASCII-art directory trees)
pub(crate) const SHELL_LANGUAGES: &[&str] = &[
    "bash", "bat", "cmd", "console", "powershell", "sh", "shell", "terminal", "zsh",
];

/// Package-manager runners whose `run <script>` sub-verb is stripped
const SCRIPT_RUNNERS: &[&str] = &["bun", "npm", "pnpm", "yarn"];

static BACKTICK_SPAN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"`([^`\n]+)`").expect("valid regex"));

static WORD_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_.-]*$").expect("valid regex"));

/// Characters used by box-drawing and tree diagrams
const TREE_CHARS: &[char] = &['│', '├', '└', '┌', '─', '┬', '┼', '╰', '╭'];

/// Extract command claims from shell-tagged fenced blocks and inline
/// backtick mentions.
pub fn extract(doc: &PreProcessedDoc, _ctx: &ExtractionContext) -> Vec<RawExtraction> {
    let lines = doc.lines();
    let mut extractions = Vec::new();

    for block in fenced_blocks(&lines) {
        let is_shell = block
            .language
            .as_deref()
            .map(|l| SHELL_LANGUAGES.contains(&l))
            .unwrap_or(false);
        if !is_shell {
            continue;
        }

        // If any line carries a shell prompt, only prompt lines are commands;
        // everything else in the block is output
        let has_prompt = block
            .lines
            .iter()
            .any(|(_, l)| l.trim_start().starts_with("$ "));

        for (index, raw_line) in &block.lines {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if line.contains(TREE_CHARS) || line.starts_with("|--") || line.starts_with("+--") {
                continue;
            }

            let command_text = if has_prompt {
                match line.strip_prefix("$ ") {
                    Some(rest) => rest,
                    None => continue,
                }
            } else if line.starts_with("> ") {
                // Continuation/output marker without a prompt line convention
                continue;
            } else {
                line
            };

            let command_text = strip_trailing_comment(command_text);
            let line_number = doc.original_line(*index);

            for chained in command_text.split("&&") {
                if let Some(value) = parse_command(chained.trim(), false) {
                    extractions.push(RawExtraction {
                        claim_text: chained.trim().to_string(),
                        value,
                        line_number,
                        pattern: "code_block_command",
                    });
                }
            }
        }
    }

    // Inline backtick commands on prose lines
    for (i, line) in lines.iter().enumerate() {
        if doc.is_fence_line(i) || doc.is_tag_line(i) {
            continue;
        }
        let line_number = doc.original_line(i);
        for caps in BACKTICK_SPAN.captures_iter(line) {
            let span = caps[1].trim();
            for chained in span.split("&&") {
                if let Some(value) = parse_command(chained.trim(), true) {
                    extractions.push(RawExtraction {
                        claim_text: line.trim().to_string(),
                        value,
                        line_number,
                        pattern: "inline_command",
                    });
                }
            }
        }
    }

    extractions
}

/// Strip a trailing inline comment (` # ...`)
fn strip_trailing_comment(command: &str) -> &str {
    match command.find(" #") {
        Some(idx) => command[..idx].trim_end(),
        None => command,
    }
}

/// Parse one command into its typed value.
///
/// `require_known_runner` is set for inline mentions, where arbitrary
/// backtick text must not become a claim. Inside shell blocks, unrecognized
/// runners are kept and tagged `unknown`.
fn parse_command(command: &str, require_known_runner: bool) -> Option<ExtractedValue> {
    let mut tokens = command.split_whitespace().peekable();

    let mut first = *tokens.peek()?;
    if first == "sudo" {
        tokens.next();
        first = *tokens.peek()?;
    }

    if !WORD_TOKEN.is_match(first) {
        return None;
    }

    let known = KNOWN_RUNNERS.contains(&first.to_lowercase().as_str());
    if require_known_runner && !known {
        return None;
    }
    // Inline mentions need at least one argument to look like a command
    if require_known_runner && tokens.clone().count() < 2 {
        return None;
    }

    let runner = if known {
        first.to_lowercase()
    } else {
        "unknown".to_string()
    };
    tokens.next();

    // `npm run build` -> script `build`
    let mut rest: Vec<&str> = tokens.collect();
    if SCRIPT_RUNNERS.contains(&runner.as_str()) && rest.first() == Some(&"run") {
        rest.remove(0);
    }

    let script = rest
        .iter()
        .find(|t| !t.starts_with('-'))
        .map(|t| t.to_string());

    Some(ExtractedValue::Command {
        runner,
        script,
        full_command: command.to_string(),
    })
}
