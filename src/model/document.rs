//! Preprocessed document model

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Documentation formats the pipeline understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocFormat {
    Markdown,
    Mdx,
    Rst,
    Plaintext,
}

impl DocFormat {
    /// Guess the format from a file name extension
    pub fn from_path(path: &str) -> Self {
        let lower = path.to_lowercase();
        if lower.ends_with(".mdx") {
            DocFormat::Mdx
        } else if lower.ends_with(".md") || lower.ends_with(".markdown") {
            DocFormat::Markdown
        } else if lower.ends_with(".rst") {
            DocFormat::Rst
        } else {
            DocFormat::Plaintext
        }
    }
}

/// Output of the preprocessor: cleaned text plus positional side tables.
///
/// Invariant: `original_line_map.len()` equals the number of lines in
/// `cleaned_content`, and the map is monotonically non-decreasing.
#[derive(Debug, Clone)]
pub struct PreProcessedDoc {
    pub cleaned_content: String,
    /// cleaned line index -> 1-based line number in the original file
    pub original_line_map: Vec<u32>,
    pub format: DocFormat,
    pub byte_size: usize,
    /// Cleaned line indices inside or delimiting a fenced code block
    pub code_fence_lines: HashSet<usize>,
    /// Cleaned line indices carrying a single-line machine tag
    pub tag_lines: HashSet<usize>,
    /// Number of original lines consumed by a leading frontmatter block
    pub frontmatter_offset: usize,
}

impl PreProcessedDoc {
    /// Map a cleaned line index back to its original 1-based line number
    pub fn original_line(&self, cleaned_index: usize) -> u32 {
        self.original_line_map
            .get(cleaned_index)
            .copied()
            .unwrap_or((cleaned_index + 1) as u32)
    }

    /// Whether a cleaned line is part of a fenced code block
    pub fn is_fence_line(&self, cleaned_index: usize) -> bool {
        self.code_fence_lines.contains(&cleaned_index)
    }

    /// Whether a cleaned line is a machine-tag line
    pub fn is_tag_line(&self, cleaned_index: usize) -> bool {
        self.tag_lines.contains(&cleaned_index)
    }

    /// Lines of the cleaned content
    pub fn lines(&self) -> Vec<&str> {
        self.cleaned_content.split('\n').collect()
    }
}
