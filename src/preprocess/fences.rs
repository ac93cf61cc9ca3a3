//! Fence-state scanning: code fences and inline SVG blocks

use std::collections::HashSet;

/// Scan for fenced code blocks delimited by ``` or ~~~.
///
/// Returns every line index inside or delimiting a fence. A fence opened with
/// one delimiter kind only closes on the same kind, so a ~~~ block may contain
/// literal backtick fences.
pub fn scan_code_fences(lines: &[&str]) -> HashSet<usize> {
    let mut fence_lines = HashSet::new();
    let mut open_delim: Option<&'static str> = None;

    for (i, line) in lines.iter().enumerate() {
        let trimmed = line.trim_start();
        let delim = if trimmed.starts_with("```") {
            Some("```")
        } else if trimmed.starts_with("~~~") {
            Some("~~~")
        } else {
            None
        };

        match (open_delim, delim) {
            (None, Some(d)) => {
                open_delim = Some(d);
                fence_lines.insert(i);
            }
            (Some(open), Some(d)) if open == d => {
                open_delim = None;
                fence_lines.insert(i);
            }
            (Some(_), _) => {
                fence_lines.insert(i);
            }
            (None, None) => {}
        }
    }

    fence_lines
}

/// Scan for inline SVG blocks in a single forward pass.
///
/// Must run against the original, un-stripped lines: tag stripping may have
/// already removed the `<svg` / `</svg>` fragments from the cleaned buffer,
/// which would produce false-negative closures. An opening line that also
/// carries the closing tag (after the last `<svg`) ends the block on that
/// same line.
pub fn scan_svg_blocks(lines: &[&str]) -> HashSet<usize> {
    let mut svg_lines = HashSet::new();
    let mut in_svg = false;

    for (i, line) in lines.iter().enumerate() {
        if in_svg {
            svg_lines.insert(i);
            if line.contains("</svg>") {
                in_svg = false;
            }
            continue;
        }

        if let Some(open_idx) = line.rfind("<svg") {
            svg_lines.insert(i);
            let rest = &line[open_idx..];
            if !rest.contains("</svg>") {
                in_svg = true;
            }
        }
    }

    svg_lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fence_toggles_on_backticks() {
        let lines = vec!["text", "```bash", "npm install", "```", "more text"];
        let fences = scan_code_fences(&lines);
        assert!(!fences.contains(&0));
        assert!(fences.contains(&1));
        assert!(fences.contains(&2));
        assert!(fences.contains(&3));
        assert!(!fences.contains(&4));
    }

    #[test]
    fn tilde_fence_does_not_close_on_backticks() {
        let lines = vec!["~~~", "```", "still inside", "~~~", "outside"];
        let fences = scan_code_fences(&lines);
        assert!(fences.contains(&1));
        assert!(fences.contains(&2));
        assert!(fences.contains(&3));
        assert!(!fences.contains(&4));
    }

    #[test]
    fn unclosed_fence_runs_to_end() {
        let lines = vec!["```", "a", "b"];
        let fences = scan_code_fences(&lines);
        assert_eq!(fences.len(), 3);
    }

    #[test]
    fn svg_block_spans_lines() {
        let lines = vec!["before", "<svg width=\"10\">", "<path d=\"M0\"/>", "</svg>", "after"];
        let svg = scan_svg_blocks(&lines);
        assert!(!svg.contains(&0));
        assert!(svg.contains(&1));
        assert!(svg.contains(&2));
        assert!(svg.contains(&3));
        assert!(!svg.contains(&4));
    }

    #[test]
    fn svg_open_and_close_on_same_line() {
        let lines = vec!["<svg><path/></svg>", "not svg"];
        let svg = scan_svg_blocks(&lines);
        assert!(svg.contains(&0));
        assert!(!svg.contains(&1));
    }

    #[test]
    fn stale_close_before_open_does_not_end_block() {
        // A stray </svg> earlier on the opening line must not close the new block
        let lines = vec!["</svg> text <svg>", "inside", "</svg>"];
        let svg = scan_svg_blocks(&lines);
        assert!(svg.contains(&0));
        assert!(svg.contains(&1));
        assert!(svg.contains(&2));
    }
}
