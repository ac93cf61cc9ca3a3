//! Fenced code block reconstruction shared by the command and code-example
//! extractors

/// A fenced code block with its language tag and cleaned-line positions
#[derive(Debug, Clone)]
pub(crate) struct FencedBlock<'a> {
    /// Language tag after the opening delimiter, if any
    pub language: Option<String>,
    /// Cleaned line index of the opening delimiter
    pub open_index: usize,
    /// Body lines as (cleaned line index, text), delimiters excluded
    pub lines: Vec<(usize, &'a str)>,
}

/// Rebuild fenced blocks from the cleaned lines.
///
/// Uses the same toggle rules as the preprocessor's fence scan: ``` and ~~~
/// open independently and only close on their own kind.
pub(crate) fn fenced_blocks<'a>(lines: &[&'a str]) -> Vec<FencedBlock<'a>> {
    let mut blocks = Vec::new();
    let mut current: Option<(FencedBlock<'a>, &'static str)> = None;

    for (i, line) in lines.iter().enumerate() {
        let trimmed = line.trim_start();
        let delim = if trimmed.starts_with("```") {
            Some("```")
        } else if trimmed.starts_with("~~~") {
            Some("~~~")
        } else {
            None
        };

        match (&mut current, delim) {
            (None, Some(d)) => {
                let tag = trimmed.trim_start_matches(['`', '~']).trim();
                let language = if tag.is_empty() {
                    None
                } else {
                    // `bash title="Install"` style info strings keep only the tag
                    Some(
                        tag.split_whitespace()
                            .next()
                            .unwrap_or(tag)
                            .to_lowercase(),
                    )
                };
                current = Some((
                    FencedBlock {
                        language,
                        open_index: i,
                        lines: Vec::new(),
                    },
                    d,
                ));
            }
            (Some((_, open)), Some(d)) if *open == d => {
                if let Some((block, _)) = current.take() {
                    blocks.push(block);
                }
            }
            (Some((block, _)), _) => {
                block.lines.push((i, line));
            }
            (None, None) => {}
        }
    }

    // Unclosed trailing fence still counts as a block
    if let Some((block, _)) = current.take() {
        blocks.push(block);
    }

    blocks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DocFormat;
    use crate::preprocess::preprocess;

    #[test]
    fn reconstructs_language_and_body() {
        let content = "intro\n```bash title=\"x\"\nnpm install\n```\n```\nplain\n```";
        let doc = preprocess(content, DocFormat::Markdown);
        let lines = doc.lines();
        let blocks = fenced_blocks(&lines);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].language.as_deref(), Some("bash"));
        assert_eq!(blocks[0].lines.len(), 1);
        assert_eq!(blocks[0].lines[0].1, "npm install");
        assert_eq!(blocks[1].language, None);
    }
}
