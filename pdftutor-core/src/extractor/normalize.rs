//! Cosmetic Markdown cleanup for model responses.
//!
//! Runs after annotation blocks are stripped and has no effect on which
//! directives are extracted. Every step is idempotent, so cleaning an
//! already cleaned response is a no-op.

use regex::Regex;
use std::sync::LazyLock;

static MARKDOWN_WRAPPER_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```markdown\s*").unwrap());

static TRAILING_FENCE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"```\s*$").unwrap());

static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(#{1,6})[ \t]*(.+)$").unwrap());

static LIST_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n(-|\*|\+|\d+\.)[ \t]").unwrap());

static EXCESS_NEWLINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

static BLOCKQUOTE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^>[ \t]*").unwrap());

pub fn normalize_markdown(text: &str) -> String {
    let text = unwrap_markdown_fence(text);
    let text = text.trim();

    // "##Title" / "##   Title" -> "## Title"
    let text = HEADING.replace_all(text, "$1 $2");
    // Blank line before every list item
    let text = LIST_MARKER.replace_all(&text, "\n\n$1 ");
    let text = EXCESS_NEWLINES.replace_all(&text, "\n\n");
    let text = BLOCKQUOTE.replace_all(&text, "> ");

    text.trim().to_string()
}

/// Drop a ```markdown wrapper the model put around its whole answer.
/// The closing fence is only removed when an opening wrapper was found,
/// so a response that legitimately ends in a code block keeps its fence.
fn unwrap_markdown_fence(text: &str) -> String {
    if !MARKDOWN_WRAPPER_OPEN.is_match(text) {
        return text.to_string();
    }
    let text = MARKDOWN_WRAPPER_OPEN.replace_all(text, "");
    TRAILING_FENCE.replace(&text, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_spacing() {
        assert_eq!(normalize_markdown("##Overview"), "## Overview");
        assert_eq!(normalize_markdown("###   Details"), "### Details");
        assert_eq!(normalize_markdown("# Title"), "# Title");
    }

    #[test]
    fn test_list_items_get_blank_line() {
        let text = "Steps:\n- absorb light\n- split water\n1. first";
        assert_eq!(
            normalize_markdown(text),
            "Steps:\n\n- absorb light\n\n- split water\n\n1. first"
        );
    }

    #[test]
    fn test_bold_and_rules_are_not_list_items() {
        let text = "Intro\n**Bold** text\n---\nMore";
        assert_eq!(normalize_markdown(text), text);
    }

    #[test]
    fn test_newline_runs_collapse() {
        assert_eq!(normalize_markdown("a\n\n\n\n\nb"), "a\n\nb");
        assert_eq!(normalize_markdown("a\n\nb"), "a\n\nb");
    }

    #[test]
    fn test_blockquote_marker() {
        assert_eq!(normalize_markdown(">quoted\n>   also"), "> quoted\n> also");
    }

    #[test]
    fn test_markdown_wrapper_is_unwrapped() {
        let text = "```markdown\n# Answer\nChlorophyll absorbs light.\n```";
        assert_eq!(
            normalize_markdown(text),
            "# Answer\nChlorophyll absorbs light."
        );
    }

    #[test]
    fn test_trailing_code_block_survives() {
        let text = "Example:\n```python\nprint(1)\n```";
        assert_eq!(normalize_markdown(text), text);
    }

    #[test]
    fn test_idempotent() {
        let text = "```markdown\n##Summary\n\n\n\nKey points:\n- one\n* two\n>note\n```\n";
        let once = normalize_markdown(text);
        assert_eq!(normalize_markdown(&once), once);
    }
}
