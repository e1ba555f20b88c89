use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

// ```annotation <body> ```: the first closing fence ends the block, so
// fences nested inside a body are not supported.
static ANNOTATION_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```annotation\s*(.*?)\s*```").unwrap());

/// One fenced annotation block found in a response
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationBlock<'a> {
    /// Byte range of the whole block, fences included
    pub span: Range<usize>,
    /// Block body with surrounding whitespace trimmed
    pub body: &'a str,
}

/// Find all non-overlapping annotation blocks, left to right
pub fn find_blocks(text: &str) -> Vec<AnnotationBlock<'_>> {
    ANNOTATION_BLOCK
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let body = caps.get(1)?;
            Some(AnnotationBlock {
                span: whole.range(),
                body: body.as_str(),
            })
        })
        .collect()
}

/// Remove every annotation block, whether or not its body parses
pub fn strip_blocks(text: &str) -> String {
    ANNOTATION_BLOCK.replace_all(text, "").into_owned()
}
