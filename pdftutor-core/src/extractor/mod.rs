//! Command Extractor
//!
//! Pulls ```annotation blocks out of a model response:
//!
//! ```text
//! response text
//!     ↓  find_blocks      (fence scan, left to right)
//!     ↓  parse_block      (JSON body → record → Directive)
//!     ↓  strip_blocks     (every block removed, parsed or not)
//!     ↓  normalize        (cosmetic Markdown cleanup)
//! ExtractionResult { clean_text, directives }
//! ```
//!
//! Extraction is pure and total. A block that fails to parse or classify is
//! logged and skipped; it never aborts the rest of the response.

pub mod classify;
pub mod fence;
pub mod normalize;

use crate::config::ExtractorConfig;
use crate::types::{Directive, ExtractionResult};
use log::{info, warn};

pub use classify::{classify, parse_block};
pub use fence::{find_blocks, strip_blocks, AnnotationBlock};
pub use normalize::normalize_markdown;

#[derive(Debug, Clone, Default)]
pub struct CommandExtractor {
    config: ExtractorConfig,
}

impl CommandExtractor {
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    pub fn extract(&self, response: &str) -> ExtractionResult {
        let blocks = find_blocks(response);

        let mut directives: Vec<Directive> = Vec::with_capacity(blocks.len());
        for (index, block) in blocks.iter().enumerate() {
            match parse_block(block.body) {
                Ok(directive) => directives.push(directive),
                Err(e) => warn!(
                    "Skipping annotation block {} of {} (bytes {}..{}): {}",
                    index + 1,
                    blocks.len(),
                    block.span.start,
                    block.span.end,
                    e
                ),
            }
        }

        let stripped = strip_blocks(response);
        let clean_text = if self.config.normalize_markdown {
            normalize_markdown(&stripped)
        } else {
            stripped
        };

        if !blocks.is_empty() {
            info!(
                "Extracted {} of {} annotation commands",
                directives.len(),
                blocks.len()
            );
        }

        ExtractionResult {
            clean_text,
            directives,
        }
    }
}

/// Extract with the default configuration
pub fn extract(response: &str) -> ExtractionResult {
    CommandExtractor::default().extract(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DirectiveKind;

    const RESPONSE: &str = r#"## Photosynthesis

The light reactions happen first.

```annotation
{"action": "navigate", "page": 2}
```

```annotation
{"action": "highlight", "text": "light reactions", "page": 2, "color": "yellow"}
```

```annotation
{"action": "highlight", "text": oops, "page": 2}
```

```annotation
{"action": "circle", "page": 2}
```

Then the Calvin cycle."#;

    #[test]
    fn test_extract_keeps_valid_directives_in_order() {
        let result = extract(RESPONSE);
        let kinds: Vec<DirectiveKind> = result.directives.iter().map(|d| d.kind()).collect();
        assert_eq!(kinds, vec![DirectiveKind::Navigate, DirectiveKind::Highlight]);
    }

    #[test]
    fn test_every_block_is_stripped() {
        let result = extract(RESPONSE);
        assert!(!result.clean_text.contains("```"));
        assert!(!result.clean_text.contains("circle"));
        assert!(!result.clean_text.contains("oops"));
        assert_eq!(
            result.clean_text,
            "## Photosynthesis\n\nThe light reactions happen first.\n\nThen the Calvin cycle."
        );
    }

    #[test]
    fn test_no_blocks_means_normalized_input() {
        let text = "#Answer\nNo commands here.\n\n\n\nBye";
        let result = extract(text);
        assert!(result.directives.is_empty());
        assert_eq!(result.clean_text, normalize_markdown(text));
    }

    #[test]
    fn test_normalization_can_be_disabled() {
        let extractor = CommandExtractor::new(ExtractorConfig {
            normalize_markdown: false,
        });
        let text = "#Raw\n\n\n\ntext ";
        assert_eq!(extractor.extract(text).clean_text, text);
    }

    #[test]
    fn test_garbage_input_is_total() {
        let result = extract("```annotation\n```annotation\n```\n{{{");
        assert!(result.directives.is_empty());
    }
}
