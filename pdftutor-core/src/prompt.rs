use crate::config::PromptConfig;
use anyhow::Result;

/// The text-completion service behind the tutor. Takes one prompt and
/// returns one complete response; no streaming.
pub trait TextGenerator {
    fn generate(&self, prompt: &str) -> Result<String>;
}

const COMMAND_REFERENCE: &str = r#"ANNOTATION COMMANDS:
When you want to highlight or annotate the PDF, use these special commands in your response:

**HIGHLIGHT TEXT**: To highlight specific text on a page:
```annotation
{
  "action": "highlight",
  "text": "exact phrase from document",
  "page": page_number,
  "comment": "explanation or note",
  "color": "yellow"
}
```

**HIGHLIGHT AREA**: To highlight a rectangular area:
```annotation
{
  "action": "area",
  "page": page_number,
  "coordinates": {"x": 100, "y": 200, "width": 300, "height": 50},
  "comment": "explanation",
  "color": "yellow"
}
```

**NAVIGATE TO PAGE**: To direct user to a specific page:
```annotation
{
  "action": "navigate",
  "page": page_number
}
```

**CLEAR ANNOTATIONS**: To remove all highlights:
```annotation
{
  "action": "clear"
}
```"#;

/// System prompt for one student question about one document
#[derive(Debug, Clone)]
pub struct TutorPrompt<'a> {
    pub title: &'a str,
    pub document_text: &'a str,
    pub question: &'a str,
}

impl<'a> TutorPrompt<'a> {
    pub fn new(title: &'a str, document_text: &'a str, question: &'a str) -> Self {
        Self {
            title,
            document_text,
            question,
        }
    }

    pub fn render(&self, config: &PromptConfig) -> String {
        let context = truncate_chars(self.document_text, config.context_char_limit);

        format!(
            "You are an AI tutor helping a student understand a PDF document titled \"{title}\".\n\
             \n\
             AVAILABLE PDF CONTENT:\n\
             {context}\n\
             \n\
             Your capabilities include:\n\
             1. Answer questions about the document content\n\
             2. Reference specific pages when relevant\n\
             3. Control PDF annotations and highlighting\n\
             4. Navigate to specific pages\n\
             5. Provide explanations and clarifications\n\
             \n\
             {commands}\n\
             \n\
             RESPONSE FORMAT:\n\
             Respond using clean, well-formatted Markdown. Include annotation commands when appropriate.\n\
             \n\
             STUDENT QUESTION: \"{question}\"\n\
             \n\
             Provide a helpful, educational response with relevant page references and annotations.\n",
            title = self.title,
            context = context,
            commands = COMMAND_REFERENCE,
            question = self.question,
        )
    }
}

/// First `limit` characters of `text`, cut on a char boundary
pub fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}
