use crate::config::TutorConfig;
use crate::extractor::CommandExtractor;
use crate::prompt::{TextGenerator, TutorPrompt};
use crate::storage::{encode_directives, AnnotationRecord, AnnotationStore};
use crate::types::Directive;
use anyhow::{anyhow, Result};
use log::{info, warn};
use serde::Serialize;
use uuid::Uuid;

/// Everything the web layer needs after one tutor turn
#[derive(Debug, Clone, Serialize)]
pub struct TutorReply {
    pub message_id: Uuid,
    /// Response with annotation blocks removed, ready to display
    pub clean_text: String,
    /// All valid directives in source order
    pub directives: Vec<Directive>,
    /// JSON stored alongside the assistant message (None when empty)
    pub directives_json: Option<String>,
    /// Records for highlight/area directives
    pub annotations: Vec<AnnotationRecord>,
    /// Navigate/clear directives, in source order, for the viewer
    pub controls: Vec<Directive>,
}

/// One document's tutoring conversation
pub struct TutorSession {
    generator: Box<dyn TextGenerator>,
    store: Box<dyn AnnotationStore + Send + Sync>,
    extractor: CommandExtractor,
    config: TutorConfig,
    title: String,
    document_text: String,
}

impl TutorSession {
    /// Create a session with full dependency injection
    pub fn new_with_dependencies(
        generator: Box<dyn TextGenerator>,
        store: Box<dyn AnnotationStore + Send + Sync>,
        config: TutorConfig,
        title: &str,
        document_text: &str,
    ) -> Self {
        Self {
            generator,
            store,
            extractor: CommandExtractor::new(config.extractor.clone()),
            config,
            title: title.to_string(),
            document_text: document_text.to_string(),
        }
    }

    pub fn prompt_for(&self, question: &str) -> String {
        TutorPrompt::new(&self.title, &self.document_text, question).render(&self.config.prompt)
    }

    /// Ask the tutor one question.
    ///
    /// Only a generator failure is an error. Bad annotation blocks are
    /// dropped by the extractor and a failing store is logged, so the
    /// student still gets the answer.
    pub fn ask(&self, question: &str) -> Result<TutorReply> {
        if question.trim().is_empty() {
            return Err(anyhow!("Question must not be empty"));
        }

        let prompt = self.prompt_for(question);
        let response = self
            .generator
            .generate(&prompt)
            .map_err(|e| anyhow!("Text generation failed: {}", e))?;

        let extraction = self.extractor.extract(&response);
        let message_id = Uuid::new_v4();

        let annotations: Vec<AnnotationRecord> = extraction
            .directives
            .iter()
            .filter_map(|directive| {
                AnnotationRecord::from_directive(directive, message_id, &self.config.storage)
            })
            .collect();

        if !annotations.is_empty() {
            if let Err(e) = self.store.store_annotations(&message_id, &annotations) {
                warn!("Failed to store annotations for {}: {}", message_id, e);
            }
        }

        let controls: Vec<Directive> = extraction
            .directives
            .iter()
            .filter(|directive| directive.is_viewer_control())
            .cloned()
            .collect();

        info!(
            "Tutor reply {}: {} directives, {} annotations, {} controls",
            message_id,
            extraction.directives.len(),
            annotations.len(),
            controls.len()
        );

        Ok(TutorReply {
            message_id,
            directives_json: encode_directives(&extraction.directives)?,
            clean_text: extraction.clean_text,
            directives: extraction.directives,
            annotations,
            controls,
        })
    }
}
