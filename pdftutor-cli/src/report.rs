use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use pdftutor_core::config::TutorConfig;
use pdftutor_core::storage::{AnnotationRecord, AnnotationStore};
use pdftutor_core::{
    AnnotationViewer, CommandExtractor, Directive, Highlight, HighlightResolver, RenderSurface,
    ReplaySummary,
};
use serde::Serialize;
use std::fs;
use uuid::Uuid;

/// What one saved model response does to the viewer
#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    pub generated_at: DateTime<Utc>,
    pub message_id: Uuid,
    pub clean_text: String,
    pub directives: Vec<Directive>,
    pub highlights: Vec<Highlight>,
    pub current_page: u32,
    pub page_count: u32,
    /// Highlight directives whose page never got a layout
    pub waiting: Vec<Directive>,
    pub summary: ReplaySummary,
    pub annotations: Vec<AnnotationRecord>,
}

impl ReplayReport {
    /// Extract directives from `response` and replay them onto a fresh viewer
    pub fn build(
        response: &str,
        surface: &dyn RenderSurface,
        page_count: u32,
        config: &TutorConfig,
    ) -> Self {
        let extraction = CommandExtractor::new(config.extractor.clone()).extract(response);

        let mut viewer =
            AnnotationViewer::new(page_count, HighlightResolver::new(config.resolver.clone()));
        let summary = viewer.apply(&extraction.directives, surface);

        let message_id = Uuid::new_v4();
        let annotations = extraction
            .directives
            .iter()
            .filter_map(|directive| {
                AnnotationRecord::from_directive(directive, message_id, &config.storage)
            })
            .collect();

        Self {
            generated_at: Utc::now(),
            message_id,
            clean_text: extraction.clean_text,
            directives: extraction.directives,
            highlights: viewer.highlights().to_vec(),
            current_page: viewer.current_page(),
            page_count: viewer.page_count(),
            waiting: viewer.waiting().to_vec(),
            summary,
            annotations,
        }
    }

    pub fn persist(&self, store: &dyn AnnotationStore) -> Result<usize> {
        if self.annotations.is_empty() {
            return Ok(0);
        }
        store.store_annotations(&self.message_id, &self.annotations)?;
        Ok(self.annotations.len())
    }

    pub fn save(&self, output_path: &str) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| anyhow!("Failed to serialize report: {}", e))?;
        fs::write(output_path, json)
            .map_err(|e| anyhow!("Failed to write report {}: {}", output_path, e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdftutor_core::storage::FileAnnotationStore;
    use pdftutor_core::{BoundingBox, PageLayout, PageOrigin, PageTextFragment, RenderWorker, StaticSurface};

    const RESPONSE: &str = "Mitochondria make ATP.\n\n\
        ```annotation\n{\"action\": \"navigate\", \"page\": 2}\n```\n\
        ```annotation\n{\"action\": \"highlight\", \"text\": \"inner membrane\", \"page\": 2}\n```\n\
        ```annotation\n{\"action\": \"highlight\", \"text\": \"cristae\", \"page\": 3}\n```";

    fn surface() -> StaticSurface {
        let mut surface = StaticSurface::new(&RenderWorker::configure("4.4.168"));
        surface.insert_page(
            2,
            PageLayout::new(
                PageOrigin::new(10.0, 800.0),
                vec![PageTextFragment::new(
                    "The inner membrane is folded",
                    BoundingBox::new(50.0, 850.0, 200.0, 18.0),
                )],
            ),
        );
        surface
    }

    #[test]
    fn test_report_reflects_viewer_state() {
        let report = ReplayReport::build(RESPONSE, &surface(), 3, &TutorConfig::default());

        assert_eq!(report.clean_text, "Mitochondria make ATP.");
        assert_eq!(report.directives.len(), 3);
        assert_eq!(report.current_page, 2);
        assert_eq!(report.highlights.len(), 1);
        assert_eq!(report.highlights[0].bounding_box, BoundingBox::new(40.0, 50.0, 200.0, 18.0));
        // page 3 was never laid out
        assert_eq!(report.waiting.len(), 1);
        assert_eq!(report.annotations.len(), 2);
    }

    #[test]
    fn test_report_persists_and_saves() {
        let temp_dir = tempfile::tempdir().unwrap();
        let report = ReplayReport::build(RESPONSE, &surface(), 3, &TutorConfig::default());

        let store = FileAnnotationStore::new(temp_dir.path().to_str().unwrap()).unwrap();
        assert_eq!(report.persist(&store).unwrap(), 2);
        assert_eq!(
            store.get_annotations(&report.message_id).unwrap(),
            Some(report.annotations.clone())
        );

        let output = temp_dir.path().join("report.json");
        report.save(output.to_str().unwrap()).unwrap();
        let saved: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(output).unwrap()).unwrap();
        assert_eq!(saved["current_page"], 2);
        assert_eq!(saved["directives"][0]["action"], "navigate");
    }
}
