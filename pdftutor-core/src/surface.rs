//! Rendering surface boundary
//!
//! The PDF renderer is an external collaborator. The core only needs two
//! things from it: a configured worker endpoint, obtained once at start-up,
//! and the text layer of a page once that page has been laid out.

use crate::types::PageLayout;
use anyhow::{anyhow, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub trait RenderSurface {
    /// Text layer of `page`, or `None` while the page is still being laid out
    fn page_layout(&self, page: u32) -> Option<PageLayout>;
}

/// Capability handle for the renderer's background worker.
///
/// Created once by [`RenderWorker::configure`] and handed to every surface
/// that needs it, instead of a process-wide "already configured" flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderWorker {
    renderer_version: String,
    worker_src: String,
}

impl RenderWorker {
    pub fn configure(renderer_version: &str) -> Self {
        let worker_src =
            format!("//unpkg.com/pdfjs-dist@{renderer_version}/build/pdf.worker.min.mjs");
        info!("Render worker configured: {}", worker_src);
        Self {
            renderer_version: renderer_version.to_string(),
            worker_src,
        }
    }

    pub fn renderer_version(&self) -> &str {
        &self.renderer_version
    }

    pub fn worker_src(&self) -> &str {
        &self.worker_src
    }
}

/// One page as recorded from the renderer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordedPage {
    pub page: u32,
    #[serde(flatten)]
    pub layout: PageLayout,
}

/// On-disk format for recorded page layouts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutFile {
    pub pages: Vec<RecordedPage>,
}

/// In-memory surface holding pages that have already been laid out
#[derive(Debug, Clone)]
pub struct StaticSurface {
    worker: RenderWorker,
    pages: BTreeMap<u32, PageLayout>,
}

impl StaticSurface {
    pub fn new(worker: &RenderWorker) -> Self {
        Self {
            worker: worker.clone(),
            pages: BTreeMap::new(),
        }
    }

    pub fn from_json(worker: &RenderWorker, json: &str) -> Result<Self> {
        let file: LayoutFile = serde_json::from_str(json)
            .map_err(|e| anyhow!("Failed to parse page layouts: {}", e))?;

        let mut surface = Self::new(worker);
        for recorded in file.pages {
            if recorded.page == 0 {
                return Err(anyhow!("Page numbers in a layout file start at 1"));
            }
            surface.insert_page(recorded.page, recorded.layout);
        }
        Ok(surface)
    }

    pub fn load_from_file(worker: &RenderWorker, path: &str) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read page layouts {}: {}", path, e))?;
        Self::from_json(worker, &json)
    }

    pub fn insert_page(&mut self, page: u32, layout: PageLayout) {
        self.pages.insert(page, layout);
    }

    /// Highest page number with a recorded layout
    pub fn last_page(&self) -> Option<u32> {
        self.pages.keys().next_back().copied()
    }

    pub fn worker(&self) -> &RenderWorker {
        &self.worker
    }
}

impl RenderSurface for StaticSurface {
    fn page_layout(&self, page: u32) -> Option<PageLayout> {
        self.pages.get(&page).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worker_src_tracks_version() {
        let worker = RenderWorker::configure("4.4.168");
        assert_eq!(
            worker.worker_src(),
            "//unpkg.com/pdfjs-dist@4.4.168/build/pdf.worker.min.mjs"
        );
        assert_eq!(worker.renderer_version(), "4.4.168");
    }

    #[test]
    fn test_surface_from_json() {
        let worker = RenderWorker::configure("4.4.168");
        let json = r#"{
            "pages": [
                {
                    "page": 2,
                    "origin": {"left": 10.0, "top": 20.0},
                    "fragments": [
                        {"content": "Stroma", "bounding_box": {"left": 30.0, "top": 40.0, "width": 50.0, "height": 12.0}}
                    ]
                },
                {"page": 5, "origin": {"left": 0.0, "top": 0.0}}
            ]
        }"#;
        let surface = StaticSurface::from_json(&worker, json).unwrap();

        assert_eq!(surface.last_page(), Some(5));
        assert!(surface.page_layout(1).is_none());
        let page_two = surface.page_layout(2).unwrap();
        assert_eq!(page_two.fragments.len(), 1);
        assert_eq!(page_two.origin.top, 20.0);
        assert!(surface.page_layout(5).unwrap().fragments.is_empty());
        assert_eq!(surface.worker(), &worker);
    }

    #[test]
    fn test_page_zero_is_rejected() {
        let worker = RenderWorker::configure("4.4.168");
        let json = r#"{"pages": [{"page": 0, "origin": {"left": 0, "top": 0}}]}"#;
        assert!(StaticSurface::from_json(&worker, json).is_err());
    }
}
