//! Viewer-side replay of extracted directives.
//!
//! Directives are applied strictly in source order, so a `clear` wipes out
//! every highlight created by the directives before it, including ones
//! still waiting for their page to be laid out.

use crate::resolver::HighlightResolver;
use crate::surface::RenderSurface;
use crate::types::{Directive, Highlight, PageLayout};
use log::{info, warn};
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReplaySummary {
    /// Directives that changed viewer state or produced highlights
    pub applied: usize,
    /// Directives referring to pages outside the document
    pub ignored: usize,
    /// Highlight directives waiting for page layout after this replay
    pub waiting: usize,
}

#[derive(Debug, Clone)]
pub struct AnnotationViewer {
    resolver: HighlightResolver,
    page_count: u32,
    current_page: u32,
    highlights: Vec<Highlight>,
    waiting: Vec<Directive>,
}

impl AnnotationViewer {
    pub fn new(page_count: u32, resolver: HighlightResolver) -> Self {
        Self {
            resolver,
            page_count,
            current_page: 1,
            highlights: Vec::new(),
            waiting: Vec::new(),
        }
    }

    pub fn apply(&mut self, directives: &[Directive], surface: &dyn RenderSurface) -> ReplaySummary {
        let mut summary = ReplaySummary::default();

        for directive in directives {
            let applied = match directive {
                Directive::Navigate { page } => self.navigate_to(*page),
                Directive::Clear => {
                    self.clear();
                    true
                }
                Directive::Area { page, .. } => {
                    // Area boxes are page-local already; no text layer needed
                    self.in_range(*page)
                        && self.add(self.resolver.resolve(directive, &PageLayout::default()))
                }
                Directive::Highlight { page, .. } => {
                    if !self.in_range(*page) {
                        false
                    } else if let Some(layout) = surface.page_layout(*page) {
                        self.add(self.resolver.resolve(directive, &layout));
                        true
                    } else {
                        info!("Page {} is not laid out yet; holding highlight", page);
                        self.waiting.push(directive.clone());
                        true
                    }
                }
            };

            if applied {
                summary.applied += 1;
            } else {
                summary.ignored += 1;
            }
        }

        summary.waiting = self.waiting.len();
        summary
    }

    /// Layout-ready signal from the renderer: resolve every highlight
    /// waiting on `page`, in the order they arrived.
    /// Returns the number of highlights created.
    pub fn page_ready(&mut self, page: u32, layout: &PageLayout) -> usize {
        let (ready, still_waiting): (Vec<Directive>, Vec<Directive>) =
            std::mem::take(&mut self.waiting)
                .into_iter()
                .partition(|directive| directive.page() == Some(page));
        self.waiting = still_waiting;

        let before = self.highlights.len();
        for directive in &ready {
            let resolved = self.resolver.resolve(directive, layout);
            self.highlights.extend(resolved);
        }
        self.highlights.len() - before
    }

    pub fn navigate_to(&mut self, page: u32) -> bool {
        if !self.in_range(page) {
            return false;
        }
        self.current_page = page;
        true
    }

    /// Remove every highlight and every waiting highlight directive
    pub fn clear(&mut self) {
        self.highlights.clear();
        self.waiting.clear();
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    pub fn highlights(&self) -> &[Highlight] {
        &self.highlights
    }

    pub fn waiting(&self) -> &[Directive] {
        &self.waiting
    }

    fn in_range(&self, page: u32) -> bool {
        if page >= 1 && page <= self.page_count {
            true
        } else {
            warn!("Page {} is outside 1..={}; ignoring", page, self.page_count);
            false
        }
    }

    fn add(&mut self, highlights: Vec<Highlight>) -> bool {
        self.highlights.extend(highlights);
        true
    }
}
