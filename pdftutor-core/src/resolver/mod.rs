//! Highlight Resolver
//!
//! Maps a `highlight` or `area` directive onto a page's text layer and
//! produces page-local highlight records. The page layout is passed in, so
//! the resolver never queries the renderer and can be exercised with
//! hand-built fragments.

pub mod matching;

use crate::config::ResolverConfig;
use crate::types::{AreaCoordinates, Directive, Highlight, HighlightKind, PageLayout};
use log::{debug, info, warn};

pub use matching::{match_fragments, FragmentMatch, MatchTier};

#[derive(Debug, Clone, Default)]
pub struct HighlightResolver {
    config: ResolverConfig,
}

impl HighlightResolver {
    pub fn new(config: ResolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve one directive against the layout of its page.
    ///
    /// An empty result is not an error: either the phrase was not found or
    /// the page had no fragments yet, and the caller may retry once the page
    /// is laid out. Navigate and clear never produce highlights.
    pub fn resolve(&self, directive: &Directive, layout: &PageLayout) -> Vec<Highlight> {
        match directive {
            Directive::Highlight {
                text,
                page,
                comment,
                color,
            } => self.resolve_text(text, *page, comment.as_deref(), color.as_deref(), layout),
            Directive::Area {
                page,
                coordinates,
                comment,
                color,
            } => vec![self.resolve_area(*page, coordinates, comment.as_deref(), color.as_deref())],
            Directive::Navigate { .. } | Directive::Clear => {
                debug!("{} directive has nothing to resolve", directive.kind());
                Vec::new()
            }
        }
    }

    fn resolve_text(
        &self,
        text: &str,
        page: u32,
        comment: Option<&str>,
        color: Option<&str>,
        layout: &PageLayout,
    ) -> Vec<Highlight> {
        debug!(
            "Searching for \"{}\" among {} fragments on page {}",
            text,
            layout.fragments.len(),
            page
        );

        let Some(found) = match_fragments(text, &layout.fragments, &self.config) else {
            warn!("No text found for \"{}\" on page {}", text, page);
            return Vec::new();
        };

        let highlights: Vec<Highlight> = found
            .indices
            .iter()
            .map(|&index| {
                let fragment = &layout.fragments[index];
                let bounding_box = fragment
                    .bounding_box
                    .to_page_local(layout.origin)
                    .with_min_size(self.config.min_width, self.config.min_height);
                Highlight::new(
                    HighlightKind::Text,
                    page,
                    fragment.content.clone(),
                    self.color_or_default(color),
                    comment.map(str::to_string),
                    bounding_box,
                )
            })
            .collect();

        info!(
            "Highlighted {} fragments for \"{}\" on page {} ({:?} match)",
            highlights.len(),
            text,
            page,
            found.tier
        );
        highlights
    }

    /// Area coordinates are already page-local and are used verbatim.
    fn resolve_area(
        &self,
        page: u32,
        coordinates: &AreaCoordinates,
        comment: Option<&str>,
        color: Option<&str>,
    ) -> Highlight {
        Highlight::new(
            HighlightKind::Area,
            page,
            String::new(),
            self.color_or_default(color),
            comment.map(str::to_string),
            coordinates.to_bounding_box(),
        )
    }

    fn color_or_default(&self, color: Option<&str>) -> String {
        color.unwrap_or(self.config.default_color.as_str()).to_string()
    }
}

/// Resolve with the default configuration
pub fn resolve(directive: &Directive, layout: &PageLayout) -> Vec<Highlight> {
    HighlightResolver::default().resolve(directive, layout)
}
