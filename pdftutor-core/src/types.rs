use crate::geometry::{BoundingBox, PageOrigin};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

pub type HighlightId = Uuid;

// ===== DIRECTIVES =====
// A directive is one annotation command pulled out of a model response.
// The serialized form is the same record the model writes inside an
// ```annotation block, so a directive can be re-embedded and re-extracted.

/// Rectangle carried by an `area` command, in page-local coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AreaCoordinates {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl AreaCoordinates {
    pub fn to_bounding_box(&self) -> BoundingBox {
        BoundingBox::new(self.x, self.y, self.width, self.height)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum Directive {
    Highlight {
        text: String,
        page: u32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        comment: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        color: Option<String>,
    },
    Area {
        page: u32,
        coordinates: AreaCoordinates,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        comment: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        color: Option<String>,
    },
    Navigate {
        page: u32,
    },
    Clear,
}

impl Directive {
    pub fn kind(&self) -> DirectiveKind {
        match self {
            Directive::Highlight { .. } => DirectiveKind::Highlight,
            Directive::Area { .. } => DirectiveKind::Area,
            Directive::Navigate { .. } => DirectiveKind::Navigate,
            Directive::Clear => DirectiveKind::Clear,
        }
    }

    /// Target page, if the directive has one
    pub fn page(&self) -> Option<u32> {
        match self {
            Directive::Highlight { page, .. }
            | Directive::Area { page, .. }
            | Directive::Navigate { page } => Some(*page),
            Directive::Clear => None,
        }
    }

    /// Navigate and clear act on viewer state instead of producing highlights
    pub fn is_viewer_control(&self) -> bool {
        matches!(self, Directive::Navigate { .. } | Directive::Clear)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DirectiveKind {
    Highlight,
    Area,
    Navigate,
    Clear,
}

impl DirectiveKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DirectiveKind::Highlight => "highlight",
            DirectiveKind::Area => "area",
            DirectiveKind::Navigate => "navigate",
            DirectiveKind::Clear => "clear",
        }
    }

    /// Exact, case-sensitive lookup of an `action` value
    pub fn from_action(action: &str) -> Option<Self> {
        match action {
            "highlight" => Some(DirectiveKind::Highlight),
            "area" => Some(DirectiveKind::Area),
            "navigate" => Some(DirectiveKind::Navigate),
            "clear" => Some(DirectiveKind::Clear),
            _ => None,
        }
    }
}

impl fmt::Display for DirectiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of the command extractor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Response text with every annotation block removed
    pub clean_text: String,
    /// Valid directives in order of appearance
    pub directives: Vec<Directive>,
}

// ===== PAGE TEXT LAYER =====

/// One positioned span of text on a rendered page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageTextFragment {
    pub content: String,
    /// Box in rendering-surface coordinates
    pub bounding_box: BoundingBox,
}

impl PageTextFragment {
    pub fn new(content: &str, bounding_box: BoundingBox) -> Self {
        Self {
            content: content.to_string(),
            bounding_box,
        }
    }
}

/// Text layer of a single page once the renderer has laid it out
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PageLayout {
    pub origin: PageOrigin,
    #[serde(default)]
    pub fragments: Vec<PageTextFragment>,
}

impl PageLayout {
    pub fn new(origin: PageOrigin, fragments: Vec<PageTextFragment>) -> Self {
        Self { origin, fragments }
    }
}

// ===== HIGHLIGHTS =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HighlightKind {
    /// Anchored on a matched text fragment
    Text,
    /// Free rectangle from an `area` command
    Area,
}

/// A resolved highlight ready for the renderer overlay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Highlight {
    pub id: HighlightId,
    pub page_number: u32,
    pub kind: HighlightKind,
    /// Content of the matched fragment; empty for area highlights
    pub source_text: String,
    pub color: String,
    pub comment: Option<String>,
    /// Page-local box
    pub bounding_box: BoundingBox,
    pub created_at: DateTime<Utc>,
}

impl Highlight {
    pub fn new(
        kind: HighlightKind,
        page_number: u32,
        source_text: String,
        color: String,
        comment: Option<String>,
        bounding_box: BoundingBox,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            page_number,
            kind,
            source_text,
            color,
            comment,
            bounding_box,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_directive_serializes_as_annotation_record() {
        let directive = Directive::Highlight {
            text: "light reactions".to_string(),
            page: 4,
            comment: None,
            color: Some("yellow".to_string()),
        };
        let value = serde_json::to_value(&directive).unwrap();
        assert_eq!(
            value,
            json!({"action": "highlight", "text": "light reactions", "page": 4, "color": "yellow"})
        );

        assert_eq!(
            serde_json::to_value(&Directive::Clear).unwrap(),
            json!({"action": "clear"})
        );
    }

    #[test]
    fn test_directive_kind_lookup_is_exact() {
        assert_eq!(DirectiveKind::from_action("area"), Some(DirectiveKind::Area));
        assert_eq!(DirectiveKind::from_action("Area"), None);
        assert_eq!(DirectiveKind::from_action("circle"), None);
    }

    #[test]
    fn test_viewer_controls() {
        assert!(Directive::Clear.is_viewer_control());
        assert!(Directive::Navigate { page: 2 }.is_viewer_control());
        assert_eq!(Directive::Navigate { page: 2 }.page(), Some(2));
        assert_eq!(Directive::Clear.page(), None);
    }

    #[test]
    fn test_highlight_ids_are_unique() {
        let a = Highlight::new(
            HighlightKind::Text,
            1,
            "x".to_string(),
            "yellow".to_string(),
            None,
            BoundingBox::default(),
        );
        let b = Highlight::new(
            HighlightKind::Text,
            1,
            "x".to_string(),
            "yellow".to_string(),
            None,
            BoundingBox::default(),
        );
        assert_ne!(a.id, b.id);
    }
}
