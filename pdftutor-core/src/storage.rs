use crate::config::StorageConfig;
use crate::extractor::classify;
use crate::types::{AreaCoordinates, Directive};
use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;
use uuid::Uuid;

// ===== DIRECTIVE LIST FORMAT =====
// Assistant messages are stored with their directive list as a JSON array,
// or null when the response carried no commands.

pub fn encode_directives(directives: &[Directive]) -> Result<Option<String>> {
    if directives.is_empty() {
        return Ok(None);
    }
    let json = serde_json::to_string(directives)
        .map_err(|e| anyhow!("Failed to serialize directives: {}", e))?;
    Ok(Some(json))
}

/// Decode a stored directive list. Elements that no longer classify are
/// dropped with the same rules the extractor applies.
pub fn decode_directives(json: &str) -> Result<Vec<Directive>> {
    let records: Vec<Value> = serde_json::from_str(json)
        .map_err(|e| anyhow!("Failed to deserialize stored directives: {}", e))?;

    Ok(records
        .iter()
        .filter_map(|record| match classify(record) {
            Ok(directive) => Some(directive),
            Err(e) => {
                warn!("Dropping stored directive: {}", e);
                None
            }
        })
        .collect())
}

// ===== ANNOTATION RECORDS =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnnotationKind {
    Highlight,
    Area,
}

/// What the annotation is pinned to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AnnotationAnchor {
    Text { text: String },
    Region { coordinates: AreaCoordinates },
}

/// A persisted highlight/area annotation authored by the tutor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationRecord {
    pub id: Uuid,
    pub message_id: Uuid,
    pub page_number: u32,
    pub kind: AnnotationKind,
    pub anchor: AnnotationAnchor,
    /// Comment if given, otherwise the highlighted phrase
    pub content: String,
    pub color: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

impl AnnotationRecord {
    /// Build the record for a highlight or area directive; viewer controls
    /// (navigate, clear) have no record.
    pub fn from_directive(
        directive: &Directive,
        message_id: Uuid,
        config: &StorageConfig,
    ) -> Option<Self> {
        let (page_number, kind, anchor, content, color) = match directive {
            Directive::Highlight {
                text,
                page,
                comment,
                color,
            } => (
                *page,
                AnnotationKind::Highlight,
                AnnotationAnchor::Text { text: text.clone() },
                comment.clone().unwrap_or_else(|| text.clone()),
                color,
            ),
            Directive::Area {
                page,
                coordinates,
                comment,
                color,
            } => (
                *page,
                AnnotationKind::Area,
                AnnotationAnchor::Region {
                    coordinates: *coordinates,
                },
                comment.clone().unwrap_or_default(),
                color,
            ),
            Directive::Navigate { .. } | Directive::Clear => return None,
        };

        Some(Self {
            id: Uuid::new_v4(),
            message_id,
            page_number,
            kind,
            anchor,
            content,
            color: color.clone().unwrap_or_else(|| config.default_color.clone()),
            created_by: config.created_by.clone(),
            created_at: Utc::now(),
        })
    }
}

// ===== STORAGE =====

/// Storage abstraction for tutor-authored annotations
pub trait AnnotationStore {
    fn get_annotations(&self, message_id: &Uuid) -> Result<Option<Vec<AnnotationRecord>>>;
    fn store_annotations(&self, message_id: &Uuid, records: &[AnnotationRecord]) -> Result<()>;
}

/// File-based storage, one JSON file per assistant message
pub struct FileAnnotationStore {
    cache_dir: String,
}

impl FileAnnotationStore {
    pub fn new(cache_dir: &str) -> Result<Self> {
        fs::create_dir_all(format!("{cache_dir}/annotations"))?;

        Ok(Self {
            cache_dir: cache_dir.to_string(),
        })
    }

    fn annotations_path(&self, message_id: &Uuid) -> String {
        format!("{}/annotations/{}.json", self.cache_dir, message_id)
    }
}

impl AnnotationStore for FileAnnotationStore {
    fn get_annotations(&self, message_id: &Uuid) -> Result<Option<Vec<AnnotationRecord>>> {
        let path = self.annotations_path(message_id);
        if Path::new(&path).exists() {
            let json_str = fs::read_to_string(path)?;
            let records: Vec<AnnotationRecord> = serde_json::from_str(&json_str)
                .map_err(|e| anyhow!("Failed to deserialize stored annotations: {}", e))?;
            Ok(Some(records))
        } else {
            Ok(None)
        }
    }

    fn store_annotations(&self, message_id: &Uuid, records: &[AnnotationRecord]) -> Result<()> {
        let path = self.annotations_path(message_id);
        let json_str = serde_json::to_string_pretty(records)
            .map_err(|e| anyhow!("Failed to serialize annotations: {}", e))?;
        fs::write(path, json_str)?;
        Ok(())
    }
}

/// No-op storage implementation that persists nothing
pub struct NoOpStore;

impl Default for NoOpStore {
    fn default() -> Self {
        Self::new()
    }
}

impl NoOpStore {
    pub fn new() -> Self {
        Self
    }
}

impl AnnotationStore for NoOpStore {
    fn get_annotations(&self, _message_id: &Uuid) -> Result<Option<Vec<AnnotationRecord>>> {
        Ok(None)
    }

    fn store_annotations(&self, _message_id: &Uuid, _records: &[AnnotationRecord]) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn highlight() -> Directive {
        Directive::Highlight {
            text: "electron transport chain".to_string(),
            page: 5,
            comment: None,
            color: None,
        }
    }

    #[test]
    fn test_empty_list_encodes_as_none() {
        assert_eq!(encode_directives(&[]).unwrap(), None);
    }

    #[test]
    fn test_encode_decode_keeps_order() {
        let directives = vec![highlight(), Directive::Clear, Directive::Navigate { page: 2 }];
        let json = encode_directives(&directives).unwrap().unwrap();
        assert!(json.starts_with('['));
        assert_eq!(decode_directives(&json).unwrap(), directives);
    }

    #[test]
    fn test_decode_drops_invalid_entries() {
        let json = r#"[{"action": "navigate", "page": 0}, {"action": "clear"}, {"action": "circle"}]"#;
        assert_eq!(decode_directives(json).unwrap(), vec![Directive::Clear]);
        assert!(decode_directives("{not json").is_err());
    }

    #[test]
    fn test_record_defaults() {
        let message_id = Uuid::new_v4();
        let record =
            AnnotationRecord::from_directive(&highlight(), message_id, &StorageConfig::default())
                .unwrap();
        assert_eq!(record.kind, AnnotationKind::Highlight);
        assert_eq!(record.content, "electron transport chain");
        assert_eq!(record.color, "yellow");
        assert_eq!(record.created_by, "AI");
        assert_eq!(record.message_id, message_id);

        assert!(AnnotationRecord::from_directive(
            &Directive::Clear,
            message_id,
            &StorageConfig::default()
        )
        .is_none());
    }

    #[test]
    fn test_area_record_keeps_coordinates() {
        let area = Directive::Area {
            page: 1,
            coordinates: AreaCoordinates {
                x: 100.0,
                y: 200.0,
                width: 300.0,
                height: 50.0,
            },
            comment: Some("diagram".to_string()),
            color: Some("blue".to_string()),
        };
        let record =
            AnnotationRecord::from_directive(&area, Uuid::new_v4(), &StorageConfig::default())
                .unwrap();
        assert_eq!(record.kind, AnnotationKind::Area);
        assert_eq!(record.content, "diagram");
        assert_eq!(record.color, "blue");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["kind"], "AREA");
        assert_eq!(json["anchor"]["type"], "region");
        assert_eq!(json["anchor"]["coordinates"]["width"], 300.0);
    }

    #[test]
    fn test_file_store_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = FileAnnotationStore::new(temp_dir.path().to_str().unwrap()).unwrap();

        let message_id = Uuid::new_v4();
        assert!(store.get_annotations(&message_id).unwrap().is_none());

        let record =
            AnnotationRecord::from_directive(&highlight(), message_id, &StorageConfig::default())
                .unwrap();
        store.store_annotations(&message_id, &[record.clone()]).unwrap();
        assert_eq!(store.get_annotations(&message_id).unwrap(), Some(vec![record]));
    }

    #[test]
    fn test_noop_store_forgets() {
        let store = NoOpStore::new();
        let message_id = Uuid::new_v4();
        store.store_annotations(&message_id, &[]).unwrap();
        assert!(store.get_annotations(&message_id).unwrap().is_none());
    }
}
