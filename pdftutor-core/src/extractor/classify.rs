use crate::error::DirectiveError;
use crate::types::{AreaCoordinates, Directive, DirectiveKind};
use log::debug;
use serde_json::{Map, Value};

type Fields = Map<String, Value>;

/// Parse one block body and classify it
pub fn parse_block(body: &str) -> Result<Directive, DirectiveError> {
    let record: Value =
        serde_json::from_str(body).map_err(|e| DirectiveError::Malformed(e.to_string()))?;
    classify(&record)
}

/// Turn a parsed annotation record into a typed directive.
///
/// Required fields must have the right type (`page` a positive integer,
/// `text` a non-blank string). Optional `comment`/`color` values of the
/// wrong type are dropped without rejecting the directive.
pub fn classify(record: &Value) -> Result<Directive, DirectiveError> {
    let fields = record.as_object().ok_or(DirectiveError::NotAnObject)?;

    let action = match fields.get("action") {
        None | Some(Value::Null) => return Err(DirectiveError::MissingAction),
        Some(Value::String(action)) => action.as_str(),
        Some(other) => return Err(DirectiveError::UnknownAction(other.to_string())),
    };
    let kind = DirectiveKind::from_action(action)
        .ok_or_else(|| DirectiveError::UnknownAction(action.to_string()))?;

    match kind {
        DirectiveKind::Highlight => Ok(Directive::Highlight {
            text: text_field(fields)?,
            page: page_field(fields, kind)?,
            comment: optional_string(fields, "comment"),
            color: optional_string(fields, "color"),
        }),
        DirectiveKind::Area => Ok(Directive::Area {
            page: page_field(fields, kind)?,
            coordinates: coordinates_field(fields)?,
            comment: optional_string(fields, "comment"),
            color: optional_string(fields, "color"),
        }),
        DirectiveKind::Navigate => Ok(Directive::Navigate {
            page: page_field(fields, kind)?,
        }),
        DirectiveKind::Clear => Ok(Directive::Clear),
    }
}

fn page_field(fields: &Fields, kind: DirectiveKind) -> Result<u32, DirectiveError> {
    let value = fields.get("page").ok_or(DirectiveError::MissingField {
        action: kind.as_str(),
        field: "page",
    })?;

    // as_u64 rejects negatives, fractions and strings
    match value.as_u64() {
        Some(page) if page >= 1 => {
            u32::try_from(page).map_err(|_| DirectiveError::InvalidPage(value.to_string()))
        }
        _ => Err(DirectiveError::InvalidPage(value.to_string())),
    }
}

fn text_field(fields: &Fields) -> Result<String, DirectiveError> {
    match fields.get("text") {
        None | Some(Value::Null) => Err(DirectiveError::MissingField {
            action: "highlight",
            field: "text",
        }),
        Some(Value::String(text)) if text.trim().is_empty() => Err(DirectiveError::EmptyText),
        Some(Value::String(text)) => Ok(text.clone()),
        Some(_) => Err(DirectiveError::WrongType {
            action: "highlight",
            field: "text",
        }),
    }
}

fn coordinates_field(fields: &Fields) -> Result<AreaCoordinates, DirectiveError> {
    let wrong_type = DirectiveError::WrongType {
        action: "area",
        field: "coordinates",
    };

    let coordinates = match fields.get("coordinates") {
        None | Some(Value::Null) => {
            return Err(DirectiveError::MissingField {
                action: "area",
                field: "coordinates",
            })
        }
        Some(Value::Object(coordinates)) => coordinates,
        Some(_) => return Err(wrong_type),
    };

    let number = |name: &str| coordinates.get(name).and_then(Value::as_f64);
    match (number("x"), number("y"), number("width"), number("height")) {
        (Some(x), Some(y), Some(width), Some(height)) => Ok(AreaCoordinates {
            x,
            y,
            width,
            height,
        }),
        _ => Err(wrong_type),
    }
}

fn optional_string(fields: &Fields, name: &str) -> Option<String> {
    match fields.get(name) {
        Some(Value::String(value)) => Some(value.clone()),
        None | Some(Value::Null) => None,
        Some(other) => {
            debug!("Ignoring non-string `{}` value {}", name, other);
            None
        }
    }
}
