use thiserror::Error;

/// Why an annotation block did not become a [`crate::Directive`].
///
/// None of these are fatal: the extractor logs them and drops the block.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DirectiveError {
    #[error("malformed annotation block: {0}")]
    Malformed(String),

    #[error("annotation record is not an object")]
    NotAnObject,

    #[error("annotation record has no action")]
    MissingAction,

    #[error("unknown annotation action: {0}")]
    UnknownAction(String),

    #[error("{action} command is missing `{field}`")]
    MissingField {
        action: &'static str,
        field: &'static str,
    },

    #[error("{action} command has a wrongly typed `{field}`")]
    WrongType {
        action: &'static str,
        field: &'static str,
    },

    #[error("page must be a positive integer, got {0}")]
    InvalidPage(String),

    #[error("highlight text is empty")]
    EmptyText,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_field() {
        let err = DirectiveError::MissingField {
            action: "area",
            field: "coordinates",
        };
        assert_eq!(err.to_string(), "area command is missing `coordinates`");
        assert_eq!(
            DirectiveError::InvalidPage("0".to_string()).to_string(),
            "page must be a positive integer, got 0"
        );
    }
}
