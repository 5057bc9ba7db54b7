use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtoError {
    #[error("Missing mandatory field: {0}")]
    MissingField(&'static str),

    #[error("Field {key} has the wrong type, expected {expected}")]
    InvalidField {
        key: &'static str,
        expected: &'static str,
    },

    #[error("Expected a JSON object for {0}")]
    NotAnObject(&'static str),

    #[error("Wrong event type: expected {expected}, found {found}")]
    WrongEventType {
        expected: &'static str,
        found: String,
    },

    #[error("Serialisation error: {0}")]
    Serialisation(#[from] serde_json::Error),
}
