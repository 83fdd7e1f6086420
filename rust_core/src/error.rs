use thiserror::Error;

/// Caller-side failures. Malformed OCR text is never one of these; it only
/// produces parser warnings.
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("reference data has no team for sheet type '{0}'")]
    MissingReferenceTeams(String),

    #[error("reference team '{team}' has an entry with an empty id")]
    EmptyReferenceId { team: String },

    #[error("reference team '{team}' lists id '{id}' more than once")]
    DuplicateReferenceId { team: String, id: String },

    #[error("failed to read reference data: {0}")]
    ReferenceIo(#[from] std::io::Error),

    #[error("failed to parse reference data: {0}")]
    ReferenceFormat(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ReconcileError>;
