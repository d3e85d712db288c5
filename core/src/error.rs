use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeskError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },

    #[error("Invalid KYC transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DeskError {
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        DeskError::NotFound { kind, id: id.into() }
    }
}

pub type DeskResult<T> = Result<T, DeskError>;
