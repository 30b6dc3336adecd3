// Central Error Type for the Application

use crate::domain::DomainError;
use thiserror::Error;

/// Application-level error type
///
/// The first five variants are the producer/resolver taxonomy surfaced to
/// callers; the rest are plumbing failures from adapters.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    SecurityCheckFailed(String),

    #[error("{0}")]
    PermissionDenied(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Product creation failed: {0}")]
    CreationFailed(String),

    #[error("Consumer has no container identity")]
    NoContainerIdentity,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Human-readable message without the variant prefix, for boundary responses
    pub fn user_message(&self) -> String {
        match self {
            AppError::SecurityCheckFailed(msg)
            | AppError::PermissionDenied(msg)
            | AppError::Validation(msg)
            | AppError::CreationFailed(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => AppError::Validation(msg),
            DomainError::NoContainerIdentity => AppError::NoContainerIdentity,
        }
    }
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

// Note: sqlx::Error and reqwest::Error conversions live in the infra crates
// by mapping to AppError::Storage / AppError::CreationFailed
