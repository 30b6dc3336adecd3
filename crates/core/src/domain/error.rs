// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("{0}")]
    Validation(String),

    #[error("Consumer has no container identity")]
    NoContainerIdentity,
}

pub type Result<T> = std::result::Result<T, DomainError>;
