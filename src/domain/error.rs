//! Failure taxonomy shared by the services and the HTTP boundary.

use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed or missing input, detected before the store is touched
    #[error("{0}")]
    Validation(String),
    /// A referenced record does not exist
    #[error("{0}")]
    NotFound(String),
    /// The store rejected a read or write
    #[error("store failure: {0}")]
    Persistence(#[from] StoreError),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }
}
