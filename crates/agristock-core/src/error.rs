//! Error types shared across the agristock system.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Permission denied: {reason}")]
    PermissionDenied { reason: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("account is not usable: {reason}")]
    AccountInactive { reason: String },

    #[error("Store error: {0}")]
    Store(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;
