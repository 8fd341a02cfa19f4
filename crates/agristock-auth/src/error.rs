//! Authentication error types.

use agristock_core::error::Error;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("account is deactivated")]
    AccountDeactivated,

    #[error("account is pending approval")]
    AccountPendingApproval,

    #[error("cryptography error: {0}")]
    Crypto(String),
}

impl From<AuthError> for Error {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => Error::InvalidCredentials,
            AuthError::AccountDeactivated | AuthError::AccountPendingApproval => {
                Error::AccountInactive {
                    reason: err.to_string(),
                }
            }
            AuthError::Crypto(msg) => Error::Internal(msg),
        }
    }
}
