//! Team management error types.

use agristock_core::error::Error;
use thiserror::Error as ThisError;
use uuid::Uuid;

#[derive(Debug, ThisError)]
pub enum TeamError {
    #[error("team name must be at least {min} characters")]
    NameTooShort { min: usize },

    #[error("user {user_id} does not exist and cannot manage a team")]
    ManagerMissing { user_id: Uuid },

    #[error("user {user_id} has role User and cannot manage a team")]
    ManagerNotEligible { user_id: Uuid },

    #[error("user {user_id} does not exist and cannot be a member")]
    UnknownMember { user_id: Uuid },
}

impl From<TeamError> for Error {
    fn from(err: TeamError) -> Self {
        Error::Validation {
            message: err.to_string(),
        }
    }
}
