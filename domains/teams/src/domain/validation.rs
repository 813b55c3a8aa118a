//! Presence rules for invitations

use roster_common::Error;
use thiserror::Error;

/// Why an invitation cannot be persisted
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invitation is missing a user")]
    MissingUser,

    #[error("invitation is missing a team")]
    MissingTeam,

    #[error("invitation is missing both a user and a team")]
    MissingUserAndTeam,
}

impl From<ValidationError> for Error {
    fn from(err: ValidationError) -> Self {
        Error::Validation(err.to_string())
    }
}
