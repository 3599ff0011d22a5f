use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum BallotError {
    #[error("User not found: {0}")]
    UserNotFound(Uuid),

    #[error("Rfc not found: {0}")]
    RfcNotFound(Uuid),

    #[error("Argument not found: {0}")]
    ArgumentNotFound(Uuid),

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl BallotError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UserNotFound(_) | Self::RfcNotFound(_) | Self::ArgumentNotFound(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, BallotError>;
