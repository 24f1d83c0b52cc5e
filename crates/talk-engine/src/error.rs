use talk_ledger::StoreError;
use talk_types::{MessageId, Name};
use thiserror::Error;

/// Why an action was rejected. Every variant aborts the whole call.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("missing authority of {actor}")]
    Unauthorized { actor: Name },
    #[error("message {id} not found")]
    NotFound { id: MessageId },
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("message {id} already exists")]
    AlreadyExists { id: MessageId },
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for ActionError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { id } => Self::NotFound { id },
            StoreError::InvalidArgument { id, floor } => Self::InvalidArgument(format!(
                "user-specified id {id} is too big (must be below {floor})"
            )),
            StoreError::AlreadyExists { id } => Self::AlreadyExists { id },
            other => Self::Store(other),
        }
    }
}
