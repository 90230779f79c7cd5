use crate::models::EventId;
use crate::store::StoreError;
use crate::validation::ValidationError;

/// Outcome kinds of the event core. Transport mapping lives in `controllers`.
#[derive(Debug, thiserror::Error)]
pub enum EventError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("invalid event id format: {0:?}")]
    InvalidIdentifier(String),
    #[error("event {0} not found")]
    NotFound(EventId),
    #[error("storage unavailable: {0}")]
    StorageUnavailable(#[from] StoreError),
}
