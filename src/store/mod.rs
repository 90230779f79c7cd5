//! Storage collaborator for events.
//!
//! The service layer only talks to [`EventStore`]. `PgEventStore` is the
//! production backend; `InMemoryEventStore` keeps the same ordering and
//! filtering semantics for tests and the `memory` backend.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::models::{Event, EventId, NewEvent};

pub use memory::InMemoryEventStore;
pub use postgres::PgEventStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Read filter for `find_all`. Results are always ordered by date, then
/// insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFilter {
    /// Case-insensitive substring of `location`. Matched literally.
    pub location: Option<String>,
}

impl EventFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn location(text: impl Into<String>) -> Self {
        Self {
            location: Some(text.into()),
        }
    }

    pub fn matches(&self, event: &Event) -> bool {
        match &self.location {
            Some(needle) => event
                .location
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            None => true,
        }
    }
}

#[async_trait]
pub trait EventStore: Send + Sync {
    /// Persists a validated event, assigning its id and timestamps.
    async fn insert(&self, event: NewEvent) -> Result<Event, StoreError>;

    async fn find_all(&self, filter: &EventFilter) -> Result<Vec<Event>, StoreError>;

    async fn find_by_id(&self, id: &EventId) -> Result<Option<Event>, StoreError>;
}
