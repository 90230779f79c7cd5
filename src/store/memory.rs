use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;

use super::{EventFilter, EventStore, StoreError};
use crate::models::{Event, EventId, NewEvent};

/// Event store kept in process memory.
///
/// Events are held in insertion order, so a stable sort by date yields the
/// same tie-breaking as the `seq` column in Postgres.
#[derive(Default)]
pub struct InMemoryEventStore {
    events: RwLock<Vec<Event>>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn insert(&self, event: NewEvent) -> Result<Event, StoreError> {
        let now = Utc::now();
        let stored = Event {
            id: EventId::generate(),
            title: event.title,
            description: event.description,
            location: event.location,
            date: event.date,
            max_participants: event.max_participants,
            current_participants: event.current_participants,
            created_at: now,
            updated_at: now,
        };

        self.events.write().push(stored.clone());
        Ok(stored)
    }

    async fn find_all(&self, filter: &EventFilter) -> Result<Vec<Event>, StoreError> {
        let mut matched: Vec<Event> = self
            .events
            .read()
            .iter()
            .filter(|event| filter.matches(event))
            .cloned()
            .collect();

        matched.sort_by_key(|event| event.date);
        Ok(matched)
    }

    async fn find_by_id(&self, id: &EventId) -> Result<Option<Event>, StoreError> {
        Ok(self.events.read().iter().find(|event| &event.id == id).cloned())
    }
}
