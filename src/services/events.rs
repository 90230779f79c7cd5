use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::EventError;
use crate::models::{Event, EventId};
use crate::store::{EventFilter, EventStore};
use crate::validation::CreateEventRequest;

/// Read and write operations over the event collection.
#[derive(Clone)]
pub struct EventService {
    store: Arc<dyn EventStore>,
}

impl EventService {
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self { store }
    }

    pub async fn create_event(&self, request: CreateEventRequest) -> Result<Event, EventError> {
        self.create_event_at(request, Utc::now()).await
    }

    /// Validates against `now`, then hands the candidate to the store.
    pub async fn create_event_at(
        &self,
        request: CreateEventRequest,
        now: DateTime<Utc>,
    ) -> Result<Event, EventError> {
        let candidate = request.validate_at(now)?;
        let event = self.store.insert(candidate).await?;

        info!("Created event {} at {}", event.id, event.location);
        Ok(event)
    }

    /// Lists events soonest first. A blank filter means no filter; any other
    /// filter is matched as given, surrounding spaces included.
    pub async fn list_events(&self, location: Option<&str>) -> Result<Vec<Event>, EventError> {
        let filter = match location {
            Some(text) if !text.trim().is_empty() => EventFilter::location(text),
            _ => EventFilter::all(),
        };

        let events = self.store.find_all(&filter).await?;
        debug!("Listed {} events (filter: {:?})", events.len(), filter.location);
        Ok(events)
    }

    pub async fn get_event_by_id(&self, id: &str) -> Result<Event, EventError> {
        let id = EventId::parse(id).map_err(|e| EventError::InvalidIdentifier(e.0))?;

        self.store
            .find_by_id(&id)
            .await?
            .ok_or(EventError::NotFound(id))
    }
}
