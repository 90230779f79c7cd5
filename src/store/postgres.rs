use async_trait::async_trait;
use tracing::debug;

use super::{EventFilter, EventStore, StoreError};
use crate::database::Database;
use crate::models::{Event, EventId, NewEvent};

/// Postgres-backed event store. `seq` carries insertion order for ties on
/// `date`.
#[derive(Clone)]
pub struct PgEventStore {
    db: Database,
}

impl PgEventStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

// Escapes LIKE wildcards so the filter matches literally.
fn like_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[async_trait]
impl EventStore for PgEventStore {
    async fn insert(&self, event: NewEvent) -> Result<Event, StoreError> {
        let id = EventId::generate();

        let created = sqlx::query_as::<_, Event>(
            r#"
            INSERT INTO events (id, title, description, location, date, max_participants, current_participants)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, title, description, location, date, max_participants,
                      current_participants, created_at, updated_at
            "#
        )
        .bind(&id)
        .bind(&event.title)
        .bind(&event.description)
        .bind(&event.location)
        .bind(event.date)
        .bind(event.max_participants)
        .bind(event.current_participants)
        .fetch_one(self.db.pool())
        .await?;

        debug!("Inserted event {}", created.id);
        Ok(created)
    }

    async fn find_all(&self, filter: &EventFilter) -> Result<Vec<Event>, StoreError> {
        let pattern = filter.location.as_deref().map(like_pattern);

        let events = sqlx::query_as::<_, Event>(
            r#"
            SELECT id, title, description, location, date, max_participants,
                   current_participants, created_at, updated_at
            FROM events
            WHERE $1::TEXT IS NULL OR location ILIKE $1 ESCAPE '\'
            ORDER BY date ASC, seq ASC
            "#
        )
        .bind(pattern)
        .fetch_all(self.db.pool())
        .await?;

        Ok(events)
    }

    async fn find_by_id(&self, id: &EventId) -> Result<Option<Event>, StoreError> {
        let event = sqlx::query_as::<_, Event>(
            r#"
            SELECT id, title, description, location, date, max_participants,
                   current_participants, created_at, updated_at
            FROM events
            WHERE id = $1
            "#
        )
        .bind(id)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(event)
    }
}
