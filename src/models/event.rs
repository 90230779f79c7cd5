use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Upper bound for `max_participants`.
pub const MAX_PARTICIPANTS_LIMIT: i32 = 10_000;

/// Length of an event identifier in hex characters.
pub const EVENT_ID_LEN: usize = 24;

/// Opaque event key: 24 lowercase hex characters.
///
/// Layout is 4 bytes of big-endian unix seconds followed by 8 random bytes,
/// so freshly generated ids roughly follow creation order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct EventId(String);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid event id: {0:?}")]
pub struct InvalidEventId(pub String);

impl EventId {
    pub fn generate() -> Self {
        let seconds = Utc::now().timestamp() as u32;
        let random = Uuid::new_v4();
        let mut tail = [0u8; 8];
        tail.copy_from_slice(&random.as_bytes()[..8]);

        EventId(format!("{:08x}{:016x}", seconds, u64::from_be_bytes(tail)))
    }

    pub fn parse(raw: &str) -> Result<Self, InvalidEventId> {
        if raw.len() == EVENT_ID_LEN && raw.bytes().all(|b| b.is_ascii_hexdigit()) {
            Ok(EventId(raw.to_ascii_lowercase()))
        } else {
            Err(InvalidEventId(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for EventId {
    type Err = InvalidEventId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventId::parse(s)
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

/// A persisted event, as returned by the store.
#[derive(Debug, Clone, PartialEq, FromRow, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: EventId,
    pub title: String,
    pub description: String,
    pub location: String,
    pub date: DateTime<Utc>,
    pub max_participants: i32,
    pub current_participants: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A validated candidate, ready to be handed to a store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub location: String,
    pub date: DateTime<Utc>,
    pub max_participants: i32,
    pub current_participants: i32,
}

pub fn is_full(event: &Event) -> bool {
    event.current_participants >= event.max_participants
}

pub fn available_spots(event: &Event) -> i32 {
    event.max_participants - event.current_participants
}

// Wire shape: both `_id` and `id`, plus the computed capacity fields.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EventJson<'a> {
    #[serde(rename = "_id")]
    object_id: &'a EventId,
    id: &'a EventId,
    title: &'a str,
    description: &'a str,
    location: &'a str,
    date: &'a DateTime<Utc>,
    max_participants: i32,
    current_participants: i32,
    created_at: &'a DateTime<Utc>,
    updated_at: &'a DateTime<Utc>,
    is_full: bool,
    available_spots: i32,
}

impl Serialize for Event {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        EventJson {
            object_id: &self.id,
            id: &self.id,
            title: &self.title,
            description: &self.description,
            location: &self.location,
            date: &self.date,
            max_participants: self.max_participants,
            current_participants: self.current_participants,
            created_at: &self.created_at,
            updated_at: &self.updated_at,
            is_full: is_full(self),
            available_spots: available_spots(self),
        }
        .serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample(max: i32, current: i32) -> Event {
        let now = Utc::now();
        Event {
            id: EventId::generate(),
            title: "Meetup".into(),
            description: "desc".into(),
            location: "Pune".into(),
            date: now + Duration::days(1),
            max_participants: max,
            current_participants: current,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn generated_ids_are_well_formed() {
        let id = EventId::generate();
        assert_eq!(id.as_str().len(), EVENT_ID_LEN);
        assert_eq!(EventId::parse(id.as_str()), Ok(id.clone()));
        assert_ne!(id, EventId::generate());
    }

    #[test]
    fn parse_rejects_malformed_ids() {
        assert!(EventId::parse("not-24-hex-chars").is_err());
        assert!(EventId::parse("65f1c2d3e4b5a69788990a1").is_err());
        assert!(EventId::parse("65f1c2d3e4b5a69788990a1bc").is_err());
        assert!(EventId::parse("65f1c2d3e4b5a69788990a1z").is_err());
    }

    #[test]
    fn parse_normalizes_case() {
        let id: EventId = "65F1C2D3E4B5A69788990A1B".parse().unwrap();
        assert_eq!(id.as_str(), "65f1c2d3e4b5a69788990a1b");
    }

    #[test]
    fn capacity_is_computed() {
        let open = sample(10, 0);
        assert!(!is_full(&open));
        assert_eq!(available_spots(&open), 10);

        let full = sample(5, 5);
        assert!(is_full(&full));
        assert_eq!(available_spots(&full), 0);
    }

    #[test]
    fn serializes_with_virtual_fields() {
        let event = sample(10, 3);
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["_id"], json["id"]);
        assert_eq!(json["maxParticipants"], 10);
        assert_eq!(json["currentParticipants"], 3);
        assert_eq!(json["availableSpots"], 7);
        assert_eq!(json["isFull"], false);
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn deserializes_from_wire_shape() {
        let event = sample(10, 3);
        let json = serde_json::to_string(&event).unwrap();
        let back: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
