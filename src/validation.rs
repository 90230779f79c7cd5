//! Write-path validation for events.
//!
//! Required fields are checked first and reported together. Every other
//! constraint lives in [`EVENT_RULES`], a table of field name to ordered
//! `(predicate, message)` pairs. Each field stops at its first failing rule,
//! and every failing field is reported.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::{ValidateLength, ValidateRange};

use crate::dates::parse_event_date;
use crate::models::event::{NewEvent, MAX_PARTICIPANTS_LIMIT};

pub const MAX_TITLE_CHARS: u64 = 100;
pub const MAX_DESCRIPTION_CHARS: u64 = 1000;

/// Raw create payload. Everything is optional so missing fields can be
/// reported as validation failures rather than decode errors.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_participants: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_participants: Option<Value>,
}

impl CreateEventRequest {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        location: impl Into<String>,
        date: DateTime<Utc>,
        max_participants: i64,
    ) -> Self {
        Self {
            title: Some(title.into()),
            description: Some(description.into()),
            location: Some(location.into()),
            date: Some(Value::String(date.to_rfc3339())),
            max_participants: Some(Value::from(max_participants)),
            current_participants: None,
        }
    }

    pub fn with_current_participants(mut self, current: i64) -> Self {
        self.current_participants = Some(Value::from(current));
        self
    }

    pub fn validate(&self) -> Result<NewEvent, ValidationError> {
        self.validate_at(Utc::now())
    }

    pub fn validate_at(&self, now: DateTime<Utc>) -> Result<NewEvent, ValidationError> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(ValidationError::MissingFields(missing));
        }

        let candidate = Candidate::from_request(self);
        let violations = check_rules(&candidate, now);

        match candidate.into_new_event() {
            Some(event) if violations.is_empty() => Ok(event),
            _ => Err(ValidationError::Rules(violations)),
        }
    }

    fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();

        if !text_present(&self.title) {
            missing.push("title");
        }
        if !text_present(&self.description) {
            missing.push("description");
        }
        if !text_present(&self.location) {
            missing.push("location");
        }
        if !value_present(&self.date) {
            missing.push("date");
        }
        if !value_present(&self.max_participants) {
            missing.push("maxParticipants");
        }

        missing
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: &'static str,
    pub message: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please provide all required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    #[error("{}", join_messages(.0))]
    Rules(Vec<FieldViolation>),
}

impl ValidationError {
    /// Field names involved, in report order.
    pub fn fields(&self) -> Vec<&'static str> {
        match self {
            ValidationError::MissingFields(fields) => fields.clone(),
            ValidationError::Rules(violations) => violations.iter().map(|v| v.field).collect(),
        }
    }

    pub fn messages(&self) -> Vec<String> {
        match self {
            ValidationError::MissingFields(_) => vec![self.to_string()],
            ValidationError::Rules(violations) => {
                violations.iter().map(|v| v.message.to_string()).collect()
            }
        }
    }

    /// All messages joined with `", "`, as sent in the response envelope.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

fn join_messages(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| v.message)
        .collect::<Vec<_>>()
        .join(", ")
}

fn text_present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|s| !s.trim().is_empty())
}

// Any number counts as present, zero included, so `maxParticipants: 0` is
// reported by the range rule rather than as a missing field.
fn value_present(value: &Option<Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(_) => true,
    }
}

// Parsed view of the request. Parse failures stay as `None` and are reported
// by the first rule of the field.
struct Candidate {
    title: String,
    description: String,
    location: String,
    date: Option<DateTime<Utc>>,
    max_participants: Option<i64>,
    current_participants: Option<i64>,
}

impl Candidate {
    fn from_request(request: &CreateEventRequest) -> Self {
        let trimmed = |v: &Option<String>| v.as_deref().unwrap_or_default().trim().to_string();

        let current_participants = if value_present(&request.current_participants) {
            request.current_participants.as_ref().and_then(as_integer)
        } else {
            Some(0)
        };

        Candidate {
            title: trimmed(&request.title),
            description: trimmed(&request.description),
            location: trimmed(&request.location),
            date: request.date.as_ref().and_then(as_timestamp),
            max_participants: request.max_participants.as_ref().and_then(as_integer),
            current_participants,
        }
    }

    // Casts are only meaningful once every rule has passed.
    fn into_new_event(self) -> Option<NewEvent> {
        Some(NewEvent {
            title: self.title,
            description: self.description,
            location: self.location,
            date: self.date?,
            max_participants: self.max_participants? as i32,
            current_participants: self.current_participants? as i32,
        })
    }
}

fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>().ok().or_else(|| {
                s.parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                    .map(|f| f as i64)
            })
        }
        _ => None,
    }
}

fn as_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_event_date(s),
        Value::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    }
}

type Predicate = fn(&Candidate, DateTime<Utc>) -> bool;

struct Rule {
    check: Predicate,
    message: &'static str,
}

struct FieldRules {
    field: &'static str,
    rules: &'static [Rule],
}

static EVENT_RULES: &[FieldRules] = &[
    FieldRules {
        field: "title",
        rules: &[Rule {
            check: title_within_limit,
            message: "Title cannot exceed 100 characters",
        }],
    },
    FieldRules {
        field: "description",
        rules: &[Rule {
            check: description_within_limit,
            message: "Description cannot exceed 1000 characters",
        }],
    },
    FieldRules {
        field: "date",
        rules: &[
            Rule {
                check: date_parses,
                message: "Event date is not a valid date",
            },
            Rule {
                check: date_not_in_past,
                message: "Event date cannot be in the past",
            },
        ],
    },
    FieldRules {
        field: "maxParticipants",
        rules: &[
            Rule {
                check: max_is_integer,
                message: "Maximum participants must be a whole number",
            },
            Rule {
                check: max_at_least_one,
                message: "Must have at least 1 participant spot",
            },
            Rule {
                check: max_within_limit,
                message: "Cannot exceed 10000 participants",
            },
        ],
    },
    FieldRules {
        field: "currentParticipants",
        rules: &[
            Rule {
                check: current_is_integer,
                message: "Current participants must be a whole number",
            },
            Rule {
                check: current_not_negative,
                message: "Current participants cannot be negative",
            },
            Rule {
                check: current_within_max,
                message: "Current participants cannot exceed maximum participants",
            },
        ],
    },
];

fn check_rules(candidate: &Candidate, now: DateTime<Utc>) -> Vec<FieldViolation> {
    EVENT_RULES
        .iter()
        .filter_map(|field| {
            field
                .rules
                .iter()
                .find(|rule| !(rule.check)(candidate, now))
                .map(|rule| FieldViolation {
                    field: field.field,
                    message: rule.message,
                })
        })
        .collect()
}

fn title_within_limit(c: &Candidate, _now: DateTime<Utc>) -> bool {
    c.title.validate_length(None, Some(MAX_TITLE_CHARS), None)
}

fn description_within_limit(c: &Candidate, _now: DateTime<Utc>) -> bool {
    c.description
        .validate_length(None, Some(MAX_DESCRIPTION_CHARS), None)
}

fn date_parses(c: &Candidate, _now: DateTime<Utc>) -> bool {
    c.date.is_some()
}

fn date_not_in_past(c: &Candidate, now: DateTime<Utc>) -> bool {
    c.date.is_some_and(|date| date >= now)
}

fn max_is_integer(c: &Candidate, _now: DateTime<Utc>) -> bool {
    c.max_participants.is_some()
}

fn max_at_least_one(c: &Candidate, _now: DateTime<Utc>) -> bool {
    c.max_participants
        .is_some_and(|max| max.validate_range(Some(1), None, None, None))
}

fn max_within_limit(c: &Candidate, _now: DateTime<Utc>) -> bool {
    c.max_participants
        .is_some_and(|max| max.validate_range(None, Some(MAX_PARTICIPANTS_LIMIT as i64), None, None))
}

fn current_is_integer(c: &Candidate, _now: DateTime<Utc>) -> bool {
    c.current_participants.is_some()
}

fn current_not_negative(c: &Candidate, _now: DateTime<Utc>) -> bool {
    c.current_participants
        .is_some_and(|current| current.validate_range(Some(0), None, None, None))
}

// Skipped when maxParticipants did not parse; that field reports on its own.
fn current_within_max(c: &Candidate, _now: DateTime<Utc>) -> bool {
    match (c.current_participants, c.max_participants) {
        (Some(current), Some(max)) => current.validate_range(None, Some(max), None, None),
        _ => true,
    }
}
