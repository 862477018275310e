use std::collections::BTreeSet;

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::limits::*;
use crate::model::*;

// ── Wire records, as delivered by the data-loading side ──────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantRecord {
    pub username: String,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub subscribed_activity_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRecord {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    /// ISO-8601; an offset is optional and defaults to UTC.
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub required_labels: Vec<String>,
    /// Missing, null, zero or negative all mean unlimited.
    #[serde(default)]
    pub capacity: Option<i64>,
    #[serde(default)]
    pub current_subscriptions: Option<i64>,
    #[serde(default)]
    pub track_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackRecord {
    pub id: String,
    pub name: String,
}

/// Everything the registry is seeded with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub participants: Vec<ParticipantRecord>,
    pub activities: Vec<ActivityRecord>,
    #[serde(default)]
    pub tracks: Vec<TrackRecord>,
}

impl Snapshot {
    pub fn from_json(json: &str) -> Result<Self, RecordError> {
        serde_json::from_str(json).map_err(|e| RecordError::Json(e.to_string()))
    }
}

// ── Admission ────────────────────────────────────────────────────

impl TryFrom<ParticipantRecord> for Participant {
    type Error = RecordError;

    fn try_from(record: ParticipantRecord) -> Result<Self, Self::Error> {
        check_text("username", &record.username, MAX_USERNAME_LEN)?;
        if record.subscribed_activity_ids.len() > MAX_SUBSCRIPTIONS_PER_PARTICIPANT {
            return Err(RecordError::LimitExceeded("too many subscriptions"));
        }
        Ok(Participant {
            username: record.username,
            labels: admit_labels(record.labels)?,
            subscribed: record.subscribed_activity_ids.into_iter().collect(),
        })
    }
}

impl TryFrom<ActivityRecord> for Activity {
    type Error = RecordError;

    fn try_from(record: ActivityRecord) -> Result<Self, Self::Error> {
        check_text("id", &record.id, MAX_ID_LEN)?;
        if record.title.len() > MAX_TITLE_LEN {
            return Err(RecordError::LimitExceeded("title too long"));
        }
        if record.description.len() > MAX_TEXT_LEN || record.location.len() > MAX_TEXT_LEN {
            return Err(RecordError::LimitExceeded("text too long"));
        }
        let starts_at = parse_timestamp("startTime", &record.start_time)?;
        let ends_at = parse_timestamp("endTime", &record.end_time)?;
        // An inverted range is kept; the conflict detector treats it as never overlapping.
        let capacity = u32::try_from(record.capacity.unwrap_or(0).max(0))
            .map_err(|_| RecordError::LimitExceeded("capacity too large"))?;
        let current_subscriptions = u32::try_from(record.current_subscriptions.unwrap_or(0).max(0))
            .map_err(|_| RecordError::LimitExceeded("subscription count too large"))?;
        let track_id = match record.track_id {
            Some(t) if t.trim().is_empty() => None,
            other => other,
        };
        Ok(Activity {
            id: record.id,
            title: record.title,
            description: record.description,
            location: record.location,
            starts_at,
            ends_at,
            required_labels: admit_labels(record.required_labels)?,
            capacity,
            current_subscriptions,
            track_id,
        })
    }
}

impl TryFrom<TrackRecord> for Track {
    type Error = RecordError;

    fn try_from(record: TrackRecord) -> Result<Self, Self::Error> {
        check_text("track id", &record.id, MAX_ID_LEN)?;
        if record.name.len() > MAX_TITLE_LEN {
            return Err(RecordError::LimitExceeded("track name too long"));
        }
        Ok(Track {
            id: record.id,
            name: record.name,
        })
    }
}

/// Parse an ISO-8601 timestamp. Values without an offset are taken as UTC.
pub fn parse_timestamp(field: &'static str, value: &str) -> Result<DateTime<FixedOffset>, RecordError> {
    let trimmed = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt);
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(naive.and_utc().fixed_offset());
        }
    }
    Err(RecordError::InvalidTimestamp {
        field,
        value: value.to_string(),
    })
}

fn check_text(field: &'static str, value: &str, max: usize) -> Result<(), RecordError> {
    if value.trim().is_empty() {
        return Err(RecordError::Empty(field));
    }
    if value.len() > max {
        return Err(RecordError::LimitExceeded(field));
    }
    Ok(())
}

fn admit_labels(raw: Vec<String>) -> Result<BTreeSet<Label>, RecordError> {
    if raw.len() > MAX_LABELS {
        return Err(RecordError::LimitExceeded("too many labels"));
    }
    let mut labels = BTreeSet::new();
    for label in raw {
        let label = label.trim();
        if label.is_empty() {
            continue;
        }
        if label.len() > MAX_LABEL_LEN {
            return Err(RecordError::LimitExceeded("label too long"));
        }
        labels.insert(label.to_string());
    }
    Ok(labels)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    Json(String),
    Empty(&'static str),
    InvalidTimestamp { field: &'static str, value: String },
    Duplicate(String),
    UnknownActivity(String),
    LimitExceeded(&'static str),
}

impl std::fmt::Display for RecordError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordError::Json(e) => write!(f, "malformed snapshot: {e}"),
            RecordError::Empty(field) => write!(f, "{field} must not be empty"),
            RecordError::InvalidTimestamp { field, value } => {
                write!(f, "{field}: not an ISO-8601 timestamp: {value:?}")
            }
            RecordError::Duplicate(id) => write!(f, "duplicate id: {id}"),
            RecordError::UnknownActivity(id) => write!(f, "unknown activity: {id}"),
            RecordError::LimitExceeded(msg) => write!(f, "limit exceeded: {msg}"),
        }
    }
}

impl std::error::Error for RecordError {}
