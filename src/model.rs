use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

/// Unix milliseconds. The only time type the core compares.
pub type Ms = i64;

pub type ActivityId = String;
pub type TrackId = String;
pub type Label = String;

/// Half-open interval `[start, end)`.
///
/// A span with `end <= start` is malformed. It can still be built (bad upstream data must not
/// take rendering down) but it never overlaps anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: Ms,
    pub end: Ms,
}

impl Span {
    pub fn new(start: Ms, end: Ms) -> Self {
        Self { start, end }
    }

    pub fn is_well_formed(&self) -> bool {
        self.start < self.end
    }

    /// Touching spans (`a.end == b.start`) do not overlap.
    pub fn overlaps(&self, other: &Span) -> bool {
        self.is_well_formed()
            && other.is_well_formed()
            && self.start < other.end
            && other.start < self.end
    }
}

/// Someone taking part in the event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Participant {
    pub username: String,
    /// Roles and groups, e.g. `leiding` or `bevers`.
    pub labels: BTreeSet<Label>,
    pub subscribed: BTreeSet<ActivityId>,
}

impl Participant {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            labels: BTreeSet::new(),
            subscribed: BTreeSet::new(),
        }
    }

    pub fn is_subscribed(&self, activity_id: &str) -> bool {
        self.subscribed.contains(activity_id)
    }

    pub fn has_any_label(&self, wanted: &BTreeSet<Label>) -> bool {
        !self.labels.is_disjoint(wanted)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Activity {
    pub id: ActivityId,
    pub title: String,
    pub description: String,
    pub location: String,
    pub starts_at: DateTime<FixedOffset>,
    pub ends_at: DateTime<FixedOffset>,
    /// Empty means open to everyone.
    pub required_labels: BTreeSet<Label>,
    /// 0 = unlimited.
    pub capacity: u32,
    pub current_subscriptions: u32,
    pub track_id: Option<TrackId>,
}

impl Activity {
    pub fn span(&self) -> Span {
        Span::new(self.starts_at.timestamp_millis(), self.ends_at.timestamp_millis())
    }

    pub fn is_open_to_all(&self) -> bool {
        self.required_labels.is_empty()
    }

    pub fn is_unlimited(&self) -> bool {
        self.capacity == 0
    }

    pub fn is_full(&self) -> bool {
        !self.is_unlimited() && self.current_subscriptions >= self.capacity
    }

    /// Calendar day of the start, in the offset the activity was published with.
    pub fn day(&self) -> NaiveDate {
        self.starts_at.date_naive()
    }

    pub fn in_track(&self, track_id: &str) -> bool {
        self.track_id.as_deref() == Some(track_id)
    }
}

/// Named grouping of activities, only used as a filter dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Track {
    pub id: TrackId,
    pub name: String,
}

// ── Derived values ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EligibilityReason {
    Ok,
    NoLabelMatch,
    AlreadySubscribed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EligibilityResult {
    pub eligible: bool,
    pub reason: EligibilityReason,
}

impl EligibilityResult {
    pub fn ok() -> Self {
        Self {
            eligible: true,
            reason: EligibilityReason::Ok,
        }
    }

    pub fn denied(reason: EligibilityReason) -> Self {
        Self {
            eligible: false,
            reason,
        }
    }
}

/// What the status indicator shows for one activity. Exactly one applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayStatus {
    Subscribed,
    Full,
    Conflict,
    Available,
}

impl DisplayStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayStatus::Subscribed => "subscribed",
            DisplayStatus::Full => "full",
            DisplayStatus::Conflict => "conflict",
            DisplayStatus::Available => "available",
        }
    }
}

impl fmt::Display for DisplayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Subscription changes announced by the registry. Flat, no nesting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    Subscribed {
        username: String,
        activity_id: ActivityId,
    },
    Unsubscribed {
        username: String,
        activity_id: ActivityId,
    },
}

impl Event {
    pub fn activity_id(&self) -> &str {
        match self {
            Event::Subscribed { activity_id, .. } | Event::Unsubscribed { activity_id, .. } => {
                activity_id
            }
        }
    }
}

// ── Render result types ──────────────────────────────────────────

/// One activity as handed to the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityView {
    pub id: ActivityId,
    pub title: String,
    pub location: String,
    pub start_time: DateTime<FixedOffset>,
    pub end_time: DateTime<FixedOffset>,
    pub track_id: Option<TrackId>,
    pub status: DisplayStatus,
    /// Subscribed activities that overlap this one; empty unless `status` is `conflict`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub conflicts_with: Vec<ActivityId>,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use chrono::TimeZone;

    /// 2025-07-12 (a Saturday) at `hour:minute` in CEST.
    pub fn at(hour: u32, minute: u32) -> DateTime<FixedOffset> {
        on(12, hour, minute)
    }

    pub fn on(day: u32, hour: u32, minute: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(2 * 3600)
            .unwrap()
            .with_ymd_and_hms(2025, 7, day, hour, minute, 0)
            .unwrap()
    }

    pub fn activity(id: &str, start: DateTime<FixedOffset>, end: DateTime<FixedOffset>) -> Activity {
        Activity {
            id: id.into(),
            title: format!("Activiteit {id}"),
            description: String::new(),
            location: "Kampterrein".into(),
            starts_at: start,
            ends_at: end,
            required_labels: BTreeSet::new(),
            capacity: 0,
            current_subscriptions: 0,
            track_id: None,
        }
    }

    pub fn labelled(mut activity: Activity, labels: &[&str]) -> Activity {
        activity.required_labels = labels.iter().map(|l| l.to_string()).collect();
        activity
    }

    pub fn participant(labels: &[&str], subscribed: &[&str]) -> Participant {
        let mut p = Participant::new("jan");
        p.labels = labels.iter().map(|l| l.to_string()).collect();
        p.subscribed = subscribed.iter().map(|s| s.to_string()).collect();
        p
    }
}
