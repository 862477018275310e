use chrono::{Locale, NaiveDate};

use crate::model::*;

use super::eligibility::evaluate;
use super::status::resolve_all;

/// Which predicates and grouping to apply. Built from the view state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterConfig {
    /// Only what the participant can still join.
    pub eligible_only: bool,
    /// Only what the participant is subscribed to. Overrides `track_filter`.
    pub my_schedule_only: bool,
    /// Group by calendar day, sorted by start time within a day.
    pub calendar_view: bool,
    pub track_filter: Option<TrackId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry<'a> {
    pub activity: &'a Activity,
    pub status: DisplayStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayGroup<'a> {
    /// `None` for the single implicit group of a flat list.
    pub day: Option<NaiveDate>,
    pub label: String,
    pub entries: Vec<Entry<'a>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grouped<'a> {
    pub groups: Vec<DayGroup<'a>>,
}

impl<'a> Grouped<'a> {
    pub fn len(&self) -> usize {
        self.groups.iter().map(|g| g.entries.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn entries(&self) -> impl Iterator<Item = &Entry<'a>> + '_ {
        self.groups.iter().flat_map(|g| g.entries.iter())
    }

    /// Activity ids in render order.
    pub fn ids(&self) -> Vec<&'a str> {
        self.entries().map(|e| e.activity.id.as_str()).collect()
    }
}

/// Filter and group the catalogue for one participant.
///
/// Every predicate is applied independently to the full list, so switching one off restores
/// exactly what was shown before it was switched on.
pub fn apply<'a>(activities: &'a [Activity], participant: &Participant, config: &FilterConfig) -> Grouped<'a> {
    let track_filter = if config.my_schedule_only {
        None
    } else {
        config.track_filter.as_deref()
    };

    let mut kept = Vec::with_capacity(activities.len());
    for (activity, status) in resolve_all(participant, activities) {
        if config.my_schedule_only && status != DisplayStatus::Subscribed {
            continue;
        }
        if config.eligible_only && !is_actionable(participant, activity, status) {
            continue;
        }
        if let Some(track) = track_filter
            && !activity.in_track(track)
        {
            continue;
        }
        kept.push(Entry { activity, status });
    }

    if !config.calendar_view {
        return Grouped {
            groups: vec![DayGroup {
                day: None,
                label: String::new(),
                entries: kept,
            }],
        };
    }

    // Stable: activities starting together keep catalogue order.
    kept.sort_by_key(|e| (e.activity.day(), e.activity.starts_at));

    let mut groups: Vec<DayGroup<'a>> = Vec::new();
    for entry in kept {
        let day = entry.activity.day();
        match groups.last_mut() {
            Some(group) if group.day == Some(day) => group.entries.push(entry),
            _ => groups.push(DayGroup {
                day: Some(day),
                label: day_label(day),
                entries: vec![entry],
            }),
        }
    }
    Grouped { groups }
}

/// Label-eligible, not yet subscribed, and nothing in the way (conflict or full).
fn is_actionable(participant: &Participant, activity: &Activity, status: DisplayStatus) -> bool {
    let eligibility = evaluate(participant, activity);
    tracing::trace!(
        activity = %activity.id,
        reason = ?eligibility.reason,
        %status,
        "eligibility decision"
    );
    eligibility.eligible && status == DisplayStatus::Available
}

/// e.g. `zaterdag 12 juli`
pub fn day_label(day: NaiveDate) -> String {
    day.format_localized("%A %-d %B", Locale::nl_NL).to_string()
}
