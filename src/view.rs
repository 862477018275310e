use serde::Serialize;

use crate::engine::FilterConfig;
use crate::model::TrackId;

/// Toggle state behind the programme view. Immutable: every action yields a new state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    pub calendar_view: bool,
    pub my_schedule_only: bool,
    pub eligible_only: bool,
    pub track_filter: Option<TrackId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewAction {
    SetCalendarView(bool),
    SetMyScheduleOnly(bool),
    SetEligibleOnly(bool),
    SetTrackFilter(Option<TrackId>),
}

impl ViewState {
    pub fn apply(self, action: ViewAction) -> Self {
        match action {
            ViewAction::SetCalendarView(on) => self.with_calendar_view(on),
            ViewAction::SetMyScheduleOnly(on) => self.with_my_schedule_only(on),
            ViewAction::SetEligibleOnly(on) => Self {
                eligible_only: on,
                ..self
            },
            ViewAction::SetTrackFilter(track_filter) => Self {
                track_filter,
                ..self
            },
        }
    }

    /// The schedule is always shown as a calendar, so calendar view can't be switched off
    /// while it is active.
    pub fn with_calendar_view(self, on: bool) -> Self {
        if self.my_schedule_only && !on {
            return self;
        }
        Self {
            calendar_view: on,
            ..self
        }
    }

    /// Turning the schedule on forces calendar view and clears the track filter.
    /// Turning it off leaves both as they are.
    pub fn with_my_schedule_only(self, on: bool) -> Self {
        if on {
            Self {
                my_schedule_only: true,
                calendar_view: true,
                track_filter: None,
                ..self
            }
        } else {
            Self {
                my_schedule_only: false,
                ..self
            }
        }
    }

    /// Heading for the current view. First match wins.
    pub fn label(&self) -> &'static str {
        if self.eligible_only {
            "Beschikbaar"
        } else if self.my_schedule_only {
            "Mijn Schema"
        } else if self.calendar_view {
            "Volledig"
        } else {
            "Uniek"
        }
    }

    pub fn filter_config(&self) -> FilterConfig {
        FilterConfig::from(self)
    }
}

impl From<&ViewState> for FilterConfig {
    fn from(state: &ViewState) -> Self {
        FilterConfig {
            eligible_only: state.eligible_only,
            my_schedule_only: state.my_schedule_only,
            calendar_view: state.calendar_view,
            track_filter: state.track_filter.clone(),
        }
    }
}
