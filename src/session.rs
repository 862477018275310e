use std::sync::Arc;
use std::time::Instant;

use chrono::NaiveDate;
use serde::Serialize;
use tokio::sync::broadcast::{self, error::TryRecvError};

use crate::engine::{self, find_conflicts, resolve_status};
use crate::model::*;
use crate::observability::{RENDER_DURATION_SECONDS, STALE_SNAPSHOTS_TOTAL};
use crate::registry::RegistryError;
use crate::source::ProgrammeSource;
use crate::view::{ViewAction, ViewState};

/// Everything loaded for one participant at one moment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Programme {
    pub participant: Participant,
    pub activities: Vec<Activity>,
    pub tracks: Vec<Track>,
}

/// Sequence number handed out when a reload starts. Later tickets win.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedGroup {
    pub day: Option<NaiveDate>,
    pub label: String,
    pub activities: Vec<ActivityView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rendered {
    pub label: &'static str,
    pub view: ViewState,
    pub groups: Vec<RenderedGroup>,
}

/// One participant's view on the programme: the toggle state plus the latest snapshot.
///
/// Nothing derived is kept between calls; `render` works from the snapshot every time.
/// The session listens for changes to the activities it shows and reloads on demand once one
/// arrives.
pub struct Session<S: ProgrammeSource + ?Sized> {
    source: Arc<S>,
    username: String,
    view: ViewState,
    programme: Programme,
    issued: u64,
    applied: u64,
    watchers: Vec<broadcast::Receiver<Event>>,
    stale: bool,
}

impl<S: ProgrammeSource + ?Sized> Session<S> {
    pub async fn open(source: Arc<S>, username: impl Into<String>) -> Result<Self, RegistryError> {
        let username = username.into();
        let programme = load(source.as_ref(), &username).await?;
        tracing::info!(
            username = %username,
            activities = programme.activities.len(),
            "session opened"
        );
        let mut session = Self {
            source,
            username,
            view: ViewState::default(),
            programme,
            issued: 0,
            applied: 0,
            watchers: Vec::new(),
            stale: false,
        };
        session.watchers = session.watch_programme();
        Ok(session)
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn programme(&self) -> &Programme {
        &self.programme
    }

    pub fn dispatch(&mut self, action: ViewAction) -> &ViewState {
        self.view = std::mem::take(&mut self.view).apply(action);
        &self.view
    }

    pub fn begin_refresh(&mut self) -> Ticket {
        self.issued += 1;
        Ticket(self.issued)
    }

    /// Install a loaded snapshot unless a newer one is already in place.
    /// Returns whether it was applied.
    pub fn complete_refresh(&mut self, ticket: Ticket, programme: Programme) -> bool {
        if ticket.0 <= self.applied {
            tracing::debug!(ticket = ticket.0, applied = self.applied, "discarding stale snapshot");
            metrics::counter!(STALE_SNAPSHOTS_TOTAL).increment(1);
            return false;
        }
        self.applied = ticket.0;
        self.programme = programme;
        self.stale = false;
        true
    }

    /// Whether a change was announced for a shown activity since the last reload,
    /// or the last reload after a mutation failed.
    pub fn is_stale(&mut self) -> bool {
        if !self.stale {
            self.stale = self
                .watchers
                .iter_mut()
                .any(|rx| matches!(rx.try_recv(), Ok(_) | Err(TryRecvError::Lagged(_))));
        }
        self.stale
    }

    pub async fn fetch(&self) -> Result<Programme, RegistryError> {
        load(self.source.as_ref(), &self.username).await
    }

    pub async fn refresh(&mut self) -> Result<bool, RegistryError> {
        // Listen before loading so nothing announced during the load is missed.
        let watchers = self.watch_programme();
        let ticket = self.begin_refresh();
        let programme = self.fetch().await?;
        let applied = self.complete_refresh(ticket, programme);
        if applied {
            self.watchers = watchers;
        }
        Ok(applied)
    }

    pub async fn refresh_if_stale(&mut self) -> Result<bool, RegistryError> {
        if !self.is_stale() {
            return Ok(false);
        }
        self.refresh().await
    }

    /// `Ok` means the source accepted the subscription. If the reload that follows fails, the
    /// session stays stale and the next `refresh_if_stale` retries it.
    pub async fn subscribe(&mut self, activity_id: &str) -> Result<(), RegistryError> {
        self.source.subscribe(&self.username, activity_id).await?;
        self.reload_after_mutation().await;
        Ok(())
    }

    /// Same contract as `subscribe`.
    pub async fn unsubscribe(&mut self, activity_id: &str) -> Result<(), RegistryError> {
        self.source.unsubscribe(&self.username, activity_id).await?;
        self.reload_after_mutation().await;
        Ok(())
    }

    async fn reload_after_mutation(&mut self) {
        if let Err(e) = self.refresh().await {
            tracing::warn!(username = %self.username, error = %e, "reload after mutation failed");
            self.stale = true;
        }
    }

    fn watch_programme(&self) -> Vec<broadcast::Receiver<Event>> {
        let ids: Vec<ActivityId> = self.programme.activities.iter().map(|a| a.id.clone()).collect();
        self.source.watch(&ids)
    }

    pub fn render(&self) -> Rendered {
        let started = Instant::now();
        let Programme {
            participant,
            activities,
            ..
        } = &self.programme;

        let grouped = engine::apply(activities, participant, &self.view.filter_config());
        let groups = grouped
            .groups
            .into_iter()
            .map(|group| RenderedGroup {
                day: group.day,
                label: group.label,
                activities: group
                    .entries
                    .into_iter()
                    .map(|e| activity_view(participant, e.activity, e.status, activities))
                    .collect(),
            })
            .collect();

        metrics::histogram!(RENDER_DURATION_SECONDS).record(started.elapsed().as_secs_f64());
        Rendered {
            label: self.view.label(),
            view: self.view.clone(),
            groups,
        }
    }

    /// Status of one activity, regardless of the current filters.
    pub fn status_of(&self, activity_id: &str) -> Option<ActivityView> {
        let Programme {
            participant,
            activities,
            ..
        } = &self.programme;
        let activity = activities.iter().find(|a| a.id == activity_id)?;
        let status = resolve_status(participant, activity, activities);
        tracing::trace!(activity = activity_id, %status, "status resolved");
        Some(activity_view(participant, activity, status, activities))
    }
}

fn activity_view(
    participant: &Participant,
    activity: &Activity,
    status: DisplayStatus,
    all: &[Activity],
) -> ActivityView {
    let conflicts_with = if status == DisplayStatus::Conflict {
        find_conflicts(participant, activity, all).ids()
    } else {
        Vec::new()
    };
    ActivityView {
        id: activity.id.clone(),
        title: activity.title.clone(),
        location: activity.location.clone(),
        start_time: activity.starts_at,
        end_time: activity.ends_at,
        track_id: activity.track_id.clone(),
        status,
        conflicts_with,
    }
}

async fn load<S: ProgrammeSource + ?Sized>(source: &S, username: &str) -> Result<Programme, RegistryError> {
    let (participant, activities, tracks) = futures::try_join!(
        source.load_participant(username),
        source.load_activities(),
        source.load_tracks(),
    )?;
    Ok(Programme {
        participant,
        activities,
        tracks,
    })
}
