//! In-memory stand-in for the event backend: the activity catalogue, tracks and participants,
//! plus the subscribe/unsubscribe mutations the programme view calls.

mod error;
mod mutations;

pub use error::RegistryError;

use std::collections::HashSet;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::RwLock;

use crate::limits::*;
use crate::model::*;
use crate::notify::NotifyHub;
use crate::record::{RecordError, Snapshot};

pub type SharedParticipant = Arc<RwLock<Participant>>;

pub struct Registry {
    activities: DashMap<ActivityId, Activity>,
    /// Activity ids in the order the catalogue was published.
    catalogue: Vec<ActivityId>,
    tracks: Vec<Track>,
    participants: DashMap<String, SharedParticipant>,
    pub notify: Arc<NotifyHub>,
}

impl Registry {
    /// Admit a snapshot. Rejects anything outside the data model; an inverted time range is
    /// not outside it.
    pub fn from_snapshot(snapshot: Snapshot, notify: Arc<NotifyHub>) -> Result<Self, RecordError> {
        if snapshot.activities.len() > MAX_ACTIVITIES {
            return Err(RecordError::LimitExceeded("too many activities"));
        }
        if snapshot.participants.len() > MAX_PARTICIPANTS {
            return Err(RecordError::LimitExceeded("too many participants"));
        }
        if snapshot.tracks.len() > MAX_TRACKS {
            return Err(RecordError::LimitExceeded("too many tracks"));
        }

        let activities = DashMap::new();
        let mut catalogue = Vec::with_capacity(snapshot.activities.len());
        for record in snapshot.activities {
            let activity = Activity::try_from(record)?;
            if activities.contains_key(&activity.id) {
                return Err(RecordError::Duplicate(activity.id));
            }
            catalogue.push(activity.id.clone());
            activities.insert(activity.id.clone(), activity);
        }

        let mut seen_tracks = HashSet::new();
        let mut tracks = Vec::with_capacity(snapshot.tracks.len());
        for record in snapshot.tracks {
            let track = Track::try_from(record)?;
            if !seen_tracks.insert(track.id.clone()) {
                return Err(RecordError::Duplicate(track.id));
            }
            tracks.push(track);
        }

        let participants = DashMap::new();
        for record in snapshot.participants {
            let participant = Participant::try_from(record)?;
            if let Some(unknown) = participant
                .subscribed
                .iter()
                .find(|id| !activities.contains_key(*id))
            {
                return Err(RecordError::UnknownActivity(unknown.clone()));
            }
            if participants.contains_key(&participant.username) {
                return Err(RecordError::Duplicate(participant.username));
            }
            participants.insert(participant.username.clone(), Arc::new(RwLock::new(participant)));
        }

        tracing::debug!(
            activities = catalogue.len(),
            tracks = tracks.len(),
            participants = participants.len(),
            "registry loaded"
        );

        Ok(Self {
            activities,
            catalogue,
            tracks,
            participants,
            notify,
        })
    }

    pub fn activity(&self, id: &str) -> Option<Activity> {
        self.activities.get(id).map(|e| e.value().clone())
    }

    /// The whole catalogue, in publication order.
    pub fn activities(&self) -> Vec<Activity> {
        self.catalogue
            .iter()
            .filter_map(|id| self.activity(id))
            .collect()
    }

    pub fn tracks(&self) -> Vec<Track> {
        self.tracks.clone()
    }

    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    /// Copy of the participant as it is right now.
    pub async fn participant(&self, username: &str) -> Option<Participant> {
        let shared = self.participant_handle(username).ok()?;
        let guard = shared.read().await;
        Some(guard.clone())
    }

    fn participant_handle(&self, username: &str) -> Result<SharedParticipant, RegistryError> {
        self.participants
            .get(username)
            .map(|e| e.value().clone())
            .ok_or_else(|| RegistryError::UnknownParticipant(username.to_string()))
    }
}
