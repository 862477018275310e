use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::model::*;
use crate::registry::{Registry, RegistryError};

/// Where the programme view gets its data and sends its mutations.
///
/// Mutations only report success; callers reload afterwards.
#[async_trait]
pub trait ProgrammeSource: Send + Sync {
    async fn load_participant(&self, username: &str) -> Result<Participant, RegistryError>;

    async fn load_activities(&self) -> Result<Vec<Activity>, RegistryError>;

    async fn load_tracks(&self) -> Result<Vec<Track>, RegistryError>;

    async fn subscribe(&self, username: &str, activity_id: &str) -> Result<(), RegistryError>;

    async fn unsubscribe(&self, username: &str, activity_id: &str) -> Result<(), RegistryError>;

    /// Change feeds for the given activities. Sources without push support return none,
    /// and their readers only see changes on an explicit reload.
    fn watch(&self, _activity_ids: &[ActivityId]) -> Vec<broadcast::Receiver<Event>> {
        Vec::new()
    }
}

#[async_trait]
impl ProgrammeSource for Registry {
    async fn load_participant(&self, username: &str) -> Result<Participant, RegistryError> {
        self.participant(username)
            .await
            .ok_or_else(|| RegistryError::UnknownParticipant(username.to_string()))
    }

    async fn load_activities(&self) -> Result<Vec<Activity>, RegistryError> {
        Ok(self.activities())
    }

    async fn load_tracks(&self) -> Result<Vec<Track>, RegistryError> {
        Ok(self.tracks())
    }

    async fn subscribe(&self, username: &str, activity_id: &str) -> Result<(), RegistryError> {
        Registry::subscribe(self, username, activity_id).await
    }

    async fn unsubscribe(&self, username: &str, activity_id: &str) -> Result<(), RegistryError> {
        Registry::unsubscribe(self, username, activity_id).await
    }

    fn watch(&self, activity_ids: &[ActivityId]) -> Vec<broadcast::Receiver<Event>> {
        self.notify.prune();
        activity_ids.iter().map(|id| self.notify.listen(id)).collect()
    }
}
