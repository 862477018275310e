use crate::engine::{find_conflicts, matches_labels};
use crate::limits::*;
use crate::model::*;
use crate::observability::SUBSCRIPTIONS_TOTAL;

use super::{Registry, RegistryError};

impl Registry {
    /// Enrol a participant. Checks, in order: both exist, not already enrolled, a matching
    /// label, no time overlap with current subscriptions, a free place, the subscription limit.
    pub async fn subscribe(&self, username: &str, activity_id: &str) -> Result<(), RegistryError> {
        let result = self.try_subscribe(username, activity_id).await;
        record_outcome("subscribe", &result);
        result
    }

    /// Withdraw a participant from an activity.
    pub async fn unsubscribe(&self, username: &str, activity_id: &str) -> Result<(), RegistryError> {
        let result = self.try_unsubscribe(username, activity_id).await;
        record_outcome("unsubscribe", &result);
        result
    }

    async fn try_subscribe(&self, username: &str, activity_id: &str) -> Result<(), RegistryError> {
        let shared = self.participant_handle(username)?;
        // Held for the whole mutation so one participant's changes apply one at a time.
        let mut participant = shared.write().await;

        let candidate = self
            .activity(activity_id)
            .ok_or_else(|| RegistryError::UnknownActivity(activity_id.to_string()))?;
        if participant.is_subscribed(activity_id) {
            return Err(RegistryError::AlreadySubscribed(candidate.id));
        }
        if !matches_labels(&participant, &candidate) {
            return Err(RegistryError::NotEligible(candidate.id));
        }

        let current: Vec<Activity> = participant
            .subscribed
            .iter()
            .filter_map(|id| self.activity(id))
            .collect();
        if let Some(other) = find_conflicts(&participant, &candidate, &current).first() {
            return Err(RegistryError::Conflict(other.id.clone()));
        }

        {
            // No other map access while this entry is locked.
            let mut entry = self
                .activities
                .get_mut(activity_id)
                .ok_or_else(|| RegistryError::UnknownActivity(activity_id.to_string()))?;
            if entry.is_full() {
                return Err(RegistryError::Full(entry.capacity));
            }
            if participant.subscribed.len() >= MAX_SUBSCRIPTIONS_PER_PARTICIPANT {
                return Err(RegistryError::LimitExceeded("too many subscriptions"));
            }
            entry.current_subscriptions = entry.current_subscriptions.saturating_add(1);
        }
        participant.subscribed.insert(candidate.id.clone());

        tracing::debug!(username, activity = %candidate.id, "subscribed");
        self.notify.send(&Event::Subscribed {
            username: username.to_string(),
            activity_id: candidate.id,
        });
        Ok(())
    }

    async fn try_unsubscribe(&self, username: &str, activity_id: &str) -> Result<(), RegistryError> {
        let shared = self.participant_handle(username)?;
        let mut participant = shared.write().await;

        {
            let mut entry = self
                .activities
                .get_mut(activity_id)
                .ok_or_else(|| RegistryError::UnknownActivity(activity_id.to_string()))?;
            if !participant.subscribed.remove(activity_id) {
                return Err(RegistryError::NotSubscribed(activity_id.to_string()));
            }
            entry.current_subscriptions = entry.current_subscriptions.saturating_sub(1);
        }

        tracing::debug!(username, activity = activity_id, "unsubscribed");
        self.notify.send(&Event::Unsubscribed {
            username: username.to_string(),
            activity_id: activity_id.to_string(),
        });
        Ok(())
    }
}

fn record_outcome(action: &'static str, result: &Result<(), RegistryError>) {
    let outcome = match result {
        Ok(()) => "ok",
        Err(e) => e.outcome(),
    };
    metrics::counter!(SUBSCRIPTIONS_TOTAL, "action" => action, "outcome" => outcome).increment(1);
}
