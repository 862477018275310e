use dashmap::DashMap;
use tokio::sync::broadcast;

use crate::model::{ActivityId, Event};

const CHANNEL_CAPACITY: usize = 256;

/// Broadcast hub for subscription changes, one channel per activity.
///
/// Sessions listen on the activities they show and reload only after a change here.
pub struct NotifyHub {
    channels: DashMap<ActivityId, broadcast::Sender<Event>>,
}

impl Default for NotifyHub {
    fn default() -> Self {
        Self::new()
    }
}

impl NotifyHub {
    pub fn new() -> Self {
        Self {
            channels: DashMap::new(),
        }
    }

    /// Subscribe to changes on an activity. Creates the channel if needed.
    pub fn listen(&self, activity_id: &str) -> broadcast::Receiver<Event> {
        let sender = self
            .channels
            .entry(activity_id.to_string())
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0);
        sender.subscribe()
    }

    /// Send a notification. No-op if nobody is listening.
    pub fn send(&self, event: &Event) {
        if let Some(sender) = self.channels.get(event.activity_id()) {
            let _ = sender.send(event.clone());
        }
    }

    /// Drop channels whose listeners have all gone away.
    pub fn prune(&self) {
        self.channels.retain(|_, sender| sender.receiver_count() > 0);
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }
}
