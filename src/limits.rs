//! Bounds applied when records are admitted into the registry.

pub const MAX_USERNAME_LEN: usize = 128;
pub const MAX_ID_LEN: usize = 128;
pub const MAX_TITLE_LEN: usize = 256;
pub const MAX_TEXT_LEN: usize = 8192;
pub const MAX_LABEL_LEN: usize = 64;
pub const MAX_LABELS: usize = 64;
pub const MAX_ACTIVITIES: usize = 10_000;
pub const MAX_PARTICIPANTS: usize = 50_000;
pub const MAX_TRACKS: usize = 256;

/// Conflict detection is a linear scan over the participant's subscriptions; this keeps it short.
pub const MAX_SUBSCRIPTIONS_PER_PARTICIPANT: usize = 64;
