use crate::model::ActivityId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    UnknownParticipant(String),
    UnknownActivity(ActivityId),
    AlreadySubscribed(ActivityId),
    NotSubscribed(ActivityId),
    NotEligible(ActivityId),
    Conflict(ActivityId),
    Full(u32),
    LimitExceeded(&'static str),
}

impl RegistryError {
    /// Short label for metrics.
    pub fn outcome(&self) -> &'static str {
        match self {
            RegistryError::UnknownParticipant(_) | RegistryError::UnknownActivity(_) => "not_found",
            RegistryError::AlreadySubscribed(_) => "already_subscribed",
            RegistryError::NotSubscribed(_) => "not_subscribed",
            RegistryError::NotEligible(_) => "not_eligible",
            RegistryError::Conflict(_) => "conflict",
            RegistryError::Full(_) => "full",
            RegistryError::LimitExceeded(_) => "limit_exceeded",
        }
    }
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryError::UnknownParticipant(name) => write!(f, "unknown participant: {name}"),
            RegistryError::UnknownActivity(id) => write!(f, "unknown activity: {id}"),
            RegistryError::AlreadySubscribed(id) => write!(f, "already subscribed to {id}"),
            RegistryError::NotSubscribed(id) => write!(f, "not subscribed to {id}"),
            RegistryError::NotEligible(id) => write!(f, "no matching label for {id}"),
            RegistryError::Conflict(id) => write!(f, "overlaps with subscribed activity: {id}"),
            RegistryError::Full(cap) => write!(f, "capacity {cap} reached: no places left"),
            RegistryError::LimitExceeded(msg) => write!(f, "limit exceeded: {msg}"),
        }
    }
}

impl std::error::Error for RegistryError {}
