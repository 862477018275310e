use crate::model::*;

/// Do `[a_start, a_end)` and `[b_start, b_end)` share an instant?
///
/// Back-to-back ranges do not, and a range with `end <= start` overlaps nothing.
pub fn overlaps(a_start: Ms, a_end: Ms, b_start: Ms, b_end: Ms) -> bool {
    Span::new(a_start, a_end).overlaps(&Span::new(b_start, b_end))
}

/// Subscribed activities overlapping a candidate, in the order they appear in the catalogue.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConflictSet<'a> {
    activities: Vec<&'a Activity>,
}

impl<'a> ConflictSet<'a> {
    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }

    pub fn len(&self) -> usize {
        self.activities.len()
    }

    pub fn contains(&self, activity_id: &str) -> bool {
        self.activities.iter().any(|a| a.id == activity_id)
    }

    pub fn first(&self) -> Option<&'a Activity> {
        self.activities.first().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Activity> + '_ {
        self.activities.iter().copied()
    }

    pub fn ids(&self) -> Vec<ActivityId> {
        self.activities.iter().map(|a| a.id.clone()).collect()
    }
}

/// All of the participant's subscriptions that overlap `candidate` in time.
///
/// Linear in the catalogue size. Fine while subscriptions stay in the tens; an interval index
/// would be needed if that stopped being true.
pub fn find_conflicts<'a>(
    participant: &Participant,
    candidate: &Activity,
    all: &'a [Activity],
) -> ConflictSet<'a> {
    let span = candidate.span();
    if !span.is_well_formed() {
        return ConflictSet::default();
    }
    let activities = all
        .iter()
        .filter(|other| other.id != candidate.id)
        .filter(|other| participant.is_subscribed(&other.id))
        .filter(|other| span.overlaps(&other.span()))
        .collect();
    ConflictSet { activities }
}
