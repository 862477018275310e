use crate::model::*;

use super::conflict::find_conflicts;

/// Status indicator for one activity. First match wins:
/// subscribed, then conflict, then full, then available.
pub fn resolve_status(participant: &Participant, activity: &Activity, all: &[Activity]) -> DisplayStatus {
    if participant.is_subscribed(&activity.id) {
        return DisplayStatus::Subscribed;
    }
    if !find_conflicts(participant, activity, all).is_empty() {
        return DisplayStatus::Conflict;
    }
    if activity.is_full() {
        return DisplayStatus::Full;
    }
    DisplayStatus::Available
}

/// `resolve_status` for every activity, in catalogue order.
pub fn resolve_all<'a>(participant: &Participant, all: &'a [Activity]) -> Vec<(&'a Activity, DisplayStatus)> {
    all.iter()
        .map(|a| (a, resolve_status(participant, a, all)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::*;

    #[test]
    fn subscribed_beats_conflict_and_full() {
        let mut a = activity("a", at(10, 0), at(11, 0));
        a.capacity = 1;
        a.current_subscriptions = 1;
        let all = vec![a, activity("b", at(10, 0), at(11, 0))];
        let p = participant(&[], &["a", "b"]);
        assert_eq!(resolve_status(&p, &all[0], &all), DisplayStatus::Subscribed);
        assert_eq!(resolve_status(&p, &all[1], &all), DisplayStatus::Subscribed);
    }

    #[test]
    fn conflict_beats_full() {
        let mut b = activity("b", at(10, 30), at(11, 30));
        b.capacity = 5;
        b.current_subscriptions = 5;
        let all = vec![activity("a", at(10, 0), at(11, 0)), b];
        let p = participant(&[], &["a"]);
        assert_eq!(resolve_status(&p, &all[1], &all), DisplayStatus::Conflict);
    }

    #[test]
    fn full_when_at_capacity() {
        let mut c = activity("c", at(14, 0), at(15, 0));
        c.capacity = 5;
        c.current_subscriptions = 5;
        let all = vec![activity("a", at(10, 0), at(11, 0)), c];
        let p = participant(&[], &["a"]);
        assert_eq!(resolve_status(&p, &all[1], &all), DisplayStatus::Full);
    }

    #[test]
    fn zero_capacity_never_full() {
        // Unset capacity is read as unlimited rather than "no seats".
        let mut c = activity("c", at(14, 0), at(15, 0));
        c.capacity = 0;
        c.current_subscriptions = 40;
        let all = vec![c];
        let p = participant(&[], &[]);
        assert_eq!(resolve_status(&p, &all[0], &all), DisplayStatus::Available);
    }

    #[test]
    fn resolve_all_keeps_catalogue_order() {
        let all = vec![
            activity("b", at(12, 0), at(13, 0)),
            activity("a", at(10, 0), at(11, 0)),
        ];
        let p = participant(&[], &["a"]);
        let statuses: Vec<_> = resolve_all(&p, &all)
            .into_iter()
            .map(|(a, s)| (a.id.as_str(), s))
            .collect();
        assert_eq!(
            statuses,
            vec![("b", DisplayStatus::Available), ("a", DisplayStatus::Subscribed)]
        );
    }
}
