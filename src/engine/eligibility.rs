use crate::model::*;

/// May this participant join this activity right now?
///
/// Pure. Callers decide whether a decision is worth tracing.
pub fn evaluate(participant: &Participant, activity: &Activity) -> EligibilityResult {
    if participant.is_subscribed(&activity.id) {
        return EligibilityResult::denied(EligibilityReason::AlreadySubscribed);
    }
    if matches_labels(participant, activity) {
        EligibilityResult::ok()
    } else {
        EligibilityResult::denied(EligibilityReason::NoLabelMatch)
    }
}

/// Label rule alone, ignoring subscription state.
pub fn matches_labels(participant: &Participant, activity: &Activity) -> bool {
    activity.is_open_to_all() || participant.has_any_label(&activity.required_labels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::*;

    #[test]
    fn open_activity_is_eligible_without_labels() {
        let a = activity("a", at(10, 0), at(11, 0));
        let p = participant(&[], &[]);
        assert_eq!(evaluate(&p, &a), EligibilityResult::ok());
    }

    #[test]
    fn any_shared_label_is_enough() {
        let a = labelled(activity("a", at(10, 0), at(11, 0)), &["bevers", "welpen"]);
        let p = participant(&["welpen"], &[]);
        assert_eq!(evaluate(&p, &a).reason, EligibilityReason::Ok);
    }

    #[test]
    fn no_shared_label_is_rejected() {
        let a = labelled(activity("a", at(10, 0), at(11, 0)), &["leiding"]);
        let p = participant(&["bevers"], &[]);
        let result = evaluate(&p, &a);
        assert!(!result.eligible);
        assert_eq!(result.reason, EligibilityReason::NoLabelMatch);

        let unlabelled = participant(&[], &[]);
        assert_eq!(evaluate(&unlabelled, &a).reason, EligibilityReason::NoLabelMatch);
    }

    #[test]
    fn subscription_is_checked_before_labels() {
        let a = labelled(activity("a", at(10, 0), at(11, 0)), &["leiding"]);
        let p = participant(&["bevers"], &["a"]);
        let result = evaluate(&p, &a);
        assert!(!result.eligible);
        assert_eq!(result.reason, EligibilityReason::AlreadySubscribed);
        assert!(!matches_labels(&p, &a));
    }
}
