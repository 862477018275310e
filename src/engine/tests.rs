use super::*;
use crate::model::fixtures::*;
use crate::model::*;
use crate::view::{ViewAction, ViewState};

// ── Scenario: bevers, two overlapping activities ─────────────────

fn bevers_programme() -> Vec<Activity> {
    vec![
        labelled(activity("A", at(10, 0), at(11, 0)), &["bevers"]),
        activity("B", at(10, 30), at(11, 30)),
    ]
}

#[test]
fn both_eligible_before_subscribing() {
    let all = bevers_programme();
    let p = participant(&["bevers"], &[]);
    assert_eq!(evaluate(&p, &all[0]), EligibilityResult::ok());
    assert_eq!(evaluate(&p, &all[1]), EligibilityResult::ok());
    assert_eq!(resolve_status(&p, &all[0], &all), DisplayStatus::Available);
    assert_eq!(resolve_status(&p, &all[1], &all), DisplayStatus::Available);
}

#[test]
fn subscribing_to_a_puts_b_in_conflict() {
    let all = bevers_programme();
    let p = participant(&["bevers"], &["A"]);
    assert_eq!(resolve_status(&p, &all[0], &all), DisplayStatus::Subscribed);
    assert_eq!(resolve_status(&p, &all[1], &all), DisplayStatus::Conflict);

    let conflicts = find_conflicts(&p, &all[1], &all);
    assert_eq!(conflicts.ids(), vec!["A".to_string()]);
}

// ── Scenario: full activity without overlap ──────────────────────

#[test]
fn full_activity_without_overlap() {
    let mut c = activity("C", at(15, 0), at(16, 0));
    c.capacity = 5;
    c.current_subscriptions = 5;
    let mut all = bevers_programme();
    all.push(c);
    let p = participant(&["bevers"], &["A"]);
    assert_eq!(evaluate(&p, &all[2]).reason, EligibilityReason::Ok);
    assert_eq!(resolve_status(&p, &all[2], &all), DisplayStatus::Full);
}

// ── Subscribed always wins ───────────────────────────────────────

#[test]
fn subscribed_is_never_reported_as_conflict_or_full() {
    // Two subscriptions that overlap each other, one of them over capacity.
    let mut a = activity("A", at(10, 0), at(12, 0));
    a.capacity = 1;
    a.current_subscriptions = 3;
    let all = vec![a, activity("B", at(11, 0), at(13, 0))];
    let p = participant(&[], &["A", "B"]);
    for activity in &all {
        assert_eq!(resolve_status(&p, activity, &all), DisplayStatus::Subscribed);
    }
}

#[test]
fn third_activity_overlapping_overlapping_subscriptions_conflicts() {
    let all = vec![
        activity("A", at(10, 0), at(12, 0)),
        activity("B", at(11, 0), at(13, 0)),
        activity("C", at(12, 30), at(14, 0)),
        activity("D", at(9, 0), at(11, 30)),
    ];
    let p = participant(&[], &["A", "B"]);

    assert_eq!(resolve_status(&p, &all[2], &all), DisplayStatus::Conflict);
    let c = find_conflicts(&p, &all[2], &all);
    assert_eq!(c.ids(), vec!["B".to_string()]);

    assert_eq!(resolve_status(&p, &all[3], &all), DisplayStatus::Conflict);
    let d = find_conflicts(&p, &all[3], &all);
    assert!(d.contains("A"));
    assert!(d.contains("B"));
    assert_eq!(d.len(), 2);
}

// ── Malformed upstream data ──────────────────────────────────────

#[test]
fn malformed_activity_renders_without_conflicts() {
    let all = vec![
        activity("kapot", at(14, 0), at(13, 0)),
        activity("goed", at(12, 0), at(15, 0)),
    ];
    let p = participant(&[], &["goed"]);
    assert_eq!(resolve_status(&p, &all[0], &all), DisplayStatus::Available);

    let config = ViewState::default()
        .apply(ViewAction::SetCalendarView(true))
        .filter_config();
    assert_eq!(apply(&all, &p, &config).len(), 2);
}

// ── Toggles through the pipeline ─────────────────────────────────

fn weekend() -> Vec<Activity> {
    let mut vol = activity("vol", on(13, 14, 0), on(13, 15, 0));
    vol.capacity = 3;
    vol.current_subscriptions = 3;
    let mut sloep = activity("sloep", on(12, 9, 0), on(12, 11, 0));
    sloep.track_id = Some("water".into());
    vec![
        activity("ontbijt", on(13, 8, 0), on(13, 9, 0)),
        sloep,
        labelled(activity("vergadering", on(12, 20, 0), on(12, 21, 0)), &["leiding"]),
        activity("zwemmen", on(12, 10, 0), on(12, 12, 0)),
        vol,
    ]
}

#[test]
fn eligible_toggle_round_trip_restores_list() {
    let all = weekend();
    let p = participant(&["bevers"], &["sloep"]);
    for calendar in [false, true] {
        let base = ViewState::default().apply(ViewAction::SetCalendarView(calendar));
        let before = apply(&all, &p, &base.filter_config());

        let filtered = base.clone().apply(ViewAction::SetEligibleOnly(true));
        let during = apply(&all, &p, &filtered.filter_config());
        assert!(during.len() < before.len());

        let restored = filtered.apply(ViewAction::SetEligibleOnly(false));
        assert_eq!(restored, base);
        assert_eq!(apply(&all, &p, &restored.filter_config()), before);
    }
}

#[test]
fn my_schedule_shows_subscriptions_as_calendar() {
    let all = weekend();
    let p = participant(&[], &["ontbijt", "sloep"]);
    let state = ViewState::default()
        .apply(ViewAction::SetTrackFilter(Some("water".into())))
        .apply(ViewAction::SetMyScheduleOnly(true));
    assert_eq!(state.label(), "Mijn Schema");

    let grouped = apply(&all, &p, &state.filter_config());
    assert_eq!(grouped.groups.len(), 2);
    assert_eq!(grouped.ids(), vec!["sloep", "ontbijt"]);
}

#[test]
fn statuses_are_recomputed_after_subscription_change() {
    let all = weekend();
    let before = participant(&[], &[]);
    let after = participant(&[], &["zwemmen"]);
    let config = FilterConfig::default();

    let sloep = |p: &Participant| {
        apply(&all, p, &config)
            .entries()
            .find(|e| e.activity.id == "sloep")
            .map(|e| e.status)
    };
    assert_eq!(sloep(&before), Some(DisplayStatus::Available));
    assert_eq!(sloep(&after), Some(DisplayStatus::Conflict));
}
