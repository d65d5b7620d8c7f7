use chrono::{Duration, NaiveDate};
use pretty_assertions::assert_eq;
use rstest::rstest;
use uuid::Uuid;

use ptbook_core::confirmation::{check_confirmable, describe_status, ConfirmAction};
use ptbook_core::errors::ScheduleError;
use ptbook_core::models::schedule::{Origin, Schedule, Subject};
use ptbook_core::slot::SlotTime;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
}

fn schedule(date: NaiveDate, subject: Subject, origin: Origin, confirmed: bool) -> Schedule {
    Schedule {
        id: Uuid::new_v4(),
        trainer_id: Uuid::new_v4(),
        subject,
        date,
        start_time: "14:00".parse::<SlotTime>().unwrap(),
        end_time: "15:00".parse::<SlotTime>().unwrap(),
        content: String::new(),
        confirmed,
        origin,
    }
}

fn registered() -> Subject {
    Subject::Registered {
        member_id: Uuid::new_v4(),
        display_name: "Lee Haneul".to_string(),
    }
}

#[test]
fn confirming_twice_is_a_no_op() {
    let s = schedule(today(), registered(), Origin::Internal, true);
    let action = check_confirmable(&s, today()).unwrap();
    assert_eq!(action, ConfirmAction::AlreadyConfirmed);
}

#[rstest]
#[case(0)]
#[case(-1)]
#[case(-30)]
fn todays_and_past_appointments_may_be_confirmed(#[case] offset_days: i64) {
    let member_id = Uuid::new_v4();
    let subject = Subject::Registered { member_id, display_name: "Lee Haneul".to_string() };
    let s = schedule(today() + Duration::days(offset_days), subject, Origin::Internal, false);

    let action = check_confirmable(&s, today()).unwrap();
    assert_eq!(action, ConfirmAction::Proceed { consume_for: Some(member_id) });
}

#[test]
fn future_appointments_are_rejected_as_too_early() {
    let s = schedule(today() + Duration::days(1), registered(), Origin::Internal, false);

    match check_confirmable(&s, today()) {
        Err(ScheduleError::TooEarly { days_until }) => assert_eq!(days_until, 1),
        other => panic!("expected TooEarly, got {other:?}"),
    }
    // guard is pure: the schedule itself is untouched
    assert!(!s.confirmed);
}

#[test]
fn adhoc_subjects_confirm_without_the_ledger() {
    let subject = Subject::Adhoc { display_name: "walk-in".to_string() };
    let s = schedule(today(), subject, Origin::Internal, false);

    let action = check_confirmable(&s, today()).unwrap();
    assert_eq!(action, ConfirmAction::Proceed { consume_for: None });
}

#[test]
fn external_schedules_never_touch_the_ledger() {
    let s = schedule(today(), registered(), Origin::External, false);

    let action = check_confirmable(&s, today()).unwrap();
    assert_eq!(action, ConfirmAction::Proceed { consume_for: None });
}

#[test]
fn status_text_for_confirmed_schedules() {
    let s = schedule(today(), registered(), Origin::Internal, true);
    assert_eq!(describe_status(&s, today()), "already confirmed");
}

#[rstest]
#[case(0, "today")]
#[case(-3, "today")]
#[case(1, "1 days remaining")]
#[case(14, "14 days remaining")]
fn status_text_counts_down_to_the_date(#[case] offset_days: i64, #[case] expected: &str) {
    let s = schedule(today() + Duration::days(offset_days), registered(), Origin::Internal, false);
    assert_eq!(describe_status(&s, today()), expected);
}
