use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use uuid::Uuid;

use ptbook_core::conflict::{find_conflicts, has_conflict, overlaps};
use ptbook_core::models::schedule::{Origin, Schedule, Subject};
use ptbook_core::slot::SlotTime;

fn slot(s: &str) -> SlotTime {
    s.parse().unwrap()
}

fn schedule(start: &str, end: &str) -> Schedule {
    Schedule {
        id: Uuid::new_v4(),
        trainer_id: Uuid::new_v4(),
        subject: Subject::Adhoc { display_name: "walk-in".to_string() },
        date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
        start_time: slot(start),
        end_time: slot(end),
        content: String::new(),
        confirmed: false,
        origin: Origin::Internal,
    }
}

#[test]
fn adjacent_blocks_do_not_overlap() {
    assert!(!overlaps(slot("09:00"), slot("10:00"), slot("10:00"), slot("11:00")));
    assert!(!overlaps(slot("10:00"), slot("11:00"), slot("09:00"), slot("10:00")));
}

#[test]
fn contained_and_straddling_blocks_overlap() {
    // contained
    assert!(overlaps(slot("09:00"), slot("12:00"), slot("10:00"), slot("11:00")));
    // straddling either edge
    assert!(overlaps(slot("09:00"), slot("11:00"), slot("10:00"), slot("12:00")));
    assert!(overlaps(slot("10:00"), slot("12:00"), slot("09:00"), slot("11:00")));
    // identical
    assert!(overlaps(slot("09:00"), slot("10:00"), slot("09:00"), slot("10:00")));
}

#[test]
fn booking_next_to_an_existing_block_is_legal() {
    let existing = vec![schedule("09:00", "10:00")];
    assert!(!has_conflict(&existing, slot("10:00"), slot("11:00")));
    assert!(!has_conflict(&existing, slot("08:00"), slot("09:00")));
}

#[test]
fn overlapping_candidate_reports_the_colliding_id() {
    let existing = vec![schedule("14:00", "15:00")];
    let conflicting = find_conflicts(&existing, slot("14:00"), slot("16:00"), None);
    assert_eq!(conflicting, vec![existing[0].id]);
}

#[test]
fn multi_hour_candidate_collides_with_every_overlapped_block() {
    let existing = vec![
        schedule("09:00", "10:00"),
        schedule("11:00", "12:00"),
        schedule("13:00", "14:00"),
    ];
    let conflicting = find_conflicts(&existing, slot("09:00"), slot("12:00"), None);
    assert_eq!(conflicting, vec![existing[0].id, existing[1].id]);
}

#[test]
fn update_candidate_never_conflicts_with_itself() {
    let existing = vec![schedule("09:00", "11:00")];
    let own_id = existing[0].id;

    // shrinking the block in place is legal
    let conflicting = find_conflicts(&existing, slot("09:00"), slot("10:00"), Some(own_id));
    assert!(conflicting.is_empty());

    // but it still collides with other siblings
    let mut siblings = existing.clone();
    siblings.push(schedule("12:00", "13:00"));
    let conflicting = find_conflicts(&siblings, slot("10:00"), slot("13:00"), Some(own_id));
    assert_eq!(conflicting, vec![siblings[1].id]);
}

#[test]
fn empty_day_never_conflicts() {
    assert!(!has_conflict(&[], slot("06:00"), slot("24:00")));
}
