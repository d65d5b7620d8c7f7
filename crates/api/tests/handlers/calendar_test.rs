use chrono::NaiveDate;
use mockall::predicate;
use pretty_assertions::assert_eq;
use uuid::Uuid;

use ptbook_core::calendar;
use ptbook_core::collaborators::WorkoutRecordStore;
use ptbook_core::models::calendar::{DayStatus, MonthGrid};
use ptbook_core::models::schedule::{Origin, Schedule, Subject};
use ptbook_core::slot::SlotTime;

use crate::test_utils::TestContext;

fn schedule_on(trainer_id: Uuid, date: NaiveDate, origin: Origin) -> Schedule {
    Schedule {
        id: Uuid::new_v4(),
        trainer_id,
        subject: Subject::Adhoc { display_name: "walk-in".to_string() },
        date,
        start_time: "09:00".parse::<SlotTime>().unwrap(),
        end_time: "10:00".parse::<SlotTime>().unwrap(),
        content: String::new(),
        confirmed: false,
        origin,
    }
}

// Mirrors the month-view handler: fetch record dates from the collaborator,
// then hand everything to the pure grid builder.
async fn month_view_wrapper(
    ctx: &TestContext,
    owner_id: Uuid,
    year: i32,
    month: u32,
    schedules: &[Schedule],
) -> MonthGrid {
    let record_dates = ctx
        .records
        .list_record_dates(owner_id, year, month)
        .await
        .unwrap();
    calendar::month_grid(year, month, schedules, &record_dates).unwrap()
}

#[tokio::test]
async fn month_view_merges_schedules_and_workout_records() {
    let mut ctx = TestContext::new();
    let trainer_id = Uuid::new_v4();
    let schedule_day = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
    let record_day = NaiveDate::from_ymd_opt(2025, 3, 12).unwrap();

    ctx.records
        .expect_list_record_dates()
        .with(predicate::eq(trainer_id), predicate::eq(2025), predicate::eq(3))
        .returning(move |_, _, _| Ok(vec![record_day]));

    let schedules = vec![schedule_on(trainer_id, schedule_day, Origin::Internal)];
    let grid = month_view_wrapper(&ctx, trainer_id, 2025, 3, &schedules).await;

    let tenth = grid.cells.iter().find(|c| c.day == Some(10)).unwrap();
    assert!(tenth.statuses.contains(&DayStatus::Schedule));
    assert!(!tenth.statuses.contains(&DayStatus::Record));

    let twelfth = grid.cells.iter().find(|c| c.day == Some(12)).unwrap();
    assert_eq!(twelfth.statuses.len(), 1);
    assert!(twelfth.statuses.contains(&DayStatus::Record));
}

#[tokio::test]
async fn external_schedules_are_tagged_separately() {
    let mut ctx = TestContext::new();
    let trainer_id = Uuid::new_v4();
    let day = NaiveDate::from_ymd_opt(2025, 3, 18).unwrap();

    ctx.records
        .expect_list_record_dates()
        .returning(|_, _, _| Ok(vec![]));

    let schedules = vec![schedule_on(trainer_id, day, Origin::External)];
    let grid = month_view_wrapper(&ctx, trainer_id, 2025, 3, &schedules).await;

    let cell = grid.cells.iter().find(|c| c.day == Some(18)).unwrap();
    assert!(cell.statuses.contains(&DayStatus::Schedule));
    assert!(cell.statuses.contains(&DayStatus::External));
}

#[test]
fn week_query_dates_normalize_to_sunday() {
    // any date inside the week resolves to the same grid start
    let wednesday = NaiveDate::from_ymd_opt(2025, 3, 12).unwrap();
    let sunday = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();
    assert_eq!(calendar::week_start_sunday(wednesday), sunday);

    let grid = calendar::week_grid(wednesday, &[]);
    assert_eq!(grid.week_start, sunday);
}
