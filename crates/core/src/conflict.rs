//! Time-conflict detection for one trainer-day.
//!
//! Schedules are half-open intervals `[start, end)`: two blocks overlap iff
//! `s1 < e2 && s2 < e1`, so an exact boundary touch (one block ending where
//! the next begins) is legal. Callers pass the sibling set for the same
//! trainer and date; inverted or zero-length candidates are rejected by slot
//! validation before they get here.

use uuid::Uuid;

use crate::models::schedule::Schedule;
use crate::slot::SlotTime;

pub fn overlaps(s1: SlotTime, e1: SlotTime, s2: SlotTime, e2: SlotTime) -> bool {
    s1 < e2 && s2 < e1
}

/// Returns the ids of every sibling the candidate interval collides with.
/// The update path passes its own id as `exclude` so a schedule never
/// conflicts with itself.
pub fn find_conflicts(
    existing: &[Schedule],
    start: SlotTime,
    end: SlotTime,
    exclude: Option<Uuid>,
) -> Vec<Uuid> {
    existing
        .iter()
        .filter(|s| Some(s.id) != exclude)
        .filter(|s| overlaps(start, end, s.start_time, s.end_time))
        .map(|s| s.id)
        .collect()
}

pub fn has_conflict(existing: &[Schedule], start: SlotTime, end: SlotTime) -> bool {
    existing
        .iter()
        .any(|s| overlaps(start, end, s.start_time, s.end_time))
}
