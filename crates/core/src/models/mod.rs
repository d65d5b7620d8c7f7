pub mod calendar;
pub mod matching;
pub mod schedule;
