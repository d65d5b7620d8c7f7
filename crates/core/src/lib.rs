//! # PT Booking Core
//!
//! Pure domain logic for the booking engine: the hour-slot time model,
//! conflict detection, confirmation rules, calendar view builders, and the
//! shared error taxonomy. Nothing in this crate touches the network or the
//! database; the db and api crates drive these functions.

pub mod calendar;
pub mod collaborators;
pub mod confirmation;
pub mod conflict;
pub mod errors;
pub mod models;
pub mod slot;
