//! Shared handlers building display rows from API results.

pub mod bulletin;
pub mod timetable;
