//! CLI subcommands.

pub mod bulletin;
pub mod timetable;
