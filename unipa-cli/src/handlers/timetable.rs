//! Timetable handlers.

use colored::Colorize;
use serde::Serialize;
use unipa::TimetableEntry;

use crate::output::{PlainPrint, TableRow};

const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// One timetable line.
#[derive(Debug, Clone, Serialize)]
pub struct ClassRow {
    pub weekday: String,
    pub period: i32,
    pub name: String,
    pub teacher: String,
    pub room: String,
    pub time: String,
    pub unread: i64,
}

impl From<&TimetableEntry> for ClassRow {
    fn from(e: &TimetableEntry) -> Self {
        let weekday = WEEKDAYS
            .get((e.weekday as usize).wrapping_sub(1))
            .copied()
            .unwrap_or("-")
            .to_string();
        let time = if e.start_time.is_empty() {
            String::new()
        } else {
            format!("{}-{}", e.start_time, e.end_time)
        };
        Self {
            weekday,
            period: e.period,
            name: e.class_name.clone(),
            teacher: e.teacher.clone(),
            room: e.room.clone(),
            time,
            unread: e.bulletins.unread,
        }
    }
}

impl TableRow for ClassRow {
    fn headers() -> Vec<&'static str> {
        vec!["Day", "Period", "Class", "Teacher", "Room", "Time", "Unread"]
    }
    fn row(&self) -> Vec<String> {
        vec![
            self.weekday.clone(),
            self.period.to_string(),
            self.name.clone(),
            self.teacher.clone(),
            self.room.clone(),
            self.time.clone(),
            self.unread.to_string(),
        ]
    }
}

impl PlainPrint for ClassRow {
    fn plain_print(&self) {
        let unread = if self.unread > 0 {
            format!(" ({} unread)", self.unread).red().to_string()
        } else {
            String::new()
        };
        println!(
            "{} {} {} {} {}{}",
            format!("{}{}", self.weekday, self.period).cyan(),
            self.name.bold(),
            self.teacher.dimmed(),
            self.room.dimmed(),
            self.time.dimmed(),
            unread
        );
    }
}
