//! Class detail models.

use serde::{Deserialize, Serialize};

/// Identifies one class instance for detail and memo requests. All
/// fields travel as strings, matching the request schema.
#[derive(Debug, Clone, Serialize)]
pub struct ClassProperty {
    /// Academic year the class opened.
    #[serde(rename = "kaikoNendo")]
    pub opening_year: String,
    /// Period of the day.
    #[serde(rename = "jigenNo")]
    pub period: String,
    /// Academic year.
    #[serde(rename = "nendo")]
    pub year: String,
    /// Semester number.
    #[serde(rename = "gakkiNo")]
    pub semester_no: String,
    /// Weekday, Monday = 1.
    #[serde(rename = "kaikoYobi")]
    pub weekday: String,
    /// Class kind: "1" regular, "2" intensive.
    #[serde(rename = "jugyoKbn")]
    pub class_kind: String,
    /// Class code.
    #[serde(rename = "jugyoCd")]
    pub class_code: String,
}

/// Detail of one class.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassInfo {
    /// Student memo for the class.
    #[serde(rename = "jugyoMemo", default)]
    pub memo: ClassMemo,
    /// Whether a syllabus is published for the class.
    #[serde(rename = "syllabusPubFlg", default)]
    pub syllabus_published: bool,
    /// Class bulletins (cancellations and the like). Shape varies by
    /// deployment, kept as raw values.
    #[serde(rename = "keijiInfo", default)]
    pub bulletins: Vec<serde_json::Value>,
    /// Whether attendance is tracked for the class.
    #[serde(rename = "syuKetuKanriFlg", default)]
    pub attendance_managed: bool,
    /// Attendance counters.
    #[serde(rename = "attInfo", default)]
    pub attendance: Vec<AttendanceSummary>,
    /// Class start/end times.
    #[serde(rename = "JgkmInfo")]
    pub times: ClassTimes,
}

/// Student memo attached to a class.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClassMemo {
    /// Memo text.
    #[serde(default)]
    pub memo: Option<String>,
}

/// Attendance counters for one class.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AttendanceSummary {
    /// Attended.
    #[serde(rename = "syussekiKaisu", default)]
    pub attended: i32,
    /// Cancelled classes.
    #[serde(rename = "koketuKaisu", default)]
    pub cancelled: i32,
    /// Absent.
    #[serde(rename = "kessekiKaisu", default)]
    pub absent: i32,
    /// Late.
    #[serde(rename = "tikokuKaisu", default)]
    pub late: i32,
    /// Left early.
    #[serde(rename = "sotaiKaisu", default)]
    pub left_early: i32,
}

/// Start and end times of a class. The portal capitalizes this key
/// differently from the timetable response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClassTimes {
    /// Start time, e.g. "09:00".
    #[serde(rename = "jugyoStartTime", default)]
    pub start: String,
    /// End time, e.g. "10:30".
    #[serde(rename = "jugyoEndTime", default)]
    pub end: String,
}
