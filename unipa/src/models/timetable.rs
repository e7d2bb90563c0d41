//! Timetable models.

use serde::{Deserialize, Serialize};

/// Weekly timetable response.
#[derive(Debug, Clone, Deserialize)]
pub struct TimetableInfo {
    /// One entry per class cell.
    #[serde(rename = "jgkmInfo", default)]
    pub entries: Vec<TimetableEntry>,
    /// Semester the timetable belongs to.
    #[serde(rename = "gakkiInfo")]
    pub semester: SemesterInfo,
}

/// One class cell in the weekly timetable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimetableEntry {
    /// Class name.
    #[serde(rename = "jugyoName")]
    pub class_name: String,
    /// Weekday the class is held, Monday = 1.
    #[serde(rename = "kaikoYobi")]
    pub weekday: i32,
    /// Class code.
    #[serde(rename = "jugyoCd")]
    pub class_code: i64,
    /// Room name.
    #[serde(rename = "kyostName", default)]
    pub room: String,
    /// Semester number.
    #[serde(rename = "gakkiNo")]
    pub semester_no: i32,
    /// Teacher name.
    #[serde(rename = "kyoinName", default)]
    pub teacher: String,
    /// Period of the day.
    #[serde(rename = "jigenNo")]
    pub period: i32,
    /// Year the class opened.
    #[serde(rename = "kaikoNendo")]
    pub opening_year: i32,
    /// Class kind: "1" regular, "2" intensive.
    #[serde(rename = "jugyoKbn")]
    pub class_kind: String,
    /// Start time, e.g. "09:00".
    #[serde(rename = "jugyoStartTime", default)]
    pub start_time: String,
    /// End time, e.g. "10:30".
    #[serde(rename = "jugyoEndTime", default)]
    pub end_time: String,
    /// Per-class bulletin counters.
    #[serde(rename = "keijiInfo", default)]
    pub bulletins: ClassBulletinCount,
    /// Academic year.
    #[serde(rename = "nendo")]
    pub year: i32,
}

/// Unread bulletin counter attached to a timetable entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassBulletinCount {
    /// Unread bulletins for this class.
    #[serde(rename = "midokCnt", default)]
    pub unread: i64,
}

/// Semester descriptor returned by the portal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SemesterInfo {
    /// Semester display name.
    #[serde(rename = "gakkiName")]
    pub name: String,
    /// Semester number within the year.
    #[serde(rename = "gakkiNo")]
    pub number: i32,
    /// Academic year.
    #[serde(rename = "nendo")]
    pub year: i32,
}

/// Semester selector for timetable requests. Both fields travel as
/// strings, matching the request schema.
#[derive(Debug, Clone, Serialize)]
pub struct SemesterKey {
    /// Academic year the classes opened.
    #[serde(rename = "kaikoNendo")]
    pub year: String,
    /// Semester number within the year.
    #[serde(rename = "gakkiNo")]
    pub semester_no: String,
}

impl SemesterKey {
    /// Create a selector from year and semester number.
    pub fn new(year: impl Into<String>, semester_no: impl Into<String>) -> Self {
        Self {
            year: year.into(),
            semester_no: semester_no.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_timetable_deserializes_portal_names() {
        let body = serde_json::json!({
            "jgkmInfo": [{
                "jugyoName": "線形代数",
                "kaikoYobi": 2,
                "jugyoCd": 110042,
                "kyostName": "A-301",
                "gakkiNo": 1,
                "kyoinName": "佐藤",
                "jigenNo": 3,
                "kaikoNendo": 2024,
                "jugyoKbn": "1",
                "jugyoStartTime": "13:00",
                "jugyoEndTime": "14:30",
                "keijiInfo": { "midokCnt": 2 },
                "nendo": 2024
            }],
            "gakkiInfo": { "gakkiName": "前期", "gakkiNo": 1, "nendo": 2024 }
        });
        let info: TimetableInfo = serde_json::from_value(body).unwrap();
        assert_eq!(info.entries.len(), 1);
        assert_eq!(info.entries[0].class_name, "線形代数");
        assert_eq!(info.entries[0].weekday, 2);
        assert_eq!(info.entries[0].bulletins.unread, 2);
        assert_eq!(info.semester.name, "前期");
    }

    #[test]
    fn test_semester_key_request_names() {
        let key = SemesterKey::new("2024", "1");
        let value = serde_json::to_value(&key).unwrap();
        assert_eq!(value["kaikoNendo"], "2024");
        assert_eq!(value["gakkiNo"], "1");
    }
}
