//! Data models for UNIPA entities.

mod bulletin;
mod class;
mod menu;
mod session;
mod timetable;

pub use bulletin::{
    Attachment, BulletinCategory, BulletinDetail, BulletinSummary, DownloadParams,
    DownloadedFile, ViewState,
};
pub use class::{AttendanceSummary, ClassInfo, ClassMemo, ClassProperty, ClassTimes};
pub use menu::ServiceMenu;
pub use session::{AuthResult, SessionSnapshot};
pub use timetable::{ClassBulletinCount, SemesterInfo, SemesterKey, TimetableEntry, TimetableInfo};
