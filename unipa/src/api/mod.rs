//! API modules.

mod bulletin;
mod call;
mod menu;
mod session;
mod timetable;

pub use bulletin::BulletinApi;
pub use call::{check_auth_result, Envelope, EnvelopeHeader, ServiceCall, DEVICE_ID};
pub use menu::MenuApi;
pub use session::SessionApi;
pub use timetable::TimetableApi;
