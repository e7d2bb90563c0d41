//! Rust client library for UNIVERSAL PASSPORT (UNIPA) university
//! portals.
//!
//! The portal exposes no formal API: informational calls go through a
//! semi-documented smartphone JSON endpoint, and the bulletin board is
//! scraped from server-rendered JSF pages whose postbacks are coupled
//! to a per-page view state token. This crate owns the session
//! lifecycle (login, cookie renewal, status probe, restore/export) and
//! the extraction pipeline on top of it.

pub mod api;
pub mod client;
pub mod error;
pub mod models;
pub mod parser;

// Re-export main types
pub use client::{HttpConfig, UnipaClient, UnipaClientBuilder, USER_AGENT};
pub use error::{Error, Result};

// Re-export commonly used models
pub use models::{
    Attachment, AttendanceSummary, AuthResult, BulletinCategory, BulletinDetail,
    BulletinSummary, ClassInfo, ClassProperty, DownloadParams, DownloadedFile, SemesterInfo,
    SemesterKey, ServiceMenu, SessionSnapshot, TimetableEntry, TimetableInfo, ViewState,
};

// Re-export API types
pub use api::{BulletinApi, MenuApi, SessionApi, TimetableApi, DEVICE_ID};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builder() {
        let client = UnipaClient::builder()
            .base_url("https://unipa.example.ac.jp")
            .build();
        assert!(client.is_ok());

        let client = client.unwrap();
        assert!(!client.is_authenticated());
        assert_eq!(client.current_user_id(), None);
    }

    #[test]
    fn test_builder_requires_base_url() {
        let err = UnipaClient::builder().build().unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_client_with_session() {
        let client = UnipaClient::builder()
            .base_url("https://unipa.example.ac.jp")
            .session(SessionSnapshot::new("s20123456", "token123"))
            .build()
            .unwrap();

        assert!(client.is_authenticated());
        assert_eq!(client.current_user_id().as_deref(), Some("s20123456"));
    }
}
