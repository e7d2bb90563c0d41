//! Session and authentication models.

use serde::{Deserialize, Serialize};

/// Outcome of a login call or status probe.
#[derive(Debug, Clone, Default)]
pub struct AuthResult {
    /// Whether the portal accepted the credentials.
    pub success: bool,
    /// Display name of the authenticated user.
    pub display_name: Option<String>,
    /// Student register code (gakusekiCd).
    pub student_code: Option<String>,
    /// Opaque per-user token issued at login (shikibetsuCd).
    pub token: Option<String>,
    /// Session cookie as of this response, for external persistence.
    pub cookie: Option<String>,
    /// Opaque portal-defined status code. Diagnostics only, never used
    /// for control flow beyond success/failure.
    pub status_code: Option<String>,
}

/// Persistable session identity, round-trippable through
/// restore/export. Contains no password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    #[serde(rename = "userId")]
    pub user_id: String,
    /// The per-user token issued at login (shikibetsuCd).
    pub token: String,
    /// Session cookie, when one was held at export time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cookie: Option<String>,
}

impl SessionSnapshot {
    /// Create a snapshot from its parts.
    pub fn new(user_id: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            token: token.into(),
            cookie: None,
        }
    }

    /// Attach a session cookie.
    pub fn with_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.cookie = Some(cookie.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_snapshot_round_trip() {
        let snapshot = SessionSnapshot::new("s20123456", "a1b2c3")
            .with_cookie("JSESSIONID=deadbeef:-1;");
        let json = serde_json::to_string(&snapshot).unwrap();
        let back: SessionSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(snapshot, back);
    }

    #[test]
    fn test_snapshot_field_names() {
        let snapshot = SessionSnapshot::new("s20123456", "a1b2c3");
        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(value["userId"], "s20123456");
        assert_eq!(value["token"], "a1b2c3");
        // cookie omitted entirely when absent
        assert!(value.get("cookie").is_none());
    }

    #[test]
    fn test_snapshot_accepts_missing_cookie() {
        let back: SessionSnapshot =
            serde_json::from_str(r#"{"userId":"u","token":"t"}"#).unwrap();
        assert_eq!(back.cookie, None);
    }
}
