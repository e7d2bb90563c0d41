//! Session identity and cookie renewal.

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::SessionSnapshot;

lazy_static! {
    /// Session identifier inside a Set-Cookie value.
    static ref SESSION_COOKIE_RE: Regex = Regex::new(r"JSESSIONID=.*?:-1;").unwrap();
}

/// The three pieces of session identity.
///
/// Mutated in place for the lifetime of the client: the cookie is
/// replaced whenever a response carries a renewed session identifier,
/// the token is set once at login, the user id at construction or
/// login.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    /// Portal user id.
    pub user_id: Option<String>,
    /// Opaque per-user token issued at login (shikibetsuCd).
    pub shikibetsu_cd: Option<String>,
    /// Current session cookie. Sent on every request once set, until
    /// replaced by a renewal.
    pub cookie: Option<String>,
}

impl SessionState {
    /// Seed session identity from a persisted snapshot.
    pub fn from_snapshot(snapshot: SessionSnapshot) -> Self {
        Self {
            user_id: Some(snapshot.user_id),
            shikibetsu_cd: Some(snapshot.token),
            cookie: snapshot.cookie,
        }
    }

    /// Scan Set-Cookie values for a renewed session identifier and keep
    /// the last match. Values without a match leave the cookie as-is.
    pub fn renew_cookie(&mut self, set_cookie_values: &[String]) {
        if let Some(renewed) = extract_session_cookie(set_cookie_values) {
            self.cookie = Some(renewed);
        }
    }

    /// Snapshot the identity for persistence. None until both user id
    /// and token are known; a partial identity is not resumable.
    pub fn snapshot(&self) -> Option<SessionSnapshot> {
        match (&self.user_id, &self.shikibetsu_cd) {
            (Some(user_id), Some(token)) => Some(SessionSnapshot {
                user_id: user_id.clone(),
                token: token.clone(),
                cookie: self.cookie.clone(),
            }),
            _ => None,
        }
    }
}

/// Last session-identifier match across all Set-Cookie values, if any.
/// Servers may rotate the identifier several times within one response
/// chain; the last occurrence reflects their own precedence.
pub fn extract_session_cookie(set_cookie_values: &[String]) -> Option<String> {
    let mut last = None;
    for value in set_cookie_values {
        for found in SESSION_COOKIE_RE.find_iter(value) {
            last = Some(found.as_str().to_owned());
        }
    }
    last
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cookie_extraction() {
        let values = vec!["JSESSIONID=abc123:-1; Path=/; HttpOnly".to_owned()];
        assert_eq!(
            extract_session_cookie(&values).as_deref(),
            Some("JSESSIONID=abc123:-1;")
        );
    }

    #[test]
    fn test_last_match_wins() {
        let values = vec![
            "JSESSIONID=first:-1; Path=/".to_owned(),
            "unrelated=1".to_owned(),
            "JSESSIONID=second:-1; Path=/".to_owned(),
        ];
        assert_eq!(
            extract_session_cookie(&values).as_deref(),
            Some("JSESSIONID=second:-1;")
        );
    }

    #[test]
    fn test_multiple_matches_within_one_value() {
        let values =
            vec!["JSESSIONID=a:-1; ... JSESSIONID=b:-1; trailing".to_owned()];
        assert_eq!(
            extract_session_cookie(&values).as_deref(),
            Some("JSESSIONID=b:-1;")
        );
    }

    #[test]
    fn test_renewal_is_idempotent_under_replay() {
        let values = vec!["JSESSIONID=abc:-1; Path=/".to_owned()];
        let mut session = SessionState::default();
        session.renew_cookie(&values);
        let once = session.cookie.clone();
        session.renew_cookie(&values);
        assert_eq!(session.cookie, once);
        assert_eq!(once.as_deref(), Some("JSESSIONID=abc:-1;"));
    }

    #[test]
    fn test_no_match_keeps_current_cookie() {
        let mut session = SessionState {
            cookie: Some("JSESSIONID=keep:-1;".to_owned()),
            ..Default::default()
        };
        session.renew_cookie(&["tracking=xyz".to_owned()]);
        assert_eq!(session.cookie.as_deref(), Some("JSESSIONID=keep:-1;"));
    }

    #[test]
    fn test_snapshot_requires_full_identity() {
        let mut session = SessionState::default();
        assert!(session.snapshot().is_none());

        session.user_id = Some("s20123456".to_owned());
        assert!(session.snapshot().is_none());

        session.shikibetsu_cd = Some("token".to_owned());
        let snapshot = session.snapshot().unwrap();
        assert_eq!(snapshot.user_id, "s20123456");
        assert_eq!(snapshot.cookie, None);
    }

    #[test]
    fn test_from_snapshot_round_trip() {
        let snapshot = SessionSnapshot::new("u", "t").with_cookie("JSESSIONID=c:-1;");
        let session = SessionState::from_snapshot(snapshot.clone());
        assert_eq!(session.snapshot(), Some(snapshot));
    }
}
