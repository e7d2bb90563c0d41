//! Error types.

use thiserror::Error;

/// The main error type for UNIPA operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Network or HTTP-level failure. Surfaced as-is, never retried.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The portal explicitly rejected the credentials or session.
    #[error("authentication rejected: {}", .message.as_deref().unwrap_or("no server message"))]
    Auth {
        /// Server-provided message, surfaced unmodified when present.
        message: Option<String>,
        /// Opaque portal-defined status code. Diagnostics only.
        status: Option<String>,
    },

    /// An expected structural element was absent from a response.
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid argument passed to a client method or builder.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// URL parsing error.
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
}

impl Error {
    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Error::Parse(msg.into())
    }

    /// Create an authentication error from server-provided fields.
    pub fn auth(message: Option<String>, status: Option<String>) -> Self {
        Error::Auth { message, status }
    }

    /// Check if this is an authentication error.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Error::Auth { .. })
    }

    /// Check if this is a parse error.
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Error::Parse(_))
    }

    /// The portal status code attached to an authentication error.
    pub fn auth_status(&self) -> Option<&str> {
        match self {
            Error::Auth { status, .. } => status.as_deref(),
            _ => None,
        }
    }
}

/// Result type alias for UNIPA operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_display() {
        let e = Error::auth(Some("パスワードが違います".into()), Some("9".into()));
        assert_eq!(
            format!("{}", e),
            "authentication rejected: パスワードが違います"
        );
        assert_eq!(e.auth_status(), Some("9"));
    }

    #[test]
    fn test_auth_error_display_without_message() {
        let e = Error::auth(None, None);
        assert_eq!(format!("{}", e), "authentication rejected: no server message");
    }

    #[test]
    fn test_predicates() {
        assert!(Error::auth(None, None).is_auth_error());
        assert!(!Error::parse("x").is_auth_error());
        assert!(Error::parse("x").is_parse_error());
    }
}
