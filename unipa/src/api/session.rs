//! Session lifecycle operations.

use std::sync::Arc;

use serde_json::{json, Value};

use crate::api::call::{parse_json_body, ServiceCall, DEVICE_ID};
use crate::client::{SessionState, UnipaClientInner};
use crate::error::{Error, Result};
use crate::models::{AuthResult, SessionSnapshot};

/// API for authentication and session lifecycle.
pub struct SessionApi {
    client: Arc<UnipaClientInner>,
}

impl SessionApi {
    pub(crate) fn new(client: Arc<UnipaClientInner>) -> Self {
        Self { client }
    }

    /// Authenticate with user id and password.
    ///
    /// On success the issued token and the renewed cookie are stored on
    /// the client, and the returned [`AuthResult`] carries the cookie
    /// for external persistence. A rejected login fails with
    /// [`Error::Auth`] carrying the server message and leaves any prior
    /// session state unchanged.
    pub async fn login(&self, user_id: &str, password: &str) -> Result<AuthResult> {
        let call = ServiceCall::service("AppLoginInfoService")
            .user(user_id)
            .password(password)
            .data(json!({
                "userId": user_id,
                "deviceId": DEVICE_ID,
                "password": password,
            }));

        let response = self.client.call_raw(&call).await?;
        let body = parse_json_body(&response.text())?;

        let auth_ok = flag(&body, "authResult");
        let result_ok = flag(&body, "result");
        if !(auth_ok && result_ok) {
            return Err(Error::auth(
                str_field(&body, "message").or_else(|| str_field(&body, "displayMessage")),
                str_field(&body, "resultStatus"),
            ));
        }

        let token = str_field(&body, "shikibetsuCd")
            .ok_or_else(|| Error::parse("login response missing shikibetsuCd"))?;

        {
            let mut session = self.client.session();
            session.user_id = Some(user_id.to_owned());
            session.shikibetsu_cd = Some(token.clone());
            session.renew_cookie(&response.set_cookies);
        }

        Ok(AuthResult {
            success: true,
            display_name: str_field(&body, "displayName"),
            student_code: str_field(&body, "gakusekiCd"),
            token: Some(token),
            cookie: self.client.cookie(),
            status_code: str_field(&body, "resultStatus"),
        })
    }

    /// Probe whether the stored session is still authenticated.
    ///
    /// A negative answer is a normal outcome and returns `Ok(false)`;
    /// only transport-level failures are errors.
    pub async fn check_auth_status(&self) -> Result<bool> {
        let mut data = serde_json::Map::new();
        data.insert("deviceId".to_owned(), json!(DEVICE_ID));
        if let Some(user_id) = self.client.session().user_id.clone() {
            data.insert("userId".to_owned(), json!(user_id));
        }

        let call = ServiceCall::service("login").data(Value::Object(data));
        let body = self.client.call_json(&call).await?;

        let authenticated = flag(&body, "authResult");
        if !authenticated {
            log::warn!("auth status probe rejected: {body}");
        }
        Ok(authenticated)
    }

    /// Seed the session from a persisted snapshot without contacting
    /// the server.
    pub fn restore(&self, snapshot: SessionSnapshot) {
        *self.client.session() = SessionState::from_snapshot(snapshot);
    }

    /// Replace only the stored cookie, e.g. to resume with a fresh one.
    pub fn set_cookie(&self, cookie: impl Into<String>) {
        self.client.session().cookie = Some(cookie.into());
    }

    /// Snapshot the current identity for persistence. `None` until a
    /// login or restore provided both user id and token. Never contains
    /// a password.
    pub fn export(&self) -> Option<SessionSnapshot> {
        self.client.session().snapshot()
    }
}

fn flag(body: &Value, name: &str) -> bool {
    body.get(name).and_then(Value::as_bool).unwrap_or(false)
}

fn str_field(body: &Value, name: &str) -> Option<String> {
    body.get(name).and_then(Value::as_str).map(str::to_owned)
}
