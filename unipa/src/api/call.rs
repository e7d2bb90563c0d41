//! The fixed JSON envelope of the smartphone endpoint.
//!
//! Every informational call and every session operation goes through
//! the same GET against [`SMARTPHONE_API_PATH`], carrying a nested
//! header/data/option object. The header names the service (or, for
//! screen-rendering calls, the function id) and authenticates via the
//! stored token; login-shaped calls send the password instead.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::client::{PortalResponse, UnipaClientInner};
use crate::error::{Error, Result};

/// Device identifier sent on every smartphone call. The portal
/// allow-lists devices by this value; change it in exactly one place.
pub const DEVICE_ID: &str = "i12345678-9ABC-4DEF-0123-456789ABCDEF";

/// Envelope header. Field presence varies by service; absent fields
/// are omitted from the serialized JSON entirely, matching what the
/// official app sends.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EnvelopeHeader {
    #[serde(rename = "userId", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(rename = "password", skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(rename = "shikibetsuCd", skip_serializing_if = "Option::is_none")]
    pub shikibetsu_cd: Option<String>,
    #[serde(rename = "serviceid", skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
    #[serde(rename = "funcId", skip_serializing_if = "Option::is_none")]
    pub func_id: Option<String>,
    #[serde(rename = "deviceId")]
    pub device_id: String,
}

/// The full envelope travelling in the `jsonData` query parameter.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Envelope {
    pub header: EnvelopeHeader,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub option: Option<Value>,
}

/// One call against the smartphone endpoint.
#[derive(Debug, Clone, Default)]
pub struct ServiceCall {
    service_id: Option<String>,
    func_id: Option<String>,
    user_id: Option<String>,
    password: Option<String>,
    include_token: bool,
    data: Option<Value>,
    option: Option<Value>,
}

impl ServiceCall {
    /// A call addressed to a service id.
    pub fn service(id: impl Into<String>) -> Self {
        Self {
            service_id: Some(id.into()),
            include_token: true,
            ..Default::default()
        }
    }

    /// A call addressed to a function id (screen-rendering calls).
    pub fn func(id: impl Into<String>) -> Self {
        Self {
            func_id: Some(id.into()),
            include_token: true,
            ..Default::default()
        }
    }

    /// Override the header user id (login attempts, before the session
    /// stores one).
    pub fn user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Authenticate this call with a password instead of the stored
    /// token.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self.include_token = false;
        self
    }

    /// Set the data object.
    pub fn data(mut self, value: Value) -> Self {
        self.data = Some(value);
        self
    }

    /// Set the option object.
    pub fn option(mut self, value: Value) -> Self {
        self.option = Some(value);
        self
    }
}

impl UnipaClientInner {
    /// Build the envelope for a call from the current session identity.
    pub(crate) fn envelope_for(&self, call: &ServiceCall) -> Envelope {
        let session = self.session();
        Envelope {
            header: EnvelopeHeader {
                user_id: call.user_id.clone().or_else(|| session.user_id.clone()),
                password: call.password.clone(),
                shikibetsu_cd: if call.include_token {
                    session.shikibetsu_cd.clone()
                } else {
                    None
                },
                service_id: call.service_id.clone(),
                func_id: call.func_id.clone(),
                device_id: DEVICE_ID.to_owned(),
            },
            data: call.data.clone(),
            option: call.option.clone(),
        }
    }

    /// Perform the call without touching the stored cookie. Session
    /// operations decide renewal themselves.
    pub(crate) async fn call_raw(&self, call: &ServiceCall) -> Result<PortalResponse> {
        let envelope = self.envelope_for(call);
        let json_data = serde_json::to_string(&envelope)
            .map_err(|e| Error::InvalidArgument(format!("unserializable envelope: {e}")))?;
        let cookie = self.cookie();
        self.executor()
            .get_smartphone_api(&json_data, cookie.as_deref())
            .await
    }

    /// Call a JSON-responding service, renewing the cookie from the
    /// response.
    pub(crate) async fn call_json(&self, call: &ServiceCall) -> Result<Value> {
        let response = self.call_raw(call).await?;
        self.renew_cookie(&response);
        parse_json_body(&response.text())
    }

    /// Call a service that answers with a rendered HTML page (the
    /// bulletin board does), renewing the cookie from the response.
    pub(crate) async fn call_page(&self, call: &ServiceCall) -> Result<String> {
        let response = self.call_raw(call).await?;
        self.renew_cookie(&response);
        Ok(response.text())
    }
}

/// Parse a JSON response body.
pub(crate) fn parse_json_body(text: &str) -> Result<Value> {
    serde_json::from_str(text).map_err(|e| Error::parse(format!("malformed JSON response: {e}")))
}

/// Reject bodies whose auth-result flag is false, surfacing the server
/// message. Payload fields are only guaranteed present on success, so
/// callers check this before reading anything else.
pub fn check_auth_result(body: &Value) -> Result<()> {
    if body
        .get("authResult")
        .and_then(Value::as_bool)
        .unwrap_or(false)
    {
        return Ok(());
    }

    Err(Error::auth(
        body.get("message")
            .and_then(Value::as_str)
            .map(str::to_owned),
        body.get("resultStatus")
            .and_then(Value::as_str)
            .map(str::to_owned),
    ))
}

/// Deserialize a checked response body into its typed shape.
pub(crate) fn decode<T: DeserializeOwned>(body: Value) -> Result<T> {
    serde_json::from_value(body)
        .map_err(|e| Error::parse(format!("unexpected response shape: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::UnipaClient;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn client() -> UnipaClient {
        UnipaClient::builder()
            .base_url("https://unipa.example.ac.jp")
            .build()
            .unwrap()
    }

    #[test]
    fn test_login_envelope_sends_password_not_token() {
        let client = client();
        let call = ServiceCall::service("AppLoginInfoService")
            .user("s20123456")
            .password("hunter2")
            .data(json!({
                "userId": "s20123456",
                "deviceId": DEVICE_ID,
                "password": "hunter2"
            }));
        let value = serde_json::to_value(client.inner.envelope_for(&call)).unwrap();

        assert_eq!(value["header"]["userId"], "s20123456");
        assert_eq!(value["header"]["password"], "hunter2");
        assert_eq!(value["header"]["serviceid"], "AppLoginInfoService");
        assert_eq!(value["header"]["deviceId"], DEVICE_ID);
        assert!(value["header"].get("shikibetsuCd").is_none());
        assert!(value["header"].get("funcId").is_none());
    }

    #[test]
    fn test_service_envelope_carries_session_identity() {
        let client = client();
        {
            let mut session = client.inner.session();
            session.user_id = Some("s20123456".to_owned());
            session.shikibetsu_cd = Some("token123".to_owned());
        }
        let call = ServiceCall::service("AppMenuService").data(json!({"userId": "s20123456"}));
        let value = serde_json::to_value(client.inner.envelope_for(&call)).unwrap();

        assert_eq!(value["header"]["userId"], "s20123456");
        assert_eq!(value["header"]["shikibetsuCd"], "token123");
        assert!(value["header"].get("password").is_none());
    }

    #[test]
    fn test_func_envelope_shape() {
        let client = client();
        let call = ServiceCall::func("Poa002").option(json!({"buttonDsp": "0"}));
        let value = serde_json::to_value(client.inner.envelope_for(&call)).unwrap();

        assert_eq!(value["header"]["funcId"], "Poa002");
        assert!(value["header"].get("serviceid").is_none());
        assert_eq!(value["option"]["buttonDsp"], "0");
        assert!(value.get("data").is_none());
    }

    #[test]
    fn test_check_auth_result() {
        assert!(check_auth_result(&json!({"authResult": true, "result": true})).is_ok());

        let err = check_auth_result(&json!({
            "authResult": false,
            "message": "セッションが切断されました",
            "resultStatus": "2"
        }))
        .unwrap_err();
        assert!(err.is_auth_error());
        assert_eq!(err.auth_status(), Some("2"));
        assert!(format!("{}", err).contains("セッションが切断されました"));

        // a missing flag is a failure, not a success
        assert!(check_auth_result(&json!({"result": true})).is_err());
    }
}
