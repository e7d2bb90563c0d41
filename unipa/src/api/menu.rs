//! Smartphone menu operations and authenticated URL builders.

use std::sync::Arc;

use serde_json::json;

use crate::api::call::{check_auth_result, decode, Envelope, EnvelopeHeader, ServiceCall, DEVICE_ID};
use crate::client::{UnipaClientInner, SMARTPHONE_API_PATH};
use crate::error::{Error, Result};
use crate::models::{ClassProperty, ServiceMenu};

/// API for the smartphone menu.
pub struct MenuApi {
    client: Arc<UnipaClientInner>,
}

impl MenuApi {
    pub(crate) fn new(client: Arc<UnipaClientInner>) -> Self {
        Self { client }
    }

    /// Functions the portal enables for the current user.
    pub async fn services(&self) -> Result<ServiceMenu> {
        let mut data = serde_json::Map::new();
        if let Some(user_id) = self.client.session().user_id.clone() {
            data.insert("userId".to_owned(), json!(user_id));
        }

        let call = ServiceCall::service("AppMenuService").data(serde_json::Value::Object(data));
        let body = self.client.call_json(&call).await?;
        check_auth_result(&body)?;
        decode(body)
    }

    /// URL opening the portal top in a browser, authenticated by the
    /// envelope embedded in the query string.
    pub fn portal_url(&self) -> Result<String> {
        self.envelope_url(Envelope {
            header: self.identity_header(),
            data: None,
            option: None,
        })
    }

    /// URL opening the syllabus of one class.
    pub fn syllabus_url(&self, class: &ClassProperty) -> Result<String> {
        self.envelope_url(Envelope {
            header: self.identity_header(),
            data: None,
            option: Some(json!({
                "sanshoTblFlg": "1",
                "nendo": class.year,
                "jugyoCd": class.class_code,
                "buttonDsp": "0",
                "funcId": "Kms008",
                "formId": "pKms0804A",
            })),
        })
    }

    fn identity_header(&self) -> EnvelopeHeader {
        let session = self.client.session();
        EnvelopeHeader {
            user_id: session.user_id.clone(),
            shikibetsu_cd: session.shikibetsu_cd.clone(),
            device_id: DEVICE_ID.to_owned(),
            ..Default::default()
        }
    }

    fn envelope_url(&self, envelope: Envelope) -> Result<String> {
        let json_data = serde_json::to_string(&envelope)
            .map_err(|e| Error::InvalidArgument(format!("unserializable envelope: {e}")))?;
        let mut url = self.client.config.resolve_url(SMARTPHONE_API_PATH)?;
        url.query_pairs_mut().append_pair("jsonData", &json_data);
        Ok(url.into())
    }
}
