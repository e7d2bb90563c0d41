//! Timetable and class detail operations. Plain JSON calls with no
//! state machine of their own.

use std::sync::Arc;

use serde_json::{json, Value};

use crate::api::call::{check_auth_result, decode, ServiceCall};
use crate::client::UnipaClientInner;
use crate::error::{Error, Result};
use crate::models::{ClassInfo, ClassProperty, SemesterKey, TimetableInfo};

/// API for timetable operations.
pub struct TimetableApi {
    client: Arc<UnipaClientInner>,
}

impl TimetableApi {
    pub(crate) fn new(client: Arc<UnipaClientInner>) -> Self {
        Self { client }
    }

    /// Weekly timetable, for the current semester or a given one.
    pub async fn get(&self, semester: Option<SemesterKey>) -> Result<TimetableInfo> {
        let mut data = serde_json::Map::new();
        if let Some(user_id) = self.client.session().user_id.clone() {
            data.insert("userId".to_owned(), json!(user_id));
        }
        if let Some(key) = semester {
            data.insert("kaikoNendo".to_owned(), json!(key.year));
            data.insert("gakkiNo".to_owned(), json!(key.semester_no));
        }

        let call = ServiceCall::service("AppGetJkwrService").data(Value::Object(data));
        let body = self.client.call_json(&call).await?;
        check_auth_result(&body)?;
        decode(body)
    }

    /// Detail of one class: memo, syllabus flag, attendance, times.
    pub async fn class_info(&self, class: &ClassProperty) -> Result<ClassInfo> {
        let data = serde_json::to_value(class)
            .map_err(|e| Error::InvalidArgument(format!("unserializable class key: {e}")))?;

        let call = ServiceCall::service("AppGetJugyoDetailService").data(data);
        let body = self.client.call_json(&call).await?;
        check_auth_result(&body)?;
        decode(body)
    }

    /// Store the student memo for a class.
    pub async fn set_class_memo(&self, class: &ClassProperty, memo: &str) -> Result<()> {
        let call = ServiceCall::service("AppJugyoMemoInfoService").data(json!({
            "jugyoMemo": memo,
            "nendo": class.year,
            "jugyoCd": class.class_code,
        }));
        let body = self.client.call_json(&call).await?;
        check_auth_result(&body)?;
        Ok(())
    }

    /// Highest period number of the deployment's daily schedule.
    pub async fn max_period(&self) -> Result<i64> {
        let call = ServiceCall::service("AppGetMaxJigenNoService").data(json!({}));
        let body = self.client.call_json(&call).await?;
        check_auth_result(&body)?;

        body.get("maxJigenNo")
            .and_then(Value::as_i64)
            .ok_or_else(|| Error::parse("response missing maxJigenNo"))
    }
}
