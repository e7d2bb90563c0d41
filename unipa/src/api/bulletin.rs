//! Bulletin board operations — the HTML extraction flows.
//!
//! The bulletin board has no JSON endpoint: the listing is a rendered
//! JSF page reached through the smartphone menu, pagination is a form
//! postback keyed by the page's view state, and attachments are fetched
//! by replaying the download button's form submit. Only one flow may
//! run against the session at a time, because each postback invalidates
//! the view state an earlier page handed out.

use std::sync::Arc;

use serde_json::json;

use crate::api::call::ServiceCall;
use crate::api::session::SessionApi;
use crate::client::UnipaClientInner;
use crate::error::{Error, Result};
use crate::models::{
    Attachment, BulletinCategory, BulletinDetail, BulletinSummary, DownloadedFile, ViewState,
};
use crate::parser::bulletin::{
    parse_category_headers, parse_detail_page, parse_inline_rows, parse_paginated_rows,
    show_more_command_field,
};
use crate::parser::html::{HtmlDocument, VIEW_STATE_ID};

/// Function id of the bulletin board in the smartphone menu.
const BULLETIN_FUNC_ID: &str = "Poa002";

/// Postback target of the bulletin summary page.
const SUMMARY_FORM_PATH: &str = "/faces/up/po/Poa00201Asm.jsp";

/// Detail page path.
const DETAIL_PAGE_PATH: &str = "/faces/up/po/pPoa0202Asm.jsp";

/// Unread-count service id.
const UNREAD_COUNT_SERVICE: &str = "AppGetMidokKeijiCntService";

/// API for bulletin board operations.
pub struct BulletinApi {
    client: Arc<UnipaClientInner>,
}

impl BulletinApi {
    pub(crate) fn new(client: Arc<UnipaClientInner>) -> Self {
        Self { client }
    }

    /// Fetch the bulletin board listing.
    ///
    /// With `show_all` set, every category exposing a "show more" link
    /// is expanded through a postback; only the first page of the
    /// expanded view is read. Without it, the inline rows are returned
    /// as rendered, so item counts may fall short of `total_count`.
    pub async fn list(&self, show_all: bool) -> Result<Vec<BulletinCategory>> {
        if !SessionApi::new(self.client.clone()).check_auth_status().await? {
            return Err(Error::auth(Some("session expired".into()), None));
        }

        let call = ServiceCall::func(BULLETIN_FUNC_ID).option(json!({ "buttonDsp": "0" }));
        let page = self.client.call_page(&call).await?;
        let doc = HtmlDocument::parse(&page);
        let view_state = doc.view_state()?;
        let headers = parse_category_headers(&doc)?;

        let mut categories = Vec::with_capacity(headers.len());
        for header in headers {
            let items = if show_all && header.has_more {
                self.fetch_expanded_category(header.index, &view_state)
                    .await?
            } else {
                parse_inline_rows(&doc, header.index)
            };
            categories.push(BulletinCategory {
                title: header.title,
                total_count: header.total_count,
                items,
            });
        }
        Ok(categories)
    }

    /// Expand one category through its "show more" postback and read
    /// the first page of the expanded table.
    async fn fetch_expanded_category(
        &self,
        category: usize,
        view_state: &ViewState,
    ) -> Result<Vec<BulletinSummary>> {
        let form = vec![
            (VIEW_STATE_ID.to_owned(), view_state.as_str().to_owned()),
            (show_more_command_field(category), String::new()),
            ("form1".to_owned(), "form1".to_owned()),
        ];
        let cookie = self.client.cookie();
        let response = self
            .client
            .executor()
            .post_form(SUMMARY_FORM_PATH, &form, cookie.as_deref())
            .await?;
        self.client.renew_cookie(&response);

        let doc = HtmlDocument::parse(&response.text());
        let items = parse_paginated_rows(&doc);
        self.return_to_summary(&doc).await;
        Ok(items)
    }

    /// Navigate the server-side view back to the summary so the next
    /// category postback starts from a known state. Best effort: the
    /// items already extracted do not depend on it succeeding.
    async fn return_to_summary(&self, doc: &HtmlDocument) {
        let view_state = match doc.view_state() {
            Ok(vs) => vs,
            Err(e) => {
                log::warn!("skipping return navigation: {e}");
                return;
            }
        };

        let form = vec![
            (
                // the field name's typo is the server's, not ours
                "form1:htmlParentTable:0:htmlHeaderTbl:0:retrurn".to_owned(),
                "一覧表示".to_owned(),
            ),
            (
                "form1:htmlParentTable:htmlDetailTbl2:web1__pagerWeb".to_owned(),
                "0".to_owned(),
            ),
            (VIEW_STATE_ID.to_owned(), view_state.as_str().to_owned()),
            ("form1".to_owned(), "form1".to_owned()),
        ];
        let cookie = self.client.cookie();
        if let Err(e) = self
            .client
            .executor()
            .post_form(SUMMARY_FORM_PATH, &form, cookie.as_deref())
            .await
        {
            log::warn!("return navigation failed: {e}");
        }
    }

    /// Fetch one bulletin's detail page, keyed by category and item
    /// position on the summary page.
    pub async fn detail(&self, category: usize, item: usize) -> Result<BulletinDetail> {
        let path = format!(
            "{}?fieldId=dummy:form1:htmlParentTable:{}:htmlDetailTbl:{}:linkEx1",
            DETAIL_PAGE_PATH, category, item
        );
        let cookie = self.client.cookie();
        let response = self
            .client
            .executor()
            .get(&path, cookie.as_deref())
            .await?;
        self.client.renew_cookie(&response);

        let doc = HtmlDocument::parse(&response.text());
        // capture the cookie as of this response, after renewal
        let captured = self.client.cookie();
        parse_detail_page(&doc, captured.as_deref())
    }

    /// Download one attachment by replaying the download button's form
    /// submit with the captured view state, using either the cookie
    /// captured at detail-fetch time or a caller-supplied one.
    pub async fn download(
        &self,
        attachment: &Attachment,
        override_cookie: Option<&str>,
    ) -> Result<DownloadedFile> {
        let params = &attachment.download;
        let query = vec![
            (
                format!("form1:htmlFileTable:{}:_id3.x", params.row_index),
                "0".to_owned(),
            ),
            (
                format!("form1:htmlFileTable:{}:_id3.y", params.row_index),
                "0".to_owned(),
            ),
            ("form1:htmlParentFormId".to_owned(), String::new()),
            ("form1:htmlDelMark".to_owned(), String::new()),
            ("form1:htmlRowKeep".to_owned(), String::new()),
            (
                VIEW_STATE_ID.to_owned(),
                params.view_state.as_str().to_owned(),
            ),
            ("form1".to_owned(), "form1".to_owned()),
        ];

        let cookie = override_cookie
            .map(str::to_owned)
            .or_else(|| params.cookie.clone());
        let response = self
            .client
            .executor()
            .get_with_query(DETAIL_PAGE_PATH, &query, cookie.as_deref())
            .await?;

        Ok(DownloadedFile {
            content_disposition: response.content_disposition.clone(),
            bytes: response.into_bytes(),
        })
    }

    /// Count of unread bulletins for the current user.
    pub async fn unread_count(&self) -> Result<i64> {
        let call = ServiceCall::service(UNREAD_COUNT_SERVICE).data(json!({}));
        let body = self.client.call_json(&call).await?;
        crate::api::call::check_auth_result(&body)?;

        body.get("keijiCnt")
            .and_then(serde_json::Value::as_i64)
            .ok_or_else(|| Error::parse("unread count response missing keijiCnt"))
    }
}
