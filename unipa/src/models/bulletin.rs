//! Bulletin board models.

use chrono::NaiveDate;
use serde::Serialize;

/// Opaque view state token extracted from a rendered page.
///
/// The token is the capability for any form postback continuing that
/// page's server-side interaction (pagination, file download). It is
/// valid only for the session and the specific rendered page it came
/// from, so it is threaded through a single flow invocation and never
/// stored on the long-lived session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState(String);

impl ViewState {
    /// Wrap a raw token value.
    pub fn new(token: impl Into<String>) -> Self {
        ViewState(token.into())
    }

    /// Get the raw token value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One category block of the bulletin board.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BulletinCategory {
    /// Category heading.
    pub title: Option<String>,
    /// Server-reported bulletin count for the category. May exceed
    /// `items.len()` when the expanded listing was not requested.
    pub total_count: u32,
    /// Bulletins in display order.
    pub items: Vec<BulletinSummary>,
}

/// One row of a bulletin listing.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BulletinSummary {
    /// Not yet read. Inferred from the absence of the read marker.
    pub unread: bool,
    /// Flagged important. Inferred from the absence of the
    /// not-important marker.
    pub important: bool,
    /// Bulletin title.
    pub title: Option<String>,
    /// Sender display name.
    pub sender: Option<String>,
    /// Posting date.
    pub posted_date: Option<NaiveDate>,
}

/// A bulletin opened through its detail page.
#[derive(Debug, Clone, Default)]
pub struct BulletinDetail {
    /// Subject line.
    pub title: Option<String>,
    /// Sender display name.
    pub sender: Option<String>,
    /// Message body as rendered HTML.
    pub body_html: Option<String>,
    /// Attached files in display order.
    pub attachments: Vec<Attachment>,
}

/// An attachment row of a bulletin detail page.
#[derive(Debug, Clone)]
pub struct Attachment {
    /// File name as displayed.
    pub name: String,
    /// File size as displayed (not normalized to bytes).
    pub size: String,
    /// State captured at detail-fetch time, needed to download later.
    pub download: DownloadParams,
}

/// The state a download postback needs, captured when the detail page
/// was parsed.
///
/// The cookie is a snapshot, not a live reference: it does not track
/// later session renewals unless the caller supplies a fresh cookie at
/// download time. The pair stays valid only as long as the server keeps
/// the page's view state alive.
#[derive(Debug, Clone)]
pub struct DownloadParams {
    /// View state of the owning detail page.
    pub view_state: ViewState,
    /// Session cookie as of detail-fetch time.
    pub cookie: Option<String>,
    /// Zero-based row index inside the attachment table.
    pub row_index: usize,
}

/// A downloaded attachment body.
#[derive(Debug, Clone)]
pub struct DownloadedFile {
    /// Raw `Content-Disposition` header. The file name inside is
    /// MIME-encoded; decoding it is the consumer's concern.
    pub content_disposition: Option<String>,
    /// File content.
    pub bytes: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_state_is_opaque_value() {
        let vs = ViewState::new("j_id42:j_id43");
        assert_eq!(vs.as_str(), "j_id42:j_id43");
        assert_eq!(vs, ViewState::new("j_id42:j_id43"));
    }

    #[test]
    fn test_category_item_count_independent_of_total() {
        let category = BulletinCategory {
            title: Some("授業".into()),
            total_count: 12,
            items: vec![BulletinSummary::default()],
        };
        assert_eq!(category.items.len(), 1);
        assert_eq!(category.total_count, 12);
    }
}
