//! Extraction of the bulletin board pages.
//!
//! The portal renders the board as JSF tables whose cells carry
//! hierarchical ids. Two distinct id schemes exist: the summary page
//! rows (`htmlDetailTbl`, keyed by category and row) and the paginated
//! "show more" rows (`htmlDetailTbl2`, category pinned to 0). Both map
//! onto [`BulletinSummary`] through the [`SummaryRow`] id template, so
//! the id formatting lives here and nowhere else.

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;

use super::html::HtmlDocument;
use crate::error::{Error, Result};
use crate::models::{
    Attachment, BulletinDetail, BulletinSummary, DownloadParams,
};

/// Id of the table holding every category block on the summary page.
pub const PARENT_TABLE_ID: &str = "form1:htmlParentTable";

/// Id of the content region of the detail page.
pub const MAIN_REGION_ID: &str = "main";

const DETAIL_TITLE_ID: &str = "form1:htmlTitle";
const DETAIL_FROM_ID: &str = "form1:htmlFrom";
const DETAIL_BODY_ID: &str = "form1:htmlMain";
const FILE_TABLE_ID: &str = "form1:htmlFileTable";

lazy_static! {
    /// Localized bulletin count phrase, e.g. `全12件`.
    static ref COUNT_RE: Regex = Regex::new(r"全(\d*)件").unwrap();
    /// Bracketed posting date, e.g. `[2024/04/01]`.
    static ref DATE_RE: Regex = Regex::new(r"\[(\d{4}/\d{2}/\d{2})\]").unwrap();
}

/// Id templates for the cells of one bulletin row.
///
/// The unread/important cells use inverted presence: the marker element
/// exists for rows that are already read / not important.
pub trait SummaryRow {
    fn unread_marker_id(&self) -> String;
    fn important_marker_id(&self) -> String;
    fn title_id(&self) -> String;
    fn sender_id(&self) -> String;
    fn date_id(&self) -> String;

    /// Whether any cell of this row exists in the document. Index-based
    /// lookups returning nothing mean end of sequence, so this is the
    /// loop bound when walking rows.
    fn exists_in(&self, doc: &HtmlDocument) -> bool {
        doc.has_id(&self.title_id())
            || doc.has_id(&self.sender_id())
            || doc.has_id(&self.date_id())
            || doc.has_id(&self.unread_marker_id())
            || doc.has_id(&self.important_marker_id())
    }
}

/// A row of the inline per-category table on the summary page.
pub struct InlineRow {
    pub category: usize,
    pub row: usize,
}

impl SummaryRow for InlineRow {
    fn unread_marker_id(&self) -> String {
        format!(
            "form1:htmlParentTable:{}:htmlDetailTbl:{}:htmlMidokul",
            self.category, self.row
        )
    }

    fn important_marker_id(&self) -> String {
        format!(
            "form1:htmlParentTable:{}:htmlDetailTbl:{}:htmlJuyo",
            self.category, self.row
        )
    }

    fn title_id(&self) -> String {
        format!(
            "form1:htmlParentTable:{}:htmlDetailTbl:{}:htmlTitleCol1",
            self.category, self.row
        )
    }

    fn sender_id(&self) -> String {
        format!(
            "form1:htmlParentTable:{}:htmlDetailTbl:{}:htmlFromCol1",
            self.category, self.row
        )
    }

    fn date_id(&self) -> String {
        format!(
            "form1:htmlParentTable:{}:htmlDetailTbl:{}:htmlFromCol2",
            self.category, self.row
        )
    }
}

/// A row of the paginated table reached through "show more". The server
/// renders that view with the category index pinned to 0.
pub struct PaginatedRow {
    pub row: usize,
}

impl SummaryRow for PaginatedRow {
    fn unread_marker_id(&self) -> String {
        format!(
            "form1:htmlParentTable:0:htmlDetailTbl2:{}:htmlMidokul2",
            self.row
        )
    }

    fn important_marker_id(&self) -> String {
        format!(
            "form1:htmlParentTable:0:htmlDetailTbl2:{}:htmlJuyo2",
            self.row
        )
    }

    fn title_id(&self) -> String {
        format!(
            "form1:htmlParentTable:0:htmlDetailTbl2:{}:htmlTitleCol3",
            self.row
        )
    }

    fn sender_id(&self) -> String {
        format!(
            "form1:htmlParentTable:0:htmlDetailTbl2:{}:htmlFromCol3",
            self.row
        )
    }

    fn date_id(&self) -> String {
        format!(
            "form1:htmlParentTable:0:htmlDetailTbl2:{}:htmlFromCol4",
            self.row
        )
    }
}

fn header_id(category: usize) -> String {
    format!(
        "form1:htmlParentTable:{}:htmlHeaderTbl:0:htmlHeaderCol",
        category
    )
}

fn count_id(category: usize) -> String {
    format!(
        "form1:htmlParentTable:{}:htmlDisplayOfAll:0:htmlCountCol21702",
        category
    )
}

fn show_more_link_id(category: usize) -> String {
    format!(
        "form1:htmlParentTable:{}:htmlDisplayOfAll:0:allInfoLink",
        category
    )
}

/// Form field name that triggers the "show more" postback for a
/// category.
pub fn show_more_command_field(category: usize) -> String {
    format!(
        "form1:htmlParentTable:{}:htmlDisplayOfAll:0:allInfoLinkCommand",
        category
    )
}

fn file_name_id(row: usize) -> String {
    format!("{}:{}:labelFileName", FILE_TABLE_ID, row)
}

fn file_size_id(row: usize) -> String {
    format!("{}:{}:labelFileSize", FILE_TABLE_ID, row)
}

/// Inverted-presence predicate: the flag a marker encodes is true when
/// the marker element is absent.
pub fn is_marker_absent(doc: &HtmlDocument, id: &str) -> bool {
    !doc.has_id(id)
}

/// Parse the `全N件` count phrase. A missing or non-matching cell means
/// count 0, not an error.
pub fn parse_total_count(text: Option<&str>) -> u32 {
    text.and_then(|t| COUNT_RE.captures(t))
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

/// Extract the bracketed `[YYYY/MM/DD]` posting date.
pub fn extract_date(text: &str) -> Option<NaiveDate> {
    DATE_RE
        .captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| NaiveDate::parse_from_str(m.as_str(), "%Y/%m/%d").ok())
}

/// Drop the first double-space artifact the portal renders inside the
/// sender cell. Only the first occurrence is an artifact.
fn strip_sender_artifact(s: &str) -> String {
    s.replacen("  ", "", 1)
}

/// Extract one bulletin row. Returns None when the title cell is
/// missing, which marks a filler row (e.g. the "0件です。" placeholder)
/// to be skipped, not an error.
pub fn extract_summary<R: SummaryRow>(doc: &HtmlDocument, row: &R) -> Option<BulletinSummary> {
    let title = doc.attr_by_id(&row.title_id(), "title")?;
    Some(BulletinSummary {
        unread: is_marker_absent(doc, &row.unread_marker_id()),
        important: is_marker_absent(doc, &row.important_marker_id()),
        title: Some(title),
        sender: doc
            .text_by_id(&row.sender_id())
            .map(|s| strip_sender_artifact(&s)),
        posted_date: doc
            .text_by_id(&row.date_id())
            .as_deref()
            .and_then(extract_date),
    })
}

fn collect_rows<R, F>(doc: &HtmlDocument, make: F) -> Vec<BulletinSummary>
where
    R: SummaryRow,
    F: Fn(usize) -> R,
{
    let mut items = Vec::new();
    for row in 0.. {
        let ids = make(row);
        if !ids.exists_in(doc) {
            break;
        }
        if let Some(item) = extract_summary(doc, &ids) {
            items.push(item);
        }
    }
    items
}

/// Collect the inline rows of one category on the summary page.
pub fn parse_inline_rows(doc: &HtmlDocument, category: usize) -> Vec<BulletinSummary> {
    collect_rows(doc, |row| InlineRow { category, row })
}

/// Collect the rows of the paginated "show more" view. Only the page as
/// rendered; deeper pages are not followed.
pub fn parse_paginated_rows(doc: &HtmlDocument) -> Vec<BulletinSummary> {
    collect_rows(doc, |row| PaginatedRow { row })
}

/// Category cells read from the summary page before item resolution.
#[derive(Debug, Clone)]
pub struct CategoryHeader {
    /// Position within the parent table.
    pub index: usize,
    /// Category heading.
    pub title: Option<String>,
    /// Count parsed from the localized count phrase.
    pub total_count: u32,
    /// Whether a "show more" link is rendered for the category.
    pub has_more: bool,
}

/// Walk the fixed-index sequence of category containers on the summary
/// page. The first index with no category cells at all terminates the
/// walk; a page without the parent table is a fatal parse failure.
pub fn parse_category_headers(doc: &HtmlDocument) -> Result<Vec<CategoryHeader>> {
    if doc.by_id(PARENT_TABLE_ID).is_none() {
        return Err(Error::parse("bulletin summary table missing"));
    }

    let mut headers = Vec::new();
    for index in 0.. {
        let title = doc.text_by_id(&header_id(index));
        let count_cell = doc.text_by_id(&count_id(index));
        let has_more = doc.has_id(&show_more_link_id(index));
        let has_rows = InlineRow {
            category: index,
            row: 0,
        }
        .exists_in(doc);

        if title.is_none() && count_cell.is_none() && !has_more && !has_rows {
            break;
        }

        headers.push(CategoryHeader {
            index,
            title,
            total_count: parse_total_count(count_cell.as_deref()),
            has_more,
        });
    }
    Ok(headers)
}

/// Parse the bulletin detail page.
///
/// The `main` content region is the fatal precondition. A page without
/// an attachment table yields an empty attachment list; when the table
/// exists, each row captures the page's view state and the given cookie
/// snapshot so the file can be fetched later.
pub fn parse_detail_page(doc: &HtmlDocument, cookie: Option<&str>) -> Result<BulletinDetail> {
    if doc.by_id(MAIN_REGION_ID).is_none() {
        return Err(Error::parse("bulletin detail content region missing"));
    }

    let mut attachments = Vec::new();
    if doc.has_id(FILE_TABLE_ID) {
        // The download postback needs the token, so its absence is fatal
        // only on pages that actually list files.
        let view_state = doc.view_state()?;
        for row in 0.. {
            let Some(name) = doc.text_by_id(&file_name_id(row)) else {
                break;
            };
            attachments.push(Attachment {
                name,
                size: doc.text_by_id(&file_size_id(row)).unwrap_or_default(),
                download: DownloadParams {
                    view_state: view_state.clone(),
                    cookie: cookie.map(str::to_owned),
                    row_index: row,
                },
            });
        }
    }

    Ok(BulletinDetail {
        title: doc.text_by_id(DETAIL_TITLE_ID),
        sender: doc.text_by_id(DETAIL_FROM_ID),
        body_html: doc.inner_html_by_id(DETAIL_BODY_ID),
        attachments,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Summary page: category 0 ("授業") with two inline rows and a
    /// "show more" link, category 1 ("学生呼出") with no rows.
    const SUMMARY_PAGE: &str = r#"<html><body><form id="form1">
      <input type="hidden" id="com.sun.faces.VIEW" value="j_id99:j_id100" />
      <table id="form1:htmlParentTable"><tbody><tr><td>
        <span id="form1:htmlParentTable:0:htmlHeaderTbl:0:htmlHeaderCol">授業</span>
        <span id="form1:htmlParentTable:0:htmlDisplayOfAll:0:htmlCountCol21702">全12件</span>
        <a id="form1:htmlParentTable:0:htmlDisplayOfAll:0:allInfoLink">もっと見る</a>
        <table id="form1:htmlParentTable:0:htmlDetailTbl"><tbody>
          <tr>
            <td><span id="form1:htmlParentTable:0:htmlDetailTbl:0:htmlMidokul">既読</span></td>
            <td><a id="form1:htmlParentTable:0:htmlDetailTbl:0:htmlTitleCol1" title="休講のお知らせ">休講のお知らせ</a></td>
            <td><span id="form1:htmlParentTable:0:htmlDetailTbl:0:htmlFromCol1">教務課  担当</span></td>
            <td><span id="form1:htmlParentTable:0:htmlDetailTbl:0:htmlFromCol2">[2024/04/01]</span></td>
          </tr>
          <tr>
            <td><span id="form1:htmlParentTable:0:htmlDetailTbl:1:htmlJuyo">通常</span></td>
            <td><a id="form1:htmlParentTable:0:htmlDetailTbl:1:htmlTitleCol1" title="レポート提出">レポート提出</a></td>
            <td><span id="form1:htmlParentTable:0:htmlDetailTbl:1:htmlFromCol1">山田  太郎</span></td>
            <td><span id="form1:htmlParentTable:0:htmlDetailTbl:1:htmlFromCol2">[2024/04/02]</span></td>
          </tr>
        </tbody></table>
      </td></tr><tr><td>
        <span id="form1:htmlParentTable:1:htmlHeaderTbl:0:htmlHeaderCol">学生呼出</span>
        <span id="form1:htmlParentTable:1:htmlDisplayOfAll:0:htmlCountCol21702">全0件</span>
      </td></tr></tbody></table>
    </form></body></html>"#;

    /// Paginated view: htmlDetailTbl2 scheme, category pinned to 0.
    const PAGINATED_PAGE: &str = r#"<html><body><form id="form1">
      <input type="hidden" id="com.sun.faces.VIEW" value="j_id200:j_id201" />
      <table id="form1:htmlParentTable:0:htmlDetailTbl2"><tbody>
        <tr>
          <td><a id="form1:htmlParentTable:0:htmlDetailTbl2:0:htmlTitleCol3" title="補講について">補講について</a></td>
          <td><span id="form1:htmlParentTable:0:htmlDetailTbl2:0:htmlFromCol3">教務課  担当</span></td>
          <td><span id="form1:htmlParentTable:0:htmlDetailTbl2:0:htmlFromCol4">[2024/05/10]</span></td>
        </tr>
        <tr>
          <td><span id="form1:htmlParentTable:0:htmlDetailTbl2:1:htmlMidokul2">既読</span></td>
          <td><span id="form1:htmlParentTable:0:htmlDetailTbl2:1:htmlJuyo2">通常</span></td>
          <td><a id="form1:htmlParentTable:0:htmlDetailTbl2:1:htmlTitleCol3" title="教室変更">教室変更</a></td>
          <td><span id="form1:htmlParentTable:0:htmlDetailTbl2:1:htmlFromCol3">学生課</span></td>
          <td><span id="form1:htmlParentTable:0:htmlDetailTbl2:1:htmlFromCol4">[2024/05/11]</span></td>
        </tr>
      </tbody></table>
    </form></body></html>"#;

    const DETAIL_PAGE: &str = r#"<html><body><div id="main">
      <form id="form1">
        <input type="hidden" id="com.sun.faces.VIEW" value="j_id300:j_id301" />
        <span id="form1:htmlTitle">休講のお知らせ</span>
        <span id="form1:htmlFrom">教務課</span>
        <div id="form1:htmlMain"><p>明日の講義は<b>休講</b>です。</p></div>
        <table id="form1:htmlFileTable"><tbody>
          <tr>
            <td><span id="form1:htmlFileTable:0:labelFileName">shiryo.pdf</span></td>
            <td><span id="form1:htmlFileTable:0:labelFileSize">214KB</span></td>
          </tr>
          <tr>
            <td><span id="form1:htmlFileTable:1:labelFileName">yoko.docx</span></td>
            <td><span id="form1:htmlFileTable:1:labelFileSize">32KB</span></td>
          </tr>
        </tbody></table>
      </form>
    </div></body></html>"#;

    #[test]
    fn test_count_phrase() {
        assert_eq!(parse_total_count(Some("全12件")), 12);
        assert_eq!(parse_total_count(Some("全0件")), 0);
        assert_eq!(parse_total_count(Some("該当なし")), 0);
        assert_eq!(parse_total_count(Some("全件")), 0);
        assert_eq!(parse_total_count(None), 0);
    }

    #[test]
    fn test_date_extraction() {
        assert_eq!(
            extract_date("[2024/04/01]"),
            NaiveDate::from_ymd_opt(2024, 4, 1)
        );
        assert_eq!(extract_date("2024/04/01"), None);
        assert_eq!(extract_date("[2024/4/1]"), None);
    }

    #[test]
    fn test_sender_artifact_strip() {
        assert_eq!(strip_sender_artifact("山田  太郎"), "山田太郎");
        // only the first double space is the artifact
        assert_eq!(strip_sender_artifact("a  b  c"), "ab  c");
        assert_eq!(strip_sender_artifact("plain"), "plain");
    }

    #[test]
    fn test_category_walk() {
        let doc = HtmlDocument::parse(SUMMARY_PAGE);
        let headers = parse_category_headers(&doc).unwrap();
        assert_eq!(headers.len(), 2);
        assert_eq!(headers[0].title.as_deref(), Some("授業"));
        assert_eq!(headers[0].total_count, 12);
        assert!(headers[0].has_more);
        assert_eq!(headers[1].title.as_deref(), Some("学生呼出"));
        assert_eq!(headers[1].total_count, 0);
        assert!(!headers[1].has_more);
    }

    #[test]
    fn test_missing_parent_table_is_fatal() {
        let doc = HtmlDocument::parse("<html><body></body></html>");
        assert!(parse_category_headers(&doc).unwrap_err().is_parse_error());
    }

    #[test]
    fn test_inline_rows_and_inverted_presence() {
        let doc = HtmlDocument::parse(SUMMARY_PAGE);
        let items = parse_inline_rows(&doc, 0);
        assert_eq!(items.len(), 2);

        // row 0 has the read marker and no importance marker
        assert!(!items[0].unread);
        assert!(items[0].important);
        assert_eq!(items[0].title.as_deref(), Some("休講のお知らせ"));
        assert_eq!(items[0].sender.as_deref(), Some("教務課担当"));
        assert_eq!(
            items[0].posted_date,
            NaiveDate::from_ymd_opt(2024, 4, 1)
        );

        // row 1 has the not-important marker and no read marker
        assert!(items[1].unread);
        assert!(!items[1].important);

        // category 1 renders no rows at all
        assert!(parse_inline_rows(&doc, 1).is_empty());
    }

    #[test]
    fn test_row_without_title_is_skipped() {
        let page = r#"<table id="form1:htmlParentTable"><tbody><tr><td>
          <a id="form1:htmlParentTable:0:htmlDetailTbl:0:htmlTitleCol1" title="本物">本物</a>
          <span id="form1:htmlParentTable:0:htmlDetailTbl:1:htmlFromCol1">０件です。</span>
          <a id="form1:htmlParentTable:0:htmlDetailTbl:2:htmlTitleCol1" title="続き">続き</a>
        </td></tr></tbody></table>"#;
        let doc = HtmlDocument::parse(page);
        let items = parse_inline_rows(&doc, 0);
        // the filler row terminates nothing but contributes no item
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title.as_deref(), Some("本物"));
        assert_eq!(items[1].title.as_deref(), Some("続き"));
    }

    #[test]
    fn test_paginated_rows() {
        let doc = HtmlDocument::parse(PAGINATED_PAGE);
        let items = parse_paginated_rows(&doc);
        assert_eq!(items.len(), 2);
        assert!(items[0].unread);
        assert!(items[0].important);
        assert_eq!(items[0].title.as_deref(), Some("補講について"));
        assert_eq!(items[0].sender.as_deref(), Some("教務課担当"));
        assert!(!items[1].unread);
        assert!(!items[1].important);
        assert_eq!(
            items[1].posted_date,
            NaiveDate::from_ymd_opt(2024, 5, 11)
        );
    }

    #[test]
    fn test_detail_page() {
        let doc = HtmlDocument::parse(DETAIL_PAGE);
        let detail = parse_detail_page(&doc, Some("JSESSIONID=abc:-1;")).unwrap();
        assert_eq!(detail.title.as_deref(), Some("休講のお知らせ"));
        assert_eq!(detail.sender.as_deref(), Some("教務課"));
        assert!(detail.body_html.unwrap().contains("<b>休講</b>"));

        assert_eq!(detail.attachments.len(), 2);
        let first = &detail.attachments[0];
        assert_eq!(first.name, "shiryo.pdf");
        assert_eq!(first.size, "214KB");
        assert_eq!(first.download.view_state.as_str(), "j_id300:j_id301");
        assert_eq!(first.download.cookie.as_deref(), Some("JSESSIONID=abc:-1;"));
        assert_eq!(first.download.row_index, 0);
        assert_eq!(detail.attachments[1].download.row_index, 1);
    }

    #[test]
    fn test_detail_without_main_region_is_fatal() {
        let doc = HtmlDocument::parse("<html><body><div id='other'></div></body></html>");
        assert!(parse_detail_page(&doc, None).unwrap_err().is_parse_error());
    }

    #[test]
    fn test_detail_without_file_table_has_no_attachments() {
        let page = r#"<div id="main"><form id="form1">
          <span id="form1:htmlTitle">題名のみ</span>
        </form></div>"#;
        let doc = HtmlDocument::parse(page);
        let detail = parse_detail_page(&doc, None).unwrap();
        assert!(detail.attachments.is_empty());
        assert_eq!(detail.title.as_deref(), Some("題名のみ"));
        assert_eq!(detail.body_html, None);
    }

    #[test]
    fn test_detail_with_file_table_but_no_view_state_is_fatal() {
        let page = r#"<div id="main"><form id="form1">
          <table id="form1:htmlFileTable"><tbody><tr>
            <td><span id="form1:htmlFileTable:0:labelFileName">a.pdf</span></td>
          </tr></tbody></table>
        </form></div>"#;
        let doc = HtmlDocument::parse(page);
        assert!(parse_detail_page(&doc, None).is_err());
    }
}
