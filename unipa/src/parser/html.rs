//! HTML document access for JSF-rendered portal pages.

use scraper::{ElementRef, Html, Selector};

use crate::error::{Error, Result};
use crate::models::ViewState;

/// Id of the hidden input carrying the server-side view state.
pub const VIEW_STATE_ID: &str = "com.sun.faces.VIEW";

/// Wrapper around a parsed HTML document providing id-based access.
///
/// JSF element ids contain `:` and `.` (`form1:htmlParentTable:0:...`),
/// which `#id` CSS selectors cannot express, so every lookup goes
/// through an attribute-equality selector instead.
pub struct HtmlDocument {
    html: Html,
}

impl HtmlDocument {
    /// Parse HTML text into a document.
    pub fn parse(text: &str) -> Self {
        Self {
            html: Html::parse_document(text),
        }
    }

    /// Look up an element by its exact id attribute.
    pub fn by_id(&self, id: &str) -> Option<ElementRef<'_>> {
        let selector = Selector::parse(&format!(r#"[id="{}"]"#, id)).ok()?;
        self.html.select(&selector).next()
    }

    /// Whether an element with the given id exists.
    pub fn has_id(&self, id: &str) -> bool {
        self.by_id(id).is_some()
    }

    /// Trimmed text content of the element with the given id.
    pub fn text_by_id(&self, id: &str) -> Option<String> {
        self.by_id(id).map(element_text)
    }

    /// Attribute value of the element with the given id.
    pub fn attr_by_id(&self, id: &str, attr: &str) -> Option<String> {
        self.by_id(id)
            .and_then(|el| el.value().attr(attr))
            .map(str::to_owned)
    }

    /// Inner HTML of the element with the given id.
    pub fn inner_html_by_id(&self, id: &str) -> Option<String> {
        self.by_id(id).map(|el| el.inner_html())
    }

    /// Extract the view state token required for any form postback
    /// continuing this page's interaction.
    pub fn view_state(&self) -> Result<ViewState> {
        self.attr_by_id(VIEW_STATE_ID, "value")
            .filter(|v| !v.is_empty())
            .map(ViewState::new)
            .ok_or_else(|| Error::parse("expected server-side view state token"))
    }
}

/// Concatenated text content of an element, trimmed.
pub fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PAGE: &str = r#"<html><body><form id="form1">
        <input type="hidden" id="com.sun.faces.VIEW" value="j_id42:j_id43" />
        <span id="form1:htmlParentTable:0:htmlHeaderTbl:0:htmlHeaderCol"> 授業 </span>
        <a id="form1:link" title="掲示タイトル">link</a>
    </form></body></html>"#;

    #[test]
    fn test_by_id_handles_jsf_ids() {
        let doc = HtmlDocument::parse(PAGE);
        assert!(doc.has_id("form1:htmlParentTable:0:htmlHeaderTbl:0:htmlHeaderCol"));
        assert!(!doc.has_id("form1:htmlParentTable:1:htmlHeaderTbl:0:htmlHeaderCol"));
    }

    #[test]
    fn test_text_is_trimmed() {
        let doc = HtmlDocument::parse(PAGE);
        assert_eq!(
            doc.text_by_id("form1:htmlParentTable:0:htmlHeaderTbl:0:htmlHeaderCol"),
            Some("授業".to_owned())
        );
    }

    #[test]
    fn test_attr_lookup() {
        let doc = HtmlDocument::parse(PAGE);
        assert_eq!(
            doc.attr_by_id("form1:link", "title"),
            Some("掲示タイトル".to_owned())
        );
        assert_eq!(doc.attr_by_id("form1:link", "href"), None);
    }

    #[test]
    fn test_view_state_extraction() {
        let doc = HtmlDocument::parse(PAGE);
        assert_eq!(doc.view_state().unwrap().as_str(), "j_id42:j_id43");
    }

    #[test]
    fn test_missing_view_state_is_fatal() {
        let doc = HtmlDocument::parse("<html><body></body></html>");
        let err = doc.view_state().unwrap_err();
        assert!(err.is_parse_error());
        assert!(format!("{}", err).contains("view state"));
    }

    #[test]
    fn test_empty_view_state_is_fatal() {
        let doc = HtmlDocument::parse(
            r#"<input type="hidden" id="com.sun.faces.VIEW" value="" />"#,
        );
        assert!(doc.view_state().is_err());
    }
}
