//! Parsers for portal pages.

pub mod bulletin;
pub mod html;

pub use bulletin::{
    extract_date, extract_summary, is_marker_absent, parse_total_count, InlineRow,
    PaginatedRow, SummaryRow,
};
pub use html::HtmlDocument;
