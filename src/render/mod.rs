//! Report rendering.
//!
//! Turns the semi-structured report text delivered with the final report
//! event into a [`ReportDocument`]:
//!
//! - [`block`]: splits on blank lines and classifies headings, bullet lists
//!   and paragraphs
//! - [`inline`]: strong and regular emphasis inside each block
//! - [`html`]: escaping serializer for documents
//!
//! Both rendering steps are pure functions.

pub mod block;
pub mod html;
pub mod inline;

mod proptest;

pub use block::{render, Block, ReportDocument, BLOCK_SEPARATOR};
pub use html::{document_to_html, escape_html, report_page};
pub use inline::{format as format_inline, InlineText, Span, SpanStyle};
