//! HTML serialization of rendered reports.
//!
//! All span text is escaped; the only tags ever produced are the ones the
//! block and inline structure call for.

use super::block::{Block, ReportDocument};
use super::inline::{InlineText, SpanStyle};

/// Escape text for use in HTML content or attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Serialize inline text, one tag pair per styled span.
pub fn inline_to_html(text: &InlineText) -> String {
    let mut html = String::new();
    for span in text.spans() {
        let (open, close) = style_tags(span.style);
        html.push_str(open);
        html.push_str(&escape_html(&span.text));
        html.push_str(close);
    }
    html
}

fn style_tags(style: SpanStyle) -> (&'static str, &'static str) {
    match (style.strong, style.emphasis) {
        (true, true) => ("<strong><em>", "</em></strong>"),
        (true, false) => ("<strong>", "</strong>"),
        (false, true) => ("<em>", "</em>"),
        (false, false) => ("", ""),
    }
}

/// Serialize one block.
pub fn block_to_html(block: &Block) -> String {
    match block {
        Block::Heading { level, text } => {
            format!("<h{level}>{}</h{level}>", inline_to_html(text))
        }
        Block::BulletList { items } => {
            let mut html = String::from("<ul>");
            for item in items {
                html.push_str("<li>");
                html.push_str(&inline_to_html(item));
                html.push_str("</li>");
            }
            html.push_str("</ul>");
            html
        }
        Block::Paragraph { text } => format!("<p>{}</p>", inline_to_html(text)),
    }
}

/// Serialize a document as an HTML fragment, one block per line.
pub fn document_to_html(document: &ReportDocument) -> String {
    document
        .iter()
        .map(block_to_html)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Standalone HTML page with the title as `<title>` and a leading `<h1>`.
pub fn report_page(title: &str, document: &ReportDocument) -> String {
    let title = escape_html(title);
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n</head>\n<body>\n<article class=\"report\">\n<h1 class=\"report-title\">{title}</h1>\n{}\n</article>\n</body>\n</html>\n",
        document_to_html(document)
    )
}
