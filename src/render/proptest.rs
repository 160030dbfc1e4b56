//! Property-based tests for report rendering.
//!
//! - Rendering is deterministic
//! - Inline formatting never adds or loses non-delimiter characters
//! - Text without stars is never styled
//! - Block count follows the separator count

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::render::html::document_to_html;
    use crate::render::{format_inline, render, Block, BLOCK_SEPARATOR};

    // Report-like text: a small alphabet heavy on the characters that matter.
    fn report_text() -> impl Strategy<Value = String> {
        proptest::collection::vec(
            prop_oneof![
                Just("#".to_string()),
                Just("- ".to_string()),
                Just("*".to_string()),
                Just("**".to_string()),
                Just("\n".to_string()),
                Just("\n\n".to_string()),
                Just(" ".to_string()),
                Just("<".to_string()),
                "[a-z]{1,6}",
            ],
            0..40,
        )
        .prop_map(|parts| parts.concat())
    }

    proptest! {
        /// Same input, same document.
        #[test]
        fn render_is_deterministic(text in report_text()) {
            prop_assert_eq!(render(&text), render(&text));
        }

        /// Removing stars from input and output gives the same text.
        #[test]
        fn inline_preserves_non_star_characters(text in report_text()) {
            let formatted = format_inline(&text).to_plain();
            let strip = |s: &str| s.chars().filter(|c| *c != '*').collect::<String>();
            prop_assert_eq!(strip(&formatted), strip(&text));
        }

        /// Text without stars is returned as a single plain span.
        #[test]
        fn text_without_stars_is_plain(text in "[a-z <>&\n-]{1,60}") {
            let formatted = format_inline(&text);
            prop_assert_eq!(formatted.spans().len(), 1);
            prop_assert!(formatted.spans()[0].style.is_plain());
            prop_assert_eq!(formatted.to_plain(), text);
        }

        /// One block per separator-delimited chunk.
        #[test]
        fn block_count_matches_chunks(text in report_text()) {
            let doc = render(&text);
            prop_assert_eq!(doc.len(), text.split(BLOCK_SEPARATOR).count());
        }

        /// Heading levels stay within 1..=3.
        #[test]
        fn heading_levels_in_range(text in report_text()) {
            for block in render(&text).iter() {
                if let Block::Heading { level, .. } = block {
                    prop_assert!((1..=3).contains(level));
                }
            }
        }

        /// Raw angle brackets never survive into HTML output.
        #[test]
        fn html_never_contains_raw_input_tags(text in report_text()) {
            let html = document_to_html(&render(&text));
            let stripped = html
                .replace("<h1>", "").replace("</h1>", "")
                .replace("<h2>", "").replace("</h2>", "")
                .replace("<h3>", "").replace("</h3>", "")
                .replace("<ul>", "").replace("</ul>", "")
                .replace("<li>", "").replace("</li>", "")
                .replace("<p>", "").replace("</p>", "")
                .replace("<strong>", "").replace("</strong>", "")
                .replace("<em>", "").replace("</em>", "");
            prop_assert!(!stripped.contains('<'));
        }
    }
}
