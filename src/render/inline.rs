//! Inline emphasis formatting.
//!
//! Two ordered passes over the whole block text:
//!
//! 1. `**X**` becomes strong emphasis around `X`.
//! 2. `*X*` becomes regular emphasis around `X`, matched against the output
//!    of pass 1. Strong delimiters consumed by pass 1 are markup at that point
//!    and can no longer be matched, but the text inside a strong span can.
//!
//! Both passes take the leftmost, shortest non-empty match and never cross a
//! line break. Anything that does not match stays literal text. The result is
//! a flat list of styled [`Span`]s, so no character of the input is ever
//! interpreted as anything other than text or one of the two emphasis forms.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static STRONG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("invalid regex"));

const STRONG_DELIMITER_LEN: usize = 2;

// =============================================================================
// Styled Text
// =============================================================================

/// Emphasis flags carried by a span.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpanStyle {
    /// Inside a `**X**` match
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub strong: bool,
    /// Inside a `*X*` match
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub emphasis: bool,
}

impl SpanStyle {
    /// No emphasis.
    pub const PLAIN: Self = Self {
        strong: false,
        emphasis: false,
    };

    /// Strong emphasis only.
    pub const STRONG: Self = Self {
        strong: true,
        emphasis: false,
    };

    /// Regular emphasis only.
    pub const EMPHASIS: Self = Self {
        strong: false,
        emphasis: true,
    };

    /// Whether any emphasis applies.
    pub fn is_plain(&self) -> bool {
        !self.strong && !self.emphasis
    }
}

/// A run of literal text sharing one style.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub text: String,
    #[serde(default)]
    pub style: SpanStyle,
}

impl Span {
    /// Create a span.
    pub fn new(text: impl Into<String>, style: SpanStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    /// Create an unstyled span.
    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, SpanStyle::PLAIN)
    }

    /// Create a strong span.
    pub fn strong(text: impl Into<String>) -> Self {
        Self::new(text, SpanStyle::STRONG)
    }

    /// Create an emphasis span.
    pub fn emphasis(text: impl Into<String>) -> Self {
        Self::new(text, SpanStyle::EMPHASIS)
    }
}

/// Inline-formatted text: an ordered list of non-empty styled spans.
///
/// Adjacent spans never share a style; [`InlineText::push`] merges them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InlineText {
    spans: Vec<Span>,
}

impl InlineText {
    /// Create empty text.
    pub fn new() -> Self {
        Self::default()
    }

    /// Text with a single unstyled span (no formatting applied).
    pub fn plain(text: impl Into<String>) -> Self {
        let mut inline = Self::new();
        inline.push(text, SpanStyle::PLAIN);
        inline
    }

    /// Build from spans, merging neighbours and dropping empty ones.
    pub fn from_spans(spans: impl IntoIterator<Item = Span>) -> Self {
        let mut inline = Self::new();
        for span in spans {
            inline.push(span.text, span.style);
        }
        inline
    }

    /// Append text with the given style.
    pub fn push(&mut self, text: impl Into<String>, style: SpanStyle) {
        let text = text.into();
        if text.is_empty() {
            return;
        }
        match self.spans.last_mut() {
            Some(last) if last.style == style => last.text.push_str(&text),
            _ => self.spans.push(Span::new(text, style)),
        }
    }

    /// The spans in order.
    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    /// Whether there is no text at all.
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Concatenated text with all styling removed.
    pub fn to_plain(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }
}

impl std::fmt::Display for InlineText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for span in &self.spans {
            f.write_str(&span.text)?;
        }
        Ok(())
    }
}

// =============================================================================
// Formatting Passes
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Char(char),
    StrongOpen,
    StrongClose,
    EmphasisOpen,
    EmphasisClose,
}

/// Apply the strong and emphasis passes to `text`.
pub fn format(text: &str) -> InlineText {
    fold(emphasis_pass(strong_pass(text)))
}

fn strong_pass(text: &str) -> Vec<Token> {
    let mut tokens = Vec::with_capacity(text.len());
    let mut last = 0;

    for found in STRONG_PATTERN.find_iter(text) {
        tokens.extend(text[last..found.start()].chars().map(Token::Char));
        tokens.push(Token::StrongOpen);
        let inner = &text[found.start() + STRONG_DELIMITER_LEN..found.end() - STRONG_DELIMITER_LEN];
        tokens.extend(inner.chars().map(Token::Char));
        tokens.push(Token::StrongClose);
        last = found.end();
    }
    tokens.extend(text[last..].chars().map(Token::Char));

    tokens
}

fn emphasis_pass(mut tokens: Vec<Token>) -> Vec<Token> {
    let mut i = 0;
    while i < tokens.len() {
        if tokens[i] == Token::Char('*') {
            if let Some(close) = find_emphasis_close(&tokens, i) {
                tokens[i] = Token::EmphasisOpen;
                tokens[close] = Token::EmphasisClose;
                i = close + 1;
                continue;
            }
        }
        i += 1;
    }
    tokens
}

/// Index of the `*` closing an emphasis opened at `open`, if any.
///
/// The span between them must hold at least one token; markup left by the
/// strong pass counts, a line break ends the search.
fn find_emphasis_close(tokens: &[Token], open: usize) -> Option<usize> {
    for (offset, token) in tokens[open + 1..].iter().enumerate() {
        match token {
            Token::Char('\n') => return None,
            Token::Char('*') if offset > 0 => return Some(open + 1 + offset),
            _ => {}
        }
    }
    None
}

fn fold(tokens: Vec<Token>) -> InlineText {
    let mut inline = InlineText::new();
    let mut style = SpanStyle::PLAIN;
    let mut run = String::new();

    for token in tokens {
        if let Token::Char(c) = token {
            run.push(c);
            continue;
        }
        inline.push(std::mem::take(&mut run), style);
        match token {
            Token::StrongOpen => style.strong = true,
            Token::StrongClose => style.strong = false,
            Token::EmphasisOpen => style.emphasis = true,
            Token::EmphasisClose => style.emphasis = false,
            Token::Char(_) => {}
        }
    }
    inline.push(run, style);

    inline
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn both() -> SpanStyle {
        SpanStyle {
            strong: true,
            emphasis: true,
        }
    }

    #[test]
    fn test_strong_then_emphasis() {
        let formatted = format("**bold** and *em*");
        assert_eq!(
            formatted.spans(),
            &[
                Span::strong("bold"),
                Span::plain(" and "),
                Span::emphasis("em"),
            ]
        );
    }

    #[test]
    fn test_unmatched_single_star_is_literal() {
        assert_eq!(format("a * b").spans(), &[Span::plain("a * b")]);
    }

    #[test]
    fn test_unmatched_double_star_is_literal() {
        assert_eq!(format("a ** b").spans(), &[Span::plain("a ** b")]);
    }

    #[test]
    fn test_star_runs() {
        // No strong match: the span would be empty. The emphasis pass then
        // takes "***" with a lone star inside.
        assert_eq!(
            format("****").spans(),
            &[Span::emphasis("*"), Span::plain("*")]
        );
        assert_eq!(format("x ** y").to_plain(), "x ** y");
    }

    #[test]
    fn test_emphasis_nested_in_strong() {
        let formatted = format("**a *b* c**");
        assert_eq!(
            formatted.spans(),
            &[
                Span::strong("a "),
                Span::new("b", both()),
                Span::strong(" c"),
            ]
        );
    }

    #[test]
    fn test_strong_nested_in_emphasis() {
        let formatted = format("*a **b** c*");
        assert_eq!(
            formatted.spans(),
            &[
                Span::emphasis("a "),
                Span::new("b", both()),
                Span::emphasis(" c"),
            ]
        );
    }

    #[test]
    fn test_triple_star() {
        assert_eq!(format("***x***").spans(), &[Span::new("x", both())]);
    }

    #[test]
    fn test_overlapping_matches_stay_well_formed() {
        // Emphasis opens inside the strong span and closes after it.
        let formatted = format("**a *b** c*");
        assert_eq!(
            formatted.spans(),
            &[
                Span::strong("a "),
                Span::new("b", both()),
                Span::emphasis(" c"),
            ]
        );
    }

    #[test]
    fn test_shortest_match_wins() {
        let formatted = format("*a* b *c*");
        assert_eq!(
            formatted.spans(),
            &[Span::emphasis("a"), Span::plain(" b "), Span::emphasis("c")]
        );
    }

    #[test]
    fn test_matches_do_not_cross_lines() {
        assert_eq!(format("*a\nb*").spans(), &[Span::plain("*a\nb*")]);
        assert_eq!(format("**a\nb**").spans(), &[Span::plain("**a\nb**")]);
    }

    #[test]
    fn test_markup_characters_are_literal() {
        let formatted = format("<script>alert(1)</script> & **<b>**");
        assert_eq!(
            formatted.spans(),
            &[
                Span::plain("<script>alert(1)</script> & "),
                Span::strong("<b>"),
            ]
        );
    }

    #[test]
    fn test_push_merges_and_skips_empty() {
        let mut inline = InlineText::new();
        inline.push("a", SpanStyle::PLAIN);
        inline.push("", SpanStyle::STRONG);
        inline.push("b", SpanStyle::PLAIN);
        assert_eq!(inline.spans(), &[Span::plain("ab")]);
    }

    #[test]
    fn test_empty_input() {
        assert!(format("").is_empty());
    }

    #[test]
    fn test_serialization_omits_plain_flags() {
        let json = serde_json::to_string(&format("*x*")).unwrap();
        assert_eq!(json, r#"[{"text":"x","style":{"emphasis":true}}]"#);
    }
}
