//! Mixed-content math segmenter
//!
//! Tutor replies interleave prose with TeX-style math, `$...$` for inline
//! expressions and `$$...$$` for display blocks. This module splits such a
//! string into an ordered sequence of typed segments so a renderer can map
//! each one to the right display call.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

// Block bodies may span line breaks, inline bodies may not. Both are
// minimal matches; an unterminated marker simply fails to match and the
// text stays literal.
static BLOCK_MATH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\$\$(.*?)\$\$").expect("block math pattern"));
static INLINE_MATH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$(.*?)\$").expect("inline math pattern"));

/// One contiguous unit of classified message content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Segment {
    /// Literal text, rendered verbatim with whitespace preserved
    PlainText { text: String },

    /// Expression found between single `$` markers, trimmed
    InlineMath { expr: String },

    /// Expression found between double `$$` markers, trimmed
    BlockMath { expr: String },
}

impl Segment {
    /// Create a plain text segment
    pub fn plain(text: impl Into<String>) -> Self {
        Self::PlainText { text: text.into() }
    }

    /// Create an inline math segment
    pub fn inline(expr: impl Into<String>) -> Self {
        Self::InlineMath { expr: expr.into() }
    }

    /// Create a block math segment
    pub fn block(expr: impl Into<String>) -> Self {
        Self::BlockMath { expr: expr.into() }
    }

    /// Get the payload regardless of kind
    pub fn payload(&self) -> &str {
        match self {
            Self::PlainText { text } => text,
            Self::InlineMath { expr } | Self::BlockMath { expr } => expr,
        }
    }

    pub fn is_math(&self) -> bool {
        !matches!(self, Self::PlainText { .. })
    }
}

/// Segment optional message content. Absent content yields no segments.
pub fn segment(content: Option<&str>) -> Vec<Segment> {
    match content {
        Some(text) => segment_str(text),
        None => Vec::new(),
    }
}

/// Split `content` into plain text and math segments.
///
/// Block regions are recognized first across the whole input; the leftover
/// spans are then scanned for inline regions, so a `$` inside `$$...$$`
/// never starts an inline match. Delimiters are consumed, math payloads are
/// trimmed, and zero-length plain segments are dropped. Unmatched
/// delimiters stay literal; the function cannot fail.
pub fn segment_str(content: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut tail = 0;

    for m in BLOCK_MATH.find_iter(content) {
        if m.start() > tail {
            split_inline(&content[tail..m.start()], &mut segments);
        }
        let body = &content[m.start() + 2..m.end() - 2];
        segments.push(Segment::block(body.trim()));
        tail = m.end();
    }
    if tail < content.len() {
        split_inline(&content[tail..], &mut segments);
    }

    segments
}

/// Split one block-free span into interleaved plain/inline segments.
fn split_inline(text: &str, segments: &mut Vec<Segment>) {
    let mut tail = 0;

    for m in INLINE_MATH.find_iter(text) {
        if m.start() > tail {
            segments.push(Segment::plain(&text[tail..m.start()]));
        }
        let body = &text[m.start() + 1..m.end() - 1];
        segments.push(Segment::inline(body.trim()));
        tail = m.end();
    }
    if tail < text.len() {
        segments.push(Segment::plain(&text[tail..]));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_and_empty_input() {
        assert!(segment(None).is_empty());
        assert!(segment(Some("")).is_empty());
        assert!(segment_str("").is_empty());
    }

    #[test]
    fn test_plain_text_passes_through() {
        let segments = segment_str("no math here,\njust text");
        assert_eq!(segments, vec![Segment::plain("no math here,\njust text")]);
    }

    #[test]
    fn test_block_math_with_surrounding_text() {
        let segments = segment_str("풀이: $$x^2+1=0$$ 입니다");
        assert_eq!(
            segments,
            vec![
                Segment::plain("풀이: "),
                Segment::block("x^2+1=0"),
                Segment::plain(" 입니다"),
            ]
        );
    }

    #[test]
    fn test_inline_math_with_surrounding_text() {
        let segments = segment_str("간단히 $a+b$ 이다");
        assert_eq!(
            segments,
            vec![
                Segment::plain("간단히 "),
                Segment::inline("a+b"),
                Segment::plain(" 이다"),
            ]
        );
    }

    #[test]
    fn test_unmatched_delimiter_stays_literal() {
        let segments = segment_str("가격은 $5 입니다");
        assert_eq!(segments, vec![Segment::plain("가격은 $5 입니다")]);
    }

    #[test]
    fn test_inline_never_fires_inside_block() {
        let segments = segment_str("$$x$y$z$$");
        assert_eq!(segments, vec![Segment::block("x$y$z")]);
    }

    #[test]
    fn test_payload_is_trimmed() {
        let segments = segment_str("$$  \n e^{i\\pi} = -1 \n  $$");
        assert_eq!(segments, vec![Segment::block("e^{i\\pi} = -1")]);

        let segments = segment_str("$ a+b $");
        assert_eq!(segments, vec![Segment::inline("a+b")]);
    }

    #[test]
    fn test_block_body_may_span_lines() {
        let segments = segment_str("before\n$$\na = b\nc = d\n$$\nafter");
        assert_eq!(
            segments,
            vec![
                Segment::plain("before\n"),
                Segment::block("a = b\nc = d"),
                Segment::plain("\nafter"),
            ]
        );
    }

    #[test]
    fn test_inline_body_does_not_span_lines() {
        // No closing marker on the same line, so both `$` stay literal.
        let segments = segment_str("a $b\nc$ d");
        assert_eq!(segments, vec![Segment::plain("a $b\nc$ d")]);
    }

    #[test]
    fn test_empty_math_bodies() {
        assert_eq!(segment_str("$$$$"), vec![Segment::block("")]);
        assert_eq!(segment_str("$$"), vec![Segment::inline("")]);
    }

    #[test]
    fn test_consecutive_math_without_intervening_text() {
        let segments = segment_str("$$a$$$$b$$");
        assert_eq!(segments, vec![Segment::block("a"), Segment::block("b")]);

        let segments = segment_str("$a$$b$");
        assert_eq!(segments, vec![Segment::inline("a"), Segment::inline("b")]);
    }

    #[test]
    fn test_mixed_block_and_inline() {
        let segments = segment_str("intro $a$ mid $$B$$ outro $c$");
        assert_eq!(
            segments,
            vec![
                Segment::plain("intro "),
                Segment::inline("a"),
                Segment::plain(" mid "),
                Segment::block("B"),
                Segment::plain(" outro "),
                Segment::inline("c"),
            ]
        );
    }

    #[test]
    fn test_no_leading_or_trailing_empty_plain_segments() {
        let segments = segment_str("$$x$$");
        assert_eq!(segments, vec![Segment::block("x")]);

        let segments = segment_str("$x$");
        assert_eq!(segments, vec![Segment::inline("x")]);
    }

    #[test]
    fn test_segmentation_is_idempotent() {
        let input = "a $b$ c $$d$$ e $f";
        assert_eq!(segment_str(input), segment_str(input));
    }

    #[test]
    fn test_malformed_expression_passes_through() {
        // Syntax inside the markers is not our concern.
        let segments = segment_str(r"$\frac{1}{$");
        assert_eq!(segments, vec![Segment::inline(r"\frac{1}{")]);
    }

    #[test]
    fn test_segment_serialization_shape() {
        let json = serde_json::to_value(Segment::inline("a+b")).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({"type": "inline_math", "expr": "a+b"})
        );
        let json = serde_json::to_value(Segment::plain("hi")).expect("serialize");
        assert_eq!(json, serde_json::json!({"type": "plain_text", "text": "hi"}));
    }
}
