//! aissam_render - Adapter from math segments to display output
//!
//! Segmentation lives in `aissam_core::mathtext`; this crate is the thin
//! layer that maps each segment kind to a typesetting call. The typesetter
//! sits behind a trait so the display backend is swappable, and a failure
//! while typesetting one expression never disturbs its sibling segments.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use aissam_core::mathtext::{segment, Segment};

/// How an expression should be typeset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    /// Within a line of surrounding text
    Inline,
    /// Standalone, on its own line
    Block,
}

#[derive(Debug, Error)]
#[error("typeset error: {0}")]
pub struct TypesetError(pub String);

/// The typesetting collaborator. Receives the trimmed expression string
/// and the display mode, nothing else.
pub trait MathTypesetter {
    fn typeset(&self, expr: &str, mode: DisplayMode) -> Result<String, TypesetError>;
}

/// One displayable unit of a rendered message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RenderedPart {
    /// Verbatim text, whitespace preserved
    Text { text: String },

    /// Successfully typeset expression
    Math { mode: DisplayMode, output: String },

    /// An expression the typesetter rejected. `source` is the original
    /// delimited text so the reader still sees what was written.
    Fallback {
        mode: DisplayMode,
        source: String,
        error: String,
    },
}

/// Render message content through `typesetter`.
///
/// Absent content renders to nothing. A typeset failure is contained to
/// the offending segment, which degrades to `Fallback`; every other
/// segment renders normally.
pub fn render(content: Option<&str>, typesetter: &impl MathTypesetter) -> Vec<RenderedPart> {
    segment(content)
        .into_iter()
        .map(|seg| render_segment(seg, typesetter))
        .collect()
}

fn render_segment(seg: Segment, typesetter: &impl MathTypesetter) -> RenderedPart {
    match seg {
        Segment::PlainText { text } => RenderedPart::Text { text },
        Segment::InlineMath { expr } => typeset_or_fallback(&expr, DisplayMode::Inline, typesetter),
        Segment::BlockMath { expr } => typeset_or_fallback(&expr, DisplayMode::Block, typesetter),
    }
}

fn typeset_or_fallback(
    expr: &str,
    mode: DisplayMode,
    typesetter: &impl MathTypesetter,
) -> RenderedPart {
    match typesetter.typeset(expr, mode) {
        Ok(output) => RenderedPart::Math { mode, output },
        Err(error) => RenderedPart::Fallback {
            mode,
            source: redelimit(expr, mode),
            error: error.to_string(),
        },
    }
}

fn redelimit(expr: &str, mode: DisplayMode) -> String {
    match mode {
        DisplayMode::Inline => format!("${expr}$"),
        DisplayMode::Block => format!("$${expr}$$"),
    }
}

/// Typesetter that passes the expression text through unchanged.
///
/// Used by the CLI, where there is no typesetting engine to call. An empty
/// expression typesets to an empty string, so empty `$$$$` regions display
/// as nothing. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTypesetter;

impl MathTypesetter for PlainTypesetter {
    fn typeset(&self, expr: &str, _mode: DisplayMode) -> Result<String, TypesetError> {
        Ok(expr.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Rejects any expression containing the marker substring.
    struct RejectingTypesetter(&'static str);

    impl MathTypesetter for RejectingTypesetter {
        fn typeset(&self, expr: &str, _mode: DisplayMode) -> Result<String, TypesetError> {
            if expr.contains(self.0) {
                Err(TypesetError(format!("unsupported construct in '{expr}'")))
            } else {
                Ok(expr.to_string())
            }
        }
    }

    #[test]
    fn test_absent_content_renders_to_nothing() {
        assert!(render(None, &PlainTypesetter).is_empty());
        assert!(render(Some(""), &PlainTypesetter).is_empty());
    }

    #[test]
    fn test_plain_and_math_parts() {
        let parts = render(Some("풀이: $$x^2+1=0$$ 입니다"), &PlainTypesetter);
        assert_eq!(
            parts,
            vec![
                RenderedPart::Text {
                    text: "풀이: ".to_string()
                },
                RenderedPart::Math {
                    mode: DisplayMode::Block,
                    output: "x^2+1=0".to_string()
                },
                RenderedPart::Text {
                    text: " 입니다".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_failure_is_contained_to_one_segment() {
        let typesetter = RejectingTypesetter("\\bad");
        let parts = render(Some("ok $a$ then $\\bad{x}$ and $b$"), &typesetter);
        assert_eq!(parts.len(), 6);
        assert_eq!(
            parts[1],
            RenderedPart::Math {
                mode: DisplayMode::Inline,
                output: "a".to_string()
            }
        );
        match &parts[3] {
            RenderedPart::Fallback { mode, source, error } => {
                assert_eq!(*mode, DisplayMode::Inline);
                assert_eq!(source, "$\\bad{x}$");
                assert!(error.contains("unsupported construct"));
            }
            other => panic!("expected fallback, got {other:?}"),
        }
        assert_eq!(
            parts[5],
            RenderedPart::Math {
                mode: DisplayMode::Inline,
                output: "b".to_string()
            }
        );
    }

    #[test]
    fn test_block_fallback_keeps_double_delimiters() {
        let typesetter = RejectingTypesetter("oops");
        let parts = render(Some("$$oops$$"), &typesetter);
        match &parts[0] {
            RenderedPart::Fallback { source, .. } => assert_eq!(source, "$$oops$$"),
            other => panic!("expected fallback, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_expression_displays_as_nothing() {
        let parts = render(Some("a$$$$b"), &PlainTypesetter);
        assert_eq!(
            parts,
            vec![
                RenderedPart::Text {
                    text: "a".to_string()
                },
                RenderedPart::Math {
                    mode: DisplayMode::Block,
                    output: String::new()
                },
                RenderedPart::Text {
                    text: "b".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_rendered_part_serialization_shape() {
        let json = serde_json::to_value(RenderedPart::Math {
            mode: DisplayMode::Inline,
            output: "a+b".to_string(),
        })
        .expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({"type": "math", "mode": "inline", "output": "a+b"})
        );
    }
}
