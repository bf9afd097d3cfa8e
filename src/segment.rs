//! Rendered output: styled segments plus a plain-text mirror.
//!
//! ```text
//! NOT ( status: active AND host: exists ) OR bytes: 10 to +∞
//! │   │ └─Key─┘└Value┘ └Rel┘                └Rel┘
//! │   └ Parenthesis
//! └ GroupNegation
//! ```

use crate::label::{LabelStatus, ValueLabel};
use serde::{Deserialize, Serialize};

/// How a segment should be styled by the host toolkit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleHint {
    /// `NOT` before a negated group (alert colour).
    GroupNegation,
    /// `NOT ` before an enabled negated predicate (alert colour).
    NegationPrefix,
    /// Unstyled text, e.g. the prefix of a disabled predicate.
    Plain,
    /// `<key>: `
    Key,
    Value,
    /// Value that is empty or numeric.
    NumericValue,
    /// `AND` / `OR` (accent colour).
    Relationship,
    /// `(` / `)` around a sub-group (accent colour).
    Parenthesis,
    /// Icon shown before a saved filter's custom label.
    SavedIcon,
    CustomLabel,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub text: String,
    pub style: StyleHint,
    /// Render-order index of the predicate this segment belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predicate: Option<usize>,
}

impl Segment {
    pub fn new(text: impl Into<String>, style: StyleHint) -> Self {
        Self {
            text: text.into(),
            style,
            predicate: None,
        }
    }

    pub fn for_predicate(text: impl Into<String>, style: StyleHint, index: usize) -> Self {
        Self {
            text: text.into(),
            style,
            predicate: Some(index),
        }
    }
}

/// A rendered filter group. Derived from input on every render, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RenderedExpression {
    pub segments: Vec<Segment>,
    /// One label per predicate, in render order.
    pub labels: Vec<ValueLabel>,
    /// Tooltip / accessible label.
    pub plain_text: String,
}

impl RenderedExpression {
    /// Concatenated segment text with spacing around markers and connectives.
    pub fn display_text(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment.style {
                StyleHint::GroupNegation => {
                    out.push_str(&segment.text);
                    out.push(' ');
                }
                StyleHint::Relationship | StyleHint::SavedIcon => {
                    out.push(' ');
                    out.push_str(&segment.text);
                    out.push(' ');
                }
                _ => out.push_str(&segment.text),
            }
        }
        out.trim().to_string()
    }

    /// Text of one predicate without its trailing relationship.
    pub fn predicate_text(&self, index: usize) -> String {
        self.segments
            .iter()
            .filter(|s| s.predicate == Some(index) && s.style != StyleHint::Relationship)
            .map(|s| s.text.as_str())
            .collect()
    }

    /// Worst status across all labels.
    pub fn status(&self) -> LabelStatus {
        if self.labels.iter().any(|l| l.status == LabelStatus::Error) {
            LabelStatus::Error
        } else if self.labels.iter().any(|l| l.status == LabelStatus::Warning) {
            LabelStatus::Warning
        } else {
            LabelStatus::Ok
        }
    }

    pub fn first_segment(&self) -> Option<&Segment> {
        self.segments.first()
    }
}
