//! Expression formatter - renders a `FilterGroup` into a `RenderedExpression`.
//!
//! Rendering is a pure function of (group, schemas, config): no state is
//! kept between renders. Callers that re-render unchanged groups often can
//! put an [`ExpressionCache`](crate::cache::ExpressionCache) in front.
//!
//! ## Algorithm
//!
//! 1. Negated group -> leading `NOT` segment
//! 2. Partition by sub-group id, first-seen order
//! 3. Sub-groups of two or more -> wrapped in `(` `)`
//! 4. Each predicate rendered by kind, with a `NOT ` prefix when negated
//! 5. Relationship after each predicate, only for groups of two or more
//! 6. Plain text accumulates `"<key>: <value> <relationship> "` in the same order

use crate::config::{DisplayLabels, FormatterConfig};
use crate::group::FilterGroup;
use crate::label::{is_numeric_text, resolve_label, SchemaValueFormatter, ValueFormatter, ValueLabel};
use crate::predicate::{FilterKind, FilterPredicate, Relationship};
use crate::schema::SchemaLookup;
use crate::segment::{RenderedExpression, Segment, StyleHint};

/// Renders filter groups.
#[derive(Debug, Clone)]
pub struct ExpressionFormatter<F = SchemaValueFormatter> {
    config: FormatterConfig,
    value_formatter: F,
}

impl Default for ExpressionFormatter<SchemaValueFormatter> {
    fn default() -> Self {
        Self::new()
    }
}

impl ExpressionFormatter<SchemaValueFormatter> {
    pub fn new() -> Self {
        Self::with_config(FormatterConfig::default())
    }

    pub fn with_config(config: FormatterConfig) -> Self {
        let value_formatter = SchemaValueFormatter::from_config(&config);
        Self {
            config,
            value_formatter,
        }
    }
}

impl<F: ValueFormatter> ExpressionFormatter<F> {
    /// Use a custom value formatter.
    pub fn with_value_formatter(config: FormatterConfig, value_formatter: F) -> Self {
        Self {
            config,
            value_formatter,
        }
    }

    pub fn config(&self) -> &FormatterConfig {
        &self.config
    }

    pub fn labels(&self) -> &DisplayLabels {
        &self.config.labels
    }

    pub fn value_label<S: SchemaLookup + ?Sized>(
        &self,
        predicate: &FilterPredicate,
        schemas: &S,
    ) -> ValueLabel {
        resolve_label(predicate, schemas, &self.value_formatter, &self.config.labels)
    }

    /// Render a group. Label failures degrade per predicate and never abort.
    pub fn render<S: SchemaLookup + ?Sized>(
        &self,
        group: &FilterGroup,
        schemas: &S,
    ) -> RenderedExpression {
        let labels = &self.config.labels;
        let mut out = RenderedExpression::default();

        if group.is_negated() {
            out.segments.push(Segment::new(
                labels.group_negation.clone(),
                StyleHint::GroupNegation,
            ));
        }

        let compound = group.is_compound();
        let mut index = 0;

        for sub_group in group.sub_groups() {
            let parenthesised = sub_group.needs_parenthesis();
            if parenthesised {
                out.segments.push(Segment::new("(", StyleHint::Parenthesis));
            }

            for predicate in sub_group.members {
                let label = self.value_label(predicate, schemas);
                let relationship = if compound {
                    predicate.relationship
                } else {
                    Relationship::None
                };

                self.push_predicate(&mut out.segments, predicate, &label, relationship, index);

                out.plain_text.push_str(&format!(
                    "{}: {} {} ",
                    predicate.key,
                    label.title,
                    relationship.as_str()
                ));
                out.labels.push(label);
                index += 1;
            }

            if parenthesised {
                out.segments.push(Segment::new(")", StyleHint::Parenthesis));
            }
        }

        out
    }

    fn push_predicate(
        &self,
        segments: &mut Vec<Segment>,
        predicate: &FilterPredicate,
        label: &ValueLabel,
        relationship: Relationship,
        index: usize,
    ) {
        let labels = &self.config.labels;

        if predicate.negate {
            // Disabled predicates keep the prefix text but lose the alert colour.
            let style = if predicate.disabled {
                StyleHint::Plain
            } else {
                StyleHint::NegationPrefix
            };
            segments.push(Segment::for_predicate(
                labels.negated_prefix.clone(),
                style,
                index,
            ));
        }

        let key = || Segment::for_predicate(format!("{}: ", predicate.key), StyleHint::Key, index);
        let value = |text: String| {
            let style = if is_numeric_text(&text) {
                StyleHint::NumericValue
            } else {
                StyleHint::Value
            };
            Segment::for_predicate(text, style, index)
        };

        match &predicate.kind {
            FilterKind::Exists => {
                segments.push(key());
                segments.push(value(labels.exists.clone()));
            }
            FilterKind::Phrases { .. } => {
                segments.push(key());
                segments.push(value(format!("{} {}", labels.is_one_of, label.title)));
            }
            FilterKind::QueryString { .. } => {
                segments.push(value(label.title.clone()));
            }
            FilterKind::Phrase { .. } | FilterKind::Range { .. } => {
                segments.push(key());
                segments.push(value(label.title.clone()));
            }
            FilterKind::Custom { query } => {
                let raw = match query {
                    Some(q) => q.to_string(),
                    None => predicate
                        .value_summary
                        .clone()
                        .unwrap_or_else(|| label.title.clone()),
                };
                segments.push(value(raw));
            }
        }

        if !relationship.is_none() {
            segments.push(Segment::for_predicate(
                relationship.as_str(),
                StyleHint::Relationship,
                index,
            ));
        }
    }
}
