//! Value labels.
//!
//! Each predicate gets a `ValueLabel`: the display value plus a status.
//! Failures here never abort a render:
//! - field missing from every schema in view -> `Warning` title, message names the field
//! - value formatter fails -> `Error` title, formatter message kept for diagnostics

use crate::config::{fill, DisplayLabels, FormatterConfig};
use crate::error::FormatError;
use crate::predicate::{FilterKind, FilterPredicate};
use crate::schema::{FieldType, SchemaLookup};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::Write;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelStatus {
    #[default]
    Ok,
    Warning,
    Error,
}

/// Display value of one predicate.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ValueLabel {
    pub title: String,
    pub status: LabelStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ValueLabel {
    pub fn ok(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            status: LabelStatus::Ok,
            message: None,
        }
    }

    pub fn warning(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            status: LabelStatus::Warning,
            message: Some(message.into()),
        }
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            status: LabelStatus::Error,
            message: Some(message.into()),
        }
    }
}

/// Turns a predicate's parameters into display text.
pub trait ValueFormatter {
    /// # Errors
    /// `FormatError` when the value cannot be shown for the field.
    fn format<S: SchemaLookup + ?Sized>(
        &self,
        predicate: &FilterPredicate,
        schemas: &S,
    ) -> Result<String, FormatError>;
}

/// Default formatter: converts values according to the field's declared type.
#[derive(Debug, Clone)]
pub struct SchemaValueFormatter {
    date_format: String,
    range_separator: String,
    exists: String,
}

impl Default for SchemaValueFormatter {
    fn default() -> Self {
        Self::from_config(&FormatterConfig::default())
    }
}

impl SchemaValueFormatter {
    pub fn new(date_format: impl Into<String>, range_separator: impl Into<String>) -> Self {
        Self {
            date_format: date_format.into(),
            range_separator: range_separator.into(),
            exists: DisplayLabels::default().exists,
        }
    }

    /// Date pattern, range separator and exists text taken from the config.
    pub fn from_config(config: &FormatterConfig) -> Self {
        Self::new(config.date_format.clone(), config.labels.range_separator.clone())
            .with_exists_text(config.labels.exists.clone())
    }

    /// Value shown for exists filters.
    pub fn with_exists_text(mut self, exists: impl Into<String>) -> Self {
        self.exists = exists.into();
        self
    }

    fn format_value(
        &self,
        key: &str,
        field_type: Option<FieldType>,
        value: &Value,
    ) -> Result<String, FormatError> {
        match field_type {
            Some(FieldType::Number) => match value {
                Value::Number(n) => Ok(n.to_string()),
                Value::String(s) if s.trim().parse::<f64>().is_ok() => Ok(s.trim().to_string()),
                other => Err(FormatError::new(key, format!("{} is not a number", other))),
            },
            Some(FieldType::Boolean) => match value {
                Value::Bool(b) => Ok(b.to_string()),
                Value::String(s) if s == "true" || s == "false" => Ok(s.clone()),
                other => Err(FormatError::new(key, format!("{} is not a boolean", other))),
            },
            Some(FieldType::Date) => self.format_date(key, value),
            _ => Ok(plain(value)),
        }
    }

    fn format_date(&self, key: &str, value: &Value) -> Result<String, FormatError> {
        let timestamp: DateTime<Utc> = match value {
            Value::String(s) => DateTime::parse_from_rfc3339(s)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| FormatError::new(key, format!("\"{}\" is not a date: {}", s, e)))?,
            Value::Number(n) => n
                .as_i64()
                .and_then(|millis| Utc.timestamp_millis_opt(millis).single())
                .ok_or_else(|| FormatError::new(key, format!("{} is not a timestamp", n)))?,
            other => return Err(FormatError::new(key, format!("{} is not a date", other))),
        };
        let mut out = String::new();
        write!(out, "{}", timestamp.format(&self.date_format)).map_err(|_| {
            FormatError::new(key, format!("invalid date format '{}'", self.date_format))
        })?;
        Ok(out)
    }

    fn format_bound(
        &self,
        key: &str,
        field_type: Option<FieldType>,
        bound: Option<&Value>,
        open: &str,
    ) -> Result<String, FormatError> {
        match bound {
            Some(value) => self.format_value(key, field_type, value),
            None => Ok(open.to_string()),
        }
    }
}

impl ValueFormatter for SchemaValueFormatter {
    fn format<S: SchemaLookup + ?Sized>(
        &self,
        predicate: &FilterPredicate,
        schemas: &S,
    ) -> Result<String, FormatError> {
        if let Some(summary) = predicate.value_summary.as_deref() {
            if !summary.is_empty() {
                return Ok(summary.to_string());
            }
        }

        let key = predicate.key.as_str();
        let field_type = schemas.field_type(key);

        match &predicate.kind {
            FilterKind::Exists => Ok(self.exists.clone()),
            FilterKind::Phrase { value } => self.format_value(key, field_type, value),
            FilterKind::Phrases { values } => {
                let formatted = values
                    .iter()
                    .map(|v| self.format_value(key, field_type, v))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(formatted.join(", "))
            }
            FilterKind::Range { gte, gt, lte, lt } => {
                let from = self.format_bound(key, field_type, gte.as_ref().or(gt.as_ref()), "-∞")?;
                let to = self.format_bound(key, field_type, lt.as_ref().or(lte.as_ref()), "+∞")?;
                Ok(format!("{}{}{}", from, self.range_separator, to))
            }
            FilterKind::QueryString { query } => Ok(query.clone()),
            FilterKind::Custom { query } => Ok(query.as_ref().map(Value::to_string).unwrap_or_default()),
        }
    }
}

fn plain(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Resolve the label of one predicate against the schemas in view.
pub fn resolve_label<F, S>(
    predicate: &FilterPredicate,
    schemas: &S,
    formatter: &F,
    labels: &DisplayLabels,
) -> ValueLabel
where
    F: ValueFormatter,
    S: SchemaLookup + ?Sized,
{
    if predicate.is_multi_index {
        return ValueLabel::default();
    }

    if !schemas.is_filter_applicable(predicate) {
        debug!(field = %predicate.key, "filter field not in any schema in view");
        return ValueLabel::warning(
            labels.warning_title.clone(),
            fill(&labels.warning_message, &[("field", predicate.key.as_str())]),
        );
    }

    match formatter.format(predicate, schemas) {
        Ok(title) => ValueLabel::ok(title),
        Err(e) => {
            warn!(field = %e.field, error = %e, "failed to format filter value");
            ValueLabel::error(labels.error_title.clone(), e.to_string())
        }
    }
}

/// Whether a value renders with numeric styling: empty or parses as a number.
pub fn is_numeric_text(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed.is_empty() || trimmed.parse::<f64>().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::IndexSchema;
    use serde_json::json;

    fn schemas() -> Vec<IndexSchema> {
        vec![IndexSchema::new("logs")
            .with_field("host", FieldType::String)
            .with_field("bytes", FieldType::Number)
            .with_field("secure", FieldType::Boolean)
            .with_field("@timestamp", FieldType::Date)]
    }

    fn label(predicate: &FilterPredicate) -> ValueLabel {
        resolve_label(
            predicate,
            &schemas(),
            &SchemaValueFormatter::default(),
            &DisplayLabels::default(),
        )
    }

    #[test]
    fn test_phrase_label() {
        let l = label(&FilterPredicate::phrase("host", "web-1"));
        assert_eq!(l, ValueLabel::ok("web-1"));
    }

    #[test]
    fn test_phrases_joined() {
        let l = label(&FilterPredicate::phrases("bytes", [json!(1), json!("2")]));
        assert_eq!(l.title, "1, 2");
    }

    #[test]
    fn test_range_with_open_bound() {
        let l = label(&FilterPredicate::range("bytes", Some(json!(100)), None));
        assert_eq!(l.title, "100 to +∞");
        let l = label(&FilterPredicate::range("bytes", None, Some(json!(5))));
        assert_eq!(l.title, "-∞ to 5");
    }

    #[test]
    fn test_missing_field_is_warning() {
        let l = label(&FilterPredicate::phrase("geo", "x"));
        assert_eq!(l.status, LabelStatus::Warning);
        assert_eq!(l.title, "Warning");
        assert_eq!(
            l.message.as_deref(),
            Some("Field geo does not exist in current view")
        );
    }

    #[test]
    fn test_bad_number_is_error() {
        let l = label(&FilterPredicate::phrase("bytes", "lots"));
        assert_eq!(l.status, LabelStatus::Error);
        assert_eq!(l.title, "Error");
        assert!(l.message.unwrap().contains("is not a number"));
    }

    #[test]
    fn test_bad_boolean_is_error() {
        let l = label(&FilterPredicate::phrase("secure", 1));
        assert_eq!(l.status, LabelStatus::Error);
    }

    #[test]
    fn test_date_formatted() {
        let formatter = SchemaValueFormatter::new("%Y-%m-%d", " to ");
        let predicate = FilterPredicate::phrase("@timestamp", "2024-03-05T10:00:00Z");
        assert_eq!(formatter.format(&predicate, &schemas()).unwrap(), "2024-03-05");
        let predicate = FilterPredicate::phrase("@timestamp", 0);
        assert_eq!(formatter.format(&predicate, &schemas()).unwrap(), "1970-01-01");
        let predicate = FilterPredicate::phrase("@timestamp", "yesterday");
        assert!(formatter.format(&predicate, &schemas()).is_err());
    }

    #[test]
    fn test_exists_label_uses_configured_text() {
        let l = label(&FilterPredicate::exists("host"));
        assert_eq!(l, ValueLabel::ok("exists"));

        let mut config = FormatterConfig::default();
        config.labels.exists = "is present".to_string();
        let formatter = SchemaValueFormatter::from_config(&config);
        let title = formatter
            .format(&FilterPredicate::exists("host"), &schemas())
            .unwrap();
        assert_eq!(title, "is present");
    }

    #[test]
    fn test_value_summary_wins() {
        let l = label(&FilterPredicate::phrase("bytes", "lots").with_value_summary("1 KB"));
        assert_eq!(l, ValueLabel::ok("1 KB"));
    }

    #[test]
    fn test_multi_index_gets_empty_ok_label() {
        let l = label(&FilterPredicate::phrase("geo", "x").multi_index());
        assert_eq!(l, ValueLabel::default());
    }

    #[test]
    fn test_custom_query_as_json() {
        let l = label(&FilterPredicate::custom("host", json!({"match_all": {}})));
        assert_eq!(l.title, r#"{"match_all":{}}"#);
    }

    #[test]
    fn test_numeric_text() {
        assert!(is_numeric_text("42"));
        assert!(is_numeric_text(" 4.2 "));
        assert!(is_numeric_text(""));
        assert!(!is_numeric_text("web-1"));
    }
}
