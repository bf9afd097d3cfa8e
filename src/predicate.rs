//! Filter predicates.
//!
//! A predicate is one search-filter condition. The filter kind is a closed
//! tagged enum, so the formatter matches on every variant the query
//! subsystem can produce instead of probing loosely-typed objects.
//!
//! Serializes as:
//! ```json
//! { "key": "status", "kind": { "type": "phrase", "value": "active" }, "negate": false }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Identifier of a filter group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(pub u32);

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for GroupId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// Boolean connective linking a predicate to the next one in its group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Relationship {
    #[serde(rename = "AND")]
    And,
    #[serde(rename = "OR")]
    Or,
    #[default]
    #[serde(rename = "")]
    None,
}

impl Relationship {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
            Self::None => "",
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The kind of condition a predicate expresses, with its parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FilterKind {
    /// Field has any value.
    Exists,
    /// Field equals a single value.
    Phrase { value: Value },
    /// Field equals one of several values.
    Phrases { values: Vec<Value> },
    /// Field lies within bounds. Absent bounds are open.
    Range {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        gte: Option<Value>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        gt: Option<Value>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        lte: Option<Value>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        lt: Option<Value>,
    },
    /// Free-text query; has no meaningful field key.
    QueryString { query: String },
    /// Raw query DSL the formatter does not interpret.
    Custom {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        query: Option<Value>,
    },
}

impl FilterKind {
    /// Wire name of the kind.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Exists => "exists",
            Self::Phrase { .. } => "phrase",
            Self::Phrases { .. } => "phrases",
            Self::Range { .. } => "range",
            Self::QueryString { .. } => "query_string",
            Self::Custom { .. } => "custom",
        }
    }
}

/// A single filter condition plus its grouping and display metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterPredicate {
    /// Field the condition applies to.
    #[serde(default)]
    pub key: String,

    pub kind: FilterKind,

    #[serde(default)]
    pub negate: bool,

    #[serde(default)]
    pub disabled: bool,

    /// Connective to the next predicate of the group.
    #[serde(default)]
    pub relationship: Relationship,

    #[serde(default)]
    pub group_id: GroupId,

    /// Predicates sharing a sub-group are parenthesised together.
    #[serde(default)]
    pub sub_group_id: String,

    /// Negation of the whole group. The first member of a group is authoritative.
    #[serde(default)]
    pub group_negated: bool,

    /// Id of the schema the filter was built against.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,

    /// Custom badge label, set when the group is saved as a named filter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,

    /// Filter spans several schemas; its value is not resolved against any.
    #[serde(default)]
    pub is_multi_index: bool,

    /// Display value already rendered by the query subsystem.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_summary: Option<String>,
}

impl FilterPredicate {
    pub fn new(key: impl Into<String>, kind: FilterKind) -> Self {
        Self {
            key: key.into(),
            kind,
            negate: false,
            disabled: false,
            relationship: Relationship::None,
            group_id: GroupId::default(),
            sub_group_id: String::new(),
            group_negated: false,
            index: None,
            alias: None,
            is_multi_index: false,
            value_summary: None,
        }
    }

    pub fn exists(key: impl Into<String>) -> Self {
        Self::new(key, FilterKind::Exists)
    }

    pub fn phrase(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(
            key,
            FilterKind::Phrase {
                value: value.into(),
            },
        )
    }

    pub fn phrases<V: Into<Value>>(key: impl Into<String>, values: impl IntoIterator<Item = V>) -> Self {
        Self::new(
            key,
            FilterKind::Phrases {
                values: values.into_iter().map(Into::into).collect(),
            },
        )
    }

    /// Half-open range `[gte, lt)`; pass `None` for an unbounded side.
    pub fn range(key: impl Into<String>, gte: Option<Value>, lt: Option<Value>) -> Self {
        Self::new(
            key,
            FilterKind::Range {
                gte,
                gt: None,
                lte: None,
                lt,
            },
        )
    }

    pub fn query_string(query: impl Into<String>) -> Self {
        Self::new(
            String::new(),
            FilterKind::QueryString {
                query: query.into(),
            },
        )
    }

    pub fn custom(key: impl Into<String>, query: Value) -> Self {
        Self::new(key, FilterKind::Custom { query: Some(query) })
    }

    pub fn negated(mut self) -> Self {
        self.negate = true;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    pub fn with_relationship(mut self, relationship: Relationship) -> Self {
        self.relationship = relationship;
        self
    }

    pub fn in_group(mut self, group_id: impl Into<GroupId>) -> Self {
        self.group_id = group_id.into();
        self
    }

    pub fn in_sub_group(mut self, sub_group_id: impl Into<String>) -> Self {
        self.sub_group_id = sub_group_id.into();
        self
    }

    pub fn with_group_negated(mut self, negated: bool) -> Self {
        self.group_negated = negated;
        self
    }

    pub fn with_index(mut self, index: impl Into<String>) -> Self {
        self.index = Some(index.into());
        self
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn with_value_summary(mut self, summary: impl Into<String>) -> Self {
        self.value_summary = Some(summary.into());
        self
    }

    pub fn multi_index(mut self) -> Self {
        self.is_multi_index = true;
        self
    }
}
