//! Filter Expression - display rendering for grouped search-filter predicates.
//!
//! Turns a group of filter predicates into a styled expression and a
//! plain-text mirror, and models the badge that shows one group:
//! - `FilterPredicate` / `FilterKind` - one condition, closed set of kinds
//! - `FilterGroup` - predicates sharing a group id, plus menu mutations
//! - `ExpressionFormatter` - pure render of a group
//! - `ExpressionCache` - optional render cache keyed by input fingerprint
//! - `FilterBadge` - collapsed/expanded state machine and action menu
//! - `NamedFilterSaver` - async save of a group as a named query
//!
//! # Architecture
//!
//! ```text
//! [FilterPredicate] ──► FilterGroup ──► ExpressionFormatter ──► RenderedExpression
//!                            │                 ▲                 ├── segments
//!                            │          SchemaLookup             ├── labels
//!                            ▼                                   └── plain_text
//!                       FilterBadge ──► FilterGroupHandler (remove/update/duplicate)
//!                            │
//!                            └──► SaveRequest ──► NamedFilterSaver ──► Notifier
//! ```
//!
//! # Example
//!
//! ```
//! use filter_expression::{
//!     ExpressionFormatter, FieldType, FilterGroup, FilterPredicate, IndexSchema, Relationship,
//! };
//!
//! let schemas = vec![IndexSchema::new("logs")
//!     .with_field("status", FieldType::String)
//!     .with_field("host", FieldType::String)];
//!
//! let group = FilterGroup::from_predicates(vec![
//!     FilterPredicate::phrase("status", "active")
//!         .in_sub_group("1")
//!         .with_relationship(Relationship::And),
//!     FilterPredicate::exists("host").in_sub_group("1"),
//! ])
//! .unwrap();
//!
//! let rendered = ExpressionFormatter::new().render(&group, &schemas);
//! assert_eq!(rendered.display_text(), "(status: active AND host: exists)");
//! assert_eq!(rendered.plain_text, "status: active AND host: exists  ");
//! ```

pub mod badge;
pub mod cache;
pub mod config;
mod error;
pub mod formatter;
pub mod group;
pub mod label;
pub mod predicate;
pub mod save;
pub mod schema;
pub mod segment;

// Re-exports
pub use badge::{
    ActionOutcome, BadgeEvent, BadgeState, BadgeView, FilterBadge, FilterGroupHandler, MenuAction,
    MenuItem,
};
pub use cache::{ExpressionCache, Fingerprint};
pub use config::{ConfigLoader, DisplayLabels, FormatterConfig, MenuLabels};
pub use error::{FilterError, FormatError, SaveError};
pub use formatter::ExpressionFormatter;
pub use group::{apply_alias, group_by_group_id, FilterGroup, SubGroup};
pub use label::{LabelStatus, SchemaValueFormatter, ValueFormatter, ValueLabel};
pub use predicate::{FilterKind, FilterPredicate, GroupId, Relationship};
pub use save::{
    MemorySavedQueryService, NamedFilterSaver, Notifier, Query, SaveRequest, SavedQuery,
    SavedQueryAttributes, SavedQueryMeta, SavedQueryService, TracingNotifier,
};
pub use schema::{FieldSpec, FieldType, IndexSchema, SchemaLookup};
pub use segment::{RenderedExpression, Segment, StyleHint};
