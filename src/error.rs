//! Error types.
//!
//! Two of these never abort a render: `FormatError` degrades to an `Error`
//! label and a missing field degrades to a `Warning` label (see
//! [`crate::label`]). `FilterError` covers group construction and badge
//! actions, `SaveError` the named-filter save flow.

use crate::badge::MenuAction;
use crate::predicate::GroupId;
use thiserror::Error;

/// Errors raised while building groups or dispatching badge actions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    /// A group must hold at least one predicate.
    #[error("Filter group {group_id} has no predicates")]
    EmptyGroup {
        /// Group that was empty.
        group_id: GroupId,
    },

    /// A predicate carries a group id different from the group it was put in.
    #[error("Predicate '{key}' belongs to group {found}, not group {group_id}")]
    ForeignMember {
        /// Group being built.
        group_id: GroupId,
        /// Group id carried by the predicate.
        found: GroupId,
        /// Key of the offending predicate.
        key: String,
    },

    /// A menu action was selected while the badge was collapsed.
    #[error("Action menu for group {group_id} is not open")]
    MenuClosed {
        /// Group whose menu is closed.
        group_id: GroupId,
    },

    /// The action is not offered for this badge.
    #[error("Action {action:?} is not available for group {group_id}")]
    ActionUnavailable {
        /// Group the action was requested on.
        group_id: GroupId,
        /// Requested action.
        action: MenuAction,
    },

    /// No group id is left for a duplicated group.
    #[error("Cannot duplicate group {group_id}: group ids exhausted at {groups_count}")]
    GroupIdExhausted {
        /// Group being duplicated.
        group_id: GroupId,
        /// Number of groups in the bar.
        groups_count: u32,
    },
}

impl FilterError {
    /// Get an error code for this error type.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyGroup { .. } => "EMPTY_GROUP",
            Self::ForeignMember { .. } => "FOREIGN_MEMBER",
            Self::MenuClosed { .. } => "MENU_CLOSED",
            Self::ActionUnavailable { .. } => "ACTION_UNAVAILABLE",
            Self::GroupIdExhausted { .. } => "GROUP_ID_EXHAUSTED",
        }
    }
}

/// A value could not be formatted for display.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Cannot format value of field '{field}': {reason}")]
pub struct FormatError {
    /// Field whose value failed to format.
    pub field: String,
    /// What went wrong.
    pub reason: String,
}

impl FormatError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Errors from the save-as-named-filter flow.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SaveError {
    /// Updating an existing saved query requires its id.
    #[error("Cannot update saved query '{title}': no id given")]
    MissingQueryId {
        /// Title of the query being saved.
        title: String,
    },

    /// The saved query to update does not exist.
    #[error("Saved query '{0}' not found")]
    NotFound(String),

    /// A saved query title must not be blank.
    #[error("Saved query title must not be empty")]
    EmptyTitle,

    /// The backing service failed.
    #[error("Saved query service failed: {0}")]
    Service(String),
}

impl SaveError {
    /// Get an error code for this error type.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingQueryId { .. } => "MISSING_QUERY_ID",
            Self::NotFound(_) => "NOT_FOUND",
            Self::EmptyTitle => "EMPTY_TITLE",
            Self::Service(_) => "SERVICE_FAILURE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_error_codes() {
        let err = FilterError::EmptyGroup {
            group_id: GroupId(3),
        };
        assert_eq!(err.code(), "EMPTY_GROUP");
        assert_eq!(err.to_string(), "Filter group 3 has no predicates");
    }

    #[test]
    fn test_format_error_message_names_field() {
        let err = FormatError::new("bytes", "\"abc\" is not a number");
        assert!(err.to_string().contains("'bytes'"));
        assert!(err.to_string().contains("abc"));
    }

    #[test]
    fn test_save_error_codes() {
        assert_eq!(SaveError::EmptyTitle.code(), "EMPTY_TITLE");
        assert_eq!(
            SaveError::MissingQueryId {
                title: "q".to_string()
            }
            .code(),
            "MISSING_QUERY_ID"
        );
    }
}
