//! Filter badge: the widget around one rendered group.
//!
//! State machine:
//!
//! ```text
//!            Toggle
//! Collapsed ────────► Expanded
//!     ▲   ◄────────      │
//!     │     Toggle       │
//!     └──────────────────┘
//!            Close
//! ```
//!
//! No other states exist. Menu actions are only accepted while expanded;
//! every action except Edit and Save-as-filter closes the menu before its
//! callback runs.

use crate::config::{fill, MenuLabels};
use crate::error::FilterError;
use crate::formatter::ExpressionFormatter;
use crate::group::FilterGroup;
use crate::label::{LabelStatus, ValueFormatter};
use crate::predicate::{FilterPredicate, GroupId};
use crate::save::{SaveRequest, SavedQueryMeta};
use crate::schema::SchemaLookup;
use crate::segment::{RenderedExpression, Segment, StyleHint};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Menu panel holding the filter editor.
pub const EDITOR_PANEL: u8 = 1;
/// Menu panel holding the save-as-filter form.
pub const SAVE_PANEL: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeState {
    /// Badge shown, menu closed.
    #[default]
    Collapsed,
    /// Action menu open.
    Expanded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeEvent {
    /// Click on the badge.
    Toggle,
    /// Explicit close (outside click, escape, or an action).
    Close,
}

impl BadgeState {
    pub fn next(self, event: BadgeEvent) -> Self {
        match (self, event) {
            (Self::Collapsed, BadgeEvent::Toggle) => Self::Expanded,
            (Self::Expanded, BadgeEvent::Toggle) => Self::Collapsed,
            (_, BadgeEvent::Close) => Self::Collapsed,
        }
    }

    pub fn is_expanded(self) -> bool {
        matches!(self, Self::Expanded)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuAction {
    Edit,
    Invert,
    Duplicate,
    ToggleDisabled,
    SaveAsFilter,
    Remove,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub action: MenuAction,
    pub label: String,
    pub icon: &'static str,
    /// Panel the item navigates to instead of acting directly.
    pub panel: Option<u8>,
}

/// What selecting an action did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Menu closed and the handler was called.
    Dispatched,
    /// Menu stays open on this panel.
    PanelOpened(u8),
}

/// Receives group mutations from the badge.
///
/// Updated predicates are handed back whole; the owner replaces the group.
pub trait FilterGroupHandler {
    fn on_remove(&mut self, group_id: GroupId);

    /// `toggle_negate` is true for invert and disable toggles.
    fn on_update(&mut self, predicates: Vec<FilterPredicate>, group_id: GroupId, toggle_negate: bool);

    /// Duplicated predicates: the copies followed by the originals.
    fn on_duplicate(&mut self, predicates: Vec<FilterPredicate>, group_id: GroupId) {
        self.on_update(predicates, group_id, false);
    }

    /// A save-as-named-filter request was submitted from the badge.
    fn on_save_as_named_filter(&mut self, _request: &SaveRequest) {}
}

/// Everything the host needs to draw the badge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadgeView {
    pub group_id: GroupId,
    pub state: BadgeState,
    /// Badge body: the expression, or the saved icon and custom label.
    pub content: Vec<Segment>,
    pub expression: RenderedExpression,
    /// Tooltip; the expression's plain text.
    pub title: String,
    pub remove_aria_label: String,
    pub actions_aria_label: String,
    /// Shown dimmed: first predicate disabled or its label failed.
    pub disabled: bool,
}

/// One badge: a group plus its menu state.
#[derive(Debug, Clone)]
pub struct FilterBadge {
    group: FilterGroup,
    groups_count: u32,
    state: BadgeState,
    save_enabled: bool,
}

impl FilterBadge {
    /// `groups_count` is the number of groups in the bar; duplicates get the next id.
    pub fn new(group: FilterGroup, groups_count: u32) -> Self {
        Self {
            group,
            groups_count,
            state: BadgeState::Collapsed,
            save_enabled: false,
        }
    }

    /// Offer "Save as filter" when a saved-query service is wired up.
    pub fn with_save_enabled(mut self, enabled: bool) -> Self {
        self.save_enabled = enabled;
        self
    }

    pub fn group(&self) -> &FilterGroup {
        &self.group
    }

    pub fn state(&self) -> BadgeState {
        self.state
    }

    fn apply(&mut self, event: BadgeEvent) {
        let next = self.state.next(event);
        debug!(group_id = %self.group.id(), from = ?self.state, to = ?next, "badge transition");
        self.state = next;
    }

    pub fn click(&mut self) {
        self.apply(BadgeEvent::Toggle);
    }

    pub fn close(&mut self) {
        self.apply(BadgeEvent::Close);
    }

    fn can_save(&self) -> bool {
        self.save_enabled && self.group.custom_label().is_none()
    }

    /// Menu items in display order. Save-as-filter sits just before Remove.
    pub fn menu(&self, labels: &MenuLabels) -> Vec<MenuItem> {
        let mut items = vec![
            MenuItem {
                action: MenuAction::Edit,
                label: labels.edit.clone(),
                icon: "pencil",
                panel: Some(EDITOR_PANEL),
            },
            MenuItem {
                action: MenuAction::Invert,
                label: labels.invert.clone(),
                icon: "invert",
                panel: None,
            },
            MenuItem {
                action: MenuAction::Duplicate,
                label: labels.duplicate.clone(),
                icon: "copy",
                panel: None,
            },
            if self.group.is_disabled() {
                MenuItem {
                    action: MenuAction::ToggleDisabled,
                    label: labels.enable.clone(),
                    icon: "eye",
                    panel: None,
                }
            } else {
                MenuItem {
                    action: MenuAction::ToggleDisabled,
                    label: labels.disable.clone(),
                    icon: "eyeClosed",
                    panel: None,
                }
            },
        ];

        if self.can_save() {
            items.push(MenuItem {
                action: MenuAction::SaveAsFilter,
                label: labels.save_as_filter.clone(),
                icon: "save",
                panel: Some(SAVE_PANEL),
            });
        }

        items.push(MenuItem {
            action: MenuAction::Remove,
            label: labels.remove.clone(),
            icon: "trash",
            panel: None,
        });

        items
    }

    /// Select a menu action.
    ///
    /// # Errors
    /// `MenuClosed` while collapsed, `ActionUnavailable` for save-as-filter
    /// when it is not offered, `GroupIdExhausted` when a duplicate has no id.
    pub fn select<H: FilterGroupHandler + ?Sized>(
        &mut self,
        action: MenuAction,
        handler: &mut H,
    ) -> Result<ActionOutcome, FilterError> {
        let group_id = self.group.id();

        if !self.state.is_expanded() {
            return Err(FilterError::MenuClosed { group_id });
        }

        match action {
            MenuAction::Edit => Ok(ActionOutcome::PanelOpened(EDITOR_PANEL)),
            MenuAction::SaveAsFilter => {
                if !self.can_save() {
                    return Err(FilterError::ActionUnavailable { group_id, action });
                }
                Ok(ActionOutcome::PanelOpened(SAVE_PANEL))
            }
            MenuAction::Invert => {
                self.close();
                handler.on_update(self.group.toggled_negation(), group_id, true);
                Ok(ActionOutcome::Dispatched)
            }
            MenuAction::Duplicate => {
                let duplicated = self.group.duplicated(self.groups_count)?;
                self.close();
                handler.on_duplicate(duplicated, group_id);
                Ok(ActionOutcome::Dispatched)
            }
            MenuAction::ToggleDisabled => {
                self.close();
                handler.on_update(self.group.toggled_disabled(), group_id, true);
                Ok(ActionOutcome::Dispatched)
            }
            MenuAction::Remove => {
                self.close();
                handler.on_remove(group_id);
                Ok(ActionOutcome::Dispatched)
            }
        }
    }

    /// The badge's close icon removes the group without opening the menu.
    pub fn remove<H: FilterGroupHandler + ?Sized>(&mut self, handler: &mut H) {
        self.close();
        handler.on_remove(self.group.id());
    }

    /// Submit the save form. Closes the menu immediately; the returned request
    /// is awaited by the caller and may resolve after the badge is gone.
    ///
    /// # Errors
    /// `MenuClosed` while collapsed, `ActionUnavailable` when save-as-filter
    /// is not offered.
    pub fn submit_save<H: FilterGroupHandler + ?Sized>(
        &mut self,
        meta: SavedQueryMeta,
        handler: &mut H,
    ) -> Result<SaveRequest, FilterError> {
        let group_id = self.group.id();
        if !self.state.is_expanded() {
            return Err(FilterError::MenuClosed { group_id });
        }
        if !self.can_save() {
            return Err(FilterError::ActionUnavailable {
                group_id,
                action: MenuAction::SaveAsFilter,
            });
        }

        let request = SaveRequest::new(group_id, meta, self.group.predicates().to_vec());
        self.close();
        handler.on_save_as_named_filter(&request);
        Ok(request)
    }

    /// Render the badge against the schemas in view.
    pub fn view<F, S>(&self, formatter: &ExpressionFormatter<F>, schemas: &S) -> BadgeView
    where
        F: ValueFormatter,
        S: SchemaLookup + ?Sized,
    {
        let labels = formatter.labels();
        let expression = formatter.render(&self.group, schemas);

        let content = match self.group.custom_label() {
            Some(alias) => vec![
                Segment::new("save", StyleHint::SavedIcon),
                Segment::new(alias, StyleHint::CustomLabel),
            ],
            None => expression.segments.clone(),
        };

        let first_label_failed = expression
            .labels
            .first()
            .map(|l| l.status == LabelStatus::Error)
            .unwrap_or(false);

        let title = expression.plain_text.clone();

        BadgeView {
            group_id: self.group.id(),
            state: self.state,
            content,
            remove_aria_label: fill(&labels.remove_aria_label, &[("title", title.as_str())]),
            actions_aria_label: labels.actions_aria_label.clone(),
            disabled: self.group.is_disabled() || first_label_failed,
            title,
            expression,
        }
    }
}
