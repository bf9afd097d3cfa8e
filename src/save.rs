//! Save a filter group as a named query.
//!
//! The badge submits a [`SaveRequest`] and closes its menu straight away;
//! the caller awaits [`NamedFilterSaver::save`], which reports the outcome
//! through a [`Notifier`] and returns the error on failure.
//!
//! A request is not tied to the badge that issued it. If the badge closes
//! (or is dropped) before the service answers, the caller still applies the
//! result, e.g. the alias via [`crate::group::apply_alias`]. Responses are
//! not ordered against later requests for the same group.

use crate::config::{fill, DisplayLabels};
use crate::error::SaveError;
use crate::predicate::{FilterPredicate, GroupId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Mutex;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Query language stored with filter-only saved queries.
pub const DEFAULT_QUERY_LANGUAGE: &str = "kuery";

/// What the user entered in the save form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedQueryMeta {
    /// Existing saved query to overwrite.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Filters to save instead of the group's own.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<Vec<FilterPredicate>>,
    #[serde(default)]
    pub should_include_time_filter: bool,
}

impl SavedQueryMeta {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            description: String::new(),
            filters: None,
            should_include_time_filter: false,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    pub language: String,
    pub query: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedQueryAttributes {
    pub title: String,
    pub description: String,
    pub query: Query,
    pub filters: Vec<FilterPredicate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedQuery {
    pub id: String,
    pub attributes: SavedQueryAttributes,
    pub updated_at: DateTime<Utc>,
}

/// A pending save, detached from the badge that issued it.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveRequest {
    pub request_id: Uuid,
    pub group_id: GroupId,
    pub meta: SavedQueryMeta,
    /// The group's predicates at submit time.
    pub filters: Vec<FilterPredicate>,
    /// Create a new saved query rather than overwrite `meta.id`.
    pub save_as_new: bool,
    pub language: String,
}

impl SaveRequest {
    pub fn new(group_id: GroupId, meta: SavedQueryMeta, filters: Vec<FilterPredicate>) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            group_id,
            meta,
            filters,
            save_as_new: true,
            language: DEFAULT_QUERY_LANGUAGE.to_string(),
        }
    }

    /// Overwrite the saved query named by `meta.id` instead of creating one.
    pub fn as_update(mut self) -> Self {
        self.save_as_new = false;
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Filters saved with an empty query; explicit `meta.filters` win.
    pub fn attributes(&self) -> SavedQueryAttributes {
        SavedQueryAttributes {
            title: self.meta.title.clone(),
            description: self.meta.description.clone(),
            query: Query {
                language: self.language.clone(),
                query: String::new(),
            },
            filters: self
                .meta
                .filters
                .clone()
                .unwrap_or_else(|| self.filters.clone()),
        }
    }
}

/// Persists saved queries.
#[async_trait]
pub trait SavedQueryService: Send + Sync {
    async fn create_query(&self, attributes: SavedQueryAttributes) -> Result<SavedQuery, SaveError>;

    async fn update_query(
        &self,
        id: &str,
        attributes: SavedQueryAttributes,
    ) -> Result<SavedQuery, SaveError>;
}

/// User-facing notifications (toasts).
pub trait Notifier: Send + Sync {
    fn add_success(&self, text: &str);
    fn add_danger(&self, text: &str);
}

/// Notifier that only logs.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn add_success(&self, text: &str) {
        info!(notification = "success", "{}", text);
    }

    fn add_danger(&self, text: &str) {
        error!(notification = "danger", "{}", text);
    }
}

/// Runs save requests against a service and reports the outcome.
pub struct NamedFilterSaver<S, N> {
    service: S,
    notifier: N,
    labels: DisplayLabels,
}

impl<S: SavedQueryService, N: Notifier> NamedFilterSaver<S, N> {
    pub fn new(service: S, notifier: N, labels: DisplayLabels) -> Self {
        Self {
            service,
            notifier,
            labels,
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Save the request. Failures are notified, then returned.
    pub async fn save(&self, request: &SaveRequest) -> Result<SavedQuery, SaveError> {
        let attributes = request.attributes();

        let result = if request.save_as_new {
            self.service.create_query(attributes).await
        } else {
            match request.meta.id.as_deref() {
                Some(id) => self.service.update_query(id, attributes).await,
                None => Err(SaveError::MissingQueryId {
                    title: request.meta.title.clone(),
                }),
            }
        };

        match result {
            Ok(saved) => {
                info!(
                    request_id = %request.request_id,
                    group_id = %request.group_id,
                    saved_query = %saved.id,
                    "saved filter group"
                );
                self.notifier.add_success(&fill(
                    &self.labels.save_success,
                    &[("title", saved.attributes.title.as_str())],
                ));
                Ok(saved)
            }
            Err(e) => {
                warn!(
                    request_id = %request.request_id,
                    group_id = %request.group_id,
                    code = e.code(),
                    "failed to save filter group: {}",
                    e
                );
                let message = e.to_string();
                self.notifier.add_danger(&fill(
                    &self.labels.save_failure,
                    &[("error", message.as_str())],
                ));
                Err(e)
            }
        }
    }
}

/// In-process saved query store.
#[derive(Debug, Default)]
pub struct MemorySavedQueryService {
    queries: Mutex<BTreeMap<String, SavedQuery>>,
}

impl MemorySavedQueryService {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, SavedQuery>>, SaveError> {
        self.queries
            .lock()
            .map_err(|_| SaveError::Service("saved query store lock poisoned".to_string()))
    }

    pub fn get(&self, id: &str) -> Option<SavedQuery> {
        self.lock().ok()?.get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().map(|q| q.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn check_title(attributes: &SavedQueryAttributes) -> Result<(), SaveError> {
    if attributes.title.trim().is_empty() {
        return Err(SaveError::EmptyTitle);
    }
    Ok(())
}

#[async_trait]
impl SavedQueryService for MemorySavedQueryService {
    async fn create_query(&self, attributes: SavedQueryAttributes) -> Result<SavedQuery, SaveError> {
        check_title(&attributes)?;
        let saved = SavedQuery {
            id: Uuid::new_v4().to_string(),
            attributes,
            updated_at: Utc::now(),
        };
        self.lock()?.insert(saved.id.clone(), saved.clone());
        Ok(saved)
    }

    async fn update_query(
        &self,
        id: &str,
        attributes: SavedQueryAttributes,
    ) -> Result<SavedQuery, SaveError> {
        check_title(&attributes)?;
        let mut queries = self.lock()?;
        let existing = queries
            .get_mut(id)
            .ok_or_else(|| SaveError::NotFound(id.to_string()))?;
        existing.attributes = attributes;
        existing.updated_at = Utc::now();
        Ok(existing.clone())
    }
}
