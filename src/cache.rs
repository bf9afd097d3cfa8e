//! Render cache keyed by a stable fingerprint of the render input.
//!
//! The fingerprint is SHA-256 over the canonical JSON of the formatter
//! (value formatter type and config), the group and the schemas,
//! hex-encoded. Any change to a predicate, to the schemas in view or to the
//! display config changes the key, so entries never go stale; they are only
//! evicted for space, oldest first.

use crate::config::FormatterConfig;
use crate::formatter::ExpressionFormatter;
use crate::group::FilterGroup;
use crate::label::ValueFormatter;
use crate::schema::IndexSchema;
use crate::segment::RenderedExpression;
use sha2::{Digest, Sha256};
use std::collections::{HashMap, VecDeque};
use std::fmt;
use tracing::{debug, warn};

/// Stable identity of a render input.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn of<F: ValueFormatter>(
        formatter: &ExpressionFormatter<F>,
        group: &FilterGroup,
        schemas: &[IndexSchema],
    ) -> Result<Self, serde_json::Error> {
        let mut hasher = Sha256::new();
        serde_json::to_writer(
            &mut hasher,
            &(
                std::any::type_name::<F>(),
                formatter.config(),
                group.id(),
                group.predicates(),
                schemas,
            ),
        )?;
        Ok(Self(hex::encode(hasher.finalize())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", &self.0[..12.min(self.0.len())])
    }
}

/// Bounded cache of rendered expressions.
#[derive(Debug)]
pub struct ExpressionCache {
    capacity: usize,
    entries: HashMap<Fingerprint, RenderedExpression>,
    order: VecDeque<Fingerprint>,
    hits: u64,
    misses: u64,
}

impl ExpressionCache {
    /// A capacity of 0 disables caching.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
            hits: 0,
            misses: 0,
        }
    }

    /// Cache sized by `cache_capacity`.
    pub fn from_config(config: &FormatterConfig) -> Self {
        Self::new(config.cache_capacity)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Return the cached render for this input, rendering on a miss.
    pub fn get_or_render<F: ValueFormatter>(
        &mut self,
        formatter: &ExpressionFormatter<F>,
        group: &FilterGroup,
        schemas: &[IndexSchema],
    ) -> RenderedExpression {
        if self.capacity == 0 {
            self.misses += 1;
            return formatter.render(group, schemas);
        }

        let fingerprint = match Fingerprint::of(formatter, group, schemas) {
            Ok(fp) => fp,
            Err(e) => {
                warn!(group_id = %group.id(), error = %e, "cannot fingerprint group, rendering uncached");
                self.misses += 1;
                return formatter.render(group, schemas);
            }
        };

        if let Some(cached) = self.entries.get(&fingerprint) {
            self.hits += 1;
            return cached.clone();
        }

        self.misses += 1;
        let rendered = formatter.render(group, schemas);
        self.insert(fingerprint, rendered.clone());
        rendered
    }

    fn insert(&mut self, fingerprint: Fingerprint, rendered: RenderedExpression) {
        while self.entries.len() >= self.capacity {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            debug!(fingerprint = ?oldest, "evicting cached render");
            self.entries.remove(&oldest);
        }
        self.order.push_back(fingerprint.clone());
        self.entries.insert(fingerprint, rendered);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}
