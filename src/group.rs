//! Filter groups and the mutations the badge menu applies to them.
//!
//! A group is an ordered, non-empty list of predicates sharing one group id.
//! Mutations never edit a group in place: they return the updated predicate
//! list, which the caller hands back to the owning query subsystem.

use crate::error::FilterError;
use crate::predicate::{FilterPredicate, GroupId};
use tracing::warn;

/// Ordered predicates sharing one group id.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterGroup {
    id: GroupId,
    predicates: Vec<FilterPredicate>,
}

/// A run of predicates sharing a sub-group id, in first-seen order.
#[derive(Debug, Clone, PartialEq)]
pub struct SubGroup<'a> {
    pub id: &'a str,
    pub members: Vec<&'a FilterPredicate>,
}

impl SubGroup<'_> {
    /// Sub-groups with more than one member are parenthesised.
    pub fn needs_parenthesis(&self) -> bool {
        self.members.len() > 1
    }
}

impl FilterGroup {
    /// Build a group, checking that every predicate carries `id`.
    ///
    /// # Errors
    /// `EmptyGroup` if `predicates` is empty, `ForeignMember` if a predicate
    /// belongs to another group.
    pub fn new(id: GroupId, predicates: Vec<FilterPredicate>) -> Result<Self, FilterError> {
        let Some(first) = predicates.first() else {
            return Err(FilterError::EmptyGroup { group_id: id });
        };

        if let Some(foreign) = predicates.iter().find(|p| p.group_id != id) {
            return Err(FilterError::ForeignMember {
                group_id: id,
                found: foreign.group_id,
                key: foreign.key.clone(),
            });
        }

        let negated = first.group_negated;
        if predicates.iter().any(|p| p.group_negated != negated) {
            warn!(
                group_id = %id,
                "group members disagree on group negation; using the first member"
            );
        }

        Ok(Self { id, predicates })
    }

    /// Build a group from predicates, taking the id from the first one.
    pub fn from_predicates(predicates: Vec<FilterPredicate>) -> Result<Self, FilterError> {
        let id = predicates.first().map(|p| p.group_id).unwrap_or_default();
        Self::new(id, predicates)
    }

    pub fn id(&self) -> GroupId {
        self.id
    }

    pub fn predicates(&self) -> &[FilterPredicate] {
        &self.predicates
    }

    pub fn into_predicates(self) -> Vec<FilterPredicate> {
        self.predicates
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    /// Always false for a constructed group.
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// Relationship labels are only shown for groups of more than one predicate.
    pub fn is_compound(&self) -> bool {
        self.predicates.len() > 1
    }

    fn first(&self) -> &FilterPredicate {
        // Non-empty by construction.
        &self.predicates[0]
    }

    pub fn is_negated(&self) -> bool {
        self.first().group_negated
    }

    pub fn is_disabled(&self) -> bool {
        self.first().disabled
    }

    /// Custom badge label of a group saved as a named filter.
    pub fn custom_label(&self) -> Option<&str> {
        self.first().alias.as_deref()
    }

    /// Partition by sub-group id, preserving first-seen order of sub-groups
    /// and member order within each.
    pub fn sub_groups(&self) -> Vec<SubGroup<'_>> {
        let mut groups: Vec<SubGroup<'_>> = Vec::new();
        for predicate in &self.predicates {
            match groups
                .iter_mut()
                .find(|g| g.id == predicate.sub_group_id.as_str())
            {
                Some(group) => group.members.push(predicate),
                None => groups.push(SubGroup {
                    id: &predicate.sub_group_id,
                    members: vec![predicate],
                }),
            }
        }
        groups
    }

    /// Flip group negation on every member, based on the first member's value.
    pub fn toggled_negation(&self) -> Vec<FilterPredicate> {
        let negated = !self.is_negated();
        self.predicates
            .iter()
            .cloned()
            .map(|mut p| {
                p.group_negated = negated;
                p
            })
            .collect()
    }

    /// Flip `disabled` on each member independently.
    pub fn toggled_disabled(&self) -> Vec<FilterPredicate> {
        self.predicates
            .iter()
            .cloned()
            .map(|mut p| {
                p.disabled = !p.disabled;
                p
            })
            .collect()
    }

    /// Copies of the members under group id `groups_count + 1`, followed by
    /// the original members.
    ///
    /// # Errors
    /// `GroupIdExhausted` when `groups_count` is already `u32::MAX`.
    pub fn duplicated(&self, groups_count: u32) -> Result<Vec<FilterPredicate>, FilterError> {
        let copy_id = groups_count
            .checked_add(1)
            .map(GroupId)
            .ok_or(FilterError::GroupIdExhausted {
                group_id: self.id,
                groups_count,
            })?;
        let mut result: Vec<FilterPredicate> = self
            .predicates
            .iter()
            .cloned()
            .map(|mut p| {
                p.group_id = copy_id;
                p
            })
            .collect();
        result.extend(self.predicates.iter().cloned());
        Ok(result)
    }
}

/// Split a flat predicate list into groups, in first-seen group order.
pub fn group_by_group_id(predicates: &[FilterPredicate]) -> Vec<FilterGroup> {
    let mut buckets: Vec<(GroupId, Vec<FilterPredicate>)> = Vec::new();
    for predicate in predicates {
        match buckets.iter_mut().find(|(id, _)| *id == predicate.group_id) {
            Some((_, members)) => members.push(predicate.clone()),
            None => buckets.push((predicate.group_id, vec![predicate.clone()])),
        }
    }
    // Buckets are non-empty and homogeneous, so construction cannot fail.
    buckets
        .into_iter()
        .filter_map(|(id, members)| FilterGroup::new(id, members).ok())
        .collect()
}

/// Set `alias` on every predicate of `group_id`, leaving other groups untouched.
pub fn apply_alias(
    predicates: &[FilterPredicate],
    group_id: GroupId,
    alias: &str,
) -> Vec<FilterPredicate> {
    predicates
        .iter()
        .cloned()
        .map(|mut p| {
            if p.group_id == group_id {
                p.alias = Some(alias.to_string());
            }
            p
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicate::Relationship;
    use pretty_assertions::assert_eq;

    fn sample_group() -> FilterGroup {
        FilterGroup::new(
            GroupId(1),
            vec![
                FilterPredicate::exists("a").in_group(1).in_sub_group("x"),
                FilterPredicate::exists("b").in_group(1).in_sub_group("y"),
                FilterPredicate::exists("c").in_group(1).in_sub_group("x"),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_empty_group_rejected() {
        let err = FilterGroup::new(GroupId(2), Vec::new()).unwrap_err();
        assert_eq!(err, FilterError::EmptyGroup { group_id: GroupId(2) });
    }

    #[test]
    fn test_foreign_member_rejected() {
        let err = FilterGroup::new(
            GroupId(1),
            vec![
                FilterPredicate::exists("a").in_group(1),
                FilterPredicate::exists("b").in_group(2),
            ],
        )
        .unwrap_err();
        assert_eq!(err.code(), "FOREIGN_MEMBER");
    }

    #[test]
    fn test_first_member_negation_is_authoritative() {
        let group = FilterGroup::from_predicates(vec![
            FilterPredicate::exists("a").with_group_negated(true),
            FilterPredicate::exists("b").with_group_negated(false),
        ])
        .unwrap();
        assert!(group.is_negated());
    }

    #[test]
    fn test_sub_groups_keep_first_seen_order() {
        let group = sample_group();
        let subs = group.sub_groups();
        assert_eq!(subs.len(), 2);
        assert_eq!(subs[0].id, "x");
        assert_eq!(
            subs[0].members.iter().map(|p| p.key.as_str()).collect::<Vec<_>>(),
            vec!["a", "c"]
        );
        assert!(subs[0].needs_parenthesis());
        assert!(!subs[1].needs_parenthesis());
    }

    #[test]
    fn test_toggled_negation_flips_from_first() {
        let group = FilterGroup::from_predicates(vec![
            FilterPredicate::exists("a"),
            FilterPredicate::exists("b").with_group_negated(true),
        ])
        .unwrap();
        let toggled = group.toggled_negation();
        assert!(toggled.iter().all(|p| p.group_negated));
    }

    #[test]
    fn test_toggled_disabled_flips_each() {
        let group = FilterGroup::from_predicates(vec![
            FilterPredicate::exists("a"),
            FilterPredicate::exists("b").disabled(),
        ])
        .unwrap();
        let toggled = group.toggled_disabled();
        assert!(toggled[0].disabled);
        assert!(!toggled[1].disabled);
    }

    #[test]
    fn test_duplicated_prepends_copies_under_new_id() {
        let group = FilterGroup::from_predicates(vec![
            FilterPredicate::exists("a").in_group(2).with_relationship(Relationship::And),
            FilterPredicate::exists("b").in_group(2),
        ])
        .unwrap();
        let duplicated = group.duplicated(3).unwrap();
        let ids: Vec<u32> = duplicated.iter().map(|p| p.group_id.0).collect();
        assert_eq!(ids, vec![4, 4, 2, 2]);
        assert_eq!(duplicated[0].key, "a");
        assert_eq!(duplicated[2].key, "a");
    }

    #[test]
    fn test_duplicate_without_free_group_id() {
        let group = FilterGroup::from_predicates(vec![FilterPredicate::exists("a").in_group(7)]).unwrap();
        let err = group.duplicated(u32::MAX).unwrap_err();
        assert_eq!(err.code(), "GROUP_ID_EXHAUSTED");
        assert_eq!(
            err,
            FilterError::GroupIdExhausted {
                group_id: GroupId(7),
                groups_count: u32::MAX,
            }
        );
    }

    #[test]
    fn test_group_by_group_id() {
        let flat = vec![
            FilterPredicate::exists("a").in_group(5),
            FilterPredicate::exists("b").in_group(1),
            FilterPredicate::exists("c").in_group(5),
        ];
        let groups = group_by_group_id(&flat);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].id(), GroupId(5));
        assert_eq!(groups[0].len(), 2);
        assert_eq!(groups[1].predicates()[0].key, "b");
    }

    #[test]
    fn test_apply_alias_targets_one_group() {
        let flat = vec![
            FilterPredicate::exists("a").in_group(1),
            FilterPredicate::exists("b").in_group(2),
        ];
        let aliased = apply_alias(&flat, GroupId(2), "Errors only");
        assert_eq!(aliased[0].alias, None);
        assert_eq!(aliased[1].alias.as_deref(), Some("Errors only"));
    }
}
