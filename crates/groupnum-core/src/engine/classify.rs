//! Group Classifier
//!
//! Partitions an ordered value list into disjoint group buckets, first group wins.

use serde::Serialize;
use tracing::debug;

use crate::rules::{Group, GroupId};

/// One imported value together with its position in the input list.
///
/// Position is the identity: duplicate strings are separate entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    pub index: usize,
    pub value: String,
}

/// Values claimed by one group, in original order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupMatch {
    pub group: GroupId,
    pub entries: Vec<Entry>,
}

impl GroupMatch {
    pub fn values(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.value.as_str()).collect()
    }
}

/// Result of classifying a value list against a rule set.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Classification {
    /// One entry per group, in rule order (empty groups included).
    pub groups: Vec<GroupMatch>,
    /// Values no group claimed, in original order.
    pub unmatched: Vec<Entry>,
}

impl Classification {
    pub fn group(&self, id: &GroupId) -> Option<&GroupMatch> {
        self.groups.iter().find(|g| &g.group == id)
    }

    pub fn matched_count(&self) -> usize {
        self.groups.iter().map(|g| g.entries.len()).sum()
    }

    pub fn unmatched_count(&self) -> usize {
        self.unmatched.len()
    }

    pub fn unmatched_values(&self) -> Vec<&str> {
        self.unmatched.iter().map(|e| e.value.as_str()).collect()
    }
}

/// Classify `values` against `groups` in order.
///
/// Each group sees only the entries earlier groups left behind. Removal is
/// by position, so every input position ends up in exactly one bucket.
pub fn classify<S: AsRef<str>>(values: &[S], groups: &[Group]) -> Classification {
    let mut remaining: Vec<Entry> = values
        .iter()
        .enumerate()
        .map(|(index, v)| Entry {
            index,
            value: v.as_ref().to_string(),
        })
        .collect();

    let mut matches = Vec::with_capacity(groups.len());
    for group in groups {
        let (claimed, rest): (Vec<Entry>, Vec<Entry>) = remaining
            .into_iter()
            .partition(|entry| group.matches(&entry.value));

        debug!(
            group = %group.id,
            matched = claimed.len(),
            remaining = rest.len(),
            "classified group"
        );

        matches.push(GroupMatch {
            group: group.id.clone(),
            entries: claimed,
        });
        remaining = rest;
    }

    Classification {
        groups: matches,
        unmatched: remaining,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{Condition, ConditionKind};

    fn fruits() -> Vec<&'static str> {
        vec!["Apple", "banana", "Applesauce", "Cherry"]
    }

    fn group(id: u32, conditions: Vec<Condition>) -> Group {
        Group::with_conditions(GroupId::from_number(id), conditions)
    }

    #[test]
    fn test_single_contains_group() {
        let groups = vec![group(1, vec![Condition::new(ConditionKind::Contains, "apple")])];
        let result = classify(&fruits(), &groups);

        assert_eq!(result.groups[0].values(), vec!["Apple", "Applesauce"]);
        assert_eq!(result.unmatched_values(), vec!["banana", "Cherry"]);
    }

    #[test]
    fn test_and_with_negation() {
        let groups = vec![group(
            1,
            vec![
                Condition::new(ConditionKind::Contains, "a"),
                Condition::new(ConditionKind::Contains, "c").negated(),
            ],
        )];
        let result = classify(&fruits(), &groups);

        assert_eq!(
            result.groups[0].values(),
            vec!["Apple", "banana", "Applesauce"]
        );
        assert_eq!(result.unmatched_values(), vec!["Cherry"]);
    }

    #[test]
    fn test_first_group_wins() {
        let groups = vec![
            group(1, vec![Condition::new(ConditionKind::StartsWith, "app")]),
            group(2, vec![Condition::new(ConditionKind::Contains, "a")]),
        ];
        let result = classify(&fruits(), &groups);

        assert_eq!(result.groups[0].values(), vec!["Apple", "Applesauce"]);
        assert_eq!(result.groups[1].values(), vec!["banana"]);
        assert_eq!(result.unmatched_values(), vec!["Cherry"]);
    }

    #[test]
    fn test_no_groups_leaves_everything_unmatched() {
        let result = classify(&fruits(), &[]);
        assert!(result.groups.is_empty());
        assert_eq!(result.unmatched_count(), 4);
    }

    #[test]
    fn test_empty_values() {
        let groups = vec![group(1, vec![Condition::default()])];
        let result = classify::<&str>(&[], &groups);
        assert_eq!(result.groups.len(), 1);
        assert!(result.groups[0].entries.is_empty());
        assert!(result.unmatched.is_empty());
    }

    #[test]
    fn test_group_without_conditions_claims_nothing() {
        let groups = vec![group(1, Vec::new())];
        let result = classify(&fruits(), &groups);
        assert!(result.groups[0].entries.is_empty());
        assert_eq!(result.unmatched_count(), 4);
    }

    #[test]
    fn test_duplicates_are_kept_per_position() {
        let values = vec!["kiwi", "plum", "kiwi"];
        let groups = vec![group(1, vec![Condition::new(ConditionKind::Equals, "kiwi")])];
        let result = classify(&values, &groups);

        let indices: Vec<usize> = result.groups[0].entries.iter().map(|e| e.index).collect();
        assert_eq!(indices, vec![0, 2]);
        assert_eq!(result.unmatched_values(), vec!["plum"]);
    }

    #[test]
    fn test_classify_is_idempotent() {
        let groups = vec![group(1, vec![Condition::new(ConditionKind::EndsWith, "e")])];
        assert_eq!(classify(&fruits(), &groups), classify(&fruits(), &groups));
    }
}
