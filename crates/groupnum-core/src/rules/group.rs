//! Filter group: an ordered list of AND-combined conditions plus breakpoints.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::condition::{Condition, ConditionId};

/// Sequential group label ("1", "2", ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(String);

impl GroupId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn from_number(n: u32) -> Self {
        Self(n.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric value of the label, if it is one.
    pub fn number(&self) -> Option<u32> {
        self.0.parse().ok()
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GroupId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// A named bucket of classification rules with optional subdivision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    /// Subgroup sizes, each at least 1.
    #[serde(default)]
    pub breakpoints: Vec<usize>,
    #[serde(default, rename = "condition")]
    pub conditions: Vec<Condition>,
}

impl Group {
    /// New group with the default pass-through condition and no breakpoints.
    pub fn new(id: GroupId) -> Self {
        Self {
            id,
            conditions: vec![Condition::default()],
            breakpoints: Vec::new(),
        }
    }

    pub fn with_conditions(id: GroupId, conditions: Vec<Condition>) -> Self {
        Self {
            id,
            conditions,
            breakpoints: Vec::new(),
        }
    }

    pub fn with_breakpoints(mut self, breakpoints: Vec<usize>) -> Self {
        self.breakpoints = breakpoints.into_iter().map(|bp| bp.max(1)).collect();
        self
    }

    /// True when every condition holds. A group without conditions matches nothing.
    pub fn matches(&self, value: &str) -> bool {
        !self.conditions.is_empty() && self.conditions.iter().all(|c| c.matches(value))
    }

    pub fn condition(&self, id: ConditionId) -> Option<&Condition> {
        self.conditions.iter().find(|c| c.id == id)
    }

    pub(crate) fn condition_mut(&mut self, id: ConditionId) -> Option<&mut Condition> {
        self.conditions.iter_mut().find(|c| c.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::ConditionKind;

    #[test]
    fn test_conditions_combine_with_and() {
        let group = Group::with_conditions(
            GroupId::from_number(1),
            vec![
                Condition::new(ConditionKind::Contains, "a"),
                Condition::new(ConditionKind::Contains, "c").negated(),
            ],
        );

        assert!(group.matches("Apple"));
        assert!(group.matches("banana"));
        assert!(!group.matches("Cherry"));
        assert!(!group.matches("plum"));
    }

    #[test]
    fn test_group_without_conditions_matches_nothing() {
        let group = Group::with_conditions(GroupId::from_number(1), Vec::new());
        assert!(!group.matches("anything"));
        assert!(!group.matches(""));
    }

    #[test]
    fn test_new_group_passes_everything_through() {
        let group = Group::new(GroupId::from_number(3));
        assert_eq!(group.conditions.len(), 1);
        assert!(group.matches("whatever"));
        assert!(group.breakpoints.is_empty());
    }

    #[test]
    fn test_with_breakpoints_clamps_zero() {
        let group = Group::new(GroupId::from_number(1)).with_breakpoints(vec![0, 3]);
        assert_eq!(group.breakpoints, vec![1, 3]);
    }

    #[test]
    fn test_group_id_number() {
        assert_eq!(GroupId::from_number(12).number(), Some(12));
        assert_eq!(GroupId::new("x").number(), None);
    }
}
