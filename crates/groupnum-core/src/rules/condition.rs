//! Single string-matching condition.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How a condition compares its pattern against a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConditionKind {
    #[default]
    Contains,
    StartsWith,
    EndsWith,
    Equals,
}

impl ConditionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Contains => "contains",
            Self::StartsWith => "starts-with",
            Self::EndsWith => "ends-with",
            Self::Equals => "equals",
        }
    }
}

impl fmt::Display for ConditionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque identifier of a condition within a rule set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConditionId(Uuid);

impl ConditionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// First 8 hex digits, enough to tell conditions apart on screen.
    pub fn short(&self) -> String {
        self.0.simple().to_string().chars().take(8).collect()
    }
}

impl Default for ConditionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConditionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One atomic test of a value, optionally negated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    #[serde(default)]
    pub id: ConditionId,
    #[serde(default)]
    pub kind: ConditionKind,
    #[serde(default)]
    pub pattern: String,
    #[serde(default)]
    pub negate: bool,
}

impl Condition {
    pub fn new(kind: ConditionKind, pattern: impl Into<String>) -> Self {
        Self {
            id: ConditionId::new(),
            kind,
            pattern: pattern.into(),
            negate: false,
        }
    }

    /// Builder-style negation toggle.
    pub fn negated(mut self) -> Self {
        self.negate = !self.negate;
        self
    }

    /// Case-insensitive match of `value` against this condition.
    ///
    /// Total over all inputs: an empty pattern satisfies `contains`,
    /// `starts-with` and `ends-with` for every value, and `equals` only for
    /// the empty value.
    pub fn matches(&self, value: &str) -> bool {
        let value = value.to_lowercase();
        let pattern = self.pattern.to_lowercase();

        let hit = match self.kind {
            ConditionKind::Contains => value.contains(&pattern),
            ConditionKind::StartsWith => value.starts_with(&pattern),
            ConditionKind::EndsWith => value.ends_with(&pattern),
            ConditionKind::Equals => value == pattern,
        };

        hit != self.negate
    }
}

impl Default for Condition {
    /// The pass-through condition added to new groups: `contains ""`.
    fn default() -> Self {
        Self::new(ConditionKind::Contains, "")
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negate {
            write!(f, "not {} \"{}\"", self.kind, self.pattern)
        } else {
            write!(f, "{} \"{}\"", self.kind, self.pattern)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_is_case_insensitive() {
        let cond = Condition::new(ConditionKind::Contains, "APPLE");
        assert!(cond.matches("Applesauce"));
        assert!(cond.matches("pineapple"));
        assert!(!cond.matches("banana"));
    }

    #[test]
    fn test_starts_and_ends_with() {
        let starts = Condition::new(ConditionKind::StartsWith, "ch");
        let ends = Condition::new(ConditionKind::EndsWith, "RY");
        assert!(starts.matches("Cherry"));
        assert!(!starts.matches("Peach"));
        assert!(ends.matches("Cherry"));
        assert!(!ends.matches("Cherries"));
    }

    #[test]
    fn test_equals_requires_whole_value() {
        let cond = Condition::new(ConditionKind::Equals, "apple");
        assert!(cond.matches("Apple"));
        assert!(!cond.matches("Apples"));
    }

    #[test]
    fn test_negate_inverts_result() {
        let cond = Condition::new(ConditionKind::Contains, "c").negated();
        assert!(cond.matches("banana"));
        assert!(!cond.matches("Cherry"));
    }

    #[test]
    fn test_empty_pattern() {
        for kind in [
            ConditionKind::Contains,
            ConditionKind::StartsWith,
            ConditionKind::EndsWith,
        ] {
            assert!(Condition::new(kind, "").matches("anything"), "{kind}");
        }

        let equals = Condition::new(ConditionKind::Equals, "");
        assert!(equals.matches(""));
        assert!(!equals.matches("x"));
    }

    #[test]
    fn test_condition_ids_are_unique() {
        let a = Condition::default();
        let b = Condition::default();
        assert_ne!(a.id, b.id);
        assert_eq!(a.id.short().len(), 8);
    }
}
