//! # Engine Module
//!
//! Pure classification and numbering pipeline.
//!
//! ```text
//! values ─ classify ─▶ per-group matches ─ split ─▶ subgroups
//!                                              └─ number ─▶ listing / grid
//! ```
//!
//! - `classify`: disjoint, first-group-wins partition of the value list
//! - `split`: breakpoint subgroups with letter suffixes
//! - `numbering`: `{base}.{group}{suffix}.{position}` identifiers
//! - `table`: side-by-side export grid
//!
//! Nothing here fails or mutates its inputs. A [`Snapshot`] is evaluated
//! from scratch every time.
//!
//! ```rust
//! use groupnum_core::engine::Snapshot;
//! use groupnum_core::rules::{Condition, ConditionKind, Group, GroupId, RuleSet};
//!
//! let rules = RuleSet::from_groups(vec![Group::with_conditions(
//!     GroupId::from_number(1),
//!     vec![Condition::new(ConditionKind::Contains, "apple")],
//! )])?;
//! let snapshot = Snapshot::new(
//!     vec!["Apple".into(), "banana".into(), "Applesauce".into(), "Cherry".into()],
//!     rules,
//!     "13",
//! );
//!
//! let report = snapshot.evaluate();
//! let numbers: Vec<&str> = report.items.iter().map(|i| i.number.as_str()).collect();
//! assert_eq!(numbers, vec!["13.1.1", "13.2.1", "13.1.2", "13.2.2"]);
//! # Ok::<(), groupnum_core::GroupnumError>(())
//! ```

mod classify;
mod numbering;
mod split;
mod table;

pub use classify::{classify, Classification, Entry, GroupMatch};
pub use numbering::{
    generate_number, group_label, listing, number_groups, number_unmatched, ClassifiedItem,
    NumberedEntry, NumberedGroup, NumberedUnmatched, Source,
};
pub use split::{split, suffix_for, Subgroup};
pub use table::{build_table, Grid};

use serde::Serialize;

use crate::rules::RuleSet;

/// Default prefix for every generated number
pub const DEFAULT_BASE_NUMBER: &str = "13";

/// Everything the derived views depend on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub values: Vec<String>,
    pub rules: RuleSet,
    pub base_number: String,
}

/// Value counts shown alongside the listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Stats {
    pub total: usize,
    pub matched: usize,
    pub unmatched: usize,
}

/// All views derived from one [`Snapshot`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub base_number: String,
    pub groups: Vec<NumberedGroup>,
    pub unmatched: NumberedUnmatched,
    /// Listing in original value order.
    pub items: Vec<ClassifiedItem>,
    pub stats: Stats,
}

impl Report {
    /// Export grid for this report.
    pub fn grid(&self) -> Grid {
        build_table(&self.groups, &self.unmatched, &self.base_number)
    }
}

impl Snapshot {
    pub fn new(values: Vec<String>, rules: RuleSet, base_number: impl Into<String>) -> Self {
        Self {
            values,
            rules,
            base_number: base_number.into(),
        }
    }

    pub fn classify(&self) -> Classification {
        classify(&self.values, self.rules.groups())
    }

    pub fn evaluate(&self) -> Report {
        let base = self.base_number.as_str();
        let classification = self.classify();

        let groups = number_groups(base, &classification, self.rules.groups());
        let unmatched = number_unmatched(
            base,
            &classification.unmatched,
            &self.rules.next_group_id(),
        );
        let items = listing(&groups, &unmatched);

        let stats = Stats {
            total: self.values.len(),
            matched: classification.matched_count(),
            unmatched: classification.unmatched_count(),
        };

        Report {
            base_number: self.base_number.clone(),
            groups,
            unmatched,
            items,
            stats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{Condition, ConditionKind, Group, GroupId};

    fn fruits() -> Vec<String> {
        ["Apple", "banana", "Applesauce", "Cherry"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn numbers_of(group: &NumberedGroup) -> Vec<&str> {
        group.entries().map(|e| e.number.as_str()).collect()
    }

    #[test]
    fn test_contains_group_and_unmatched_numbers() {
        let rules = RuleSet::from_groups(vec![Group::with_conditions(
            GroupId::from_number(1),
            vec![Condition::new(ConditionKind::Contains, "apple")],
        )])
        .unwrap();
        let report = Snapshot::new(fruits(), rules, "13").evaluate();

        assert_eq!(numbers_of(&report.groups[0]), vec!["13.1.1", "13.1.2"]);
        let unmatched: Vec<(&str, &str)> = report
            .unmatched
            .entries
            .iter()
            .map(|e| (e.number.as_str(), e.value.as_str()))
            .collect();
        assert_eq!(unmatched, vec![("13.2.1", "banana"), ("13.2.2", "Cherry")]);
        assert_eq!(
            report.stats,
            Stats {
                total: 4,
                matched: 2,
                unmatched: 2
            }
        );
    }

    #[test]
    fn test_no_groups_numbers_under_group_one() {
        let report = Snapshot::new(fruits(), RuleSet::new(), "13").evaluate();
        let numbers: Vec<&str> = report.items.iter().map(|i| i.number.as_str()).collect();
        assert_eq!(numbers, vec!["13.1.1", "13.1.2", "13.1.3", "13.1.4"]);
        assert!(report.items.iter().all(|i| i.source == Source::Unmatched));
    }

    #[test]
    fn test_empty_values_give_header_only_grid() {
        let rules = RuleSet::from_groups(vec![Group::new(GroupId::from_number(1))]).unwrap();
        let report = Snapshot::new(Vec::new(), rules, "13").evaluate();

        assert!(report.groups[0].subgroups.is_empty());
        assert!(report.unmatched.entries.is_empty());
        assert_eq!(report.grid(), vec![vec!["".to_string(), "13.1".to_string()]]);
    }

    #[test]
    fn test_evaluate_is_idempotent() {
        let rules = RuleSet::from_groups(vec![Group::with_conditions(
            GroupId::from_number(1),
            vec![Condition::new(ConditionKind::EndsWith, "e")],
        )
        .with_breakpoints(vec![1])])
        .unwrap();
        let snapshot = Snapshot::new(fruits(), rules, "7");
        assert_eq!(snapshot.evaluate(), snapshot.evaluate());
    }
}
