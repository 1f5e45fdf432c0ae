//! # Rules Module
//!
//! Filter rules that drive classification.
//!
//! - `condition`: one case-insensitive string test, optionally negated
//! - `group`: AND-combined conditions plus subgroup breakpoints
//! - `set`: ordered groups, the edit reducer and the TOML rules document
//!
//! ```rust
//! use groupnum_core::rules::{ConditionEdit, GroupId, RuleEdit, RuleSet};
//!
//! let rules = RuleSet::new().apply(RuleEdit::AddGroup).unwrap();
//! let group = GroupId::from_number(1);
//! let condition = rules.groups()[0].conditions[0].id;
//!
//! let rules = rules
//!     .apply(RuleEdit::UpdateCondition {
//!         group: group.clone(),
//!         condition,
//!         edit: ConditionEdit::SetPattern("apple".to_string()),
//!     })
//!     .unwrap();
//!
//! assert!(rules.group(&group).unwrap().matches("Applesauce"));
//! assert_eq!(rules.next_group_id().as_str(), "2");
//! ```

mod condition;
mod group;
mod set;

pub use condition::{Condition, ConditionId, ConditionKind};
pub use group::{Group, GroupId};
pub use set::{ConditionEdit, RuleEdit, RuleSet, RULES_TEMPLATE};
