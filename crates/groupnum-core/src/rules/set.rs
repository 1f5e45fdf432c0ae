//! Ordered rule set and the edits that transform it.
//!
//! A [`RuleSet`] is an immutable snapshot: [`RuleSet::apply`] returns a new
//! set and leaves the receiver untouched, so the caller owns the
//! read-modify-replace cycle.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::condition::{Condition, ConditionId, ConditionKind};
use super::group::{Group, GroupId};
use crate::error::{GroupnumError, Result};

const FIRST_GROUP_ID: u32 = 1;

/// Template written by `rule init`
pub const RULES_TEMPLATE: &str = r#"# groupnum rules file
#
# Groups are evaluated top to bottom. A value goes to the first group whose
# conditions ALL match, and is not considered by later groups.
#
# kind: contains | starts-with | ends-with | equals (case-insensitive)
# breakpoints: subgroup sizes; leftovers form one more subgroup
#
# [[group]]
# id = "1"
# breakpoints = [10, 10]
#
# [[group.condition]]
# kind = "contains"
# pattern = "apple"
# negate = false

next_group_id = 1
"#;

/// Field-level change to a single condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConditionEdit {
    SetKind(ConditionKind),
    SetPattern(String),
    SetNegate(bool),
}

/// Every mutation the rule editor can perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleEdit {
    AddGroup,
    RemoveGroup {
        group: GroupId,
    },
    AddCondition {
        group: GroupId,
    },
    UpdateCondition {
        group: GroupId,
        condition: ConditionId,
        edit: ConditionEdit,
    },
    RemoveCondition {
        group: GroupId,
        condition: ConditionId,
    },
    AddBreakpoint {
        group: GroupId,
    },
    /// `value` is clamped to at least 1.
    UpdateBreakpoint {
        group: GroupId,
        index: usize,
        value: i64,
    },
    RemoveBreakpoint {
        group: GroupId,
        index: usize,
    },
}

/// Groups in creation order plus the id the next group will receive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    #[serde(default = "first_group_id")]
    next_group_id: u32,
    #[serde(default, rename = "group")]
    groups: Vec<Group>,
}

fn first_group_id() -> u32 {
    FIRST_GROUP_ID
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleSet {
    pub fn new() -> Self {
        Self {
            next_group_id: FIRST_GROUP_ID,
            groups: Vec::new(),
        }
    }

    /// Build from explicit groups; `next_group_id` becomes one past the highest id.
    pub fn from_groups(groups: Vec<Group>) -> Result<Self> {
        let mut set = Self {
            next_group_id: FIRST_GROUP_ID,
            groups,
        };
        set.normalize()?;
        Ok(set)
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn group(&self, id: &GroupId) -> Option<&Group> {
        self.groups.iter().find(|g| &g.id == id)
    }

    pub fn next_group_id(&self) -> GroupId {
        GroupId::from_number(self.next_group_id)
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Apply one edit, producing the next snapshot.
    pub fn apply(&self, edit: RuleEdit) -> Result<Self> {
        let mut next = self.clone();

        match edit {
            RuleEdit::AddGroup => {
                let id = next.next_group_id;
                next.next_group_id = id
                    .checked_add(1)
                    .ok_or(GroupnumError::GroupIdExhausted { last: id })?;
                next.groups.push(Group::new(GroupId::from_number(id)));
            }
            RuleEdit::RemoveGroup { group } => {
                let pos = next.position(&group)?;
                next.groups.remove(pos);
            }
            RuleEdit::AddCondition { group } => {
                next.group_mut(&group)?.conditions.push(Condition::default());
            }
            RuleEdit::UpdateCondition {
                group,
                condition,
                edit,
            } => {
                let cond = next
                    .group_mut(&group)?
                    .condition_mut(condition)
                    .ok_or_else(|| condition_not_found(&group, condition))?;
                match edit {
                    ConditionEdit::SetKind(kind) => cond.kind = kind,
                    ConditionEdit::SetPattern(pattern) => cond.pattern = pattern,
                    ConditionEdit::SetNegate(negate) => cond.negate = negate,
                }
            }
            RuleEdit::RemoveCondition { group, condition } => {
                let g = next.group_mut(&group)?;
                let before = g.conditions.len();
                g.conditions.retain(|c| c.id != condition);
                if g.conditions.len() == before {
                    return Err(condition_not_found(&group, condition));
                }
            }
            RuleEdit::AddBreakpoint { group } => {
                next.group_mut(&group)?.breakpoints.push(1);
            }
            RuleEdit::UpdateBreakpoint {
                group,
                index,
                value,
            } => {
                let bp = next
                    .group_mut(&group)?
                    .breakpoints
                    .get_mut(index)
                    .ok_or_else(|| breakpoint_not_found(&group, index))?;
                *bp = usize::try_from(value.max(1)).unwrap_or(usize::MAX);
            }
            RuleEdit::RemoveBreakpoint { group, index } => {
                let g = next.group_mut(&group)?;
                if index >= g.breakpoints.len() {
                    return Err(breakpoint_not_found(&group, index));
                }
                g.breakpoints.remove(index);
            }
        }

        Ok(next)
    }

    /// Apply a sequence of edits in order, stopping at the first failure.
    pub fn apply_all(&self, edits: impl IntoIterator<Item = RuleEdit>) -> Result<Self> {
        edits
            .into_iter()
            .try_fold(self.clone(), |set, edit| set.apply(edit))
    }

    /// Parse and validate a rules document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let mut set: RuleSet = toml::from_str(content)?;
        set.normalize()?;
        Ok(set)
    }

    /// Load a rules file. A missing file yields an empty rule set.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content).map_err(|e| GroupnumError::RulesParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Write the commented template if no rules file exists yet.
    pub fn init(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        if !path.exists() {
            fs::write(path, RULES_TEMPLATE)?;
        }
        Ok(())
    }

    /// Validate ids, clamp breakpoints and keep `next_group_id` ahead of every id.
    ///
    /// Ids must be distinct canonical positive integers; anything else could
    /// collide with a lettered subgroup number.
    fn normalize(&mut self) -> Result<()> {
        let mut seen = HashSet::with_capacity(self.groups.len());
        let mut highest = 0;

        for group in &mut self.groups {
            let n = canonical_number(&group.id)?;
            if !seen.insert(n) {
                return Err(invalid_group_id(&group.id, "duplicate id"));
            }
            highest = highest.max(n);

            for bp in &mut group.breakpoints {
                *bp = (*bp).max(1);
            }
        }

        let after_highest = highest
            .checked_add(1)
            .ok_or(GroupnumError::GroupIdExhausted { last: highest })?;
        self.next_group_id = self.next_group_id.max(after_highest).max(FIRST_GROUP_ID);
        Ok(())
    }

    fn position(&self, id: &GroupId) -> Result<usize> {
        self.groups
            .iter()
            .position(|g| &g.id == id)
            .ok_or_else(|| GroupnumError::GroupNotFound {
                id: id.to_string(),
            })
    }

    fn group_mut(&mut self, id: &GroupId) -> Result<&mut Group> {
        let pos = self.position(id)?;
        Ok(&mut self.groups[pos])
    }
}

fn canonical_number(id: &GroupId) -> Result<u32> {
    match id.number() {
        Some(n) if n >= FIRST_GROUP_ID && n.to_string() == id.as_str() => Ok(n),
        _ => Err(invalid_group_id(id, "expected a positive integer")),
    }
}

fn invalid_group_id(id: &GroupId, reason: &str) -> GroupnumError {
    GroupnumError::InvalidGroupId {
        id: id.to_string(),
        reason: reason.to_string(),
    }
}

fn condition_not_found(group: &GroupId, condition: ConditionId) -> GroupnumError {
    GroupnumError::ConditionNotFound {
        group: group.to_string(),
        condition: condition.to_string(),
    }
}

fn breakpoint_not_found(group: &GroupId, index: usize) -> GroupnumError {
    GroupnumError::BreakpointNotFound {
        group: group.to_string(),
        index,
    }
}
