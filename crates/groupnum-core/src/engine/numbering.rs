//! Numbering Generator
//!
//! Hierarchical identifiers: `{base}.{group}{suffix}.{position}`.

use serde::Serialize;

use super::classify::{Classification, Entry};
use super::split::{split, Subgroup};
use crate::rules::{Group, GroupId};

/// Identifier for the value at 1-based `position` in a subgroup.
///
/// An empty `suffix` yields `{base}.{group}.{position}`.
pub fn generate_number(base: &str, group: &GroupId, suffix: &str, position: usize) -> String {
    format!("{base}.{group}{suffix}.{position}")
}

/// Heading for a group column, e.g. `13.2`.
pub fn group_label(base: &str, group: &GroupId) -> String {
    format!("{base}.{group}")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NumberedEntry {
    pub index: usize,
    pub value: String,
    pub number: String,
}

/// A group's matched values, split into subgroups and numbered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NumberedGroup {
    pub group: GroupId,
    pub subgroups: Vec<Subgroup<NumberedEntry>>,
}

impl NumberedGroup {
    pub fn entries(&self) -> impl Iterator<Item = &NumberedEntry> {
        self.subgroups.iter().flat_map(|s| s.items.iter())
    }
}

/// Unmatched values, numbered under the next unassigned group id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NumberedUnmatched {
    pub group: GroupId,
    pub entries: Vec<NumberedEntry>,
}

/// Where a listed value came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Group(GroupId),
    Unmatched,
}

impl Source {
    pub fn label(&self, base: &str) -> String {
        match self {
            Self::Group(id) => group_label(base, id),
            Self::Unmatched => "Unmatched".to_string(),
        }
    }
}

/// One row of the on-screen listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifiedItem {
    pub index: usize,
    pub value: String,
    pub source: Source,
    pub number: String,
}

fn numbered(base: &str, group: &GroupId, suffix: &str, entries: &[Entry]) -> Vec<NumberedEntry> {
    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| NumberedEntry {
            index: entry.index,
            value: entry.value.clone(),
            number: generate_number(base, group, suffix, i + 1),
        })
        .collect()
}

/// Split and number every group's matches.
///
/// `groups` must be the rule order that produced `classification`.
pub fn number_groups(
    base: &str,
    classification: &Classification,
    groups: &[Group],
) -> Vec<NumberedGroup> {
    classification
        .groups
        .iter()
        .map(|matched| {
            let breakpoints = groups
                .iter()
                .find(|g| g.id == matched.group)
                .map(|g| g.breakpoints.as_slice())
                .unwrap_or_default();

            let subgroups = split(&matched.entries, breakpoints)
                .into_iter()
                .map(|sub| Subgroup {
                    items: numbered(base, &matched.group, &sub.suffix, &sub.items),
                    suffix: sub.suffix,
                })
                .collect();

            NumberedGroup {
                group: matched.group.clone(),
                subgroups,
            }
        })
        .collect()
}

pub fn number_unmatched(base: &str, unmatched: &[Entry], next_group: &GroupId) -> NumberedUnmatched {
    NumberedUnmatched {
        group: next_group.clone(),
        entries: numbered(base, next_group, "", unmatched),
    }
}

/// Every value with its number and source, in original input order.
pub fn listing(groups: &[NumberedGroup], unmatched: &NumberedUnmatched) -> Vec<ClassifiedItem> {
    let mut items: Vec<ClassifiedItem> = groups
        .iter()
        .flat_map(|g| {
            g.entries().map(move |e| ClassifiedItem {
                index: e.index,
                value: e.value.clone(),
                source: Source::Group(g.group.clone()),
                number: e.number.clone(),
            })
        })
        .chain(unmatched.entries.iter().map(|e| ClassifiedItem {
            index: e.index,
            value: e.value.clone(),
            source: Source::Unmatched,
            number: e.number.clone(),
        }))
        .collect();

    items.sort_by_key(|item| item.index);
    items
}
