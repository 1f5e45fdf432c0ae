//! Subgroup Splitter
//!
//! Cuts a group's matched sequence into consecutive sub-ranges sized by its
//! breakpoints. Whatever the breakpoints do not cover becomes one final
//! sub-range.

use serde::Serialize;

const ALPHABET_LEN: usize = 26;

/// A contiguous slice of a group's matched values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Subgroup<T> {
    /// `A`, `B`, ... or empty when the group has no breakpoints.
    pub suffix: String,
    pub items: Vec<T>,
}

/// Letter suffix for the subgroup at `index`.
///
/// Bijective base-26 like spreadsheet columns: `A`..`Z`, then `AA`, `AB`, ...
pub fn suffix_for(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % ALPHABET_LEN;
        letters.push(char::from(b'A' + rem as u8));
        n = (n - 1) / ALPHABET_LEN;
    }
    letters.iter().rev().collect()
}

/// Split `matched` by `breakpoints`.
///
/// Concatenating the returned items always yields `matched`. A breakpoint
/// whose range starts past the end produces no subgroup; letters stay tied to
/// breakpoint position.
pub fn split<T: Clone>(matched: &[T], breakpoints: &[usize]) -> Vec<Subgroup<T>> {
    if matched.is_empty() {
        return Vec::new();
    }

    if breakpoints.is_empty() {
        return vec![Subgroup {
            suffix: String::new(),
            items: matched.to_vec(),
        }];
    }

    let mut subgroups = Vec::with_capacity(breakpoints.len() + 1);
    let mut start = 0;

    for (i, &size) in breakpoints.iter().enumerate() {
        if start >= matched.len() {
            break;
        }
        let end = start.saturating_add(size.max(1)).min(matched.len());
        subgroups.push(Subgroup {
            suffix: suffix_for(i),
            items: matched[start..end].to_vec(),
        });
        start = end;
    }

    if start < matched.len() {
        subgroups.push(Subgroup {
            suffix: suffix_for(breakpoints.len()),
            items: matched[start..].to_vec(),
        });
    }

    subgroups
}
