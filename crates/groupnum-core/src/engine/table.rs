//! Table Builder
//!
//! Lays numbered groups out side by side as (number, value) column pairs.

use super::numbering::{group_label, NumberedGroup, NumberedUnmatched};

/// Rectangular grid of string cells, header row first.
pub type Grid = Vec<Vec<String>>;

/// One (numbers, values) column pair before padding.
struct ColumnPair {
    numbers: Vec<String>,
    values: Vec<String>,
}

impl ColumnPair {
    fn len(&self) -> usize {
        self.numbers.len()
    }
}

fn group_columns(group: &NumberedGroup) -> ColumnPair {
    let mut pair = ColumnPair {
        numbers: Vec::new(),
        values: Vec::new(),
    };

    for (i, subgroup) in group.subgroups.iter().enumerate() {
        if i > 0 {
            // blank separator between subgroups
            pair.numbers.push(String::new());
            pair.values.push(String::new());
        }
        for entry in &subgroup.items {
            pair.numbers.push(entry.number.clone());
            pair.values.push(entry.value.clone());
        }
    }

    pair
}

/// Build the export grid.
///
/// The header carries `("", "{base}.{group}")` per group, plus one pair for
/// the unmatched set when it is non-empty. Every row has the same width;
/// shorter columns are padded with empty cells.
pub fn build_table(groups: &[NumberedGroup], unmatched: &NumberedUnmatched, base: &str) -> Grid {
    let mut header = Vec::with_capacity((groups.len() + 1) * 2);
    let mut columns = Vec::with_capacity(groups.len() + 1);

    for group in groups {
        header.push(String::new());
        header.push(group_label(base, &group.group));
        columns.push(group_columns(group));
    }

    if !unmatched.entries.is_empty() {
        header.push(String::new());
        header.push(group_label(base, &unmatched.group));
        columns.push(ColumnPair {
            numbers: unmatched.entries.iter().map(|e| e.number.clone()).collect(),
            values: unmatched.entries.iter().map(|e| e.value.clone()).collect(),
        });
    }

    let row_count = columns.iter().map(ColumnPair::len).max().unwrap_or(0);

    let mut grid = Vec::with_capacity(row_count + 1);
    grid.push(header);

    for row in 0..row_count {
        let mut cells = Vec::with_capacity(columns.len() * 2);
        for column in &columns {
            cells.push(column.numbers.get(row).cloned().unwrap_or_default());
            cells.push(column.values.get(row).cloned().unwrap_or_default());
        }
        grid.push(cells);
    }

    grid
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::numbering::NumberedEntry;
    use crate::engine::split::Subgroup;
    use crate::rules::GroupId;

    fn entry(index: usize, value: &str, number: &str) -> NumberedEntry {
        NumberedEntry {
            index,
            value: value.to_string(),
            number: number.to_string(),
        }
    }

    fn no_unmatched(next: u32) -> NumberedUnmatched {
        NumberedUnmatched {
            group: GroupId::from_number(next),
            entries: Vec::new(),
        }
    }

    #[test]
    fn test_header_only_when_empty() {
        let groups = vec![NumberedGroup {
            group: GroupId::from_number(1),
            subgroups: Vec::new(),
        }];
        let grid = build_table(&groups, &no_unmatched(2), "13");
        assert_eq!(grid, vec![vec!["".to_string(), "13.1".to_string()]]);
    }

    #[test]
    fn test_subgroups_separated_by_blank_row() {
        let groups = vec![NumberedGroup {
            group: GroupId::from_number(1),
            subgroups: vec![
                Subgroup {
                    suffix: "A".to_string(),
                    items: vec![entry(0, "a", "13.1A.1")],
                },
                Subgroup {
                    suffix: "B".to_string(),
                    items: vec![entry(1, "b", "13.1B.1")],
                },
            ],
        }];
        let grid = build_table(&groups, &no_unmatched(2), "13");

        assert_eq!(grid.len(), 4);
        assert_eq!(grid[1], vec!["13.1A.1", "a"]);
        assert_eq!(grid[2], vec!["", ""]);
        assert_eq!(grid[3], vec!["13.1B.1", "b"]);
    }

    #[test]
    fn test_columns_padded_to_longest() {
        let groups = vec![NumberedGroup {
            group: GroupId::from_number(1),
            subgroups: vec![Subgroup {
                suffix: String::new(),
                items: vec![entry(0, "Apple", "13.1.1")],
            }],
        }];
        let unmatched = NumberedUnmatched {
            group: GroupId::from_number(2),
            entries: vec![entry(1, "banana", "13.2.1"), entry(2, "Cherry", "13.2.2")],
        };

        let grid = build_table(&groups, &unmatched, "13");
        assert_eq!(grid[0], vec!["", "13.1", "", "13.2"]);
        assert_eq!(grid[1], vec!["13.1.1", "Apple", "13.2.1", "banana"]);
        assert_eq!(grid[2], vec!["", "", "13.2.2", "Cherry"]);
        assert!(grid.iter().all(|row| row.len() == 4));
    }
}
