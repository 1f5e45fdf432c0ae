//! Host-side state: the current value list, rule set and base number.
//!
//! Each update swaps a whole aggregate, so readers only ever see a complete
//! snapshot.

use std::path::Path;

use tracing::{debug, warn};

use crate::engine::{Report, Snapshot, DEFAULT_BASE_NUMBER};
use crate::error::Result;
use crate::import::import_values;
use crate::rules::{RuleEdit, RuleSet};

#[derive(Debug, Clone)]
pub struct Session {
    values: Vec<String>,
    rules: RuleSet,
    base_number: String,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_NUMBER)
    }
}

impl Session {
    pub fn new(base_number: impl Into<String>) -> Self {
        Self {
            values: Vec::new(),
            rules: RuleSet::new(),
            base_number: base_number.into(),
        }
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn base_number(&self) -> &str {
        &self.base_number
    }

    pub fn set_base_number(&mut self, base_number: impl Into<String>) {
        self.base_number = base_number.into();
    }

    /// Replace the value list; the rule set starts over.
    pub fn load_values(&mut self, values: Vec<String>) {
        self.values = values;
        self.rules = RuleSet::new();
    }

    /// Import a spreadsheet, replacing values and discarding groups.
    ///
    /// On failure both the value list and the rule set are left empty.
    pub fn import(&mut self, path: &Path) -> Result<usize> {
        match import_values(path) {
            Ok(values) => {
                let count = values.len();
                self.load_values(values);
                debug!(count, "session values replaced");
                Ok(count)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "import failed, session reset");
                self.values = Vec::new();
                self.rules = RuleSet::new();
                Err(e)
            }
        }
    }

    /// Apply one rule edit. On error the current rule set is kept.
    pub fn apply(&mut self, edit: RuleEdit) -> Result<()> {
        self.rules = self.rules.apply(edit)?;
        Ok(())
    }

    pub fn replace_rules(&mut self, rules: RuleSet) {
        self.rules = rules;
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(
            self.values.clone(),
            self.rules.clone(),
            self.base_number.clone(),
        )
    }

    pub fn evaluate(&self) -> Report {
        self.snapshot().evaluate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GroupnumError;
    use crate::rules::{ConditionEdit, GroupId};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_import_replaces_values_and_clears_groups() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("fruits.csv");
        fs::write(&path, "Apple\nbanana\n").unwrap();

        let mut session = Session::default();
        session.apply(RuleEdit::AddGroup).unwrap();
        assert_eq!(session.import(&path).unwrap(), 2);

        assert_eq!(session.values(), ["Apple", "banana"]);
        assert!(session.rules().is_empty());
        assert_eq!(session.rules().next_group_id().as_str(), "1");
    }

    #[test]
    fn test_failed_import_resets_state() {
        let temp = TempDir::new().unwrap();
        let good = temp.path().join("fruits.csv");
        fs::write(&good, "Apple\n").unwrap();
        let bad = temp.path().join("fruits.pdf");
        fs::write(&bad, "Apple\n").unwrap();

        let mut session = Session::default();
        session.import(&good).unwrap();
        session.apply(RuleEdit::AddGroup).unwrap();

        let err = session.import(&bad).unwrap_err();
        assert!(matches!(err, GroupnumError::ImportFormat { .. }));
        assert!(session.values().is_empty());
        assert!(session.rules().is_empty());
    }

    #[test]
    fn test_failed_edit_keeps_rules() {
        let mut session = Session::default();
        session.apply(RuleEdit::AddGroup).unwrap();
        let before = session.rules().clone();

        let err = session.apply(RuleEdit::RemoveGroup {
            group: GroupId::from_number(7),
        });
        assert!(err.is_err());
        assert_eq!(session.rules(), &before);
    }

    #[test]
    fn test_evaluate_follows_edits() {
        let mut session = Session::new("20");
        session.load_values(vec!["Apple".to_string(), "banana".to_string()]);
        session.apply(RuleEdit::AddGroup).unwrap();

        let group = GroupId::from_number(1);
        let condition = session.rules().groups()[0].conditions[0].id;
        session
            .apply(RuleEdit::UpdateCondition {
                group,
                condition,
                edit: ConditionEdit::SetPattern("ban".to_string()),
            })
            .unwrap();

        let report = session.evaluate();
        let numbers: Vec<&str> = report.items.iter().map(|i| i.number.as_str()).collect();
        assert_eq!(numbers, vec!["20.2.1", "20.1.1"]);

        session.set_base_number("21");
        assert_eq!(session.evaluate().items[1].number, "21.1.1");
    }
}
