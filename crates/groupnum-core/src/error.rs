use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GroupnumError {
    #[error("Please provide a spreadsheet file (.xlsx, .xls, .ods or .csv): {path}")]
    ImportFormat { path: PathBuf },

    #[error("Error reading file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Failed to export {path}: {message}")]
    Export { path: PathBuf, message: String },

    #[error("Group not found: {id}")]
    GroupNotFound { id: String },

    #[error("Condition not found in group {group}: {condition}")]
    ConditionNotFound { group: String, condition: String },

    #[error("Breakpoint {index} not found in group {group}")]
    BreakpointNotFound { group: String, index: usize },

    #[error("Invalid group id '{id}': {reason}")]
    InvalidGroupId { id: String, reason: String },

    #[error("Group ids exhausted after {last}")]
    GroupIdExhausted { last: u32 },

    #[error("Invalid export format: '{value}' - expected xlsx, csv or xls")]
    InvalidExportFormat { value: String },

    #[error("Failed to parse rules file {path}: {message}")]
    RulesParse { path: PathBuf, message: String },

    #[error("Failed to parse config file {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error("Unknown config key: {key}")]
    ConfigKeyNotFound { key: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("Home directory not found")]
    HomeNotFound,
}

pub type Result<T> = std::result::Result<T, GroupnumError>;

impl GroupnumError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ImportFormat { .. } => 2,
            Self::Parse { .. } => 3,
            Self::Export { .. } => 4,
            Self::GroupNotFound { .. }
            | Self::ConditionNotFound { .. }
            | Self::BreakpointNotFound { .. } => 5,
            Self::InvalidGroupId { .. }
            | Self::GroupIdExhausted { .. }
            | Self::InvalidExportFormat { .. } => 6,
            Self::RulesParse { .. } | Self::ConfigParse { .. } => 7,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_distinct_for_import_failures() {
        let format = GroupnumError::ImportFormat {
            path: PathBuf::from("notes.txt"),
        };
        let parse = GroupnumError::Parse {
            path: PathBuf::from("broken.xlsx"),
            message: "bad zip".to_string(),
        };
        assert_eq!(format.exit_code(), 2);
        assert_eq!(parse.exit_code(), 3);
        assert_eq!(GroupnumError::HomeNotFound.exit_code(), 1);
    }

    #[test]
    fn test_import_format_message_names_file() {
        let err = GroupnumError::ImportFormat {
            path: PathBuf::from("notes.txt"),
        };
        assert!(err.to_string().contains("notes.txt"));
    }
}
