pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod import;
pub mod rules;
pub mod session;

pub use config::Config;
pub use engine::{
    build_table, classify, generate_number, split, Classification, ClassifiedItem, Grid, Report,
    Snapshot, Source, Stats, Subgroup, DEFAULT_BASE_NUMBER,
};
pub use error::{GroupnumError, Result};
pub use export::{export_file_name, export_grid, write_grid, ExportFormat};
pub use import::{import_values, ImportFormat};
pub use rules::{
    Condition, ConditionEdit, ConditionId, ConditionKind, Group, GroupId, RuleEdit, RuleSet,
};
pub use session::Session;
