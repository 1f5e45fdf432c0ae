use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "groupnum")]
#[command(about = "Classify spreadsheet values into numbered groups")]
#[command(version)]
pub struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet output (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Base directory (default: ~/.groupnum)
    #[arg(long, global = true)]
    pub base_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum FormatArg {
    Xlsx,
    Csv,
    Xls,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum KindArg {
    Contains,
    StartsWith,
    EndsWith,
    Equals,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Classify and number the first column of a spreadsheet
    Classify {
        /// Input file (.xlsx, .xls, .ods or .csv)
        input: PathBuf,

        /// Rules file (default: rules.path from config)
        #[arg(short, long)]
        rules: Option<PathBuf>,

        /// Base number prefix (default: numbering.base_number from config)
        #[arg(short, long)]
        base: Option<String>,

        /// Print the listing as JSON
        #[arg(long)]
        json: bool,
    },

    /// Classify a spreadsheet and write the numbered grid
    Export {
        /// Input file (.xlsx, .xls, .ods or .csv)
        input: PathBuf,

        /// Rules file (default: rules.path from config)
        #[arg(short, long)]
        rules: Option<PathBuf>,

        /// Base number prefix (default: numbering.base_number from config)
        #[arg(short, long)]
        base: Option<String>,

        /// Output format (default: export.format from config)
        #[arg(short, long, value_enum)]
        format: Option<FormatArg>,

        /// Output file name without extension (default: export)
        #[arg(short, long)]
        name: Option<String>,

        /// Output directory (default: current directory)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Edit the rules file
    Rule {
        /// Rules file (default: rules.path from config)
        #[arg(short, long, global = true)]
        rules: Option<PathBuf>,

        #[command(subcommand)]
        action: RuleAction,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum RuleAction {
    /// Create the rules file with a commented template
    Init,

    /// Show groups, conditions and breakpoints
    Show,

    /// Append a group (gets the next sequential id)
    AddGroup {
        /// Kind of the initial condition
        #[arg(short, long, value_enum)]
        kind: Option<KindArg>,

        /// Pattern of the initial condition
        #[arg(short, long)]
        pattern: Option<String>,

        /// Negate the initial condition
        #[arg(long)]
        negate: bool,
    },

    /// Remove a group
    RemoveGroup {
        /// Group id
        group: String,
    },

    /// Append a condition to a group
    AddCondition {
        /// Group id
        group: String,

        #[arg(short, long, value_enum)]
        kind: Option<KindArg>,

        #[arg(short, long)]
        pattern: Option<String>,

        #[arg(long)]
        negate: bool,
    },

    /// Change fields of a condition
    SetCondition {
        /// Group id
        group: String,

        /// Condition position (1-based) or id prefix
        condition: String,

        #[arg(short, long, value_enum)]
        kind: Option<KindArg>,

        #[arg(short, long)]
        pattern: Option<String>,

        /// Set negation on or off
        #[arg(long)]
        negate: Option<bool>,
    },

    /// Remove a condition from a group
    RemoveCondition {
        /// Group id
        group: String,

        /// Condition position (1-based) or id prefix
        condition: String,
    },

    /// Append a breakpoint to a group
    AddBreakpoint {
        /// Group id
        group: String,

        /// Subgroup size (clamped to at least 1)
        #[arg(default_value = "1", allow_negative_numbers = true)]
        size: i64,
    },

    /// Change a breakpoint's size
    SetBreakpoint {
        /// Group id
        group: String,

        /// Breakpoint position (1-based)
        index: usize,

        /// Subgroup size (clamped to at least 1)
        #[arg(allow_negative_numbers = true)]
        size: i64,
    },

    /// Remove a breakpoint
    RemoveBreakpoint {
        /// Group id
        group: String,

        /// Breakpoint position (1-based)
        index: usize,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g., numbering.base_number)
        key: String,
    },

    /// Set a config value
    Set {
        /// Config key (e.g., export.format)
        key: String,

        /// Value to set (e.g., "csv")
        value: String,
    },

    /// List all config values
    List,

    /// Show config file path
    Path,

    /// Initialize config file with defaults
    Init,
}
