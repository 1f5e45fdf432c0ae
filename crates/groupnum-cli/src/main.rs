use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use clap_complete::generate;
use colored::Colorize;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use groupnum_core::config::Config;
use groupnum_core::engine::{group_label, ClassifiedItem, Report, Source, Stats};
use groupnum_core::export::export_grid;
use groupnum_core::rules::{
    ConditionEdit, ConditionId, ConditionKind, GroupId, RuleEdit, RuleSet,
};
use groupnum_core::{ExportFormat, GroupnumError, Result, Session};

mod args;
use args::{Cli, Commands, ConfigAction, FormatArg, KindArg, RuleAction, Shell};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let result = resolve_base_dir(cli.base_dir).and_then(|base_dir| run(cli.command, &base_dir));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "[ERROR]".red().bold(), e);
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

fn run(command: Option<Commands>, base_dir: &Path) -> Result<()> {
    match command {
        Some(Commands::Classify {
            input,
            rules,
            base,
            json,
        }) => handle_classify(base_dir, &input, rules.as_deref(), base, json),
        Some(Commands::Export {
            input,
            rules,
            base,
            format,
            name,
            out,
        }) => handle_export(
            base_dir,
            &input,
            rules.as_deref(),
            base,
            format.map(ExportFormat::from),
            name,
            out,
        ),
        Some(Commands::Rule { rules, action }) => handle_rule(action, base_dir, rules.as_deref()),
        Some(Commands::Config { action }) => handle_config(action, base_dir),
        Some(Commands::Completions { shell }) => {
            handle_completions(shell);
            Ok(())
        }
        None => {
            Cli::command().print_help().ok();
            Ok(())
        }
    }
}

/// Log level: RUST_LOG wins, then --quiet / --verbose, then warn.
fn init_tracing(verbose: bool, quiet: bool) {
    let default_level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn handle_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let shell = match shell {
        Shell::Bash => clap_complete::Shell::Bash,
        Shell::Zsh => clap_complete::Shell::Zsh,
        Shell::Fish => clap_complete::Shell::Fish,
        Shell::PowerShell => clap_complete::Shell::PowerShell,
        Shell::Elvish => clap_complete::Shell::Elvish,
    };
    generate(shell, &mut cmd, "groupnum", &mut io::stdout());
}

fn resolve_base_dir(cli_base: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(base) = cli_base {
        return Ok(base);
    }

    if let Ok(base) = std::env::var("GROUPNUM_BASE") {
        return Ok(PathBuf::from(base));
    }

    dirs::home_dir()
        .map(|h| h.join(".groupnum"))
        .ok_or(GroupnumError::HomeNotFound)
}

/// Priority: CLI option > config file > default
fn resolve_rules_path(base_dir: &Path, config: &Config, cli_rules: Option<&Path>) -> PathBuf {
    match cli_rules {
        Some(path) => path.to_path_buf(),
        None => config.rules_path(base_dir),
    }
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Xlsx => ExportFormat::Xlsx,
            FormatArg::Csv => ExportFormat::Csv,
            FormatArg::Xls => ExportFormat::Xls,
        }
    }
}

impl From<KindArg> for ConditionKind {
    fn from(arg: KindArg) -> Self {
        match arg {
            KindArg::Contains => ConditionKind::Contains,
            KindArg::StartsWith => ConditionKind::StartsWith,
            KindArg::EndsWith => ConditionKind::EndsWith,
            KindArg::Equals => ConditionKind::Equals,
        }
    }
}

// ============================================================================
// Classify / Export
// ============================================================================

/// Rules are loaded first so a broken rules file fails before any import.
fn load_session(
    base_dir: &Path,
    config: &Config,
    input: &Path,
    rules: Option<&Path>,
    base: Option<String>,
) -> Result<Session> {
    let rules = RuleSet::load(&resolve_rules_path(base_dir, config, rules))?;

    let mut session =
        Session::new(base.unwrap_or_else(|| config.numbering.base_number.clone()));
    session.import(input)?;
    session.replace_rules(rules);

    Ok(session)
}

#[derive(Serialize)]
struct ClassifyOutput<'a> {
    base_number: &'a str,
    stats: &'a Stats,
    items: &'a [ClassifiedItem],
}

fn handle_classify(
    base_dir: &Path,
    input: &Path,
    rules: Option<&Path>,
    base: Option<String>,
    json: bool,
) -> Result<()> {
    let config = Config::load(base_dir)?;
    let session = load_session(base_dir, &config, input, rules, base)?;
    let report = session.evaluate();

    if json {
        let output = ClassifyOutput {
            base_number: &report.base_number,
            stats: &report.stats,
            items: &report.items,
        };
        let text = serde_json::to_string_pretty(&output).map_err(io::Error::from)?;
        println!("{}", text);
        return Ok(());
    }

    print_report(&report);
    Ok(())
}

fn print_stats(stats: &Stats) {
    println!("Total Items: {}", stats.total);
    println!("Matched Items: {}", stats.matched.to_string().green());
    println!("Unmatched Items: {}", stats.unmatched.to_string().yellow());
}

fn print_report(report: &Report) {
    let base = report.base_number.as_str();

    println!();
    print_stats(&report.stats);
    println!();

    for group in &report.groups {
        let label = group_label(base, &group.group);
        let count: usize = group.subgroups.iter().map(|s| s.items.len()).sum();
        println!("Group {} ({} items)", label.cyan().bold(), count);
        for sub in group.subgroups.iter().filter(|s| !s.suffix.is_empty()) {
            println!("  {}{}: {} items", label, sub.suffix, sub.items.len());
        }
    }
    if !report.groups.is_empty() {
        println!();
    }

    if report.items.is_empty() {
        println!("No values found.");
        return;
    }

    let number_width = report
        .items
        .iter()
        .map(|i| i.number.len())
        .max()
        .unwrap_or(0)
        .max("Number".len());
    let value_width = report
        .items
        .iter()
        .map(|i| i.value.chars().count())
        .max()
        .unwrap_or(0)
        .clamp("Value".len(), 40);

    println!(
        "{}  {}  {}",
        format!("{:<number_width$}", "Number").bold(),
        format!("{:<value_width$}", "Value").bold(),
        "Source Group".bold()
    );
    for item in &report.items {
        let label = item.source.label(base);
        let label = if item.source == Source::Unmatched {
            label.yellow()
        } else {
            label.normal()
        };
        println!(
            "{}  {:<value_width$}  {}",
            format!("{:<number_width$}", item.number).green(),
            item.value,
            label
        );
    }
    println!();
}

fn handle_export(
    base_dir: &Path,
    input: &Path,
    rules: Option<&Path>,
    base: Option<String>,
    format: Option<ExportFormat>,
    name: Option<String>,
    out: Option<PathBuf>,
) -> Result<()> {
    let config = Config::load(base_dir)?;
    let session = load_session(base_dir, &config, input, rules, base)?;
    let report = session.evaluate();

    let format = format.unwrap_or(config.export.format);
    let name = name.or_else(|| config.export.file_name().map(str::to_string));
    let out_dir = out.unwrap_or_else(|| PathBuf::from("."));

    let grid = report.grid();
    let path = export_grid(&grid, &out_dir, name.as_deref(), format)?;

    println!();
    print_stats(&report.stats);
    println!();
    println!("{} {}", "Exported:".green(), path.display());
    println!("  Format: {}", format);
    println!("  Rows: {} (including header)", grid.len());

    Ok(())
}

// ============================================================================
// Rules
// ============================================================================

fn handle_rule(action: RuleAction, base_dir: &Path, rules: Option<&Path>) -> Result<()> {
    let config = Config::load(base_dir)?;
    let path = resolve_rules_path(base_dir, &config, rules);
    let base = config.numbering.base_number.as_str();

    match action {
        RuleAction::Init => {
            RuleSet::init(&path)?;
            println!("{} {}", "Initialized:".green(), path.display());
            println!();
            println!("Next steps:");
            println!("  1. Add a group: groupnum rule add-group -k contains -p <text>");
            println!("  2. Classify: groupnum classify <file.xlsx>");
        }
        RuleAction::Show => {
            let set = RuleSet::load(&path)?;
            println!("Rules: {}", path.display());
            print_rules(&set, base);
        }
        RuleAction::AddGroup {
            kind,
            pattern,
            negate,
        } => {
            let set = RuleSet::load(&path)?;
            let id = set.next_group_id();
            let set = set.apply(RuleEdit::AddGroup)?;
            let condition = resolve_condition(&set, &id, "1")?;
            let set = set.apply_all(condition_edits(
                &id,
                condition,
                kind,
                pattern,
                negate.then_some(true),
            ))?;
            set.save(&path)?;

            println!("{} {}", "Added group:".green(), group_label(base, &id).cyan());
        }
        RuleAction::RemoveGroup { group } => {
            let id = GroupId::new(group);
            let set = RuleSet::load(&path)?.apply(RuleEdit::RemoveGroup { group: id.clone() })?;
            set.save(&path)?;

            println!("{} {}", "Removed group:".red(), group_label(base, &id));
        }
        RuleAction::AddCondition {
            group,
            kind,
            pattern,
            negate,
        } => {
            let id = GroupId::new(group);
            let set = RuleSet::load(&path)?.apply(RuleEdit::AddCondition { group: id.clone() })?;
            let position = set.group(&id).map(|g| g.conditions.len()).unwrap_or(0);
            let condition = resolve_condition(&set, &id, &position.to_string())?;
            let set = set.apply_all(condition_edits(
                &id,
                condition,
                kind,
                pattern,
                negate.then_some(true),
            ))?;
            set.save(&path)?;

            println!(
                "{} {} #{}",
                "Added condition:".green(),
                group_label(base, &id).cyan(),
                position
            );
        }
        RuleAction::SetCondition {
            group,
            condition,
            kind,
            pattern,
            negate,
        } => {
            let id = GroupId::new(group);
            let set = RuleSet::load(&path)?;
            let cond = resolve_condition(&set, &id, &condition)?;
            let set = set.apply_all(condition_edits(&id, cond, kind, pattern, negate))?;
            set.save(&path)?;

            if let Some(updated) = set.group(&id).and_then(|g| g.condition(cond)) {
                println!(
                    "{} {} {}",
                    "Updated:".green(),
                    group_label(base, &id).cyan(),
                    updated
                );
            }
        }
        RuleAction::RemoveCondition { group, condition } => {
            let id = GroupId::new(group);
            let set = RuleSet::load(&path)?;
            let cond = resolve_condition(&set, &id, &condition)?;
            let set = set.apply(RuleEdit::RemoveCondition {
                group: id.clone(),
                condition: cond,
            })?;
            set.save(&path)?;

            println!(
                "{} {} [{}]",
                "Removed condition:".red(),
                group_label(base, &id),
                cond.short()
            );
        }
        RuleAction::AddBreakpoint { group, size } => {
            let id = GroupId::new(group);
            let set = RuleSet::load(&path)?.apply(RuleEdit::AddBreakpoint { group: id.clone() })?;
            let index = set
                .group(&id)
                .map(|g| g.breakpoints.len().saturating_sub(1))
                .unwrap_or(0);
            let set = set.apply(RuleEdit::UpdateBreakpoint {
                group: id.clone(),
                index,
                value: size,
            })?;
            set.save(&path)?;

            println!(
                "{} {} {}",
                "Added breakpoint:".green(),
                group_label(base, &id).cyan(),
                breakpoint_summary(&set, &id)
            );
        }
        RuleAction::SetBreakpoint { group, index, size } => {
            let id = GroupId::new(group);
            let index = breakpoint_index(&id, index)?;
            let set = RuleSet::load(&path)?.apply(RuleEdit::UpdateBreakpoint {
                group: id.clone(),
                index,
                value: size,
            })?;
            set.save(&path)?;

            println!(
                "{} {} {}",
                "Updated:".green(),
                group_label(base, &id).cyan(),
                breakpoint_summary(&set, &id)
            );
        }
        RuleAction::RemoveBreakpoint { group, index } => {
            let id = GroupId::new(group);
            let index = breakpoint_index(&id, index)?;
            let set = RuleSet::load(&path)?.apply(RuleEdit::RemoveBreakpoint {
                group: id.clone(),
                index,
            })?;
            set.save(&path)?;

            println!(
                "{} {} {}",
                "Removed breakpoint:".red(),
                group_label(base, &id),
                breakpoint_summary(&set, &id)
            );
        }
    }

    Ok(())
}

/// Field edits for one condition; `None` leaves a field unchanged.
fn condition_edits(
    group: &GroupId,
    condition: ConditionId,
    kind: Option<KindArg>,
    pattern: Option<String>,
    negate: Option<bool>,
) -> Vec<RuleEdit> {
    let mut edits = Vec::new();
    let mut push = |edit| {
        edits.push(RuleEdit::UpdateCondition {
            group: group.clone(),
            condition,
            edit,
        })
    };

    if let Some(kind) = kind {
        push(ConditionEdit::SetKind(kind.into()));
    }
    if let Some(pattern) = pattern {
        push(ConditionEdit::SetPattern(pattern));
    }
    if let Some(negate) = negate {
        push(ConditionEdit::SetNegate(negate));
    }

    edits
}

/// Condition by 1-based position, falling back to an id prefix.
fn resolve_condition(set: &RuleSet, group: &GroupId, reference: &str) -> Result<ConditionId> {
    let g = set.group(group).ok_or_else(|| GroupnumError::GroupNotFound {
        id: group.to_string(),
    })?;

    if let Ok(pos) = reference.parse::<usize>() {
        if (1..=g.conditions.len()).contains(&pos) {
            return Ok(g.conditions[pos - 1].id);
        }
    }

    let prefix = reference.to_lowercase();
    g.conditions
        .iter()
        .find(|c| !prefix.is_empty() && c.id.to_string().starts_with(&prefix))
        .map(|c| c.id)
        .ok_or_else(|| GroupnumError::ConditionNotFound {
            group: group.to_string(),
            condition: reference.to_string(),
        })
}

fn breakpoint_index(group: &GroupId, position: usize) -> Result<usize> {
    position
        .checked_sub(1)
        .ok_or_else(|| GroupnumError::BreakpointNotFound {
            group: group.to_string(),
            index: position,
        })
}

fn breakpoint_summary(set: &RuleSet, group: &GroupId) -> String {
    let breakpoints = set
        .group(group)
        .map(|g| g.breakpoints.as_slice())
        .unwrap_or_default();
    format!(
        "[{}]",
        breakpoints
            .iter()
            .map(|b| b.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    )
}

fn print_rules(set: &RuleSet, base: &str) {
    println!();
    if set.is_empty() {
        println!(
            "No groups defined. Every value is numbered under {}.",
            group_label(base, &set.next_group_id())
        );
        println!();
        println!("Create one with: groupnum rule add-group -p <text>");
        return;
    }

    for group in set.groups() {
        println!("Group {}", group_label(base, &group.id).cyan().bold());
        if group.conditions.is_empty() {
            println!("  {}", "(no conditions - matches nothing)".yellow());
        } else {
            println!("  Conditions (all must match):");
            for (i, cond) in group.conditions.iter().enumerate() {
                println!("    {}. [{}] {}", i + 1, cond.id.short(), cond);
            }
        }
        if !group.breakpoints.is_empty() {
            println!("  Breakpoints: {}", breakpoint_summary(set, &group.id));
        }
        println!();
    }

    println!(
        "Unmatched values: {}",
        group_label(base, &set.next_group_id()).yellow()
    );
}

// ============================================================================
// Config
// ============================================================================

fn handle_config(action: ConfigAction, base_dir: &Path) -> Result<()> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load(base_dir)?;
            match config.get(&key) {
                Some(value) => {
                    println!("{}", value);
                }
                None => {
                    return Err(GroupnumError::ConfigKeyNotFound { key });
                }
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load(base_dir)?;
            config.set(&key, &value)?;
            config.save(base_dir)?;
            println!("{} {} = {}", "Set:".green(), key, value);
        }
        ConfigAction::List => {
            let config = Config::load(base_dir)?;
            println!();
            for (key, value) in config.list() {
                println!("{} = {}", key.cyan(), value);
            }
            println!();
        }
        ConfigAction::Path => {
            let path = Config::path(base_dir);
            println!("{}", path.display());
        }
        ConfigAction::Init => {
            let path = Config::init(base_dir)?;
            println!("{} {}", "Initialized:".green(), path.display());
        }
    }

    Ok(())
}
