//! refit: version-upgrade migrations for component workspaces
//!
//! # Usage
//!
//! ```bash
//! # Migrate every unit in refit.toml to v8
//! refit migrate --to v8 --rules upgrade-data.toml
//!
//! # Show what would change without writing
//! refit migrate --to v8 --dry-run
//!
//! # List the migrations that apply to a version
//! refit rules --to v9
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;

use refit::config::ToolConfig;
use refit::data::{TargetVersion, UpgradeData, load_upgrade_data};
use refit::error::UpdateError;
use refit::file_system::{DiskFileSystem, EditOperation, FileSystem};
use refit::migration::MigrationSetup;
use refit::migrations::default_rules;
use refit::program::Program;
use refit::runner::migrate_workspace;

#[derive(Parser)]
#[command(name = "refit")]
#[command(author = "Refit Contributors")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Upgrade component sources, templates and stylesheets to a new version", long_about = None)]
#[command(after_help = "EXAMPLES:
    refit migrate --to v8                  # Migrate using refit.toml
    refit migrate --to v8 --dry-run        # Print pending edits
    refit rules --to v8                    # List applicable migrations")]
struct Cli {
    /// Project root containing refit.toml
    #[arg(short, long, global = true, default_value = ".", env = "REFIT_PROJECT")]
    project: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every migration for a target version
    Migrate {
        /// Version to migrate to (falls back to `target` in refit.toml)
        #[arg(long, value_enum)]
        to: Option<TargetVersion>,
        /// Rule data file (TOML or JSON)
        #[arg(short, long)]
        rules: Option<PathBuf>,
        /// Extra global stylesheet, may be repeated
        #[arg(long = "stylesheet")]
        stylesheets: Vec<PathBuf>,
        /// Record edits but do not write them
        #[arg(long)]
        dry_run: bool,
        /// Exit with an error when any migration reports a failure
        #[arg(long)]
        strict: bool,
        /// Print failures as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the migrations enabled for a target version
    Rules {
        #[arg(long, value_enum)]
        to: Option<TargetVersion>,
        #[arg(short, long)]
        rules: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("refit=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = ToolConfig::load(&cli.project)?;

    match cli.command {
        Commands::Migrate {
            to,
            rules,
            stylesheets,
            dry_run,
            strict,
            json,
        } => {
            let target = resolve_target(to, &config)?;
            let data = resolve_data(&cli.project, rules, &config)?;
            config.global_stylesheets.extend(stylesheets);
            run_migrate(&cli.project, &config, target, &data, dry_run, strict, json)
        }
        Commands::Rules { to, rules } => {
            let target = resolve_target(to, &config)?;
            let data = resolve_data(&cli.project, rules, &config)?;
            list_rules(target, &data)
        }
    }
}

fn resolve_target(flag: Option<TargetVersion>, config: &ToolConfig) -> Result<TargetVersion> {
    flag.or(config.target)
        .context("No target version: pass --to or set `target` in refit.toml")
}

fn resolve_data(project: &Path, flag: Option<PathBuf>, config: &ToolConfig) -> Result<UpgradeData> {
    let path = flag
        .or_else(|| config.rules.as_ref().map(|p| project.join(p)))
        .context("No rule data: pass --rules or set `rules` in refit.toml")?;
    let data = load_upgrade_data(&path).with_context(|| format!("loading {}", path.display()))?;
    Ok(data)
}

fn run_migrate(
    project: &Path,
    config: &ToolConfig,
    target: TargetVersion,
    data: &UpgradeData,
    dry_run: bool,
    strict: bool,
    json: bool,
) -> Result<()> {
    let mut fs = DiskFileSystem::new(project)?;
    let report = migrate_workspace(&mut fs, config, &default_rules(), target, data)?;

    if json {
        let failures: Vec<_> = report.failures().collect();
        println!("{}", serde_json::to_string_pretty(&failures)?);
    } else {
        for unit in &report.units {
            let marker = if unit.failures.is_empty() { "✓".green() } else { "!".yellow() };
            println!(
                "{} {} ({} files, {} failures)",
                marker,
                unit.name.bold(),
                unit.files,
                unit.failures.len()
            );
            for failure in &unit.failures {
                println!("    {}", failure.to_string().yellow());
            }
        }
    }

    let files = fs.ledger().len();
    let operations = fs.ledger().operation_count();
    if dry_run {
        print_pending(&fs);
        println!("{} {} edit(s) in {} file(s) not written (dry run)", "→".cyan(), operations, files);
    } else {
        match fs.commit_edits() {
            Ok(()) => println!("{} Applied {} edit(s) to {} file(s)", "✓".green(), operations, files),
            Err(UpdateError::EditConflicts(conflicts)) => {
                for conflict in &conflicts {
                    eprintln!("{} {}", "✗".red(), conflict);
                }
                anyhow::bail!("{} file(s) could not be updated", conflicts.len());
            }
            Err(e) => return Err(e.into()),
        }
    }

    if strict && report.has_failures() {
        anyhow::bail!("migration reported failures");
    }
    Ok(())
}

fn print_pending(fs: &DiskFileSystem) {
    for recorder in fs.ledger().iter() {
        println!("{}", recorder.path().to_string().bold());
        for op in recorder.operations() {
            match op {
                EditOperation::Remove { position, length } => {
                    println!("    {} {}..{}", "-".red(), position, position + length)
                }
                EditOperation::InsertLeft { position, text } | EditOperation::InsertRight { position, text } => {
                    println!("    {} {} {:?}", "+".green(), position, text)
                }
            }
        }
    }
}

fn list_rules(target: TargetVersion, data: &UpgradeData) -> Result<()> {
    let program = Program::new();
    let setup = MigrationSetup {
        program: &program,
        target,
        data,
    };

    println!("{} Migrations for {}", "→".cyan(), target.to_string().bold());
    for rule in default_rules() {
        match rule(&setup) {
            Ok(migration) if migration.enabled() => {
                println!("  {} {} ({} changes)", "✓".green(), migration.name(), migration.change_count())
            }
            Ok(migration) => println!("  {} {}", "·".dimmed(), migration.name().dimmed()),
            Err(e) => println!("  {} {}", "✗".red(), e),
        }
    }
    Ok(())
}
