pub mod config;
pub mod files;
pub mod overrides;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use console::style;
use tracing::info;

use config::{Action, JobsConfig};
use kusto_delta_core::{compute_delta, parse_script, script, DatabaseModel, ScriptingContext};

#[derive(Parser, Debug)]
#[command(name = "kusto-delta")]
#[command(about = "Compute the control commands that drive one Kusto schema to another")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute a delta between two script sources
    Delta(DeltaArgs),
    /// Execute the jobs of a configuration file
    Run(RunArgs),
    /// Parse a script and report the folded model
    Check(CheckArgs),
}

#[derive(Args, Debug)]
struct DeltaArgs {
    /// Current-schema scripts (files or folders of .kql files)
    #[arg(long, required = true, num_args = 1..)]
    current: Vec<PathBuf>,

    /// Target-schema scripts (files or folders of .kql files)
    #[arg(long, required = true, num_args = 1..)]
    target: Vec<PathBuf>,

    /// Write the delta as one script file
    #[arg(long)]
    output: Option<PathBuf>,

    /// Write the delta as a folder of per-command scripts
    #[arg(long)]
    folder: Option<PathBuf>,

    /// Emit database-scoped commands in current-database syntax
    #[arg(long)]
    database: Option<String>,
}

#[derive(Args, Debug)]
struct RunArgs {
    /// The job configuration file
    #[arg(long, default_value = "kusto-delta.toml")]
    config: PathBuf,

    /// Run a single job instead of all of them
    #[arg(long)]
    job: Option<String>,

    /// Configuration overrides, `path=value` (e.g. `jobs.main.action.file_path=out.kql`)
    #[arg(long = "set")]
    set: Vec<String>,
}

#[derive(Args, Debug)]
struct CheckArgs {
    /// Script files or folders to check
    #[arg(required = true, num_args = 1..)]
    scripts: Vec<PathBuf>,
}

pub fn parse_and_run() -> Result<()> {
    run(Cli::parse())
}

/// Parses and runs from an explicit argument list; the entry point tests
/// drive.
pub fn parse_and_run_from<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    run(Cli::parse_from(args))
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Delta(args) => run_delta(args),
        Command::Run(args) => run_jobs(args),
        Command::Check(args) => run_check(args),
    }
}

fn run_delta(args: DeltaArgs) -> Result<()> {
    let action = Action {
        file_path: args.output,
        folder_path: args.folder,
        push_to_console: false,
        current_database: args.database,
    };
    let delta = deliver_delta("delta", &args.current, &args.target, &action)?;
    println!(
        "{} {} command(s)",
        style("✔").green().bold(),
        style(delta).bold()
    );
    Ok(())
}

fn run_jobs(args: RunArgs) -> Result<()> {
    let config = JobsConfig::load(&args.config)?;
    let config = overrides::apply(config, &args.set)?;

    if let Some(job) = &args.job {
        if !config.jobs.contains_key(job) {
            bail!("config has no job named `{job}`");
        }
    }

    for (name, job) in &config.jobs {
        if args.job.as_ref().is_some_and(|only| only != name) {
            continue;
        }
        let commands =
            deliver_delta(name, &job.current.scripts, &job.target.scripts, &job.action)
                .with_context(|| format!("job `{name}` failed"))?;
        println!(
            "{} job `{}`: {} command(s)",
            style("✔").green().bold(),
            name,
            commands
        );
    }
    Ok(())
}

/// Loads both models, computes the delta, and carries out the action.
/// Returns the number of emitted commands.
fn deliver_delta(
    name: &str,
    current: &[PathBuf],
    target: &[PathBuf],
    action: &Action,
) -> Result<usize> {
    let current = load_model(current).context("cannot load current schema")?;
    let target = load_model(target).context("cannot load target schema")?;

    let delta = compute_delta(&current, &target);
    info!(job = name, commands = delta.len(), "computed delta");

    let context = action
        .current_database
        .as_deref()
        .map(ScriptingContext::with_database)
        .unwrap_or_default();

    let mut delivered = false;
    if let Some(path) = &action.file_path {
        files::write_file(path, &script::to_script(&delta, &context))?;
        delivered = true;
    }
    if let Some(root) = &action.folder_path {
        files::write_folder(root, &script::to_script_files(&delta, &context))?;
        delivered = true;
    }
    if action.push_to_console || !delivered {
        println!("{}", script::to_script(&delta, &context));
    }
    Ok(delta.len())
}

fn load_model(paths: &[PathBuf]) -> Result<DatabaseModel> {
    let text = files::read_scripts(paths)?;
    let commands = parse_script(&text)?;
    Ok(DatabaseModel::from_commands(&commands)?)
}

fn run_check(args: CheckArgs) -> Result<()> {
    let model = load_model(&args.scripts)?;
    println!(
        "{} {} table(s), {} function(s), {} mapping(s), {} policy(ies)",
        style("✔").green().bold(),
        model.tables.len(),
        model.functions.len(),
        model.mappings.len(),
        model.policies.len(),
    );
    Ok(())
}
