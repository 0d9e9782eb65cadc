//! robofetch - main entry point
//!
//! Asks for a work path and a dataset selection (unless given on the
//! command line or in a fetch plan), then runs each dataset's recipe.

use std::io::{self, IsTerminal};
use anyhow::{Context, Result};
use tracing::{debug, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use robofetch::cli::{Cli, Commands};
use robofetch::command_runner::ShellRunner;
use robofetch::config_file::FetchConfig;
use robofetch::{process_guard, selector};

/// Logs go to stderr so they interleave with wget/unzip progress output.
/// `RUST_LOG` overrides the default `info` filter.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_ansi(io::stderr().is_terminal()),
        )
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    debug!("robofetch starting up");

    // Interrupting a download must take the shell and wget down with us
    if let Err(e) = process_guard::init_signal_handlers() {
        warn!(error = %e, "failed to initialize signal handlers");
    }

    let cli = Cli::parse_args();

    match &cli.command {
        Some(Commands::List) => {
            print!("{}", selector::menu());
        }
        Some(Commands::Validate { config }) => {
            info!(path = ?config, "validating fetch plan");
            let checked = FetchConfig::load_from_file(config)
                .and_then(|c| c.validate().map(|_| c).map_err(anyhow::Error::from));
            match checked {
                Ok(plan) => {
                    println!("✓ Fetch plan is valid: {:?}", plan);
                }
                Err(e) => {
                    error!("fetch plan validation failed: {:#}", e);
                    eprintln!("✗ Fetch plan is invalid: {:#}", e);
                    std::process::exit(1);
                }
            }
        }
        None => {
            let failures = run_fetch(&cli)?;
            if failures > 0 {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

/// Resolve the effective plan from flags, plan file and prompts, then fetch.
///
/// Returns the number of commands that failed.
fn run_fetch(cli: &Cli) -> Result<usize> {
    let plan = match &cli.config {
        Some(path) => {
            let plan = FetchConfig::load_from_file(path)?;
            plan.validate()
                .with_context(|| format!("Invalid fetch plan {:?}", path))?;
            Some(plan)
        }
        None => None,
    };

    let current_dir = std::env::current_dir().context("Failed to read current directory")?;
    let stdin = io::stdin();
    let effective =
        FetchConfig::resolve(cli, plan, &current_dir, &mut stdin.lock(), &mut io::stdout())?;

    if let Some(save_path) = &cli.save_config {
        effective.save_to_file(save_path)?;
        info!(path = ?save_path, "saved fetch plan");
    }

    let work_path = effective.work_path.clone().unwrap_or(current_dir);
    let datasets = effective.selected();
    if datasets.is_empty() {
        println!("No datasets selected, nothing to do.");
        return Ok(0);
    }

    info!(
        work_path = %work_path.display(),
        policy = %effective.failure_policy,
        "fetching {} dataset(s)",
        datasets.len()
    );

    let mut runner = if cli.dry_run {
        ShellRunner::dry_run(effective.shell.clone())
    } else {
        ShellRunner::new(effective.shell.clone())
    };

    let report = selector::run(&mut runner, &datasets, &work_path, effective.failure_policy)?;

    let failures = report.failure_count();
    if failures == 0 {
        println!("✓ Fetched {} dataset(s) into {}", datasets.len(), work_path.display());
    } else {
        eprintln!("✗ {} command(s) failed:", failures);
        eprint!("{}", report.failure_summary());
    }

    Ok(failures)
}
