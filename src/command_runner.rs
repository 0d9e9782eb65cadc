//! Sequential shell command execution
//!
//! Every dataset recipe is a literal list of shell command strings. This
//! module runs such a list, one command at a time, inside a work directory
//! that is created on demand.
//!
//! # Failure Policy
//!
//! Each exit status is observed and recorded in a [`RunReport`]. Under
//! [`FailurePolicy::Continue`] a failing command is logged and the list goes
//! on; under [`FailurePolicy::Abort`] the first failure ends the list with
//! [`FetchError::CommandFailed`]. A shell that cannot be spawned is an error
//! under both policies.

use std::path::Path;
use std::process::{Command, Stdio};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::{debug, info, warn};

use crate::error::{FetchError, Result};
use crate::process_guard::{ChildRegistry, CommandProcessGroup};

/// Shell used when none is configured
pub const DEFAULT_SHELL: &str = "sh";

/// What to do when a command exits unsuccessfully
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[derive(Display, EnumString)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Log the failure and run the remaining commands
    #[default]
    Continue,
    /// Stop at the first failing command
    Abort,
}

/// Outcome of a single command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// The command string as handed to the shell.
    pub command: String,
    /// Exit code (None if terminated by signal).
    pub exit_code: Option<i32>,
    /// Whether the command exited successfully (exit code 0).
    pub success: bool,
    /// True when the command was only printed, not run.
    pub dry_run: bool,
}

impl CommandOutput {
    pub fn succeeded(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            exit_code: Some(0),
            success: true,
            dry_run: false,
        }
    }

    pub fn failed(command: impl Into<String>, exit_code: Option<i32>) -> Self {
        Self {
            command: command.into(),
            exit_code,
            success: false,
            dry_run: false,
        }
    }
}

/// Ordered outcomes of one command list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub outputs: Vec<CommandOutput>,
}

impl RunReport {
    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }

    /// Commands that did not exit successfully, in run order
    pub fn failures(&self) -> impl Iterator<Item = &CommandOutput> {
        self.outputs.iter().filter(|o| !o.success)
    }

    pub fn all_succeeded(&self) -> bool {
        self.outputs.iter().all(|o| o.success)
    }

    /// Turn the first recorded failure into an error
    pub fn ensure_success(&self) -> Result<()> {
        match self.failures().next() {
            Some(failed) => Err(FetchError::command_failed(
                failed.command.clone(),
                failed.exit_code,
            )),
            None => Ok(()),
        }
    }
}

/// Executes one command string inside a directory.
///
/// The real implementation is [`ShellRunner`]; tests substitute a recorder.
pub trait CommandRunner {
    /// Run `command` through a shell with `work_dir` as its working directory.
    ///
    /// Returns `Err` only if the command could not be started at all; a
    /// non-zero exit is reported through [`CommandOutput::success`].
    fn run(&mut self, command: &str, work_dir: &Path) -> Result<CommandOutput>;

    /// Whether this runner only prints commands.
    ///
    /// Dry runners leave the filesystem alone, so callers skip directory
    /// creation and any direct filesystem work.
    fn is_dry_run(&self) -> bool {
        false
    }
}

/// Runs commands with `<shell> -c <command>`, inheriting stdout/stderr.
#[derive(Debug, Clone)]
pub struct ShellRunner {
    shell: String,
    dry_run: bool,
}

impl ShellRunner {
    pub fn new(shell: impl Into<String>) -> Self {
        Self {
            shell: shell.into(),
            dry_run: false,
        }
    }

    /// A runner that prints what it would execute and reports success
    pub fn dry_run(shell: impl Into<String>) -> Self {
        Self {
            shell: shell.into(),
            dry_run: true,
        }
    }
}

impl Default for ShellRunner {
    fn default() -> Self {
        Self::new(DEFAULT_SHELL)
    }
}

impl CommandRunner for ShellRunner {
    fn run(&mut self, command: &str, work_dir: &Path) -> Result<CommandOutput> {
        if self.dry_run {
            println!("[DRY RUN] (cd {}) {}", work_dir.display(), command);
            return Ok(CommandOutput {
                dry_run: true,
                ..CommandOutput::succeeded(command)
            });
        }

        info!(dir = %work_dir.display(), "running: {}", command);

        let mut child = Command::new(&self.shell)
            .arg("-c")
            .arg(command)
            .current_dir(work_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .in_new_process_group()
            .spawn()
            .map_err(|e| FetchError::spawn(command, e))?;
        let pid = child.id();

        if let Ok(mut registry) = ChildRegistry::global().lock() {
            registry.register(pid);
        }

        let status = child.wait();

        if let Ok(mut registry) = ChildRegistry::global().lock() {
            registry.unregister(pid);
        }

        let status = status?;
        if status.success() {
            debug!("command succeeded: {}", command);
            Ok(CommandOutput::succeeded(command))
        } else {
            Ok(CommandOutput::failed(command, status.code()))
        }
    }

    fn is_dry_run(&self) -> bool {
        self.dry_run
    }
}

/// Run `commands` in order inside `work_dir`, creating it first if absent.
///
/// # Invariants
///
/// - Exactly one `runner.run` call per command, in list order, all with
///   the same `work_dir`.
/// - `work_dir` exists before the first command starts (unless dry run).
///
/// The directory is checked once, not before every command. A recipe
/// command that deletes `work_dir` makes every later command fail to spawn,
/// which surfaces as [`FetchError::Spawn`] rather than a recorded failure.
pub fn execute_commands<R, S>(
    runner: &mut R,
    commands: &[S],
    work_dir: &Path,
    policy: FailurePolicy,
) -> Result<RunReport>
where
    R: CommandRunner + ?Sized,
    S: AsRef<str>,
{
    if !runner.is_dry_run() && !work_dir.is_dir() {
        debug!(dir = %work_dir.display(), "creating work directory");
        std::fs::create_dir_all(work_dir)?;
    }

    let mut report = RunReport::default();
    for command in commands {
        let command = command.as_ref();
        let output = runner.run(command, work_dir)?;

        if !output.success {
            warn!(
                code = ?output.exit_code,
                dir = %work_dir.display(),
                "command failed: {}",
                command
            );
        }

        report.outputs.push(output);
        if policy == FailurePolicy::Abort {
            report.ensure_success()?;
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_failure_policy_parse() {
        assert_eq!(FailurePolicy::from_str("abort").unwrap(), FailurePolicy::Abort);
        assert_eq!(FailurePolicy::Continue.to_string(), "continue");
        assert!(FailurePolicy::from_str("retry").is_err());
    }

    #[test]
    fn test_report_failures_and_ensure_success() {
        let report = RunReport {
            outputs: vec![
                CommandOutput::succeeded("wget a"),
                CommandOutput::failed("unzip a.zip", Some(9)),
                CommandOutput::failed("mv x y", Some(1)),
            ],
        };

        assert_eq!(report.failures().count(), 2);
        assert!(!report.all_succeeded());
        match report.ensure_success() {
            Err(FetchError::CommandFailed { command, code }) => {
                assert_eq!(command, "unzip a.zip");
                assert_eq!(code, Some(9));
            }
            other => panic!("expected CommandFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_report_succeeds() {
        let report = RunReport::default();
        assert!(report.is_empty());
        assert!(report.ensure_success().is_ok());
    }

    #[test]
    fn test_shell_runner_reports_exit_code() {
        let dir = tempfile::tempdir().unwrap();
        let mut runner = ShellRunner::default();

        let ok = runner.run("true", dir.path()).unwrap();
        assert!(ok.success);

        let failed = runner.run("exit 3", dir.path()).unwrap();
        assert!(!failed.success);
        assert_eq!(failed.exit_code, Some(3));
    }

    #[test]
    fn test_shell_runner_uses_work_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut runner = ShellRunner::default();

        runner.run("echo hi > marker.txt", dir.path()).unwrap();
        let content = std::fs::read_to_string(dir.path().join("marker.txt")).unwrap();
        assert_eq!(content.trim(), "hi");
    }

    #[test]
    fn test_missing_shell_is_spawn_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut runner = ShellRunner::new("/nonexistent/shell");
        let err = runner.run("true", dir.path()).unwrap_err();
        assert!(matches!(err, FetchError::Spawn { .. }));
    }

    #[test]
    fn test_dry_run_does_not_create_dir() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("never");
        let mut runner = ShellRunner::dry_run(DEFAULT_SHELL);

        let report =
            execute_commands(&mut runner, &["touch file"], &target, FailurePolicy::Continue)
                .unwrap();

        assert!(!target.exists());
        assert_eq!(report.len(), 1);
        assert!(report.outputs[0].dry_run);
    }
}
