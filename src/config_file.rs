//! Fetch plans saved as JSON.
//!
//! A plan pins down everything the prompts would otherwise ask for, so a
//! download can be repeated unattended:
//!
//! ```json
//! { "work_path": "/data", "datasets": "1,2", "failure_policy": "abort", "shell": "sh" }
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use strum::IntoEnumIterator;

use crate::cli::Cli;
use crate::command_runner::{FailurePolicy, DEFAULT_SHELL};
use crate::datasets::Dataset;
use crate::error::FetchError;
use crate::{prompt, selector};

fn default_shell() -> String {
    DEFAULT_SHELL.to_string()
}

/// Saved answers for one fetch run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Root directory; `None` means ask (or use the current directory)
    #[serde(default)]
    pub work_path: Option<PathBuf>,
    /// Selection string as typed at the menu (`"1,3"` or `"all"`)
    pub datasets: String,
    #[serde(default)]
    pub failure_policy: FailurePolicy,
    #[serde(default = "default_shell")]
    pub shell: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            work_path: None,
            datasets: selector::ALL.to_string(),
            failure_policy: FailurePolicy::default(),
            shell: default_shell(),
        }
    }
}

impl FetchConfig {
    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize fetch plan to JSON")?;

        fs::write(&path, json)
            .with_context(|| format!("Failed to write fetch plan to {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Load configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read fetch plan from {:?}", path.as_ref()))?;

        let config: Self =
            serde_json::from_str(&content).context("Failed to parse fetch plan JSON")?;

        Ok(config)
    }

    /// Datasets this plan selects, in menu order
    pub fn selected(&self) -> Vec<Dataset> {
        selector::parse_choices(&self.datasets)
    }

    pub fn validate(&self) -> crate::error::Result<()> {
        if self.shell.trim().is_empty() {
            return Err(FetchError::config("Shell must not be empty"));
        }

        if self.selected().is_empty() {
            return Err(FetchError::config(format!(
                "Dataset selection {:?} matches no dataset (use keys 1-{} or '{}')",
                self.datasets,
                Dataset::iter().count(),
                selector::ALL
            )));
        }

        if let Some(path) = &self.work_path {
            if path.as_os_str().is_empty() {
                return Err(FetchError::config("Work path must not be empty when given"));
            }
            if path.exists() && !path.is_dir() {
                return Err(FetchError::config(format!(
                    "Work path {:?} exists and is not a directory",
                    path
                )));
            }
        }

        Ok(())
    }

    /// Build the plan a fetch actually runs with.
    ///
    /// Each field comes from the command line if given, then from `plan`,
    /// then from a prompt on `input`/`output`. `--strict` forces
    /// [`FailurePolicy::Abort`] whatever the plan says. The returned work
    /// path is always resolved against `current_dir`.
    pub fn resolve<R: BufRead, W: Write>(
        cli: &Cli,
        plan: Option<FetchConfig>,
        current_dir: &Path,
        input: &mut R,
        output: &mut W,
    ) -> Result<Self> {
        let base = plan.unwrap_or_else(|| FetchConfig {
            datasets: String::new(),
            ..FetchConfig::default()
        });

        let work_path = match cli.work_path.as_deref().or(base.work_path.as_deref()) {
            Some(path) => prompt::resolve_work_path(path, current_dir),
            None => prompt::ask_work_path(input, output, current_dir)?,
        };

        let datasets = match cli.datasets.as_ref() {
            Some(choices) => choices.clone(),
            None if !base.datasets.is_empty() => base.datasets,
            None => prompt::ask_choices(input, output)?,
        };

        let failure_policy = if cli.strict {
            FailurePolicy::Abort
        } else {
            base.failure_policy
        };

        Ok(FetchConfig {
            work_path: Some(work_path),
            datasets,
            failure_policy,
            shell: cli.shell.clone().unwrap_or(base.shell),
        })
    }
}
