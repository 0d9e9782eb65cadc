//! Dataset selection and dispatch.
//!
//! The menu lists every registered [`Dataset`] by key. A selection string
//! is a comma-separated list of keys or the token `all`; whatever it names
//! is fetched in menu order, each dataset at most once. Unknown keys are
//! ignored.

use std::path::Path;

use strum::IntoEnumIterator;
use tracing::{debug, info, warn};

use crate::command_runner::{CommandRunner, FailurePolicy, RunReport};
use crate::datasets::Dataset;
use crate::error::{exit_code_label, Result};

/// Token selecting every dataset
pub const ALL: &str = "all";

/// Render the static dataset menu
pub fn menu() -> String {
    let mut out = String::from("Available datasets:\n");
    for dataset in Dataset::iter() {
        out.push_str(&format!("  {}) {}\n", dataset.key(), dataset.display_name()));
    }
    out.push_str(&format!("  {}) every dataset above\n", ALL));
    out
}

/// Parse a selection string into datasets, in menu order without repeats.
pub fn parse_choices(input: &str) -> Vec<Dataset> {
    let tokens: Vec<&str> = input
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect();

    if tokens.iter().any(|t| t.eq_ignore_ascii_case(ALL)) {
        return Dataset::iter().collect();
    }

    let mut chosen = Vec::new();
    for token in tokens {
        match Dataset::from_key(token) {
            Some(dataset) => chosen.push(dataset),
            None => debug!(choice = token, "ignoring unknown dataset choice"),
        }
    }

    Dataset::iter().filter(|d| chosen.contains(d)).collect()
}

/// Per-dataset results of one selection run
#[derive(Debug, Default)]
pub struct SelectionReport {
    pub fetched: Vec<(Dataset, RunReport)>,
}

impl SelectionReport {
    pub fn datasets(&self) -> Vec<Dataset> {
        self.fetched.iter().map(|(d, _)| *d).collect()
    }

    pub fn failure_count(&self) -> usize {
        self.fetched.iter().map(|(_, r)| r.failures().count()).sum()
    }

    /// Human readable list of failed commands, empty when all succeeded
    pub fn failure_summary(&self) -> String {
        let mut out = String::new();
        for (dataset, report) in &self.fetched {
            for failed in report.failures() {
                let code = exit_code_label(&failed.exit_code);
                out.push_str(&format!(
                    "  {}: `{}` (exit code {})\n",
                    dataset.display_name(),
                    failed.command,
                    code
                ));
            }
        }
        out
    }
}

/// Fetch each of `datasets` under `work_path`, stopping only on errors.
pub fn run<R>(
    runner: &mut R,
    datasets: &[Dataset],
    work_path: &Path,
    policy: FailurePolicy,
) -> Result<SelectionReport>
where
    R: CommandRunner + ?Sized,
{
    if datasets.is_empty() {
        info!("no datasets selected");
    }

    let mut report = SelectionReport::default();
    for dataset in datasets {
        let run = dataset.fetch(runner, work_path, policy)?;
        if !run.all_succeeded() {
            warn!(
                dataset = %dataset,
                failures = run.failures().count(),
                "dataset finished with failed commands"
            );
        }
        report.fetched.push((*dataset, run));
    }

    Ok(report)
}
