//! Interactive prompts.
//!
//! Prompts take any `BufRead`/`Write` pair so they run against stdin/stdout
//! in the binary and against byte buffers in tests. EOF reads as an empty
//! answer.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use crate::error::{FetchError, Result};
use crate::selector;

/// Print `question` and read one trimmed line
pub fn ask<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    question: &str,
) -> Result<String> {
    write!(output, "{}", question)?;
    output.flush()?;

    let mut line = String::new();
    input
        .read_line(&mut line)
        .map_err(|e| FetchError::input(format!("failed to read answer: {}", e)))?;
    Ok(line.trim().to_string())
}

/// Ask for the work path; an empty answer means `current_dir`.
pub fn ask_work_path<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    current_dir: &Path,
) -> Result<PathBuf> {
    let answer = ask(
        input,
        output,
        &format!("Work path [{}]: ", current_dir.display()),
    )?;
    Ok(resolve_work_path(Path::new(&answer), current_dir))
}

/// Show the menu and read the selection string
pub fn ask_choices<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<String> {
    write!(output, "{}", selector::menu())?;
    ask(
        input,
        output,
        &format!("Datasets to fetch (comma-separated, or '{}'): ", selector::ALL),
    )
}

/// Resolve a work path against `current_dir` and `$HOME`.
///
/// Works on the raw path, so non-UTF-8 names pass through unchanged.
pub fn resolve_work_path(path: &Path, current_dir: &Path) -> PathBuf {
    let home = std::env::var_os("HOME").map(PathBuf::from);
    resolve_work_path_with_home(path, current_dir, home.as_deref())
}

/// Empty → `current_dir`, `~` and `~/...` → under `home`, relative → under
/// `current_dir`. `~user` forms are taken literally.
pub fn resolve_work_path_with_home(
    path: &Path,
    current_dir: &Path,
    home: Option<&Path>,
) -> PathBuf {
    if path.as_os_str().is_empty() {
        return current_dir.to_path_buf();
    }

    let expanded = match (path.strip_prefix("~"), home) {
        (Ok(rest), Some(home)) if rest.as_os_str().is_empty() => home.to_path_buf(),
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    };

    if expanded.is_absolute() {
        expanded
    } else {
        current_dir.join(expanded)
    }
}
