//! robofetch library
//!
//! Downloads public robotics datasets by running fixed shell recipes in a
//! work directory, then lays the results out as `<work>/EuRoC/<seq>` and
//! `<work>/KITTI/<subset>`.

pub mod cli;
pub mod command_runner;
pub mod config_file;
pub mod datasets;
pub mod error;
pub mod process_guard;
pub mod prompt;
pub mod selector;

pub use command_runner::{
    execute_commands, CommandOutput, CommandRunner, FailurePolicy, RunReport, ShellRunner,
};
pub use config_file::FetchConfig;
pub use datasets::Dataset;
pub use error::{FetchError, Result};
pub use process_guard::{ChildRegistry, CommandProcessGroup};
pub use selector::{parse_choices, SelectionReport};
