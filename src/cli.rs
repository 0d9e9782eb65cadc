use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// robofetch - download EuRoC MAV and KITTI odometry datasets
#[derive(Parser, Debug)]
#[command(name = "robofetch")]
#[command(about = "Download and lay out public robotics datasets")]
#[command(version)]
pub struct Cli {
    /// Print the shell commands instead of running them.
    ///
    /// Nothing is downloaded and no directory is created or reorganized.
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Root directory for downloads (prompted for when omitted)
    #[arg(short, long)]
    pub work_path: Option<PathBuf>,

    /// Datasets to fetch: comma-separated menu keys or "all" (prompted for when omitted)
    #[arg(short, long)]
    pub datasets: Option<String>,

    /// Stop at the first failing command instead of continuing
    #[arg(long)]
    pub strict: bool,

    /// Shell used to run each command
    #[arg(long)]
    pub shell: Option<String>,

    /// Load a JSON fetch plan; explicit flags override its fields
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Write the effective fetch plan to this file before fetching
    #[arg(long)]
    pub save_config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the dataset menu and exit
    List,
    /// Validate a fetch plan file
    Validate {
        /// Path to fetch plan to validate
        config: PathBuf,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        <Self as clap::Parser>::parse()
    }
}
