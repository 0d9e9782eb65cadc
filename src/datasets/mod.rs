//! Dataset registry
//!
//! Each [`Dataset`] variant is one menu entry. Its iteration order (via
//! `strum::EnumIter`) is the registration order used by the menu and by
//! the "all" selection.

pub mod euroc;
pub mod kitti;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};
use tracing::info;

use crate::command_runner::{execute_commands, CommandRunner, FailurePolicy, RunReport};
use crate::error::Result;

/// A dataset robofetch knows how to download
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Dataset {
    Euroc,
    KittiPoses,
    KittiCalib,
    KittiGray,
    KittiColor,
}

impl Dataset {
    /// Human readable menu label
    pub fn display_name(&self) -> &'static str {
        match self {
            Dataset::Euroc => "EuRoC MAV",
            Dataset::KittiPoses => "KITTI odometry ground-truth poses",
            Dataset::KittiCalib => "KITTI odometry calibration",
            Dataset::KittiGray => "KITTI odometry grayscale images",
            Dataset::KittiColor => "KITTI odometry color images",
        }
    }

    /// Menu key: 1-based position in registration order
    pub fn key(&self) -> usize {
        Dataset::iter().position(|d| d == *self).map_or(0, |i| i + 1)
    }

    /// Look up a dataset by its menu key
    pub fn from_key(key: &str) -> Option<Dataset> {
        let index: usize = key.trim().parse().ok()?;
        index.checked_sub(1).and_then(|i| Dataset::iter().nth(i))
    }

    /// Fixed shell recipe for this dataset
    pub fn commands(&self) -> &'static [&'static str] {
        match self {
            Dataset::Euroc => euroc::COMMANDS,
            Dataset::KittiPoses => kitti::POSES_COMMANDS,
            Dataset::KittiCalib => kitti::CALIB_COMMANDS,
            Dataset::KittiGray => kitti::GRAY_COMMANDS,
            Dataset::KittiColor => kitti::COLOR_COMMANDS,
        }
    }

    /// Directory under `work_path` that this dataset's commands run in
    pub fn target_dir(&self, work_path: &Path) -> PathBuf {
        match self {
            Dataset::Euroc => work_path.join(euroc::DIR_NAME),
            Dataset::KittiPoses => work_path.join(kitti::DIR_NAME).join("poses"),
            Dataset::KittiCalib => work_path.join(kitti::DIR_NAME).join("calib"),
            Dataset::KittiGray => work_path.join(kitti::DIR_NAME).join("gray"),
            Dataset::KittiColor => work_path.join(kitti::DIR_NAME).join("color"),
        }
    }

    /// Download and lay out this dataset under `work_path`.
    ///
    /// EuRoC additionally reorganizes the extracted tree directly on the
    /// filesystem once its commands have run; dry runs skip that step.
    pub fn fetch<R>(
        &self,
        runner: &mut R,
        work_path: &Path,
        policy: FailurePolicy,
    ) -> Result<RunReport>
    where
        R: CommandRunner + ?Sized,
    {
        let dir = self.target_dir(work_path);
        info!(dataset = %self, dir = %dir.display(), "fetching {}", self.display_name());

        let report = execute_commands(runner, self.commands(), &dir, policy)?;

        if *self == Dataset::Euroc {
            if runner.is_dry_run() {
                info!("[DRY RUN] skipping EuRoC reorganization");
            } else {
                euroc::reorganize(&dir)?;
            }
        }

        Ok(report)
    }
}
