//! EuRoC MAV recipe and post-extraction layout.
//!
//! The ETH research collection ships EuRoC as three group archives. Each
//! group holds one directory per sequence containing a nested
//! `<Sequence>.zip` (the ASL `mav0/` tree) and a `<Sequence>.bag`
//! recording. The shell recipe downloads and unpacks everything in place;
//! [`reorganize`] then flattens it to `<work>/EuRoC/<Short>/`.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{FetchError, Result};

/// Top-level directory under the work path
pub const DIR_NAME: &str = "EuRoC";

/// Group directories produced by the archives, in download order
pub const GROUPS: &[&str] = &["machine_hall", "vicon_room1", "vicon_room2"];

/// Extension of the embedded ROS recording
const RECORDING_EXT: &str = "bag";

/// Leftover directory some zip tools add
const MACOS_METADATA: &str = "__MACOSX";

pub const COMMANDS: &[&str] = &[
    "wget -c https://www.research-collection.ethz.ch/bitstream/handle/20.500.11850/690084/machine_hall.zip",
    "wget -c https://www.research-collection.ethz.ch/bitstream/handle/20.500.11850/690084/vicon_room1.zip",
    "wget -c https://www.research-collection.ethz.ch/bitstream/handle/20.500.11850/690084/vicon_room2.zip",
    "unzip -o -q machine_hall.zip",
    "unzip -o -q vicon_room1.zip",
    "unzip -o -q vicon_room2.zip",
    "find machine_hall vicon_room1 vicon_room2 -mindepth 2 -maxdepth 2 -name '*.zip' -execdir unzip -o -q {} \\;",
    "find machine_hall vicon_room1 vicon_room2 -mindepth 2 -maxdepth 2 -name '*.zip' -delete",
    "rm -f machine_hall.zip vicon_room1.zip vicon_room2.zip",
];

/// Short sequence name used for the final directory.
///
/// Drops the difficulty suffix and the underscores:
/// `MH_01_easy` → `MH01`, `V2_03_difficult` → `V203`.
pub fn short_name(sequence: &str) -> Option<String> {
    let (base, difficulty) = sequence.rsplit_once('_')?;
    if !matches!(difficulty, "easy" | "medium" | "difficult") {
        return None;
    }
    let short: String = base.chars().filter(|c| *c != '_').collect();
    if short.is_empty() || !short.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(short)
}

/// Flatten the extracted group directories under `root` (`<work>/EuRoC`).
///
/// Returns the final sequence directories in the order they were moved.
/// Sequences whose target already exists are left where they are, so a
/// second run over a finished layout is a no-op.
pub fn reorganize(root: &Path) -> Result<Vec<PathBuf>> {
    let mut moved = Vec::new();

    for group in GROUPS {
        let group_dir = root.join(group);
        if !group_dir.is_dir() {
            debug!(group = %group_dir.display(), "group directory absent, skipping");
            continue;
        }

        for entry in sorted_entries(&group_dir)? {
            let Some(name) = entry.file_name().and_then(|n| n.to_str()).map(str::to_owned)
            else {
                continue;
            };
            if entry.is_dir() {
                if let Some(target) = move_sequence(root, &entry, &name)? {
                    moved.push(target);
                }
            } else if is_recording(&entry) {
                relocate_stray_recording(root, &entry)?;
            }
        }

        remove_scaffolding(&group_dir)?;
    }

    let metadata = root.join(MACOS_METADATA);
    if metadata.is_dir() {
        fs::remove_dir_all(&metadata)
            .map_err(|e| FetchError::reorganize(&metadata, e.to_string()))?;
    }

    info!(count = moved.len(), "EuRoC sequences in place");
    Ok(moved)
}

fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = fs::read_dir(dir)
        .map_err(|e| FetchError::reorganize(dir, e.to_string()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()
        .map_err(|e| FetchError::reorganize(dir, e.to_string()))?;
    entries.sort();
    Ok(entries)
}

fn is_recording(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == RECORDING_EXT)
}

/// Move `<group>/<Sequence>` to `<root>/<Short>` and rename its recording.
fn move_sequence(root: &Path, source: &Path, name: &str) -> Result<Option<PathBuf>> {
    if name == MACOS_METADATA {
        return Ok(None);
    }
    let Some(short) = short_name(name) else {
        warn!(dir = %source.display(), "not a EuRoC sequence directory, leaving it");
        return Ok(None);
    };

    let target = root.join(&short);
    if target.exists() {
        warn!(target = %target.display(), "sequence already in place, skipping");
        return Ok(None);
    }

    fs::rename(source, &target).map_err(|e| FetchError::reorganize(source, e.to_string()))?;
    debug!(from = %source.display(), to = %target.display(), "moved sequence");

    let recording = target.join(format!("{}.{}", name, RECORDING_EXT));
    if recording.is_file() {
        let renamed = target.join(format!("{}.{}", short, RECORDING_EXT));
        fs::rename(&recording, &renamed)
            .map_err(|e| FetchError::reorganize(&recording, e.to_string()))?;
    }

    Ok(Some(target))
}

/// A recording lying next to the sequence directories goes into its sequence
fn relocate_stray_recording(root: &Path, recording: &Path) -> Result<()> {
    let Some(short) = recording
        .file_stem()
        .and_then(|s| s.to_str())
        .and_then(short_name)
    else {
        return Ok(());
    };

    let sequence_dir = root.join(&short);
    if !sequence_dir.is_dir() {
        fs::create_dir_all(&sequence_dir)
            .map_err(|e| FetchError::reorganize(&sequence_dir, e.to_string()))?;
    }

    let target = sequence_dir.join(format!("{}.{}", short, RECORDING_EXT));
    if target.exists() {
        warn!(target = %target.display(), "recording already in place, skipping");
        return Ok(());
    }
    fs::rename(recording, &target)
        .map_err(|e| FetchError::reorganize(recording, e.to_string()))
}

/// Remove a group directory once everything useful has left it
fn remove_scaffolding(group_dir: &Path) -> Result<()> {
    let metadata = group_dir.join(MACOS_METADATA);
    if metadata.is_dir() {
        fs::remove_dir_all(&metadata)
            .map_err(|e| FetchError::reorganize(&metadata, e.to_string()))?;
    }

    match fs::remove_dir(group_dir) {
        Ok(()) => {
            debug!(group = %group_dir.display(), "removed group directory");
            Ok(())
        }
        Err(e) if group_dir.read_dir().is_ok_and(|mut d| d.next().is_some()) => {
            warn!(
                group = %group_dir.display(),
                error = %e,
                "group directory not empty, keeping it"
            );
            Ok(())
        }
        Err(e) => Err(FetchError::reorganize(group_dir, e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"x").unwrap();
    }

    #[test]
    fn test_short_name() {
        assert_eq!(short_name("MH_01_easy").as_deref(), Some("MH01"));
        assert_eq!(short_name("MH_04_difficult").as_deref(), Some("MH04"));
        assert_eq!(short_name("V1_02_medium").as_deref(), Some("V102"));
        assert_eq!(short_name("V2_03_difficult").as_deref(), Some("V203"));
    }

    #[test]
    fn test_short_name_rejects_other_names() {
        assert_eq!(short_name("mav0"), None);
        assert_eq!(short_name("MH_01"), None);
        assert_eq!(short_name("_easy"), None);
        assert_eq!(short_name("__MACOSX"), None);
    }

    #[test]
    fn test_reorganize_flattens_groups() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(&root.join("machine_hall/MH_01_easy/mav0/cam0/data.csv"));
        touch(&root.join("machine_hall/MH_01_easy/MH_01_easy.bag"));
        touch(&root.join("vicon_room2/V2_03_difficult/mav0/imu0/data.csv"));
        touch(&root.join("vicon_room2/V2_03_difficult.bag"));
        touch(&root.join("vicon_room2/__MACOSX/junk"));

        let moved = reorganize(root).unwrap();

        assert_eq!(moved, vec![root.join("MH01"), root.join("V203")]);
        assert!(root.join("MH01/mav0/cam0/data.csv").is_file());
        assert!(root.join("MH01/MH01.bag").is_file());
        assert!(root.join("V203/mav0/imu0/data.csv").is_file());
        assert!(root.join("V203/V203.bag").is_file());
        assert!(!root.join("machine_hall").exists());
        assert!(!root.join("vicon_room2").exists());
    }

    #[test]
    fn test_reorganize_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(&root.join("vicon_room1/V1_01_easy/mav0/state.csv"));

        reorganize(root).unwrap();
        let second = reorganize(root).unwrap();

        assert!(second.is_empty());
        assert!(root.join("V101/mav0/state.csv").is_file());
    }

    #[test]
    fn test_reorganize_keeps_unknown_content() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(&root.join("machine_hall/README.txt"));
        touch(&root.join("machine_hall/MH_02_easy/mav0/x"));

        let moved = reorganize(root).unwrap();

        assert_eq!(moved, vec![root.join("MH02")]);
        assert!(root.join("machine_hall/README.txt").is_file());
    }

    #[test]
    fn test_existing_target_is_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(&root.join("MH05/keep.txt"));
        touch(&root.join("machine_hall/MH_05_difficult/mav0/x"));

        let moved = reorganize(root).unwrap();

        assert!(moved.is_empty());
        assert!(root.join("MH05/keep.txt").is_file());
        assert!(root.join("machine_hall/MH_05_difficult/mav0/x").is_file());
    }
}
