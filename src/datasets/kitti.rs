//! KITTI odometry recipes.
//!
//! All four archives unpack into `dataset/poses` or `dataset/sequences/NN`;
//! the recipes flatten that into the subset directory and drop the archive.

/// Top-level directory under the work path
pub const DIR_NAME: &str = "KITTI";

/// Ground-truth poses: `<work>/KITTI/poses/NN.txt`
pub const POSES_COMMANDS: &[&str] = &[
    "wget -c https://s3.eu-central-1.amazonaws.com/avg-kitti/data_odometry_poses.zip",
    "unzip -o -q data_odometry_poses.zip",
    "mv dataset/poses/* .",
    "rm -rf dataset data_odometry_poses.zip",
];

/// Calibration and timestamps: `<work>/KITTI/calib/NN/{calib,times}.txt`
pub const CALIB_COMMANDS: &[&str] = &[
    "wget -c https://s3.eu-central-1.amazonaws.com/avg-kitti/data_odometry_calib.zip",
    "unzip -o -q data_odometry_calib.zip",
    "find dataset/sequences -mindepth 1 -maxdepth 1 -type d -exec mv -f {} . \\;",
    "rm -rf dataset data_odometry_calib.zip",
];

/// Grayscale stereo: `<work>/KITTI/gray/NN/image_{0,1}/`
pub const GRAY_COMMANDS: &[&str] = &[
    "wget -c https://s3.eu-central-1.amazonaws.com/avg-kitti/data_odometry_gray.zip",
    "unzip -o -q data_odometry_gray.zip",
    "find dataset/sequences -mindepth 1 -maxdepth 1 -type d -exec mv -f {} . \\;",
    "rm -rf dataset data_odometry_gray.zip",
];

/// Color stereo: `<work>/KITTI/color/NN/image_{2,3}/`
pub const COLOR_COMMANDS: &[&str] = &[
    "wget -c https://s3.eu-central-1.amazonaws.com/avg-kitti/data_odometry_color.zip",
    "unzip -o -q data_odometry_color.zip",
    "find dataset/sequences -mindepth 1 -maxdepth 1 -type d -exec mv -f {} . \\;",
    "rm -rf dataset data_odometry_color.zip",
];
