//! Filesystem locations of an installed snap.
//!
//! Everything here derives from a snap name and a revision; nothing touches
//! the disk. The same derivations are exposed as methods on
//! [`Info`](crate::info::Info) through [`PlaceInfo`](crate::info::PlaceInfo).

use std::path::{Path, PathBuf};

use crate::revision::Revision;

fn check_name(name: &str) {
    debug_assert!(!name.is_empty(), "internal error: snap name left unset");
}

/// Where the snap's squashfs is mounted: `<mount-root>/<name>/<revision>`.
pub fn mount_dir(name: &str, revision: Revision) -> PathBuf {
    check_name(name);
    snaprd_dirs::snap_mount_dir().join(name).join(revision.to_string())
}

/// Where the snap's blob lives: `<blob-root>/<name>_<revision>.snap`.
pub fn mount_file(name: &str, revision: Revision) -> PathBuf {
    check_name(name);
    snaprd_dirs::snap_blob_dir().join(format!("{name}_{revision}.snap"))
}

/// The snap's revisioned system data directory.
pub fn data_dir(name: &str, revision: Revision) -> PathBuf {
    check_name(name);
    snaprd_dirs::snap_data_dir().join(name).join(revision.to_string())
}

/// The snap's system data directory shared across revisions.
pub fn common_data_dir(name: &str) -> PathBuf {
    check_name(name);
    snaprd_dirs::snap_data_dir().join(name).join("common")
}

/// The snap's revisioned data directory under one user's home.
pub fn user_data_dir(home: &Path, name: &str, revision: Revision) -> PathBuf {
    check_name(name);
    home.join("snap").join(name).join(revision.to_string())
}

/// The snap's cross-revision data directory under one user's home.
pub fn user_common_data_dir(home: &Path, name: &str) -> PathBuf {
    check_name(name);
    home.join("snap").join(name).join("common")
}

/// Glob over every user's revisioned data directory for this snap.
pub fn data_home_dir(name: &str, revision: Revision) -> PathBuf {
    check_name(name);
    snaprd_dirs::snap_data_home_glob().join(name).join(revision.to_string())
}

/// Glob over every user's cross-revision data directory for this snap.
pub fn common_data_home_dir(name: &str) -> PathBuf {
    check_name(name);
    snaprd_dirs::snap_data_home_glob().join(name).join("common")
}

/// The snap's transient runtime directory for the user with this uid.
///
/// Always under the real `/run/user`; only the glob form honors the
/// configured root.
pub fn user_xdg_runtime_dir(uid: u32, name: &str) -> PathBuf {
    check_name(name);
    PathBuf::from(format!("/run/user/{uid}/snap.{name}"))
}

/// Glob over every user's transient runtime directory for this snap.
pub fn xdg_runtime_dirs(name: &str) -> PathBuf {
    check_name(name);
    snaprd_dirs::xdg_runtime_dir_glob().join(format!("snap.{name}"))
}
