//! Directory layout of the snaprd world.
//!
//! Every path the daemon derives hangs off a small set of well-known
//! directories. They are exposed as functions rather than constants because
//! the whole tree can be re-rooted: tests and image builds point snaprd at a
//! scratch directory instead of `/`.

use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Environment variable that re-roots the directory tree for the process.
pub const ROOT_ENV: &str = "SNAPRD_ROOT";

static ROOT_OVERRIDE: RwLock<Option<PathBuf>> = RwLock::new(None);

/// Returns the filesystem root all snaprd directories live under.
///
/// Resolution order: explicit [`set_root`] override, then the `SNAPRD_ROOT`
/// environment variable, then `/`.
pub fn root() -> PathBuf {
    if let Some(root) = ROOT_OVERRIDE
        .read()
        .expect("dirs root lock poisoned")
        .as_ref()
    {
        return root.clone();
    }
    if let Ok(val) = std::env::var(ROOT_ENV) {
        return PathBuf::from(val);
    }
    PathBuf::from("/")
}

/// Re-roots the whole directory tree under `path`.
///
/// Set once before any concurrent use; the derivation functions read the
/// root on every call, so a mid-flight change would make paths from the
/// same load disagree with each other.
pub fn set_root(path: impl AsRef<Path>) {
    let mut guard = ROOT_OVERRIDE.write().expect("dirs root lock poisoned");
    *guard = Some(path.as_ref().to_path_buf());
}

/// Clears a [`set_root`] override, falling back to the environment or `/`.
pub fn reset_root() {
    let mut guard = ROOT_OVERRIDE.write().expect("dirs root lock poisoned");
    *guard = None;
}

/// Base directory under which snaps are mounted: `<root>/snap`.
pub fn snap_mount_dir() -> PathBuf {
    root().join("snap")
}

/// Directory holding the snap archive files: `<root>/var/lib/snaprd/snaps`.
pub fn snap_blob_dir() -> PathBuf {
    root().join("var/lib/snaprd/snaps")
}

/// System data directory for snaps: `<root>/var/snap`.
pub fn snap_data_dir() -> PathBuf {
    root().join("var/snap")
}

/// Glob matching every user's snap data directory: `<root>/home/*/snap`.
pub fn snap_data_home_glob() -> PathBuf {
    root().join("home/*/snap")
}

/// Glob matching every user's XDG runtime directory: `<root>/run/user/*`.
pub fn xdg_runtime_dir_glob() -> PathBuf {
    root().join("run/user/*")
}

/// Directory systemd units for snap services are written to:
/// `<root>/etc/systemd/system`.
pub fn snap_services_dir() -> PathBuf {
    root().join("etc/systemd/system")
}

/// Directory desktop entries for snap apps are written to:
/// `<root>/var/lib/snaprd/desktop/applications`.
pub fn snap_desktop_files_dir() -> PathBuf {
    root().join("var/lib/snaprd/desktop/applications")
}

/// Directory the app wrapper binaries live in: `<root>/snap/bin`.
pub fn snap_binaries_dir() -> PathBuf {
    snap_mount_dir().join("bin")
}

/// Directory bash completion snippets are installed to:
/// `<root>/usr/share/bash-completion/completions`.
pub fn completers_dir() -> PathBuf {
    root().join("usr/share/bash-completion/completions")
}

#[cfg(test)]
mod tests {
    use super::*;

    // The override is process-global, so everything that touches it lives in
    // one test to keep the harness's parallelism out of the picture.
    #[test]
    fn rerooting_moves_every_directory() {
        set_root("/scratch");
        assert_eq!(snap_mount_dir(), PathBuf::from("/scratch/snap"));
        assert_eq!(
            snap_blob_dir(),
            PathBuf::from("/scratch/var/lib/snaprd/snaps")
        );
        assert_eq!(snap_data_dir(), PathBuf::from("/scratch/var/snap"));
        assert_eq!(
            snap_data_home_glob(),
            PathBuf::from("/scratch/home/*/snap")
        );
        assert_eq!(xdg_runtime_dir_glob(), PathBuf::from("/scratch/run/user/*"));
        assert_eq!(
            snap_services_dir(),
            PathBuf::from("/scratch/etc/systemd/system")
        );
        assert_eq!(
            snap_desktop_files_dir(),
            PathBuf::from("/scratch/var/lib/snaprd/desktop/applications")
        );
        assert_eq!(snap_binaries_dir(), PathBuf::from("/scratch/snap/bin"));
        assert_eq!(
            completers_dir(),
            PathBuf::from("/scratch/usr/share/bash-completion/completions")
        );

        reset_root();
        // Back on the real root (or whatever SNAPRD_ROOT says) the suffixes
        // still hold.
        assert!(snap_mount_dir().ends_with("snap"));
        assert!(snap_binaries_dir().ends_with("snap/bin"));
    }
}
