//! Read access to a snap's content.
//!
//! The loaders only need to read single files, list a directory, and ask
//! for the total size; [`Container`] captures exactly that. The directory
//! implementation below covers unpacked snaps; mounted squashfs images
//! satisfy the same trait from the code that owns those mounts.

use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Read access to the files of a snap.
pub trait Container {
    /// Reads the file at `rel`, a path relative to the container root.
    fn read_file(&self, rel: &str) -> io::Result<Vec<u8>>;

    /// Lists the names of the entries directly under `rel`, sorted.
    fn list_dir(&self, rel: &str) -> io::Result<Vec<String>>;

    /// The total size of the snap's content in bytes.
    fn size(&self) -> io::Result<u64>;
}

/// A snap laid out as a plain directory tree, as produced by unpacking a
/// snap for inspection or during a try install.
#[derive(Debug, Clone)]
pub struct SnapDir {
    path: PathBuf,
}

impl SnapDir {
    /// Opens the unpacked snap rooted at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        SnapDir { path: path.into() }
    }

    /// The directory this container reads from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Container for SnapDir {
    fn read_file(&self, rel: &str) -> io::Result<Vec<u8>> {
        std::fs::read(self.path.join(rel))
    }

    fn list_dir(&self, rel: &str) -> io::Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in std::fs::read_dir(self.path.join(rel))? {
            names.push(entry?.file_name().to_string_lossy().into_owned());
        }
        names.sort_unstable();
        Ok(names)
    }

    fn size(&self) -> io::Result<u64> {
        let mut total = 0;
        for entry in WalkDir::new(&self.path) {
            let entry = entry.map_err(io::Error::from)?;
            if entry.file_type().is_file() {
                total += entry.metadata().map_err(io::Error::from)?.len();
            }
        }
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn reads_and_lists_and_sizes() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("meta/hooks")).unwrap();
        fs::write(dir.path().join("meta/snap.yaml"), "name: x\nversion: 1\n").unwrap();
        fs::write(dir.path().join("meta/hooks/configure"), "#!/bin/sh\n").unwrap();
        fs::write(dir.path().join("meta/hooks/apply"), "#!/bin/sh\n").unwrap();

        let snap = SnapDir::new(dir.path());
        assert_eq!(snap.path(), dir.path());
        assert_eq!(snap.read_file("meta/snap.yaml").unwrap(), b"name: x\nversion: 1\n");
        assert_eq!(snap.list_dir("meta/hooks").unwrap(), vec!["apply", "configure"]);
        let expected = "name: x\nversion: 1\n".len() + 2 * "#!/bin/sh\n".len();
        assert_eq!(snap.size().unwrap(), expected as u64);
    }

    #[test]
    fn missing_paths_surface_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let snap = SnapDir::new(dir.path());
        let err = snap.read_file("meta/snap.yaml").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        let err = snap.list_dir("meta/hooks").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
