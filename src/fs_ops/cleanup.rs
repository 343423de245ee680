//! Removal of the paths recorded while archiving.
//!
//! Paths are removed in recorded order. Removing a parent first makes its
//! children disappear, so a missing path counts as already removed.

use std::fs;
use std::io;
use std::path::Path;

use tracing::{debug, trace};

use crate::errors::FarwriteError;

use super::tracked::TrackedPaths;

/// Emit one debug event per tracked path.
pub fn report_tracked_paths(tracked: &TrackedPaths) {
    for path in tracked {
        debug!(path = %path.display(), "tracked path");
    }
}

/// Delete every tracked path, stopping at the first failure.
/// Returns how many paths were actually removed by this call.
pub fn delete_tracked_paths(tracked: &TrackedPaths) -> Result<usize, FarwriteError> {
    let mut removed = 0usize;
    for path in tracked {
        debug!(path = %path.display(), "deleting tracked path");
        match remove_all(path) {
            Ok(true) => removed += 1,
            Ok(false) => trace!(path = %path.display(), "already gone"),
            Err(e) => {
                return Err(FarwriteError::Cleanup {
                    path: path.clone(),
                    source: e,
                });
            }
        }
    }
    Ok(removed)
}

/// Remove `path` and everything beneath it without following symlinks.
/// Ok(false) means there was nothing to remove.
pub fn remove_all(path: &Path) -> io::Result<bool> {
    let meta = match fs::symlink_metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e),
    };
    let res = if meta.file_type().is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    match res {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;

    #[test]
    fn remove_all_handles_files_dirs_and_missing() {
        let dir = assert_fs::TempDir::new().unwrap();
        let f = dir.child("f.txt");
        f.write_str("x").unwrap();
        let d = dir.child("d");
        d.child("deep/inner.txt").write_str("y").unwrap();

        assert!(remove_all(f.path()).unwrap());
        assert!(remove_all(d.path()).unwrap());
        assert!(!f.path().exists());
        assert!(!d.path().exists());
        assert!(!remove_all(&dir.path().join("never")).unwrap());
    }

    #[test]
    fn children_of_removed_parent_are_skipped() {
        let dir = assert_fs::TempDir::new().unwrap();
        let sub = dir.child("sub");
        sub.child("b.txt").write_str("b").unwrap();

        let tracked = TrackedPaths::from(vec![
            sub.path().to_path_buf(),
            sub.path().join("b.txt"),
        ]);
        assert_eq!(delete_tracked_paths(&tracked).unwrap(), 1);
        assert_eq!(delete_tracked_paths(&tracked).unwrap(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn symlink_is_removed_not_its_target() {
        let dir = assert_fs::TempDir::new().unwrap();
        let target = dir.child("target");
        target.child("keep.txt").write_str("k").unwrap();
        let link = dir.path().join("link");
        std::os::unix::fs::symlink(target.path(), &link).unwrap();

        assert!(remove_all(&link).unwrap());
        assert!(target.path().join("keep.txt").exists());
    }
}
