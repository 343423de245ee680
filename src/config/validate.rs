//! Source path validation.
//! Runs before any archive is built; performs no filesystem mutation.

use std::fs;
use std::io;
use std::path::Path;
use tracing::debug;

use crate::errors::FarwriteError;

/// The source must be non-empty, exist, and be a directory (symlinks followed).
pub fn validate_source(path: &Path) -> Result<(), FarwriteError> {
    if path.as_os_str().is_empty() {
        return Err(FarwriteError::EmptySource);
    }
    let meta = match fs::metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(FarwriteError::SourceNotFound(path.to_path_buf()));
        }
        Err(e) => {
            return Err(FarwriteError::archiving(path, e));
        }
    };
    if !meta.is_dir() {
        return Err(FarwriteError::NotADirectory(path.to_path_buf()));
    }
    debug!(path = %path.display(), "source validated");
    Ok(())
}
