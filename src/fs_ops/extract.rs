//! In-memory tar archive -> directory tree under a destination root.
//! Entries are applied in archive order; the first failure stops extraction
//! and anything already written stays on disk.

use std::fs::{self, File};
use std::io;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, trace};

use crate::errors::FarwriteError;

use super::archive::EntryKind;

/// Extraction knobs.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractOptions {
    /// Apply the header mode to regular files (unix only).
    pub preserve_permissions: bool,
}

/// Counters reported after a successful extraction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractStats {
    pub directories: usize,
    pub files: usize,
    pub symlinks: usize,
    pub skipped: usize,
    pub bytes: u64,
}

/// Recreate the archived tree under `dest`.
///
/// `dest` itself is created first, so an empty archive still yields an empty
/// destination directory.
pub fn extract_archive(
    archive: &[u8],
    dest: &Path,
    opts: ExtractOptions,
) -> Result<ExtractStats, FarwriteError> {
    create_dir_permissive(dest).map_err(|e| FarwriteError::extracting(dest, e))?;

    let mut stats = ExtractStats::default();
    let mut reader = tar::Archive::new(archive);
    let entries = reader
        .entries()
        .map_err(|e| FarwriteError::extracting(dest, e))?;

    for entry in entries {
        let mut entry = entry.map_err(|e| FarwriteError::extracting(dest, e))?;
        let rel = entry
            .path()
            .map_err(|e| FarwriteError::extracting(dest, e))?
            .into_owned();
        let target = resolve_under(dest, &rel)?;
        let header = entry.header();
        let kind = EntryKind::from(header.entry_type());
        let mode = header.mode().ok();

        match kind {
            EntryKind::Directory => {
                create_dir_permissive(&target)
                    .map_err(|e| FarwriteError::extracting(&target, e))?;
                stats.directories += 1;
            }
            EntryKind::File => {
                if let Some(parent) = target.parent() {
                    create_dir_permissive(parent)
                        .map_err(|e| FarwriteError::extracting(parent, e))?;
                }
                let mut out =
                    File::create(&target).map_err(|e| FarwriteError::extracting(&target, e))?;
                let copied = io::copy(&mut entry, &mut out)
                    .map_err(|e| FarwriteError::extracting(&target, e))?;
                drop(out);
                if opts.preserve_permissions {
                    if let Some(mode) = mode {
                        apply_mode(&target, mode)
                            .map_err(|e| FarwriteError::extracting(&target, e))?;
                    }
                }
                stats.files += 1;
                stats.bytes += copied;
            }
            EntryKind::Symlink => {
                let link = entry
                    .link_name()
                    .map_err(|e| FarwriteError::extracting(&target, e))?
                    .map(|l| l.into_owned());
                let created = match link {
                    Some(link) => create_symlink(&link, &target)?,
                    None => false,
                };
                if created {
                    stats.symlinks += 1;
                } else {
                    debug!(path = %target.display(), "symlink not recreated");
                    stats.skipped += 1;
                }
            }
            EntryKind::Other => {
                debug!(path = %target.display(), "skipping special file");
                stats.skipped += 1;
            }
        }
        trace!(path = %target.display(), ?kind, "extracted");
    }

    debug!(path = %dest.display(), files = stats.files, dirs = stats.directories, "in-memory tar archive extracted to");
    Ok(stats)
}

/// Join `rel` onto `dest`, refusing absolute names and `..` components.
fn resolve_under(dest: &Path, rel: &Path) -> Result<PathBuf, FarwriteError> {
    let mut out = dest.to_path_buf();
    for comp in rel.components() {
        match comp {
            Component::Normal(part) => out.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(FarwriteError::UnsafeEntryPath(rel.to_path_buf()));
            }
        }
    }
    Ok(out)
}

#[cfg(unix)]
fn create_dir_permissive(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    fs::DirBuilder::new().recursive(true).mode(0o777).create(path)
}

#[cfg(not(unix))]
fn create_dir_permissive(path: &Path) -> io::Result<()> {
    fs::create_dir_all(path)
}

#[cfg(unix)]
fn apply_mode(path: &Path, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode & 0o7777))
}

#[cfg(not(unix))]
fn apply_mode(_path: &Path, _mode: u32) -> io::Result<()> {
    Ok(())
}

/// Returns Ok(false) when the platform cannot express the link.
#[cfg(unix)]
fn create_symlink(link: &Path, target: &Path) -> Result<bool, FarwriteError> {
    if link.as_os_str().is_empty() {
        return Ok(false);
    }
    if let Some(parent) = target.parent() {
        create_dir_permissive(parent).map_err(|e| FarwriteError::extracting(parent, e))?;
    }
    std::os::unix::fs::symlink(link, target).map_err(|e| FarwriteError::extracting(target, e))?;
    Ok(true)
}

#[cfg(not(unix))]
fn create_symlink(_link: &Path, _target: &Path) -> Result<bool, FarwriteError> {
    Ok(false)
}
