//! Directory tree -> in-memory tar archive.
//!
//! Walks the source depth-first (parents before children, siblings sorted by
//! name), prunes excluded segment names, and records the absolute path of
//! every visited entry except the root. Regular files are read in full while
//! the walk is paused on them, so the header size always matches the payload.

use std::ffi::{OsStr, OsString};
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use tar::{Builder, EntryType, Header, HeaderMode};
use tracing::{debug, trace};
use walkdir::{DirEntry, WalkDir};

use crate::config::{DEFAULT_EXCLUDED_DIR, DESTINATION_DIR_NAME};
use crate::errors::FarwriteError;

use super::tracked::TrackedPaths;

/// Traversal knobs for [`archive_tree`].
#[derive(Debug, Clone)]
pub struct ArchiveOptions {
    /// Segment names pruned at any depth.
    pub excluded_dirs: Vec<OsString>,
    /// Top-level name pruned directly under the root (the destination folder).
    pub destination_name: Option<OsString>,
}

impl Default for ArchiveOptions {
    fn default() -> Self {
        Self {
            excluded_dirs: vec![OsString::from(DEFAULT_EXCLUDED_DIR)],
            destination_name: Some(OsString::from(DESTINATION_DIR_NAME)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Prune {
    Keep,
    Excluded,
    Destination,
}

impl ArchiveOptions {
    fn classify(&self, entry: &DirEntry) -> Prune {
        if entry.depth() == 0 {
            return Prune::Keep;
        }
        let name = entry.file_name();
        if entry.depth() == 1 && self.destination_name.as_deref() == Some(name) {
            return Prune::Destination;
        }
        if self.excluded_dirs.iter().any(|x| x.as_os_str() == name) {
            return Prune::Excluded;
        }
        Prune::Keep
    }
}

/// What an archive entry represents once extracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
    Symlink,
    Other,
}

impl From<EntryType> for EntryKind {
    fn from(t: EntryType) -> Self {
        if t.is_dir() {
            EntryKind::Directory
        } else if t.is_file() {
            EntryKind::File
        } else if t.is_symlink() {
            EntryKind::Symlink
        } else {
            EntryKind::Other
        }
    }
}

/// Header-level view of one archive record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntrySummary {
    pub path: PathBuf,
    pub kind: EntryKind,
    pub size: u64,
}

/// A complete, uncompressed tar stream held in memory.
#[derive(Debug, Clone)]
pub struct InMemoryArchive {
    bytes: Vec<u8>,
    entry_count: usize,
}

impl InMemoryArchive {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Size of the serialized archive in bytes, end-of-archive blocks included.
    pub fn byte_len(&self) -> usize {
        self.bytes.len()
    }

    pub fn entry_count(&self) -> usize {
        self.entry_count
    }

    /// Read back every header in archive order.
    pub fn entries(&self) -> Result<Vec<EntrySummary>, FarwriteError> {
        let mut archive = tar::Archive::new(self.bytes.as_slice());
        let fail = |e: io::Error| FarwriteError::archiving("<in-memory archive>", e);
        let mut out = Vec::with_capacity(self.entry_count);
        for entry in archive.entries().map_err(fail)? {
            let entry = entry.map_err(fail)?;
            let header = entry.header();
            out.push(EntrySummary {
                path: entry.path().map_err(fail)?.into_owned(),
                kind: EntryKind::from(header.entry_type()),
                size: header.size().map_err(fail)?,
            });
        }
        Ok(out)
    }
}

/// Result of archiving: the archive plus the paths cleanup must remove.
#[derive(Debug, Clone)]
pub struct ArchiveOutput {
    pub archive: InMemoryArchive,
    /// Every archived entry, absolute, in walk order.
    pub tracked: TrackedPaths,
    /// Roots of pruned excluded subtrees. Never archived, removed after the tracked paths.
    pub excluded: TrackedPaths,
}

/// Serialize `src` into an in-memory tar archive.
///
/// Entry names are relative to `src`; the root itself is neither archived nor
/// tracked, and a top-level entry carrying the destination name is skipped
/// without being recorded anywhere. Any failure aborts the walk and no partial
/// archive is returned.
pub fn archive_tree(src: &Path, opts: &ArchiveOptions) -> Result<ArchiveOutput, FarwriteError> {
    let mut builder = Builder::new(Vec::new());
    let mut tracked = TrackedPaths::new();
    let mut pruned: Vec<PathBuf> = Vec::new();
    let mut entry_count = 0usize;

    let walker = WalkDir::new(src)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| match opts.classify(e) {
            Prune::Keep => true,
            Prune::Excluded => {
                pruned.push(e.path().to_path_buf());
                false
            }
            Prune::Destination => false,
        });

    for item in walker {
        let entry = item.map_err(|e| walk_error(src, e))?;
        if entry.depth() == 0 {
            continue;
        }
        let path = entry.path();

        let absolute =
            std::path::absolute(path).map_err(|e| FarwriteError::archiving(path, e))?;
        trace!(path = %absolute.display(), "tracking");
        tracked.push(absolute);

        let rel = path.strip_prefix(src).map_err(|_| {
            FarwriteError::archiving(
                path,
                io::Error::new(io::ErrorKind::InvalidInput, "entry is not under the source root"),
            )
        })?;

        append_entry(&mut builder, &entry, rel)?;
        entry_count += 1;
    }

    let mut excluded = TrackedPaths::new();
    for path in pruned {
        let absolute =
            std::path::absolute(&path).map_err(|e| FarwriteError::archiving(&path, e))?;
        trace!(path = %absolute.display(), "excluded");
        excluded.push(absolute);
    }

    let bytes = builder
        .into_inner()
        .map_err(|e| FarwriteError::archiving(src, e))?;

    debug!(
        entries = entry_count,
        bytes = bytes.len(),
        source = %src.display(),
        "in-memory tar archive created"
    );

    Ok(ArchiveOutput {
        archive: InMemoryArchive { bytes, entry_count },
        tracked,
        excluded,
    })
}

/// Write one header (and payload, for regular files) derived from lstat data.
fn append_entry(
    builder: &mut Builder<Vec<u8>>,
    entry: &DirEntry,
    rel: &Path,
) -> Result<(), FarwriteError> {
    let path = entry.path();
    let meta = entry.metadata().map_err(|e| walk_error(path, e))?;
    let ftype = meta.file_type();

    let mut header = Header::new_gnu();
    header.set_metadata_in_mode(&meta, HeaderMode::Complete);

    if ftype.is_file() {
        let mut data = Vec::with_capacity(meta.len() as usize);
        File::open(path)
            .and_then(|mut f| f.read_to_end(&mut data))
            .map_err(|e| FarwriteError::archiving(path, e))?;
        header.set_size(data.len() as u64);
        builder
            .append_data(&mut header, rel, data.as_slice())
            .map_err(|e| FarwriteError::archiving(path, e))?;
    } else if ftype.is_symlink() {
        let target = fs::read_link(path).map_err(|e| FarwriteError::archiving(path, e))?;
        header.set_size(0);
        builder
            .append_link(&mut header, rel, &target)
            .map_err(|e| FarwriteError::archiving(path, e))?;
    } else {
        // directories, fifos, devices: header only
        header.set_size(0);
        builder
            .append_data(&mut header, rel, io::empty())
            .map_err(|e| FarwriteError::archiving(path, e))?;
    }
    Ok(())
}

fn walk_error(fallback: &Path, err: walkdir::Error) -> FarwriteError {
    let path = err
        .path()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| fallback.to_path_buf());
    let source = err
        .into_io_error()
        .unwrap_or_else(|| io::Error::other("filesystem loop detected"));
    FarwriteError::archiving(path, source)
}

/// True if any component of `rel` equals `name`.
pub fn has_segment(rel: &Path, name: &OsStr) -> bool {
    rel.components().any(|c| c.as_os_str() == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;

    fn names(out: &ArchiveOutput) -> Vec<String> {
        out.archive
            .entries()
            .unwrap()
            .into_iter()
            .map(|e| e.path.to_string_lossy().trim_end_matches('/').to_string())
            .collect()
    }

    #[test]
    fn walks_in_parent_first_sorted_order() {
        let dir = assert_fs::TempDir::new().unwrap();
        dir.child("b.txt").write_str("b").unwrap();
        dir.child("a/inner.txt").write_str("i").unwrap();

        let out = archive_tree(dir.path(), &ArchiveOptions::default()).unwrap();
        assert_eq!(names(&out), vec!["a", "a/inner.txt", "b.txt"]);
        assert_eq!(out.archive.entry_count(), 3);
        assert_eq!(out.tracked.len(), 3);
    }

    #[test]
    fn prunes_destination_only_at_top_level() {
        let dir = assert_fs::TempDir::new().unwrap();
        dir.child(DESTINATION_DIR_NAME).child("old.txt").write_str("stale").unwrap();
        dir.child("nested").child(DESTINATION_DIR_NAME).child("keep.txt").write_str("k").unwrap();

        let out = archive_tree(dir.path(), &ArchiveOptions::default()).unwrap();
        let listed = names(&out);
        assert!(!listed.iter().any(|n| n.starts_with(DESTINATION_DIR_NAME)));
        assert!(listed.contains(&format!("nested/{DESTINATION_DIR_NAME}/keep.txt")));
        assert!(out.excluded.is_empty(), "destination must never be scheduled for deletion");
    }

    #[test]
    fn excluded_roots_are_recorded_but_not_descended() {
        let dir = assert_fs::TempDir::new().unwrap();
        dir.child(".git/objects/ab/cdef").write_str("blob").unwrap();
        dir.child("sub/.git/HEAD").write_str("ref").unwrap();
        dir.child("sub/keep.txt").write_str("k").unwrap();

        let out = archive_tree(dir.path(), &ArchiveOptions::default()).unwrap();
        assert_eq!(names(&out), vec!["sub", "sub/keep.txt"]);
        assert_eq!(out.excluded.len(), 2);
        assert!(out.excluded.iter().all(|p| p.ends_with(".git")));
        assert!(out.tracked.iter().all(|p| !p.components().any(|c| c.as_os_str() == ".git")));
    }

    #[test]
    fn empty_tree_still_has_end_of_archive_blocks() {
        let dir = assert_fs::TempDir::new().unwrap();
        let out = archive_tree(dir.path(), &ArchiveOptions::default()).unwrap();
        assert_eq!(out.archive.entry_count(), 0);
        assert_eq!(out.archive.byte_len(), 1024);
        assert_eq!(out.archive.byte_len(), out.archive.as_bytes().len());
        assert!(out.archive.entries().unwrap().is_empty());
    }

    #[test]
    fn file_sizes_match_headers() {
        let dir = assert_fs::TempDir::new().unwrap();
        dir.child("data.bin").write_binary(&[0u8, 1, 2, 3, 255]).unwrap();
        let out = archive_tree(dir.path(), &ArchiveOptions::default()).unwrap();
        let entries = out.archive.entries().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].kind, EntryKind::File);
        assert_eq!(entries[0].size, 5);
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_are_not_followed() {
        let dir = assert_fs::TempDir::new().unwrap();
        let outside = assert_fs::TempDir::new().unwrap();
        outside.child("secret.txt").write_str("s").unwrap();
        std::os::unix::fs::symlink(outside.path(), dir.path().join("link")).unwrap();

        let out = archive_tree(dir.path(), &ArchiveOptions::default()).unwrap();
        let entries = out.archive.entries().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].kind, EntryKind::Symlink);
        assert_eq!(entries[0].size, 0);
    }

    #[test]
    fn has_segment_matches_whole_components_only() {
        let git = OsStr::new(".git");
        assert!(has_segment(Path::new("a/.git/config"), git));
        assert!(has_segment(Path::new(".git"), git));
        assert!(!has_segment(Path::new("a/.github/ci.yml"), git));
        assert!(!has_segment(Path::new("a/x.git"), git));
    }
}
