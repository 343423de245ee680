//! Filesystem operations: archive, extract, cleanup.

pub mod archive;
pub mod cleanup;
pub mod extract;
mod helpers;
mod tracked;

pub use archive::{
    ArchiveOptions, ArchiveOutput, EntryKind, EntrySummary, InMemoryArchive, archive_tree,
    has_segment,
};
pub use cleanup::{delete_tracked_paths, remove_all, report_tracked_paths};
pub use extract::{ExtractOptions, ExtractStats, extract_archive};
pub use helpers::{describe_io_error, hint_for};
pub use tracked::TrackedPaths;
