//! Relocation pipeline: archive -> extract -> cleanup.
//!
//! Stages run strictly in order (`Idle → Archiving → Extracting → Reporting →
//! Deleting → Done`). Any error moves the pipeline to `Failed` and skips every
//! remaining stage, so a failed archive or extraction never deletes anything.

use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::{Config, DESTINATION_DIR_NAME, validate_source};
use crate::fs_ops::{
    ArchiveOutput, ExtractStats, InMemoryArchive, TrackedPaths, archive_tree,
    delete_tracked_paths, extract_archive, report_tracked_paths,
};

/// Where `src`'s contents end up: a fixed-name folder directly inside it.
pub fn destination_for(src: &Path) -> PathBuf {
    src.join(DESTINATION_DIR_NAME)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Archiving,
    Extracting,
    Reporting,
    Deleting,
    Done,
    Failed,
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub archived_entries: usize,
    pub archive_bytes: usize,
    /// Extraction counters; all zero for a dry run.
    pub extracted: ExtractStats,
    pub tracked: usize,
    pub excluded: usize,
    /// Paths actually removed (children of an earlier removed parent are not counted).
    pub deleted: usize,
    pub dry_run: bool,
}

/// One relocation run over a config. Not reusable once it has run.
pub struct Pipeline<'a> {
    cfg: &'a Config,
    stage: Stage,
}

impl<'a> Pipeline<'a> {
    pub fn new(cfg: &'a Config) -> Self {
        Self {
            cfg,
            stage: Stage::Idle,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    fn enter(&mut self, next: Stage) {
        debug!(from = ?self.stage, to = ?next, "stage");
        self.stage = next;
    }

    pub fn run(&mut self) -> Result<RunSummary> {
        if self.stage != Stage::Idle {
            bail!("pipeline already ran (stage {:?})", self.stage);
        }
        let res = self.run_stages();
        if res.is_err() {
            self.enter(Stage::Failed);
        }
        res
    }

    fn run_stages(&mut self) -> Result<RunSummary> {
        let cfg = self.cfg;
        let src = cfg.source_path.as_path();
        validate_source(src).context("invalid source path")?;
        let dest = destination_for(src);

        self.enter(Stage::Archiving);
        let ArchiveOutput {
            archive,
            tracked,
            excluded,
        } = archive_tree(src, &cfg.archive_options())
            .context("error creating in-memory tar archive")?;

        let mut summary = RunSummary {
            source: src.to_path_buf(),
            destination: dest.clone(),
            archived_entries: archive.entry_count(),
            archive_bytes: archive.byte_len(),
            extracted: ExtractStats::default(),
            tracked: tracked.len(),
            excluded: excluded.len(),
            deleted: 0,
            dry_run: cfg.dry_run,
        };

        if cfg.dry_run {
            report_plan(&archive, &tracked, &excluded, &dest)?;
            self.enter(Stage::Done);
            return Ok(summary);
        }

        self.enter(Stage::Extracting);
        summary.extracted = extract_archive(archive.as_bytes(), &dest, cfg.extract_options())
            .with_context(|| {
                format!("error extracting in-memory tar archive to '{}'", dest.display())
            })?;
        drop(archive);

        self.enter(Stage::Reporting);
        report_tracked_paths(&tracked);

        self.enter(Stage::Deleting);
        summary.deleted = delete_tracked_paths(&tracked).context("error deleting tracked paths")?;
        // excluded subtrees are not copied; remove them as well
        summary.deleted +=
            delete_tracked_paths(&excluded).context("error deleting excluded paths")?;

        self.enter(Stage::Done);
        info!(
            source = %src.display(),
            dest = %dest.display(),
            entries = summary.archived_entries,
            files = summary.extracted.files,
            dirs = summary.extracted.directories,
            deleted = summary.deleted,
            "relocation complete"
        );
        Ok(summary)
    }
}

/// Log what a real run would write and delete.
fn report_plan(
    archive: &InMemoryArchive,
    tracked: &TrackedPaths,
    excluded: &TrackedPaths,
    dest: &Path,
) -> Result<()> {
    for entry in archive.entries().context("read back in-memory archive")? {
        info!(path = %dest.join(&entry.path).display(), kind = ?entry.kind, size = entry.size, "dry-run: would extract");
    }
    for path in tracked.iter().chain(excluded.iter()) {
        info!(path = %path.display(), "dry-run: would delete");
    }
    Ok(())
}

/// Run the whole pipeline once.
pub fn run(cfg: &Config) -> Result<RunSummary> {
    Pipeline::new(cfg).run()
}
