//! Typed error definitions for farwrite.
//! Three kinds of failure: bad input, filesystem I/O while archiving or
//! extracting, and failure to delete a tracked path after the copy.

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Pipeline phase an I/O failure happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Archiving,
    Extracting,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Archiving => "archiving",
            Phase::Extracting => "extracting",
        })
    }
}

/// Coarse classification used for logs and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    Io,
    Cleanup,
}

#[derive(Debug, Error)]
pub enum FarwriteError {
    #[error("source path is empty")]
    EmptySource,

    #[error("source path not found: {0}")]
    SourceNotFound(PathBuf),

    #[error("source path is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("{phase} failed at '{path}'")]
    Io {
        phase: Phase,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("archive entry escapes destination root: {0}")]
    UnsafeEntryPath(PathBuf),

    #[error("error deleting path '{path}'")]
    Cleanup {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl FarwriteError {
    pub(crate) fn archiving(path: impl Into<PathBuf>, source: io::Error) -> Self {
        FarwriteError::Io {
            phase: Phase::Archiving,
            path: path.into(),
            source,
        }
    }

    pub(crate) fn extracting(path: impl Into<PathBuf>, source: io::Error) -> Self {
        FarwriteError::Io {
            phase: Phase::Extracting,
            path: path.into(),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            FarwriteError::EmptySource
            | FarwriteError::SourceNotFound(_)
            | FarwriteError::NotADirectory(_) => ErrorKind::InvalidInput,
            FarwriteError::Io { .. } | FarwriteError::UnsafeEntryPath(_) => ErrorKind::Io,
            FarwriteError::Cleanup { .. } => ErrorKind::Cleanup,
        }
    }

    /// Stable identifier emitted as the `code` field of error events.
    pub fn code(&self) -> &'static str {
        match self {
            FarwriteError::EmptySource => "E_EMPTY_SOURCE",
            FarwriteError::SourceNotFound(_) => "E_SOURCE_NOT_FOUND",
            FarwriteError::NotADirectory(_) => "E_NOT_A_DIRECTORY",
            FarwriteError::Io {
                phase: Phase::Archiving,
                ..
            } => "E_ARCHIVE_IO",
            FarwriteError::Io {
                phase: Phase::Extracting,
                ..
            } => "E_EXTRACT_IO",
            FarwriteError::UnsafeEntryPath(_) => "E_UNSAFE_ENTRY",
            FarwriteError::Cleanup { .. } => "E_CLEANUP",
        }
    }

    /// Underlying io error, when there is one.
    pub fn io_source(&self) -> Option<&io::Error> {
        match self {
            FarwriteError::Io { source, .. } | FarwriteError::Cleanup { source, .. } => Some(source),
            _ => None,
        }
    }
}
