//! Core library for `farwrite`.
//!
//! Relocates everything inside a source directory into a fixed-name folder
//! nested in that same directory. The tree is first packed into an in-memory
//! tar archive, then unpacked under the destination, and finally the original
//! entries recorded during archiving are deleted.

pub mod cli;
pub mod config;
pub mod errors;
pub mod fs_ops;
pub mod output;
pub mod pipeline;

pub use config::{
    Config, DEFAULT_EXCLUDED_DIR, DESTINATION_DIR_NAME, LogFormat, LogLevel, default_config_path,
    path_has_symlink_ancestor,
};
pub use errors::{ErrorKind, FarwriteError, Phase};
pub use fs_ops::TrackedPaths;
pub use pipeline::{Pipeline, RunSummary, Stage, destination_for, run};
