//! CLI definition and parsing.
//!
//! Notes:
//! - --src takes precedence over the positional SOURCE.
//! - --debug is a shorthand for --log-level debug.

use clap::{Parser, ValueHint};
use std::path::PathBuf;

use crate::config::types::{Config, LogFormat, LogLevel};

/// Relocate a directory's contents into its `{{ cookiecutter.project_slug }}` subfolder.
#[derive(Parser, Debug, Clone)]
#[command(
    author,
    version,
    about = "Move a directory's contents into a fixed subfolder via an in-memory tar archive"
)]
pub struct Args {
    /// Source directory (positional form).
    #[arg(value_name = "SOURCE", value_hint = ValueHint::DirPath)]
    pub source_pos: Option<PathBuf>,

    /// Source directory.
    #[arg(long = "src", short = 's', value_name = "DIR", value_hint = ValueHint::DirPath)]
    pub src: Option<PathBuf>,

    /// Log level: error, warn, info, debug, trace.
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Log format: text or json.
    #[arg(long, value_name = "FORMAT")]
    pub log_format: Option<LogFormat>,

    /// Also append logs to this file.
    #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging (shorthand for --log-level debug).
    #[arg(short = 'd', long)]
    pub debug: bool,

    /// Additional directory name to prune from the walk (repeatable).
    #[arg(long = "exclude", value_name = "NAME")]
    pub exclude: Vec<String>,

    /// Build the archive and report what would happen, without writing or deleting.
    #[arg(long)]
    pub dry_run: bool,

    /// Give extracted files the permission bits recorded in the archive.
    #[arg(long)]
    pub preserve_permissions: bool,

    /// Print the config file location and exit.
    #[arg(long)]
    pub print_config: bool,
}

impl Args {
    /// Effective source path: `--src` if given, else the positional SOURCE.
    pub fn resolved_source(&self) -> Option<PathBuf> {
        self.src.clone().or_else(|| self.source_pos.clone())
    }

    /// Precedence: --debug > --log-level > None (use config default).
    pub fn effective_log_level(&self) -> Option<LogLevel> {
        if self.debug {
            return Some(LogLevel::Debug);
        }
        self.log_level
    }

    /// Apply CLI overrides to a loaded Config (in-place). No-ops for unset flags.
    pub fn apply_overrides(&self, cfg: &mut Config) {
        if let Some(src) = self.resolved_source() {
            cfg.source_path = src;
        }
        if let Some(level) = self.effective_log_level() {
            cfg.log_level = level;
        }
        if let Some(format) = self.log_format {
            cfg.log_format = format;
        }
        if let Some(file) = &self.log_file {
            cfg.log_file = Some(file.clone());
        }
        cfg.add_excluded(&self.exclude);
        if self.dry_run {
            cfg.dry_run = true;
        }
        if self.preserve_permissions {
            cfg.preserve_permissions = true;
        }
    }
}

pub fn parse() -> Args {
    Args::parse()
}
