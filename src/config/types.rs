//! Core configuration types.
//! - Config holds runtime settings with sensible defaults.
//! - LogLevel / LogFormat represent logging choices with simple parsing helpers.

use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use super::{DEFAULT_EXCLUDED_DIR, DESTINATION_DIR_NAME};
use crate::fs_ops::{ArchiveOptions, ExtractOptions};

/// Verbosity levels exposed to users/config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Parse common names (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" | "quiet" | "none" => Some(LogLevel::Error),
            "warn" | "warning" => Some(LogLevel::Warn),
            "info" | "normal" => Some(LogLevel::Info),
            "debug" | "verbose" => Some(LogLevel::Debug),
            "trace" => Some(LogLevel::Trace),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        };
        f.write_str(s)
    }
}

impl FromStr for LogLevel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid log level: '{s}'"))
    }
}

/// Output format for log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl LogFormat {
    /// An empty string selects the default text format.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "text" => Some(LogFormat::Text),
            "json" => Some(LogFormat::Json),
            _ => None,
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LogFormat::Text => "text",
            LogFormat::Json => "json",
        })
    }
}

impl FromStr for LogFormat {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid log format: '{s}' (expected text or json)"))
    }
}

/// Runtime configuration for one relocation run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory whose contents are relocated
    pub source_path: PathBuf,
    /// Console verbosity
    pub log_level: LogLevel,
    pub log_format: LogFormat,
    /// Optional path to a log file
    pub log_file: Option<PathBuf>,
    /// If true, build the archive and report, but do not modify the filesystem
    pub dry_run: bool,
    /// If true, extracted regular files get their archived mode
    pub preserve_permissions: bool,
    /// Segment names pruned from the walk
    pub excluded_dirs: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_path: PathBuf::new(),
            log_level: LogLevel::default(),
            log_format: LogFormat::default(),
            log_file: None,
            dry_run: false,
            preserve_permissions: false,
            excluded_dirs: vec![DEFAULT_EXCLUDED_DIR.to_string()],
        }
    }
}

impl Config {
    /// Config for `source_path` with every other field defaulted.
    pub fn new(source_path: impl Into<PathBuf>) -> Self {
        Self {
            source_path: source_path.into(),
            ..Default::default()
        }
    }

    /// Add excluded names, skipping duplicates and blanks.
    pub fn add_excluded<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            let name = name.as_ref().trim();
            if !name.is_empty() && !self.excluded_dirs.iter().any(|x| x == name) {
                self.excluded_dirs.push(name.to_string());
            }
        }
    }

    pub fn archive_options(&self) -> ArchiveOptions {
        ArchiveOptions {
            excluded_dirs: self.excluded_dirs.iter().map(OsString::from).collect(),
            destination_name: Some(OsString::from(DESTINATION_DIR_NAME)),
        }
    }

    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            preserve_permissions: self.preserve_permissions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_level_aliases() {
        assert_eq!(LogLevel::parse("QUIET"), Some(LogLevel::Error));
        assert_eq!(LogLevel::parse(" normal "), Some(LogLevel::Info));
        assert_eq!(LogLevel::parse("verbose"), Some(LogLevel::Debug));
        assert_eq!(LogLevel::parse("loud"), None);
        assert!("loud".parse::<LogLevel>().is_err());
    }

    #[test]
    fn log_format_empty_is_text() {
        assert_eq!(LogFormat::parse(""), Some(LogFormat::Text));
        assert_eq!(LogFormat::parse("JSON"), Some(LogFormat::Json));
        assert_eq!(LogFormat::parse("yaml"), None);
    }

    #[test]
    fn add_excluded_dedups() {
        let mut cfg = Config::new("/src");
        cfg.add_excluded([".git", ".hg", " ", ".hg"]);
        assert_eq!(cfg.excluded_dirs, vec![".git", ".hg"]);
        let opts = cfg.archive_options();
        assert_eq!(opts.excluded_dirs.len(), 2);
        assert_eq!(
            opts.destination_name.as_deref(),
            Some(std::ffi::OsStr::new(DESTINATION_DIR_NAME))
        );
    }
}
