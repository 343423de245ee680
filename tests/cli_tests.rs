use clap::Parser;
use farwrite::cli::Args;
use farwrite::config::types::{Config, LogFormat, LogLevel};
use std::path::PathBuf;

#[test]
fn src_flag_wins_over_positional() {
    let args = Args::parse_from(["farwrite", "--src", "/tmp/flag", "/tmp/pos"]);
    assert_eq!(args.resolved_source(), Some(PathBuf::from("/tmp/flag")));
}

#[test]
fn positional_source_is_accepted() {
    let args = Args::parse_from(["farwrite", "/tmp/pos"]);
    assert_eq!(args.resolved_source(), Some(PathBuf::from("/tmp/pos")));
    let args = Args::parse_from(["farwrite"]);
    assert_eq!(args.resolved_source(), None);
}

#[test]
fn debug_flag_beats_log_level() {
    let args = Args::parse_from(["farwrite", "--debug", "--log-level", "error"]);
    assert_eq!(args.effective_log_level(), Some(LogLevel::Debug));

    let args = Args::parse_from(["farwrite", "--log-level", "warn"]);
    assert_eq!(args.effective_log_level(), Some(LogLevel::Warn));
}

#[test]
fn invalid_level_or_format_is_rejected() {
    assert!(Args::try_parse_from(["farwrite", "--log-level", "shouty"]).is_err());
    assert!(Args::try_parse_from(["farwrite", "--log-format", "xml"]).is_err());
}

#[test]
fn apply_overrides_sets_everything() {
    let args = Args::parse_from([
        "farwrite",
        "-s",
        "/work/src",
        "--log-level",
        "trace",
        "--log-format",
        "json",
        "--log-file",
        "/tmp/farwrite.log",
        "--exclude",
        ".hg",
        "--exclude",
        ".svn",
        "--dry-run",
        "--preserve-permissions",
    ]);
    let mut cfg = Config::default();
    args.apply_overrides(&mut cfg);
    assert_eq!(cfg.source_path, PathBuf::from("/work/src"));
    assert_eq!(cfg.log_level, LogLevel::Trace);
    assert_eq!(cfg.log_format, LogFormat::Json);
    assert_eq!(cfg.log_file, Some(PathBuf::from("/tmp/farwrite.log")));
    assert_eq!(cfg.excluded_dirs, vec![".git", ".hg", ".svn"]);
    assert!(cfg.dry_run);
    assert!(cfg.preserve_permissions);
}

#[test]
fn unset_flags_leave_config_alone() {
    let args = Args::parse_from(["farwrite"]);
    let mut cfg = Config {
        log_level: LogLevel::Warn,
        ..Config::new("/keep")
    };
    args.apply_overrides(&mut cfg);
    assert_eq!(cfg.source_path, PathBuf::from("/keep"));
    assert_eq!(cfg.log_level, LogLevel::Warn);
    assert!(!cfg.dry_run);
}
