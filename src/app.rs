//! Application orchestrator.
//! Loads/merges config, initializes logging, runs the pipeline, and reports the outcome.

use anyhow::Result;
use tracing::{debug, error};

use farwrite::FarwriteError;
use farwrite::cli::Args;
use farwrite::config::{CONFIG_ENV_VAR, Config, config_file_path, load_config_from_xml};
use farwrite::fs_ops::{describe_io_error, hint_for};
use farwrite::output as out;

use crate::logging::init_tracing;

/// Run the CLI application.
pub fn run(args: Args) -> Result<()> {
    if args.print_config {
        print_config_location();
        return Ok(());
    }

    // defaults < config file < CLI flags
    let mut cfg = Config::default();
    match load_config_from_xml() {
        Ok(Some(file_cfg)) => file_cfg.apply_to(&mut cfg),
        Ok(None) => {}
        Err(e) => {
            out::print_error(&format!("{e:#}"));
            return Err(e);
        }
    }
    args.apply_overrides(&mut cfg);

    let guard = init_tracing(cfg.log_level, cfg.log_format, cfg.log_file.as_deref()).map_err(|e| {
        out::print_error(&format!("Failed to initialize logging: {e}"));
        e
    })?;

    debug!(?args, "starting farwrite");

    let result = farwrite::run(&cfg);
    match &result {
        Ok(summary) if summary.dry_run => out::print_info(&format!(
            "Dry-run: would move {} entries from '{}' into '{}'",
            summary.archived_entries,
            summary.source.display(),
            summary.destination.display()
        )),
        Ok(summary) => out::print_success(&format!(
            "Moved {} entries ({} files, {} directories) into '{}'",
            summary.archived_entries,
            summary.extracted.files,
            summary.extracted.directories,
            summary.destination.display()
        )),
        Err(e) => report_failure(e),
    }

    // flush file logs before exit
    drop(guard);

    result.map(|_| ())
}

fn print_config_location() {
    if let Some(v) = std::env::var_os(CONFIG_ENV_VAR).filter(|v| !v.is_empty()) {
        out::print_info(&format!(
            "Using {CONFIG_ENV_VAR} (explicit):\n  {}",
            v.to_string_lossy()
        ));
        return;
    }
    match config_file_path() {
        Some(p) if p.exists() => out::print_info(&format!("Config file:\n  {}", p.display())),
        Some(p) => out::print_info(&format!(
            "Config file (not present, defaults apply):\n  {}",
            p.display()
        )),
        None => out::print_warn("Could not determine a default config path."),
    }
}

fn report_failure(e: &anyhow::Error) {
    let mut hint = None;
    if let Some(fe) = e.downcast_ref::<FarwriteError>() {
        let code = fe.code();
        hint = fe.io_source().and_then(hint_for);
        match fe {
            FarwriteError::EmptySource => {
                error!(code, kind = "invalid_input", "Relocation failed")
            }
            FarwriteError::SourceNotFound(path) | FarwriteError::NotADirectory(path) => {
                error!(code, kind = "invalid_input", path = %path.display(), "Relocation failed")
            }
            FarwriteError::Io {
                phase,
                path,
                source,
            } => {
                error!(code, kind = "io", %phase, path = %path.display(), error = %describe_io_error(source), "Relocation failed")
            }
            FarwriteError::UnsafeEntryPath(path) => {
                error!(code, kind = "io", path = %path.display(), "Relocation failed")
            }
            FarwriteError::Cleanup { path, source } => {
                error!(code, kind = "cleanup", path = %path.display(), error = %describe_io_error(source), "Copy finished but cleanup failed")
            }
        }
    } else {
        error!(error = ?e, "Relocation failed");
    }

    match hint {
        Some(h) => out::print_error(&format!("{e:#} ({h})")),
        None => out::print_error(&format!("{e:#}")),
    }
}
