//! Config module.
//! Provides configuration types, default paths, XML loading, and source validation.

pub mod paths;
pub mod types;
mod validate;
pub mod xml;

pub use paths::{config_file_path, default_config_path, path_has_symlink_ancestor};
pub use types::{Config, LogFormat, LogLevel};
pub use validate::validate_source;
pub use xml::{FileConfig, load_config_from_xml, parse_config_str};

/// Fixed name of the folder the source contents are relocated into.
/// Looks like a template placeholder but is used verbatim.
pub const DESTINATION_DIR_NAME: &str = "{{ cookiecutter.project_slug }}";

/// Version-control metadata directory pruned from every walk.
pub const DEFAULT_EXCLUDED_DIR: &str = ".git";

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "FARWRITE_CONFIG";
