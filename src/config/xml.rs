//! XML configuration support.
//!
//! Reads an optional `config.xml`:
//! <config>
//!   <log_level>debug</log_level>
//!   <log_format>json</log_format>
//!   <log_file>/path/to/farwrite.log</log_file>
//!   <preserve_permissions>true</preserve_permissions>
//!   <exclude>.hg</exclude>
//!   <exclude>.svn</exclude>
//! </config>
//!
//! A missing file is not an error. Unknown fields and bad values are.

use anyhow::{Context, Result, anyhow};
use quick_xml::de::from_str as from_xml_str;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

use super::paths::config_file_path;
use super::types::{Config, LogFormat, LogLevel};

#[derive(Debug, Default, Deserialize)]
#[serde(rename = "config")]
#[serde(deny_unknown_fields)]
struct XmlConfig {
    #[serde(default)]
    log_level: Option<String>,
    #[serde(default)]
    log_format: Option<String>,
    #[serde(default)]
    log_file: Option<String>,
    #[serde(default)]
    preserve_permissions: Option<String>,
    #[serde(default, rename = "exclude")]
    exclude: Vec<String>,
}

/// Settings read from a config file; `None` fields leave defaults alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileConfig {
    pub log_level: Option<LogLevel>,
    pub log_format: Option<LogFormat>,
    pub log_file: Option<PathBuf>,
    pub preserve_permissions: Option<bool>,
    pub exclude: Vec<String>,
}

impl FileConfig {
    /// Overlay file values onto `cfg`.
    pub fn apply_to(&self, cfg: &mut Config) {
        if let Some(level) = self.log_level {
            cfg.log_level = level;
        }
        if let Some(format) = self.log_format {
            cfg.log_format = format;
        }
        if let Some(file) = &self.log_file {
            cfg.log_file = Some(file.clone());
        }
        if let Some(p) = self.preserve_permissions {
            cfg.preserve_permissions = p;
        }
        cfg.add_excluded(&self.exclude);
    }
}

fn non_empty(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Parse config XML text.
pub fn parse_config_str(content: &str) -> Result<FileConfig> {
    let parsed: XmlConfig = from_xml_str(content).context("parse config XML")?;

    let log_level = non_empty(parsed.log_level)
        .map(|s| LogLevel::parse(&s).ok_or_else(|| anyhow!("invalid log_level '{s}' in config")))
        .transpose()?;
    let log_format = non_empty(parsed.log_format)
        .map(|s| LogFormat::parse(&s).ok_or_else(|| anyhow!("invalid log_format '{s}' in config")))
        .transpose()?;
    let preserve_permissions = non_empty(parsed.preserve_permissions)
        .map(|s| match s.to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => Ok(true),
            "false" | "no" | "0" => Ok(false),
            _ => Err(anyhow!("invalid preserve_permissions '{s}' in config")),
        })
        .transpose()?;

    Ok(FileConfig {
        log_level,
        log_format,
        log_file: non_empty(parsed.log_file).map(PathBuf::from),
        preserve_permissions,
        exclude: parsed
            .exclude
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
    })
}

/// Load the config file, if there is one.
pub fn load_config_from_xml() -> Result<Option<FileConfig>> {
    let Some(path) = config_file_path() else {
        return Ok(None);
    };
    if !path.exists() {
        debug!(path = %path.display(), "no config file");
        return Ok(None);
    }
    let content = fs::read_to_string(&path)
        .with_context(|| format!("read config file '{}'", path.display()))?;
    let parsed = parse_config_str(&content)
        .with_context(|| format!("invalid config file '{}'", path.display()))?;
    debug!(path = %path.display(), "loaded config file");
    Ok(Some(parsed))
}
