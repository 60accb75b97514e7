//! Installer settings
//!
//! Loaded from `~/.sqlsec/settings.toml` (or `--config PATH`); every field
//! has a default, so the file is optional. Missing fields fall back to the
//! defaults individually.

use crate::db::BackendKind;
use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Installer settings with conventional defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Version tag substituted for `[dbVer]`
    pub version_tag: String,

    /// Schema template document
    pub schema_file: PathBuf,

    /// Stored-procedure template document
    pub procedures_file: PathBuf,

    /// Command-line client used for the procedure import subprocess
    pub client_binary: PathBuf,

    /// Engine configuration files scanned for the `user=` assignment,
    /// in order
    pub engine_config_paths: Vec<PathBuf>,

    /// Conventional service account when discovery finds nothing
    pub service_user: String,

    /// Shared temporary location that also receives a backup directory
    pub fallback_backup_root: PathBuf,

    /// Pin the access method instead of probing (testing/operations aid)
    pub backend: Option<BackendKind>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version_tag: "v0.1".to_string(),
            schema_file: PathBuf::from("sqlsec-schema.sql"),
            procedures_file: PathBuf::from("sqlsec-procs.sql"),
            client_binary: PathBuf::from("/usr/bin/mysql"),
            engine_config_paths: vec![
                PathBuf::from("/etc/my.cnf"),
                PathBuf::from("/etc/mysql/my.cnf"),
            ],
            service_user: "mysql".to_string(),
            fallback_backup_root: PathBuf::from("/tmp"),
            backend: None,
        }
    }
}

impl Settings {
    /// Load settings.
    ///
    /// An explicit path must exist and parse; the default path
    /// (`~/.sqlsec/settings.toml`) is optional and silently skipped when
    /// absent.
    pub fn load(explicit: Option<&Path>) -> ConfigResult<Self> {
        match explicit {
            Some(path) => {
                let content = std::fs::read_to_string(path)
                    .map_err(|e| ConfigError::NotFound(format!("{}: {}", path.display(), e)))?;
                Self::parse(&content)
            }
            None => {
                let Some(path) = Self::default_path() else {
                    return Ok(Self::default());
                };
                match std::fs::read_to_string(&path) {
                    Ok(content) => Self::parse(&content),
                    Err(_) => Ok(Self::default()),
                }
            }
        }
    }

    fn parse(content: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Default settings file path (`~/.sqlsec/settings.toml`)
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".sqlsec").join("settings.toml"))
    }
}
