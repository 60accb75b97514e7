//! Backup-directory provisioning and data-directory housekeeping
//!
//! The backup tree lives under the engine's per-database data path (and a
//! shared temporary fallback) and is handed to the engine's service
//! account, discovered by scanning its configuration file for a `user=`
//! assignment.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, warn};

/// Create `<root>/backups/`, idempotently.
///
/// Creating an existing directory is not an error; provisioning twice on
/// the same path yields the same single directory.
pub fn provision(root: &Path) -> io::Result<PathBuf> {
    let dir = root.join("backups");
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Remove stray `.sql` files under the per-database data path.
///
/// The engine is about to create files there; leftovers from an earlier
/// aborted install would collide. A missing directory is fine.
pub fn clean_stray_sql(dir: &Path) -> io::Result<usize> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(e),
    };
    let mut removed = 0;
    for entry in entries {
        let path = entry?.path();
        if path.extension().is_some_and(|ext| ext == "sql") {
            fs::remove_file(&path)?;
            removed += 1;
        }
    }
    Ok(removed)
}

/// Extract the service account from engine configuration text.
///
/// Looks for a `user = NAME` assignment; comments are ignored. Returns
/// `None` when the pattern never matches.
pub fn service_user(config: &str) -> Option<String> {
    for line in config.lines() {
        let line = line.split('#').next().unwrap_or("").trim();
        let Some(rest) = line.strip_prefix("user") else {
            continue;
        };
        let Some(value) = rest.trim_start().strip_prefix('=') else {
            continue;
        };
        let name: String = value
            .trim()
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
            .collect();
        if !name.is_empty() {
            return Some(name);
        }
    }
    None
}

/// Scan the candidate configuration files in order; fall back to the
/// conventional service account name when none yields a match.
pub fn discover_service_user(paths: &[PathBuf], fallback: &str) -> String {
    for path in paths {
        let Ok(content) = fs::read_to_string(path) else {
            continue;
        };
        if let Some(user) = service_user(&content) {
            debug!(user = %user, config = %path.display(), "discovered engine service account");
            return user;
        }
    }
    fallback.to_string()
}

/// Hand the backup directory to the engine's service account.
///
/// Best-effort: without privilege the chown fails, which is logged and
/// tolerated so unprivileged dry runs and tests can proceed.
pub fn assign_owner(dir: &Path, user: &str) {
    let result = Command::new("chown")
        .arg(format!("{user}:{user}"))
        .arg(dir)
        .output();
    match result {
        Ok(output) if output.status.success() => {}
        Ok(output) => warn!(
            dir = %dir.display(),
            user = %user,
            stderr = %String::from_utf8_lossy(&output.stderr).trim(),
            "could not assign backup directory ownership"
        ),
        Err(e) => warn!(dir = %dir.display(), user = %user, error = %e, "chown invocation failed"),
    }
}
