//! Stored-procedure import via the command-line client
//!
//! The query path executes one statement at a time and cannot carry
//! procedure bodies with `DELIMITER` changes, so the substituted procedure
//! document is spooled to a temporary file and piped into the engine's
//! command-line client as a subprocess. The spool file holds substituted
//! secrets (including the key-derivation seed), so it is deleted the
//! moment the subprocess returns, success or not — `NamedTempFile`'s
//! drop guarantees that on every exit path.

use crate::config::ConnectionConfig;
use crate::error::{InstallError, InstallResult};
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tracing::{debug, info};

/// External-process boundary for multi-statement document import
pub struct ProcedureImporter {
    client_binary: PathBuf,
    spool_dir: PathBuf,
}

impl ProcedureImporter {
    /// `client_binary` is the required external `mysql` client;
    /// `spool_dir` receives the short-lived substituted document.
    pub fn new(client_binary: impl Into<PathBuf>, spool_dir: impl Into<PathBuf>) -> Self {
        Self {
            client_binary: client_binary.into(),
            spool_dir: spool_dir.into(),
        }
    }

    /// Spool `document` to a temporary file and import it through the
    /// client subprocess with the administrator credentials.
    ///
    /// # Errors
    /// `InstallError::ImportFailed` when spooling or the subprocess fails.
    /// The spool file is gone by the time this returns, either way.
    pub fn import(&self, document: &str, connection: &ConnectionConfig) -> InstallResult<()> {
        let spool = self.write_spool(document)?;
        debug!(spool = %spool.path().display(), "spooled procedure document");

        let stdin = spool
            .reopen()
            .map_err(|e| InstallError::ImportFailed(format!("spool reopen: {e}")))?;
        let output = Command::new(&self.client_binary)
            .arg("-h")
            .arg(&connection.host)
            .arg("-P")
            .arg(connection.port.to_string())
            .arg("-u")
            .arg(&connection.admin_user)
            .arg(format!(
                "--password={}",
                connection.password.as_deref().unwrap_or_default()
            ))
            .arg("--database")
            .arg(&connection.database)
            .stdin(Stdio::from(stdin))
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| {
                InstallError::ImportFailed(format!(
                    "{}: {}",
                    self.client_binary.display(),
                    e
                ))
            })?;
        // `spool` drops here; the file is removed whatever happened above

        if output.status.success() {
            info!("stored procedures imported");
            Ok(())
        } else {
            Err(InstallError::ImportFailed(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ))
        }
    }

    fn write_spool(&self, document: &str) -> InstallResult<tempfile::NamedTempFile> {
        let mut spool = tempfile::Builder::new()
            .prefix("sqlsec-procs-")
            .suffix(".sql")
            .tempfile_in(&self.spool_dir)
            .map_err(|e| InstallError::ImportFailed(format!("spool create: {e}")))?;
        spool
            .write_all(document.as_bytes())
            .and_then(|_| spool.flush())
            .map_err(|e| InstallError::ImportFailed(format!("spool write: {e}")))?;
        Ok(spool)
    }
}
