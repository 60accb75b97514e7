//! Bootstrap orchestrator
//!
//! Drives the end-to-end install as a linear state machine with no
//! backward transitions: secret generation, data-directory discovery,
//! substitution, schema execution, backup provisioning, procedure import,
//! and the interactive mapping loop. The schema document is loaded by the
//! caller before any credentials are captured or a connection is opened; a
//! missing template aborts the process up front. Stages are fatal on
//! failure unless noted; the procedure import and per-mapping inserts are
//! reported-and-continue by design. No rollback is attempted on partial
//! failure — this is a one-shot installer, not a transaction pattern.

pub mod backup;
pub mod importer;
pub mod mapping;
pub mod secrets;
pub mod template;

use crate::config::{ConnectionConfig, Settings};
use crate::db::Database;
use crate::error::{InstallError, Result};
use importer::ProcedureImporter;
use secrets::Secrets;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use template::Substitutions;
use tracing::{info, warn};

/// Everything the orchestrator needs besides the open handle
#[derive(Debug, Clone)]
pub struct InstallOptions {
    pub connection: ConnectionConfig,
    pub settings: Settings,
}

/// What the operator needs to keep after a completed install
#[derive(Debug, Clone)]
pub struct InstallReport {
    /// Generated application database username
    pub username: String,
    /// Generated application database password
    pub password: String,
    /// Backup directory under the engine's data path
    pub backup_path: PathBuf,
}

/// Run the install against an already-open handle.
///
/// The handle and the schema document are both injected rather than owned:
/// `main` loads the document and opens the handle (in that order — the
/// template must be readable before a connection is attempted), passes
/// them here, and closes the handle afterwards (which triggers the
/// maintenance pass). `input`/`out` carry the interactive mapping
/// dialogue.
pub fn run<D, R, W>(
    opts: &InstallOptions,
    schema_doc: &str,
    db: &mut D,
    input: &mut R,
    out: &mut W,
) -> Result<InstallReport>
where
    D: Database + ?Sized,
    R: BufRead,
    W: Write,
{
    let settings = &opts.settings;
    let connection = &opts.connection;

    let secrets = Secrets::generate();
    info!(username = %secrets.username, "generated application credentials");

    let data_path = discover_data_path(db, &connection.database)?;
    info!(data_path = %data_path, "engine data directory resolved");

    if let Err(e) = backup::clean_stray_sql(data_path.as_ref()) {
        warn!(error = %e, "pre-install cleanup incomplete");
    }

    // Substitution is total before anything executes; a partially
    // templated document never reaches the engine
    let subs = Substitutions {
        version: settings.version_tag.clone(),
        host: connection.host.clone(),
        database: connection.database.clone(),
        user: secrets.username.clone(),
        password: secrets.password.clone(),
        key_seed: secrets.key_seed.clone(),
        data_path: data_path.clone(),
    };
    let schema_sql = subs.apply_checked(schema_doc)?;

    db.run_batch(&schema_sql)
        .map_err(|e| InstallError::SchemaFailed(e.to_string()))?;
    writeln!(out, "Successfully created new user account")?;
    writeln!(out, "Successfully created tables to {}", connection.database)?;

    let backup_path = provision_backups(settings, &data_path)?;

    import_procedures(settings, &subs, connection, out)?;

    writeln!(
        out,
        "Lets define the table & fields you wish to store encrypted data in..."
    )?;
    mapping::run(db, input, out)?;

    Ok(InstallReport {
        username: secrets.username,
        password: secrets.password,
        backup_path,
    })
}

/// Ask the engine for its data directory and derive the per-database
/// storage path (used only to compute the backup location).
fn discover_data_path<D: Database + ?Sized>(db: &mut D, database: &str) -> Result<String> {
    let results = db.query("SHOW VARIABLES LIKE 'datadir'", false)?;
    let datadir = results
        .first()
        .and_then(|row| row.get("Value"))
        .ok_or_else(|| {
            InstallError::DataDirDiscovery("engine reported no datadir variable".to_string())
        })?;

    let mut path = datadir.to_string();
    if !path.ends_with('/') {
        path.push('/');
    }
    path.push_str(database);
    path.push('/');
    Ok(path)
}

/// Backup directories under the data path and the shared fallback; the
/// data-path copy is handed to the engine's service account.
fn provision_backups(settings: &Settings, data_path: &str) -> Result<PathBuf> {
    let backup_path = backup::provision(data_path.as_ref())?;
    if let Err(e) = backup::provision(&settings.fallback_backup_root) {
        warn!(root = %settings.fallback_backup_root.display(), error = %e,
            "fallback backup directory not provisioned");
    }

    let owner =
        backup::discover_service_user(&settings.engine_config_paths, &settings.service_user);
    backup::assign_owner(&backup_path, &owner);
    Ok(backup_path)
}

/// Import stored procedures through the external client.
///
/// Reported but non-fatal: a failed import leaves the interactive steps
/// reachable so the operator can still capture mappings.
fn import_procedures<W: Write>(
    settings: &Settings,
    subs: &Substitutions,
    connection: &ConnectionConfig,
    out: &mut W,
) -> Result<()> {
    let document = match template::load(&settings.procedures_file) {
        Ok(document) => document,
        Err(e) => {
            warn!(error = %e, "procedure template unavailable, skipping import");
            writeln!(out, "Skipping stored procedure import: {e}")?;
            return Ok(());
        }
    };
    let substituted = subs.apply_checked(&document)?;

    let importer = ProcedureImporter::new(&settings.client_binary, std::env::temp_dir());
    match importer.import(&substituted, connection) {
        Ok(()) => writeln!(
            out,
            "Successfully created stored procedures from '{}'",
            settings.procedures_file.display()
        )?,
        Err(e) => {
            warn!(error = %e, "stored procedure import failed");
            writeln!(out, "Stored procedure import failed: {e}")?;
        }
    }
    Ok(())
}
