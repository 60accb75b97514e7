//! End-to-end orchestration tests over the recording database mock.
//!
//! These drive the real install stages (template load, substitution,
//! schema batch, backup provisioning, procedure import, mapping loop)
//! with the filesystem pointed at temp directories and the external
//! client replaced by `true`.

mod common;

use common::{RecordingDb, sample_schema_template};
use sqlsec::config::{ConnectionConfig, Settings};
use sqlsec::db::Database;
use sqlsec::error::{InstallError, SqlSecError};
use sqlsec::install::{self, InstallOptions, mapping};
use std::io::Cursor;
use std::path::PathBuf;

fn connection() -> ConnectionConfig {
    let mut config = ConnectionConfig::new("localhost", "secdb");
    config.password = Some("rootpass".to_string());
    config
}

// ── Mapping loop ────────────────────────────────────────────

#[test]
fn mapping_loop_inserts_each_pair_then_finalizes_with_key() {
    let mut db = RecordingDb::new();
    let script = "yes\nk1\nno\norders\ncredit_card\nyes\nusers\nssn\nno\n";
    let mut input = Cursor::new(script);
    let mut out = Vec::new();

    mapping::run(&mut db, &mut input, &mut out).unwrap();

    assert_eq!(db.executed.len(), 3);
    assert_eq!(
        db.executed[0],
        "INSERT INTO `sqlSec_map` (`tbl`,`field`) VALUES (\"orders\", \"credit_card\")"
    );
    assert_eq!(
        db.executed[1],
        "INSERT INTO `sqlSec_map` (`tbl`,`field`) VALUES (\"users\", \"ssn\")"
    );
    assert_eq!(db.executed[2], "CALL KR_New(\"users\", \"ssn\", \"k1\")");
}

#[test]
fn mapping_loop_runs_pre_backup_when_requested() {
    let mut db = RecordingDb::new();
    let script = "yes\nsecret-key\nyes\naccounts\niban\nno\n";
    let mut input = Cursor::new(script);
    let mut out = Vec::new();

    mapping::run(&mut db, &mut input, &mut out).unwrap();

    assert_eq!(db.executed[0], "CALL KR_BU_New(\"secret-key\")");
    assert!(db.executed[1].starts_with("INSERT INTO `sqlSec_map`"));
    assert_eq!(
        db.executed[2],
        "CALL KR_New(\"accounts\", \"iban\", \"secret-key\")"
    );
}

#[test]
fn mapping_loop_without_existing_fields_uses_empty_key() {
    let mut db = RecordingDb::new();
    let script = "no\nno\norders\ntotal\nno\n";
    let mut input = Cursor::new(script);
    let mut out = Vec::new();

    mapping::run(&mut db, &mut input, &mut out).unwrap();

    assert_eq!(db.executed.len(), 2);
    assert_eq!(db.executed[1], "CALL KR_New(\"orders\", \"total\", \"\")");
}

#[test]
fn mapping_loop_finalizes_with_pair_whose_insert_failed() {
    let mut db = RecordingDb::new();
    db.push_error("duplicate entry");
    let script = "no\nno\norders\ncc\nno\n";
    let mut input = Cursor::new(script);
    let mut out = Vec::new();

    mapping::run(&mut db, &mut input, &mut out).unwrap();

    assert_eq!(db.executed.len(), 2);
    assert_eq!(db.executed[1], "CALL KR_New(\"orders\", \"cc\", \"\")");
}

#[test]
fn mapping_loop_continues_past_a_failed_insert() {
    let mut db = RecordingDb::new();
    db.push_error("duplicate entry");
    let script = "no\nno\norders\ncc\nyes\nusers\nssn\nno\n";
    let mut input = Cursor::new(script);
    let mut out = Vec::new();

    mapping::run(&mut db, &mut input, &mut out).unwrap();

    // Both inserts attempted, finalize still issued for the last pair
    assert_eq!(db.executed.len(), 3);
    assert_eq!(db.executed[2], "CALL KR_New(\"users\", \"ssn\", \"\")");
    let printed = String::from_utf8(out).unwrap();
    assert!(printed.contains("Failed to record orders => cc"));
}

#[test]
fn mapping_loop_escapes_untrusted_input() {
    let mut db = RecordingDb::new();
    let script = "no\nno\nor'ders\ncc\nno\n";
    let mut input = Cursor::new(script);
    let mut out = Vec::new();

    mapping::run(&mut db, &mut input, &mut out).unwrap();

    assert!(db.executed[0].contains(r"or\'ders"));
}

#[test]
fn mapping_loop_passthrough_backend_skips_escaping() {
    let mut db = RecordingDb::passthrough();
    let script = "no\nno\nor'ders\ncc\nno\n";
    let mut input = Cursor::new(script);
    let mut out = Vec::new();

    mapping::run(&mut db, &mut input, &mut out).unwrap();

    assert!(db.executed[0].contains("or'ders"));
}

// ── Batch execution ─────────────────────────────────────────

#[test]
fn run_batch_executes_statements_in_document_order() {
    let mut db = RecordingDb::new();
    db.run_batch("CREATE TABLE a (id INT);\nCREATE TABLE b (id INT);\nINSERT INTO a VALUES (1);")
        .unwrap();
    assert_eq!(
        db.executed,
        vec![
            "CREATE TABLE a (id INT)",
            "CREATE TABLE b (id INT)",
            "INSERT INTO a VALUES (1)",
        ]
    );
}

#[test]
fn run_batch_stops_at_first_failure() {
    let mut db = RecordingDb::new();
    db.push_rows(vec![]);
    db.push_error("syntax error");
    let result = db.run_batch("SELECT 1; SELECT broken; SELECT 3;");
    assert!(result.is_err());
    assert_eq!(db.executed.len(), 2);
}

// ── Full install flow ───────────────────────────────────────

struct InstallFixture {
    opts: InstallOptions,
    datadir: tempfile::TempDir,
    db_path: PathBuf,
}

fn install_fixture() -> InstallFixture {
    let datadir = tempfile::tempdir().unwrap();
    let db_path = datadir.path().join("secdb");
    std::fs::create_dir_all(&db_path).unwrap();

    let template_dir = datadir.path().join("templates");
    std::fs::create_dir_all(&template_dir).unwrap();
    let procedures_file = template_dir.join("sqlsec-procs.sql");
    std::fs::write(
        &procedures_file,
        "DELIMITER //\nCREATE PROCEDURE KR_New(...) BEGIN /* [dbKey] */ END //\n",
    )
    .unwrap();

    let settings = Settings {
        procedures_file,
        client_binary: PathBuf::from("true"),
        engine_config_paths: vec![datadir.path().join("missing.cnf")],
        fallback_backup_root: datadir.path().join("tmp"),
        ..Settings::default()
    };

    InstallFixture {
        opts: InstallOptions {
            connection: connection(),
            settings,
        },
        datadir,
        db_path,
    }
}

#[test]
fn install_substitutes_schema_and_provisions_backups() {
    let fixture = install_fixture();
    let datadir_str = format!("{}/", fixture.datadir.path().display());

    // A stray file from an aborted earlier install must be cleaned up
    let stray = fixture.db_path.join("leftover.sql");
    std::fs::write(&stray, "SELECT 1;").unwrap();

    let mut db = RecordingDb::new();
    db.push_datadir(&datadir_str);
    let mut input = Cursor::new("no\nno\norders\ncredit_card\nno\n");
    let mut out = Vec::new();

    let report =
        install::run(&fixture.opts, sample_schema_template(), &mut db, &mut input, &mut out)
            .unwrap();

    // Generated credentials have their fixed shapes and appear verbatim
    assert_eq!(report.username.len(), 8);
    assert_eq!(report.password.len(), 12);
    // The statement carries the template's leading comment, so match inside
    let create_user = db
        .executed
        .iter()
        .find(|sql| sql.contains("CREATE USER"))
        .expect("schema batch not executed");
    assert!(create_user.contains(&report.username));
    assert!(create_user.contains(&report.password));

    // Substitution was total: no token survives anywhere
    for sql in &db.executed {
        assert!(!sql.contains("[db"), "unresolved token in: {sql}");
    }

    // Discovery ran first, before any schema statement
    assert_eq!(db.executed[0], "SHOW VARIABLES LIKE 'datadir'");

    // Cleanup removed the stray file; backup dirs exist in both locations
    assert!(!stray.exists());
    assert_eq!(report.backup_path, fixture.db_path.join("backups"));
    assert!(report.backup_path.is_dir());
    assert!(fixture.opts.settings.fallback_backup_root.join("backups").is_dir());

    // Mapping dialogue came through the same session
    assert!(db.executed.iter().any(|sql| sql.contains("sqlSec_map")));
    assert!(db.executed.last().unwrap().starts_with("CALL KR_New"));
}

#[test]
fn install_aborts_when_schema_batch_fails() {
    let fixture = install_fixture();
    let datadir_str = format!("{}/", fixture.datadir.path().display());

    let mut db = RecordingDb::new();
    db.push_datadir(&datadir_str);
    db.push_error("access denied for CREATE USER");
    let mut input = Cursor::new("");
    let mut out = Vec::new();

    let result =
        install::run(&fixture.opts, sample_schema_template(), &mut db, &mut input, &mut out);

    assert!(matches!(
        result,
        Err(SqlSecError::Install(InstallError::SchemaFailed(_)))
    ));
    // Discovery plus the one failed schema statement, nothing after
    assert_eq!(db.executed.len(), 2);
}

#[test]
fn install_survives_procedure_import_failure() {
    let mut fixture = install_fixture();
    fixture.opts.settings.client_binary = PathBuf::from("false");
    let datadir_str = format!("{}/", fixture.datadir.path().display());

    let mut db = RecordingDb::new();
    db.push_datadir(&datadir_str);
    let mut input = Cursor::new("no\nno\nusers\nssn\nno\n");
    let mut out = Vec::new();

    let report =
        install::run(&fixture.opts, sample_schema_template(), &mut db, &mut input, &mut out);

    // Import failure is reported, mapping still ran to completion
    assert!(report.is_ok());
    let printed = String::from_utf8(out).unwrap();
    assert!(printed.contains("Stored procedure import failed"));
    assert!(db.executed.last().unwrap().starts_with("CALL KR_New"));
}

#[test]
fn install_reports_missing_datadir_variable() {
    let fixture = install_fixture();

    let mut db = RecordingDb::new();
    db.push_rows(vec![]); // engine answered with no rows
    let mut input = Cursor::new("");
    let mut out = Vec::new();

    let result =
        install::run(&fixture.opts, sample_schema_template(), &mut db, &mut input, &mut out);

    assert!(matches!(
        result,
        Err(SqlSecError::Install(InstallError::DataDirDiscovery(_)))
    ));
}
