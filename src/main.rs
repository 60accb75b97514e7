//! sqlsec-install - bootstrap MySQL in-database field encryption
//!
//! Thin binary wrapper: argument parsing, logging setup, and the privilege
//! gate live here; the install logic is in the library for testability.

use anyhow::Context;
use clap::{ArgAction, Parser};
use sqlsec::config::{ConnectionConfig, Settings};
use sqlsec::db::Backend;
use sqlsec::install::{self, InstallOptions, InstallReport, template};
use sqlsec::prompt;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Install the sqlSec field-encryption schema and stored procedures
#[derive(Debug, Parser)]
#[command(name = "sqlsec-install", version, about)]
struct Cli {
    /// Database host
    host: String,

    /// Target database name
    database: String,

    /// Database port
    #[arg(long, default_value_t = 3306)]
    port: u16,

    /// Administrative account used for the install
    #[arg(long, default_value = "root")]
    admin_user: String,

    /// Settings file (defaults to ~/.sqlsec/settings.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Read mapping answers from a file instead of the terminal
    #[arg(long)]
    mappings: Option<PathBuf>,

    /// Print help
    #[arg(short = '?', action = ArgAction::Help)]
    help_alias: Option<bool>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    // Schema application, directory ownership, and data-dir cleanup all
    // need elevated privilege; exit code 2 keeps this distinguishable
    // from a help invocation
    if !running_as_root() {
        eprintln!("Error: must be run as root");
        return ExitCode::from(2);
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = Settings::load(cli.config.as_deref())?;

    // The schema document must be readable before any credentials are
    // captured or a connection is attempted; a missing template aborts here
    let schema_doc = template::load(&settings.schema_file)?;

    let password = prompt::read_password("Enter MySQL root password: ")?;
    let mut connection = ConnectionConfig::new(cli.host, cli.database);
    connection.port = cli.port;
    connection.admin_user = cli.admin_user;
    connection.password = Some(password);

    let mut db = Backend::open(&connection, settings.backend)
        .with_context(|| format!("connecting to {}", connection.display()))?;
    info!(backend = %db.kind(), target = %connection.display(), "connected");

    let opts = InstallOptions {
        connection,
        settings,
    };
    let report = run_install(&opts, &schema_doc, &mut db, cli.mappings.as_deref())?;

    // Maintenance pass, then handle release
    db.close();

    print_summary(&report);
    Ok(())
}

fn run_install(
    opts: &InstallOptions,
    schema_doc: &str,
    db: &mut Backend,
    mappings: Option<&std::path::Path>,
) -> anyhow::Result<InstallReport> {
    let mut out = io::stdout();
    let report = match mappings {
        Some(path) => {
            let file =
                File::open(path).with_context(|| format!("opening mapping input {}", path.display()))?;
            run_with_input(opts, schema_doc, db, BufReader::new(file), &mut out)?
        }
        None => run_with_input(opts, schema_doc, db, io::stdin().lock(), &mut out)?,
    };
    Ok(report)
}

fn run_with_input<R: BufRead>(
    opts: &InstallOptions,
    schema_doc: &str,
    db: &mut Backend,
    mut input: R,
    out: &mut impl Write,
) -> sqlsec::Result<InstallReport> {
    install::run(opts, schema_doc, db, &mut input, out)
}

fn print_summary(report: &InstallReport) {
    println!("sqlSec installation details:");
    println!("\tUsername: {}", report.username);
    println!("\tPassword: {}", report.password);
    println!("\tBackup path: {}", report.backup_path.display());
    println!();
}

/// The original installer's privilege gate: the invoking user must be root.
fn running_as_root() -> bool {
    std::env::var("USER").is_ok_and(|user| user == "root")
}
