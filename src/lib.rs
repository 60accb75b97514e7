//! sqlsec - installer for MySQL in-database field encryption
//!
//! sqlsec bootstraps a field-encryption subsystem that lives inside the
//! database engine: it provisions a dedicated application account, applies
//! a schema and a set of stored procedures implementing encryption and key
//! rotation, and records which tables and fields are to be treated as
//! encrypted.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`config`]: Connection parameters and installer settings
//! - [`db`]: Backend-abstraction layer over the native access methods
//! - [`install`]: The bootstrap orchestrator and its stages
//! - [`prompt`]: Masked password entry and yes/no helpers
//! - [`error`]: Error types and result aliases
//!
//! # Example
//!
//! ```no_run
//! use sqlsec::config::ConnectionConfig;
//! use sqlsec::db::{Backend, Database};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut config = ConnectionConfig::new("localhost", "secdb");
//! config.password = Some("rootpass".into());
//!
//! // Capability probe picks the access method once; the handle is fixed
//! let mut db = Backend::open(&config, None)?;
//! let results = db.query("SHOW VARIABLES LIKE 'datadir'", true)?;
//! println!("datadir = {:?}", results.first().and_then(|r| r.get("Value")));
//!
//! // Teardown runs the best-effort table maintenance pass
//! db.close();
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod db;
pub mod error;
pub mod install;
pub mod prompt;

pub use error::{ConfigError, DbError, InstallError, Result, SqlSecError};
