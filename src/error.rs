//! Error types for sqlsec
//!
//! This module defines the error hierarchy used throughout the installer.
//! We use `thiserror` for library-style errors with clear error chains.

use std::io;

/// Main error type for the sqlsec installer
#[derive(Debug, thiserror::Error)]
pub enum SqlSecError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DbError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Installation stage errors
    #[error("Install error: {0}")]
    Install(#[from] InstallError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Database operation errors
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// Failed to establish connection
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Query execution failed
    #[error("Query execution failed: {0}")]
    QueryFailed(String),

    /// None of the native access methods answered the capability probe
    #[error("No usable database access method")]
    NoUsableBackend,
}

/// Configuration loading/parsing errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Home directory not found
    #[error("Could not determine home directory")]
    NoHomeDir,

    /// Config file not found
    #[error("Configuration file not found: {0}")]
    NotFound(String),

    /// Failed to parse TOML
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Installation stage errors
#[derive(Debug, thiserror::Error)]
pub enum InstallError {
    /// A SQL template document is missing
    #[error("Template not found: {0}")]
    TemplateMissing(String),

    /// Placeholder tokens survived substitution
    #[error("Unresolved placeholders after substitution: {0}")]
    UnresolvedPlaceholders(String),

    /// The engine did not report its data directory
    #[error("Data directory discovery failed: {0}")]
    DataDirDiscovery(String),

    /// Schema batch execution failed (fatal, no rollback is attempted)
    #[error("Schema execution failed: {0}")]
    SchemaFailed(String),

    /// The procedure-import subprocess failed
    #[error("Stored procedure import failed: {0}")]
    ImportFailed(String),
}

/// Specialized Result type for sqlsec operations
pub type Result<T> = std::result::Result<T, SqlSecError>;

/// Specialized Result type for database operations
pub type DbResult<T> = std::result::Result<T, DbError>;

/// Specialized Result type for config operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Specialized Result type for install stages
pub type InstallResult<T> = std::result::Result<T, InstallError>;
