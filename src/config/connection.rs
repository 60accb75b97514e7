//! Connection configuration
//!
//! Immutable once the backend handle is opened; built from command-line
//! input plus the interactively masked administrator password.

/// Database connection configuration
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Database host
    pub host: String,

    /// Database port
    pub port: u16,

    /// Target database name
    pub database: String,

    /// Administrative account used for the install
    pub admin_user: String,

    /// Administrator password (captured with terminal echo suppressed)
    pub password: Option<String>,
}

impl ConnectionConfig {
    /// Create a configuration with the conventional defaults
    /// (port 3306, admin account `root`, no password yet).
    pub fn new(host: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: 3306,
            database: database.into(),
            admin_user: "root".to_string(),
            password: None,
        }
    }

    /// Human-readable connection target, never including the password
    pub fn display(&self) -> String {
        format!(
            "{}@{}:{}/{}",
            self.admin_user, self.host, self.port, self.database
        )
    }
}
