//! Configuration management
//!
//! Connection parameters come from the command line; installer settings
//! (template paths, client binary, service-account discovery) come from an
//! optional TOML file with sensible defaults.

pub mod connection;
pub mod settings;

pub use connection::ConnectionConfig;
pub use settings::Settings;
