//! SQL template substitution
//!
//! The schema and procedure documents carry seven placeholder tokens that
//! are replaced with literal text — plain substitution, not parameter
//! binding, because the values end up inside DDL and procedure bodies.
//! Substitution must be total: a document with any surviving token is
//! never sent to the database.

use crate::error::{InstallError, InstallResult};
use std::path::Path;

/// The placeholder tokens, in substitution order
pub const TOKENS: [&str; 7] = [
    "[dbVer]", "[dbHost]", "[dbName]", "[dbUser]", "[dbPass]", "[dbKey]", "[dbPath]",
];

/// The ordered token → value mapping applied to both SQL documents
#[derive(Debug, Clone)]
pub struct Substitutions {
    pub version: String,
    pub host: String,
    pub database: String,
    pub user: String,
    pub password: String,
    pub key_seed: String,
    pub data_path: String,
}

impl Substitutions {
    /// Replace every token with its literal value.
    pub fn apply(&self, document: &str) -> String {
        document
            .replace("[dbVer]", &self.version)
            .replace("[dbHost]", &self.host)
            .replace("[dbName]", &self.database)
            .replace("[dbUser]", &self.user)
            .replace("[dbPass]", &self.password)
            .replace("[dbKey]", &self.key_seed)
            .replace("[dbPath]", &self.data_path)
    }

    /// Replace every token and verify none survived.
    ///
    /// # Errors
    /// `InstallError::UnresolvedPlaceholders` naming the leftover tokens.
    pub fn apply_checked(&self, document: &str) -> InstallResult<String> {
        let output = self.apply(document);
        let leftover = unresolved(&output);
        if leftover.is_empty() {
            Ok(output)
        } else {
            Err(InstallError::UnresolvedPlaceholders(leftover.join(", ")))
        }
    }
}

/// Tokens still present in a document
pub fn unresolved(document: &str) -> Vec<&'static str> {
    TOKENS
        .iter()
        .copied()
        .filter(|token| document.contains(token))
        .collect()
}

/// Read a template document.
///
/// # Errors
/// `InstallError::TemplateMissing` when the file cannot be read.
pub fn load(path: &Path) -> InstallResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| InstallError::TemplateMissing(format!("{}: {}", path.display(), e)))
}
