//! Generated install secrets
//!
//! Each install mints a fresh application account and key-derivation seed
//! from the OS random source. The secrets exist only inside the executed
//! SQL and the summary printed to the operator; nothing persists them.

use rand::distributions::Alphanumeric;
use rand::rngs::OsRng;
use rand::Rng;

/// Length of the application database username
pub const USERNAME_LEN: usize = 8;

/// Length of the application database password
pub const PASSWORD_LEN: usize = 12;

/// Raw length of the key-derivation seed, before hex rendering
pub const KEY_SEED_BYTES: usize = 64;

/// One install's worth of generated credentials
#[derive(Debug, Clone)]
pub struct Secrets {
    /// Application database username (8 alphanumeric chars)
    pub username: String,
    /// Application database password (12 alphanumeric chars)
    pub password: String,
    /// Key-derivation seed: 64 random bytes rendered as lowercase hex
    pub key_seed: String,
}

impl Secrets {
    /// Generate a fresh credential set from the OS random source.
    pub fn generate() -> Self {
        let mut seed = [0u8; KEY_SEED_BYTES];
        OsRng.fill(&mut seed[..]);
        Self {
            username: random_token(USERNAME_LEN),
            password: random_token(PASSWORD_LEN),
            key_seed: hex::encode(seed),
        }
    }
}

fn random_token(len: usize) -> String {
    OsRng
        .sample_iter(Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}
