//! Salted password hashing for stored users
//!
//! Passwords are never stored or returned. A user row keeps a random salt and
//! `SHA-256(salt || password)` as 64 hex characters.

use rand::Rng;
use sha2::{Digest, Sha256};

/// Salted hash of a password as stored in the `users` table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHash {
    pub hash: String,
    pub salt: String,
}

/// Hash a password with a freshly generated salt
pub fn hash_password(password: &str) -> PasswordHash {
    let salt = generate_salt();
    let hash = hash_with_salt(password, &salt);
    PasswordHash { hash, salt }
}

fn hash_with_salt(password: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn generate_salt() -> String {
    let bytes: [u8; 16] = rand::thread_rng().gen();
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
