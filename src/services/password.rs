//! Password digests stored with each account.

use sha2::{Digest, Sha256};

/// Hash a password into a 64-character lowercase hex SHA-256 digest.
#[must_use]
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// Compare a password against a stored digest without short-circuiting on the first mismatch.
#[must_use]
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let candidate = hash_password(password);
    let (a, b) = (candidate.as_bytes(), stored_hash.as_bytes());

    if a.len() != b.len() {
        return false;
    }

    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
