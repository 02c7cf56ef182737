//! Password value object - Domain layer password handling.

use sha2::{Digest, Sha256};

/// Password value object wrapping a one-way digest.
///
/// The digest is deterministic (SHA-256 over the credential, hex-encoded):
/// the same plain text always produces the same hash, which is what lets
/// login re-hash the supplied password and compare, and lets an update with
/// an empty password keep the stored hash untouched.
#[derive(Clone)]
pub struct Password {
    hash: String,
}

// Don't expose the hash in debug output
impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Password")
            .field("hash", &"[REDACTED]")
            .finish()
    }
}

impl Password {
    /// Create a new password by hashing the plain text.
    pub fn new(plain_text: &str) -> Self {
        Self {
            hash: Self::digest(plain_text),
        }
    }

    /// Create a Password from an existing hash (from a snapshot).
    pub fn from_hash(hash: String) -> Self {
        Self { hash }
    }

    /// Get the hash string for storage.
    pub fn as_str(&self) -> &str {
        &self.hash
    }

    /// Consume and return the hash string.
    pub fn into_string(self) -> String {
        self.hash
    }

    /// Verify a plain text password against this hash.
    pub fn verify(&self, plain_text: &str) -> bool {
        Self::digest(plain_text) == self.hash
    }

    /// Compare an already-hashed credential against this hash.
    pub fn matches_hash(&self, hashed: &str) -> bool {
        self.hash == hashed
    }

    /// Hex-encoded SHA-256 digest of the credential.
    fn digest(plain_text: &str) -> String {
        hex::encode(Sha256::digest(plain_text.as_bytes()))
    }
}

impl From<Password> for String {
    fn from(password: Password) -> Self {
        password.hash
    }
}

impl PartialEq for Password {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
    }
}

impl Eq for Password {}
