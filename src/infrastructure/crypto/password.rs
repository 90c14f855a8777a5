//! Password hashing utilities
//!
//! bcrypt output is self-describing (`$2b$<cost>$<salt><digest>`), so the
//! cost can be raised later without invalidating stored hashes.

use std::sync::Arc;

use bcrypt::{hash, verify, DEFAULT_COST};
use thiserror::Error;

/// Lowest and highest work factors bcrypt accepts
pub const MIN_COST: u32 = 4;
pub const MAX_COST: u32 = 31;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PasswordError {
    #[error("failed to hash password")]
    Hash,
    #[error("stored password hash is malformed")]
    MalformedHash,
}

/// Salted bcrypt hasher with a tunable work factor
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    cost: u32,
    /// Hash checked against when the account does not exist. Built up front
    /// so the first unknown-email login costs the same as every other one.
    dummy: Arc<Option<String>>,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(DEFAULT_COST)
    }
}

impl PasswordHasher {
    /// `cost` is clamped to the range bcrypt accepts. Runs one bcrypt hash
    /// at this cost.
    pub fn new(cost: u32) -> Self {
        let cost = cost.clamp(MIN_COST, MAX_COST);
        Self {
            cost,
            dummy: Arc::new(hash("dummy-password", cost).ok()),
        }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash a password using bcrypt
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        hash(password, self.cost).map_err(|_| PasswordError::Hash)
    }

    /// Verify a password against a stored hash.
    ///
    /// A mismatch is `Ok(false)`; only an unparseable stored hash is an error.
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        verify(password, hash).map_err(|_| PasswordError::MalformedHash)
    }

    /// Spend the same work as a real verification. Used when the account does
    /// not exist so response timing does not reveal registered emails.
    pub fn verify_dummy(&self, password: &str) {
        if let Some(dummy) = self.dummy.as_deref() {
            let _ = verify(password, dummy);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> PasswordHasher {
        PasswordHasher::new(MIN_COST)
    }

    #[test]
    fn hash_never_equals_plaintext() {
        let hashed = hasher().hash("p1").unwrap();
        assert_ne!(hashed, "p1");
        assert!(hashed.starts_with("$2"));
    }

    #[test]
    fn hashes_are_salted() {
        let h = hasher();
        assert_ne!(h.hash("same").unwrap(), h.hash("same").unwrap());
    }

    #[test]
    fn verify_matches_only_the_right_password() {
        let h = hasher();
        let hashed = h.hash("correct horse").unwrap();
        assert_eq!(h.verify("correct horse", &hashed), Ok(true));
        assert_eq!(h.verify("battery staple", &hashed), Ok(false));
    }

    #[test]
    fn malformed_hash_is_an_error() {
        assert_eq!(
            hasher().verify("whatever", "not-a-bcrypt-hash"),
            Err(PasswordError::MalformedHash)
        );
    }

    #[test]
    fn dummy_hash_is_ready_before_first_use() {
        let h = hasher();
        let dummy = h.dummy.as_deref().unwrap();
        assert!(dummy.starts_with(&format!("$2b$0{}$", MIN_COST)));

        h.verify_dummy("anything");
        assert_eq!(h.dummy.as_deref(), Some(dummy));
    }

    #[test]
    fn cost_is_clamped() {
        assert_eq!(PasswordHasher::new(1).cost(), MIN_COST);
        assert_eq!(PasswordHasher::new(99).cost(), MAX_COST);
    }
}
