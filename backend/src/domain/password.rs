//! Salted one-way password hashing built on argon2.
//!
//! Hashes are produced in PHC string format with a per-password random salt,
//! so identical passwords never share a hash. Verification recomputes the
//! hash with the stored parameters and compares in constant time inside the
//! argon2 crate.

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};

use super::user::PasswordHashString;

/// Failures raised while hashing or verifying passwords.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordError {
    /// Hashing the supplied password failed.
    #[error("password hashing failed: {message}")]
    Hash {
        /// Underlying failure description.
        message: String,
    },
    /// The stored hash could not be parsed as a PHC string.
    #[error("stored password hash is malformed: {message}")]
    MalformedHash {
        /// Underlying failure description.
        message: String,
    },
}

impl PasswordError {
    fn hash(message: impl Into<String>) -> Self {
        Self::Hash {
            message: message.into(),
        }
    }

    fn malformed_hash(message: impl Into<String>) -> Self {
        Self::MalformedHash {
            message: message.into(),
        }
    }
}

/// Stateless hashing/verification service with default argon2id parameters.
///
/// # Examples
/// ```
/// use parley::domain::PasswordService;
///
/// let passwords = PasswordService::default();
/// let hash = passwords.hash("secret123").unwrap();
/// assert!(passwords.verify("secret123", &hash).unwrap());
/// assert!(!passwords.verify("wrong", &hash).unwrap());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PasswordService;

impl PasswordService {
    /// Hash a plaintext password with a fresh random salt.
    pub fn hash(&self, password: &str) -> Result<PasswordHashString, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|err| PasswordError::hash(err.to_string()))?;
        Ok(PasswordHashString::new(hash.to_string()))
    }

    /// Check a plaintext password against a stored hash.
    ///
    /// A mismatch is `Ok(false)`, not an error: callers decide how to report
    /// failed credentials. Only an unparseable stored hash is an error.
    pub fn verify(
        &self,
        password: &str,
        stored: &PasswordHashString,
    ) -> Result<bool, PasswordError> {
        let parsed = PasswordHash::new(stored.as_str())
            .map_err(|err| PasswordError::malformed_hash(err.to_string()))?;

        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(err) => Err(PasswordError::malformed_hash(err.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    #[test]
    fn hashes_are_salted_and_never_plaintext() {
        let passwords = PasswordService::default();
        let first = passwords.hash("secret123").expect("hashing succeeds");
        let second = passwords.hash("secret123").expect("hashing succeeds");

        assert_ne!(first.as_str(), "secret123");
        assert!(first.as_str().starts_with("$argon2"));
        // Fresh salt per call: identical passwords must not share a hash.
        assert_ne!(first.as_str(), second.as_str());
    }

    #[test]
    fn verify_accepts_the_original_password_only() {
        let passwords = PasswordService::default();
        let hash = passwords.hash("secret123").expect("hashing succeeds");

        assert!(passwords.verify("secret123", &hash).expect("verify runs"));
        assert!(!passwords.verify("secret124", &hash).expect("verify runs"));
        assert!(!passwords.verify("", &hash).expect("verify runs"));
    }

    #[test]
    fn malformed_stored_hashes_are_an_error_not_a_mismatch() {
        let passwords = PasswordService::default();
        let stored = PasswordHashString::new("not-a-phc-string");

        let err = passwords
            .verify("secret123", &stored)
            .expect_err("malformed hash must error");
        assert!(matches!(err, PasswordError::MalformedHash { .. }));
    }
}
