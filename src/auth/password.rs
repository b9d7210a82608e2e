//! Password hashing for the forum backend.
//!
//! Hashing is a pluggable one-way capability behind [`CredentialHasher`].
//! The default implementation uses Argon2id.

use argon2::{
    password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand_core::OsRng;
use thiserror::Error;

/// Default Argon2 memory cost in KiB (64 MB).
pub const DEFAULT_M_COST: u32 = 65536;

/// Default Argon2 time cost (iterations).
pub const DEFAULT_T_COST: u32 = 3;

/// Default Argon2 parallelism.
pub const DEFAULT_P_COST: u32 = 4;

/// Password hashing errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PasswordError {
    /// Hashing parameters are out of range.
    #[error("invalid hashing parameters: {0}")]
    InvalidParams(String),

    /// Password hashing failed.
    #[error("password hashing failed: {0}")]
    HashError(String),

    /// Stored hash could not be parsed.
    #[error("invalid password hash format")]
    InvalidHash,
}

/// One-way password hashing capability.
///
/// Implementations are CPU-bound and synchronous; async callers run them on
/// a blocking thread.
pub trait CredentialHasher: Send + Sync {
    /// Hash a raw password into a self-describing string.
    fn hash(&self, password: &str) -> Result<String, PasswordError>;

    /// Check a raw password against a stored hash.
    ///
    /// Returns `Ok(false)` on mismatch; errors are reserved for hashes that
    /// cannot be processed at all.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError>;
}

/// Argon2id password hasher.
#[derive(Debug, Clone)]
pub struct Argon2Hasher {
    params: Params,
}

impl Argon2Hasher {
    /// Create a hasher with the recommended parameters.
    pub fn new() -> Self {
        Self {
            params: Params::new(DEFAULT_M_COST, DEFAULT_T_COST, DEFAULT_P_COST, None)
                .unwrap_or_default(),
        }
    }

    /// Create a hasher with explicit cost parameters.
    ///
    /// Low costs are useful in tests where hashing speed matters more than
    /// resistance to brute force.
    pub fn with_params(m_cost: u32, t_cost: u32, p_cost: u32) -> Result<Self, PasswordError> {
        let params = Params::new(m_cost, t_cost, p_cost, None)
            .map_err(|e| PasswordError::InvalidParams(e.to_string()))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl Default for Argon2Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| PasswordError::HashError(e.to_string()))?;
        Ok(hash.to_string())
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed = PasswordHash::new(hash).map_err(|_| PasswordError::InvalidHash)?;

        // Parameters come from the parsed hash, not from self.
        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(PasswordError::HashError(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_hasher() -> Argon2Hasher {
        Argon2Hasher::with_params(8, 1, 1).unwrap()
    }

    #[test]
    fn test_hash_is_phc_argon2id() {
        let hash = fast_hasher().hash("pw1").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(hash.contains("$v=19$"));
    }

    #[test]
    fn test_hashes_are_salted() {
        let hasher = fast_hasher();
        let hash1 = hasher.hash("same").unwrap();
        let hash2 = hasher.hash("same").unwrap();

        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_verify_correct_and_wrong() {
        let hasher = fast_hasher();
        let hash = hasher.hash("correct horse").unwrap();

        assert!(hasher.verify("correct horse", &hash).unwrap());
        assert!(!hasher.verify("wrong horse", &hash).unwrap());
    }

    #[test]
    fn test_verify_uses_params_from_hash() {
        let hash = fast_hasher().hash("secret").unwrap();
        let other = Argon2Hasher::with_params(16, 2, 1).unwrap();

        assert!(other.verify("secret", &hash).unwrap());
    }

    #[test]
    fn test_verify_invalid_hash() {
        let result = fast_hasher().verify("any", "not_a_valid_hash");
        assert_eq!(result, Err(PasswordError::InvalidHash));
    }

    #[test]
    fn test_with_params_rejects_invalid() {
        let result = Argon2Hasher::with_params(8, 0, 1);
        assert!(matches!(result, Err(PasswordError::InvalidParams(_))));
    }

    #[test]
    fn test_default_params() {
        let hasher = Argon2Hasher::default();
        assert_eq!(hasher.params.m_cost(), DEFAULT_M_COST);
        assert_eq!(hasher.params.t_cost(), DEFAULT_T_COST);
        assert_eq!(hasher.params.p_cost(), DEFAULT_P_COST);
    }
}
