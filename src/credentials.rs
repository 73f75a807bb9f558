//! Password hashing for stored credentials.
//!
//! Plaintext passwords are turned into bcrypt verifiers (`$2b$<cost>$...`).
//! Every call generates a fresh salt, so hashing the same password twice
//! yields different verifiers that both verify.

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

/// Work factor used when none is configured.
pub const DEFAULT_COST: u32 = 10;

pub const MIN_COST: u32 = 4;
pub const MAX_COST: u32 = 31;

#[derive(Debug, Error)]
pub enum HashError {
    #[error("bcrypt cost must be between {MIN_COST} and {MAX_COST}, got {0}")]
    InvalidCost(u32),

    #[error("password hashing failed: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),
}

/// Turns plaintext secrets into salted bcrypt verifiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CredentialHasher {
    cost: u32,
}

impl CredentialHasher {
    /// Build a hasher with the given work factor.
    ///
    /// # Errors
    /// Returns [`HashError::InvalidCost`] if the cost is outside `4..=31`.
    pub fn new(cost: u32) -> Result<Self, HashError> {
        if !(MIN_COST..=MAX_COST).contains(&cost) {
            return Err(HashError::InvalidCost(cost));
        }
        Ok(Self { cost })
    }

    #[must_use]
    pub const fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash a plaintext password into a verifier safe to persist.
    ///
    /// # Errors
    /// Returns an error if bcrypt fails to generate the hash.
    pub fn hash(&self, plaintext: &SecretString) -> Result<String, HashError> {
        Ok(bcrypt::hash(plaintext.expose_secret(), self.cost)?)
    }

    /// Check a plaintext password against a stored verifier.
    ///
    /// # Errors
    /// Returns an error if the verifier is not a valid bcrypt hash.
    pub fn verify(&self, plaintext: &SecretString, verifier: &str) -> Result<bool, HashError> {
        Ok(bcrypt::verify(plaintext.expose_secret(), verifier)?)
    }
}

impl Default for CredentialHasher {
    fn default() -> Self {
        Self { cost: DEFAULT_COST }
    }
}
