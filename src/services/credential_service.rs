//! Password hashing, verification and API token issuance.
//!
//! Passwords are hashed with bcrypt at a configurable cost. Tokens are
//! 32 bytes from the operating system RNG, base64 encoded.

use base64::{Engine as _, engine::general_purpose};
use rand::{RngCore, rngs::OsRng};
use std::sync::{
    Arc, OnceLock,
    atomic::{AtomicU64, Ordering},
};
use thiserror::Error;

/// Cheapest cost bcrypt accepts.
pub const MIN_BCRYPT_COST: u32 = 4;
/// Most expensive cost bcrypt accepts.
pub const MAX_BCRYPT_COST: u32 = 31;
/// Default work factor for new hashes.
pub const DEFAULT_BCRYPT_COST: u32 = bcrypt::DEFAULT_COST;
/// bcrypt only consumes the first 72 bytes of its input.
pub const MAX_PASSWORD_BYTES: usize = 72;

const TOKEN_BYTES: usize = 32;

/// Plaintext behind the hash used when a login names an unknown user.
const DUMMY_PASSWORD: &str = "terraspoof-unknown-user";

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("password hashing failed: {0}")]
    Hashing(#[from] bcrypt::BcryptError),
    #[error("secure random source unavailable: {0}")]
    Randomness(rand::Error),
    #[error("password exceeds {MAX_PASSWORD_BYTES} bytes")]
    PasswordTooLong,
}

/// Credential helper carrying the configured bcrypt cost.
///
/// Clones share the dummy hash and the verification counter.
#[derive(Clone, Debug)]
pub struct CredentialService {
    cost: u32,
    dummy_hash: Arc<OnceLock<String>>,
    verifications: Arc<AtomicU64>,
}

impl CredentialService {
    /// Create a service hashing at `cost`. Out-of-range costs surface as a
    /// `Hashing` error on the first hash, mirroring bcrypt.
    pub fn new(cost: u32) -> Self {
        Self {
            cost,
            dummy_hash: Arc::new(OnceLock::new()),
            verifications: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Produce a salted bcrypt hash of `password`.
    pub fn hash_password(&self, password: &str) -> Result<String, CredentialError> {
        if password.len() > MAX_PASSWORD_BYTES {
            return Err(CredentialError::PasswordTooLong);
        }
        Ok(bcrypt::hash(password, self.cost)?)
    }

    /// True iff `password` matches `hash`. Malformed hashes and over-long
    /// passwords are a mismatch, not an error.
    pub fn verify_password(&self, hash: &str, password: &str) -> bool {
        self.verifications.fetch_add(1, Ordering::Relaxed);
        if password.len() > MAX_PASSWORD_BYTES {
            return false;
        }
        bcrypt::verify(password, hash).unwrap_or(false)
    }

    /// Spend the same bcrypt work as a real verification and report a
    /// mismatch. Used when the login name does not exist.
    pub fn verify_unknown_user(&self, password: &str) -> bool {
        match self.dummy_hash() {
            Ok(hash) => {
                self.verify_password(hash, password);
            }
            Err(_) => {
                self.verifications.fetch_add(1, Ordering::Relaxed);
            }
        }
        false
    }

    /// Compute the dummy hash ahead of the first unknown-user login.
    pub fn prime(&self) -> Result<(), CredentialError> {
        self.dummy_hash().map(|_| ())
    }

    /// Number of password verifications performed, dummy ones included.
    pub fn verifications(&self) -> u64 {
        self.verifications.load(Ordering::Relaxed)
    }

    fn dummy_hash(&self) -> Result<&str, CredentialError> {
        if let Some(hash) = self.dummy_hash.get() {
            return Ok(hash.as_str());
        }
        let hash = self.hash_password(DUMMY_PASSWORD)?;
        Ok(self.dummy_hash.get_or_init(|| hash).as_str())
    }

    /// Generate a 256-bit random API token, base64 encoded.
    pub fn generate_token(&self) -> Result<String, CredentialError> {
        let mut key = [0u8; TOKEN_BYTES];
        OsRng
            .try_fill_bytes(&mut key)
            .map_err(CredentialError::Randomness)?;
        Ok(general_purpose::STANDARD.encode(key))
    }
}

impl Default for CredentialService {
    fn default() -> Self {
        Self::new(DEFAULT_BCRYPT_COST)
    }
}
