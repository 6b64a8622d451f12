use argon2::{
    password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand::{rngs::OsRng, RngCore};
use zeroize::Zeroizing;

use crate::error::{AppError, Result};

/// The memory cost for Argon2 in KiB.
const ARGON2_MEMORY_KIB: u32 = 19 * 1024;
/// The number of iterations for Argon2.
const ARGON2_ITERATIONS: u32 = 2;
/// The parallelism factor for Argon2.
const ARGON2_PARALLELISM: u32 = 1;
/// The salt length in bytes.
const SALT_SIZE: usize = 16;

/// Salted one-way password hashing with a fixed work factor.
///
/// Hashes are PHC strings carrying their own salt and parameters, so two hashes
/// of the same password differ and can only be compared through [`verify`].
///
/// [`verify`]: PasswordHasher::verify
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    pub fn new() -> Self {
        let params = Params::new(
            ARGON2_MEMORY_KIB,
            ARGON2_ITERATIONS,
            ARGON2_PARALLELISM,
            None,
        )
        .unwrap_or_default();

        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        }
    }

    /// Hashes a password using Argon2id and a fresh random salt.
    ///
    /// # Arguments
    ///
    /// * `password` - The password to hash.
    ///
    /// # Returns
    ///
    /// A `Result` containing the PHC-formatted hash.
    pub fn hash(&self, password: &str) -> Result<String> {
        let password_bytes = Zeroizing::new(password.as_bytes().to_vec());

        let mut salt_bytes = [0u8; SALT_SIZE];
        OsRng
            .try_fill_bytes(&mut salt_bytes)
            .map_err(|e| AppError::Internal(format!("Failed to generate salt: {}", e)))?;

        let salt = SaltString::encode_b64(&salt_bytes)
            .map_err(|e| AppError::Internal(format!("Salt encoding error: {}", e)))?;

        let password_hash = self
            .argon2
            .hash_password(&password_bytes, &salt)
            .map_err(|e| AppError::Internal(format!("Argon2 hash error: {}", e)))?
            .to_string();

        tracing::debug!("Password hashed successfully with Argon2");
        Ok(password_hash)
    }

    /// Verifies a password against a hash produced by [`hash`](Self::hash).
    ///
    /// A malformed or unsupported hash verifies as `false`.
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        let parsed_hash = match PasswordHash::new(hash) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::debug!("Stored password hash is malformed: {}", e);
                return false;
            }
        };

        let password_bytes = Zeroizing::new(password.as_bytes().to_vec());
        // Parameters come from the hash itself, so older hashes keep verifying.
        self.argon2
            .verify_password(&password_bytes, &parsed_hash)
            .is_ok()
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}
