//! Password hashing for stored accounts using Argon2id.
//!
//! Provisioned agents never log in with this password; it is stored only
//! because every account must carry one.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};

use crate::error::{DirectoryError, DirectoryResult};

/// Argon2id cost parameters for stored account passwords.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordPolicy {
    memory_kib: u32,
    iterations: u32,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            memory_kib: 19 * 1024,
            iterations: 2,
        }
    }
}

impl PasswordPolicy {
    /// Creates a policy with the default costs.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the memory cost in KiB.
    #[must_use]
    pub const fn memory_cost(mut self, kib: u32) -> Self {
        self.memory_kib = kib;
        self
    }

    /// Sets the number of passes.
    #[must_use]
    pub const fn time_cost(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    fn hasher(&self) -> DirectoryResult<Argon2<'static>> {
        let params = Params::new(self.memory_kib, self.iterations, 1, None)
            .map_err(|e| DirectoryError::Internal(format!("invalid password policy: {e}")))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

/// Hashes and checks the passwords stored with directory accounts.
#[derive(Debug, Clone, Default)]
pub struct PasswordHasherService {
    policy: PasswordPolicy,
}

impl PasswordHasherService {
    /// Creates a hasher applying `policy` to new hashes.
    #[must_use]
    pub const fn new(policy: PasswordPolicy) -> Self {
        Self { policy }
    }

    /// Hashes a password into a PHC string with a fresh salt.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::Internal` if the policy is invalid or hashing fails.
    pub fn hash(&self, password: &str) -> DirectoryResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        self.policy
            .hasher()?
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| DirectoryError::Internal(e.to_string()))
    }

    /// Checks a password against a stored PHC string.
    ///
    /// The cost parameters are read from the stored hash, so accounts hashed
    /// under an older policy still verify.
    #[must_use]
    pub fn verify(&self, password: &str, stored: &str) -> bool {
        PasswordHash::new(stored).is_ok_and(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
    }
}
