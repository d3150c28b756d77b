// ABOUTME: Cryptographic random helpers for one-time codes and opaque lookup tokens
// ABOUTME: Also hosts the bcrypt password-hash collaborator used by credential primitives
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TalentGate

//! Credential primitives backed by the OS CSPRNG.
//!
//! Nothing in this module derives values from counters or timestamps; every
//! generated code or token comes from `rand`'s thread-local CSPRNG.

use crate::errors::{AppError, AppResult};
use rand::{thread_rng, Rng, RngCore};

/// Generate a fixed-length numeric one-time code.
///
/// Each digit is drawn independently so the code is uniform over `10^len`.
#[must_use]
pub fn generate_otp_code(len: usize) -> String {
    let mut rng = thread_rng();
    (0..len)
        .map(|_| char::from(b'0' + rng.gen_range(0..10_u8)))
        .collect()
}

/// Generate a hex-encoded random token of `n_bytes` entropy.
///
/// Used for invitation and password-reset tokens: unguessable, single-use
/// lookup keys.
#[must_use]
pub fn generate_token_hex(n_bytes: usize) -> String {
    let mut bytes = vec![0u8; n_bytes];
    thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Password hashing collaborator.
///
/// No password login exists in this engine; this is kept for credential
/// primitives that need one-way verification at rest.
#[derive(Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    /// Create a hasher with the given bcrypt cost
    #[must_use]
    pub const fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// Hash a secret with bcrypt
    ///
    /// # Errors
    ///
    /// Returns an error if bcrypt rejects the input or the cost parameter
    pub fn hash(&self, secret: &str) -> AppResult<String> {
        bcrypt::hash(secret, self.cost)
            .map_err(|e| AppError::internal("failed to hash secret").with_source(e))
    }

    /// Verify a secret against a stored bcrypt hash
    #[must_use]
    pub fn verify(&self, hash: &str, secret: &str) -> bool {
        bcrypt::verify(secret, hash).unwrap_or(false)
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(crate::constants::limits::BCRYPT_COST)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_otp_code_is_numeric_and_fixed_length() {
        for _ in 0..50 {
            let code = generate_otp_code(6);
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_token_hex_length_and_uniqueness() {
        let a = generate_token_hex(32);
        let b = generate_token_hex(32);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[test]
    fn test_password_hasher_round_trip() {
        let hasher = PasswordHasher::new(4); // low cost for the test
        let hash = hasher.hash("s3cret").unwrap();
        assert!(hasher.verify(&hash, "s3cret"));
        assert!(!hasher.verify(&hash, "not-it"));
    }
}
