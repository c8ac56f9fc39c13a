// ============================================
// File: crates/skylark-core/src/crypto/hash.rs
// ============================================
//! # One-Way Digest
//!
//! SHA-256, used as the key-derivation step in [`super::agreement`]
//! and exposed standalone for other subsystems (packet dedup hashes,
//! channel name hashing). Stateless and deterministic; no error
//! conditions.

use sha2::{Digest, Sha256};

use super::SHA256_DIGEST_SIZE;

/// Computes the SHA-256 digest of `bytes`.
#[must_use]
pub fn sha256_digest(bytes: &[u8]) -> [u8; SHA256_DIGEST_SIZE] {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let mut digest = [0u8; SHA256_DIGEST_SIZE];
    digest.copy_from_slice(&hasher.finalize());
    digest
}

// ============================================
// Tests
// ============================================
