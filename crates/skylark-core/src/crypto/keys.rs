// ============================================
// File: crates/skylark-core/src/crypto/keys.rs
// ============================================
//! # Cryptographic Key Types
//!
//! ## Creation Reason
//! Defines the key types used by the packet engine with proper
//! security properties (Zeroize on drop, constant-time comparison,
//! redacted Debug output).
//!
//! ## Main Functionality
//! - `SymmetricKey`: The channel key (cleartext / AES-128 / AES-256 /
//!   invalid sentinel)
//! - `PublicKey`: A Curve25519 public point, safe to share
//! - `IdentityKeyPair`: The node's long-term Curve25519 identity
//! - `SessionKey`: Per-peer symmetric key derived via key agreement
//!
//! ## Key Lifecycle
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │  SymmetricKey (channel key)                                │
//! │  ├─ Installed by the application layer at configuration    │
//! │  ├─ Process-lifetime unless explicitly replaced            │
//! │  └─ All-zero / empty material means "send cleartext"       │
//! │                                                            │
//! │  IdentityKeyPair (long-term)                               │
//! │  ├─ Generated once per device identity                     │
//! │  ├─ May be cleared (zeroized in place) and regenerated     │
//! │  └─ Never leaves the engine                                │
//! │                                                            │
//! │  SessionKey (per-peer)                                     │
//! │  ├─ Derived lazily on first key agreement with a peer      │
//! │  ├─ Cached until either endpoint's identity changes        │
//! │  └─ Zeroed on drop                                         │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - ALL key types MUST implement Zeroize
//! - Private keys must NEVER be logged or serialized carelessly
//! - Use constant-time comparison for key equality
//!
//! ## Last Modified
//! v0.1.0 - Initial key type definitions

use std::fmt;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use x25519_dalek::{PublicKey as X25519PublicKey, StaticSecret};
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::{
    AES128_KEY_SIZE, AES256_KEY_SIZE, SESSION_KEY_SIZE, X25519_PRIVATE_KEY_SIZE,
    X25519_PUBLIC_KEY_SIZE,
};

// ============================================
// SymmetricKey
// ============================================

/// The pre-shared channel key applied uniformly to channel traffic.
///
/// # Variants
/// - `Cleartext`: the documented "no encryption" convention. Empty or
///   all-zero key material from the application layer lands here, and
///   the engine passes buffers through untouched.
/// - `Aes128` / `Aes256`: real key material for the counter-mode
///   transform.
/// - `Invalid`: a distinct, never-usable sentinel. Any disallowed key
///   length maps here, and every transform fails closed until a valid
///   key replaces it. This is not the same thing as `Cleartext`.
///
/// # Example
/// ```
/// use skylark_core::crypto::keys::SymmetricKey;
///
/// assert!(matches!(SymmetricKey::from_bytes(&[]), SymmetricKey::Cleartext));
/// assert!(matches!(SymmetricKey::from_bytes(&[7u8; 16]), SymmetricKey::Aes128(_)));
/// assert!(matches!(SymmetricKey::from_bytes(&[7u8; 13]), SymmetricKey::Invalid));
/// ```
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub enum SymmetricKey {
    /// No encryption: buffers are transmitted as plaintext.
    Cleartext,
    /// 16-byte AES-128 key.
    Aes128([u8; AES128_KEY_SIZE]),
    /// 32-byte AES-256 key.
    Aes256([u8; AES256_KEY_SIZE]),
    /// Unusable key material; every transform is refused.
    Invalid,
}

impl SymmetricKey {
    /// Classifies raw key material from the application layer.
    ///
    /// # Mapping
    /// - empty, or all-zero content of an accepted length → `Cleartext`
    ///   (the wire-compatible "no encryption" convention)
    /// - 16 bytes → `Aes128`
    /// - 32 bytes → `Aes256`
    /// - any other length → `Invalid`, even when all-zero: the
    ///   cleartext convention never rescues a disallowed length
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        // Length first, so bad material can never fail open.
        match bytes.len() {
            0 => return Self::Cleartext,
            AES128_KEY_SIZE | AES256_KEY_SIZE => {}
            _ => return Self::Invalid,
        }
        if bytes.iter().all(|&b| b == 0) {
            return Self::Cleartext;
        }
        match bytes.len() {
            AES128_KEY_SIZE => {
                let mut key = [0u8; AES128_KEY_SIZE];
                key.copy_from_slice(bytes);
                Self::Aes128(key)
            }
            AES256_KEY_SIZE => {
                let mut key = [0u8; AES256_KEY_SIZE];
                key.copy_from_slice(bytes);
                Self::Aes256(key)
            }
            _ => Self::Invalid,
        }
    }

    /// Returns `true` for the "send as plaintext" convention.
    #[must_use]
    pub const fn is_cleartext(&self) -> bool {
        matches!(self, Self::Cleartext)
    }

    /// Returns `true` for the unusable sentinel.
    #[must_use]
    pub const fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid)
    }

    /// Short variant name for logging. Never exposes key bytes.
    #[must_use]
    pub const fn variant_name(&self) -> &'static str {
        match self {
            Self::Cleartext => "cleartext",
            Self::Aes128(_) => "aes128",
            Self::Aes256(_) => "aes256",
            Self::Invalid => "invalid",
        }
    }
}

impl Default for SymmetricKey {
    fn default() -> Self {
        Self::Cleartext
    }
}

impl fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print key material
        write!(f, "SymmetricKey({})", self.variant_name())
    }
}

// ============================================
// PublicKey
// ============================================

/// A Curve25519 public point. Safe to share publicly.
///
/// The node directory hands these out; peers embed them in node-info
/// packets.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey([u8; X25519_PUBLIC_KEY_SIZE]);

impl PublicKey {
    /// Creates a public key from raw bytes.
    ///
    /// Returns `None` if the slice is not exactly 32 bytes.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != X25519_PUBLIC_KEY_SIZE {
            return None;
        }
        let mut key = [0u8; X25519_PUBLIC_KEY_SIZE];
        key.copy_from_slice(bytes);
        Some(Self(key))
    }

    /// Returns the raw public key bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; X25519_PUBLIC_KEY_SIZE] {
        &self.0
    }

    /// Returns the raw public key bytes (owned).
    #[must_use]
    pub const fn to_bytes(&self) -> [u8; X25519_PUBLIC_KEY_SIZE] {
        self.0
    }
}

impl From<[u8; X25519_PUBLIC_KEY_SIZE]> for PublicKey {
    fn from(bytes: [u8; X25519_PUBLIC_KEY_SIZE]) -> Self {
        Self(bytes)
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Show truncated hex for debugging
        write!(
            f,
            "PublicKey({:02x}{:02x}{:02x}{:02x}...)",
            self.0[0], self.0[1], self.0[2], self.0[3]
        )
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", BASE64.encode(self.0))
    }
}

impl Serialize for PublicKey {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        if serializer.is_human_readable() {
            serializer.serialize_str(&BASE64.encode(self.0))
        } else {
            serializer.serialize_bytes(&self.0)
        }
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bytes = if deserializer.is_human_readable() {
            let s = String::deserialize(deserializer)?;
            BASE64.decode(&s).map_err(serde::de::Error::custom)?
        } else {
            <Vec<u8>>::deserialize(deserializer)?
        };
        Self::from_bytes(&bytes)
            .ok_or_else(|| serde::de::Error::invalid_length(bytes.len(), &"32 bytes"))
    }
}

// ============================================
// IdentityKeyPair
// ============================================

/// The node's long-term Curve25519 identity.
///
/// # Purpose
/// One keypair per device identity. The private scalar stays inside
/// the engine for its whole life; peers learn only the public point.
///
/// # Security
/// - Private scalar is zeroed on drop
/// - `clear()` zeroizes the storage in place before anything else can
///   observe it - constrained hardware reuses memory, so dropping the
///   reference is not enough
/// - A cleared keypair (all-zero private storage) is unusable and
///   must be regenerated or restored before key agreement
///
/// # Example
/// ```
/// use skylark_core::crypto::keys::IdentityKeyPair;
///
/// let alice = IdentityKeyPair::generate();
/// let bob = IdentityKeyPair::generate();
///
/// // Both sides derive the same shared secret
/// let ab = alice.diffie_hellman(&bob.public_key());
/// let ba = bob.diffie_hellman(&alice.public_key());
/// assert_eq!(ab, ba);
/// ```
#[derive(Clone, Zeroize)]
pub struct IdentityKeyPair {
    /// Curve25519 private scalar
    private: [u8; X25519_PRIVATE_KEY_SIZE],
    /// Corresponding public point
    public: [u8; X25519_PUBLIC_KEY_SIZE],
}

// Manual Drop so the private scalar is scrubbed even when the pair is
// moved out of the engine.
impl Drop for IdentityKeyPair {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl IdentityKeyPair {
    /// Generates a new random identity keypair.
    ///
    /// Uses the operating system's secure random number generator and
    /// is never deterministic across calls.
    #[must_use]
    pub fn generate() -> Self {
        let secret = StaticSecret::random_from_rng(OsRng);
        let public = X25519PublicKey::from(&secret);
        Self {
            private: secret.to_bytes(),
            public: public.to_bytes(),
        }
    }

    /// Creates a cleared (all-zero, unusable) keypair.
    ///
    /// This is the state before `generate` or `from_private_bytes` has
    /// run, and after `clear`.
    #[must_use]
    pub const fn cleared() -> Self {
        Self {
            private: [0u8; X25519_PRIVATE_KEY_SIZE],
            public: [0u8; X25519_PUBLIC_KEY_SIZE],
        }
    }

    /// Restores an identity from a persisted private scalar.
    ///
    /// The public point is recomputed, so the caller only ever stores
    /// one secret.
    #[must_use]
    pub fn from_private_bytes(mut bytes: [u8; X25519_PRIVATE_KEY_SIZE]) -> Self {
        let secret = StaticSecret::from(bytes);
        let public = X25519PublicKey::from(&secret);
        bytes.zeroize();
        Self {
            private: secret.to_bytes(),
            public: public.to_bytes(),
        }
    }

    /// Returns the public half of the identity.
    #[must_use]
    pub const fn public_key(&self) -> PublicKey {
        PublicKey(self.public)
    }

    /// Performs X25519 key agreement with a peer's public key.
    ///
    /// Returns the raw 32-byte shared secret. Callers are expected to
    /// pass it through the key-derivation step rather than using it
    /// directly.
    #[must_use]
    pub fn diffie_hellman(&self, peer: &PublicKey) -> [u8; 32] {
        x25519_dalek::x25519(self.private, peer.to_bytes())
    }

    /// Zeroizes the private scalar (and public point) in place.
    ///
    /// Observable afterwards via [`Self::is_cleared`]; the storage is
    /// really all-zero, not merely dropped.
    pub fn clear(&mut self) {
        self.private.zeroize();
        self.public.zeroize();
    }

    /// Returns `true` if the private storage is all-zero.
    #[must_use]
    pub fn is_cleared(&self) -> bool {
        self.private.iter().all(|&b| b == 0)
    }
}

impl fmt::Debug for IdentityKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print private key material
        f.debug_struct("IdentityKeyPair")
            .field("public", &self.public_key())
            .field("cleared", &self.is_cleared())
            .finish_non_exhaustive()
    }
}

// ============================================
// SessionKey
// ============================================

/// Symmetric key derived once per peer via key agreement.
///
/// # Derivation
/// ```text
/// shared_secret = X25519(local_private, peer_public)
/// session_key   = SHA-256(shared_secret)
/// ```
///
/// # Security
/// - Zeroed on drop
/// - Never logged or serialized
/// - Constant-time comparison
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SessionKey([u8; SESSION_KEY_SIZE]);

impl SessionKey {
    /// Creates a session key from raw derived bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; SESSION_KEY_SIZE]) -> Self {
        Self(bytes)
    }

    /// Returns the raw key bytes.
    ///
    /// # Security Warning
    /// Handle the returned reference carefully. Do not log or store
    /// the key material in unprotected storage.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; SESSION_KEY_SIZE] {
        &self.0
    }
}

impl fmt::Debug for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print key material
        write!(f, "SessionKey([REDACTED])")
    }
}

// Constant-time equality comparison
impl PartialEq for SessionKey {
    fn eq(&self, other: &Self) -> bool {
        self.0.ct_eq(&other.0).into()
    }
}

impl Eq for SessionKey {}

// ============================================
// Tests
// ============================================
