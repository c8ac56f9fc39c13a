// ============================================
// File: crates/skylark-core/src/crypto/mod.rs
// ============================================
//! # Cryptography Module
//!
//! ## Creation Reason
//! Centralizes all cryptographic operations for the Skylark mesh node,
//! using audited RustCrypto and dalek implementations.
//!
//! ## Main Functionality
//!
//! ### Submodules
//! - [`keys`]: Key types (channel key, identity keypair, session key)
//! - [`nonce`]: Deterministic per-packet nonce construction
//! - [`cipher`]: AES block cipher adapter and counter-mode transform
//! - [`agreement`]: X25519 key agreement with per-peer caching
//! - [`hash`]: SHA-256 digest (also the key-derivation step)
//! - [`engine`]: The `CryptoEngine` façade - the only entry point
//!   other subsystems call
//!
//! ## Cryptographic Design
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Channel path                             │
//! │                                                             │
//! │  (from_node, packet_id) ──► PacketNonce                     │
//! │  PacketNonce + channel key ──► AES-CTR keystream            │
//! │  keystream XOR buffer (in place, self-inverse)              │
//! └─────────────────────────────────────────────────────────────┘
//!
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Peer (PKI) path                          │
//! │                                                             │
//! │  X25519(local priv, peer pub) ──► SHA-256 ──► SessionKey    │
//! │  (cached per peer until either identity changes)            │
//! │  then the same AES-CTR transform as the channel path        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - NEVER roll your own crypto primitives
//! - The nonce layout is a wire-compatibility contract
//! - A (key, nonce) pair must never repeat - the packet id discipline
//!   enforced by the router is what guarantees this
//!
//! ## Last Modified
//! v0.1.0 - Initial crypto implementation

pub mod agreement;
pub mod cipher;
pub mod engine;
pub mod hash;
pub mod keys;
pub mod nonce;

// Re-export primary types at module level
pub use agreement::{KeyAgreement, NodeDirectory};
pub use cipher::{BlockCipher, SoftwareAes};
pub use engine::{CryptoEngine, SharedCryptoEngine};
pub use keys::{IdentityKeyPair, PublicKey, SessionKey, SymmetricKey};
pub use nonce::PacketNonce;

// ============================================
// Constants
// ============================================

/// Size of an AES-128 key in bytes.
pub const AES128_KEY_SIZE: usize = 16;

/// Size of an AES-256 key in bytes.
pub const AES256_KEY_SIZE: usize = 32;

/// Size of one AES block (and one keystream block) in bytes.
pub const AES_BLOCK_SIZE: usize = 16;

/// Size of the per-packet nonce in bytes.
pub const NONCE_SIZE: usize = 16;

/// Size of a Curve25519 public key in bytes.
pub const X25519_PUBLIC_KEY_SIZE: usize = 32;

/// Size of a Curve25519 private scalar in bytes.
pub const X25519_PRIVATE_KEY_SIZE: usize = 32;

/// Size of a derived session key in bytes.
pub const SESSION_KEY_SIZE: usize = 32;

/// Size of a SHA-256 digest in bytes.
pub const SHA256_DIGEST_SIZE: usize = 32;

/// Maximum number of payload bytes transformed in one call.
///
/// Larger buffers are rejected, never truncated; fragmentation is the
/// router's job.
pub const MAX_TRANSFORM_SIZE: usize = 256;
