// ============================================
// File: crates/skylark-core/src/lib.rs
// ============================================
//! # Skylark Core - Packet Cryptography Library
//!
//! ## Creation Reason
//! Provides the packet-level cryptographic engine for the Skylark mesh
//! node. This crate is the security backbone of the node: it turns an
//! outgoing payload into ciphertext and an incoming ciphertext back
//! into plaintext, and it owns the node's long-term identity keypair.
//!
//! ## Main Functionality
//!
//! ### Crypto Module ([`crypto`])
//! - Key types (`SymmetricKey`, `IdentityKeyPair`, `SessionKey`)
//! - Per-packet nonce construction ([`crypto::nonce`])
//! - AES counter-mode transform ([`crypto::cipher`])
//! - Curve25519 key agreement with per-peer caching ([`crypto::agreement`])
//! - The [`crypto::engine::CryptoEngine`] façade tying it all together
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │         node firmware (router, radio, apps)         │
//! │                        │                            │
//! │                        ▼                            │
//! │                  skylark-core  ◄── You are here     │
//! │                        │                            │
//! │                        ▼                            │
//! │                skylark-common                       │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! ## Security Guarantees
//! - **Confidentiality**: AES-CTR with a per-packet nonce derived from
//!   packet metadata, so the nonce never repeats under one key and
//!   never travels on the wire
//! - **Key agreement**: X25519 with SHA-256 key derivation, symmetric
//!   on both ends of a peer pair
//! - **Fail-closed**: invalid key material refuses every transform
//!
//! This layer deliberately performs **no integrity check**: a bit-flip
//! in ciphertext surfaces as garbled plaintext to the consumer, which
//! is a documented property of the wire format, not a defect.
//!
//! ## ⚠️ Important Note for Next Developer
//! - ALL cryptographic code uses audited RustCrypto/dalek implementations
//! - NEVER implement custom crypto primitives
//! - ALL keys MUST implement Zeroize for secure cleanup
//! - Nonce construction is part of the wire contract; changing it
//!   breaks interoperability with every deployed node
//!
//! ## Last Modified
//! v0.1.0 - Initial implementation

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod crypto;
pub mod error;

// Re-export commonly used items
pub use crypto::{
    agreement::{KeyAgreement, NodeDirectory},
    cipher::{BlockCipher, SoftwareAes},
    engine::{CryptoEngine, SharedCryptoEngine},
    keys::{IdentityKeyPair, PublicKey, SessionKey, SymmetricKey},
    nonce::PacketNonce,
};
pub use error::{CryptoError, Result};
