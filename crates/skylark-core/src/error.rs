// ============================================
// File: crates/skylark-core/src/error.rs
// ============================================
//! # Core Error Types
//!
//! ## Creation Reason
//! Defines the error types for the cryptographic engine. All three
//! conditions are local and recoverable by the caller; the engine
//! performs no partial mutation of the caller's buffer on failure.
//!
//! ## Main Functionality
//! - `CryptoError`: Primary error enum for engine operations
//! - `Result<T>`: Type alias using `CryptoError`
//!
//! ## Error Categories
//! 1. **InvalidKey**: fail-closed refusal while bad key material is active
//! 2. **MissingPeerKey**: key agreement with an unknown peer
//! 3. **BufferTooLarge**: transform request over the size limit
//!
//! There is deliberately no authentication-failure variant: this layer
//! performs no integrity check, so a tampered ciphertext decrypts to
//! garbage rather than to an error.
//!
//! ## ⚠️ Important Note for Next Developer
//! - NEVER include key material in error messages
//! - A `MissingPeerKey` must never be "handled" by sending cleartext
//!
//! ## Last Modified
//! v0.1.0 - Initial error definitions

use thiserror::Error;

use skylark_common::NodeId;

// ============================================
// Result Type Alias
// ============================================

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, CryptoError>;

// ============================================
// CryptoError
// ============================================

/// Error types for packet cryptography operations.
///
/// # Security Note
/// Error messages identify nodes and sizes, never key bytes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// The active key material is unusable: the channel key was
    /// configured with a disallowed length, or the identity keypair is
    /// cleared.
    ///
    /// Every transform fails closed until valid material is installed;
    /// the caller must not transmit the (unmodified) buffer.
    #[error("Invalid key material configured; refusing to transform")]
    InvalidKey,

    /// Key agreement was attempted with a peer whose public key is
    /// not in the node directory.
    ///
    /// The exchange cannot be secured. Callers must treat this as
    /// "cannot read / cannot send", never as license to fall back to
    /// cleartext.
    #[error("No public key known for peer {node}")]
    MissingPeerKey {
        /// The peer whose key is missing
        node: NodeId,
    },

    /// A transform was requested on a buffer exceeding the maximum
    /// size. Rejected before any mutation; larger payloads must be
    /// fragmented by the router, never truncated here.
    #[error("Buffer of {len} bytes exceeds the {max}-byte transform limit")]
    BufferTooLarge {
        /// Length of the rejected buffer
        len: usize,
        /// The maximum transform size
        max: usize,
    },
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_names_peer() {
        let err = CryptoError::MissingPeerKey {
            node: NodeId::new(0xdead_beef),
        };
        assert!(err.to_string().contains("!deadbeef"));
    }

    #[test]
    fn test_error_display_sizes() {
        let err = CryptoError::BufferTooLarge { len: 257, max: 256 };
        assert!(err.to_string().contains("257"));
        assert!(err.to_string().contains("256"));
    }
}
