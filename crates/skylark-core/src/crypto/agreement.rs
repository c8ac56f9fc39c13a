// ============================================
// File: crates/skylark-core/src/crypto/agreement.rs
// ============================================
//! # Curve25519 Key Agreement
//!
//! ## Creation Reason
//! Provides the per-peer encryption path: instead of a shared channel
//! key, traffic to a specific peer is protected by a symmetric key
//! derived from X25519 key agreement between the two node identities.
//!
//! ## Main Functionality
//! - `NodeDirectory`: Collaborator trait - the node database exposes
//!   peers' known public keys through it (read-only from here)
//! - `KeyAgreement`: Owns the local identity keypair and the per-peer
//!   session-key cache
//! - `derive_shared_key`: X25519 then SHA-256 (the KDF step)
//!
//! ## Key Derivation
//! ```text
//! shared_secret = X25519(local_private, peer_public)
//! session_key   = SHA-256(shared_secret)
//! ```
//! Both ends compute the same key: X25519(a, B) == X25519(b, A).
//!
//! ## Cache Discipline
//! One entry per peer node id, created lazily on first agreement. An
//! entry is valid only while neither the local identity nor the
//! peer's directory entry has changed since derivation; either change
//! replaces it. There is no time-based expiry.
//!
//! ## ⚠️ Important Note for Next Developer
//! - A missing peer key means the exchange CANNOT be secured - the
//!   caller must never fall back to cleartext on that failure
//! - Raw shared secrets are zeroized immediately after the KDF step
//!
//! ## Last Modified
//! v0.1.0 - Initial key agreement implementation

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, trace};
use zeroize::Zeroize;

use skylark_common::NodeId;

use crate::crypto::hash::sha256_digest;
use crate::crypto::keys::{IdentityKeyPair, PublicKey, SessionKey};
use crate::error::{CryptoError, Result};

// ============================================
// NodeDirectory Trait
// ============================================

/// Read-only view of the node database's public-key knowledge.
///
/// # Purpose
/// The node database (an external collaborator) learns peers' public
/// keys from their node-info packets. This trait is the only window
/// the crypto core has into it; the core never writes back.
pub trait NodeDirectory: Send + Sync {
    /// Returns the known public key for `node`, if any.
    fn lookup_public_key(&self, node: NodeId) -> Option<PublicKey>;
}

// ============================================
// Key Derivation
// ============================================

/// Derives the per-peer session key from the local identity and a
/// peer's public key.
///
/// The raw X25519 output is hashed so the session key is uniformly
/// distributed and the raw curve point never leaves this function;
/// the intermediate secret is zeroized before returning.
#[must_use]
pub fn derive_shared_key(identity: &IdentityKeyPair, peer: &PublicKey) -> SessionKey {
    let mut shared_secret = identity.diffie_hellman(peer);
    let key = sha256_digest(&shared_secret);
    shared_secret.zeroize();
    SessionKey::from_bytes(key)
}

// ============================================
// KeyAgreement
// ============================================

/// A session key together with the peer public key it was derived
/// from, so a directory change is detectable.
struct CachedPeerKey {
    derived_from: PublicKey,
    session: SessionKey,
}

/// Owns the local identity keypair and the per-peer session-key cache.
///
/// # Ownership
/// Exactly one `KeyAgreement` lives inside the engine; the identity
/// keypair never leaves it except through the public-key accessor.
pub struct KeyAgreement {
    /// The node's long-term identity (cleared until generated/restored)
    identity: IdentityKeyPair,
    /// Window into the node database's public-key knowledge
    directory: Arc<dyn NodeDirectory>,
    /// Lazily filled per-peer session keys
    cache: HashMap<NodeId, CachedPeerKey>,
}

impl KeyAgreement {
    /// Creates a key-agreement context with a cleared identity.
    ///
    /// The firmware either restores a persisted identity via
    /// [`Self::set_private_key`] or creates a fresh one via
    /// [`Self::generate_keypair`] before any peer traffic flows.
    #[must_use]
    pub fn new(directory: Arc<dyn NodeDirectory>) -> Self {
        Self {
            identity: IdentityKeyPair::cleared(),
            directory,
            cache: HashMap::new(),
        }
    }

    /// Generates a fresh identity keypair from OS randomness.
    ///
    /// Every cached session key was derived under the old identity,
    /// so the cache is emptied.
    pub fn generate_keypair(&mut self) -> PublicKey {
        self.identity = IdentityKeyPair::generate();
        self.cache.clear();
        let public = self.identity.public_key();
        debug!(%public, "generated new identity keypair");
        public
    }

    /// Restores a persisted identity private scalar, recomputing the
    /// public point. Empties the session-key cache.
    pub fn set_private_key(&mut self, private: [u8; 32]) -> PublicKey {
        self.identity = IdentityKeyPair::from_private_bytes(private);
        self.cache.clear();
        let public = self.identity.public_key();
        debug!(%public, "restored identity keypair");
        public
    }

    /// Zeroizes the identity private storage in place and empties the
    /// session-key cache.
    pub fn clear(&mut self) {
        self.identity.clear();
        self.cache.clear();
        debug!("cleared identity keypair and session-key cache");
    }

    /// Returns the identity public key.
    #[must_use]
    pub const fn public_key(&self) -> PublicKey {
        self.identity.public_key()
    }

    /// Returns `true` while no usable identity is installed.
    #[must_use]
    pub fn is_cleared(&self) -> bool {
        self.identity.is_cleared()
    }

    /// Resolves the session key for `node`, deriving and caching it on
    /// first use.
    ///
    /// A cached entry is reused only if the directory still reports
    /// the public key it was derived from; otherwise the entry is
    /// replaced with a fresh derivation.
    ///
    /// # Errors
    /// - `InvalidKey` if the local identity is cleared
    /// - `MissingPeerKey` if the directory has no key for `node`
    pub fn resolve_peer_key(&mut self, node: NodeId) -> Result<SessionKey> {
        if self.identity.is_cleared() {
            return Err(CryptoError::InvalidKey);
        }

        let current = self
            .directory
            .lookup_public_key(node)
            .ok_or(CryptoError::MissingPeerKey { node })?;

        if let Some(entry) = self.cache.get(&node) {
            if entry.derived_from == current {
                trace!(%node, "session key cache hit");
                return Ok(entry.session.clone());
            }
            debug!(%node, "peer public key changed; rederiving session key");
        }

        let session = derive_shared_key(&self.identity, &current);
        self.cache.insert(
            node,
            CachedPeerKey {
                derived_from: current,
                session: session.clone(),
            },
        );
        debug!(%node, "derived and cached session key");
        Ok(session)
    }
}

impl std::fmt::Debug for KeyAgreement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyAgreement")
            .field("identity", &self.identity)
            .field("cached_peers", &self.cache.len())
            .finish_non_exhaustive()
    }
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    /// In-memory directory the tests can mutate mid-run.
    #[derive(Default)]
    struct TestDirectory {
        keys: Mutex<HashMap<NodeId, PublicKey>>,
    }

    impl TestDirectory {
        fn insert(&self, node: NodeId, key: PublicKey) {
            self.keys.lock().insert(node, key);
        }
    }

    impl NodeDirectory for TestDirectory {
        fn lookup_public_key(&self, node: NodeId) -> Option<PublicKey> {
            self.keys.lock().get(&node).copied()
        }
    }

    fn agreement_with_directory() -> (KeyAgreement, Arc<TestDirectory>) {
        let directory = Arc::new(TestDirectory::default());
        let mut agreement = KeyAgreement::new(directory.clone());
        agreement.generate_keypair();
        (agreement, directory)
    }

    #[test]
    fn test_missing_peer_key() {
        let (mut agreement, _directory) = agreement_with_directory();
        let node = NodeId::new(99);
        assert_eq!(
            agreement.resolve_peer_key(node).unwrap_err(),
            CryptoError::MissingPeerKey { node }
        );
    }

    #[test]
    fn test_cleared_identity_refuses_agreement() {
        let directory = Arc::new(TestDirectory::default());
        let node = NodeId::new(7);
        directory.insert(node, IdentityKeyPair::generate().public_key());

        let mut agreement = KeyAgreement::new(directory);
        assert_eq!(
            agreement.resolve_peer_key(node).unwrap_err(),
            CryptoError::InvalidKey
        );
    }

    #[test]
    fn test_resolve_caches_stable_key() {
        let (mut agreement, directory) = agreement_with_directory();
        let node = NodeId::new(7);
        directory.insert(node, IdentityKeyPair::generate().public_key());

        let first = agreement.resolve_peer_key(node).unwrap();
        let second = agreement.resolve_peer_key(node).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_peer_key_change_invalidates_cache() {
        let (mut agreement, directory) = agreement_with_directory();
        let node = NodeId::new(7);

        directory.insert(node, IdentityKeyPair::generate().public_key());
        let before = agreement.resolve_peer_key(node).unwrap();

        // The peer re-announces with a different identity
        directory.insert(node, IdentityKeyPair::generate().public_key());
        let after = agreement.resolve_peer_key(node).unwrap();

        assert_ne!(before, after);
    }

    #[test]
    fn test_local_regeneration_invalidates_cache() {
        let (mut agreement, directory) = agreement_with_directory();
        let node = NodeId::new(7);
        directory.insert(node, IdentityKeyPair::generate().public_key());

        let before = agreement.resolve_peer_key(node).unwrap();
        agreement.generate_keypair();
        let after = agreement.resolve_peer_key(node).unwrap();

        assert_ne!(before, after);
    }

    #[test]
    fn test_derived_keys_are_symmetric() {
        let alice = IdentityKeyPair::generate();
        let bob = IdentityKeyPair::generate();

        let ab = derive_shared_key(&alice, &bob.public_key());
        let ba = derive_shared_key(&bob, &alice.public_key());
        assert_eq!(ab, ba);
    }

    #[test]
    fn test_both_ends_resolve_same_session_key() {
        let directory_a = Arc::new(TestDirectory::default());
        let directory_b = Arc::new(TestDirectory::default());

        let mut alice = KeyAgreement::new(directory_a.clone());
        let mut bob = KeyAgreement::new(directory_b.clone());
        let alice_pub = alice.generate_keypair();
        let bob_pub = bob.generate_keypair();

        let alice_id = NodeId::new(1);
        let bob_id = NodeId::new(2);
        directory_a.insert(bob_id, bob_pub);
        directory_b.insert(alice_id, alice_pub);

        let key_at_alice = alice.resolve_peer_key(bob_id).unwrap();
        let key_at_bob = bob.resolve_peer_key(alice_id).unwrap();
        assert_eq!(key_at_alice, key_at_bob);
    }

    #[test]
    fn test_clear_empties_cache_and_identity() {
        let (mut agreement, directory) = agreement_with_directory();
        let node = NodeId::new(7);
        directory.insert(node, IdentityKeyPair::generate().public_key());
        agreement.resolve_peer_key(node).unwrap();

        agreement.clear();
        assert!(agreement.is_cleared());
        assert_eq!(agreement.cache.len(), 0);
        assert_eq!(agreement.public_key().to_bytes(), [0u8; 32]);
    }
}
