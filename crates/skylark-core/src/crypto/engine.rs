// ============================================
// File: crates/skylark-core/src/crypto/engine.rs
// ============================================
//! # Crypto Engine Façade
//!
//! ## Creation Reason
//! The one entry point the rest of the node calls. The router hands it
//! `(sending node, packet id, payload)` before transmission and after
//! reception; the engine selects the active key material, builds the
//! nonce, and drives the counter-mode transform in place.
//!
//! ## Main Functionality
//! - `CryptoEngine`: Owned context holding the channel key, the block
//!   cipher, and the key-agreement state
//! - `SharedCryptoEngine`: The process-wide, mutex-guarded handle
//!   serving the radio-receive and application-send paths
//!
//! ## Operation Flow
//! ```text
//! Channel path                       Peer (PKI) path
//! ─────────────                      ───────────────
//! encrypt/decrypt                    encrypt_curve25519 /
//!   │                                decrypt_curve25519
//!   ├─ size check (≤ 256)              ├─ size check (≤ 256)
//!   ├─ Cleartext? ──► no-op            ├─ resolve peer session key
//!   ├─ Invalid?  ──► refuse            │  (MissingPeerKey on miss)
//!   ├─ build channel nonce             ├─ build peer nonce
//!   └─ AES-CTR in place                └─ AES-CTR in place
//! ```
//!
//! Encryption and decryption are the same XOR transform, so both
//! directions share one code path.
//!
//! ## ⚠️ Important Note for Next Developer
//! - Every failure leaves the caller's buffer untouched
//! - An `InvalidKey` or `MissingPeerKey` result means DO NOT TRANSMIT;
//!   nothing here ever silently downgrades to cleartext
//! - This layer has no integrity check by design; a failed PKI decrypt
//!   means "could not be read", not "corrupted"
//!
//! ## Last Modified
//! v0.1.0 - Initial engine implementation

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, trace, warn};

use skylark_common::{NodeId, PacketId};

use crate::crypto::agreement::{KeyAgreement, NodeDirectory};
use crate::crypto::cipher::{ctr_transform, BlockCipher, SoftwareAes};
use crate::crypto::hash::sha256_digest;
use crate::crypto::keys::{PublicKey, SessionKey, SymmetricKey};
use crate::crypto::nonce::PacketNonce;
use crate::error::{CryptoError, Result};

use super::{MAX_TRANSFORM_SIZE, SHA256_DIGEST_SIZE};

// ============================================
// CryptoEngine
// ============================================

/// The packet cryptography engine.
///
/// Holds all mutable crypto state for one node: the active channel
/// key, the configured block cipher, the identity keypair, and the
/// per-peer session-key cache. The engine borrows each packet buffer
/// exclusively for the duration of one call and retains nothing.
///
/// State machine: behavior depends only on the active
/// [`SymmetricKey`] variant, never on call sequence - there is no
/// handshake state on the channel path.
pub struct CryptoEngine {
    /// The pre-shared channel key (starts as `Cleartext`)
    channel_key: SymmetricKey,
    /// Block cipher capability, selected once at construction
    cipher: Box<dyn BlockCipher>,
    /// Identity keypair + per-peer session keys
    agreement: KeyAgreement,
}

impl CryptoEngine {
    /// Creates an engine with the default software AES implementation.
    #[must_use]
    pub fn new(directory: Arc<dyn NodeDirectory>) -> Self {
        Self::with_cipher(directory, Box::new(SoftwareAes::new()))
    }

    /// Creates an engine with a caller-selected cipher implementation
    /// (e.g. a platform crypto peripheral). Selected once here, never
    /// per call.
    #[must_use]
    pub fn with_cipher(directory: Arc<dyn NodeDirectory>, cipher: Box<dyn BlockCipher>) -> Self {
        Self {
            channel_key: SymmetricKey::Cleartext,
            cipher,
            agreement: KeyAgreement::new(directory),
        }
    }

    // ========================================
    // Channel key management
    // ========================================

    /// Installs a new channel key.
    ///
    /// Raw material is classified by [`SymmetricKey::from_bytes`]:
    /// empty or all-zero means "transmit unencrypted", disallowed
    /// lengths become the `Invalid` sentinel. With `Invalid` active,
    /// every transform fails closed until a valid key replaces it.
    pub fn set_key(&mut self, key: SymmetricKey) {
        if self.cipher.configure(&key).is_err() {
            warn!("invalid channel key installed; transforms will fail closed");
        } else {
            debug!(variant = key.variant_name(), "channel key installed");
        }
        self.channel_key = key;
    }

    // ========================================
    // Channel path
    // ========================================

    /// Encrypts a packet buffer in place under the channel key.
    ///
    /// With a `Cleartext` key this is a successful no-op - the
    /// documented all-zero-key convention meaning "transmit
    /// unencrypted".
    ///
    /// # Errors
    /// - `BufferTooLarge` if `buf` exceeds 256 bytes (checked first,
    ///   before any mutation)
    /// - `InvalidKey` if the invalid sentinel is active - the caller
    ///   must not transmit
    pub fn encrypt(&mut self, from_node: NodeId, packet_id: PacketId, buf: &mut [u8]) -> Result<()> {
        self.transform_channel(from_node, packet_id, buf)
    }

    /// Decrypts a packet buffer in place under the channel key.
    ///
    /// The counter-mode transform is self-inverse, so this is the
    /// identical operation to [`Self::encrypt`] with the same key
    /// policy. No integrity verification is performed.
    ///
    /// # Errors
    /// Same conditions as [`Self::encrypt`].
    pub fn decrypt(&mut self, from_node: NodeId, packet_id: PacketId, buf: &mut [u8]) -> Result<()> {
        self.transform_channel(from_node, packet_id, buf)
    }

    fn transform_channel(
        &mut self,
        from_node: NodeId,
        packet_id: PacketId,
        buf: &mut [u8],
    ) -> Result<()> {
        check_transform_size(buf)?;

        match &self.channel_key {
            SymmetricKey::Cleartext => {
                trace!(%from_node, %packet_id, "cleartext channel; buffer passed through");
                Ok(())
            }
            SymmetricKey::Invalid => {
                warn!(%from_node, %packet_id, "transform refused: invalid channel key");
                Err(CryptoError::InvalidKey)
            }
            SymmetricKey::Aes128(_) | SymmetricKey::Aes256(_) => {
                let nonce = PacketNonce::for_channel(from_node, packet_id);
                ctr_transform(self.cipher.as_mut(), nonce, buf)
            }
        }
    }

    // ========================================
    // Peer (PKI) path
    // ========================================

    /// Encrypts a buffer in place for a specific peer.
    ///
    /// Resolves `to_node`'s session key via key agreement, builds the
    /// peer nonce from the **local** node id and the PKI packet
    /// counter, and applies the same counter-mode transform as the
    /// channel path.
    ///
    /// # Errors
    /// - `BufferTooLarge` before any mutation
    /// - `MissingPeerKey` if `to_node` has no directory entry - the
    ///   exchange cannot be secured and must not be sent
    /// - `InvalidKey` if the local identity is cleared
    pub fn encrypt_curve25519(
        &mut self,
        to_node: NodeId,
        from_node: NodeId,
        packet_num: u64,
        buf: &mut [u8],
    ) -> Result<()> {
        check_transform_size(buf)?;
        let session = self.agreement.resolve_peer_key(to_node)?;
        self.transform_peer(&session, from_node, packet_num, buf)
    }

    /// Decrypts a buffer in place that a specific peer sent us.
    ///
    /// Resolves the **sender**'s session key; the nonce is built from
    /// the same sender id, so both ends derive identical keystream.
    /// A failure means the packet could not be read - with no
    /// integrity tag, "garbled" and "not for us" are indistinguishable
    /// at this layer.
    ///
    /// # Errors
    /// Same conditions as [`Self::encrypt_curve25519`], with
    /// `MissingPeerKey` naming `from_node`.
    pub fn decrypt_curve25519(
        &mut self,
        from_node: NodeId,
        packet_num: u64,
        buf: &mut [u8],
    ) -> Result<()> {
        check_transform_size(buf)?;
        let session = self.agreement.resolve_peer_key(from_node)?;
        self.transform_peer(&session, from_node, packet_num, buf)
    }

    fn transform_peer(
        &mut self,
        session: &SessionKey,
        sending_node: NodeId,
        packet_num: u64,
        buf: &mut [u8],
    ) -> Result<()> {
        // Session keys are always 32-byte AES-256 material; build the
        // variant directly so a (vanishingly improbable) all-zero
        // derived key cannot be misread as the cleartext convention.
        let session_key = SymmetricKey::Aes256(*session.as_bytes());
        self.cipher.configure(&session_key)?;

        let nonce = PacketNonce::for_peer(sending_node, packet_num);
        let result = ctr_transform(self.cipher.as_mut(), nonce, buf);

        // Put the channel key back so the next channel-path call finds
        // the cipher configured with the material it expects. An
        // invalid channel key stays deconfigured, which is the
        // fail-closed state the channel path enforces anyway.
        let _ = self.cipher.configure(&self.channel_key);
        result
    }

    /// Resolves and caches the session key for `node` ahead of time.
    ///
    /// Prewarming keeps the scalar multiplication out of the packet
    /// hot path.
    ///
    /// # Errors
    /// - `MissingPeerKey` if the peer's public key is unknown
    /// - `InvalidKey` if the local identity is cleared
    pub fn set_dh_key(&mut self, node: NodeId) -> Result<()> {
        self.agreement.resolve_peer_key(node).map(|_| ())
    }

    // ========================================
    // Identity management
    // ========================================

    /// Generates a fresh identity keypair, invalidating every cached
    /// session key. Returns the new public key for the node database
    /// to announce.
    pub fn generate_keypair(&mut self) -> PublicKey {
        self.agreement.generate_keypair()
    }

    /// Restores a persisted identity private scalar (the node database
    /// reloads it at boot); the public point is recomputed.
    pub fn set_private_key(&mut self, private: [u8; 32]) -> PublicKey {
        self.agreement.set_private_key(private)
    }

    /// Zeroizes the identity private-key storage in place and empties
    /// the session-key cache.
    ///
    /// The storage is really scrubbed, not merely dropped - reused
    /// memory on constrained hardware must never hold residual
    /// secrets. Observable via [`Self::identity_is_cleared`].
    pub fn clear_keys(&mut self) {
        self.agreement.clear();
    }

    /// Returns the identity public key (all-zero while cleared).
    #[must_use]
    pub const fn public_key(&self) -> PublicKey {
        self.agreement.public_key()
    }

    /// Returns `true` while the identity private storage is all-zero.
    #[must_use]
    pub fn identity_is_cleared(&self) -> bool {
        self.agreement.is_cleared()
    }

    // ========================================
    // Digest
    // ========================================

    /// Computes the SHA-256 digest of `bytes`.
    ///
    /// Exposed for subsystems that need a one-way hash (packet dedup,
    /// channel name hashing) without pulling in the hash module.
    #[must_use]
    pub fn hash(&self, bytes: &[u8]) -> [u8; SHA256_DIGEST_SIZE] {
        sha256_digest(bytes)
    }
}

impl std::fmt::Debug for CryptoEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CryptoEngine")
            .field("channel_key", &self.channel_key)
            .field("agreement", &self.agreement)
            .finish_non_exhaustive()
    }
}

/// Rejects oversized buffers before anything is touched.
fn check_transform_size(buf: &[u8]) -> Result<()> {
    if buf.len() > MAX_TRANSFORM_SIZE {
        return Err(CryptoError::BufferTooLarge {
            len: buf.len(),
            max: MAX_TRANSFORM_SIZE,
        });
    }
    Ok(())
}

// ============================================
// SharedCryptoEngine
// ============================================

/// Cheaply clonable, mutex-guarded handle to the one engine instance
/// per device.
///
/// The radio-receive path and the application-send path each hold a
/// clone; every operation acquires the lock for the full duration of
/// the call and the guard releases it on every exit path, including
/// error returns. No operation suspends or blocks on I/O - each call
/// is a bounded synchronous computation - so holding the lock for the
/// whole call is an accepted trade-off, not a scalability concern.
#[derive(Clone)]
pub struct SharedCryptoEngine {
    inner: Arc<Mutex<CryptoEngine>>,
}

impl SharedCryptoEngine {
    /// Wraps an engine for shared use.
    #[must_use]
    pub fn new(engine: CryptoEngine) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    /// See [`CryptoEngine::set_key`].
    pub fn set_key(&self, key: SymmetricKey) {
        self.inner.lock().set_key(key);
    }

    /// See [`CryptoEngine::encrypt`].
    ///
    /// # Errors
    /// Same conditions as [`CryptoEngine::encrypt`].
    pub fn encrypt(&self, from_node: NodeId, packet_id: PacketId, buf: &mut [u8]) -> Result<()> {
        self.inner.lock().encrypt(from_node, packet_id, buf)
    }

    /// See [`CryptoEngine::decrypt`].
    ///
    /// # Errors
    /// Same conditions as [`CryptoEngine::decrypt`].
    pub fn decrypt(&self, from_node: NodeId, packet_id: PacketId, buf: &mut [u8]) -> Result<()> {
        self.inner.lock().decrypt(from_node, packet_id, buf)
    }

    /// See [`CryptoEngine::encrypt_curve25519`].
    ///
    /// # Errors
    /// Same conditions as [`CryptoEngine::encrypt_curve25519`].
    pub fn encrypt_curve25519(
        &self,
        to_node: NodeId,
        from_node: NodeId,
        packet_num: u64,
        buf: &mut [u8],
    ) -> Result<()> {
        self.inner
            .lock()
            .encrypt_curve25519(to_node, from_node, packet_num, buf)
    }

    /// See [`CryptoEngine::decrypt_curve25519`].
    ///
    /// # Errors
    /// Same conditions as [`CryptoEngine::decrypt_curve25519`].
    pub fn decrypt_curve25519(
        &self,
        from_node: NodeId,
        packet_num: u64,
        buf: &mut [u8],
    ) -> Result<()> {
        self.inner.lock().decrypt_curve25519(from_node, packet_num, buf)
    }

    /// See [`CryptoEngine::set_dh_key`].
    ///
    /// # Errors
    /// Same conditions as [`CryptoEngine::set_dh_key`].
    pub fn set_dh_key(&self, node: NodeId) -> Result<()> {
        self.inner.lock().set_dh_key(node)
    }

    /// See [`CryptoEngine::generate_keypair`].
    pub fn generate_keypair(&self) -> PublicKey {
        self.inner.lock().generate_keypair()
    }

    /// See [`CryptoEngine::set_private_key`].
    pub fn set_private_key(&self, private: [u8; 32]) -> PublicKey {
        self.inner.lock().set_private_key(private)
    }

    /// See [`CryptoEngine::clear_keys`].
    pub fn clear_keys(&self) {
        self.inner.lock().clear_keys();
    }

    /// See [`CryptoEngine::public_key`].
    #[must_use]
    pub fn public_key(&self) -> PublicKey {
        self.inner.lock().public_key()
    }

    /// See [`CryptoEngine::identity_is_cleared`].
    #[must_use]
    pub fn identity_is_cleared(&self) -> bool {
        self.inner.lock().identity_is_cleared()
    }

    /// See [`CryptoEngine::hash`].
    #[must_use]
    pub fn hash(&self, bytes: &[u8]) -> [u8; SHA256_DIGEST_SIZE] {
        self.inner.lock().hash(bytes)
    }
}

impl std::fmt::Debug for SharedCryptoEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SharedCryptoEngine")
    }
}

// ============================================
// Tests
// ============================================
