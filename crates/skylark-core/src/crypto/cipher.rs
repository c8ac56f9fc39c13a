// ============================================
// File: crates/skylark-core/src/crypto/cipher.rs
// ============================================
//! # AES Block Cipher Adapter & Counter-Mode Transform
//!
//! ## Creation Reason
//! Wraps the audited RustCrypto AES block primitive behind a small
//! capability trait and drives it in counter mode over packet buffers.
//!
//! ## Main Functionality
//! - [`BlockCipher`]: Trait producing one 16-byte keystream block per
//!   invocation
//! - [`SoftwareAes`]: Default software implementation (AES-128/256)
//! - [`ctr_transform`]: In-place XOR of buffer and keystream
//!
//! ## Counter Mode
//! ```text
//! keystream[n] = AES_k(nonce with block counter = n)
//! out[i]       = in[i] XOR keystream[i / 16][i % 16]
//! ```
//! The XOR is its own inverse, so encryption and decryption are the
//! same operation and share one transform.
//!
//! ## ⚠️ Important Note for Next Developer
//! - The trait exists so platform-accelerated implementations (crypto
//!   peripherals on radio SoCs) can be selected once at engine
//!   construction - never resolved per call
//! - Keystream blocks must be consumed in strict sequential order
//!   within one packet; skipping or reordering desynchronizes ends
//!
//! ## Last Modified
//! v0.1.0 - Initial cipher adapter

use aes::cipher::{generic_array::GenericArray, BlockEncrypt, KeyInit};
use aes::{Aes128, Aes256};

use crate::crypto::keys::SymmetricKey;
use crate::crypto::nonce::PacketNonce;
use crate::error::{CryptoError, Result};

use super::AES_BLOCK_SIZE;

// ============================================
// BlockCipher Trait
// ============================================

/// Capability interface over an AES block primitive.
///
/// # Purpose
/// Abstracts keystream production to allow:
/// - Testing with deterministic fakes
/// - Hardware-accelerated implementations per platform, selected once
///   at startup configuration
pub trait BlockCipher: Send {
    /// Installs key material for subsequent keystream production.
    ///
    /// `Cleartext` deconfigures the cipher (the engine never asks a
    /// cleartext key for keystream). `Invalid` also deconfigures and
    /// fails, so a half-configured adapter can never produce
    /// keystream under stale material.
    ///
    /// # Errors
    /// - `InvalidKey` if the key is the invalid sentinel
    fn configure(&mut self, key: &SymmetricKey) -> Result<()>;

    /// Produces the 16-byte keystream block for one nonce value.
    ///
    /// # Errors
    /// - `InvalidKey` if no usable key is configured
    fn keystream_block(&mut self, nonce: &PacketNonce) -> Result<[u8; AES_BLOCK_SIZE]>;
}

// ============================================
// SoftwareAes
// ============================================

/// AES context selected by the active key variant.
enum AesContext {
    Aes128(Aes128),
    Aes256(Aes256),
}

/// Default software implementation of [`BlockCipher`].
///
/// Uses the RustCrypto `aes` crate for the block transform; this
/// module never touches the rounds itself.
#[derive(Default)]
pub struct SoftwareAes {
    context: Option<AesContext>,
}

impl SoftwareAes {
    /// Creates an unconfigured adapter. Keystream requests fail until
    /// a usable key is installed.
    #[must_use]
    pub fn new() -> Self {
        Self { context: None }
    }
}

impl BlockCipher for SoftwareAes {
    fn configure(&mut self, key: &SymmetricKey) -> Result<()> {
        self.context = match key {
            SymmetricKey::Aes128(material) => {
                Some(AesContext::Aes128(Aes128::new(GenericArray::from_slice(material))))
            }
            SymmetricKey::Aes256(material) => {
                Some(AesContext::Aes256(Aes256::new(GenericArray::from_slice(material))))
            }
            SymmetricKey::Cleartext => None,
            SymmetricKey::Invalid => {
                // Fail closed: drop whatever was configured before.
                self.context = None;
                return Err(CryptoError::InvalidKey);
            }
        };
        Ok(())
    }

    fn keystream_block(&mut self, nonce: &PacketNonce) -> Result<[u8; AES_BLOCK_SIZE]> {
        let context = self.context.as_ref().ok_or(CryptoError::InvalidKey)?;

        let mut block = GenericArray::clone_from_slice(nonce.as_bytes());
        match context {
            AesContext::Aes128(aes) => aes.encrypt_block(&mut block),
            AesContext::Aes256(aes) => aes.encrypt_block(&mut block),
        }

        let mut out = [0u8; AES_BLOCK_SIZE];
        out.copy_from_slice(&block);
        Ok(out)
    }
}

impl std::fmt::Debug for SoftwareAes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match self.context {
            Some(AesContext::Aes128(_)) => "aes128",
            Some(AesContext::Aes256(_)) => "aes256",
            None => "unconfigured",
        };
        write!(f, "SoftwareAes({state})")
    }
}

// ============================================
// Counter-Mode Transform
// ============================================

/// XORs `buf` in place with the keystream starting at `nonce`.
///
/// Requests one keystream block per 16 buffer bytes in strict
/// sequential order, advancing the nonce's block counter between
/// blocks; a partial final block XORs only the remaining bytes.
///
/// Self-inverse: applying it twice with the same key and nonce
/// restores the original buffer.
///
/// # Errors
/// - `InvalidKey` if the cipher has no usable key. The first
///   keystream request fails before any byte of `buf` is touched, so
///   the buffer is never partially transformed.
pub fn ctr_transform(
    cipher: &mut dyn BlockCipher,
    mut nonce: PacketNonce,
    buf: &mut [u8],
) -> Result<()> {
    for chunk in buf.chunks_mut(AES_BLOCK_SIZE) {
        let keystream = cipher.keystream_block(&nonce)?;
        for (byte, key_byte) in chunk.iter_mut().zip(keystream.iter()) {
            *byte ^= key_byte;
        }
        nonce.advance_block();
    }
    Ok(())
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use super::*;
    use skylark_common::{NodeId, PacketId};

    fn configured(key_bytes: &[u8]) -> SoftwareAes {
        let mut cipher = SoftwareAes::new();
        cipher.configure(&SymmetricKey::from_bytes(key_bytes)).unwrap();
        cipher
    }

    fn nonce() -> PacketNonce {
        PacketNonce::for_channel(NodeId::new(1), PacketId::new(5))
    }

    #[test]
    fn test_fips197_aes128_block_vector() {
        // FIPS-197 appendix C.1
        let key: [u8; 16] = [
            0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d,
            0x0e, 0x0f,
        ];
        let input: [u8; 16] = [
            0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99, 0xaa, 0xbb, 0xcc, 0xdd,
            0xee, 0xff,
        ];
        let expected: [u8; 16] = [
            0x69, 0xc4, 0xe0, 0xd8, 0x6a, 0x7b, 0x04, 0x30, 0xd8, 0xcd, 0xb7, 0x80, 0x70, 0xb4,
            0xc5, 0x5a,
        ];

        let mut cipher = configured(&key);
        let block = cipher.keystream_block(&PacketNonce::from_raw(input)).unwrap();
        assert_eq!(block, expected);
    }

    #[test]
    fn test_fips197_aes256_block_vector() {
        // FIPS-197 appendix C.3
        let key: [u8; 32] = [
            0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d,
            0x0e, 0x0f, 0x10, 0x11, 0x12, 0x13, 0x14, 0x15, 0x16, 0x17, 0x18, 0x19, 0x1a, 0x1b,
            0x1c, 0x1d, 0x1e, 0x1f,
        ];
        let input: [u8; 16] = [
            0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99, 0xaa, 0xbb, 0xcc, 0xdd,
            0xee, 0xff,
        ];
        let expected: [u8; 16] = [
            0x8e, 0xa2, 0xb7, 0xca, 0x51, 0x67, 0x45, 0xbf, 0xea, 0xfc, 0x49, 0x90, 0x4b, 0x49,
            0x60, 0x89,
        ];

        let mut cipher = configured(&key);
        let block = cipher.keystream_block(&PacketNonce::from_raw(input)).unwrap();
        assert_eq!(block, expected);
    }

    #[test]
    fn test_unconfigured_cipher_refuses_keystream() {
        let mut cipher = SoftwareAes::new();
        assert_eq!(
            cipher.keystream_block(&nonce()).unwrap_err(),
            CryptoError::InvalidKey
        );
    }

    #[test]
    fn test_invalid_key_fails_and_deconfigures() {
        let mut cipher = configured(&[7u8; 16]);

        let err = cipher.configure(&SymmetricKey::Invalid).unwrap_err();
        assert_eq!(err, CryptoError::InvalidKey);

        // The previously valid key must not survive the failed configure
        assert!(cipher.keystream_block(&nonce()).is_err());
    }

    #[test]
    fn test_cleartext_deconfigures_quietly() {
        let mut cipher = configured(&[7u8; 16]);
        cipher.configure(&SymmetricKey::Cleartext).unwrap();
        assert!(cipher.keystream_block(&nonce()).is_err());
    }

    #[test]
    fn test_ctr_transform_is_self_inverse() {
        let mut cipher = configured(&[0x5A; 32]);
        let original: Vec<u8> = (0..100u8).collect();

        let mut buf = original.clone();
        ctr_transform(&mut cipher, nonce(), &mut buf).unwrap();
        assert_ne!(buf, original);

        ctr_transform(&mut cipher, nonce(), &mut buf).unwrap();
        assert_eq!(buf, original);
    }

    #[test]
    fn test_block_counter_advances_between_blocks() {
        // A 32-byte buffer must not be two identical encryptions of
        // its identical 16-byte halves.
        let mut cipher = configured(&[0x11; 16]);

        let mut double = [0x41u8; 32];
        ctr_transform(&mut cipher, nonce(), &mut double).unwrap();

        let mut single = [0x41u8; 16];
        ctr_transform(&mut cipher, nonce(), &mut single).unwrap();

        assert_eq!(&double[..16], &single[..]);
        assert_ne!(&double[16..], &single[..]);
    }

    #[test]
    fn test_partial_final_block() {
        let mut cipher = configured(&[0x22; 16]);

        let mut buf = [0xA5u8; 20];
        ctr_transform(&mut cipher, nonce(), &mut buf).unwrap();

        // Round-trips even though the final block is partial
        ctr_transform(&mut cipher, nonce(), &mut buf).unwrap();
        assert_eq!(buf, [0xA5u8; 20]);
    }

    #[test]
    fn test_key_sensitivity() {
        let mut key = [0x33u8; 16];
        let mut cipher_a = configured(&key);
        key[0] ^= 0x01; // flip one bit
        let mut cipher_b = configured(&key);

        let mut buf_a = [0u8; 16];
        let mut buf_b = [0u8; 16];
        ctr_transform(&mut cipher_a, nonce(), &mut buf_a).unwrap();
        ctr_transform(&mut cipher_b, nonce(), &mut buf_b).unwrap();

        assert_ne!(buf_a, buf_b);
    }

    #[test]
    fn test_empty_buffer_is_noop() {
        let mut cipher = configured(&[0x44; 16]);
        let mut buf: [u8; 0] = [];
        ctr_transform(&mut cipher, nonce(), &mut buf).unwrap();
    }
}
