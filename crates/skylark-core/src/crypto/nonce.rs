// ============================================
// File: crates/skylark-core/src/crypto/nonce.rs
// ============================================
//! # Per-Packet Nonce Construction
//!
//! ## Creation Reason
//! The counter-mode transform needs a 128-bit nonce that is unique per
//! packet under a given key. Both ends rebuild it deterministically
//! from metadata already in the packet header (sender id, packet id),
//! which is what keeps the nonce off the wire entirely.
//!
//! ## Nonce Layout
//! ```text
//! ┌──────────────────────┬──────────────┬──────────────────┐
//! │ bytes 0..8           │ bytes 8..12  │ bytes 12..16     │
//! │ packet id (u64 LE)   │ sender (u32  │ block counter    │
//! │                      │ LE)          │ (u32 LE, from 0) │
//! └──────────────────────┴──────────────┴──────────────────┘
//! ```
//!
//! The block counter advances once per 16-byte keystream block within
//! a single packet transform and never carries across packets.
//!
//! ## ⚠️ Important Note for Next Developer
//! - This layout is a wire-compatibility contract - changing a single
//!   byte breaks every deployed node
//! - A (key, nonce) pair must never repeat; the router's packet-id
//!   discipline is what guarantees uniqueness, this module only
//!   guarantees determinism
//!
//! ## Last Modified
//! v0.1.0 - Initial nonce construction

use skylark_common::{NodeId, PacketId};

use super::NONCE_SIZE;

// ============================================
// PacketNonce
// ============================================

/// The 128-bit nonce seeding one packet's keystream.
///
/// Rebuilt per packet, never persisted, never transmitted.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct PacketNonce([u8; NONCE_SIZE]);

impl PacketNonce {
    /// Builds the nonce for a channel-key packet.
    ///
    /// Pure function of the sending node and packet id; the block
    /// counter field starts at zero for every call.
    #[must_use]
    pub fn for_channel(sending_node: NodeId, packet_id: PacketId) -> Self {
        let mut nonce = [0u8; NONCE_SIZE];
        nonce[0..8].copy_from_slice(&packet_id.to_le_bytes());
        nonce[8..12].copy_from_slice(&sending_node.to_le_bytes());
        // nonce[12..16] is the block counter, already zero
        Self(nonce)
    }

    /// Builds the nonce for a peer-key (PKI path) packet.
    ///
    /// Same byte layout as the channel path, fed from the PKI packet
    /// counter and the **sending** node id. Uniqueness per (ordered
    /// peer pair, packet counter) holds because the session key
    /// already binds the unordered pair and the sender id in bytes
    /// 8..12 distinguishes the two directions.
    #[must_use]
    pub fn for_peer(sending_node: NodeId, packet_num: u64) -> Self {
        Self::for_channel(sending_node, PacketId::new(packet_num))
    }

    /// Returns the current block-counter field (bytes 12..16).
    #[must_use]
    pub fn block_counter(&self) -> u32 {
        u32::from_le_bytes([self.0[12], self.0[13], self.0[14], self.0[15]])
    }

    /// Advances the block counter by one.
    ///
    /// Called once per 16-byte keystream block consumed within a
    /// single packet transform. At 256 bytes per transform the counter
    /// can reach at most 16, so overflow is unreachable; the wrapping
    /// add only documents that no panic path exists here.
    pub fn advance_block(&mut self) {
        let next = self.block_counter().wrapping_add(1);
        self.0[12..16].copy_from_slice(&next.to_le_bytes());
    }

    /// Returns the raw nonce bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; NONCE_SIZE] {
        &self.0
    }

    /// Creates a nonce from raw bytes (for published test vectors only).
    #[cfg(test)]
    pub(crate) const fn from_raw(bytes: [u8; NONCE_SIZE]) -> Self {
        Self(bytes)
    }
}

impl std::fmt::Debug for PacketNonce {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PacketNonce({})", hex::encode(self.0))
    }
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_nonce_layout() {
        let nonce = PacketNonce::for_channel(
            NodeId::new(0x0403_0201),
            PacketId::new(0x0807_0605_0403_0201),
        );
        let expected: [u8; 16] = [
            0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, // packet id LE
            0x01, 0x02, 0x03, 0x04, // sender LE
            0x00, 0x00, 0x00, 0x00, // block counter
        ];
        assert_eq!(nonce.as_bytes(), &expected);
    }

    #[test]
    fn test_nonce_boundary_values() {
        let zero = PacketNonce::for_channel(NodeId::new(0), PacketId::new(0));
        assert_eq!(zero.as_bytes(), &[0u8; 16]);

        let max = PacketNonce::for_channel(NodeId::new(u32::MAX), PacketId::new(u64::MAX));
        let mut expected = [0xFFu8; 16];
        expected[12..16].copy_from_slice(&[0, 0, 0, 0]);
        assert_eq!(max.as_bytes(), &expected);
    }

    #[test]
    fn test_block_counter_starts_at_zero_and_advances() {
        let mut nonce = PacketNonce::for_channel(NodeId::new(1), PacketId::new(5));
        assert_eq!(nonce.block_counter(), 0);

        nonce.advance_block();
        assert_eq!(nonce.block_counter(), 1);
        assert_eq!(&nonce.as_bytes()[12..16], &[0x01, 0x00, 0x00, 0x00]);

        nonce.advance_block();
        assert_eq!(nonce.block_counter(), 2);

        // Only the counter field changed
        let fresh = PacketNonce::for_channel(NodeId::new(1), PacketId::new(5));
        assert_eq!(&nonce.as_bytes()[0..12], &fresh.as_bytes()[0..12]);
    }

    #[test]
    fn test_peer_nonce_matches_channel_layout() {
        let peer = PacketNonce::for_peer(NodeId::new(42), 7);
        let channel = PacketNonce::for_channel(NodeId::new(42), PacketId::new(7));
        assert_eq!(peer, channel);
    }

    #[test]
    fn test_distinct_senders_distinct_nonces() {
        let a = PacketNonce::for_peer(NodeId::new(1), 9);
        let b = PacketNonce::for_peer(NodeId::new(2), 9);
        assert_ne!(a, b);
    }
}
