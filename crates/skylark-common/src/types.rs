// ============================================
// File: crates/skylark-common/src/types.rs
// ============================================
//! # Core Type Definitions
//!
//! ## Creation Reason
//! Centralizes the identifier types used throughout the Skylark mesh
//! node, ensuring type safety and consistent representations between
//! the crypto core and the routing/dispatch layers.
//!
//! ## Main Functionality
//! - `NodeId`: Unique identifier of a mesh node (32 bits)
//! - `PacketId`: Per-packet identifier assigned by the sender (64 bits)
//! - Display/parse conventions and serialization implementations
//!
//! ## Main Logical Flow
//! 1. Identifiers arrive in packet headers from the radio
//! 2. The router hands them to the crypto core for nonce construction
//! 3. They key lookups in the node database and session-key cache
//!
//! ## ⚠️ Important Note for Next Developer
//! - Node ids participate in nonce construction; their little-endian
//!   byte representation is part of the packet security contract and
//!   must never change
//! - The `!xxxxxxxx` display form is the user-facing convention shown
//!   on device screens and in logs - keep it stable
//!
//! ## Last Modified
//! v0.1.0 - Initial identifier definitions

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CommonError;

// ============================================
// NodeId
// ============================================

/// Unique identifier of a node in the mesh.
///
/// # Purpose
/// Wraps the 32-bit node number to prevent confusion with packet ids
/// and other raw integers flowing through the system.
///
/// # Display Convention
/// Rendered as `!` followed by eight lowercase hex digits
/// (e.g. `!a1b2c3d4`), the form shown on device screens.
///
/// # Example
/// ```
/// use skylark_common::NodeId;
///
/// let node = NodeId::new(0xa1b2_c3d4);
/// assert_eq!(node.to_string(), "!a1b2c3d4");
///
/// let parsed: NodeId = "!a1b2c3d4".parse().unwrap();
/// assert_eq!(parsed, node);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// The broadcast address: packets addressed here are for everyone.
    pub const BROADCAST: Self = Self(0xffff_ffff);

    /// Creates a `NodeId` from a raw 32-bit node number.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw 32-bit node number.
    #[must_use]
    pub const fn raw(&self) -> u32 {
        self.0
    }

    /// Returns the node number as little-endian bytes.
    ///
    /// This is the representation used in nonce construction and
    /// must never change.
    #[must_use]
    pub const fn to_le_bytes(&self) -> [u8; 4] {
        self.0.to_le_bytes()
    }

    /// Returns `true` if this is the broadcast address.
    #[must_use]
    pub const fn is_broadcast(&self) -> bool {
        self.0 == Self::BROADCAST.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "!{:08x}", self.0)
    }
}

impl FromStr for NodeId {
    type Err = CommonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix('!').unwrap_or(s);
        if digits.len() != 8 {
            return Err(CommonError::invalid_length(8, digits.len()));
        }
        let raw = u32::from_str_radix(digits, 16)
            .map_err(|e| CommonError::parse("node id", e.to_string()))?;
        Ok(Self(raw))
    }
}

impl From<u32> for NodeId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl From<NodeId> for u32 {
    fn from(node: NodeId) -> Self {
        node.0
    }
}

impl Serialize for NodeId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_string())
        } else {
            serializer.serialize_u32(self.0)
        }
    }
}

impl<'de> Deserialize<'de> for NodeId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        if deserializer.is_human_readable() {
            let s = String::deserialize(deserializer)?;
            s.parse().map_err(serde::de::Error::custom)
        } else {
            u32::deserialize(deserializer).map(Self)
        }
    }
}

// ============================================
// PacketId
// ============================================

/// Per-packet identifier assigned by the sending node.
///
/// # Purpose
/// Together with the sending `NodeId`, the packet id seeds the
/// per-packet nonce. Both ends already carry it in the packet header,
/// which is what lets the nonce stay off the wire.
///
/// # Uniqueness
/// The sender must never reuse a packet id under the same key; the
/// router owns that monotonic assignment, not this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PacketId(u64);

impl PacketId {
    /// Creates a `PacketId` from a raw 64-bit value.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw 64-bit value.
    #[must_use]
    pub const fn raw(&self) -> u64 {
        self.0
    }

    /// Returns the packet id as little-endian bytes.
    ///
    /// This is the representation used in nonce construction and
    /// must never change.
    #[must_use]
    pub const fn to_le_bytes(&self) -> [u8; 8] {
        self.0.to_le_bytes()
    }
}

impl fmt::Display for PacketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:x}", self.0)
    }
}

impl From<u64> for PacketId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl From<PacketId> for u64 {
    fn from(id: PacketId) -> Self {
        id.0
    }
}

// ============================================
// Tests
// ============================================
