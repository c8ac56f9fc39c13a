// ============================================
// File: crates/skylark-common/src/lib.rs
// ============================================
//! # Skylark Common - Shared Types Library
//!
//! ## Creation Reason
//! Provides the fundamental identifier types shared between the
//! cryptographic core and the surrounding node subsystems (router,
//! dispatch, node database), ensuring every crate talks about nodes
//! and packets with the same representations.
//!
//! ## Main Functionality
//! - [`types`]: Core identifiers (`NodeId`, `PacketId`)
//! - [`error`]: Common error types and result aliases
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │         node firmware (router, radio, apps)         │
//! │                        │                            │
//! │                        ▼                            │
//! │                  skylark-core                       │
//! │                        │                            │
//! │                        ▼                            │
//! │                skylark-common  ◄── You are here     │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dependencies
//! - No internal crate dependencies (leaf node)
//! - Minimal external dependencies for maximum compatibility
//!
//! ## ⚠️ Important Note for Next Developer
//! - This crate is the foundation - changes affect everything
//! - Keep dependencies minimal
//! - All public types should implement standard traits (Debug, Clone, etc.)
//! - Wire representations of identifiers must stay stable across releases
//!
//! ## Last Modified
//! v0.1.0 - Initial implementation

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod types;

// Re-export commonly used items at crate root
pub use error::{CommonError, Result};
pub use types::{NodeId, PacketId};
