// ============================================
// File: crates/skylark-common/src/error.rs
// ============================================
//! # Common Error Types
//!
//! ## Creation Reason
//! The identifier types in this crate parse user- and wire-facing
//! strings (`!a1b2c3d4` node ids); this module gives those parsers a
//! shared error type the crypto core and firmware layers can match on.
//!
//! ## Main Functionality
//! - `CommonError`: What went wrong while parsing an identifier
//! - `Result<T>`: Type alias using `CommonError`
//!
//! ## ⚠️ Important Note for Next Developer
//! - Never include sensitive data (keys, node secrets) in error messages
//! - Add a variant only when a parser in this crate actually emits it
//!
//! ## Last Modified
//! v0.1.0 - Initial error definitions

use thiserror::Error;

// ============================================
// Result Type Alias
// ============================================

/// Common result type for identifier parsing.
pub type Result<T> = std::result::Result<T, CommonError>;

// ============================================
// CommonError
// ============================================

/// Errors produced while parsing Skylark identifiers.
///
/// # Example
/// ```
/// use skylark_common::NodeId;
///
/// let err = "!123".parse::<NodeId>().unwrap_err();
/// assert!(err.to_string().contains("8"));
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommonError {
    /// The identifier string had the wrong number of digits.
    #[error("Expected {expected} digits, got {actual}")]
    InvalidLength {
        /// Number of digits the identifier form requires
        expected: usize,
        /// Number of digits actually present
        actual: usize,
    },

    /// The identifier string contained characters that do not parse.
    #[error("Cannot parse {what}: {details}")]
    Parse {
        /// Which identifier form was being parsed
        what: &'static str,
        /// What the underlying parser reported
        details: String,
    },
}

impl CommonError {
    /// Creates an `InvalidLength` error.
    #[must_use]
    pub const fn invalid_length(expected: usize, actual: usize) -> Self {
        Self::InvalidLength { expected, actual }
    }

    /// Creates a `Parse` error naming the identifier form.
    pub fn parse(what: &'static str, details: impl Into<String>) -> Self {
        Self::Parse {
            what,
            details: details.into(),
        }
    }
}

// ============================================
// Tests
// ============================================
