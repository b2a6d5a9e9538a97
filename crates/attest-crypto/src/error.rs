//! # Cryptographic Error Types
//!
//! Structured errors for the hashing and Merkle primitives in
//! `attest-crypto`.

use attest_core::AttestError;
use thiserror::Error;

/// Errors from cryptographic operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Hex decoding error (bad characters or upper-case digits).
    #[error("hex decode error: {0}")]
    HexDecode(String),

    /// A hash had the wrong number of bytes.
    #[error("invalid hash length: expected 32 bytes, got {0}")]
    InvalidLength(usize),

    /// A Merkle tree was requested over no leaves.
    #[error("cannot build a Merkle tree with no leaves")]
    EmptyTree,

    /// A proof was requested for a hash that is not a leaf of the tree.
    #[error("leaf {0} is not in the tree")]
    LeafNotInTree(String),
}

impl From<CryptoError> for AttestError {
    fn from(err: CryptoError) -> Self {
        AttestError::Integrity(err.to_string())
    }
}
