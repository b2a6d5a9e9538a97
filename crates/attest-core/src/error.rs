//! # Error Types — Structured Error Hierarchy
//!
//! Defines the error types shared across the workspace. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Structural and precondition errors (unsalt-able values, a document
//!   missing from its batch) are fatal and abort the call that raised them.
//! - Verification never produces an error; it is a boolean predicate.
//! - Schema violations are raised only by an external validator plugged in
//!   at the wrap boundary, and carry the offending document.

use serde_json::Value;
use thiserror::Error;

/// Top-level error type for wrapping, signing and redaction.
#[derive(Error, Debug)]
pub enum AttestError {
    /// The salter met a value it cannot commit to (e.g. `null`).
    #[error("unsalt-able value at `{path}`: {found}")]
    UnsaltableValue {
        /// Structural address of the offending value.
        path: String,
        /// Short description of what was found there.
        found: &'static str,
    },

    /// The salt token source produced an empty, malformed or repeated token.
    #[error("invalid salt token: {0}")]
    InvalidSalt(String),

    /// An explicit batch does not contain the document's own target hash.
    #[error("document is not in batch (target hash {target_hash})")]
    DocumentNotInBatch {
        /// Hex target hash of the document being signed.
        target_hash: String,
    },

    /// Batch wrapping was called with no documents.
    #[error("cannot wrap an empty batch")]
    EmptyBatch,

    /// The input is not a document this engine can wrap.
    #[error("invalid document: {0}")]
    InvalidDocument(String),

    /// The document carries no signature block of a recognized shape.
    #[error("document carries no recognizable signature")]
    NotSigned,

    /// The external validator rejected a wrapped document.
    #[error("invalid document: {} schema error(s)", errors.len())]
    SchemaViolation {
        /// Structural errors reported by the validator.
        errors: Vec<String>,
        /// The wrapped document that failed validation.
        document: Box<Value>,
    },

    /// A field path could not be parsed.
    #[error("field path error: {0}")]
    Path(#[from] PathError),

    /// Canonical serialization of a commitment input failed.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] CanonicalizationError),

    /// A cryptographic primitive rejected its input.
    #[error("integrity error: {0}")]
    Integrity(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

/// Error parsing a structural field path.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// The path string was empty.
    #[error("empty field path")]
    Empty,

    /// The path string violates the `key.key[index]` grammar.
    #[error("malformed field path `{path}` at byte {position}: {reason}")]
    Malformed {
        /// The full input path.
        path: String,
        /// Byte offset where parsing failed.
        position: usize,
        /// What the parser expected.
        reason: &'static str,
    },
}

/// A leaf kind tag other than `string`, `number` or `boolean`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown leaf kind: {0}")]
pub struct UnknownLeafKind(pub String);
