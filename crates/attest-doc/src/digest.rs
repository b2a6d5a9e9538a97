//! # Target-Hash Digest
//!
//! Turns a document's salted leaves and its obfuscation records into one
//! 32-byte target hash.
//!
//! ## Commitment Encoding
//!
//! The commitment input of a leaf is the JCS canonical form of the
//! single-entry object `{"<path>": "<salt>:<text>"}`. Its Keccak-256 is the
//! leaf commitment. An [`ObfuscationRecord`] is the lower-case hex of those
//! same bytes, so a redacted leaf contributes the identical commitment.
//!
//! The target hash sorts all commitments by raw bytes, concatenates them and
//! hashes once more. Key order and traversal order therefore never matter.
//!
//! ## Security Invariant
//!
//! Records are reversible encodings, not one-way hashes: anyone holding a
//! redacted document can recover the salt and value of every redacted leaf
//! by hex-decoding its record.

use std::fmt;

use attest_core::{AttestError, CanonicalBytes, CanonicalizationError, LeafKind};
use attest_crypto::{commitment_digest, digest_sorted, Hash256};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::salt::Salt;

/// Why a signed document's leaves cannot be turned into a target hash.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DigestError {
    /// The document has no payload where its layout expects one.
    #[error("missing payload: {0}")]
    MissingPayload(&'static str),

    /// A leaf does not carry the encoding its layout requires.
    #[error("malformed leaf at `{path}`: {reason}")]
    MalformedLeaf {
        /// Structural address of the leaf.
        path: String,
        /// What was wrong with it.
        reason: String,
    },

    /// A live leaf has no salt.
    #[error("leaf at `{path}` has no salt")]
    MissingSalt {
        /// Structural address of the leaf.
        path: String,
    },

    /// A salt addresses no live leaf.
    #[error("salt for `{path}` has no leaf")]
    OrphanSalt {
        /// Path recorded on the salt.
        path: String,
    },

    /// Two salts share one path.
    #[error("duplicate salt for `{path}`")]
    DuplicateSalt {
        /// The repeated path.
        path: String,
    },

    /// A leaf's scalar kind differs from the kind recorded on its salt.
    #[error("leaf at `{path}` is a {found}, salt records a {expected}")]
    KindMismatch {
        /// Structural address of the leaf.
        path: String,
        /// Kind recorded at wrap time.
        expected: LeafKind,
        /// Kind of the current value.
        found: &'static str,
    },

    /// An obfuscation record does not decode to a commitment input.
    #[error("malformed obfuscation record #{index}: {reason}")]
    MalformedRecord {
        /// Position in the obfuscated data list.
        index: usize,
        /// What was wrong with it.
        #[source]
        reason: RecordError,
    },

    /// Canonical serialization of a commitment input failed.
    #[error("canonicalization failed: {0}")]
    Canonicalization(String),
}

/// Why an obfuscation record does not decode to a commitment input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// The record is not lower- or upper-case hex of whole bytes.
    #[error("not valid hex: {0}")]
    Hex(String),

    /// The decoded bytes are not JSON.
    #[error("not valid JSON: {0}")]
    Json(String),

    /// The decoded JSON is not an object with exactly one member.
    #[error("not a single-entry object")]
    NotSingleEntry,

    /// The single member's value is not a string.
    #[error("entry value is not a string")]
    NonStringValue,

    /// The decoded bytes differ from their canonical form.
    #[error("not in canonical form")]
    NonCanonical,

    /// The decoded entry could not be re-canonicalized.
    #[error("canonicalization failed: {0}")]
    Canonicalization(String),
}

impl From<hex::FromHexError> for RecordError {
    fn from(err: hex::FromHexError) -> Self {
        RecordError::Hex(err.to_string())
    }
}

impl From<serde_json::Error> for RecordError {
    fn from(err: serde_json::Error) -> Self {
        RecordError::Json(err.to_string())
    }
}

impl From<CanonicalizationError> for RecordError {
    fn from(err: CanonicalizationError) -> Self {
        RecordError::Canonicalization(err.to_string())
    }
}

impl From<CanonicalizationError> for DigestError {
    fn from(err: CanonicalizationError) -> Self {
        DigestError::Canonicalization(err.to_string())
    }
}

impl From<DigestError> for AttestError {
    fn from(err: DigestError) -> Self {
        AttestError::InvalidDocument(err.to_string())
    }
}

/// A live leaf paired with its salt: the unit a leaf commitment is made of.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaltedLeaf {
    /// Structural address of the leaf.
    pub path: String,
    /// The salt token.
    pub salt: String,
    /// Scalar kind of the leaf.
    pub kind: LeafKind,
    /// The committed text (layout specific).
    pub text: String,
}

impl SaltedLeaf {
    /// `"<salt>:<text>"`.
    pub fn salted_text(&self) -> String {
        format!("{}:{}", self.salt, self.text)
    }

    /// Canonical bytes of `{"<path>": "<salt>:<text>"}`.
    pub fn commitment_input(&self) -> Result<CanonicalBytes, CanonicalizationError> {
        let mut entry = Map::new();
        entry.insert(self.path.clone(), Value::String(self.salted_text()));
        CanonicalBytes::new(&Value::Object(entry))
    }

    /// Keccak-256 of the commitment input.
    pub fn commitment(&self) -> Result<Hash256, CanonicalizationError> {
        Ok(commitment_digest(&self.commitment_input()?))
    }

    /// The salt this leaf was paired with.
    pub fn to_salt(&self) -> Salt {
        Salt {
            value: self.salt.clone(),
            path: self.path.clone(),
            kind: self.kind,
        }
    }
}

/// Hex-encoded commitment input of a redacted leaf.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObfuscationRecord(String);

impl ObfuscationRecord {
    /// Encode a live leaf before it is removed.
    pub fn from_leaf(leaf: &SaltedLeaf) -> Result<Self, CanonicalizationError> {
        Ok(Self(hex::encode(leaf.commitment_input()?.as_bytes())))
    }

    /// The hex text as stored on the wire.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Recover `(path, "<salt>:<text>")` from the record.
    pub fn decode(&self) -> Result<(String, String), RecordError> {
        let (_, path, salted_text) = self.parse()?;
        Ok((path, salted_text))
    }

    /// The leaf commitment this record stands in for.
    pub fn commitment(&self) -> Result<Hash256, RecordError> {
        let (canonical, _, _) = self.parse()?;
        Ok(commitment_digest(&canonical))
    }

    fn parse(&self) -> Result<(CanonicalBytes, String, String), RecordError> {
        let bytes = hex::decode(&self.0)?;
        let value: Value = serde_json::from_slice(&bytes)?;
        let (path, salted_text) = match &value {
            Value::Object(map) if map.len() == 1 => match map.iter().next() {
                Some((path, Value::String(text))) => (path.clone(), text.clone()),
                _ => return Err(RecordError::NonStringValue),
            },
            _ => return Err(RecordError::NotSingleEntry),
        };
        let canonical = CanonicalBytes::new(&value)?;
        if canonical.as_bytes() != bytes.as_slice() {
            return Err(RecordError::NonCanonical);
        }
        Ok((canonical, path, salted_text))
    }
}

impl fmt::Display for ObfuscationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fold live leaves and obfuscation records into a target hash.
pub fn target_hash(
    leaves: &[SaltedLeaf],
    records: &[ObfuscationRecord],
) -> Result<Hash256, DigestError> {
    let mut commitments = Vec::with_capacity(leaves.len() + records.len());
    for leaf in leaves {
        commitments.push(leaf.commitment()?);
    }
    for (index, record) in records.iter().enumerate() {
        let commitment = record
            .commitment()
            .map_err(|reason| DigestError::MalformedRecord { index, reason })?;
        commitments.push(commitment);
    }
    Ok(digest_sorted(commitments))
}
