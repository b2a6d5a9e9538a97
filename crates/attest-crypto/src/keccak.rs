//! # Keccak-256 Digests
//!
//! Every hash in a signature (leaf commitments, target hashes, Merkle nodes
//! and roots) is a 32-byte Keccak-256 value, rendered on the wire as 64
//! lower-case hex characters.
//!
//! ## Security Invariant
//!
//! Leaf commitments are computed by [`commitment_digest()`], which accepts
//! only `&CanonicalBytes`. A live leaf and the obfuscation record that
//! replaces it are both canonicalized before hashing, so they cannot
//! diverge.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha3::{Digest, Keccak256};

use attest_core::CanonicalBytes;

use crate::error::CryptoError;

/// A 32-byte Keccak-256 hash, ordered by its raw bytes.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Hash256([u8; 32]);

impl Hash256 {
    /// Wrap raw digest bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// The raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Render as 64 lower-case hex characters.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse 64 lower-case hex characters.
    ///
    /// Upper-case digits are rejected so that every hash has exactly one
    /// textual form.
    pub fn from_hex(s: &str) -> Result<Self, CryptoError> {
        if s.bytes().any(|b| b.is_ascii_uppercase()) {
            return Err(CryptoError::HexDecode(format!(
                "upper-case hex is not canonical: {s}"
            )));
        }
        let bytes = hex::decode(s).map_err(|e| CryptoError::HexDecode(e.to_string()))?;
        let arr: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| CryptoError::InvalidLength(bytes.len()))?;
        Ok(Self(arr))
    }
}

impl fmt::Debug for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash256({})", self.to_hex())
    }
}

impl fmt::Display for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Hash256 {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl AsRef<[u8]> for Hash256 {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Serialize for Hash256 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Hash256 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Keccak-256 of raw bytes.
pub fn keccak256(data: &[u8]) -> Hash256 {
    let hash = Keccak256::digest(data);
    let mut out = [0u8; 32];
    out.copy_from_slice(&hash);
    Hash256(out)
}

/// Compute a leaf commitment from canonical bytes.
pub fn commitment_digest(data: &CanonicalBytes) -> Hash256 {
    keccak256(data.as_bytes())
}

/// Sort hashes by raw bytes, concatenate them, and hash the result.
///
/// This is the order-independent fold used both for a document's target
/// hash (over its leaf commitments) and for each Merkle combine step
/// (over a sibling pair).
pub fn digest_sorted(mut hashes: Vec<Hash256>) -> Hash256 {
    hashes.sort_unstable();
    let mut joined = Vec::with_capacity(hashes.len() * 32);
    for h in &hashes {
        joined.extend_from_slice(h.as_bytes());
    }
    keccak256(&joined)
}
