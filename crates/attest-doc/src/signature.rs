//! Signature block attached to every wrapped document.

use attest_crypto::Hash256;
use serde::{Deserialize, Serialize};

use crate::digest::ObfuscationRecord;
use crate::salt::Salt;

/// The only recognized proof algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SignatureType {
    /// Keccak-256 leaf commitments under a sorted-pair Merkle tree.
    #[default]
    #[serde(rename = "SHA3MerkleProof")]
    Sha3MerkleProof,
}

/// `{type, targetHash, proof, merkleRoot}` plus the inline layout's salt
/// manifest and privacy block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signature {
    /// Proof algorithm.
    #[serde(rename = "type")]
    pub kind: SignatureType,
    /// The document's commitment at wrap time.
    pub target_hash: Hash256,
    /// Sibling hashes from the target hash to the root.
    pub proof: Vec<Hash256>,
    /// Root of the batch tree.
    pub merkle_root: Hash256,
    /// Salt manifest (inline layout only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salts: Option<Vec<Salt>>,
    /// Obfuscation records (inline layout only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub privacy: Option<Privacy>,
}

impl Signature {
    /// A bare signature for `target_hash` within a batch.
    pub fn new(target_hash: Hash256, proof: Vec<Hash256>, merkle_root: Hash256) -> Self {
        Self {
            kind: SignatureType::Sha3MerkleProof,
            target_hash,
            proof,
            merkle_root,
            salts: None,
            privacy: None,
        }
    }
}

/// Append-only list of obfuscation records.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Privacy {
    /// Records in redaction order.
    #[serde(default)]
    pub obfuscated_data: Vec<ObfuscationRecord>,
}
