//! # attest-crypto — Cryptographic Primitives
//!
//! Provides the hashing building blocks for tamper-evident documents:
//!
//! - **Keccak-256** digests as the fixed-width [`Hash256`] type, rendered
//!   as lower-case hex on the wire.
//! - **Leaf commitments** computed from
//!   [`CanonicalBytes`](attest_core::CanonicalBytes) only.
//! - **Merkle tree** over a batch of target hashes, order-independent by
//!   construction, with inclusion proofs.
//! - **`check_proof`** for auditors who hold only a leaf, its proof and the
//!   published root.
//!
//! ## Crate Policy
//!
//! - Depends only on `attest-core` internally.
//! - No mocking of hashing in tests; known-answer vectors use real
//!   Keccak-256.

pub mod error;
pub mod keccak;
pub mod merkle;

pub use error::CryptoError;
pub use keccak::{commitment_digest, digest_sorted, keccak256, Hash256};
pub use merkle::{check_proof, combine, MerkleTree};
