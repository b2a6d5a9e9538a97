//! # Wrapper
//!
//! Salt each document, digest it to a target hash, build one Merkle tree
//! over the batch, and attach each document's signature.
//!
//! Batch wrapping has one synchronization point: the tree needs every
//! target hash before any proof can be derived. Salting, digesting and
//! attaching are independent per document.

use attest_core::AttestError;
use attest_crypto::{Hash256, MerkleTree};
use serde_json::Value;

use crate::layout::SaltedDocument;
use crate::options::WrapOptions;
use crate::salt::{SaltSource, UuidSaltSource};
use crate::signature::Signature;
use crate::validate::{ensure_valid, DocumentValidator};

/// Wrap one document as a batch of one.
///
/// The result has `proof == []` and `merkleRoot == targetHash`.
pub fn wrap_document(document: &Value, options: &WrapOptions) -> Result<Value, AttestError> {
    wrap_document_with(document, options, &mut UuidSaltSource)
}

/// [`wrap_document`] drawing salts from `source`.
pub fn wrap_document_with(
    document: &Value,
    options: &WrapOptions,
    source: &mut dyn SaltSource,
) -> Result<Value, AttestError> {
    let mut wrapped = wrap_documents_with(std::slice::from_ref(document), options, source)?;
    wrapped.pop().ok_or(AttestError::EmptyBatch)
}

/// Wrap a non-empty batch under one Merkle root.
///
/// Output has the same length and order as `documents`.
pub fn wrap_documents(documents: &[Value], options: &WrapOptions) -> Result<Vec<Value>, AttestError> {
    wrap_documents_with(documents, options, &mut UuidSaltSource)
}

/// [`wrap_documents`] drawing salts from `source`.
pub fn wrap_documents_with(
    documents: &[Value],
    options: &WrapOptions,
    source: &mut dyn SaltSource,
) -> Result<Vec<Value>, AttestError> {
    if documents.is_empty() {
        return Err(AttestError::EmptyBatch);
    }
    let salted = documents
        .iter()
        .map(|document| salt_document(document, options, &mut *source))
        .collect::<Result<Vec<_>, _>>()?;
    let hashes = salted
        .iter()
        .map(SaltedDocument::target_hash)
        .collect::<Result<Vec<_>, _>>()?;

    let tree = MerkleTree::new(&hashes)?;
    tracing::debug!(
        documents = documents.len(),
        version = %options.version,
        merkle_root = %tree.root(),
        "wrapped batch"
    );

    salted
        .iter()
        .zip(&hashes)
        .map(|(document, target_hash)| attach(document, *target_hash, &tree))
        .collect()
}

/// Salt a document for the layout named in `options` without signing it.
pub fn salt_document(
    document: &Value,
    options: &WrapOptions,
    source: &mut dyn SaltSource,
) -> Result<SaltedDocument, AttestError> {
    options.version.layout().salt(document, options, source)
}

/// Sign a salted document against a caller-supplied batch of target hashes.
///
/// # Errors
///
/// Returns `AttestError::DocumentNotInBatch` if `batch` does not contain the
/// document's own target hash.
pub fn sign(salted: &SaltedDocument, batch: &[Hash256]) -> Result<Value, AttestError> {
    let target_hash = salted.target_hash()?;
    if !batch.contains(&target_hash) {
        return Err(AttestError::DocumentNotInBatch {
            target_hash: target_hash.to_hex(),
        });
    }
    let tree = MerkleTree::new(batch)?;
    attach(salted, target_hash, &tree)
}

/// [`wrap_document`] followed by the host's validator.
pub fn wrap_document_validated<V: DocumentValidator + ?Sized>(
    document: &Value,
    options: &WrapOptions,
    validator: &V,
) -> Result<Value, AttestError> {
    ensure_valid(wrap_document(document, options)?, validator)
}

/// [`wrap_documents`] followed by the host's validator on every output.
pub fn wrap_documents_validated<V: DocumentValidator + ?Sized>(
    documents: &[Value],
    options: &WrapOptions,
    validator: &V,
) -> Result<Vec<Value>, AttestError> {
    wrap_documents(documents, options)?
        .into_iter()
        .map(|document| ensure_valid(document, validator))
        .collect()
}

fn attach(
    salted: &SaltedDocument,
    target_hash: Hash256,
    tree: &MerkleTree,
) -> Result<Value, AttestError> {
    let proof = tree.proof(&target_hash)?;
    let signature = Signature::new(target_hash, proof, tree.root());
    salted.version().layout().join(salted, signature)
}
