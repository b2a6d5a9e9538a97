//! # attest-doc — Document Integrity Engine
//!
//! Issues tamper-evident, selectively redactable documents:
//!
//! 1. **Salt.** Every leaf scalar gets a fresh random token bound to its
//!    structural path ([`salt`]).
//! 2. **Digest.** Salted leaves become Keccak-256 commitments, folded into
//!    one order-independent target hash per document ([`digest`]).
//! 3. **Sign.** A batch of target hashes shares one Merkle root; each
//!    document carries its own inclusion proof ([`wrap`]).
//! 4. **Verify.** The target hash is rebuilt from current content and the
//!    proof replayed against the stored root ([`verify`]).
//! 5. **Redact.** Fields are removed while their commitments survive as
//!    obfuscation records, so the original signature still verifies
//!    ([`obfuscate`]).
//!
//! Two wire layouts are supported and selected by version tag
//! ([`SchemaVersion`]). Documents are `serde_json::Value` trees; every
//! operation returns a new value and never mutates its input.
//!
//! ## Crate Policy
//!
//! - No I/O and no shared state; the only ambient capability is the salt
//!   token source, injected through [`SaltSource`].
//! - Verification never fails loudly: it returns `false` and logs why at
//!   `debug` level.
//! - Shape validation belongs to the host ([`DocumentValidator`]).

pub mod data;
pub mod digest;
pub mod layout;
pub mod obfuscate;
pub mod options;
pub mod salt;
pub mod signature;
pub mod validate;
pub mod verify;
pub mod wrap;

mod walk;

pub use attest_core::{AttestError, LeafKind};
pub use attest_crypto::{check_proof, Hash256};
pub use data::{get_data, salts_of};
pub use digest::{DigestError, ObfuscationRecord, RecordError, SaltedLeaf};
pub use layout::{SaltedDocument, SchemaVersion};
pub use obfuscate::{obfuscate_document, obfuscate_field};
pub use options::WrapOptions;
pub use salt::{Salt, SaltSource, UuidSaltSource};
pub use signature::{Privacy, Signature, SignatureType};
pub use validate::{validate_schema, DocumentValidator};
pub use verify::verify_signature;
pub use wrap::{
    salt_document, sign, wrap_document, wrap_document_validated, wrap_document_with,
    wrap_documents, wrap_documents_validated, wrap_documents_with,
};
