//! # Wire Layouts
//!
//! A signed document comes in one of two layouts, selected by its version
//! tag:
//!
//! - [`SchemaVersion::V2`] (`"attest/2.0"`): the payload sits under `data`
//!   with every leaf replaced by `"<salt>:<kind>:<value>"`; the signature
//!   sits at the root.
//! - [`SchemaVersion::V3`] (`"attest/3.0"`): the payload is the document
//!   root with its values untouched; salts travel in a manifest inside
//!   `proof.signature`.
//!
//! The version is resolved once at the API boundary. Everything past that
//! point talks to a [`Layout`] and never probes document shape itself.

mod data_wrapped;
mod inline;

use std::fmt;

use attest_core::{AttestError, FieldPath};
use attest_crypto::Hash256;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::digest::{self, DigestError, ObfuscationRecord, SaltedLeaf};
use crate::options::WrapOptions;
use crate::salt::{Salt, SaltSource};
use crate::signature::Signature;

use data_wrapped::DataWrapped;
use inline::Inline;

/// Field holding the version tag in both layouts.
pub(crate) const VERSION: &str = "version";
/// Field holding the external schema reference in both layouts.
pub(crate) const SCHEMA: &str = "schema";

/// Version tag of a signed document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SchemaVersion {
    /// Data-wrapped layout.
    #[default]
    #[serde(rename = "attest/2.0")]
    V2,
    /// Inline layout.
    #[serde(rename = "attest/3.0")]
    V3,
}

impl SchemaVersion {
    /// The tag written to the `version` field.
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::V2 => "attest/2.0",
            Self::V3 => "attest/3.0",
        }
    }

    /// Select the layout of a signed document.
    ///
    /// Only an exact `"attest/3.0"` tag selects the inline layout; anything
    /// else is read as data-wrapped and simply fails there if malformed.
    pub fn detect(document: &Value) -> Self {
        match document.get(VERSION).and_then(Value::as_str) {
            Some(tag) if tag == Self::V3.tag() => Self::V3,
            _ => Self::V2,
        }
    }

    pub(crate) fn layout(&self) -> &'static dyn Layout {
        match self {
            Self::V2 => &DataWrapped,
            Self::V3 => &Inline,
        }
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// The contract each wire layout implements.
///
/// Digest, wrap, verify and redact are written once against this trait.
pub(crate) trait Layout: Send + Sync {
    /// Build the salted body of an unsigned document.
    fn salt(
        &self,
        document: &Value,
        options: &WrapOptions,
        source: &mut dyn SaltSource,
    ) -> Result<SaltedDocument, AttestError>;

    /// Pair every live leaf of the body with its salt.
    fn leaves(&self, salted: &SaltedDocument) -> Result<Vec<SaltedLeaf>, DigestError>;

    /// Separate a signed document into its salted body and signature.
    fn split(&self, document: &Value) -> Result<(SaltedDocument, Signature), AttestError>;

    /// Attach `signature` (and the layout's salt/privacy blocks) to the body.
    fn join(&self, salted: &SaltedDocument, signature: Signature) -> Result<Value, AttestError>;

    /// The body with the payload node at `path` removed, or `None` if the
    /// path does not resolve.
    fn remove(&self, body: &Value, path: &FieldPath) -> Option<Value>;

    /// Reject paths whose redaction would change how the document is read.
    fn check_redactable(&self, _path: &FieldPath) -> Result<(), AttestError> {
        Ok(())
    }

    /// The plain payload the body carries.
    fn data(&self, salted: &SaltedDocument) -> Result<Value, AttestError>;
}

/// A salted document body without its signature.
///
/// Produced by salting (for wrapping) or by splitting a signed document
/// (for verification and redaction).
#[derive(Debug, Clone, PartialEq)]
pub struct SaltedDocument {
    version: SchemaVersion,
    body: Value,
    salts: Vec<Salt>,
    obfuscated: Vec<ObfuscationRecord>,
}

impl SaltedDocument {
    pub(crate) fn new(
        version: SchemaVersion,
        body: Value,
        salts: Vec<Salt>,
        obfuscated: Vec<ObfuscationRecord>,
    ) -> Self {
        Self {
            version,
            body,
            salts,
            obfuscated,
        }
    }

    /// The layout this body belongs to.
    pub fn version(&self) -> SchemaVersion {
        self.version
    }

    /// The salted body: everything the signature commits to.
    pub fn body(&self) -> &Value {
        &self.body
    }

    /// Salts of the live leaves, in traversal order.
    pub fn salts(&self) -> &[Salt] {
        &self.salts
    }

    /// Obfuscation records, in redaction order.
    pub fn obfuscated(&self) -> &[ObfuscationRecord] {
        &self.obfuscated
    }

    /// Live leaves paired with their salts.
    pub fn leaves(&self) -> Result<Vec<SaltedLeaf>, DigestError> {
        self.version.layout().leaves(self)
    }

    /// Recompute the target hash from the current body.
    pub fn target_hash(&self) -> Result<Hash256, DigestError> {
        digest::target_hash(&self.leaves()?, &self.obfuscated)
    }

    pub(crate) fn set_body(&mut self, body: Value) {
        self.body = body;
    }

    pub(crate) fn retain_salts(&mut self, keep: impl FnMut(&Salt) -> bool) {
        self.salts.retain(keep);
    }

    pub(crate) fn push_record(&mut self, record: ObfuscationRecord) {
        self.obfuscated.push(record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tags_round_trip_through_serde() {
        assert_eq!(serde_json::to_value(SchemaVersion::V3).unwrap(), json!("attest/3.0"));
        let v: SchemaVersion = serde_json::from_value(json!("attest/2.0")).unwrap();
        assert_eq!(v, SchemaVersion::V2);
        assert!(serde_json::from_value::<SchemaVersion>(json!("attest/4.0")).is_err());
    }

    #[test]
    fn detection_defaults_to_data_wrapped() {
        assert_eq!(SchemaVersion::detect(&json!({"version": "attest/3.0"})), SchemaVersion::V3);
        assert_eq!(SchemaVersion::detect(&json!({"version": "attest/2.0"})), SchemaVersion::V2);
        assert_eq!(SchemaVersion::detect(&json!({"version": 3})), SchemaVersion::V2);
        assert_eq!(SchemaVersion::detect(&json!("attest/3.0")), SchemaVersion::V2);
        assert_eq!(SchemaVersion::default(), SchemaVersion::V2);
    }

    #[test]
    fn display_is_the_tag() {
        assert_eq!(SchemaVersion::V3.to_string(), "attest/3.0");
    }
}
