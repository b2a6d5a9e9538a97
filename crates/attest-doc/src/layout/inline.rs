//! Inline layout (`attest/3.0`).
//!
//! ```json
//! {
//!   "version": "attest/3.0",
//!   "name": "Alice",
//!   "proof": {
//!     "signature": {
//!       "type": "SHA3MerkleProof", "targetHash": "...", "proof": [], "merkleRoot": "...",
//!       "salts": [{ "value": "...", "path": "name", "kind": "string" }],
//!       "privacy": { "obfuscatedData": [] }
//!     }
//!   }
//! }
//! ```
//!
//! Everything except `proof.signature` is committed, `version` and
//! `schema` included. Salts and leaves must pair exactly: a leaf without a
//! salt, a salt without a leaf, or a leaf whose kind changed all fail the
//! digest.

use std::collections::HashMap;

use attest_core::leaf::{describe, stringify};
use attest_core::{AttestError, FieldPath, LeafKind, Segment};
use serde_json::{Map, Value};

use super::{Layout, SaltedDocument, SchemaVersion, SCHEMA, VERSION};
use crate::digest::{DigestError, SaltedLeaf};
use crate::options::WrapOptions;
use crate::salt::{salt_leaves, Salt, SaltSource};
use crate::signature::{Privacy, Signature};
use crate::walk::visit_leaves;

const PROOF: &str = "proof";
const SIGNATURE: &str = "signature";

pub(crate) struct Inline;

impl Layout for Inline {
    fn salt(
        &self,
        document: &Value,
        options: &WrapOptions,
        source: &mut dyn SaltSource,
    ) -> Result<SaltedDocument, AttestError> {
        let mut root = document.as_object().cloned().ok_or_else(|| {
            AttestError::InvalidDocument("document must be a JSON object".to_string())
        })?;
        match root.get(PROOF) {
            None => {}
            Some(Value::Object(proof)) if proof.contains_key(SIGNATURE) => {
                return Err(AttestError::InvalidDocument(
                    "document already carries `proof.signature`".to_string(),
                ))
            }
            Some(Value::Object(_)) => {}
            Some(_) => {
                return Err(AttestError::InvalidDocument(
                    "`proof` must be an object".to_string(),
                ))
            }
        }
        root.insert(VERSION.to_string(), SchemaVersion::V3.tag().into());
        if let Some(schema) = &options.external_schema_id {
            root.insert(SCHEMA.to_string(), schema.as_str().into());
        }
        let body = Value::Object(root);
        let salts = salt_leaves(&body, source)?;
        Ok(SaltedDocument::new(SchemaVersion::V3, body, salts, Vec::new()))
    }

    fn leaves(&self, salted: &SaltedDocument) -> Result<Vec<SaltedLeaf>, DigestError> {
        let mut unpaired: HashMap<&str, &Salt> = HashMap::with_capacity(salted.salts().len());
        for salt in salted.salts() {
            if unpaired.insert(salt.path.as_str(), salt).is_some() {
                return Err(DigestError::DuplicateSalt {
                    path: salt.path.clone(),
                });
            }
        }

        let mut leaves = Vec::with_capacity(unpaired.len());
        visit_leaves::<DigestError, _>(salted.body(), "", &mut |path, value| {
            let Some(kind) = LeafKind::of(value) else {
                // Redacted array slots hold `null` and carry no content.
                return Ok(());
            };
            let salt = unpaired.remove(path).ok_or_else(|| DigestError::MissingSalt {
                path: path.to_string(),
            })?;
            if salt.kind != kind {
                return Err(DigestError::KindMismatch {
                    path: path.to_string(),
                    expected: salt.kind,
                    found: describe(value),
                });
            }
            leaves.push(SaltedLeaf {
                path: path.to_string(),
                salt: salt.value.clone(),
                kind,
                text: stringify(value).unwrap_or_default(),
            });
            Ok(())
        })?;

        if let Some(orphan) = unpaired.keys().min() {
            return Err(DigestError::OrphanSalt {
                path: orphan.to_string(),
            });
        }
        Ok(leaves)
    }

    fn split(&self, document: &Value) -> Result<(SaltedDocument, Signature), AttestError> {
        let mut root = document.as_object().cloned().ok_or(AttestError::NotSigned)?;
        let Some(Value::Object(mut proof)) = root.remove(PROOF) else {
            return Err(AttestError::NotSigned);
        };
        let signature = proof.remove(SIGNATURE).ok_or(AttestError::NotSigned)?;
        let mut signature: Signature = serde_json::from_value(signature)?;
        let salts = signature.salts.take().ok_or_else(|| {
            AttestError::InvalidDocument("inline signature carries no salts".to_string())
        })?;
        let privacy = signature.privacy.take().unwrap_or_default();
        if !proof.is_empty() {
            root.insert(PROOF.to_string(), Value::Object(proof));
        }
        Ok((
            SaltedDocument::new(
                SchemaVersion::V3,
                Value::Object(root),
                salts,
                privacy.obfuscated_data,
            ),
            signature,
        ))
    }

    fn join(&self, salted: &SaltedDocument, mut signature: Signature) -> Result<Value, AttestError> {
        let Value::Object(mut root) = salted.body().clone() else {
            return Err(AttestError::InvalidDocument(
                "salted body is not an object".to_string(),
            ));
        };
        signature.salts = Some(salted.salts().to_vec());
        signature.privacy = Some(Privacy {
            obfuscated_data: salted.obfuscated().to_vec(),
        });
        let mut proof = match root.remove(PROOF) {
            None => Map::new(),
            Some(Value::Object(proof)) => proof,
            Some(_) => {
                return Err(AttestError::InvalidDocument(
                    "`proof` must be an object".to_string(),
                ))
            }
        };
        proof.insert(SIGNATURE.to_string(), serde_json::to_value(signature)?);
        root.insert(PROOF.to_string(), Value::Object(proof));
        Ok(Value::Object(root))
    }

    fn remove(&self, body: &Value, path: &FieldPath) -> Option<Value> {
        path.without(body)
    }

    fn check_redactable(&self, path: &FieldPath) -> Result<(), AttestError> {
        if path.segments() == [Segment::Key(VERSION.to_string())] {
            return Err(AttestError::InvalidDocument(
                "`version` selects the layout and cannot be redacted".to_string(),
            ));
        }
        Ok(())
    }

    fn data(&self, salted: &SaltedDocument) -> Result<Value, AttestError> {
        Ok(salted.body().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn salt(value: &str, path: &str, kind: LeafKind) -> Salt {
        Salt {
            value: value.to_string(),
            path: path.to_string(),
            kind,
        }
    }

    fn salted(body: Value, salts: Vec<Salt>) -> SaltedDocument {
        SaltedDocument::new(SchemaVersion::V3, body, salts, Vec::new())
    }

    #[test]
    fn pairs_leaves_with_salts() {
        let doc = salted(
            json!({"a": 1, "b": [true, null]}),
            vec![
                salt("s1", "a", LeafKind::Number),
                salt("s2", "b[0]", LeafKind::Boolean),
            ],
        );
        let leaves = Inline.leaves(&doc).unwrap();
        assert_eq!(leaves.len(), 2);
        assert_eq!(leaves[0].text, "1");
        assert_eq!(leaves[1].text, "true");
    }

    #[test]
    fn pairing_is_strict() {
        let missing = salted(json!({"a": 1, "b": 2}), vec![salt("s1", "a", LeafKind::Number)]);
        assert!(matches!(
            Inline.leaves(&missing),
            Err(DigestError::MissingSalt { .. })
        ));

        let orphan = salted(
            json!({"a": 1}),
            vec![salt("s1", "a", LeafKind::Number), salt("s2", "z", LeafKind::Number)],
        );
        assert_eq!(
            Inline.leaves(&orphan),
            Err(DigestError::OrphanSalt {
                path: "z".to_string()
            })
        );

        let duplicate = salted(
            json!({"a": 1}),
            vec![salt("s1", "a", LeafKind::Number), salt("s2", "a", LeafKind::Number)],
        );
        assert!(matches!(
            Inline.leaves(&duplicate),
            Err(DigestError::DuplicateSalt { .. })
        ));

        let retyped = salted(json!({"a": "1"}), vec![salt("s1", "a", LeafKind::Number)]);
        assert!(matches!(
            Inline.leaves(&retyped),
            Err(DigestError::KindMismatch { .. })
        ));
    }

    #[test]
    fn wrap_rejects_presigned_or_odd_proof() {
        let mut source = || "s".to_string();
        let options = WrapOptions::new(SchemaVersion::V3);
        for doc in [
            json!({"proof": {"signature": {}}}),
            json!({"proof": "x"}),
            json!(["not", "an", "object"]),
        ] {
            assert!(matches!(
                Inline.salt(&doc, &options, &mut source),
                Err(AttestError::InvalidDocument(_))
            ));
        }
    }

    #[test]
    fn version_is_not_redactable() {
        let path = FieldPath::parse("version").unwrap();
        assert!(Inline.check_redactable(&path).is_err());
        let nested = FieldPath::parse("meta.version").unwrap();
        assert!(Inline.check_redactable(&nested).is_ok());
    }

    #[test]
    fn split_drops_emptied_proof() {
        let doc = json!({
            "version": "attest/3.0",
            "a": 1,
            "proof": {"signature": {
                "type": "SHA3MerkleProof",
                "targetHash": "00".repeat(32),
                "proof": [],
                "merkleRoot": "00".repeat(32),
                "salts": [],
            }}
        });
        let (body, signature) = Inline.split(&doc).unwrap();
        assert_eq!(body.body(), &json!({"version": "attest/3.0", "a": 1}));
        assert!(signature.salts.is_none());
        let back = Inline.join(&body, signature).unwrap();
        assert_eq!(back["proof"]["signature"]["privacy"], json!({"obfuscatedData": []}));
    }
}
