//! Data-wrapped layout (`attest/2.0`).
//!
//! ```json
//! {
//!   "version": "attest/2.0",
//!   "schema": "...",
//!   "data": { "name": "<salt>:string:Alice" },
//!   "signature": { "type": "SHA3MerkleProof", "targetHash": "...", "proof": [], "merkleRoot": "..." },
//!   "privacy": { "obfuscatedData": ["..."] }
//! }
//! ```
//!
//! Only `data` is committed. Each leaf commits to `"<kind>:<value>"` so a
//! string `"true"` and a boolean `true` cannot be swapped.

use attest_core::{AttestError, FieldPath, LeafKind, UnknownLeafKind};
use serde_json::{Map, Value};

use super::{Layout, SaltedDocument, SchemaVersion, SCHEMA, VERSION};
use crate::digest::{DigestError, SaltedLeaf};
use crate::options::WrapOptions;
use crate::salt::{salt_inline, SaltSource};
use crate::signature::{Privacy, Signature};
use crate::walk::{map_leaves, visit_leaves};

const DATA: &str = "data";
const SIGNATURE: &str = "signature";
const PRIVACY: &str = "privacy";

pub(crate) struct DataWrapped;

/// A decoded `"<salt>:<kind>:<value>"` leaf.
struct InlineLeaf<'a> {
    salt: &'a str,
    kind: LeafKind,
    text: &'a str,
    value: Value,
}

fn parse_inline<'a>(path: &str, leaf: &'a Value) -> Result<InlineLeaf<'a>, DigestError> {
    let malformed = |reason: String| DigestError::MalformedLeaf {
        path: path.to_string(),
        reason,
    };
    let Value::String(encoded) = leaf else {
        return Err(malformed("expected a salted string".to_string()));
    };
    let mut parts = encoded.splitn(3, ':');
    let (Some(salt), Some(kind), Some(text)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(malformed("expected `<salt>:<kind>:<value>`".to_string()));
    };
    if salt.is_empty() {
        return Err(malformed("empty salt".to_string()));
    }
    let kind: LeafKind = kind.parse().map_err(|e: UnknownLeafKind| malformed(e.to_string()))?;
    let value = kind
        .parse_value(text)
        .ok_or_else(|| malformed(format!("`{text}` is not a {kind}")))?;
    Ok(InlineLeaf {
        salt,
        kind,
        text,
        value,
    })
}

fn payload(body: &Value) -> Result<&Value, DigestError> {
    body.get(DATA).ok_or(DigestError::MissingPayload("`data`"))
}

fn inline_leaves(data: &Value) -> Result<Vec<SaltedLeaf>, DigestError> {
    let mut leaves = Vec::new();
    visit_leaves(data, "", &mut |path, leaf| {
        if leaf.is_null() {
            return Ok(());
        }
        let parsed = parse_inline(path, leaf)?;
        leaves.push(SaltedLeaf {
            path: path.to_string(),
            salt: parsed.salt.to_string(),
            kind: parsed.kind,
            text: format!("{}:{}", parsed.kind, parsed.text),
        });
        Ok::<_, DigestError>(())
    })?;
    Ok(leaves)
}

impl Layout for DataWrapped {
    fn salt(
        &self,
        document: &Value,
        options: &WrapOptions,
        source: &mut dyn SaltSource,
    ) -> Result<SaltedDocument, AttestError> {
        if !document.is_object() {
            return Err(AttestError::InvalidDocument(
                "document must be a JSON object".to_string(),
            ));
        }
        let (data, salts) = salt_inline(document, source)?;
        let mut body = Map::new();
        body.insert(VERSION.to_string(), SchemaVersion::V2.tag().into());
        body.insert(DATA.to_string(), data);
        if let Some(schema) = &options.external_schema_id {
            body.insert(SCHEMA.to_string(), schema.as_str().into());
        }
        Ok(SaltedDocument::new(
            SchemaVersion::V2,
            Value::Object(body),
            salts,
            Vec::new(),
        ))
    }

    fn leaves(&self, salted: &SaltedDocument) -> Result<Vec<SaltedLeaf>, DigestError> {
        inline_leaves(payload(salted.body())?)
    }

    fn split(&self, document: &Value) -> Result<(SaltedDocument, Signature), AttestError> {
        let mut root = document.as_object().cloned().ok_or(AttestError::NotSigned)?;
        let signature = root.remove(SIGNATURE).ok_or(AttestError::NotSigned)?;
        let signature: Signature = serde_json::from_value(signature)?;
        if signature.salts.is_some() || signature.privacy.is_some() {
            return Err(AttestError::InvalidDocument(
                "data-wrapped signature carries inline-layout fields".to_string(),
            ));
        }
        let privacy: Privacy = match root.remove(PRIVACY) {
            Some(privacy) => serde_json::from_value(privacy)?,
            None => Privacy::default(),
        };
        let body = Value::Object(root);
        let salts = inline_leaves(payload(&body)?)?
            .iter()
            .map(SaltedLeaf::to_salt)
            .collect();
        Ok((
            SaltedDocument::new(SchemaVersion::V2, body, salts, privacy.obfuscated_data),
            signature,
        ))
    }

    fn join(&self, salted: &SaltedDocument, signature: Signature) -> Result<Value, AttestError> {
        let Value::Object(mut root) = salted.body().clone() else {
            return Err(AttestError::InvalidDocument(
                "salted body is not an object".to_string(),
            ));
        };
        root.insert(SIGNATURE.to_string(), serde_json::to_value(signature)?);
        if !salted.obfuscated().is_empty() {
            let privacy = Privacy {
                obfuscated_data: salted.obfuscated().to_vec(),
            };
            root.insert(PRIVACY.to_string(), serde_json::to_value(privacy)?);
        }
        Ok(Value::Object(root))
    }

    fn remove(&self, body: &Value, path: &FieldPath) -> Option<Value> {
        let pruned = path.without(body.get(DATA)?)?;
        let mut root = body.as_object()?.clone();
        root.insert(DATA.to_string(), pruned);
        Some(Value::Object(root))
    }

    fn data(&self, salted: &SaltedDocument) -> Result<Value, AttestError> {
        let data = payload(salted.body())?;
        let decoded = map_leaves(data, "", &mut |path, leaf| {
            if leaf.is_null() {
                return Ok(Value::Null);
            }
            parse_inline(path, leaf).map(|parsed| parsed.value)
        })?;
        Ok(decoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_salted_leaves() {
        let leaf = json!("s1:number:3.5");
        let parsed = parse_inline("a", &leaf).unwrap();
        assert_eq!(parsed.salt, "s1");
        assert_eq!(parsed.kind, LeafKind::Number);
        assert_eq!(parsed.value, json!(3.5));

        // Colons after the kind belong to the value.
        let leaf = json!("s1:string:12:30");
        assert_eq!(parse_inline("t", &leaf).unwrap().value, json!("12:30"));
    }

    #[test]
    fn rejects_malformed_leaves() {
        for bad in [
            json!("value1"),
            json!("s1:value1"),
            json!(":string:x"),
            json!("s1:date:2020"),
            json!("s1:boolean:yes"),
            json!(42),
        ] {
            assert!(
                matches!(parse_inline("a", &bad), Err(DigestError::MalformedLeaf { .. })),
                "{bad} accepted"
            );
        }
    }

    #[test]
    fn leaves_commit_kind_and_value() {
        let leaves = inline_leaves(&json!({"a": ["s1:boolean:true", null]})).unwrap();
        assert_eq!(leaves.len(), 1);
        assert_eq!(leaves[0].path, "a[0]");
        assert_eq!(leaves[0].text, "boolean:true");
    }

    #[test]
    fn remove_reaches_into_data() {
        let body = json!({"version": "attest/2.0", "data": {"a": "s:string:x", "b": "t:string:y"}});
        let path = FieldPath::parse("a").unwrap();
        let pruned = DataWrapped.remove(&body, &path).unwrap();
        assert_eq!(pruned, json!({"version": "attest/2.0", "data": {"b": "t:string:y"}}));
        assert!(DataWrapped.remove(&body, &FieldPath::parse("version").unwrap()).is_none());
    }
}
