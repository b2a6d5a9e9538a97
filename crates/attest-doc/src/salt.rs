//! # Salter
//!
//! Assigns a fresh random token to every leaf of a document tree and
//! records it with the leaf's structural path and scalar kind.
//!
//! The token source is injected through [`SaltSource`] so tests can supply
//! deterministic tokens. Every token must be non-empty, free of `:` (the
//! separator inside commitment inputs) and unique within the document.
//!
//! Values that cannot be committed to (`null`) abort salting with
//! `AttestError::UnsaltableValue`. They are never skipped.

use std::collections::HashSet;

use attest_core::leaf::describe;
use attest_core::{AttestError, LeafKind};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::walk::{map_leaves, visit_leaves};

/// A leaf's salt: random token, structural address and scalar kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Salt {
    /// The random token.
    pub value: String,
    /// Structural address of the leaf (`a.b[2].c`).
    pub path: String,
    /// Scalar kind of the leaf at wrap time.
    pub kind: LeafKind,
}

/// Source of salt tokens.
pub trait SaltSource {
    /// Produce the next token.
    fn next_salt(&mut self) -> String;
}

/// Random UUID v4 tokens.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidSaltSource;

impl SaltSource for UuidSaltSource {
    fn next_salt(&mut self) -> String {
        Uuid::new_v4().to_string()
    }
}

impl<F: FnMut() -> String> SaltSource for F {
    fn next_salt(&mut self) -> String {
        self()
    }
}

/// Draws tokens for one document and enforces the token invariants.
struct Salter<'a> {
    source: &'a mut dyn SaltSource,
    seen: HashSet<String>,
    salts: Vec<Salt>,
}

impl<'a> Salter<'a> {
    fn new(source: &'a mut dyn SaltSource) -> Self {
        Self {
            source,
            seen: HashSet::new(),
            salts: Vec::new(),
        }
    }

    fn salt_leaf(&mut self, path: &str, leaf: &Value) -> Result<Salt, AttestError> {
        let kind = LeafKind::of(leaf).ok_or_else(|| AttestError::UnsaltableValue {
            path: path.to_string(),
            found: describe(leaf),
        })?;
        let token = self.source.next_salt();
        if token.is_empty() || token.contains(':') {
            return Err(AttestError::InvalidSalt(format!(
                "token {token:?} for `{path}` must be non-empty and contain no `:`"
            )));
        }
        if !self.seen.insert(token.clone()) {
            return Err(AttestError::InvalidSalt(format!(
                "token {token:?} reused at `{path}`"
            )));
        }
        let salt = Salt {
            value: token,
            path: path.to_string(),
            kind,
        };
        self.salts.push(salt.clone());
        Ok(salt)
    }
}

/// Salt every leaf of `document`, leaving its values untouched.
///
/// Returns the salts in traversal order.
pub fn salt_leaves(document: &Value, source: &mut dyn SaltSource) -> Result<Vec<Salt>, AttestError> {
    let mut salter = Salter::new(source);
    visit_leaves(document, "", &mut |path, leaf| {
        salter.salt_leaf(path, leaf).map(|_| ())
    })?;
    Ok(salter.salts)
}

/// Salt every leaf of `document`, substituting each leaf in place with
/// `"<salt>:<kind>:<value>"`.
///
/// Returns the substituted tree and the salts in traversal order.
pub fn salt_inline(
    document: &Value,
    source: &mut dyn SaltSource,
) -> Result<(Value, Vec<Salt>), AttestError> {
    let mut salter = Salter::new(source);
    let salted = map_leaves(document, "", &mut |path, leaf| {
        let salt = salter.salt_leaf(path, leaf)?;
        let text = attest_core::leaf::stringify(leaf).unwrap_or_default();
        Ok::<_, AttestError>(Value::String(format!("{}:{}:{}", salt.value, salt.kind, text)))
    })?;
    Ok((salted, salter.salts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn counter() -> impl FnMut() -> String {
        let mut n = 0;
        move || {
            n += 1;
            format!("salt-{n}")
        }
    }

    #[test]
    fn salts_every_leaf_once() {
        let doc = json!({
            "key1": "value1",
            "key2": {"key2-1": "value2-1", "key2-3": ["a", "b", "c"]},
            "key3": ["x", "y"]
        });
        let mut source = counter();
        let salts = salt_leaves(&doc, &mut source).unwrap();
        let paths: Vec<&str> = salts.iter().map(|s| s.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "key1",
                "key2.key2-1",
                "key2.key2-3[0]",
                "key2.key2-3[1]",
                "key2.key2-3[2]",
                "key3[0]",
                "key3[1]",
            ]
        );
        assert!(salts.iter().all(|s| s.kind == LeafKind::String));
    }

    #[test]
    fn records_scalar_kinds() {
        let salts = salt_leaves(&json!({"n": 3.5, "b": false, "s": "x"}), &mut counter()).unwrap();
        let kinds: Vec<LeafKind> = salts.iter().map(|s| s.kind).collect();
        assert_eq!(kinds, vec![LeafKind::Boolean, LeafKind::Number, LeafKind::String]);
    }

    #[test]
    fn uuid_tokens_are_fresh() {
        let doc = json!({"a": "x", "b": "x"});
        let first = salt_leaves(&doc, &mut UuidSaltSource).unwrap();
        let second = salt_leaves(&doc, &mut UuidSaltSource).unwrap();
        assert_ne!(first[0].value, first[1].value);
        assert_ne!(first[0].value, second[0].value);
        assert_eq!(first[0].value.len(), 36);
    }

    #[test]
    fn null_is_unsaltable() {
        let err = salt_leaves(&json!({"a": {"b": null}}), &mut counter()).unwrap_err();
        match err {
            AttestError::UnsaltableValue { path, found } => {
                assert_eq!(path, "a.b");
                assert_eq!(found, "null");
            }
            other => panic!("expected UnsaltableValue, got {other}"),
        }
    }

    #[test]
    fn reserved_keys_are_salted_with_quoted_paths() {
        let salts = salt_leaves(&json!({"a.b": 1, "m[0]": {"": true}}), &mut counter()).unwrap();
        let paths: Vec<&str> = salts.iter().map(|s| s.path.as_str()).collect();
        assert_eq!(paths, vec![r#"["a.b"]"#, r#"["m[0]"][""]"#]);
    }

    #[test]
    fn repeated_or_malformed_tokens_are_rejected() {
        let mut fixed = || "same".to_string();
        let err = salt_leaves(&json!({"a": 1, "b": 2}), &mut fixed).unwrap_err();
        assert!(matches!(err, AttestError::InvalidSalt(_)));

        let mut colon = || "a:b".to_string();
        let err = salt_leaves(&json!({"a": 1}), &mut colon).unwrap_err();
        assert!(matches!(err, AttestError::InvalidSalt(_)));
    }

    #[test]
    fn inline_substitution_encodes_kind() {
        let (salted, salts) =
            salt_inline(&json!({"k": ["v", 2, true]}), &mut counter()).unwrap();
        assert_eq!(
            salted,
            json!({"k": ["salt-1:string:v", "salt-2:number:2", "salt-3:boolean:true"]})
        );
        assert_eq!(salts.len(), 3);
    }
}
