//! # Verifier
//!
//! Recompute a signed document's target hash from its current state and
//! replay its inclusion proof against the stored root.
//!
//! Verification is a total predicate: a missing or malformed signature, an
//! unknown algorithm, a digest that cannot be rebuilt, a target-hash
//! mismatch and a proof that does not reach the root all yield `false`.
//! The reason is logged at `debug` level and never raised.

use attest_crypto::check_proof;
use serde_json::Value;

use crate::layout::SchemaVersion;

/// Returns `true` if `document` is unmodified since it was signed, up to
/// redaction.
pub fn verify_signature(document: &Value) -> bool {
    let version = SchemaVersion::detect(document);
    let (salted, signature) = match version.layout().split(document) {
        Ok(parts) => parts,
        Err(err) => {
            tracing::debug!(%version, error = %err, "rejected: unreadable signature");
            return false;
        }
    };

    let target_hash = match salted.target_hash() {
        Ok(hash) => hash,
        Err(err) => {
            tracing::debug!(%version, error = %err, "rejected: digest failed");
            return false;
        }
    };
    if target_hash != signature.target_hash {
        tracing::debug!(
            %version,
            computed = %target_hash,
            stored = %signature.target_hash,
            "rejected: target hash mismatch"
        );
        return false;
    }

    if !check_proof(&target_hash, &signature.proof, &signature.merkle_root) {
        tracing::debug!(
            %version,
            merkle_root = %signature.merkle_root,
            proof_len = signature.proof.len(),
            "rejected: proof does not reach merkle root"
        );
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::WrapOptions;
    use crate::wrap::wrap_document;
    use serde_json::json;

    fn both_versions() -> [WrapOptions; 2] {
        [
            WrapOptions::new(SchemaVersion::V2),
            WrapOptions::new(SchemaVersion::V3),
        ]
    }

    #[test]
    fn fresh_documents_verify() {
        for options in both_versions() {
            let wrapped = wrap_document(&json!({"a": [1, {"b": true}], "c": "d"}), &options).unwrap();
            assert!(verify_signature(&wrapped), "{}", options.version);
        }
    }

    #[test]
    fn unsigned_inputs_are_false() {
        assert!(!verify_signature(&json!(null)));
        assert!(!verify_signature(&json!({"data": {}})));
        assert!(!verify_signature(&json!({"version": "attest/3.0", "a": 1})));
        assert!(!verify_signature(&json!({"version": "attest/3.0", "proof": 7})));
    }

    #[test]
    fn unknown_algorithm_is_false() {
        let mut wrapped = wrap_document(&json!({"a": 1}), &WrapOptions::default()).unwrap();
        wrapped["signature"]["type"] = json!("SHA256MerkleProof");
        assert!(!verify_signature(&wrapped));
    }

    #[test]
    fn changed_value_is_false() {
        let mut wrapped =
            wrap_document(&json!({"a": 1}), &WrapOptions::new(SchemaVersion::V3)).unwrap();
        wrapped["a"] = json!(2);
        assert!(!verify_signature(&wrapped));
    }

    #[test]
    fn changed_version_tag_is_false() {
        let mut wrapped =
            wrap_document(&json!({"a": 1}), &WrapOptions::new(SchemaVersion::V3)).unwrap();
        wrapped["version"] = json!("attest/2.0");
        assert!(!verify_signature(&wrapped));
    }

    #[test]
    fn added_leaf_is_false() {
        let mut wrapped =
            wrap_document(&json!({"a": 1}), &WrapOptions::new(SchemaVersion::V3)).unwrap();
        wrapped["b"] = json!("extra");
        assert!(!verify_signature(&wrapped));

        let mut wrapped = wrap_document(&json!({"a": 1}), &WrapOptions::default()).unwrap();
        wrapped["data"]["b"] = json!("forged:string:extra");
        assert!(!verify_signature(&wrapped));
    }
}
