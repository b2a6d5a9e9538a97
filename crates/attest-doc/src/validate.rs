//! # External Validator Seam
//!
//! The engine never judges a document's shape. Hosts that do (JSON Schema,
//! credential-context checks) plug in through [`DocumentValidator`], and the
//! `*_validated` wrap entry points run it over each wrapped output.

use attest_core::AttestError;
use serde_json::Value;

/// A structural validator supplied by the host.
pub trait DocumentValidator {
    /// Structural errors found in `document`; empty when it is acceptable.
    fn validate(&self, document: &Value) -> Vec<String>;
}

impl<F: Fn(&Value) -> Vec<String>> DocumentValidator for F {
    fn validate(&self, document: &Value) -> Vec<String> {
        self(document)
    }
}

/// Returns `true` if `validator` reports no errors for `document`.
pub fn validate_schema<V: DocumentValidator + ?Sized>(document: &Value, validator: &V) -> bool {
    validator.validate(document).is_empty()
}

/// Pass `document` through, or fail with the validator's errors.
pub(crate) fn ensure_valid<V: DocumentValidator + ?Sized>(
    document: Value,
    validator: &V,
) -> Result<Value, AttestError> {
    let errors = validator.validate(&document);
    if errors.is_empty() {
        Ok(document)
    } else {
        tracing::debug!(errors = errors.len(), "validator rejected wrapped document");
        Err(AttestError::SchemaViolation {
            errors,
            document: Box::new(document),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn requires_name(doc: &Value) -> Vec<String> {
        if doc.get("name").is_some() {
            Vec::new()
        } else {
            vec!["missing required property `name`".to_string()]
        }
    }

    #[test]
    fn closures_are_validators() {
        assert!(validate_schema(&json!({"name": "x"}), &requires_name));
        assert!(!validate_schema(&json!({}), &requires_name));
    }

    #[test]
    fn violation_carries_document_and_errors() {
        let err = ensure_valid(json!({"age": 3}), &requires_name).unwrap_err();
        match err {
            AttestError::SchemaViolation { errors, document } => {
                assert_eq!(errors.len(), 1);
                assert_eq!(*document, json!({"age": 3}));
            }
            other => panic!("expected SchemaViolation, got {other}"),
        }
    }
}
