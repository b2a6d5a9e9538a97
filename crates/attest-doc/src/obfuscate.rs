//! # Obfuscator
//!
//! Remove fields from a signed document while keeping it verifiable
//! against its original signature.
//!
//! Each live leaf at or beneath a redaction path is re-encoded as an
//! [`ObfuscationRecord`] appended to the document's obfuscated data, then
//! the node is removed (array elements become `null` placeholders) and its
//! salts dropped. `targetHash`, `proof` and `merkleRoot` are never touched.
//!
//! Redaction is pure, monotonic and order-stable: redacting `[a]` then
//! `[b]` equals redacting `[a, b]`. A path that names nothing is a no-op.

use attest_core::path::is_within;
use attest_core::{AttestError, FieldPath};
use serde_json::Value;

use crate::digest::ObfuscationRecord;
use crate::layout::{Layout, SaltedDocument, SchemaVersion};

/// Redact every field in `fields` from `document`.
///
/// # Errors
///
/// Fails if the document carries no readable signature, a path does not
/// parse, or a path is one the layout cannot redact.
pub fn obfuscate_document<S: AsRef<str>>(
    document: &Value,
    fields: &[S],
) -> Result<Value, AttestError> {
    let layout = SchemaVersion::detect(document).layout();
    let (mut salted, signature) = layout.split(document)?;
    let before = salted.obfuscated().len();

    for field in fields {
        let path = FieldPath::parse(field.as_ref())?;
        layout.check_redactable(&path)?;
        redact(layout, &mut salted, &path)?;
    }

    tracing::debug!(
        fields = fields.len(),
        records_appended = salted.obfuscated().len() - before,
        "redacted document"
    );
    layout.join(&salted, signature)
}

/// Redact a single field.
pub fn obfuscate_field(document: &Value, field: &str) -> Result<Value, AttestError> {
    obfuscate_document(document, &[field])
}

fn redact(
    layout: &dyn Layout,
    salted: &mut SaltedDocument,
    path: &FieldPath,
) -> Result<(), AttestError> {
    let rendered = path.to_string();
    let Some(body) = layout.remove(salted.body(), path) else {
        tracing::warn!(path = %rendered, "redaction path not present; nothing to do");
        return Ok(());
    };

    let leaves = salted.leaves()?;
    for leaf in leaves.iter().filter(|leaf| is_within(&leaf.path, &rendered)) {
        salted.push_record(ObfuscationRecord::from_leaf(leaf)?);
    }
    salted.retain_salts(|salt| !is_within(&salt.path, &rendered));
    salted.set_body(body);
    Ok(())
}
