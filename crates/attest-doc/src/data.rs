//! Read the plain payload and salts back out of a signed document.

use attest_core::AttestError;
use serde_json::Value;

use crate::layout::SchemaVersion;
use crate::salt::Salt;

/// The payload without salting or signature.
///
/// For the data-wrapped layout this is `data` with every leaf decoded back
/// to its typed value. For the inline layout it is the document without
/// `proof.signature`. Redacted array elements read as `null`.
pub fn get_data(document: &Value) -> Result<Value, AttestError> {
    let layout = SchemaVersion::detect(document).layout();
    let (salted, _) = layout.split(document)?;
    layout.data(&salted)
}

/// Salts of the live leaves of a signed document, in traversal order.
pub fn salts_of(document: &Value) -> Result<Vec<Salt>, AttestError> {
    let layout = SchemaVersion::detect(document).layout();
    let (salted, _) = layout.split(document)?;
    Ok(salted.salts().to_vec())
}
