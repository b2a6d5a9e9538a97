//! Wrap configuration.

use serde::{Deserialize, Serialize};

use crate::layout::SchemaVersion;

/// Options for wrapping documents.
///
/// Deserializable so a host can load it from its own configuration:
///
/// ```json
/// { "version": "attest/3.0", "externalSchemaId": "https://example.com/schema.json" }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WrapOptions {
    /// Layout of the wrapped output.
    #[serde(default)]
    pub version: SchemaVersion,
    /// Opaque schema reference written to the `schema` field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_schema_id: Option<String>,
}

impl WrapOptions {
    /// Options for `version` with no schema reference.
    pub fn new(version: SchemaVersion) -> Self {
        Self {
            version,
            external_schema_id: None,
        }
    }

    /// Attach an external schema reference.
    pub fn with_schema(mut self, id: impl Into<String>) -> Self {
        self.external_schema_id = Some(id.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_to_data_wrapped_without_schema() {
        let options: WrapOptions = serde_json::from_value(json!({})).unwrap();
        assert_eq!(options, WrapOptions::default());
        assert_eq!(options.version, SchemaVersion::V2);
        assert!(options.external_schema_id.is_none());
    }

    #[test]
    fn loads_camel_case_fields() {
        let options: WrapOptions = serde_json::from_value(json!({
            "version": "attest/3.0",
            "externalSchemaId": "https://example.com/schema.json"
        }))
        .unwrap();
        assert_eq!(
            options,
            WrapOptions::new(SchemaVersion::V3).with_schema("https://example.com/schema.json")
        );
    }
}
