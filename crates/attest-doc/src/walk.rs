//! Depth-first traversal of document trees.
//!
//! Arrays descend with `[index]`, objects with `.key` (root keys bare, and
//! reserved keys quoted as `["key"]`).
//! Everything that is not a container is handed to the visitor as a leaf,
//! `null` included; the caller decides whether a leaf is acceptable.

use attest_core::path::{join_index, join_key};
use serde_json::{Map, Value};

/// Visit every leaf of `value` with its rendered path.
pub(crate) fn visit_leaves<E, F>(value: &Value, prefix: &str, visit: &mut F) -> Result<(), E>
where
    F: FnMut(&str, &Value) -> Result<(), E>,
{
    match value {
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                visit_leaves(item, &join_index(prefix, i), visit)?;
            }
            Ok(())
        }
        Value::Object(map) => {
            for (key, item) in map {
                visit_leaves(item, &join_key(prefix, key), visit)?;
            }
            Ok(())
        }
        leaf => visit(prefix, leaf),
    }
}

/// Rebuild `value` with every leaf replaced by `f(path, leaf)`.
pub(crate) fn map_leaves<E, F>(value: &Value, prefix: &str, f: &mut F) -> Result<Value, E>
where
    F: FnMut(&str, &Value) -> Result<Value, E>,
{
    match value {
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| map_leaves(item, &join_index(prefix, i), f))
            .collect::<Result<Vec<_>, E>>()
            .map(Value::Array),
        Value::Object(map) => {
            let mut out = Map::new();
            for (key, item) in map {
                out.insert(key.clone(), map_leaves(item, &join_key(prefix, key), f)?);
            }
            Ok(Value::Object(out))
        }
        leaf => f(prefix, leaf),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::convert::Infallible;

    #[test]
    fn visits_leaves_with_paths() {
        let doc = json!({
            "key1": "value1",
            "key2": {"key2-1": "v", "key2-3": ["a", "b"]},
            "key3": [1, true, null]
        });
        let mut seen = Vec::new();
        visit_leaves::<Infallible, _>(&doc, "", &mut |path, leaf| {
            seen.push((path.to_string(), leaf.clone()));
            Ok(())
        })
        .unwrap();
        let paths: Vec<&str> = seen.iter().map(|(p, _)| p.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "key1",
                "key2.key2-1",
                "key2.key2-3[0]",
                "key2.key2-3[1]",
                "key3[0]",
                "key3[1]",
                "key3[2]",
            ]
        );
        assert_eq!(seen[6].1, Value::Null);
    }

    #[test]
    fn empty_containers_have_no_leaves() {
        let mut count = 0;
        visit_leaves::<Infallible, _>(&json!({"a": {}, "b": []}), "", &mut |_, _| {
            count += 1;
            Ok(())
        })
        .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn reserved_keys_get_quoted_paths() {
        let doc = json!({"a": {"b.c": 1}, "": "e", "https://schema.org/name": "n"});
        let mut paths = Vec::new();
        visit_leaves::<Infallible, _>(&doc, "", &mut |path, _| {
            paths.push(path.to_string());
            Ok(())
        })
        .unwrap();
        assert_eq!(paths, vec![r#"[""]"#, r#"a["b.c"]"#, r#"["https://schema.org/name"]"#]);
    }

    #[test]
    fn map_leaves_preserves_structure() {
        let doc = json!({"a": [1, {"b": "x"}], "c": {}});
        let out = map_leaves::<Infallible, _>(&doc, "", &mut |path, _| Ok(Value::String(path.into())))
            .unwrap();
        assert_eq!(out, json!({"a": ["a[0]", {"b": "a[1].b"}], "c": {}}));
    }
}
