//! # Field Paths — Structural Addresses
//!
//! A field path addresses one node of a document tree: object keys are
//! joined with `.`, array positions are written `[index]`, and root keys
//! carry no prefix (`a.b[2].c`, `@context[0]`, `[1].name` for a root array).
//! Keys that are empty or contain `.`, `[` or `]` are written as a quoted
//! JSON string in brackets (`a["b.c"]`, `[""]`, `["https://schema.org/name"]`).
//!
//! Paths are produced by the salter as strings (see [`join_key`] and
//! [`join_index`]) and parsed back into [`FieldPath`] when a caller names
//! fields to redact. Parsing then rendering yields the canonical string, so
//! salt paths and redaction paths compare by string equality.
//!
//! The tree transforms here are pure: they take `&Value` and return a new
//! value, leaving the input untouched.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::error::PathError;

/// One step of a field path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Object member access.
    Key(String),
    /// Array element access.
    Index(usize),
}

/// A parsed structural address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: Vec<Segment>,
}

/// Returns `true` if `key` can appear bare in a path; other keys are quoted.
pub fn is_addressable_key(key: &str) -> bool {
    !key.is_empty() && !key.contains(['.', '[', ']'])
}

/// Append an object key to a rendered path.
pub fn join_key(prefix: &str, key: &str) -> String {
    if !is_addressable_key(key) {
        format!("{prefix}[{}]", quote(key))
    } else if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

fn quote(key: &str) -> String {
    Value::String(key.to_owned()).to_string()
}

/// Append an array index to a rendered path.
pub fn join_index(prefix: &str, index: usize) -> String {
    format!("{prefix}[{index}]")
}

/// Returns `true` if `path` equals `ancestor` or lies beneath it.
pub fn is_within(path: &str, ancestor: &str) -> bool {
    match path.strip_prefix(ancestor) {
        Some("") => true,
        Some(rest) => rest.starts_with('.') || rest.starts_with('['),
        None => false,
    }
}

impl FieldPath {
    /// Parse a rendered path.
    pub fn parse(input: &str) -> Result<Self, PathError> {
        if input.is_empty() {
            return Err(PathError::Empty);
        }
        let bytes = input.as_bytes();
        let malformed = |position: usize, reason: &'static str| PathError::Malformed {
            path: input.to_string(),
            position,
            reason,
        };

        let mut segments = Vec::new();
        let mut pos = 0;
        let mut expect_key = true;
        while pos < bytes.len() {
            match bytes[pos] {
                b'[' => {
                    if expect_key && !segments.is_empty() {
                        return Err(malformed(pos, "empty key"));
                    }
                    if bytes.get(pos + 1) == Some(&b'"') {
                        let end = closing_quote(bytes, pos + 2)
                            .ok_or_else(|| malformed(pos + 1, "unterminated quoted key"))?;
                        let key: String = serde_json::from_str(&input[pos + 1..=end])
                            .map_err(|_| malformed(pos + 1, "invalid quoted key"))?;
                        if bytes.get(end + 1) != Some(&b']') {
                            return Err(malformed(end + 1, "expected `]` after quoted key"));
                        }
                        segments.push(Segment::Key(key));
                        pos = end + 2;
                        expect_key = false;
                        continue;
                    }
                    let close = input[pos..]
                        .find(']')
                        .map(|off| pos + off)
                        .ok_or_else(|| malformed(pos, "unterminated array index"))?;
                    let digits = &input[pos + 1..close];
                    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                        return Err(malformed(pos + 1, "expected array index"));
                    }
                    let index = digits
                        .parse::<usize>()
                        .map_err(|_| malformed(pos + 1, "array index out of range"))?;
                    segments.push(Segment::Index(index));
                    pos = close + 1;
                    expect_key = false;
                }
                b'.' => {
                    if segments.is_empty() || expect_key {
                        return Err(malformed(pos, "empty key"));
                    }
                    pos += 1;
                    expect_key = true;
                    if pos == bytes.len() {
                        return Err(malformed(pos, "empty key"));
                    }
                }
                b']' => return Err(malformed(pos, "unexpected `]`")),
                _ => {
                    if !expect_key {
                        return Err(malformed(pos, "expected `.` or `[`"));
                    }
                    let end = input[pos..]
                        .find(['.', '[', ']'])
                        .map(|off| pos + off)
                        .unwrap_or(input.len());
                    segments.push(Segment::Key(input[pos..end].to_string()));
                    pos = end;
                    expect_key = false;
                }
            }
        }
        Ok(Self { segments })
    }

    /// The parsed segments, root first.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Return a copy of `root` with the addressed node removed, or `None`
    /// if the path does not resolve.
    ///
    /// Object members are deleted. Array elements are replaced with `null`
    /// so the addresses of their siblings stay stable.
    pub fn without(&self, root: &Value) -> Option<Value> {
        remove_at(root, &self.segments)
    }
}

/// Position of the `"` closing a JSON string literal whose body starts at `from`.
fn closing_quote(bytes: &[u8], from: usize) -> Option<usize> {
    let mut pos = from;
    while pos < bytes.len() {
        match bytes[pos] {
            b'\\' => pos += 2,
            b'"' => return Some(pos),
            _ => pos += 1,
        }
    }
    None
}

fn remove_at(node: &Value, segments: &[Segment]) -> Option<Value> {
    let (head, rest) = segments.split_first()?;
    match (head, node) {
        (Segment::Key(k), Value::Object(map)) => {
            let child = map.get(k)?;
            let mut out = map.clone();
            if rest.is_empty() {
                out.remove(k);
            } else {
                out.insert(k.clone(), remove_at(child, rest)?);
            }
            Some(Value::Object(out))
        }
        (Segment::Index(i), Value::Array(arr)) => {
            let child = arr.get(*i)?;
            let mut out = arr.clone();
            out[*i] = if rest.is_empty() {
                Value::Null
            } else {
                remove_at(child, rest)?
            };
            Some(Value::Array(out))
        }
        _ => None,
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, seg) in self.segments.iter().enumerate() {
            match seg {
                Segment::Key(k) if !is_addressable_key(k) => write!(f, "[{}]", quote(k))?,
                Segment::Key(k) if i == 0 => f.write_str(k)?,
                Segment::Key(k) => write!(f, ".{k}")?,
                Segment::Index(idx) => write!(f, "[{idx}]")?,
            }
        }
        Ok(())
    }
}

impl FromStr for FieldPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
