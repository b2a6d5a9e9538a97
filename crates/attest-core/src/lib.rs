//! # attest-core — Foundational Types for Tamper-Evident Documents
//!
//! This crate is the leaf of the workspace DAG. It defines the primitives
//! every commitment in the engine is built from:
//!
//! 1. **`FieldPath`.** Structural addresses of the form `a.b[2].c`, parsed
//!    once and rendered canonically. Pure `get`/`without` transforms return
//!    new trees and never mutate the caller's value.
//!
//! 2. **`LeafKind`.** The three scalar kinds a document leaf may have
//!    (string, number, boolean), with the stringification rule that feeds
//!    every leaf commitment.
//!
//! 3. **`CanonicalBytes`.** ALL commitment inputs flow through
//!    `CanonicalBytes::new()` (RFC 8785 / JCS). Hash functions in
//!    `attest-crypto` that produce leaf commitments accept only
//!    `&CanonicalBytes`.
//!
//! 4. **`AttestError`.** The structured error hierarchy shared by the
//!    crates above this one.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `attest-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canonical;
pub mod error;
pub mod leaf;
pub mod path;

pub use canonical::CanonicalBytes;
pub use error::{AttestError, CanonicalizationError, PathError, UnknownLeafKind};
pub use leaf::LeafKind;
pub use path::{FieldPath, Segment};
