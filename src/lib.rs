//! Compile-time generation of `merge` and `deep_copy` for plain records.
//!
//! Structs marked with `#[derive(Mergeable)]` get
//! `fn merge(&self, other: Option<&Self>) -> Self`, which fills their absent
//! optional fields from `other`. Structs marked with `#[derive(NestedData)]`
//! get a `<Name>Patch` struct with one override per field at any depth and
//! `fn deep_copy(&self, patch: <Name>Patch) -> Self`.
//!
//! Generation runs from a build script through [`Builder`], or from the
//! `record-synth` command line.
pub mod builder;
pub mod diag;
pub mod error;
pub mod inputs;
pub mod params;
pub mod processor;
pub mod schema;
pub mod sink;
pub mod source;
pub mod synth;
pub mod tree;

pub use builder::Builder;
pub use error::{Error, Result};
pub use processor::{Report, generate};
pub use schema::{Marker, SchemaProvider, TypeHandle};
