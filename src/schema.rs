//! Schema reflection seam.
//!
//! The generators never look at source text or compiler internals directly;
//! they ask a [`SchemaProvider`] which declarations carry a marker, whether a
//! declaration is a record, and what its fields are. [`crate::source`] is the
//! provider over Rust source files.
#[cfg(test)]
pub mod memory;

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// Identity of a declaration: its crate-absolute path (`crate::config::AppConfig`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TypeHandle(String);

/// A field's type as seen by the generators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRef {
    /// Spelling of the type that is valid from any module of the crate.
    pub text: String,
    /// Set when the type names a declaration known to the provider.
    pub handle: Option<TypeHandle>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: String,
    /// For optional fields this is the inner type, `T` of `Option<T>`.
    pub ty: TypeRef,
    pub nullable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub file: PathBuf,
    pub line: usize,
}

/// What the generators need to know about the declaration itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Simple name, `AppConfig`.
    pub name: String,
    /// Module path without the `crate` prefix, `config::nested`; empty at the crate root.
    pub namespace: String,
    /// Rendered visibility (`pub`, `pub(crate)`, or empty).
    pub visibility: String,
    pub location: Option<Location>,
}

/// Marker that selects a declaration for one kind of generated function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    Mergeable,
    NestedData,
}

pub trait SchemaProvider {
    /// Declarations carrying `marker`, in a stable order.
    fn marked_types(&self, marker: Marker) -> Vec<TypeHandle>;

    fn is_record(&self, ty: &TypeHandle) -> bool;

    /// `false` when the declaration mentions types that cannot be resolved in
    /// this pass yet.
    fn is_resolved(&self, ty: &TypeHandle) -> bool;

    /// Constructor fields in declaration order. Empty for non-record types.
    fn fields(&self, ty: &TypeHandle) -> Vec<FieldDescriptor>;

    /// `true` when code in module `namespace` (without the `crate` prefix)
    /// may name every field of `ty`.
    fn fields_visible_from(&self, ty: &TypeHandle, namespace: &str) -> bool;

    fn declaration(&self, ty: &TypeHandle) -> Option<Declaration>;
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl TypeHandle {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
    /// Last path segment.
    pub fn name(&self) -> &str {
        self.0.rsplit("::").next().unwrap_or(&self.0)
    }
}

impl fmt::Display for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TypeRef {
    /// A type that is not declared in the scanned sources.
    pub fn opaque(text: impl Into<String>) -> Self {
        Self { text: text.into(), handle: None }
    }
    /// A type declared in the scanned sources; its handle doubles as its spelling.
    pub fn declared(handle: TypeHandle) -> Self {
        Self { text: handle.as_str().to_string(), handle: Some(handle) }
    }
}

impl Marker {
    pub const ALL: [Marker; 2] = [Marker::Mergeable, Marker::NestedData];

    /// Name of the derive macro that carries the marker.
    pub fn derive_name(self) -> &'static str {
        match self {
            Marker::Mergeable => "Mergeable",
            Marker::NestedData => "NestedData",
        }
    }
    /// Suffix of generated file names, `<type>_<suffix>.rs`.
    pub fn file_suffix(self) -> &'static str {
        match self {
            Marker::Mergeable => "mergeable",
            Marker::NestedData => "nested_data",
        }
    }
    pub fn from_derive_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|marker| marker.derive_name() == name)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file.display(), self.line)
    }
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————
