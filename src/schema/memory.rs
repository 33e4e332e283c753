//! In-memory schema for unit tests.
use indexmap::IndexMap;

use super::*;

#[derive(Debug, Default)]
pub struct MemorySchema {
    decls: IndexMap<TypeHandle, MemoryDecl>,
}

#[derive(Debug)]
struct MemoryDecl {
    record: bool,
    resolved: bool,
    /// Fields are private to the declaring module.
    private: bool,
    markers: Vec<Marker>,
    fields: Vec<FieldDescriptor>,
}

impl MemorySchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a record. Field types starting with `crate::` name declarations.
    pub fn record(mut self, path: &str, fields: &[(&str, &str, bool)]) -> Self {
        let fields = fields
            .iter()
            .map(|(name, ty, nullable)| FieldDescriptor {
                name: name.to_string(),
                ty: if ty.starts_with("crate::") {
                    TypeRef::declared(TypeHandle::new(*ty))
                } else {
                    TypeRef::opaque(*ty)
                },
                nullable: *nullable,
            })
            .collect();
        self.decls.insert(
            TypeHandle::new(path),
            MemoryDecl { record: true, resolved: true, private: false, markers: Vec::new(), fields },
        );
        self
    }

    /// Declares something that is not a record (an enum, a tuple struct).
    pub fn other(mut self, path: &str) -> Self {
        self.decls.insert(
            TypeHandle::new(path),
            MemoryDecl { record: false, resolved: true, private: false, markers: Vec::new(), fields: Vec::new() },
        );
        self
    }

    pub fn mark(mut self, path: &str, marker: Marker) -> Self {
        if let Some(decl) = self.decls.get_mut(&TypeHandle::new(path)) {
            decl.markers.push(marker);
        }
        self
    }

    pub fn private(mut self, path: &str) -> Self {
        if let Some(decl) = self.decls.get_mut(&TypeHandle::new(path)) {
            decl.private = true;
        }
        self
    }

    pub fn unresolved(mut self, path: &str) -> Self {
        if let Some(decl) = self.decls.get_mut(&TypeHandle::new(path)) {
            decl.resolved = false;
        }
        self
    }
}

impl SchemaProvider for MemorySchema {
    fn marked_types(&self, marker: Marker) -> Vec<TypeHandle> {
        self.decls
            .iter()
            .filter(|(_, decl)| decl.markers.contains(&marker))
            .map(|(handle, _)| handle.clone())
            .collect()
    }

    fn is_record(&self, ty: &TypeHandle) -> bool {
        self.decls.get(ty).is_some_and(|decl| decl.record)
    }

    fn is_resolved(&self, ty: &TypeHandle) -> bool {
        self.decls.get(ty).is_some_and(|decl| decl.resolved)
    }

    fn fields(&self, ty: &TypeHandle) -> Vec<FieldDescriptor> {
        match self.decls.get(ty) {
            Some(decl) if decl.record => decl.fields.clone(),
            _ => Vec::new(),
        }
    }

    fn fields_visible_from(&self, ty: &TypeHandle, namespace: &str) -> bool {
        self.decls.get(ty).is_some_and(|decl| !decl.private || namespace_of(ty) == namespace)
    }

    fn declaration(&self, ty: &TypeHandle) -> Option<Declaration> {
        self.decls.get(ty)?;
        let namespace = namespace_of(ty);
        Some(Declaration {
            name: ty.name().to_string(),
            namespace,
            visibility: "pub".to_string(),
            location: None,
        })
    }
}

fn namespace_of(ty: &TypeHandle) -> String {
    let path = ty.as_str().strip_prefix("crate::").unwrap_or(ty.as_str());
    path.rsplit_once("::").map(|(ns, _)| ns.to_string()).unwrap_or_default()
}
