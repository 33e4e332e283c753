//! Schema provider over Rust source files.
//!
//! Every scanned file is parsed with `syn` and mapped to a module path from its
//! location under the source root (`src/config.rs` → `config`,
//! `src/io/mod.rs` → `io`, `src/lib.rs` → the crate root). Inline `mod`
//! blocks open nested modules. Each module keeps the names it declares and the
//! names it imports, which is enough to spell any field type from any other
//! module of the crate.
mod resolve;

use std::path::{Path, PathBuf};

use indexmap::{IndexMap, IndexSet};
use syn::ext::IdentExt;
use syn::punctuated::Punctuated;
use syn::{Attribute, Fields, Item, Token, UseTree, Visibility};

use crate::error::{Error, Result};
use crate::schema::{Declaration, FieldDescriptor, Location, Marker, SchemaProvider, TypeHandle, TypeRef};
use resolve::Resolver;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Default)]
pub struct SourceSchema {
    /// Keyed by module path without the `crate` prefix; `""` is the root.
    modules: IndexMap<String, Scope>,
    decls: IndexMap<TypeHandle, Decl>,
    files: Vec<PathBuf>,
}

/// Names visible in one module.
#[derive(Debug, Default)]
struct Scope {
    /// Module path without the `crate` prefix.
    path: Vec<String>,
    /// Type-namespace items declared here (structs, enums, unions, aliases, traits).
    items: IndexSet<String>,
    /// Child modules declared here.
    modules: IndexSet<String>,
    /// Imported name → absolute path. External paths keep their own root;
    /// a leading `""` segment stands for a leading `::`.
    uses: IndexMap<String, Vec<String>>,
    /// Bases of glob imports.
    globs: Vec<Vec<String>>,
}

#[derive(Debug)]
struct Decl {
    name: String,
    module: Vec<String>,
    file: PathBuf,
    line: usize,
    visibility: String,
    markers: Vec<Marker>,
    shape: Shape,
}

#[derive(Debug)]
enum Shape {
    /// Non-generic struct with named fields.
    Record(Vec<syn::Field>),
    Other,
}

// ————————————————————————————————————————————————————————————————————————————
// LOADING
// ————————————————————————————————————————————————————————————————————————————

impl SourceSchema {
    /// Parses `files`, all of which are expected to live under `root`.
    /// Files outside `root` have no module path and are skipped.
    pub fn load(root: &Path, files: &[PathBuf]) -> Result<Self> {
        let mut schema = Self::default();
        for file in files {
            let Some(module) = module_path(root, file) else {
                continue;
            };
            let text = std::fs::read_to_string(file).map_err(|source| Error::Read {
                path: file.clone(),
                source,
            })?;
            schema.add_source(&module, file, &text)?;
        }
        Ok(schema)
    }

    /// Adds one file's worth of items as module `module` (`["config"]`).
    pub fn add_source(&mut self, module: &[String], file: &Path, text: &str) -> Result<()> {
        let parsed = syn::parse_file(text).map_err(|source| Error::Parse {
            path: file.to_path_buf(),
            source,
        })?;
        self.files.push(file.to_path_buf());
        self.add_items(module, file, &parsed.items);
        Ok(())
    }

    /// Files read so far, in load order.
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    fn add_items(&mut self, module: &[String], file: &Path, items: &[Item]) {
        let mut scope = Scope { path: module.to_vec(), ..Scope::default() };
        let mut imports = Vec::new();

        for item in items {
            match item {
                Item::Struct(item) => {
                    scope.items.insert(item.ident.unraw().to_string());
                    let record = matches!(item.fields, Fields::Named(_)) && item.generics.params.is_empty();
                    let shape = if record {
                        Shape::Record(item.fields.iter().cloned().collect())
                    } else {
                        Shape::Other
                    };
                    self.add_decl(module, file, &item.ident, &item.vis, &item.attrs, shape);
                }
                Item::Enum(item) => {
                    scope.items.insert(item.ident.unraw().to_string());
                    self.add_decl(module, file, &item.ident, &item.vis, &item.attrs, Shape::Other);
                }
                Item::Union(item) => {
                    scope.items.insert(item.ident.unraw().to_string());
                    self.add_decl(module, file, &item.ident, &item.vis, &item.attrs, Shape::Other);
                }
                Item::Type(item) => {
                    scope.items.insert(item.ident.unraw().to_string());
                }
                Item::Trait(item) => {
                    scope.items.insert(item.ident.unraw().to_string());
                }
                Item::Mod(item) => {
                    let name = item.ident.unraw().to_string();
                    scope.modules.insert(name.clone());
                    if let Some((_, inner)) = &item.content {
                        let mut child = module.to_vec();
                        child.push(name);
                        self.add_items(&child, file, inner);
                    }
                }
                Item::Use(item) => {
                    let root = if item.leading_colon.is_some() { vec![String::new()] } else { Vec::new() };
                    collect_use(&item.tree, root, &mut imports);
                }
                _ => {}
            }
        }

        // Imports are resolved once every local name of the module is known.
        for import in imports {
            match import {
                Import::Name(alias, path) => {
                    let path = resolve::absolutize_import(&scope, &path);
                    scope.uses.insert(alias, path);
                }
                Import::Glob(base) => {
                    let base = resolve::absolutize_import(&scope, &base);
                    scope.globs.push(base);
                }
            }
        }

        self.modules.insert(module.join("::"), scope);
    }

    fn add_decl(
        &mut self,
        module: &[String],
        file: &Path,
        ident: &syn::Ident,
        vis: &Visibility,
        attrs: &[Attribute],
        shape: Shape,
    ) {
        let name = ident.unraw().to_string();
        let handle = TypeHandle::new(absolute(module, &name).join("::"));
        self.decls.insert(
            handle,
            Decl {
                name,
                module: module.to_vec(),
                file: file.to_path_buf(),
                line: ident.span().start().line,
                visibility: render_visibility(vis),
                markers: markers(attrs),
                shape,
            },
        );
    }

    /// Canonical path of the item an absolute path names, following
    /// re-exports. `None` when no scanned module provides it.
    fn lookup(&self, path: &[String]) -> Option<Vec<String>> {
        self.lookup_depth(path, 0)
    }

    fn lookup_depth(&self, path: &[String], depth: usize) -> Option<Vec<String>> {
        const MAX_REEXPORT_DEPTH: usize = 16;
        if depth > MAX_REEXPORT_DEPTH {
            return None;
        }
        let (name, module) = path.split_last()?;
        let (krate, module) = module.split_first()?;
        if krate != "crate" {
            // Re-export of an external item.
            return (depth > 0).then(|| path.to_vec());
        }
        let scope = self.modules.get(&module.join("::"))?;
        if scope.items.contains(name) {
            return Some(path.to_vec());
        }
        if let Some(target) = scope.uses.get(name) {
            return self.lookup_depth(target, depth + 1);
        }
        scope.globs.iter().filter(|base| base.first().is_some_and(|root| root == "crate")).find_map(|base| {
            let mut candidate = base.clone();
            candidate.push(name.clone());
            self.lookup_depth(&candidate, depth + 1)
        })
    }

    /// `true` for `crate::a::b` when module `a::b` was scanned.
    fn has_module(&self, path: &[String]) -> bool {
        path.split_first()
            .is_some_and(|(krate, module)| krate == "crate" && self.modules.contains_key(&module.join("::")))
    }

    fn resolver(&self, decl: &Decl) -> Option<Resolver<'_>> {
        let scope = self.modules.get(&decl.module.join("::"))?;
        Some(Resolver::new(self, scope, absolute(&decl.module, &decl.name)))
    }

    /// Handle of the declaration an absolute path names, if it is one.
    fn declared(&self, path: &[String]) -> Option<TypeHandle> {
        let canonical = self.lookup(path)?;
        let handle = TypeHandle::new(canonical.join("::"));
        self.decls.contains_key(&handle).then_some(handle)
    }
}

// ————————————————————————————————————————————————————————————————————————————
// SCHEMA PROVIDER
// ————————————————————————————————————————————————————————————————————————————

impl SchemaProvider for SourceSchema {
    fn marked_types(&self, marker: Marker) -> Vec<TypeHandle> {
        self.decls
            .iter()
            .filter(|(_, decl)| decl.markers.contains(&marker))
            .map(|(handle, _)| handle.clone())
            .collect()
    }

    fn is_record(&self, ty: &TypeHandle) -> bool {
        matches!(self.decls.get(ty), Some(Decl { shape: Shape::Record(_), .. }))
    }

    fn is_resolved(&self, ty: &TypeHandle) -> bool {
        let Some(decl) = self.decls.get(ty) else {
            return false;
        };
        let Shape::Record(fields) = &decl.shape else {
            return true;
        };
        let Some(resolver) = self.resolver(decl) else {
            return false;
        };
        let mut missing = Vec::new();
        for field in fields {
            resolver.unresolved(&field.ty, &mut missing);
        }
        missing.is_empty()
    }

    fn fields(&self, ty: &TypeHandle) -> Vec<FieldDescriptor> {
        let Some(decl) = self.decls.get(ty) else {
            return Vec::new();
        };
        let Shape::Record(fields) = &decl.shape else {
            return Vec::new();
        };
        let Some(resolver) = self.resolver(decl) else {
            return Vec::new();
        };
        fields
            .iter()
            .filter_map(|field| {
                let name = field.ident.as_ref()?.unraw().to_string();
                let (nullable, ty) = match resolve::option_inner(&field.ty) {
                    Some(inner) => (true, inner),
                    None => (false, &field.ty),
                };
                let ty = match resolver.plain_path(ty).and_then(|path| self.declared(&path)) {
                    Some(handle) => TypeRef::declared(handle),
                    None => TypeRef::opaque(resolver.render(ty)),
                };
                Some(FieldDescriptor { name, ty, nullable })
            })
            .collect()
    }

    fn fields_visible_from(&self, ty: &TypeHandle, namespace: &str) -> bool {
        let Some(Decl { module, shape: Shape::Record(fields), .. }) = self.decls.get(ty) else {
            return false;
        };
        let from: Vec<&str> = namespace.split("::").filter(|segment| !segment.is_empty()).collect();
        fields.iter().all(|field| match visible_within(&field.vis, module) {
            None => true,
            Some(within) => {
                within.len() <= from.len() && within.iter().zip(&from).all(|(a, b)| a.as_str() == *b)
            }
        })
    }

    fn declaration(&self, ty: &TypeHandle) -> Option<Declaration> {
        let decl = self.decls.get(ty)?;
        Some(Declaration {
            name: decl.name.clone(),
            namespace: decl.module.join("::"),
            visibility: decl.visibility.clone(),
            location: Some(Location { file: decl.file.clone(), line: decl.line }),
        })
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

/// Module path of `file` relative to the source root, `None` outside of it.
pub fn module_path(root: &Path, file: &Path) -> Option<Vec<String>> {
    let relative = file.strip_prefix(root).ok()?;
    let mut segments = relative
        .components()
        .map(|component| component.as_os_str().to_str().map(str::to_string))
        .collect::<Option<Vec<_>>>()?;
    let last = segments.pop()?;
    let stem = last.strip_suffix(".rs")?;
    match stem {
        "mod" => {}
        "lib" | "main" if segments.is_empty() => {}
        other => segments.push(other.to_string()),
    }
    Some(segments)
}

/// `crate`, then the module path, then `name`.
fn absolute(module: &[String], name: &str) -> Vec<String> {
    let mut path = Vec::with_capacity(module.len() + 2);
    path.push("crate".to_string());
    path.extend(module.iter().cloned());
    path.push(name.to_string());
    path
}

/// Markers among the `#[derive(..)]` attributes, matched on the last path
/// segment so both `NestedData` and `record_synth_macros::NestedData` count.
fn markers(attrs: &[Attribute]) -> Vec<Marker> {
    attrs
        .iter()
        .filter(|attr| attr.path().is_ident("derive"))
        .filter_map(|attr| {
            attr.parse_args_with(Punctuated::<syn::Path, Token![,]>::parse_terminated).ok()
        })
        .flatten()
        .filter_map(|path| {
            let last = path.segments.last()?;
            Marker::from_derive_name(&last.ident.to_string())
        })
        .collect()
}

fn render_visibility(vis: &Visibility) -> String {
    match vis {
        Visibility::Public(_) => "pub".to_string(),
        Visibility::Restricted(restricted) => {
            let path = restricted
                .path
                .segments
                .iter()
                .map(|segment| segment.ident.to_string())
                .collect::<Vec<_>>()
                .join("::");
            if restricted.in_token.is_some() {
                format!("pub(in {path})")
            } else {
                format!("pub({path})")
            }
        }
        Visibility::Inherited => String::new(),
    }
}

/// Module (without the `crate` prefix) whose subtree may name an item with
/// visibility `vis` declared in `module`; `None` for the whole crate.
fn visible_within(vis: &Visibility, module: &[String]) -> Option<Vec<String>> {
    let Visibility::Restricted(restricted) = vis else {
        return match vis {
            Visibility::Public(_) => None,
            _ => Some(module.to_vec()),
        };
    };
    let mut within = module.to_vec();
    for (index, segment) in restricted.path.segments.iter().enumerate() {
        match segment.ident.to_string().as_str() {
            "crate" if index == 0 => within.clear(),
            "self" if index == 0 => {}
            "super" => {
                within.pop();
            }
            other => within.push(other.to_string()),
        }
    }
    (!within.is_empty()).then_some(within)
}

enum Import {
    /// Local name and the path as written.
    Name(String, Vec<String>),
    Glob(Vec<String>),
}

fn collect_use(tree: &UseTree, prefix: Vec<String>, out: &mut Vec<Import>) {
    match tree {
        UseTree::Path(path) => {
            let mut prefix = prefix;
            prefix.push(path.ident.to_string());
            collect_use(&path.tree, prefix, out);
        }
        UseTree::Name(name) => {
            if name.ident == "self" {
                if let Some(last) = prefix.last() {
                    out.push(Import::Name(last.clone(), prefix.clone()));
                }
            } else {
                let mut path = prefix;
                path.push(name.ident.to_string());
                out.push(Import::Name(name.ident.unraw().to_string(), path));
            }
        }
        UseTree::Rename(rename) => {
            let mut path = prefix;
            if rename.ident != "self" {
                path.push(rename.ident.to_string());
            }
            if rename.rename != "_" {
                out.push(Import::Name(rename.rename.unraw().to_string(), path));
            }
        }
        UseTree::Glob(_) => out.push(Import::Glob(prefix)),
        UseTree::Group(group) => {
            for item in &group.items {
                collect_use(item, prefix.clone(), out);
            }
        }
    }
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;

    fn schema(sources: &[(&str, &str)]) -> SourceSchema {
        let mut schema = SourceSchema::default();
        for (module, text) in sources {
            let module: Vec<String> = if module.is_empty() {
                Vec::new()
            } else {
                module.split("::").map(str::to_string).collect()
            };
            let file = PathBuf::from(format!("src/{}.rs", if module.is_empty() { "lib".to_string() } else { module.join("/") }));
            schema.add_source(&module, &file, text).unwrap();
        }
        schema
    }

    fn field<'a>(fields: &'a [FieldDescriptor], name: &str) -> &'a FieldDescriptor {
        fields.iter().find(|field| field.name == name).unwrap()
    }

    #[test]
    fn module_paths_follow_file_layout() {
        let root = Path::new("src");
        let path = |file: &str| module_path(root, Path::new(file));
        assert_eq!(path("src/lib.rs"), Some(vec![]));
        assert_eq!(path("src/main.rs"), Some(vec![]));
        assert_eq!(path("src/config.rs"), Some(vec!["config".to_string()]));
        assert_eq!(path("src/io/mod.rs"), Some(vec!["io".to_string()]));
        assert_eq!(path("src/io/lib.rs"), Some(vec!["io".to_string(), "lib".to_string()]));
        assert_eq!(path("other/x.rs"), None);
        assert_eq!(path("src/notes.txt"), None);
    }

    #[test]
    fn finds_marked_declarations() {
        let schema = schema(&[("", r#"
            #[derive(Clone, Mergeable)]
            pub struct Person { pub name: Option<String> }

            #[derive(record_synth_macros::NestedData, Mergeable)]
            pub(crate) struct Config { id: u32 }

            #[derive(NestedData)]
            pub enum Mode { A, B }

            #[derive(Clone)]
            pub struct Plain { x: i32 }
        "#)]);

        let merge = schema.marked_types(Marker::Mergeable);
        assert_eq!(merge, [TypeHandle::new("crate::Person"), TypeHandle::new("crate::Config")]);
        let nested = schema.marked_types(Marker::NestedData);
        assert_eq!(nested, [TypeHandle::new("crate::Config"), TypeHandle::new("crate::Mode")]);

        assert!(schema.is_record(&TypeHandle::new("crate::Config")));
        assert!(!schema.is_record(&TypeHandle::new("crate::Mode")));
        assert!(schema.fields(&TypeHandle::new("crate::Mode")).is_empty());

        let decl = schema.declaration(&TypeHandle::new("crate::Config")).unwrap();
        assert_eq!(decl.visibility, "pub(crate)");
        assert_eq!(decl.namespace, "");
        assert_eq!(decl.location.unwrap().line, 6);
    }

    #[test]
    fn tuple_unit_and_generic_structs_are_not_records() {
        let schema = schema(&[("", r#"
            pub struct Tuple(u8);
            pub struct Unit;
            pub struct Generic<T> { value: T }
            pub struct Borrowed<'a> { value: &'a str }
            pub struct Empty {}
        "#)]);
        for name in ["Tuple", "Unit", "Generic", "Borrowed"] {
            assert!(!schema.is_record(&TypeHandle::new(format!("crate::{name}"))), "{name}");
        }
        assert!(schema.is_record(&TypeHandle::new("crate::Empty")));
    }

    #[test]
    fn optional_fields_are_unwrapped() {
        let schema = schema(&[("", r#"
            pub struct Doc {
                a: Option<String>,
                b: std::option::Option<u8>,
                c: Vec<Option<u8>>,
                r#type: Option<Option<bool>>,
            }
        "#)]);
        let fields = schema.fields(&TypeHandle::new("crate::Doc"));
        assert!(field(&fields, "a").nullable);
        assert_eq!(field(&fields, "a").ty.text, "String");
        assert!(field(&fields, "b").nullable);
        assert_eq!(field(&fields, "b").ty.text, "u8");
        assert!(!field(&fields, "c").nullable);
        assert_eq!(field(&fields, "c").ty.text, "Vec<Option<u8>>");
        assert!(field(&fields, "type").nullable);
        assert_eq!(field(&fields, "type").ty.text, "Option<bool>");
    }

    #[test]
    fn field_types_resolve_across_modules() {
        let schema = schema(&[
            ("", r#"
                mod config;
                mod shared;
                pub struct Root { pub config: config::Config }
            "#),
            ("config", r#"
                use std::collections::HashMap;
                use super::shared::{Theme, Size as Dim};
                use crate::shared;

                pub struct Config {
                    pub app: AppConfig,
                    pub theme: Option<Theme>,
                    pub size: Dim,
                    pub extra: shared::Extra,
                    pub index: HashMap<String, Theme>,
                    pub local: self::AppConfig,
                    pub me: Option<Box<Self>>,
                }

                pub struct AppConfig { pub name: String }

                pub mod nested {
                    pub struct Inner { pub up: super::AppConfig }
                }
            "#),
            ("shared", r#"
                pub enum Theme { Light, Dark }
                pub struct Size { pub value: i32 }
                pub type Extra = Vec<u8>;
            "#),
        ]);

        let root = schema.fields(&TypeHandle::new("crate::Root"));
        assert_eq!(root[0].ty.handle, Some(TypeHandle::new("crate::config::Config")));

        let fields = schema.fields(&TypeHandle::new("crate::config::Config"));
        assert_eq!(field(&fields, "app").ty.text, "crate::config::AppConfig");
        assert_eq!(field(&fields, "theme").ty.handle, Some(TypeHandle::new("crate::shared::Theme")));
        assert_eq!(field(&fields, "size").ty.text, "crate::shared::Size");
        assert_eq!(field(&fields, "extra").ty.text, "crate::shared::Extra");
        assert_eq!(field(&fields, "extra").ty.handle, None);
        assert_eq!(field(&fields, "index").ty.text, "std::collections::HashMap<String, crate::shared::Theme>");
        assert_eq!(field(&fields, "local").ty.text, "crate::config::AppConfig");
        assert_eq!(field(&fields, "me").ty.text, "Box<crate::config::Config>");

        let inner = schema.fields(&TypeHandle::new("crate::config::nested::Inner"));
        assert_eq!(inner[0].ty.handle, Some(TypeHandle::new("crate::config::AppConfig")));
        assert!(schema.is_record(&TypeHandle::new("crate::shared::Size")));
    }

    #[test]
    fn re_exports_resolve_to_the_declaration() {
        let schema = schema(&[
            ("", r#"
                mod models;
                pub struct Root { pub user: models::User, pub group: models::Group }
            "#),
            ("models", r#"
                mod inner { pub struct User { pub id: u64 } }
                mod more { pub struct Group { pub id: u64 } }
                pub use inner::User;
                pub use more::*;
            "#),
        ]);
        let fields = schema.fields(&TypeHandle::new("crate::Root"));
        assert_eq!(field(&fields, "user").ty.handle, Some(TypeHandle::new("crate::models::inner::User")));
        assert_eq!(field(&fields, "group").ty.handle, Some(TypeHandle::new("crate::models::more::Group")));
    }

    #[test]
    fn unknown_crate_paths_defer_the_declaration() {
        let schema = schema(&[("", r#"
            mod generated;
            pub struct Ready { pub a: Vec<String>, pub b: Option<std::path::PathBuf> }
            pub struct Waiting { pub a: Vec<generated::Model> }
            pub struct Elsewhere { pub a: crate::missing::Thing }
        "#)]);
        assert!(schema.is_resolved(&TypeHandle::new("crate::Ready")));
        assert!(!schema.is_resolved(&TypeHandle::new("crate::Waiting")));
        assert!(!schema.is_resolved(&TypeHandle::new("crate::Elsewhere")));
    }

    #[test]
    fn glob_imports_resolve_field_types() {
        let schema = schema(&[
            ("", "mod config; mod shared;"),
            ("shared", r#"
                pub struct Size { pub value: i32 }
                pub mod units { pub struct Unit { pub n: u8 } }
                pub use std::path::PathBuf;
            "#),
            ("config", r#"
                use super::shared::*;
                use std::collections::*;

                pub struct Config {
                    pub size: Size,
                    pub unit: units::Unit,
                    pub map: HashMap<u8, Size>,
                    pub path: PathBuf,
                    pub name: Option<String>,
                }
            "#),
        ]);
        let config = TypeHandle::new("crate::config::Config");
        assert!(schema.is_resolved(&config));
        let fields = schema.fields(&config);
        assert_eq!(field(&fields, "size").ty.handle, Some(TypeHandle::new("crate::shared::Size")));
        assert_eq!(field(&fields, "unit").ty.handle, Some(TypeHandle::new("crate::shared::units::Unit")));
        assert_eq!(field(&fields, "map").ty.text, "std::collections::HashMap<u8, crate::shared::Size>");
        assert_eq!(field(&fields, "path").ty.text, "std::path::PathBuf");
        assert_eq!(field(&fields, "name").ty.text, "String");

        let tree = crate::tree::build(&schema, &config);
        let size = &tree.root.children()[0];
        assert!(size.is_record());
        assert_eq!(size.children()[0].name(), "value");
    }

    #[test]
    fn ambiguous_external_globs_defer_the_declaration() {
        let schema = schema(&[("", r#"
            use std::collections::*;
            use std::sync::*;
            pub struct Shared { pub map: HashMap<u8, u8> }
            pub struct Plain { pub bytes: Vec<u8>, pub flag: Option<bool> }
        "#)]);
        assert!(!schema.is_resolved(&TypeHandle::new("crate::Shared")));
        assert!(schema.is_resolved(&TypeHandle::new("crate::Plain")));
    }

    #[test]
    fn field_visibility_decides_where_a_record_can_be_expanded() {
        let schema = schema(&[
            ("", "mod config;"),
            ("config", r#"
                pub struct App { port: u16 }
                pub struct Shared { pub(crate) port: u16, pub name: String }
                pub struct Parent { pub(super) port: u16 }
                pub struct Inner { pub(in crate::config) port: u16 }
                pub mod nested {
                    pub struct Local { pub(super) port: u16 }
                }
            "#),
        ]);
        let visible = |ty: &str, from: &str| schema.fields_visible_from(&TypeHandle::new(ty), from);
        assert!(!visible("crate::config::App", ""));
        assert!(visible("crate::config::App", "config"));
        assert!(visible("crate::config::App", "config::nested"));
        assert!(!visible("crate::config::App", "configuration"));
        assert!(visible("crate::config::Shared", ""));
        assert!(visible("crate::config::Parent", ""));
        assert!(!visible("crate::config::Inner", ""));
        assert!(visible("crate::config::Inner", "config"));
        assert!(visible("crate::config::nested::Local", "config"));
        assert!(!visible("crate::config::nested::Local", ""));
    }

    #[test]
    fn private_fields_are_overridden_whole_from_other_modules() {
        let schema = schema(&[
            ("", r#"
                mod config;
                #[derive(NestedData)]
                pub struct Root { pub app: config::App, pub id: u32 }
            "#),
            ("config", "pub struct App { port: u16 }"),
        ]);
        let mut diagnostics: Vec<crate::diag::Diagnostic> = Vec::new();
        let mut sink = crate::sink::MemorySink::new();
        let report = crate::processor::generate(&schema, &mut diagnostics, &mut sink).unwrap();

        assert!(report.is_ok());
        assert_eq!(report.warnings, 1);
        assert!(diagnostics[0].message.starts_with("`app`"));
        let patch = sink.get("", "root_nested_data").unwrap();
        assert!(patch.contains("pub app: Option<crate::config::App>,"));
        assert!(!patch.contains("app_port"));
    }

    #[test]
    fn parse_errors_name_the_file() {
        let mut schema = SourceSchema::default();
        let error = schema.add_source(&[], Path::new("src/lib.rs"), "pub struct {").unwrap_err();
        assert!(matches!(error, Error::Parse { .. }));
        assert!(error.to_string().starts_with("failed to parse src/lib.rs"));
    }
}
