//! Property tree of a record type: every field, with nested records expanded.
use serde::Serialize;

use crate::schema::{SchemaProvider, TypeHandle};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PropertyNode {
    /// A field whose type is not a record (scalars, collections, enums).
    Leaf {
        name: String,
        ty: String,
        nullable: bool,
    },
    /// A field whose type is a record, expanded into its own fields.
    Record {
        name: String,
        ty: String,
        nullable: bool,
        children: Vec<PropertyNode>, // declaration order
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyTree {
    /// Always a `Record` node named after the type, never nullable.
    pub root: PropertyNode,
    /// Dotted paths of record nodes left unexpanded because their type was
    /// already open on the same branch.
    pub truncated: Vec<String>,
    /// Dotted paths of record fields kept as leaves because the root's module
    /// cannot name all of their fields.
    pub sealed: Vec<String>,
}

impl PropertyNode {
    pub fn name(&self) -> &str {
        match self {
            PropertyNode::Leaf { name, .. } | PropertyNode::Record { name, .. } => name,
        }
    }
    pub fn ty(&self) -> &str {
        match self {
            PropertyNode::Leaf { ty, .. } | PropertyNode::Record { ty, .. } => ty,
        }
    }
    pub fn nullable(&self) -> bool {
        match self {
            PropertyNode::Leaf { nullable, .. } | PropertyNode::Record { nullable, .. } => *nullable,
        }
    }
    /// Empty for leaves.
    pub fn children(&self) -> &[PropertyNode] {
        match self {
            PropertyNode::Leaf { .. } => &[],
            PropertyNode::Record { children, .. } => children,
        }
    }
    pub fn is_record(&self) -> bool {
        matches!(self, PropertyNode::Record { .. })
    }
}

/// Types opened on the current root-to-node path. Each recursion level links
/// a new frame onto its parent's, so siblings never see each other's types.
struct Branch<'a> {
    ty: &'a TypeHandle,
    parent: Option<&'a Branch<'a>>,
}

impl Branch<'_> {
    fn contains(&self, ty: &TypeHandle) -> bool {
        let mut frame = Some(self);
        while let Some(branch) = frame {
            if branch.ty == ty {
                return true;
            }
            frame = branch.parent;
        }
        false
    }
}

/// Paths collected while expanding one tree.
#[derive(Default)]
struct Expansion {
    namespace: String,
    truncated: Vec<String>,
    sealed: Vec<String>,
}

pub fn build(schema: &impl SchemaProvider, ty: &TypeHandle) -> PropertyTree {
    let mut expansion = Expansion {
        namespace: schema.declaration(ty).map(|decl| decl.namespace).unwrap_or_default(),
        ..Expansion::default()
    };
    let branch = Branch { ty, parent: None };
    let children = expand(schema, &branch, "", &mut expansion);
    let Expansion { truncated, sealed, .. } = expansion;
    PropertyTree {
        root: PropertyNode::Record {
            name: ty.name().to_string(),
            ty: ty.as_str().to_string(),
            nullable: false,
            children,
        },
        truncated,
        sealed,
    }
}

fn expand(
    schema: &impl SchemaProvider,
    branch: &Branch<'_>,
    prefix: &str,
    expansion: &mut Expansion,
) -> Vec<PropertyNode> {
    schema
        .fields(branch.ty)
        .into_iter()
        .map(|field| {
            let record = field.ty.handle.as_ref().filter(|handle| schema.is_record(handle));
            let Some(handle) = record else {
                return PropertyNode::Leaf {
                    name: field.name,
                    ty: field.ty.text,
                    nullable: field.nullable,
                };
            };
            let path = if prefix.is_empty() {
                field.name.clone()
            } else {
                format!("{prefix}.{}", field.name)
            };
            if !schema.fields_visible_from(handle, &expansion.namespace) {
                expansion.sealed.push(path);
                return PropertyNode::Leaf {
                    name: field.name,
                    ty: field.ty.text,
                    nullable: field.nullable,
                };
            }
            let children = if branch.contains(handle) {
                expansion.truncated.push(path);
                Vec::new()
            } else {
                let child = Branch { ty: handle, parent: Some(branch) };
                expand(schema, &child, &path, expansion)
            };
            PropertyNode::Record {
                name: field.name,
                ty: field.ty.text,
                nullable: field.nullable,
                children,
            }
        })
        .collect()
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::memory::MemorySchema;

    fn names(node: &PropertyNode) -> Vec<&str> {
        node.children().iter().map(PropertyNode::name).collect()
    }

    #[test]
    fn expands_nested_records_in_declaration_order() {
        let schema = MemorySchema::new()
            .record("crate::Config", &[
                ("id", "i32", false),
                ("io", "crate::IoConfig", false),
                ("tags", "Vec<String>", false),
            ])
            .record("crate::IoConfig", &[
                ("source", "crate::SourceIoConfig", false),
                ("output", "crate::OutputIoConfig", true),
            ])
            .record("crate::SourceIoConfig", &[("source_dir", "String", false)])
            .record("crate::OutputIoConfig", &[("output_dir", "String", false)]);

        let tree = build(&schema, &TypeHandle::new("crate::Config"));
        assert_eq!(tree.root.name(), "Config");
        assert!(!tree.root.nullable());
        assert_eq!(names(&tree.root), ["id", "io", "tags"]);

        let io = &tree.root.children()[1];
        assert!(io.is_record());
        assert_eq!(io.ty(), "crate::IoConfig");
        assert_eq!(names(io), ["source", "output"]);
        assert!(io.children()[1].nullable());
        assert_eq!(names(&io.children()[1]), ["output_dir"]);

        assert!(!tree.root.children()[2].is_record());
        assert!(tree.truncated.is_empty());
    }

    #[test]
    fn non_record_declarations_are_leaves() {
        let schema = MemorySchema::new()
            .record("crate::Doc", &[("mode", "crate::Mode", true)])
            .other("crate::Mode");
        let tree = build(&schema, &TypeHandle::new("crate::Doc"));
        let mode = &tree.root.children()[0];
        assert!(!mode.is_record());
        assert!(mode.nullable());
        assert_eq!(mode.ty(), "crate::Mode");
    }

    #[test]
    fn self_reference_is_truncated_on_its_branch() {
        let schema = MemorySchema::new()
            .record("crate::Node", &[("value", "i32", false), ("next", "crate::Node", true)]);
        let tree = build(&schema, &TypeHandle::new("crate::Node"));
        let next = &tree.root.children()[1];
        assert!(next.is_record());
        assert!(next.children().is_empty());
        assert_eq!(tree.truncated, ["next"]);
    }

    #[test]
    fn mutual_reference_is_truncated_where_it_closes() {
        let schema = MemorySchema::new()
            .record("crate::A", &[("b", "crate::B", false)])
            .record("crate::B", &[("a", "crate::A", true), ("n", "u8", false)]);
        let tree = build(&schema, &TypeHandle::new("crate::A"));
        let b = &tree.root.children()[0];
        assert_eq!(names(b), ["a", "n"]);
        assert!(b.children()[0].children().is_empty());
        assert_eq!(tree.truncated, ["b.a"]);
    }

    #[test]
    fn same_type_expands_in_sibling_branches() {
        let schema = MemorySchema::new()
            .record("crate::Pair", &[("left", "crate::Point", false), ("right", "crate::Point", false)])
            .record("crate::Point", &[("x", "f64", false), ("y", "f64", false)]);
        let tree = build(&schema, &TypeHandle::new("crate::Pair"));
        for side in tree.root.children() {
            assert_eq!(names(side), ["x", "y"]);
        }
        assert!(tree.truncated.is_empty());
    }

    #[test]
    fn records_with_private_fields_stay_whole_outside_their_module() {
        let schema = MemorySchema::new()
            .record("crate::Root", &[("app", "crate::config::App", false), ("size", "crate::Size", true)])
            .record("crate::config::App", &[("port", "u16", false)])
            .record("crate::Size", &[("w", "u32", false)])
            .private("crate::config::App");
        let tree = build(&schema, &TypeHandle::new("crate::Root"));
        let app = &tree.root.children()[0];
        assert!(!app.is_record());
        assert_eq!(app.ty(), "crate::config::App");
        assert!(tree.root.children()[1].is_record());
        assert_eq!(tree.sealed, ["app"]);
        assert!(tree.truncated.is_empty());

        let schema = MemorySchema::new()
            .record("crate::config::Root", &[("app", "crate::config::App", false)])
            .record("crate::config::App", &[("port", "u16", false)])
            .private("crate::config::App");
        let tree = build(&schema, &TypeHandle::new("crate::config::Root"));
        assert_eq!(names(&tree.root.children()[0]), ["port"]);
        assert!(tree.sealed.is_empty());
    }

    #[test]
    fn serializes_with_kind_tags() {
        let schema = MemorySchema::new().record("crate::P", &[("name", "String", true)]);
        let tree = build(&schema, &TypeHandle::new("crate::P"));
        let json = serde_json::to_value(&tree.root).unwrap();
        assert_eq!(json["kind"], "record");
        assert_eq!(json["children"][0]["kind"], "leaf");
        assert_eq!(json["children"][0]["nullable"], true);
    }
}
