//! Flattening of a property tree into override parameters.
//!
//! Every node below the root becomes one parameter, named by joining the
//! names on its path with `_` (`io.source.source_dir` → `io_source_source_dir`).
use indexmap::IndexMap;

use crate::tree::{PropertyNode, PropertyTree};

#[derive(Debug, Clone)]
pub struct Parameter<'t> {
    pub name: String,
    pub node: &'t PropertyNode,
    /// Ancestors from the first-level field down to the immediate parent.
    pub parents: Vec<&'t PropertyNode>,
    /// Position of the immediate parent's parameter in the flattened list.
    pub parent: Option<usize>,
}

/// Where a parameter takes its value from when it is not overridden.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Receiver<'p> {
    /// The instance being copied; first-level fields.
    Instance,
    /// The resolved value of the parent's parameter.
    Parameter(&'p str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultValue<'p> {
    pub receiver: Receiver<'p>,
    pub field: &'p str,
    /// The receiver may be absent, so the read has to propagate absence.
    pub guarded: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("flattened parameter `{name}` is produced by both `{first}` and `{second}`")]
pub struct NameClash {
    pub name: String,
    pub first: String,
    pub second: String,
}

impl<'t> Parameter<'t> {
    pub fn has_nullable_parents(&self) -> bool {
        self.parents.iter().any(|parent| parent.nullable())
    }

    /// The resolved value may be absent: the field is optional itself or
    /// sits below an optional record.
    pub fn is_optional(&self) -> bool {
        self.node.nullable() || self.has_nullable_parents()
    }

    /// Dotted field path from the root, `io.source.source_dir`.
    pub fn path(&self) -> String {
        self.parents
            .iter()
            .map(|parent| parent.name())
            .chain([self.node.name()])
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Dotted paths of the optional records this parameter sits in.
    pub fn nullable_ancestors(&self) -> Vec<String> {
        self.parents
            .iter()
            .enumerate()
            .filter(|(_, parent)| parent.nullable())
            .map(|(depth, _)| {
                self.parents[..=depth].iter().map(|parent| parent.name()).collect::<Vec<_>>().join(".")
            })
            .collect()
    }

    pub fn default_value<'p>(&'p self, params: &'p [Parameter<'t>]) -> DefaultValue<'p> {
        let receiver = match self.parent {
            Some(index) => Receiver::Parameter(&params[index].name),
            None => Receiver::Instance,
        };
        DefaultValue {
            receiver,
            field: self.node.name(),
            guarded: self.has_nullable_parents(),
        }
    }
}

pub fn flatten(tree: &PropertyTree) -> Result<Vec<Parameter<'_>>, NameClash> {
    let mut params = Vec::new();
    for child in tree.root.children() {
        traverse(child, Vec::new(), None, &mut params);
    }

    let mut seen: IndexMap<&str, usize> = IndexMap::new();
    for (index, param) in params.iter().enumerate() {
        if let Some(&first) = seen.get(param.name.as_str()) {
            return Err(NameClash {
                name: param.name.clone(),
                first: params[first].path(),
                second: param.path(),
            });
        }
        seen.insert(param.name.as_str(), index);
    }
    Ok(params)
}

fn traverse<'t>(
    node: &'t PropertyNode,
    parents: Vec<&'t PropertyNode>,
    parent: Option<usize>,
    params: &mut Vec<Parameter<'t>>,
) {
    let index = params.len();
    let name = parents
        .iter()
        .map(|parent| parent.name())
        .chain([node.name()])
        .collect::<Vec<_>>()
        .join("_");
    params.push(Parameter { name, node, parents: parents.clone(), parent });

    for child in node.children() {
        let mut chain = parents.clone();
        chain.push(node);
        traverse(child, chain, Some(index), params);
    }
}

// ------------------------------- Tests ------------------------------------ //
