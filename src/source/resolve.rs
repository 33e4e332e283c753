//! Path resolution and type rendering within one module's scope.
use quote::ToTokens;
use syn::{GenericArgument, PathArguments, Type};

use super::{Scope, SourceSchema};

/// Resolves names as seen from inside one declaration.
pub(super) struct Resolver<'a> {
    schema: &'a SourceSchema,
    scope: &'a Scope,
    /// Absolute path `Self` stands for.
    self_path: Vec<String>,
}

impl<'a> Resolver<'a> {
    pub(super) fn new(schema: &'a SourceSchema, scope: &'a Scope, self_path: Vec<String>) -> Self {
        Self { schema, scope, self_path }
    }

    /// Absolute form of a path as written in this module. Prelude names and
    /// external paths come back unchanged. `None` when the leading name can
    /// only come from a glob import that does not say what it provides.
    fn absolutize(&self, segments: &[String]) -> Option<Vec<String>> {
        let (first, rest) = segments.split_first()?;
        let with_rest = |base: &[String]| {
            let mut path = base.to_vec();
            path.extend(rest.iter().cloned());
            path
        };
        if first == "Self" {
            return Some(with_rest(&self.self_path));
        }
        if let Some(target) = self.scope.uses.get(first) {
            return Some(with_rest(target));
        }
        let local = matches!(first.as_str(), "crate" | "self" | "super")
            || self.scope.items.contains(first)
            || self.scope.modules.contains(first);
        if local || self.scope.globs.is_empty() || is_prelude(first) {
            return Some(absolutize_import(self.scope, segments));
        }
        self.through_globs(first, rest)
    }

    /// Resolves a name brought in by `use base::*`. Crate globs are looked up
    /// in the scanned modules; an external glob is taken at its word only when
    /// it is the sole external glob of the module.
    fn through_globs(&self, first: &str, rest: &[String]) -> Option<Vec<String>> {
        let (local, external): (Vec<&Vec<String>>, Vec<&Vec<String>>) =
            self.scope.globs.iter().partition(|base| is_crate_path(base));

        let provided = local.iter().find_map(|base| {
            let mut candidate = base.to_vec();
            candidate.push(first.to_string());
            if rest.is_empty() {
                self.schema.lookup(&candidate)
            } else if self.schema.has_module(&candidate) {
                candidate.extend(rest.iter().cloned());
                Some(candidate)
            } else {
                None
            }
        });
        if provided.is_some() {
            return provided;
        }
        match external.as_slice() {
            [base] => {
                let mut path = base.to_vec();
                path.push(first.to_string());
                path.extend(rest.iter().cloned());
                Some(path)
            }
            _ => None,
        }
    }

    /// Absolute segments of a type that is a bare path without generic
    /// arguments, the only shape a record field type can take.
    pub(super) fn plain_path(&self, ty: &Type) -> Option<Vec<String>> {
        let Type::Path(path) = ty else {
            return None;
        };
        if path.qself.is_some() || path.path.leading_colon.is_some() {
            return None;
        }
        if path.path.segments.iter().any(|segment| !segment.arguments.is_none()) {
            return None;
        }
        self.absolutize(&segments(&path.path))
    }

    /// Spelling of `ty` that is valid from any module of the crate.
    pub(super) fn render(&self, ty: &Type) -> String {
        match ty {
            Type::Path(path) if path.qself.is_none() => self.render_path(&path.path),
            Type::Reference(reference) => {
                let lifetime = reference
                    .lifetime
                    .as_ref()
                    .map(|lifetime| format!("{lifetime} "))
                    .unwrap_or_default();
                let mutability = if reference.mutability.is_some() { "mut " } else { "" };
                format!("&{lifetime}{mutability}{}", self.render(&reference.elem))
            }
            Type::Tuple(tuple) => {
                let elems: Vec<String> = tuple.elems.iter().map(|elem| self.render(elem)).collect();
                match elems.as_slice() {
                    [single] => format!("({single},)"),
                    _ => format!("({})", elems.join(", ")),
                }
            }
            Type::Array(array) => format!("[{}; {}]", self.render(&array.elem), tokens(&array.len)),
            Type::Slice(slice) => format!("[{}]", self.render(&slice.elem)),
            Type::Paren(paren) => self.render(&paren.elem),
            Type::Group(group) => self.render(&group.elem),
            Type::Ptr(ptr) => {
                let kind = if ptr.mutability.is_some() { "mut" } else { "const" };
                format!("*{kind} {}", self.render(&ptr.elem))
            }
            Type::Never(_) => "!".to_string(),
            other => tokens(other),
        }
    }

    fn render_path(&self, path: &syn::Path) -> String {
        if path.leading_colon.is_some() {
            return format!("::{}", self.render_segments(path, &segments(path)));
        }
        let written = segments(path);
        let absolute = self.absolutize(&written).unwrap_or(written);
        self.render_segments(path, &absolute)
    }

    /// Joins `absolute`, attaching the generic arguments of `path`. The two
    /// share a suffix; absolutizing only ever replaces the leading segments.
    fn render_segments(&self, path: &syn::Path, absolute: &[String]) -> String {
        let offset = absolute.len().saturating_sub(path.segments.len());
        absolute
            .iter()
            .enumerate()
            .map(|(index, name)| {
                let arguments = index
                    .checked_sub(offset)
                    .and_then(|index| path.segments.iter().nth(index))
                    .map(|segment| self.render_arguments(&segment.arguments))
                    .unwrap_or_default();
                format!("{name}{arguments}")
            })
            .collect::<Vec<_>>()
            .join("::")
    }

    fn render_arguments(&self, arguments: &PathArguments) -> String {
        match arguments {
            PathArguments::None => String::new(),
            PathArguments::AngleBracketed(angle) => {
                let args: Vec<String> = angle
                    .args
                    .iter()
                    .map(|arg| match arg {
                        GenericArgument::Type(ty) => self.render(ty),
                        GenericArgument::Lifetime(lifetime) => lifetime.to_string(),
                        GenericArgument::AssocType(assoc) => {
                            format!("{} = {}", assoc.ident, self.render(&assoc.ty))
                        }
                        other => tokens(other),
                    })
                    .collect();
                format!("<{}>", args.join(", "))
            }
            PathArguments::Parenthesized(paren) => tokens(paren),
        }
    }

    /// Collects crate paths mentioned by `ty` that no scanned module provides.
    pub(super) fn unresolved(&self, ty: &Type, out: &mut Vec<String>) {
        match ty {
            Type::Path(path) if path.qself.is_none() => {
                if path.path.leading_colon.is_none() {
                    let written = segments(&path.path);
                    match self.absolutize(&written) {
                        Some(absolute) => {
                            if is_crate_path(&absolute) && self.schema.lookup(&absolute).is_none() {
                                out.push(absolute.join("::"));
                            }
                        }
                        None => out.push(written.join("::")),
                    }
                }
                for segment in &path.path.segments {
                    if let PathArguments::AngleBracketed(angle) = &segment.arguments {
                        for arg in &angle.args {
                            match arg {
                                GenericArgument::Type(ty) => self.unresolved(ty, out),
                                GenericArgument::AssocType(assoc) => self.unresolved(&assoc.ty, out),
                                _ => {}
                            }
                        }
                    }
                }
            }
            Type::Reference(reference) => self.unresolved(&reference.elem, out),
            Type::Tuple(tuple) => tuple.elems.iter().for_each(|elem| self.unresolved(elem, out)),
            Type::Array(array) => self.unresolved(&array.elem, out),
            Type::Slice(slice) => self.unresolved(&slice.elem, out),
            Type::Paren(paren) => self.unresolved(&paren.elem, out),
            Type::Group(group) => self.unresolved(&group.elem, out),
            Type::Ptr(ptr) => self.unresolved(&ptr.elem, out),
            _ => {}
        }
    }
}

/// Absolute form of an import path. Imports do not see each other, so only
/// `crate`, `self`, `super` and the module's own items and child modules are
/// resolved here.
pub(super) fn absolutize_import(scope: &Scope, segments: &[String]) -> Vec<String> {
    let Some(first) = segments.first() else {
        return Vec::new();
    };
    let mut path = vec!["crate".to_string()];
    match first.as_str() {
        "crate" => return segments.to_vec(),
        "self" => {
            path.extend(scope.path.iter().cloned());
            path.extend(segments[1..].iter().cloned());
        }
        "super" => {
            let mut base = scope.path.clone();
            let mut rest = segments;
            while rest.first().is_some_and(|segment| segment == "super") {
                base.pop();
                rest = &rest[1..];
            }
            path.extend(base);
            path.extend(rest.iter().cloned());
        }
        name if scope.items.contains(name) || scope.modules.contains(name) => {
            path.extend(scope.path.iter().cloned());
            path.extend(segments.iter().cloned());
        }
        _ => return segments.to_vec(),
    }
    path
}

/// `T` of an `Option<T>` field type.
pub(super) fn option_inner(ty: &Type) -> Option<&Type> {
    let Type::Path(path) = ty else {
        return None;
    };
    if path.qself.is_some() {
        return None;
    }
    let names = segments(&path.path);
    let names: Vec<&str> = names.iter().map(String::as_str).collect();
    if !matches!(names.as_slice(), ["Option"] | ["std" | "core", "option", "Option"]) {
        return None;
    }
    let PathArguments::AngleBracketed(angle) = &path.path.segments.last()?.arguments else {
        return None;
    };
    let mut args = angle.args.iter();
    match (args.next(), args.next()) {
        (Some(GenericArgument::Type(inner)), None) => Some(inner),
        _ => None,
    }
}

fn is_crate_path(path: &[String]) -> bool {
    path.first().is_some_and(|first| first == "crate")
}

/// Primitive types and the type names of the standard prelude.
fn is_prelude(name: &str) -> bool {
    const PRELUDE: &[&str] = &[
        "bool", "char", "str", "u8", "u16", "u32", "u64", "u128", "usize", "i8", "i16", "i32", "i64",
        "i128", "isize", "f32", "f64", "Option", "Result", "String", "Vec", "Box",
    ];
    PRELUDE.contains(&name)
}

fn segments(path: &syn::Path) -> Vec<String> {
    path.segments.iter().map(|segment| segment.ident.to_string()).collect()
}

fn tokens(value: &impl ToTokens) -> String {
    value.to_token_stream().to_string()
}

// ------------------------------- Tests ------------------------------------ //
