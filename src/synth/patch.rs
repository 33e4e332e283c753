//! `deep_copy`: copy a record while overriding fields at any nesting depth.
//!
//! Rust has no named or default arguments, so the override parameters become
//! the fields of a generated `<Type>Patch` struct; a `None` field means "keep
//! the value of the copied instance".
//!
//! The generated method resolves every parameter to a local value first, in
//! pre-order, so a nested parameter defaults to a field of its parent's
//! *resolved* value. It then rebuilds the record bottom-up from those locals.
//! Optional records are rebuilt inside `Option::map`, so when one is `None` the
//! overrides below it have nothing to apply to and are dropped.
use super::{INDENT, construct, doc_comment, header, ident, indent_block, visibility_prefix};
use crate::params::{DefaultValue, Parameter, Receiver};
use crate::schema::{Declaration, TypeHandle};

const FUNCTION_NAME: &str = "deep_copy";
const PARAMETER_NAME: &str = "patch";

/// Name of the generated override struct, `ConfigPatch`.
pub fn patch_struct_name(decl: &Declaration) -> String {
    format!("{}Patch", decl.name)
}

pub fn synthesize_patch(
    ty: &TypeHandle,
    decl: &Declaration,
    params: &[Parameter<'_>],
) -> String {
    let patch = patch_struct_name(decl);
    let vis = visibility_prefix(&decl.visibility);

    let mut out = header(ty);
    out.push('\n');
    out.push_str(&patch_struct(&patch, decl, params));
    out.push('\n');
    out.push_str("#[allow(dead_code, unused_variables, clippy::all)]\n");
    out.push_str(&format!("impl {ty} {{\n"));
    out.push_str(&doc_comment(
        &format!(
            "Copies `self`, replacing every field that is set in `{PARAMETER_NAME}`.\n\
             Overrides below an optional record that is `None` are ignored."
        ),
        INDENT,
    ));
    out.push_str(&format!(
        "{INDENT}{vis}fn {FUNCTION_NAME}(&self, {PARAMETER_NAME}: {patch}) -> Self {{\n"
    ));
    out.push_str(&indent_block(&method_body(&patch, params), &INDENT.repeat(2)));
    out.push_str(&format!("{INDENT}}}\n"));
    out.push_str("}\n");
    out
}

// ————————————————————————————————————————————————————————————————————————————
// PATCH STRUCT
// ————————————————————————————————————————————————————————————————————————————

fn patch_struct(name: &str, decl: &Declaration, params: &[Parameter<'_>]) -> String {
    let vis = visibility_prefix(&decl.visibility);
    let mut out = doc_comment(
        &format!(
            "Overrides accepted by `{}::{FUNCTION_NAME}`.\n\
             Fields left as `None` keep the value of the copied instance.",
            decl.name
        ),
        "",
    );
    out.push_str("#[derive(Clone, Default)]\n");
    out.push_str("#[allow(dead_code, private_interfaces)]\n");
    if params.is_empty() {
        out.push_str(&format!("{vis}struct {name} {{}}\n"));
        return out;
    }
    out.push_str(&format!("{vis}struct {name} {{\n"));
    for param in params {
        out.push_str(&doc_comment(&field_doc(param), INDENT));
        out.push_str(&format!(
            "{INDENT}{vis}{}: {},\n",
            ident(&param.name),
            override_type(param)
        ));
    }
    out.push_str("}\n");
    out
}

fn field_doc(param: &Parameter<'_>) -> String {
    let mut doc = format!("Override for `{}`.", param.path());
    if param.node.nullable() {
        doc.push_str(" `Some(None)` clears it.");
    }
    match param.nullable_ancestors().as_slice() {
        [] => {}
        [single] => doc.push_str(&format!("\nIgnored while `{single}` is `None`.")),
        many => {
            let list = many.iter().map(|path| format!("`{path}`")).collect::<Vec<_>>().join(", ");
            doc.push_str(&format!("\nIgnored while any of {list} is `None`."));
        }
    }
    doc
}

/// Type of the field as declared: `Option<X>` for optional fields.
fn field_type(param: &Parameter<'_>) -> String {
    if param.node.nullable() {
        format!("Option<{}>", param.node.ty())
    } else {
        param.node.ty().to_string()
    }
}

/// Optional fields take `Option<Option<X>>` so that `Some(None)` can clear
/// them; a non-optional field cannot be cleared and takes `Option<X>`.
fn override_type(param: &Parameter<'_>) -> String {
    format!("Option<{}>", field_type(param))
}

/// Type of the resolved local: absent below a `None` ancestor.
fn local_type(param: &Parameter<'_>) -> String {
    if param.is_optional() {
        format!("Option<{}>", param.node.ty())
    } else {
        param.node.ty().to_string()
    }
}

// ————————————————————————————————————————————————————————————————————————————
// METHOD BODY
// ————————————————————————————————————————————————————————————————————————————

fn method_body(patch: &str, params: &[Parameter<'_>]) -> String {
    let mut body = String::new();

    let bindings = params.iter().map(|param| ident(&param.name)).collect::<Vec<_>>();
    if bindings.is_empty() {
        body.push_str(&format!("let {patch} {{}} = {PARAMETER_NAME};\n"));
    } else {
        body.push_str(&format!("let {patch} {{\n"));
        for binding in &bindings {
            body.push_str(&format!("{INDENT}{binding},\n"));
        }
        body.push_str(&format!("}} = {PARAMETER_NAME};\n"));
    }

    // Ancestors come first in pre-order, so every default below reads an
    // already resolved parent.
    for param in params {
        body.push_str(&format!(
            "let {}: {} = {};\n",
            ident(&param.name),
            local_type(param),
            resolve(param, params)
        ));
    }

    let fields = children_of(None, params)
        .map(|index| (ident(params[index].node.name()), rebuild(index, params)))
        .collect::<Vec<_>>();
    body.push_str(&construct("Self", &fields));
    body.push('\n');
    body
}

/// The override if given, the default-value expression otherwise.
fn resolve(param: &Parameter<'_>, params: &[Parameter<'_>]) -> String {
    let binding = ident(&param.name);
    let default = default_expr(param.default_value(params), param.node.nullable());
    if !param.node.nullable() && param.has_nullable_parents() {
        // Both sides are `Option<X>` here: the override cannot be `None`
        // on purpose, only absent.
        format!("{binding}.or_else(|| {default})")
    } else {
        format!("{binding}.unwrap_or_else(|| {default})")
    }
}

fn default_expr(default: DefaultValue<'_>, nullable: bool) -> String {
    let field = ident(default.field);
    match default.receiver {
        Receiver::Instance => format!("self.{field}.clone()"),
        Receiver::Parameter(parent) if default.guarded => {
            let step = if nullable { "and_then" } else { "map" };
            format!("{}.as_ref().{step}(|parent| parent.{field}.clone())", ident(parent))
        }
        Receiver::Parameter(parent) => format!("{}.{field}.clone()", ident(parent)),
    }
}

fn children_of<'a>(parent: Option<usize>, params: &'a [Parameter<'_>]) -> impl Iterator<Item = usize> + 'a {
    params
        .iter()
        .enumerate()
        .filter(move |(_, param)| param.parent == parent)
        .map(|(index, _)| index)
}

/// Expression for the new value of `params[index]`, of the field's declared
/// type, evaluated where the parent's value is bound under the parent's
/// parameter name.
fn rebuild(index: usize, params: &[Parameter<'_>]) -> String {
    let param = &params[index];
    let binding = ident(&param.name);

    let mut expr = if param.node.children().is_empty() {
        // Leaves, and records left unexpanded, are taken as resolved.
        binding.clone()
    } else {
        let fields = children_of(Some(index), params)
            .map(|child| (ident(params[child].node.name()), rebuild(child, params)))
            .collect::<Vec<_>>();
        let instance = construct(param.node.ty(), &fields);
        if param.is_optional() {
            format!("{binding}.map(|{binding}| {instance})")
        } else {
            instance
        }
    };

    // A non-optional field below an optional record resolves to `Option<X>`;
    // once its parent is known to exist it falls back to the parent's value.
    if !param.node.nullable() && param.has_nullable_parents() {
        let parent = param.parent.map(|parent| ident(&params[parent].name)).unwrap_or_else(|| "self".into());
        expr = format!("{expr}.unwrap_or_else(|| {parent}.{}.clone())", ident(param.node.name()));
    }
    expr
}

// ------------------------------- Tests ------------------------------------ //
