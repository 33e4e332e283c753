//! `merge`: fill the absent optional fields of one instance from another.
//!
//! For a record `Person { name: Option<String>, age: u32 }` this emits
//!
//! ```text
//! impl crate::Person {
//!     pub fn merge(&self, other: Option<&Self>) -> Self {
//!         let Some(other) = other else {
//!             return Self { name: self.name.clone(), age: self.age.clone() };
//!         };
//!         Self {
//!             name: self.name.as_ref().or(other.name.as_ref()).cloned(),
//!             age: self.age.clone(),
//!         }
//!     }
//! }
//! ```
//!
//! Nested records are merged as whole values: a present nested record on
//! `self` wins over `other` entirely.
use super::{INDENT, construct, doc_comment, header, ident, indent_block, visibility_prefix};
use crate::schema::{Declaration, FieldDescriptor, TypeHandle};

const FUNCTION_NAME: &str = "merge";
const PARAMETER_NAME: &str = "other";

pub fn synthesize_merge(ty: &TypeHandle, decl: &Declaration, fields: &[FieldDescriptor]) -> String {
    let mut out = header(ty);
    out.push('\n');
    out.push_str("#[allow(dead_code, unused_variables, clippy::all)]\n");
    out.push_str(&format!("impl {ty} {{\n"));
    out.push_str(&doc_comment(
        "Returns a copy of `self` where every optional field that is `None`\n\
         takes the value held by `other`. Without `other` this is a plain copy.",
        INDENT,
    ));
    out.push_str(&format!(
        "{INDENT}{}fn {FUNCTION_NAME}(&self, {PARAMETER_NAME}: Option<&Self>) -> Self {{\n",
        visibility_prefix(&decl.visibility),
    ));
    out.push_str(&indent_block(&method_body(fields), &INDENT.repeat(2)));
    out.push_str(&format!("{INDENT}}}\n"));
    out.push_str("}\n");
    out
}

fn method_body(fields: &[FieldDescriptor]) -> String {
    let duplicate: Vec<(String, String)> = fields
        .iter()
        .map(|field| {
            let name = ident(&field.name);
            let value = format!("self.{name}.clone()");
            (name, value)
        })
        .collect();
    let merged: Vec<(String, String)> = fields.iter().map(merged_field).collect();

    let mut body = format!("let Some({PARAMETER_NAME}) = {PARAMETER_NAME} else {{\n");
    body.push_str(&indent_block(&format!("return {};", construct("Self", &duplicate)), INDENT));
    body.push_str("};\n");
    body.push_str(&construct("Self", &merged));
    body.push('\n');
    body
}

/// Optional fields fall back to `other`; everything else stays as on `self`.
fn merged_field(field: &FieldDescriptor) -> (String, String) {
    let name = ident(&field.name);
    let value = if field.nullable {
        format!("self.{name}.as_ref().or({PARAMETER_NAME}.{name}.as_ref()).cloned()")
    } else {
        format!("self.{name}.clone()")
    };
    (name, value)
}

// ------------------------------- Tests ------------------------------------ //
