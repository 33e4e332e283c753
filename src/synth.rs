//! Rust source synthesis shared by the merge and deep-copy generators.
pub mod merge;
pub mod patch;

use crate::schema::{Declaration, Marker, TypeHandle};

pub(crate) const INDENT: &str = "    ";

/// Renders `name` as an identifier, escaping keywords (`type` → `r#type`).
pub fn ident(name: &str) -> String {
    if syn::parse_str::<syn::Ident>(name).is_ok() {
        name.to_string()
    } else {
        format!("r#{name}")
    }
}

/// Builds a new instance of `ty` from the given field values.
///
/// This is the single construct-with-overrides primitive of the generated
/// code; every record instance the generators create goes through it.
/// Values may span several lines, continuation lines are indented with the
/// field.
pub fn construct(ty: &str, fields: &[(String, String)]) -> String {
    if fields.is_empty() {
        return format!("{ty} {{}}");
    }
    let mut out = format!("{ty} {{\n");
    for (field, value) in fields {
        out.push_str(INDENT);
        if field == value {
            out.push_str(field);
        } else {
            out.push_str(field);
            out.push_str(": ");
            out.push_str(&value.replace('\n', &format!("\n{INDENT}")));
        }
        out.push_str(",\n");
    }
    out.push('}');
    out
}

/// `IoConfig` → `io_config`, `HTTPServer` → `http_server`.
pub fn snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);
    for (index, &ch) in chars.iter().enumerate() {
        if ch.is_uppercase() {
            let prev = index.checked_sub(1).map(|i| chars[i]);
            let next = chars.get(index + 1).copied();
            let boundary = match prev {
                Some(prev) if prev == '_' => false,
                Some(prev) if prev.is_lowercase() || prev.is_ascii_digit() => true,
                Some(prev) if prev.is_uppercase() => next.is_some_and(char::is_lowercase),
                _ => false,
            };
            if boundary {
                out.push('_');
            }
            out.extend(ch.to_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// Generated file name for `decl`, without extension: `io_config_mergeable`.
pub fn file_name(decl: &Declaration, marker: Marker) -> String {
    format!("{}_{}", snake_case(&decl.name), marker.file_suffix())
}

pub(crate) fn header(ty: &TypeHandle) -> String {
    format!("// @generated by record-synth from `{ty}`. Do not edit.\n")
}

/// `///` lines for `content`, each prefixed with `indent`.
pub(crate) fn doc_comment(content: &str, indent: &str) -> String {
    content
        .lines()
        .map(|line| format!("{indent}/// {line}").trim_end().to_string() + "\n")
        .collect()
}

/// `vis` followed by a space, or nothing for private items.
pub(crate) fn visibility_prefix(vis: &str) -> String {
    if vis.is_empty() { String::new() } else { format!("{vis} ") }
}

pub(crate) fn indent_block(text: &str, indent: &str) -> String {
    text.lines()
        .map(|line| if line.is_empty() { "\n".to_string() } else { format!("{indent}{line}\n") })
        .collect()
}

// ------------------------------- Tests ------------------------------------ //
