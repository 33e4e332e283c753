// record-synth-macros: marker derives for record-synth
//
// The derives generate nothing themselves. `record-synth` finds them in the
// sources at build time and writes the functions; the derives only make the
// markers legal attributes and reject declarations that cannot be generated
// for, so the mistake shows up on the declaration.
//
// Example:
// ```
// use record_synth_macros::{Mergeable, NestedData};
//
// #[derive(Clone, Mergeable, NestedData)]
// pub struct Person {
//     pub name: Option<String>,
//     pub age: Option<u32>,
// }
// ```

use proc_macro::TokenStream;
use syn::{parse_macro_input, Data, DeriveInput, Fields};

/// Marks a record for `fn merge(&self, other: Option<&Self>) -> Self`.
///
/// Every `Option` field that is `None` on `self` takes the value of the same
/// field on `other`.
#[proc_macro_derive(Mergeable)]
pub fn derive_mergeable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand_marker(&input, "Mergeable")
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

/// Marks a record for `fn deep_copy(&self, patch: <Name>Patch) -> Self`.
///
/// `<Name>Patch` has one override per field at any depth of nested records,
/// named by joining the field path with `_`.
#[proc_macro_derive(NestedData)]
pub fn derive_nested_data(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand_marker(&input, "NestedData")
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

fn expand_marker(input: &DeriveInput, marker: &str) -> syn::Result<proc_macro2::TokenStream> {
    let message = format!("#[derive({marker})] is only applicable to non-generic structs with named fields");
    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(&input.ident, message));
    };
    if !matches!(data.fields, Fields::Named(_)) {
        return Err(syn::Error::new_spanned(&input.ident, message));
    }
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(&input.generics, message));
    }
    Ok(quote::quote! {})
}
