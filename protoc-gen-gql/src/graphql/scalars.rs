//! Rust support module for the generated schema
//!
//! Emits `scalars.rs`: one type alias per synthesized scalar (map fields and
//! `ProtoBytes`) and the `UnionMask` marker that synthesized unions bind to.

use super::unions::UNION_MASK;
use crate::error::GeneratorError;
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use std::collections::{BTreeMap, BTreeSet};

const HEADER: &str = "// Code generated by protoc-gen-gql. DO NOT EDIT.\n\n";

/// Render `scalars.rs`, or `None` when there is nothing to declare
pub fn render(
    scalars: &BTreeMap<String, String>,
    imports: &BTreeSet<String>,
    union_mask: bool,
) -> Result<Option<String>, GeneratorError> {
    if scalars.is_empty() && !union_mask {
        return Ok(None);
    }

    let uses = imports
        .iter()
        .map(|module| {
            let path: syn::Path = parse_native(module)?;
            Ok(quote! { use #path; })
        })
        .collect::<Result<Vec<_>, GeneratorError>>()?;

    let aliases = scalars
        .iter()
        .map(|(name, native)| {
            let ident = format_ident!("{}", name);
            let ty: syn::Type = parse_native(native)?;
            Ok(quote! {
                #[allow(dead_code)]
                pub type #ident = #ty;
            })
        })
        .collect::<Result<Vec<_>, GeneratorError>>()?;

    let mask = if union_mask {
        let ident = format_ident!("{}", UNION_MASK);
        quote! {
            #[doc = " Discriminator shared by every generated union"]
            #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
            pub struct #ident;
        }
    } else {
        TokenStream::new()
    };

    let tokens = quote! {
        #(#uses)*
        #(#aliases)*
        #mask
    };
    Ok(Some(format_code(tokens)?))
}

fn parse_native<T: syn::parse::Parse>(text: &str) -> Result<T, GeneratorError> {
    syn::parse_str(text).map_err(|e| {
        GeneratorError::CodeGenError(format!("invalid native Rust path {text:?}: {e}"))
    })
}

fn format_code(tokens: TokenStream) -> Result<String, GeneratorError> {
    let parsed = syn::parse_file(&tokens.to_string()).map_err(|e| {
        GeneratorError::CodeGenError(format!("Failed to parse generated code: {}", e))
    })?;
    Ok(format!("{HEADER}{}", prettyplease::unparse(&parsed)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nothing_to_render() {
        assert_eq!(render(&BTreeMap::new(), &BTreeSet::new(), false).unwrap(), None);
    }

    #[test]
    fn test_aliases_and_imports() {
        let scalars = BTreeMap::from([
            (
                "Related".to_string(),
                "::std::collections::HashMap<String, catalog::Item>".to_string(),
            ),
            ("ProtoBytes".to_string(), "Vec<u8>".to_string()),
        ]);
        let imports = BTreeSet::from(["crate::pb::shop::catalog".to_string()]);
        let code = render(&scalars, &imports, false).unwrap().unwrap();

        assert!(code.starts_with("// Code generated by protoc-gen-gql. DO NOT EDIT."));
        assert!(code.contains("use crate::pb::shop::catalog;"));
        assert!(code.contains("pub type ProtoBytes = Vec<u8>;"));
        assert!(code.contains(
            "pub type Related = ::std::collections::HashMap<String, catalog::Item>;"
        ));
        assert!(!code.contains("UnionMask"));
        assert!(code.find("ProtoBytes").unwrap() < code.find("Related").unwrap());
    }

    #[test]
    fn test_union_mask_only() {
        let code = render(&BTreeMap::new(), &BTreeSet::new(), true)
            .unwrap()
            .unwrap();
        assert!(code.contains("pub struct UnionMask;"));
        assert!(code.contains("/// Discriminator shared by every generated union"));
    }

    #[test]
    fn test_invalid_native_path() {
        let scalars = BTreeMap::from([("Broken".to_string(), "HashMap<String,".to_string())]);
        let err = render(&scalars, &BTreeSet::new(), false).unwrap_err();
        assert!(matches!(err, GeneratorError::CodeGenError(ref msg) if msg.contains("HashMap<String,")));
    }
}
