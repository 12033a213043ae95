use fxhash::FxHashSet;
use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::parse::Parser;
use syn::punctuated::Punctuated;
use syn::{Attribute, Expr, ItemFn, ItemStruct, Lit, LitStr, Meta, MetaNameValue, Token};

/// Options accepted by `#[api_model(...)]`.
struct ModelOptions {
    rename_all: LitStr,
    deny_unknown_fields: bool,
}

impl Default for ModelOptions {
    fn default() -> Self {
        Self { rename_all: LitStr::new("camelCase", Span::call_site()), deny_unknown_fields: true }
    }
}

/// Expands the `#[api_model]` attribute macro.
pub fn expand_api_model(args: TokenStream, input: ItemStruct) -> TokenStream {
    match try_expand_api_model(args, &input) {
        Ok(tokens) => tokens,
        Err(err) => err.to_compile_error(),
    }
}

fn try_expand_api_model(args: TokenStream, input: &ItemStruct) -> syn::Result<TokenStream> {
    let options = parse_model_options(args)?;
    let derives = derive_names(&input.attrs);
    let existing = existing_serde(&input.attrs)?;

    let mut missing = Vec::new();
    for (name, path) in [
        ("Debug", quote! { Debug }),
        ("Serialize", quote! { ::serde::Serialize }),
        ("Deserialize", quote! { ::serde::Deserialize }),
    ] {
        if !derives.contains(name) {
            missing.push(path);
        }
    }
    let derive_attr =
        if missing.is_empty() { quote! {} } else { quote! { #[derive(#(#missing),*)] } };

    let schema_attr = if derives.contains("ToSchema") {
        quote! {}
    } else {
        quote! { #[cfg_attr(feature = "server", derive(::utoipa::ToSchema))] }
    };

    let rename_attr = match existing.rename_all {
        Some(lit) if lit.value() != options.rename_all.value() => {
            return Err(syn::Error::new_spanned(
                lit,
                "serde rename_all conflicts with api_model(rename_all = ...)",
            ));
        },
        Some(_) => quote! {},
        None => {
            let lit = &options.rename_all;
            quote! { #[serde(rename_all = #lit)] }
        },
    };

    let deny_attr = match (existing.deny_unknown_fields, options.deny_unknown_fields) {
        (true, false) => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "serde(deny_unknown_fields) is already set; remove it before disabling",
            ));
        },
        (false, true) => quote! { #[serde(deny_unknown_fields)] },
        _ => quote! {},
    };

    Ok(quote! {
        #derive_attr
        #schema_attr
        #rename_attr
        #deny_attr
        #input
    })
}

/// Expands the `#[api_handler]` attribute macro.
pub fn expand_api_handler(args: TokenStream, input: ItemFn) -> TokenStream {
    let ItemFn { attrs, vis, sig, block } = input;

    quote! {
        #(#attrs)*
        #[allow(clippy::unused_async)]
        #[cfg_attr(feature = "server", ::utoipa::path(#args))]
        #vis #sig #block
    }
}

fn parse_model_options(args: TokenStream) -> syn::Result<ModelOptions> {
    let metas = Punctuated::<Meta, Token![,]>::parse_terminated.parse2(args)?;
    let mut options = ModelOptions::default();
    let mut seen = FxHashSet::default();

    for meta in metas {
        let Meta::NameValue(nv) = meta else {
            return Err(syn::Error::new_spanned(meta, "expected `key = value` arguments"));
        };
        let key = nv.path.get_ident().map(ToString::to_string).unwrap_or_default();
        if !seen.insert(key.clone()) {
            return Err(syn::Error::new_spanned(&nv, "duplicate argument"));
        }
        match key.as_str() {
            "rename_all" => options.rename_all = string_value(&nv)?,
            "deny_unknown_fields" => options.deny_unknown_fields = bool_value(&nv)?,
            _ => {
                return Err(syn::Error::new_spanned(
                    nv.path,
                    "unsupported argument; expected rename_all or deny_unknown_fields",
                ));
            },
        }
    }

    Ok(options)
}

fn string_value(nv: &MetaNameValue) -> syn::Result<LitStr> {
    if let Expr::Lit(expr) = &nv.value
        && let Lit::Str(lit) = &expr.lit
    {
        return Ok(lit.clone());
    }
    Err(syn::Error::new_spanned(&nv.value, "expected a string literal"))
}

fn bool_value(nv: &MetaNameValue) -> syn::Result<bool> {
    if let Expr::Lit(expr) = &nv.value
        && let Lit::Bool(lit) = &expr.lit
    {
        return Ok(lit.value);
    }
    Err(syn::Error::new_spanned(&nv.value, "expected a boolean literal"))
}

#[derive(Default)]
struct ExistingSerde {
    rename_all: Option<LitStr>,
    deny_unknown_fields: bool,
}

fn existing_serde(attrs: &[Attribute]) -> syn::Result<ExistingSerde> {
    let mut found = ExistingSerde::default();
    for attr in attrs.iter().filter(|a| a.path().is_ident("serde")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename_all") {
                found.rename_all = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("deny_unknown_fields") {
                found.deny_unknown_fields = true;
            } else if meta.input.peek(Token![=]) {
                let _: Expr = meta.value()?.parse()?;
            }
            Ok(())
        })?;
    }
    Ok(found)
}

fn derive_names(attrs: &[Attribute]) -> FxHashSet<String> {
    let mut names = FxHashSet::default();
    for attr in attrs.iter().filter(|a| a.path().is_ident("derive")) {
        let _ = attr.parse_nested_meta(|meta| {
            if let Some(last) = meta.path.segments.last() {
                names.insert(last.ident.to_string());
            }
            Ok(())
        });
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(args: TokenStream, src: &str) -> String {
        let input: ItemStruct = syn::parse_str(src).unwrap();
        expand_api_model(args, input).to_string()
    }

    #[test]
    fn adds_derives_and_camel_case() {
        let out = model(quote! {}, "struct Dto { field_name: u8 }");
        assert!(out.contains(":: serde :: Serialize"));
        assert!(out.contains("rename_all = \"camelCase\""));
        assert!(out.contains("deny_unknown_fields"));
    }

    #[test]
    fn honours_overrides() {
        let out = model(
            quote! { rename_all = "snake_case", deny_unknown_fields = false },
            "struct Dto { field_name: u8 }",
        );
        assert!(out.contains("rename_all = \"snake_case\""));
        assert!(!out.contains("deny_unknown_fields"));
    }

    #[test]
    fn conflicting_rename_is_an_error() {
        let out = model(quote! {}, "#[serde(rename_all = \"snake_case\")] struct Dto { a: u8 }");
        assert!(out.contains("compile_error"));
    }
}
