use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::parse::Parser;
use syn::punctuated::Punctuated;
use syn::{Expr, ExprPath, ItemStruct, MetaNameValue, Token};

/// Expands `#[zelo_slice]` into an `Arc`-backed handle plus its `...Inner` state.
///
/// `#[zelo_slice(status = method)]` routes `FeatureSlice::status` to an inherent
/// `fn method(&self) -> SliceStatus` of the handle.
pub fn expand_slice(args: TokenStream, input: ItemStruct) -> TokenStream {
    let status = match parse_status(args) {
        Ok(status) => status,
        Err(err) => return err.to_compile_error(),
    };

    let ItemStruct { attrs, vis, ident, fields, .. } = input;
    let inner = format_ident!("{ident}Inner");
    let semi = if matches!(fields, syn::Fields::Named(_)) { quote! {} } else { quote! { ; } };
    let status_fn = status.map(|method| {
        quote! {
            fn status(&self) -> ::zelo_kernel::domain::registry::SliceStatus {
                self.#method()
            }
        }
    });

    quote! {
        #(#attrs)*
        #[derive(Debug, Clone)]
        #vis struct #inner #fields #semi

        #[derive(Debug, Clone)]
        #vis struct #ident {
            inner: ::std::sync::Arc<#inner>,
        }

        impl #ident {
            #[must_use]
            pub fn new(inner: #inner) -> Self {
                Self { inner: ::std::sync::Arc::new(inner) }
            }
        }

        impl ::std::ops::Deref for #ident {
            type Target = #inner;

            fn deref(&self) -> &Self::Target {
                &self.inner
            }
        }

        impl ::zelo_kernel::domain::registry::FeatureSlice for #ident {
            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            #status_fn
        }
    }
}

fn parse_status(args: TokenStream) -> syn::Result<Option<syn::Ident>> {
    let metas = Punctuated::<MetaNameValue, Token![,]>::parse_terminated.parse2(args)?;
    let mut status = None;
    for nv in metas {
        if !nv.path.is_ident("status") {
            return Err(syn::Error::new_spanned(nv.path, "unsupported argument; expected status"));
        }
        if status.is_some() {
            return Err(syn::Error::new_spanned(&nv, "duplicate argument"));
        }
        let Expr::Path(ExprPath { path, .. }) = &nv.value else {
            return Err(syn::Error::new_spanned(&nv.value, "expected a method name"));
        };
        let Some(method) = path.get_ident() else {
            return Err(syn::Error::new_spanned(path, "expected a method name"));
        };
        status = Some(method.clone());
    }
    Ok(status)
}
