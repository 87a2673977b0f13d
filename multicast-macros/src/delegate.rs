//! `#[derive(Delegate)]`.
//!
//! The derive reads every `#[responds_to(...)]` attribute on the type and
//! implements `multicast::Delegate::responds_to` to answer `true` for exactly
//! those selector names.
//!
//! The generated impl names `::multicast::Delegate` and
//! `::multicast::Selector`, so the deriving crate must depend on the
//! `multicast` facade, not only on `multicast-core`.

use proc_macro::TokenStream;
use quote::quote;
use syn::{
    DeriveInput, Ident, LitStr, Token, ext::IdentExt, parse_macro_input, punctuated::Punctuated,
};

/// Implementation of the `Delegate` derive.
pub fn derive_delegate_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match expand_delegate(&input) {
        Ok(expanded) => TokenStream::from(expanded),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand_delegate(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let selectors = collect_selectors(input)?;

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let body = if selectors.is_empty() {
        quote! {
            let _ = selector;
            false
        }
    } else {
        quote! {
            ::core::matches!(selector.name(), #(#selectors)|*)
        }
    };

    Ok(quote! {
        impl #impl_generics ::multicast::Delegate for #name #ty_generics #where_clause {
            fn responds_to(&self, selector: ::multicast::Selector) -> bool {
                #body
            }
        }
    })
}

/// Selector names from all `#[responds_to(a, b, ...)]` attributes, in order,
/// without duplicates.
fn collect_selectors(input: &DeriveInput) -> syn::Result<Vec<LitStr>> {
    let mut selectors: Vec<LitStr> = Vec::new();

    for attr in &input.attrs {
        if !attr.path().is_ident("responds_to") {
            continue;
        }
        let names = attr.parse_args_with(Punctuated::<Ident, Token![,]>::parse_terminated)?;
        if names.is_empty() {
            return Err(syn::Error::new_spanned(
                attr,
                "expected at least one selector name: #[responds_to(method_name, ...)]",
            ));
        }
        for ident in names {
            let name = ident.unraw().to_string();
            if selectors.iter().any(|s| s.value() == name) {
                continue;
            }
            selectors.push(LitStr::new(&name, ident.span()));
        }
    }

    Ok(selectors)
}
