use proc_macro::TokenStream;

mod delegate;

/// Derive macro for implementing the `Delegate` trait.
///
/// List the protocol methods the type wants to receive with one or more
/// `#[responds_to(...)]` attributes. Without any, the type responds to
/// nothing.
///
/// The expansion refers to `::multicast::Delegate`, so use it through the
/// `multicast` crate (feature `macros`). Crates that depend only on
/// `multicast-core` implement `Delegate` by hand.
///
/// ```rust,ignore
/// #[derive(multicast::Delegate)]
/// #[responds_to(did_connect, did_receive)]
/// struct Session;
/// ```
#[proc_macro_derive(Delegate, attributes(responds_to))]
pub fn derive_delegate(input: TokenStream) -> TokenStream {
    delegate::derive_delegate_impl(input)
}
