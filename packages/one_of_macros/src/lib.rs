#![allow(
    missing_docs,
    reason = "Private API, public API is documented in `one_of` package"
)]

use proc_macro::TokenStream;

#[proc_macro_attribute]
pub fn __macro_one_of_variants(attr: TokenStream, item: TokenStream) -> TokenStream {
    one_of_macros_impl::variants::entrypoint(&attr.into(), &item.into()).into()
}
