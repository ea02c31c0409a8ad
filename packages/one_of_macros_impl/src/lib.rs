#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![allow(
    missing_docs,
    reason = "Private API, public API is documented in `one_of` package"
)]

pub mod variants;
mod syn_helpers;
