//! Derive macros for the ember toolchain.
//!
//! Provides `#[derive(Error)]`, the error type boilerplate used by the
//! bytecode, runtime and frontend modules (thiserror replacement).

mod error;

use proc_macro::TokenStream;

/// Automatically implements `Display` and `Error` traits for error types.
#[proc_macro_derive(Error, attributes(error))]
pub fn derive_error(input: TokenStream) -> TokenStream {
    error::derive_error(input)
}
