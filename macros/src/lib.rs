//! Proc macros for rui: `props!` inline property declarations.
//!
//! This crate is not meant to be used directly. Enable the `macros` feature on `rui`.

use proc_macro::TokenStream;

mod props_macro;

/// Compile-time checked property declarations.
///
/// Parses CSS-like declarations at compile time and produces a
/// `rui::property::PropertyObject` over the view schema. Each value is
/// handed to the runtime coercion as text, so the usual rules apply:
/// unknown tags are rejected, `@name` stays a constant reference, and the
/// value is converted to the tag's declared type.
///
/// # Syntax
///
/// ```ignore
/// let props = props! {
///     width: 100px;
///     height: 50%;
///     text-color: @accent-color;
///     background-color: #1a1a2e;
///     padding: 4px, 8px, 4px, 8px;
///     border: 1px solid red;
///     text-size: "1.5em";
/// };
/// ```
///
/// Numbers may carry `px`, `pt`, `pc`, `in`, `mm`, `cm`, `fr`, `deg`, `rad`,
/// `grad`, `turn` or `pi`, or be followed by `%`. `em`/`ex` values are
/// written as string literals. Any other suffix is a compile error.
#[proc_macro]
pub fn props(input: TokenStream) -> TokenStream {
    props_macro::props_impl(input.into())
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}
