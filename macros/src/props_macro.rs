//! props! macro: parse CSS-like declarations at compile time and generate a
//! property container filled through the runtime coercion.

use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::ext::IdentExt;
use syn::parse::{Parse, ParseStream};
use syn::{Error, Ident, LitFloat, LitInt, LitStr, Result, Token};

// ---------------------------------------------------------------------------
// AST types
// ---------------------------------------------------------------------------

/// A single parsed value token.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum PropValue {
    /// A bare identifier like `red`, `center`, `start-to-end`.
    Ident(String),
    /// A number, possibly negative, with its unit suffix (`px`, `%`, `deg`, ...).
    Number(String),
    /// `#rrggbb` / `#aarrggbb`.
    Hash(String),
    /// `@name`, a theme constant reference.
    Ref(String),
    /// A quoted string, used verbatim.
    Str(String),
    /// `,` between sides or list items.
    Comma,
}

impl PropValue {
    fn text(&self) -> &str {
        match self {
            PropValue::Ident(text)
            | PropValue::Number(text)
            | PropValue::Hash(text)
            | PropValue::Ref(text)
            | PropValue::Str(text) => text,
            PropValue::Comma => ",",
        }
    }
}

/// One declaration: `property-name: value1 value2;`
#[derive(Debug, Clone)]
pub(crate) struct PropDeclaration {
    /// The property tag in kebab-case (e.g. "text-color").
    pub name: String,
    pub name_span: Span,
    pub values: Vec<PropValue>,
}

impl PropDeclaration {
    /// The value as the text form understood by the property coercion:
    /// words joined by spaces, commas kept tight.
    pub fn value_text(&self) -> String {
        let mut text = String::new();
        for value in &self.values {
            match value {
                PropValue::Comma => text.push(','),
                other => {
                    if !text.is_empty() && !text.ends_with(',') {
                        text.push(' ');
                    }
                    text.push_str(other.text());
                }
            }
        }
        text
    }
}

#[derive(Debug)]
struct PropsInput {
    declarations: Vec<PropDeclaration>,
}

/// Units a number literal may carry. `em` and `ex` collide with the float
/// exponent syntax, so those values are written as strings (`"1.5em"`).
const UNITS: &[&str] = &[
    "px", "pt", "pc", "in", "mm", "cm", "fr", "deg", "rad", "grad", "turn", "pi",
];

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

impl Parse for PropsInput {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut declarations = Vec::new();
        while !input.is_empty() {
            declarations.push(parse_declaration(input)?);
        }
        Ok(PropsInput { declarations })
    }
}

/// Parse a kebab-case name: `ident (- ident)*`.
fn parse_kebab(input: ParseStream) -> Result<(String, Span)> {
    let first: Ident = input.call(Ident::parse_any)?;
    let mut name = first.to_string();
    while input.peek(Token![-]) && !input.peek2(LitInt) && !input.peek2(LitFloat) {
        input.parse::<Token![-]>()?;
        let next: Ident = input.call(Ident::parse_any)?;
        name.push('-');
        name.push_str(&next.to_string());
    }
    Ok((name, first.span()))
}

pub(crate) fn parse_declaration(input: ParseStream) -> Result<PropDeclaration> {
    let (name, name_span) = parse_kebab(input)?;
    input.parse::<Token![:]>()?;

    let mut values = Vec::new();
    while !input.peek(Token![;]) {
        if input.is_empty() {
            return Err(Error::new(name_span, format!("missing `;` after `{name}`")));
        }
        values.push(parse_value(input)?);
    }
    input.parse::<Token![;]>()?;

    if values.iter().all(|value| *value == PropValue::Comma) {
        return Err(Error::new(name_span, format!("property `{name}` has no value")));
    }
    Ok(PropDeclaration {
        name,
        name_span,
        values,
    })
}

fn number_with_unit(digits: String, suffix: &str, span: Span, input: ParseStream) -> Result<String> {
    if !suffix.is_empty() {
        if !UNITS.contains(&suffix) {
            return Err(Error::new(span, format!("unknown unit `{suffix}`")));
        }
        return Ok(format!("{digits}{suffix}"));
    }
    if input.peek(Token![%]) {
        input.parse::<Token![%]>()?;
        return Ok(format!("{digits}%"));
    }
    Ok(digits)
}

fn parse_number(input: ParseStream, negative: bool) -> Result<PropValue> {
    let sign = if negative { "-" } else { "" };
    if input.peek(LitFloat) {
        let lit: LitFloat = input.parse()?;
        let digits = format!("{sign}{}", lit.base10_digits());
        return number_with_unit(digits, lit.suffix(), lit.span(), input).map(PropValue::Number);
    }
    let lit: LitInt = input.parse()?;
    let digits = format!("{sign}{}", lit.base10_digits());
    number_with_unit(digits, lit.suffix(), lit.span(), input).map(PropValue::Number)
}

pub(crate) fn parse_value(input: ParseStream) -> Result<PropValue> {
    if input.peek(Token![,]) {
        input.parse::<Token![,]>()?;
        return Ok(PropValue::Comma);
    }

    if input.peek(Token![#]) {
        input.parse::<Token![#]>()?;
        // `#1a1a2e` arrives as an integer literal with a suffix, `#ff0000` as an ident,
        // `#1e3e5f` as a float.
        let hex = if input.peek(Ident) {
            input.parse::<Ident>()?.to_string()
        } else if input.peek(LitFloat) {
            input.parse::<LitFloat>()?.to_string()
        } else if input.peek(LitInt) {
            let mut hex = input.parse::<LitInt>()?.to_string();
            if input.peek(Ident) {
                hex.push_str(&input.parse::<Ident>()?.to_string());
            }
            hex
        } else {
            return Err(input.error("expected hex color value after `#`"));
        };
        if !hex.chars().all(|ch| ch.is_ascii_hexdigit()) || !matches!(hex.len(), 3 | 4 | 6 | 8) {
            return Err(input.error(format!("invalid hex color `#{hex}`")));
        }
        return Ok(PropValue::Hash(format!("#{hex}")));
    }

    if input.peek(Token![@]) {
        input.parse::<Token![@]>()?;
        let (name, _) = parse_kebab(input)?;
        return Ok(PropValue::Ref(format!("@{name}")));
    }

    if input.peek(LitStr) {
        let lit: LitStr = input.parse()?;
        return Ok(PropValue::Str(lit.value()));
    }

    if input.peek(LitFloat) || input.peek(LitInt) {
        return parse_number(input, false);
    }

    if input.peek(Token![-]) {
        let minus = input.parse::<Token![-]>()?;
        if input.peek(LitFloat) || input.peek(LitInt) {
            return parse_number(input, true);
        }
        return Err(Error::new(minus.span, "expected a number after `-`"));
    }

    if input.peek(Ident::peek_any) {
        let (name, _) = parse_kebab(input)?;
        return Ok(PropValue::Ident(name));
    }

    Err(input.error("unexpected token in property value"))
}

// ---------------------------------------------------------------------------
// Code generation
// ---------------------------------------------------------------------------

/// Entry point: generate code for the entire props! macro.
pub(crate) fn props_impl(input: TokenStream) -> Result<TokenStream> {
    let parsed: PropsInput = syn::parse2(input)?;

    if parsed.declarations.is_empty() {
        return Err(Error::new(
            Span::call_site(),
            "props! macro requires at least one property declaration",
        ));
    }

    let mut seen: Vec<&str> = Vec::new();
    let mut assignments = Vec::new();
    for decl in &parsed.declarations {
        if seen.contains(&decl.name.as_str()) {
            return Err(Error::new(
                decl.name_span,
                format!("property `{}` declared twice", decl.name),
            ));
        }
        seen.push(&decl.name);
        let name = &decl.name;
        let text = decl.value_text();
        assignments.push(quote! {
            ::rui::property::PropertyContainer::set(&mut __props, #name, #text);
        });
    }

    Ok(quote! {
        {
            let mut __props = ::rui::property::PropertyObject::new(&::rui::view::VIEW_SCHEMA);
            #(#assignments)*
            __props
        }
    })
}

// ===========================================================================
// Tests
// ===========================================================================
