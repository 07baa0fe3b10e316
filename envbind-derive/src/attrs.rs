//! Attribute parsing for `#[env(...)]` annotations.
//!
//! A field attribute holds an optional leading string literal, the field's
//! main tag, followed by `key = literal` annotations:
//!
//! ```ignore
//! #[env("DEADLINE,default=12:00", time_format = "%H:%M", time_utc = true)]
//! ```

use proc_macro2::Span;
use syn::ext::IdentExt;
use syn::parse::{Parse, ParseStream};
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{Field, Ident, Lit, Token};

/// Annotation key under which the leading string literal is stored.
pub const TAG_KEY: &str = "env";

/// Parsed `#[env(...)]` attributes from a struct field.
#[derive(Debug, Default)]
pub struct FieldAttrs {
    /// `key -> value` annotations in declaration order.
    pub annotations: Vec<(String, String)>,
}

enum Arg {
    Tag(String),
    Annotation(Ident, String),
}

impl Parse for Arg {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        if input.peek(Lit) {
            return match input.parse::<Lit>()? {
                Lit::Str(s) => Ok(Arg::Tag(s.value())),
                other => Err(syn::Error::new_spanned(other, "expected a string tag")),
            };
        }

        let key = Ident::parse_any(input)?;
        input.parse::<Token![=]>()?;
        let value = match input.parse::<Lit>()? {
            Lit::Str(s) => s.value(),
            Lit::Bool(b) => b.value.to_string(),
            Lit::Int(i) => i.base10_digits().to_string(),
            other => {
                return Err(syn::Error::new_spanned(
                    other,
                    "annotation values must be string, bool or integer literals",
                ))
            }
        };
        Ok(Arg::Annotation(key, value))
    }
}

impl FieldAttrs {
    /// Extract and parse `#[env(...)]` attributes from a struct field.
    ///
    /// Several `#[env]` attributes on one field are merged; a key may only
    /// appear once.
    pub fn from_field(field: &Field) -> syn::Result<Self> {
        let mut attrs = Self::default();

        for attr in &field.attrs {
            if !attr.path().is_ident("env") {
                continue;
            }

            let args = attr.parse_args_with(Punctuated::<Arg, Token![,]>::parse_terminated)?;
            for arg in args {
                let (key, value, span): (String, String, Span) = match arg {
                    Arg::Tag(tag) => (TAG_KEY.to_string(), tag, attr.span()),
                    Arg::Annotation(key, value) => (key.to_string(), value, key.span()),
                };

                if attrs.annotation(&key).is_some() {
                    return Err(syn::Error::new(span, format!("duplicate annotation `{key}`")));
                }
                attrs.annotations.push((key, value));
            }
        }

        Ok(attrs)
    }

    pub fn annotation(&self, key: &str) -> Option<&str> {
        self.annotations
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}
