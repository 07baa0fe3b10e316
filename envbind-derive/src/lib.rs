//! Derive macro implementation for envbind

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::ext::IdentExt;
use syn::{parse_macro_input, parse_quote, Data, DeriveInput, Fields, GenericParam};

mod attrs;

use attrs::{FieldAttrs, TAG_KEY};

/// Tag that leaves a field out of the generated schema.
const SKIP_TAG: &str = "-";

/// `Bind` derive macro
///
/// Implements `envbind::Bind` and `envbind::Fields` for a struct with named
/// fields. Each field is bound in declaration order.
///
/// # Field attributes
///
/// - `#[env("NAME,default=value,required")]`: the field tag
/// - `#[env("-")]`: leave the field untouched; the field is left out of the
///   generated code, so its type does not have to implement `Bind`
/// - `#[env(key = "value")]`: extra annotations such as `time_format`,
///   `time_utc` or `time_location`
///
/// Several attributes may be combined in one `#[env(...)]`, the tag first.
///
/// # Example
///
/// See the `envbind` crate documentation for usage examples.
#[proc_macro_derive(Bind, attributes(env))]
pub fn derive_bind(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(mut input: DeriveInput) -> syn::Result<TokenStream2> {
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input,
                    "Bind only supports structs with named fields",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "Bind only supports structs",
            ))
        }
    };

    let mut calls = Vec::with_capacity(fields.len());
    for field in fields {
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let name = ident.unraw().to_string();
        let attrs = FieldAttrs::from_field(field)?;
        // Skipped fields get no call, so their type needs no `Bind` impl.
        if attrs.annotation(TAG_KEY) == Some(SKIP_TAG) {
            continue;
        }
        let pairs = attrs.annotations.iter().map(|(k, v)| quote!((#k, #v)));

        calls.push(quote! {
            walker.field(
                &mut self.#ident,
                &::envbind::Field::new(#name, &[#(#pairs),*]),
            )?;
        });
    }

    for param in &mut input.generics.params {
        if let GenericParam::Type(ty) = param {
            ty.bounds.push(parse_quote!(::envbind::Bind));
        }
    }

    let struct_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::envbind::Bind for #struct_name #ty_generics #where_clause {
            fn target(&mut self) -> ::envbind::Target<'_> {
                ::envbind::Target::Struct(self)
            }
        }

        impl #impl_generics ::envbind::Fields for #struct_name #ty_generics #where_clause {
            #[allow(unused_variables)]
            fn bind_fields(
                &mut self,
                walker: &::envbind::Walker<'_>,
            ) -> ::core::result::Result<(), ::envbind::Error> {
                #(#calls)*
                ::core::result::Result::Ok(())
            }
        }
    })
}
