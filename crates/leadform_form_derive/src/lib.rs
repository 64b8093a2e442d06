use proc_macro::TokenStream;
use proc_macro2::{Ident, Span, TokenStream as TokenStream2};
use proc_macro_crate::{FoundCrate, crate_name};
use quote::quote;
use syn::{Data, DeriveInput, Fields, parse_macro_input};

/// Derives `leadform::form::FormModel` for a struct whose named fields are all
/// `AsRef<str>`. Field keys are the Rust field names, in declaration order.
#[proc_macro_derive(FormModel)]
pub fn derive_form_model(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    if !input.generics.params.is_empty() {
        return syn::Error::new_spanned(
            input.ident,
            "FormModel derive currently supports only non-generic structs",
        )
        .to_compile_error()
        .into();
    }

    let model_ident = input.ident;

    let named_fields = match input.data {
        Data::Struct(data) => match data.fields {
            Fields::Named(fields) => fields.named,
            _ => {
                return syn::Error::new(
                    Span::call_site(),
                    "FormModel derive requires a struct with named fields",
                )
                .to_compile_error()
                .into();
            }
        },
        _ => {
            return syn::Error::new(
                Span::call_site(),
                "FormModel derive is only supported on structs",
            )
            .to_compile_error()
            .into();
        }
    };

    let leadform = leadform_path();
    let mut keys = Vec::new();
    let mut pushes = Vec::new();

    for field in named_fields {
        let Some(field_ident) = field.ident else {
            continue;
        };
        let field_name = field_ident.to_string();

        keys.push(quote! {
            #leadform::form::FieldKey::new(#field_name)
        });
        pushes.push(quote! {
            values.push(
                #leadform::form::FieldKey::new(#field_name),
                ::core::convert::AsRef::<str>::as_ref(&self.#field_ident),
            );
        });
    }

    quote! {
        impl #leadform::form::FormModel for #model_ident {
            const FIELDS: &'static [#leadform::form::FieldKey] = &[#(#keys),*];

            fn to_values(&self) -> #leadform::form::FormValues {
                let mut values = #leadform::form::FormValues::new();
                #(#pushes)*
                values
            }
        }
    }
    .into()
}

fn leadform_path() -> TokenStream2 {
    match crate_name("leadform") {
        Ok(FoundCrate::Name(name)) => {
            let ident = Ident::new(&name, Span::call_site());
            quote!(::#ident)
        }
        Ok(FoundCrate::Itself) => quote!(crate),
        Err(_) => quote!(::leadform),
    }
}
