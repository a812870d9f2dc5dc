use proc_macro2::TokenStream;
use quote::quote;
use syn::{Attribute, Data, DeriveInput, Error, Fields, Ident, LitStr, Type};

// derive_entity
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let input: DeriveInput = match syn::parse2(input) {
        Ok(input) => input,
        Err(err) => return err.to_compile_error(),
    };

    match expand(&input) {
        Ok(tokens) => tokens,
        Err(err) => err.to_compile_error(),
    }
}

///
/// EntityField
///

struct EntityField<'a> {
    ident: &'a Ident,
    ty: &'a Type,
    tag: String,
}

fn expand(input: &DeriveInput) -> Result<TokenStream, Error> {
    let ident = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(Error::new_spanned(
            &input.generics,
            "Entity cannot be derived for generic structs",
        ));
    }

    let Data::Struct(data) = &input.data else {
        return Err(Error::new_spanned(
            ident,
            "Entity can only be derived for structs with named fields",
        ));
    };
    let Fields::Named(named) = &data.fields else {
        return Err(Error::new_spanned(
            &data.fields,
            "Entity can only be derived for structs with named fields",
        ));
    };

    let name = struct_name(&input.attrs)?;
    let fields = named
        .named
        .iter()
        .map(|field| {
            let ident = field
                .ident
                .as_ref()
                .ok_or_else(|| Error::new_spanned(field, "expected a named field"))?;
            let tag = field_tag(&field.attrs)?.unwrap_or_else(|| ident.to_string());

            Ok(EntityField {
                ident,
                ty: &field.ty,
                tag,
            })
        })
        .collect::<Result<Vec<_>, Error>>()?;

    let ident_str = ident.to_string();
    let name_tokens = match name {
        Some(name) => quote!(::core::option::Option::Some(#name)),
        None => quote!(::core::option::Option::None),
    };

    let field_models = fields.iter().map(|field| {
        let field_name = field.ident.to_string();
        let tag = &field.tag;
        let ty = field.ty;

        quote! {
            ::relorm::model::FieldModel {
                name: #field_name,
                tag: #tag,
                ty: <#ty as ::relorm::traits::Column>::field_type,
            }
        }
    });
    let field_idents = fields.iter().map(|field| field.ident).collect::<Vec<_>>();

    Ok(quote! {
        impl ::relorm::traits::Entity for #ident {
            const MODEL: &'static ::relorm::model::EntityModel = &::relorm::model::EntityModel {
                ident: #ident_str,
                path: ::core::module_path!(),
                name: #name_tokens,
                fields: &[#(#field_models),*],
            };
        }

        impl ::relorm::traits::Record for #ident {
            fn model(&self) -> &'static ::relorm::model::EntityModel {
                <Self as ::relorm::traits::Entity>::MODEL
            }

            fn columns(&self) -> ::std::vec::Vec<&dyn ::relorm::traits::Column> {
                ::std::vec![#(&self.#field_idents as &dyn ::relorm::traits::Column),*]
            }

            fn columns_mut(&mut self) -> ::std::vec::Vec<&mut dyn ::relorm::traits::Column> {
                let Self { #(#field_idents),* } = self;
                ::std::vec![#(#field_idents as &mut dyn ::relorm::traits::Column),*]
            }
        }

        impl ::relorm::traits::Column for #ident {
            fn field_type() -> ::relorm::model::FieldType {
                ::relorm::traits::entity_field_type::<Self>()
            }

            fn from_value(
                value: ::relorm::value::Value,
            ) -> ::core::result::Result<Self, ::relorm::value::ValueError> {
                ::relorm::traits::entity_from_value::<Self>(value)
            }

            fn get_value(&self) -> ::relorm::value::Value {
                ::relorm::traits::entity_get_value(self)
            }

            fn set_value(
                &mut self,
                value: ::relorm::value::Value,
            ) -> ::core::result::Result<(), ::relorm::value::ValueError> {
                ::relorm::traits::entity_set_value(self, value)
            }

            fn records(&self) -> ::std::vec::Vec<&dyn ::relorm::traits::Record> {
                ::std::vec![self as &dyn ::relorm::traits::Record]
            }

            fn records_mut(&mut self) -> ::std::vec::Vec<&mut dyn ::relorm::traits::Record> {
                ::std::vec![self as &mut dyn ::relorm::traits::Record]
            }
        }

        impl ::relorm::traits::Element for #ident {}
    })
}

/// `#[orm(name = "...")]` on the struct.
fn struct_name(attrs: &[Attribute]) -> Result<Option<LitStr>, Error> {
    let mut name = None;

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("orm")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                let value: LitStr = meta.value()?.parse()?;
                if value.value().trim().is_empty() {
                    return Err(meta.error("orm name cannot be empty"));
                }
                name = Some(value);
                Ok(())
            } else {
                Err(meta.error("unsupported orm attribute, expected `name = \"...\"`"))
            }
        })?;
    }

    Ok(name)
}

/// `#[orm("tag")]` on a field.
fn field_tag(attrs: &[Attribute]) -> Result<Option<String>, Error> {
    let mut tag = None;

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("orm")) {
        if tag.is_some() {
            return Err(Error::new_spanned(attr, "duplicate orm tag"));
        }
        let lit: LitStr = attr.parse_args()?;
        tag = Some(lit.value());
    }

    Ok(tag)
}
