use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Field, Fields, Ident, punctuated::Punctuated, token::Comma};

use crate::attribute_parser::{active_model_type, field_options, option_inner};

fn named_fields(input: &DeriveInput) -> syn::Result<&Punctuated<Field, Comma>> {
    if let Data::Struct(data) = &input.data
        && let Fields::Named(named) = &data.fields
    {
        return Ok(&named.named);
    }
    Err(syn::Error::new_spanned(
        &input.ident,
        "crudrepo derives only support structs with named fields",
    ))
}

/// Fields that map onto columns, in declaration order, paired with the
/// active model field they assign (`rename` if given).
fn column_fields(input: &DeriveInput) -> syn::Result<Vec<(&Field, Ident)>> {
    let mut fields = Vec::new();
    for field in named_fields(input)? {
        let options = field_options(field)?;
        if options.skip {
            continue;
        }
        let Some(ident) = &field.ident else {
            continue;
        };
        let target = match options.rename {
            Some(rename) => Ident::new(&rename, ident.span()),
            None => ident.clone(),
        };
        fields.push((field, target));
    }
    Ok(fields)
}

pub(crate) fn fields_impl(input: &DeriveInput) -> syn::Result<TokenStream> {
    let mut names = Vec::new();
    for field in named_fields(input)? {
        let options = field_options(field)?;
        if options.skip {
            continue;
        }
        let name = match options.rename {
            Some(rename) => rename,
            None => field
                .ident
                .as_ref()
                .map(|ident| ident.to_string().trim_start_matches("r#").to_string())
                .unwrap_or_default(),
        };
        names.push(name);
    }

    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    Ok(quote! {
        impl #impl_generics ::crudrepo::Fields for #ident #ty_generics #where_clause {
            const FIELDS: &'static [&'static str] = &[#(#names),*];
        }
    })
}

pub(crate) fn to_active_model_impl(input: &DeriveInput) -> syn::Result<TokenStream> {
    let active_model = active_model_type(input)?;
    let assignments = column_fields(input)?.into_iter().map(|(field, target)| {
        let ident = &field.ident;
        quote! {
            model.#target = ::sea_orm::ActiveValue::Set(self.#ident);
        }
    });

    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    Ok(quote! {
        impl #impl_generics ::sea_orm::IntoActiveModel<#active_model> for #ident #ty_generics #where_clause {
            fn into_active_model(self) -> #active_model {
                let mut model: #active_model = ::core::default::Default::default();
                #(#assignments)*
                model
            }
        }
    })
}

pub(crate) fn patch_impl(input: &DeriveInput) -> syn::Result<TokenStream> {
    let active_model = active_model_type(input)?;
    let mut assignments = Vec::new();
    for (field, target) in column_fields(input)? {
        if option_inner(&field.ty).is_none() {
            return Err(syn::Error::new_spanned(
                &field.ty,
                "patch fields must be `Option<T>` (use `Option<Option<T>>` for nullable columns)",
            ));
        }
        let ident = &field.ident;
        assignments.push(quote! {
            model.#target = match self.#ident {
                ::core::option::Option::Some(value) => ::sea_orm::ActiveValue::Set(value),
                ::core::option::Option::None => ::sea_orm::ActiveValue::NotSet,
            };
        });
    }

    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    Ok(quote! {
        impl #impl_generics ::sea_orm::IntoActiveModel<#active_model> for #ident #ty_generics #where_clause {
            fn into_active_model(self) -> #active_model {
                let mut model: #active_model = <#active_model as ::sea_orm::ActiveModelTrait>::default();
                #(#assignments)*
                model
            }
        }
    })
}
