use syn::{Attribute, DeriveInput, Field, LitStr, Type};

/// Per-field options read from `#[repo(...)]`.
#[derive(Default)]
pub(crate) struct FieldOptions {
    pub skip: bool,
    pub rename: Option<String>,
}

pub(crate) fn field_options(field: &Field) -> syn::Result<FieldOptions> {
    let mut options = FieldOptions::default();
    for attr in repo_attrs(&field.attrs) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                options.skip = true;
                Ok(())
            } else if meta.path.is_ident("rename") {
                let value: LitStr = meta.value()?.parse()?;
                options.rename = Some(value.value());
                Ok(())
            } else {
                Err(meta.error("unsupported field attribute, expected `skip` or `rename`"))
            }
        })?;
    }
    Ok(options)
}

/// Reads `#[repo(active_model = "path::ActiveModel")]` from the container.
pub(crate) fn active_model_type(input: &DeriveInput) -> syn::Result<Type> {
    let mut active_model = None;
    for attr in repo_attrs(&input.attrs) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("active_model") {
                let value: LitStr = meta.value()?.parse()?;
                active_model = Some(value.parse::<Type>()?);
                Ok(())
            } else {
                Err(meta.error("unsupported container attribute, expected `active_model`"))
            }
        })?;
    }
    active_model.ok_or_else(|| {
        syn::Error::new_spanned(
            &input.ident,
            "missing `#[repo(active_model = \"...\")]` naming the target active model",
        )
    })
}

fn repo_attrs(attrs: &[Attribute]) -> impl Iterator<Item = &Attribute> {
    attrs.iter().filter(|attr| attr.path().is_ident("repo"))
}

/// Returns the `T` of an `Option<T>` field type, if the type is an `Option`.
pub(crate) fn option_inner(ty: &Type) -> Option<&Type> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    if type_path.qself.is_some() {
        return None;
    }
    let segment = type_path.path.segments.last()?;
    if segment.ident != "Option" {
        return None;
    }
    let syn::PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    match args.args.first()? {
        syn::GenericArgument::Type(inner) => Some(inner),
        _ => None,
    }
}
