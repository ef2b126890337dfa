mod attribute;
mod command;
mod compound;

fn incompatible_error(
    field_name: &syn::Ident,
    left: impl Into<String>,
    right: impl Into<String>,
) -> syn::Error {
    syn::Error::new(
        field_name.span(),
        format!(
            "Invalid - field '{field_name}' cannot be both `{}` and `{}`.",
            left.into(),
            right.into(),
        ),
    )
}

/// The named fields of a struct, or an error for any other shape.
fn named_fields<'a>(
    value: &'a syn::DeriveInput,
    derive: &str,
) -> Result<Vec<&'a syn::Field>, syn::Error> {
    if !value.generics.params.is_empty() {
        return Err(syn::Error::new(
            value.ident.span(),
            format!("Invalid - {derive} does not support generic structs."),
        ));
    }

    match &value.data {
        syn::Data::Struct(syn::DataStruct {
            fields: syn::Fields::Named(fields),
            ..
        }) => Ok(fields.named.iter().collect()),
        syn::Data::Struct(syn::DataStruct {
            fields: syn::Fields::Unit,
            ..
        }) => Ok(Vec::default()),
        _ => Err(syn::Error::new(
            value.ident.span(),
            format!("Invalid - {derive} requires a struct with named fields."),
        )),
    }
}

/// Owned field types only: a parsed value cannot be borrowed from the argument text.
fn owned_type(field_name: &syn::Ident, ty: &syn::Type) -> Result<(), syn::Error> {
    match ty {
        syn::Type::Reference(_) | syn::Type::Ptr(_) => Err(syn::Error::new(
            field_name.span(),
            format!("Invalid - field '{field_name}' cannot be a reference."),
        )),
        _ => Ok(()),
    }
}
