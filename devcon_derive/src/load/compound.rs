use crate::load::{named_fields, owned_type};
use crate::model::{DeriveCompound, DeriveSlot, DeriveValue, IntermediateAttributes};
use quote::ToTokens;

impl TryFrom<syn::DeriveInput> for DeriveCompound {
    type Error = syn::Error;

    fn try_from(value: syn::DeriveInput) -> Result<Self, Self::Error> {
        let span = value.ident.span();
        let attributes = IntermediateAttributes::collect(&value.attrs)?;
        attributes.allow_only(span, &["validate"])?;
        let validate = attributes.single(span, "validate")?;
        let slots = named_fields(&value, "Compound")?
            .into_iter()
            .map(DeriveSlot::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        if slots.is_empty() {
            return Err(syn::Error::new(
                span,
                "Invalid - Compound requires at least one field.",
            ));
        }

        Ok(DeriveCompound {
            struct_name: value.ident.clone(),
            validate,
            slots,
        })
    }
}

impl TryFrom<&syn::Field> for DeriveSlot {
    type Error = syn::Error;

    fn try_from(value: &syn::Field) -> Result<Self, Self::Error> {
        let field_name = value
            .ident
            .clone()
            .ok_or_else(|| syn::Error::new_spanned(value, "Invalid - field must be named."))?;
        owned_type(&field_name, &value.ty)?;
        let attributes = IntermediateAttributes::collect(&value.attrs)?;
        attributes.allow_only(field_name.span(), &["default"])?;
        let default = attributes.single(field_name.span(), "default")?;

        Ok(DeriveSlot {
            field_name,
            field_type: DeriveValue {
                tokens: value.ty.to_token_stream(),
            },
            default,
        })
    }
}
