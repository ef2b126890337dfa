use crate::load::{incompatible_error, named_fields, owned_type};
use crate::model::{
    DeriveCommand, DeriveParameter, DeriveValue, IntermediateAttributes, ParameterType,
    Requirement,
};
use quote::ToTokens;

const PARAMETER_ATTRIBUTES: &[&str] = &[
    "short",
    "long",
    "meta",
    "optional",
    "required",
    "default",
    "default_raw",
    "flag",
    "min",
    "max",
    "description",
    "parser",
];

impl TryFrom<syn::DeriveInput> for DeriveCommand {
    type Error = syn::Error;

    fn try_from(value: syn::DeriveInput) -> Result<Self, Self::Error> {
        IntermediateAttributes::collect(&value.attrs)?.allow_only(value.ident.span(), &[])?;
        let parameters = named_fields(&value, "Command")?
            .into_iter()
            .map(DeriveParameter::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(DeriveCommand {
            struct_name: value.ident.clone(),
            parameters,
        })
    }
}

impl TryFrom<&syn::Field> for DeriveParameter {
    type Error = syn::Error;

    fn try_from(value: &syn::Field) -> Result<Self, Self::Error> {
        let field_name = value
            .ident
            .clone()
            .ok_or_else(|| syn::Error::new_spanned(value, "Invalid - field must be named."))?;
        owned_type(&field_name, &value.ty)?;
        let attributes = IntermediateAttributes::collect(&value.attrs)?;
        let span = field_name.span();
        attributes.allow_only(span, PARAMETER_ATTRIBUTES)?;

        let short = attributes.single(span, "short")?;
        let long = attributes.single(span, "long")?;
        let meta = attributes.single(span, "meta")?;
        let default = attributes.single(span, "default")?;
        let default_raw = attributes.single(span, "default_raw")?;
        let flag = attributes.single(span, "flag")?;
        let explicit_optional = attributes.has("optional");
        let explicit_required = attributes.has("required");

        exclusive(
            &field_name,
            &[
                (explicit_optional, "#[devcon(optional)]"),
                (explicit_required, "#[devcon(required)]"),
                (default.is_some(), "#[devcon(default = ..)]"),
                (default_raw.is_some(), "#[devcon(default_raw = ..)]"),
            ],
        )?;

        let (parameter_type, name, meta) = match short {
            None => {
                disallow(
                    &field_name,
                    "positional",
                    &[
                        (long.is_some(), "#[devcon(long = ..)]"),
                        (flag.is_some(), "#[devcon(flag = ..)]"),
                        (explicit_required, "#[devcon(required)]"),
                    ],
                )?;
                let name = match meta {
                    Some(meta) => string_literal(&field_name, "meta", &meta)?,
                    None => field_name.to_string(),
                };
                (ParameterType::Positional, name, None)
            }
            Some(short) => {
                let name = match long {
                    Some(long) => string_literal(&field_name, "long", &long)?,
                    None => field_name.to_string().replace('_', "-"),
                };

                if explicit_required {
                    (ParameterType::RequiredSwitch { short }, name, meta)
                } else {
                    (ParameterType::Switch { short }, name, meta)
                }
            }
        };

        let requirement = if let Some(default) = default {
            Requirement::Default(default)
        } else if let Some(default_raw) = default_raw {
            Requirement::DefaultRaw(default_raw)
        } else if explicit_optional {
            Requirement::Optional
        } else {
            match parameter_type {
                ParameterType::Positional | ParameterType::RequiredSwitch { .. } => {
                    Requirement::Required
                }
                ParameterType::Switch { .. } => Requirement::Optional,
            }
        };

        Ok(DeriveParameter {
            field_name,
            field_type: DeriveValue {
                tokens: value.ty.to_token_stream(),
            },
            parameter_type,
            name,
            requirement,
            meta,
            flag,
            min: attributes.single(span, "min")?,
            max: attributes.single(span, "max")?,
            description: attributes.single(span, "description")?,
            parser: attributes.single(span, "parser")?,
        })
    }
}

fn string_literal(
    field_name: &syn::Ident,
    attribute: &str,
    value: &DeriveValue,
) -> Result<String, syn::Error> {
    match syn::parse2::<syn::LitStr>(value.tokens.clone()) {
        Ok(literal) => Ok(literal.value()),
        Err(_) => Err(syn::Error::new(
            field_name.span(),
            format!("Invalid - `#[devcon({attribute} = ..)]` expects a string literal."),
        )),
    }
}

fn disallow(
    field_name: &syn::Ident,
    antecedent: &str,
    conditions: &[(bool, &str)],
) -> Result<(), syn::Error> {
    for (condition, name) in conditions {
        if *condition {
            return Err(incompatible_error(field_name, antecedent, *name));
        }
    }

    Ok(())
}

fn exclusive(field_name: &syn::Ident, conditions: &[(bool, &str)]) -> Result<(), syn::Error> {
    let present: Vec<&str> = conditions
        .iter()
        .filter(|(condition, _)| *condition)
        .map(|(_, name)| *name)
        .collect();

    match present.as_slice() {
        [left, right, ..] => Err(incompatible_error(field_name, *left, *right)),
        _ => Ok(()),
    }
}
