use crate::model::{DeriveCompound, DeriveSlot};
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;

impl From<DeriveCompound> for TokenStream2 {
    fn from(value: DeriveCompound) -> Self {
        let DeriveCompound {
            struct_name,
            validate,
            slots,
        } = value;
        let template = slots
            .iter()
            .map(|slot| slot.field_name.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        let takes: Vec<TokenStream2> = slots
            .iter()
            .map(|slot| {
                let field_name = &slot.field_name;
                let field_type = &slot.field_type.tokens;
                quote! {
                    #field_name: elements.take::<#field_type>()?,
                }
            })
            .collect();
        let slots: Vec<TokenStream2> = slots.into_iter().map(TokenStream2::from).collect();
        let assemble = match validate {
            Some(validate) => {
                let validate = validate.tokens;
                quote! {
                    let value = Self { #( #takes )* };
                    if #validate(&value) {
                        ::std::option::Option::Some(value)
                    } else {
                        ::std::option::Option::None
                    }
                }
            }
            None => quote! {
                ::std::option::Option::Some(Self { #( #takes )* })
            },
        };

        quote! {
            impl ::devcon::Compound for #struct_name {
                fn slots(
                    registry: &::devcon::ParserRegistry,
                ) -> ::std::result::Result<::std::vec::Vec<::devcon::Slot>, ::devcon::RegistryError> {
                    ::std::result::Result::Ok(::std::vec![ #( #slots ),* ])
                }

                fn assemble(elements: &mut ::devcon::Elements) -> ::std::option::Option<Self> {
                    #assemble
                }

                fn format(_slots: &[::devcon::Slot]) -> ::std::string::String {
                    let (open, close) = <Self as ::devcon::Compound>::grouping()[0];
                    ::std::format!("{}{}{}", open, #template, close)
                }
            }

            impl ::devcon::Parsable for #struct_name {
                fn create_parser(
                    registry: &::devcon::ParserRegistry,
                ) -> ::std::result::Result<
                    ::std::sync::Arc<dyn ::devcon::ParameterParser<Self>>,
                    ::devcon::RegistryError,
                > {
                    ::devcon::compound_parser::<Self>(registry)
                }
            }
        }
    }
}

impl From<DeriveSlot> for TokenStream2 {
    fn from(value: DeriveSlot) -> Self {
        let field_type = value.field_type.tokens;

        match value.default {
            Some(default) => {
                let default = default.tokens;
                quote! {
                    ::devcon::Slot::with_default::<#field_type>(registry, #default)?
                }
            }
            None => quote! {
                ::devcon::Slot::required::<#field_type>(registry)?
            },
        }
    }
}
