use crate::model::{DeriveCommand, DeriveParameter, ParameterType, Requirement};
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;

impl From<DeriveCommand> for TokenStream2 {
    fn from(value: DeriveCommand) -> Self {
        let DeriveCommand {
            struct_name,
            parameters,
        } = value;
        let takes: Vec<TokenStream2> = parameters
            .iter()
            .enumerate()
            .map(|(index, parameter)| {
                let field_name = &parameter.field_name;
                let field_type = &parameter.field_type.tokens;
                quote! {
                    #field_name: arguments.take::<#field_type>(#index)?,
                }
            })
            .collect();
        let adds: Vec<TokenStream2> = parameters.into_iter().map(TokenStream2::from).collect();

        quote! {
            impl ::devcon::Command for #struct_name {
                fn grammar(
                    registry: &::devcon::ParserRegistry,
                ) -> ::std::result::Result<::devcon::Grammar, ::devcon::ConfigError> {
                    ::devcon::GrammarBuilder::new()
                        #( .add(#adds) )*
                        .build(registry)
                }

                #[allow(unused_mut, unused_variables)]
                fn from_arguments(
                    mut arguments: ::devcon::Arguments,
                ) -> ::std::result::Result<Self, ::devcon::ArgumentError> {
                    ::std::result::Result::Ok(Self {
                        #( #takes )*
                    })
                }
            }
        }
    }
}

impl From<DeriveParameter> for TokenStream2 {
    fn from(value: DeriveParameter) -> Self {
        let DeriveParameter {
            field_name: _,
            field_type,
            parameter_type,
            name,
            requirement,
            meta,
            flag,
            min,
            max,
            description,
            parser,
        } = value;
        let field_type = field_type.tokens;
        let positional = matches!(parameter_type, ParameterType::Positional);
        let mut out = match parameter_type {
            ParameterType::Positional => quote! {
                ::devcon::Parameter::<#field_type>::positional(#name)
            },
            ParameterType::Switch { short } => {
                let short = short.tokens;
                quote! {
                    ::devcon::Parameter::<#field_type>::switch(#short).long(#name)
                }
            }
            ParameterType::RequiredSwitch { short } => {
                let short = short.tokens;
                quote! {
                    ::devcon::Parameter::<#field_type>::required_switch(#short).long(#name)
                }
            }
        };

        match requirement {
            Requirement::Required => {}
            // Switches are optional from the outset.
            Requirement::Optional if positional => out.extend(quote! { .optional() }),
            Requirement::Optional => {}
            Requirement::Default(default) => {
                let default = default.tokens;
                out.extend(quote! { .default_value(#default) });
            }
            Requirement::DefaultRaw(default) => {
                let default = default.tokens;
                out.extend(quote! { .default_raw(#default) });
            }
        }

        let modifiers = [
            (quote! { meta }, meta),
            (quote! { flag }, flag),
            (quote! { min }, min),
            (quote! { max }, max),
            (quote! { description }, description),
            (quote! { parser }, parser),
        ];

        for (modifier, value) in modifiers {
            if let Some(value) = value {
                let tokens = value.tokens;
                out.extend(quote! { .#modifier(#tokens) });
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::test::ident;
    use crate::model::DeriveValue;

    fn parameter(
        field_type: TokenStream2,
        parameter_type: ParameterType,
        name: &str,
        requirement: Requirement,
    ) -> DeriveParameter {
        DeriveParameter {
            field_name: ident("my_field"),
            field_type: DeriveValue { tokens: field_type },
            parameter_type,
            name: name.to_string(),
            requirement,
            meta: None,
            flag: None,
            min: None,
            max: None,
            description: None,
            parser: None,
        }
    }

    fn value(tokens: TokenStream2) -> DeriveValue {
        DeriveValue { tokens }
    }

    #[test]
    fn render_command_empty() {
        // Setup
        let command = DeriveCommand {
            struct_name: ident("Nothing"),
            parameters: vec![],
        };

        // Execute
        let token_stream = TokenStream2::from(command);

        // Verify
        assert_eq!(
            token_stream.to_string(),
            quote! {
                impl ::devcon::Command for Nothing {
                    fn grammar(
                        registry: &::devcon::ParserRegistry,
                    ) -> ::std::result::Result<::devcon::Grammar, ::devcon::ConfigError> {
                        ::devcon::GrammarBuilder::new()
                            .build(registry)
                    }

                    #[allow(unused_mut, unused_variables)]
                    fn from_arguments(
                        mut arguments: ::devcon::Arguments,
                    ) -> ::std::result::Result<Self, ::devcon::ArgumentError> {
                        ::std::result::Result::Ok(Self {})
                    }
                }
            }
            .to_string()
        );
    }

    #[test]
    fn render_command() {
        // Setup
        let command = DeriveCommand {
            struct_name: ident("Greet"),
            parameters: vec![
                DeriveParameter {
                    field_name: ident("message"),
                    ..parameter(
                        quote! { String },
                        ParameterType::Positional,
                        "message",
                        Requirement::Required,
                    )
                },
                DeriveParameter {
                    field_name: ident("verbose"),
                    ..parameter(
                        quote! { bool },
                        ParameterType::Switch {
                            short: value(quote! { 'v' }),
                        },
                        "verbose",
                        Requirement::Optional,
                    )
                },
            ],
        };

        // Execute
        let token_stream = TokenStream2::from(command);

        // Verify
        assert_eq!(
            token_stream.to_string(),
            quote! {
                impl ::devcon::Command for Greet {
                    fn grammar(
                        registry: &::devcon::ParserRegistry,
                    ) -> ::std::result::Result<::devcon::Grammar, ::devcon::ConfigError> {
                        ::devcon::GrammarBuilder::new()
                            .add(::devcon::Parameter::<String>::positional("message"))
                            .add(::devcon::Parameter::<bool>::switch('v').long("verbose"))
                            .build(registry)
                    }

                    #[allow(unused_mut, unused_variables)]
                    fn from_arguments(
                        mut arguments: ::devcon::Arguments,
                    ) -> ::std::result::Result<Self, ::devcon::ArgumentError> {
                        ::std::result::Result::Ok(Self {
                            message: arguments.take::<String>(0usize)?,
                            verbose: arguments.take::<bool>(1usize)?,
                        })
                    }
                }
            }
            .to_string()
        );
    }

    #[test]
    fn render_positional_optional() {
        // Setup
        let parameter = parameter(
            quote! { u32 },
            ParameterType::Positional,
            "count",
            Requirement::Optional,
        );

        // Execute
        let token_stream = TokenStream2::from(parameter);

        // Verify
        assert_eq!(
            token_stream.to_string(),
            quote! { ::devcon::Parameter::<u32>::positional("count").optional() }.to_string()
        );
    }

    #[test]
    fn render_positional_modifiers() {
        // Setup
        let parameter = DeriveParameter {
            min: Some(value(quote! { 1 })),
            max: Some(value(quote! { 3 })),
            description: Some(value(quote! { "The items." })),
            parser: Some(value(quote! { MyParser })),
            ..parameter(
                quote! { Vec<u32> },
                ParameterType::Positional,
                "ITEMS",
                Requirement::DefaultRaw(value(quote! { "[1]" })),
            )
        };

        // Execute
        let token_stream = TokenStream2::from(parameter);

        // Verify
        assert_eq!(
            token_stream.to_string(),
            quote! {
                ::devcon::Parameter::<Vec<u32> >::positional("ITEMS")
                    .default_raw("[1]")
                    .min(1)
                    .max(3)
                    .description("The items.")
                    .parser(MyParser)
            }
            .to_string()
        );
    }

    #[test]
    fn render_switch() {
        // Setup
        let parameter = DeriveParameter {
            meta: Some(value(quote! { "N" })),
            ..parameter(
                quote! { f32 },
                ParameterType::Switch {
                    short: value(quote! { 'd' }),
                },
                "dry-run",
                Requirement::Default(value(quote! { 2.5 })),
            )
        };

        // Execute
        let token_stream = TokenStream2::from(parameter);

        // Verify
        assert_eq!(
            token_stream.to_string(),
            quote! {
                ::devcon::Parameter::<f32>::switch('d')
                    .long("dry-run")
                    .default_value(2.5)
                    .meta("N")
            }
            .to_string()
        );
    }

    #[test]
    fn render_required_switch() {
        // Setup
        let parameter = DeriveParameter {
            flag: Some(value(quote! { false })),
            ..parameter(
                quote! { bool },
                ParameterType::RequiredSwitch {
                    short: value(quote! { 'f' }),
                },
                "force",
                Requirement::Required,
            )
        };

        // Execute
        let token_stream = TokenStream2::from(parameter);

        // Verify
        assert_eq!(
            token_stream.to_string(),
            quote! {
                ::devcon::Parameter::<bool>::required_switch('f')
                    .long("force")
                    .flag(false)
            }
            .to_string()
        );
    }
}
