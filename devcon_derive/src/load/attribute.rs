use crate::model::{DeriveValue, IntermediateAttributes};
use quote::{quote, ToTokens};
use std::collections::{HashMap, HashSet};

impl TryFrom<&syn::Attribute> for IntermediateAttributes {
    type Error = syn::Error;

    fn try_from(value: &syn::Attribute) -> Result<Self, Self::Error> {
        let attributes_parser =
            syn::punctuated::Punctuated::<syn::Expr, syn::Token![,]>::parse_terminated;
        let mut singletons = HashSet::default();
        let mut pairs: HashMap<String, Vec<DeriveValue>> = HashMap::default();

        for expression in value.parse_args_with(attributes_parser)? {
            match expression {
                syn::Expr::Assign(assignment) => {
                    let left = assignment.left.to_token_stream();
                    let values = pairs.entry(left.to_string()).or_default();
                    values.push(DeriveValue {
                        tokens: assignment.right.to_token_stream(),
                    });
                }
                syn::Expr::Path(path) if path.path.get_ident().is_some() => {
                    if let Some(ident) = path.path.get_ident() {
                        singletons.insert(ident.to_string());
                    }
                }
                _ => {
                    let tts = expression.to_token_stream();
                    let expression_string = quote! {
                        #tts
                    };
                    return Err(syn::Error::new_spanned(
                        expression,
                        format!("Invalid - unparseable attribute `{expression_string}`."),
                    ));
                }
            };
        }

        Ok(Self { singletons, pairs })
    }
}

impl IntermediateAttributes {
    /// Merge every `#[devcon(..)]` attribute, ignoring all others.
    pub(crate) fn collect(attributes: &[syn::Attribute]) -> Result<Self, syn::Error> {
        let mut out = Self::default();

        for attribute in attributes {
            if attribute.path().is_ident("devcon") {
                let next = Self::try_from(attribute)?;
                out.singletons.extend(next.singletons);

                for (key, values) in next.pairs {
                    out.pairs.entry(key).or_default().extend(values);
                }
            }
        }

        Ok(out)
    }

    /// Reject any attribute name outside `allowed`.
    pub(crate) fn allow_only(
        &self,
        span: proc_macro2::Span,
        allowed: &[&str],
    ) -> Result<(), syn::Error> {
        let mut names: Vec<&String> = self.singletons.iter().chain(self.pairs.keys()).collect();
        names.sort();

        for name in names {
            if !allowed.contains(&name.as_str()) {
                return Err(syn::Error::new(
                    span,
                    format!("Invalid - unknown attribute `#[devcon({name})]`."),
                ));
            }
        }

        Ok(())
    }

    pub(crate) fn has(&self, name: &str) -> bool {
        self.singletons.contains(name)
    }

    /// The value of the pair `name = ..`, which may appear at most once.
    pub(crate) fn single(
        &self,
        span: proc_macro2::Span,
        name: &str,
    ) -> Result<Option<DeriveValue>, syn::Error> {
        match self.pairs.get(name).map(|values| values.as_slice()) {
            None | Some([]) => Ok(None),
            Some([value]) => Ok(Some(value.clone())),
            Some(_) => Err(syn::Error::new(
                span,
                format!("Invalid - `#[devcon({name} = ..)]` may only appear once."),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proc_macro2::{Literal, Span};
    use quote::ToTokens;
    use std::collections::{HashMap, HashSet};
    use syn::parse_quote;

    #[test]
    fn construct_derive_attributes_empty() {
        // Setup
        let attribute: syn::Attribute = parse_quote! {
            #[devcon()]
        };

        // Execute
        let derive_attributes = IntermediateAttributes::try_from(&attribute).unwrap();

        // Verify
        assert_eq!(
            derive_attributes,
            IntermediateAttributes {
                singletons: HashSet::default(),
                pairs: HashMap::default()
            }
        );
    }

    #[test]
    fn construct_derive_attributes() {
        // Setup
        let attribute: syn::Attribute = parse_quote! {
            #[devcon(optional, description = "123")]
        };

        // Execute
        let derive_attributes = IntermediateAttributes::try_from(&attribute).unwrap();

        // Verify
        assert_eq!(
            derive_attributes,
            IntermediateAttributes {
                singletons: HashSet::from(["optional".to_string()]),
                pairs: HashMap::from([(
                    "description".to_string(),
                    vec![DeriveValue {
                        tokens: Literal::string("123").into_token_stream(),
                    }]
                )])
            }
        );
    }

    #[test]
    fn collect_merges() {
        // Setup
        let attributes: Vec<syn::Attribute> = vec![
            parse_quote! { #[devcon(short = 'c')] },
            parse_quote! { #[doc = "ignored"] },
            parse_quote! { #[devcon(required, short = 'd')] },
        ];

        // Execute
        let derive_attributes = IntermediateAttributes::collect(&attributes).unwrap();

        // Verify
        assert!(derive_attributes.has("required"));
        assert_eq!(derive_attributes.pairs["short"].len(), 2);
        let error = derive_attributes
            .single(Span::call_site(), "short")
            .unwrap_err();
        assert_eq!(
            error.to_string(),
            "Invalid - `#[devcon(short = ..)]` may only appear once."
        );
    }

    #[test]
    fn allow_only() {
        // Setup
        let attribute: syn::Attribute = parse_quote! {
            #[devcon(optional, colour = "red")]
        };
        let derive_attributes = IntermediateAttributes::try_from(&attribute).unwrap();

        // Execute
        let error = derive_attributes
            .allow_only(Span::call_site(), &["optional"])
            .unwrap_err();

        // Verify
        assert_eq!(
            error.to_string(),
            "Invalid - unknown attribute `#[devcon(colour)]`."
        );
        assert!(derive_attributes
            .allow_only(Span::call_site(), &["optional", "colour"])
            .is_ok());
    }

    #[test]
    fn construct_derive_attributes_invalid() {
        // Setup
        let attribute: syn::Attribute = parse_quote! {
            #[devcon]
        };

        // Execute & verify
        assert!(IntermediateAttributes::try_from(&attribute).is_err());
    }

    #[test]
    fn construct_derive_attributes_invalid_expression() {
        // Setup
        let attribute: syn::Attribute = parse_quote! {
            #[devcon(1 + 2)]
        };

        // Execute
        let error = IntermediateAttributes::try_from(&attribute).unwrap_err();

        // Verify
        assert_eq!(
            error.to_string(),
            "Invalid - unparseable attribute `1 + 2`."
        );
    }
}
