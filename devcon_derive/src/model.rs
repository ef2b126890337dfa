use proc_macro2::TokenStream as TokenStream2;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone)]
pub struct DeriveValue {
    pub tokens: TokenStream2,
}

impl PartialEq for DeriveValue {
    fn eq(&self, other: &Self) -> bool {
        let st = &self.tokens.to_string();
        let ot = &other.tokens.to_string();
        st == ot
    }
}

impl Eq for DeriveValue {}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct IntermediateAttributes {
    pub singletons: HashSet<String>,
    pub pairs: HashMap<String, Vec<DeriveValue>>,
}

/// How the parameter appears in the argument text.
#[derive(Debug, PartialEq, Eq)]
pub enum ParameterType {
    Positional,
    Switch { short: DeriveValue },
    RequiredSwitch { short: DeriveValue },
}

/// What an unfilled parameter receives.
#[derive(Debug, PartialEq, Eq)]
pub enum Requirement {
    Required,
    Optional,
    Default(DeriveValue),
    DefaultRaw(DeriveValue),
}

#[derive(Debug, PartialEq, Eq)]
pub struct DeriveParameter {
    pub field_name: syn::Ident,
    pub field_type: DeriveValue,
    pub parameter_type: ParameterType,
    // The positional meta, or the switch long name.
    pub name: String,
    pub requirement: Requirement,
    pub meta: Option<DeriveValue>,
    pub flag: Option<DeriveValue>,
    pub min: Option<DeriveValue>,
    pub max: Option<DeriveValue>,
    pub description: Option<DeriveValue>,
    pub parser: Option<DeriveValue>,
}

#[derive(Debug, PartialEq, Eq)]
pub struct DeriveCommand {
    pub struct_name: syn::Ident,
    pub parameters: Vec<DeriveParameter>,
}

#[derive(Debug, PartialEq, Eq)]
pub struct DeriveSlot {
    pub field_name: syn::Ident,
    pub field_type: DeriveValue,
    pub default: Option<DeriveValue>,
}

#[derive(Debug, PartialEq, Eq)]
pub struct DeriveCompound {
    pub struct_name: syn::Ident,
    pub validate: Option<DeriveValue>,
    pub slots: Vec<DeriveSlot>,
}
