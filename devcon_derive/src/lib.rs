//! Derive macros for `devcon`.
//! See [devcon::derive](https://docs.rs/devcon/latest/devcon/derive/index.html) for the attribute reference.
extern crate proc_macro;

mod generate;
mod load;
mod model;

use crate::model::{DeriveCommand, DeriveCompound};
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;

/// Declare a command grammar from a struct with named fields.
///
/// Generates `impl devcon::Command`.
#[proc_macro_derive(Command, attributes(devcon))]
pub fn command(input: TokenStream) -> TokenStream {
    let ast = syn::parse_macro_input!(input as syn::DeriveInput);

    match DeriveCommand::try_from(ast) {
        Ok(command) => TokenStream2::from(command).into(),
        Err(error) => error.to_compile_error().into(),
    }
}

/// Parse a struct with named fields as a grouped literal, one element per field: `[x y z]`.
///
/// Generates `impl devcon::Compound` and `impl devcon::Parsable`.
#[proc_macro_derive(Compound, attributes(devcon))]
pub fn compound(input: TokenStream) -> TokenStream {
    let ast = syn::parse_macro_input!(input as syn::DeriveInput);

    match DeriveCompound::try_from(ast) {
        Ok(compound) => TokenStream2::from(compound).into(),
        Err(error) => error.to_compile_error().into(),
    }
}
