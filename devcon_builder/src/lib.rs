//! Grammar engine for `devcon`.
//! See [documentation root](https://docs.rs/devcon/latest/devcon/index.html) for full details.
#![deny(missing_docs)]
mod api;
mod constant;
mod input;
mod matcher;
mod model;
mod parser;
mod printer;
mod registry;

pub use api::*;
pub use input::*;
pub use matcher::ParseError;
pub use model::*;
pub use parser::*;
pub use printer::Printer;
pub use registry::*;

#[cfg(test)]
#[macro_use]
extern crate assert_matches;
