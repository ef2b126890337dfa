mod arguments;
mod grammar;
mod parameter;

pub use arguments::*;
pub use grammar::*;
pub use parameter::*;
