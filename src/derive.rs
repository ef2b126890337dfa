//! Derive Api for `devcon` configuration.
//!
//! ### Getting Started
//! Declare a command with a struct `S` instrumented with `#[derive(Command)]`.
//! This generates `impl devcon::Command for S`: a grammar with one parameter per field, in field order, and the conversion from parsed [`Arguments`](crate::Arguments) back into `S`.
//!
//! ```
//! use devcon::console::Console;
//! use devcon::derive::*;
//!
//! #[derive(Debug, Command)]
//! struct Greet {
//!     #[devcon(description = "Who to greet.")]
//!     name: String,
//!     #[devcon(optional)]
//!     times: u32,
//!     #[devcon(short = 'l', description = "Shout.")]
//!     loud: bool,
//! }
//!
//! let mut console = Console::new();
//! console
//!     .register_command("greet", "Greet someone.", |greet: Greet| {
//!         let text = format!("hello {}", greet.name).repeat(std::cmp::max(greet.times, 1) as usize);
//!         if greet.loud { text.to_uppercase() } else { text }
//!     })
//!     .unwrap();
//!
//! assert_eq!(console.execute("greet bob --loud").unwrap(), "HELLO BOB");
//! assert_eq!(console.usage("greet").unwrap(), "usage: greet name [times] [-l]");
//! ```
//!
//! ### Parameter Configuration
//! Every field is a parameter of its own type, so the field type must implement [`Parsable`](crate::Parsable).
//! Reference fields are rejected: parsed values are always owned.
//! Without attributes, a field is a required positional named after the field.
//! The following field attributes may be combined as necessary.
//! * `#[devcon(short = C)]` makes the field a switch with the short name `C` (a char literal, ex: `'c'`).
//! The long name is the field name with `_` replaced by `-`.
//! A `bool` switch is a flag.
//! * `#[devcon(long = "..")]` sets the long name of a switch.
//! * `#[devcon(meta = "..")]` sets the name of a positional, or the value placeholder of a switch in the help message.
//! * `#[devcon(optional)]` makes a positional optional, defaulting to the type's [`Default`].
//! * `#[devcon(required)]` makes a switch required.
//! * `#[devcon(default = E)]` makes the parameter optional, defaulting to the expression `E`.
//! * `#[devcon(default_raw = "..")]` makes the parameter optional, defaulting to the text parsed as the field type (or the type's [`Default`], when it does not parse).
//! * `#[devcon(flag = false)]` makes a `bool` switch take an explicit value.
//! * `#[devcon(min = N)]`, `#[devcon(max = N)]` bound the element count of a container field.
//! * `#[devcon(description = "..")]` describes the parameter in the help message.
//! * `#[devcon(parser = P)]` parses the field with the [`ParameterParser`](crate::ParameterParser) `P` instead of the registered one.
//!
//! At most one of `optional`, `required`, `default` and `default_raw` may be used on the same field.
//! Violations are reported at compile time, against the field.
//!
//! A partial example of these rules is provided as follows:
//! ```ignore
//! #[derive(Command)]
//! struct Parameters {
//!     quick: usize,
//!     // the above generates:
//!     //  .add(Parameter::<usize>::positional("quick"))
//!
//!     #[devcon(meta = "BROWN", default = 3)]
//!     brown: usize,
//!     // the above generates:
//!     //  .add(Parameter::<usize>::positional("BROWN").default_value(3))
//!
//!     #[devcon(short = 'f', required)]
//!     fox_name: String,
//!     // the above generates:
//!     //  .add(Parameter::<String>::required_switch('f').long("fox-name"))
//!
//!     #[devcon(short = 'j', max = 2)]
//!     jumps: Vec<u8>,
//!     // the above generates:
//!     //  .add(Parameter::<Vec<u8>>::switch('j').long("jumps").max(2))
//! }
//! ```
//!
//! ### Compound Configuration
//! A struct instrumented with `#[derive(Compound)]` parses as a grouped literal with one element per field, in field order: `[x y z]`.
//! The help message shows the field names as its template.
//! * `#[devcon(default = E)]` on a field lets the literal close before reaching it.
//! Every later field must then also have a default.
//! * `#[devcon(validate = F)]` on the struct rejects assembled values for which `F(&value)` is `false`.
//!
//! ```
//! use devcon::derive::*;
//! use devcon::*;
//!
//! #[derive(Debug, PartialEq, Compound)]
//! #[devcon(validate = Range::ordered)]
//! struct Range {
//!     low: i32,
//!     #[devcon(default = i32::MAX)]
//!     high: i32,
//! }
//!
//! impl Range {
//!     fn ordered(&self) -> bool {
//!         self.low <= self.high
//!     }
//! }
//!
//! let parser = ParserRegistry::new().resolve::<Range>().unwrap();
//! assert_eq!(
//!     parser.try_parse(&mut ArgumentInput::new("[1, 5]")),
//!     Some(Range { low: 1, high: 5 })
//! );
//! assert_eq!(
//!     parser.try_parse(&mut ArgumentInput::new("(3)")),
//!     Some(Range { low: 3, high: i32::MAX })
//! );
//! assert_eq!(parser.try_parse(&mut ArgumentInput::new("[5 1]")), None);
//! assert_eq!(parser.format(), Some("[low high]".to_string()));
//! ```
pub use devcon_derive::*;
