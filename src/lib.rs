//! `devcon` is a declarative, type driven command grammar engine for in-application developer consoles.
//!
//! A console command declares its parameters once: positionals, switches and flags, each with a Rust type.
//! `devcon` turns the declaration into a [`Grammar`], which parses a line of argument text into typed values and explains itself through usage and help messages.
//! `devcon` prioritizes the following design concerns:
//! * *Type driven parsing*:
//! The parser of every parameter is selected by its type, including containers, maps, tuples and user defined records.
//! * *Declaration errors are early*:
//! Duplicate names, a required positional after an optional one, or a type with no parser are all reported when the grammar is built, never while parsing user input.
//! * *Parse errors are contained*:
//! User input can only ever produce a [`ParseError`], which a console reports next to the command's usage line.
//! * *Explicit state*:
//! Parsers are resolved and memoized in a [`ParserRegistry`] owned by the application, not in process wide statics.
//!
//! # Usage
//! The demo below registers two derived commands and a raw text command with a [`console::Console`], and runs it as a small REPL.
//! ```no_run
#![doc = include_str!("../demos/console.rs")]
//! ```
//!
//! ```console
//! > sum [1 2 3] -v
//! [1, 2, 3] = 6
//! > sum []
//!  []
//!  ^
//! usage: sum items [-v]
//! Try 'help sum' for more information.
//! > paint [0.5 0.5 1] --layer-name=sky
//! Painted 'sky' with Colour { r: 0.5, g: 0.5, b: 1.0, a: 1.0 }.
//! > echo [not, parsed
//! [not, parsed
//! > help
//! Commands:
//!     echo         Print the text as is.
//!     help         Show the commands, or the help of one command.
//!     paint        Paint the layer.
//!     sum          Add up some numbers.
//! ```
//!
//! # Derive Api
//! We recommend declaring commands through the [derive Api](./derive/index.html).
//! The builder Api below is what the derive Api generates.
//!
//! # Builder Api
//! Configure a grammar by starting with a [`GrammarBuilder`] and `add`ing [`Parameter`]s, then `build` it against a [`ParserRegistry`].
//!
//! ```
//! use devcon::*;
//!
//! let registry = ParserRegistry::new();
//! let grammar = GrammarBuilder::new()
//!     .add(Parameter::<String>::positional("message").description("The text to print."))
//!     .add(Parameter::<Vec<i32>>::positional("items").optional().min(1))
//!     .add(Parameter::<(f32, f32)>::required_switch('p').long("point"))
//!     .add(Parameter::<i32>::switch('c').long("count"))
//!     .add(Parameter::<bool>::switch('v').long("verbose"))
//!     .build(&registry)
//!     .unwrap();
//!
//! let mut arguments = grammar.parse("\"hi there\" [1, 2] -vp [0.5 2] --count=3").unwrap();
//! assert_eq!(arguments.take::<String>(0).unwrap(), "hi there");
//! assert_eq!(arguments.take::<Vec<i32>>(1).unwrap(), vec![1, 2]);
//! assert_eq!(arguments.take::<(f32, f32)>(2).unwrap(), (0.5, 2.0));
//! assert_eq!(arguments.take::<i32>(3).unwrap(), 3);
//! assert_eq!(arguments.take::<bool>(4).unwrap(), true);
//!
//! assert_eq!(
//!     grammar.usage("sum"),
//!     "usage: sum message [items] -p point [-c count] [-v]"
//! );
//! ```
//!
//! The parsed [`Arguments`] hold one value per declared parameter, in declaration order.
//! Optional parameters that were not supplied hold their default: a fresh value on every parse.
//!
//! ### Parameters
//! * [`Parameter::positional`]: identified by its order.
//! Required unless made `optional` (the type's [`Default`]) or given a `default_value`/`default_raw`.
//! A required positional may not follow an optional one.
//! * [`Parameter::switch`]: introduced by `-x` or `--long`, followed by its value.
//! Optional, defaulting to the type's [`Default`].
//! * [`Parameter::required_switch`]: a switch which must be supplied.
//! * A switch over `bool` is a *flag*: its presence alone sets it to `true`.
//! Disable this with `.flag(false)` to make it take an explicit `t`/`f` value.
//!
//! Container parameters may bound their element count with `min` and `max`.
//!
//! ### Types
//! All parsing is selected by the [`Parsable`] trait, which resolves a [`ParameterParser`] through the registry.
//! ```console
//! Type                          | Literal
//! --------------------------------------------------------------------------
//! String                        | word, "quoted \"text\"", 'single quoted'
//! char                          | c
//! bool                          | true/false, t/f, 1/0 (any case)
//! i8 .. i128, u8 .. u128        | 42, -7, +3
//! f32, f64                      | 1.5, -2, .5
//! Vec<T>, VecDeque<T>           | [a b c], (a, b, c)
//! Stack<T>                      | [a b c] (pops c first)
//! Box<[T]>, [T; N]              | [a b c]
//! HashSet<T>, BTreeSet<T>       | {a b c}
//! HashMap<K, V>, BTreeMap<K, V> | {k: v, k: v}
//! (A, B, ..)                    | [a b], (a, b)
//! Option<T>                     | the literal of T
//! #[derive(Compound)] structs   | [x y z]
//! ```
//! Elements of a grouped literal may be separated by whitespace, or by a single `,`.
//! A type with no binding fails to build with [`RegistryError::ParserNotFound`].
//! Register a parser for it with [`ParserRegistry::register`], or implement [`Parsable`] (see [`Compound`]).
//!
//! # Argument Semantics
//! The argument text is read left to right:
//! * Whitespace separates values; a value must end at whitespace or at the end of the text.
//! * `--long value` and `--long=value` set a switch; `--long` alone sets a flag.
//! * `-x value` and `-xvalue` set a switch by its short name.
//! Flags may be merged: `-abc` is `-a -b -c`, and a merge may end in one switch: `-abn 5`.
//! * A `-` followed by anything other than a letter or a registered short name is a value, so `-5.2` is a negative number.
//! * A lone `--` ends the switches: everything after it is positional.
//! * Anything else fills the next positional.
//! * A parameter may be supplied at most once.
//!
//! Every [`ParseError`] carries the offset at which it was found; [`ParseError::context`] renders it under the text.
//! ```
//! use devcon::*;
//!
//! let grammar = GrammarBuilder::new()
//!     .add(Parameter::<u8>::positional("level"))
//!     .build(&ParserRegistry::new())
//!     .unwrap();
//! let error = grammar.parse("300").unwrap_err();
//! assert_eq!(error.to_string(), "Parse error: invalid value for parameter 'level'.");
//! assert_eq!(error.context("300"), "300\n   ^");
//! ```
//!
//! # Features
//! * `tracing_debug`: emit `tracing` debug events for parser resolution, grammar construction and parse failures.
pub mod console;
pub mod derive;
pub use console::Command;
pub use devcon_builder::*;

#[cfg(test)]
#[macro_use]
extern crate assert_matches;
