use thiserror::Error;

use crate::api::{Arguments, Grammar, ParameterDescriptor};
use crate::constant::*;
use crate::input::ArgumentInput;
use crate::model::ParameterKind;
use crate::parser::Value;
use crate::printer::ErrorContext;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// Error for argument text which does not fit a grammar.
///
/// Every variant carries the character offset into the argument text at which the failure was found.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// A required parameter was not supplied.
    #[error("Parse error: missing required parameter '{name}'.")]
    MissingRequired {
        /// The parameter's label.
        name: String,
        /// The offset at which the input ran out.
        offset: usize,
    },

    /// More positional values were supplied than the grammar declares.
    #[error("Parse error: unexpected argument at offset {offset}.")]
    UnexpectedArgument {
        /// The start of the unexpected argument.
        offset: usize,
    },

    /// A switch or flag was supplied more than once.
    #[error("Parse error: parameter '{name}' cannot be supplied more than once.")]
    DuplicateParameter {
        /// The parameter's label.
        name: String,
        /// The start of the repeated option.
        offset: usize,
    },

    /// No switch or flag has the name.
    #[error("Parse error: unknown option '{option}'.")]
    UnknownOption {
        /// The option as typed.
        option: String,
        /// The start of the option.
        offset: usize,
    },

    /// The value could not be parsed as the parameter's type.
    #[error("Parse error: invalid value for parameter '{name}'.")]
    InvalidValue {
        /// The parameter's label.
        name: String,
        /// How far the value was consumed before it failed.
        offset: usize,
    },

    /// The container value holds a number of elements outside the parameter's arity.
    #[error("Parse error: parameter '{name}' cannot have {count} elements.")]
    ElementCount {
        /// The parameter's label.
        name: String,
        /// The number of elements supplied.
        count: usize,
        /// The start of the value.
        offset: usize,
    },

    /// The option is not followed as its kind requires.
    #[error("Parse error: option '{option}' {reason}.")]
    MalformedOption {
        /// The option as typed.
        option: String,
        /// What was wrong.
        reason: &'static str,
        /// Where the option's value was expected.
        offset: usize,
    },
}

impl ParseError {
    /// The character offset into the argument text at which the failure was found.
    pub fn offset(&self) -> usize {
        match self {
            ParseError::MissingRequired { offset, .. }
            | ParseError::UnexpectedArgument { offset }
            | ParseError::DuplicateParameter { offset, .. }
            | ParseError::UnknownOption { offset, .. }
            | ParseError::InvalidValue { offset, .. }
            | ParseError::ElementCount { offset, .. }
            | ParseError::MalformedOption { offset, .. } => *offset,
        }
    }

    /// Render `text` (the argument text which failed) with a caret under the failure.
    ///
    /// ### Example
    /// ```
    /// use devcon_builder::*;
    ///
    /// let registry = ParserRegistry::new();
    /// let grammar = GrammarBuilder::new()
    ///     .add(Parameter::<u8>::positional("count"))
    ///     .build(&registry)
    ///     .unwrap();
    ///
    /// let error = grammar.parse("1 2").unwrap_err();
    /// assert_eq!(error.context("1 2"), "1 2\n  ^");
    /// ```
    pub fn context(&self, text: &str) -> String {
        ErrorContext::new(self.offset(), text).to_string()
    }
}

pub(crate) fn interpret(grammar: &Grammar, text: &str) -> Result<Arguments, ParseError> {
    let mut interpreter = Interpreter::new(grammar, text);
    let result = interpreter.run().and_then(|_| interpreter.finish());

    #[cfg(feature = "tracing_debug")]
    {
        if let Err(error) = &result {
            debug!("Failed to parse '{text}': {error}");
        }
    }

    result
}

struct Interpreter<'g> {
    grammar: &'g Grammar,
    input: ArgumentInput,
    values: Vec<Option<Value>>,
    positionals: Vec<&'g ParameterDescriptor>,
    next_positional: usize,
    options_enabled: bool,
}

impl<'g> Interpreter<'g> {
    fn new(grammar: &'g Grammar, text: &str) -> Self {
        Self {
            grammar,
            input: ArgumentInput::new(text),
            values: grammar.parameters().iter().map(|_| None).collect(),
            positionals: grammar.positionals().collect(),
            next_positional: 0,
            options_enabled: true,
        }
    }

    fn run(&mut self) -> Result<(), ParseError> {
        loop {
            self.input.trim_whitespace();

            if self.input.is_empty() {
                return Ok(());
            }

            if self.options_enabled && self.input.peek(0) == Some(SHORT_PREFIX) {
                if self.at_end_of_options() {
                    self.claim(LONG_PREFIX.len());
                    self.options_enabled = false;
                    continue;
                }

                if self.input.matches(LONG_PREFIX) {
                    self.long_option()?;
                    continue;
                }

                if self.at_short_option() {
                    self.short_option()?;
                    continue;
                }
            }

            self.positional()?;
        }
    }

    fn finish(self) -> Result<Arguments, ParseError> {
        let mut values = Vec::with_capacity(self.values.len());

        for (descriptor, value) in self.grammar.parameters().iter().zip(self.values) {
            let value = match (value, &descriptor.default) {
                (Some(value), _) => value,
                (None, Some(default)) if !descriptor.is_required() => {
                    default.produce(descriptor.parser.as_ref())
                }
                (None, _) => {
                    return Err(ParseError::MissingRequired {
                        name: descriptor.label(),
                        offset: self.input.offset(),
                    });
                }
            };
            values.push(value);
        }

        Ok(Arguments::new(values))
    }

    // `--` followed by whitespace or the end of input.
    fn at_end_of_options(&self) -> bool {
        self.input.matches(LONG_PREFIX)
            && self
                .input
                .peek(LONG_PREFIX.len())
                .map_or(true, char::is_whitespace)
    }

    // A lone `-`, or a `-` before a digit or period which no switch is named after, leads a positional value.
    fn at_short_option(&self) -> bool {
        match self.input.peek(1) {
            None => false,
            Some(c) if c.is_whitespace() => false,
            Some(c) => c.is_alphabetic() || self.grammar.find_short(c).is_some(),
        }
    }

    fn long_option(&mut self) -> Result<(), ParseError> {
        let grammar = self.grammar;
        let start = self.input.offset();
        self.claim(LONG_PREFIX.len());

        let descriptor = grammar
            .switches()
            .filter_map(|p| p.long().map(|long| (p, long.chars().count())))
            .filter(|(p, length)| {
                p.long().map_or(false, |long| self.input.matches(long))
                    && self
                        .input
                        .peek(*length)
                        .map_or(true, |c| c.is_whitespace() || c == LONG_VALUE_SEPARATOR)
            })
            .max_by_key(|(_, length)| *length);

        let (descriptor, length) = match descriptor {
            Some(found) => found,
            None => {
                let mut option = LONG_PREFIX.to_string();
                let mut index = 0;
                while let Some(c) = self.input.peek(index) {
                    if c.is_whitespace() || c == LONG_VALUE_SEPARATOR {
                        break;
                    }
                    option.push(c);
                    index += 1;
                }

                return Err(ParseError::UnknownOption {
                    option,
                    offset: start,
                });
            }
        };

        self.check_duplicate(descriptor, start)?;
        self.claim(length);
        let option = descriptor.label();

        match descriptor.kind() {
            ParameterKind::Flag => {
                if self.input.peek(0) == Some(LONG_VALUE_SEPARATOR) {
                    return Err(ParseError::MalformedOption {
                        option,
                        reason: "does not take a value",
                        offset: self.input.offset(),
                    });
                }

                self.store(descriptor, Value::new(true));
                Ok(())
            }
            ParameterKind::Switch => {
                if self.input.peek(0) == Some(LONG_VALUE_SEPARATOR) {
                    self.claim(1);

                    if self.input.at_boundary() {
                        return Err(ParseError::MalformedOption {
                            option,
                            reason: "requires a value",
                            offset: self.input.offset(),
                        });
                    }
                } else {
                    self.expect_value(&option)?;
                }

                self.parse_value(descriptor)
            }
            ParameterKind::Positional => {
                unreachable!("internal error - positional parameters have no long name")
            }
        }
    }

    fn short_option(&mut self) -> Result<(), ParseError> {
        let grammar = self.grammar;
        let start = self.input.offset();
        self.claim(1);

        loop {
            let offset = self.input.offset();
            let short = match self.input.next_char() {
                Some(short) => short,
                None => unreachable!("internal error - a short option cluster ends at a boundary"),
            };
            let descriptor = match grammar.find_short(short) {
                Some(descriptor) => descriptor,
                None => {
                    return Err(ParseError::UnknownOption {
                        option: format!("{SHORT_PREFIX}{short}"),
                        offset,
                    });
                }
            };

            self.check_duplicate(descriptor, if offset == start + 1 { start } else { offset })?;

            match descriptor.kind() {
                ParameterKind::Flag => {
                    self.store(descriptor, Value::new(true));

                    if self.input.at_boundary() {
                        return Ok(());
                    }
                }
                ParameterKind::Switch => {
                    if self.input.at_boundary() {
                        self.expect_value(&format!("{SHORT_PREFIX}{short}"))?;
                    }

                    return self.parse_value(descriptor);
                }
                ParameterKind::Positional => {
                    unreachable!("internal error - positional parameters have no short name")
                }
            }
        }
    }

    fn positional(&mut self) -> Result<(), ParseError> {
        let descriptor = match self.positionals.get(self.next_positional) {
            Some(descriptor) => *descriptor,
            None => {
                return Err(ParseError::UnexpectedArgument {
                    offset: self.input.offset(),
                });
            }
        };
        self.next_positional += 1;
        self.parse_value(descriptor)
    }

    // Skip the whitespace between an option and its value, requiring that a value follows.
    fn expect_value(&mut self, option: &str) -> Result<(), ParseError> {
        self.input.trim_whitespace();

        if self.input.is_empty() {
            Err(ParseError::MalformedOption {
                option: option.to_string(),
                reason: "requires a value",
                offset: self.input.offset(),
            })
        } else {
            Ok(())
        }
    }

    fn parse_value(&mut self, descriptor: &ParameterDescriptor) -> Result<(), ParseError> {
        let start = self.input.offset();
        let value = descriptor.parser.try_parse(&mut self.input);

        let value = match value {
            Some(value) if self.input.at_boundary() => value,
            _ => {
                return Err(ParseError::InvalidValue {
                    name: descriptor.label(),
                    offset: self.input.offset(),
                });
            }
        };

        if let Some(count) = descriptor.count.as_ref().and_then(|count| count(&value)) {
            if !descriptor.arity().permits(count) {
                return Err(ParseError::ElementCount {
                    name: descriptor.label(),
                    count,
                    offset: start,
                });
            }
        }

        self.store(descriptor, value);
        Ok(())
    }

    fn check_duplicate(
        &self,
        descriptor: &ParameterDescriptor,
        offset: usize,
    ) -> Result<(), ParseError> {
        if self.values[descriptor.index()].is_some() {
            Err(ParseError::DuplicateParameter {
                name: descriptor.label(),
                offset,
            })
        } else {
            Ok(())
        }
    }

    fn store(&mut self, descriptor: &ParameterDescriptor, value: Value) {
        self.values[descriptor.index()].replace(value);
    }

    fn claim(&mut self, count: usize) {
        self.input
            .claim(count)
            .expect("internal error - claimed characters must already be peeked");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{GrammarBuilder, Parameter};
    use crate::registry::ParserRegistry;
    use rstest::rstest;
    use std::collections::HashMap;

    fn greet() -> Grammar {
        GrammarBuilder::new()
            .add(Parameter::<String>::positional("message"))
            .add(Parameter::<i32>::positional("count").optional())
            .add(Parameter::<bool>::switch('v').long("verbose"))
            .build(&ParserRegistry::new())
            .unwrap()
    }

    fn greet_values(text: &str) -> Result<(String, i32, bool), ParseError> {
        let mut arguments = greet().parse(text)?;
        Ok((
            arguments.take(0).unwrap(),
            arguments.take(1).unwrap(),
            arguments.take(2).unwrap(),
        ))
    }

    #[rstest]
    #[case("hello -v", ("hello", 0, true))]
    #[case("hello 5", ("hello", 5, false))]
    #[case("  hello   5  ", ("hello", 5, false))]
    #[case("-v hello", ("hello", 0, true))]
    #[case("hello --verbose 5", ("hello", 5, true))]
    #[case("'hello there' -5", ("hello there", -5, false))]
    #[case("-- -v", ("-v", 0, false))]
    #[case("- 2", ("-", 2, false))]
    fn greet_accepted(#[case] text: &str, #[case] expected: (&str, i32, bool)) {
        // Execute
        let result = greet_values(text);

        // Verify
        let (message, count, verbose) = expected;
        assert_eq!(result, Ok((message.to_string(), count, verbose)));
    }

    #[test]
    fn greet_empty() {
        // Execute
        let result = greet().parse("");

        // Verify
        assert_matches!(result, Err(ParseError::MissingRequired { name, offset: 0 }) => {
            assert_eq!(name, "message");
        });
    }

    #[test]
    fn greet_extra() {
        // Execute
        let result = greet().parse("hello 5 extra");

        // Verify
        assert_eq!(result.unwrap_err(), ParseError::UnexpectedArgument { offset: 8 });
    }

    #[rstest]
    #[case("hello 5 -v -v", ParseError::DuplicateParameter { name: "--verbose".to_string(), offset: 11 })]
    #[case("hello -v --verbose", ParseError::DuplicateParameter { name: "--verbose".to_string(), offset: 9 })]
    #[case("hello -x", ParseError::UnknownOption { option: "-x".to_string(), offset: 7 })]
    #[case("hello --loud", ParseError::UnknownOption { option: "--loud".to_string(), offset: 6 })]
    #[case("hello --verb", ParseError::UnknownOption { option: "--verb".to_string(), offset: 6 })]
    #[case("hello --verbose=t", ParseError::MalformedOption { option: "--verbose".to_string(), reason: "does not take a value", offset: 15 })]
    #[case("hello five", ParseError::InvalidValue { name: "count".to_string(), offset: 6 })]
    #[case("hello 5x", ParseError::InvalidValue { name: "count".to_string(), offset: 7 })]
    fn greet_rejected(#[case] text: &str, #[case] expected: ParseError) {
        // Execute
        let result = greet().parse(text);

        // Verify
        assert_eq!(result.unwrap_err(), expected);
    }

    fn positionals() -> Grammar {
        GrammarBuilder::new()
            .add(Parameter::<u8>::positional("a"))
            .add(Parameter::<u8>::positional("b"))
            .add(Parameter::<u8>::positional("c").default_value(9))
            .build(&ParserRegistry::new())
            .unwrap()
    }

    #[rstest]
    #[case("1 2", Some((1, 2, 9)))]
    #[case("1 2 3", Some((1, 2, 3)))]
    #[case("1", None)]
    #[case("", None)]
    #[case("1 2 3 4", None)]
    #[case("1 2 3 4 5", None)]
    fn positional_counts(#[case] text: &str, #[case] expected: Option<(u8, u8, u8)>) {
        // Execute
        let result = positionals().parse(text);

        // Verify
        let values = result.ok().map(|mut arguments| {
            (
                arguments.take(0).unwrap(),
                arguments.take(1).unwrap(),
                arguments.take(2).unwrap(),
            )
        });
        assert_eq!(values, expected);
    }

    fn flags() -> Grammar {
        GrammarBuilder::new()
            .add(Parameter::<bool>::switch('a'))
            .add(Parameter::<bool>::switch('b'))
            .add(Parameter::<bool>::switch('c'))
            .add(Parameter::<u8>::switch('n').long("number"))
            .build(&ParserRegistry::new())
            .unwrap()
    }

    fn flag_values(text: &str) -> Result<(bool, bool, bool, u8), ParseError> {
        let mut arguments = flags().parse(text)?;
        Ok((
            arguments.take(0).unwrap(),
            arguments.take(1).unwrap(),
            arguments.take(2).unwrap(),
            arguments.take(3).unwrap(),
        ))
    }

    #[rstest]
    #[case("-abc")]
    #[case("-a -b -c")]
    #[case("-ab -c")]
    #[case("-cba")]
    fn merged_flags(#[case] text: &str) {
        assert_eq!(flag_values(text), Ok((true, true, true, 0)));
    }

    #[rstest]
    #[case("-n5", (false, false, false, 5))]
    #[case("-n 5", (false, false, false, 5))]
    #[case("-n  5", (false, false, false, 5))]
    #[case("-an5", (true, false, false, 5))]
    #[case("-ab -n 5", (true, true, false, 5))]
    #[case("--number=5", (false, false, false, 5))]
    #[case("--number 5 -c", (false, false, true, 5))]
    #[case("", (false, false, false, 0))]
    fn switches(#[case] text: &str, #[case] expected: (bool, bool, bool, u8)) {
        assert_eq!(flag_values(text), Ok(expected));
    }

    #[rstest]
    #[case("-abx", ParseError::UnknownOption { option: "-x".to_string(), offset: 3 })]
    #[case("-aa", ParseError::DuplicateParameter { name: "-a".to_string(), offset: 2 })]
    #[case("-a -a", ParseError::DuplicateParameter { name: "-a".to_string(), offset: 3 })]
    #[case("-na", ParseError::InvalidValue { name: "--number".to_string(), offset: 2 })]
    #[case("-n5a", ParseError::InvalidValue { name: "--number".to_string(), offset: 3 })]
    #[case("-n", ParseError::MalformedOption { option: "-n".to_string(), reason: "requires a value", offset: 2 })]
    #[case("-a -n  ", ParseError::MalformedOption { option: "-n".to_string(), reason: "requires a value", offset: 7 })]
    #[case("--number", ParseError::MalformedOption { option: "--number".to_string(), reason: "requires a value", offset: 8 })]
    #[case("--number= 5", ParseError::MalformedOption { option: "--number".to_string(), reason: "requires a value", offset: 9 })]
    #[case("--number=", ParseError::MalformedOption { option: "--number".to_string(), reason: "requires a value", offset: 9 })]
    #[case("-n 300", ParseError::InvalidValue { name: "--number".to_string(), offset: 6 })]
    #[case("5", ParseError::UnexpectedArgument { offset: 0 })]
    #[case("-- -a", ParseError::UnexpectedArgument { offset: 3 })]
    fn switches_rejected(#[case] text: &str, #[case] expected: ParseError) {
        assert_eq!(flag_values(text).unwrap_err(), expected);
    }

    #[test]
    fn negative_number_positional() {
        // Setup
        let grammar = GrammarBuilder::new()
            .add(Parameter::<f64>::positional("x"))
            .add(Parameter::<bool>::switch('v'))
            .build(&ParserRegistry::new())
            .unwrap();

        // Execute
        let mut arguments = grammar.parse("-5.2").unwrap();

        // Verify
        assert_eq!(arguments.take::<f64>(0).unwrap(), -5.2);
        assert!(!arguments.take::<bool>(1).unwrap());
    }

    #[test]
    fn digit_switch() {
        // Setup
        let grammar = GrammarBuilder::new()
            .add(Parameter::<f64>::positional("x").optional())
            .add(Parameter::<bool>::switch('5'))
            .build(&ParserRegistry::new())
            .unwrap();

        // Execute & verify
        let mut arguments = grammar.parse("-5").unwrap();
        assert_eq!(arguments.take::<f64>(0).unwrap(), 0.0);
        assert!(arguments.take::<bool>(1).unwrap());

        let mut arguments = grammar.parse("-5 -4").unwrap();
        assert_eq!(arguments.take::<f64>(0).unwrap(), -4.0);
        assert!(arguments.take::<bool>(1).unwrap());

        assert_eq!(
            grammar.parse("-5.2").unwrap_err(),
            ParseError::UnknownOption {
                option: "-.".to_string(),
                offset: 2
            }
        );
    }

    #[test]
    fn end_of_options_only_once() {
        // Setup
        let grammar = GrammarBuilder::new()
            .add(Parameter::<String>::positional("a"))
            .add(Parameter::<String>::positional("b").optional())
            .add(Parameter::<bool>::switch('v'))
            .build(&ParserRegistry::new())
            .unwrap();

        // Execute
        let mut arguments = grammar.parse("-v -- -- -v").unwrap();

        // Verify
        assert_eq!(arguments.take::<String>(0).unwrap(), "--");
        assert_eq!(arguments.take::<String>(1).unwrap(), "-v");
        assert!(arguments.take::<bool>(2).unwrap());
    }

    #[test]
    fn longest_long_name() {
        // Setup
        let grammar = GrammarBuilder::new()
            .add(Parameter::<u8>::switch('a').long("size"))
            .add(Parameter::<u8>::switch('b').long("size-max"))
            .build(&ParserRegistry::new())
            .unwrap();

        // Execute
        let mut arguments = grammar.parse("--size-max=2 --size 1").unwrap();

        // Verify
        assert_eq!(arguments.take::<u8>(0).unwrap(), 1);
        assert_eq!(arguments.take::<u8>(1).unwrap(), 2);
    }

    #[test]
    fn bool_switch_without_flag_mode() {
        // Setup
        let grammar = GrammarBuilder::new()
            .add(Parameter::<bool>::switch('e').long("enabled").flag(false))
            .build(&ParserRegistry::new())
            .unwrap();

        // Execute & verify
        assert_eq!(grammar.parse("-e t").unwrap().take::<bool>(0), Ok(true));
        assert_eq!(grammar.parse("--enabled=0").unwrap().take::<bool>(0), Ok(false));
        assert_eq!(grammar.parse("").unwrap().take::<bool>(0), Ok(false));
        assert_matches!(
            grammar.parse("-e"),
            Err(ParseError::MalformedOption { .. })
        );
    }

    #[test]
    fn required_switch() {
        // Setup
        let grammar = GrammarBuilder::new()
            .add(Parameter::<String>::required_switch('n').long("name"))
            .add(Parameter::<bool>::switch('f').required())
            .build(&ParserRegistry::new())
            .unwrap();

        // Execute & verify
        assert_matches!(grammar.parse("-n x -f"), Ok(_));
        assert_eq!(
            grammar.parse("-f").unwrap_err(),
            ParseError::MissingRequired {
                name: "--name".to_string(),
                offset: 2
            }
        );
        assert_eq!(
            grammar.parse("--name x").unwrap_err(),
            ParseError::MissingRequired {
                name: "-f".to_string(),
                offset: 8
            }
        );
    }

    #[test]
    fn containers() {
        // Setup
        let grammar = GrammarBuilder::new()
            .add(Parameter::<Vec<i32>>::positional("items").min(1).max(3))
            .add(Parameter::<HashMap<String, u8>>::switch('m').long("map"))
            .build(&ParserRegistry::new())
            .unwrap();

        // Execute
        let mut arguments = grammar.parse("[1, 2, 3] --map={a: 1, b: 2}").unwrap();

        // Verify
        assert_eq!(arguments.take::<Vec<i32>>(0).unwrap(), vec![1, 2, 3]);
        assert_eq!(
            arguments.take::<HashMap<String, u8>>(1).unwrap(),
            HashMap::from([("a".to_string(), 1), ("b".to_string(), 2)])
        );
    }

    #[rstest]
    #[case("[]", ParseError::ElementCount { name: "items".to_string(), count: 0, offset: 0 })]
    #[case(" [1 2 3 4]", ParseError::ElementCount { name: "items".to_string(), count: 4, offset: 1 })]
    #[case("[1,,2]", ParseError::InvalidValue { name: "items".to_string(), offset: 3 })]
    #[case("[1] -m {a: 1, a: 2}", ParseError::InvalidValue { name: "--map".to_string(), offset: 19 })]
    #[case("[1]x", ParseError::InvalidValue { name: "items".to_string(), offset: 3 })]
    fn containers_rejected(#[case] text: &str, #[case] expected: ParseError) {
        // Setup
        let grammar = GrammarBuilder::new()
            .add(Parameter::<Vec<i32>>::positional("items").min(1).max(3))
            .add(Parameter::<HashMap<String, u8>>::switch('m').long("map"))
            .build(&ParserRegistry::new())
            .unwrap();

        // Execute
        let result = grammar.parse(text);

        // Verify
        assert_eq!(result.unwrap_err(), expected);
    }

    #[test]
    fn arity_ignores_defaults() {
        // Setup
        let grammar = GrammarBuilder::new()
            .add(Parameter::<Vec<u8>>::positional("items").optional().min(2))
            .build(&ParserRegistry::new())
            .unwrap();

        // Execute
        let mut arguments = grammar.parse("").unwrap();

        // Verify
        assert_eq!(arguments.take::<Vec<u8>>(0).unwrap(), Vec::<u8>::default());
    }

    #[rstest]
    #[case("[1 2]", vec![1, 2])]
    #[case("[1 x]", vec![])]
    #[case("[1 2] tail", vec![1, 2])]
    fn raw_default(#[case] raw: &str, #[case] expected: Vec<u8>) {
        // Setup
        let grammar = GrammarBuilder::new()
            .add(Parameter::<Vec<u8>>::switch('i').default_raw(raw))
            .build(&ParserRegistry::new())
            .unwrap();

        // Execute
        let mut arguments = grammar.parse("").unwrap();

        // Verify
        assert_eq!(arguments.take::<Vec<u8>>(0).unwrap(), expected);
    }

    #[test]
    fn defaults_are_fresh() {
        // Setup
        let grammar = GrammarBuilder::new()
            .add(Parameter::<Vec<u8>>::switch('i').default_value(vec![1]))
            .build(&ParserRegistry::new())
            .unwrap();

        // Execute
        let mut first = grammar.parse("").unwrap().take::<Vec<u8>>(0).unwrap();
        first.push(2);
        let second = grammar.parse("").unwrap().take::<Vec<u8>>(0).unwrap();

        // Verify
        assert_eq!(first, vec![1, 2]);
        assert_eq!(second, vec![1]);
    }

    #[test]
    fn unicode_offsets() {
        // Setup
        let grammar = GrammarBuilder::new()
            .add(Parameter::<String>::positional("word"))
            .build(&ParserRegistry::new())
            .unwrap();

        // Execute
        let error = grammar.parse("über alles").unwrap_err();

        // Verify
        assert_eq!(error, ParseError::UnexpectedArgument { offset: 5 });
        assert_eq!(error.context("über alles"), "über alles\n     ^");
    }

    #[rstest]
    #[case("hello 5 extra", "hello 5 extra\n        ^")]
    #[case("", "\n^")]
    #[case("hello --verbose=t", "hello --verbose=t\n               ^")]
    fn context(#[case] text: &str, #[case] expected: &str) {
        // Execute
        let error = greet().parse(text).unwrap_err();

        // Verify
        assert_eq!(error.context(text), expected);
    }

    #[test]
    fn error_display() {
        assert_eq!(
            ParseError::UnknownOption {
                option: "-x".to_string(),
                offset: 0
            }
            .to_string(),
            "Parse error: unknown option '-x'."
        );
        assert_eq!(
            ParseError::MalformedOption {
                option: "--name".to_string(),
                reason: "requires a value",
                offset: 6
            }
            .to_string(),
            "Parse error: option '--name' requires a value."
        );
        assert_eq!(
            ParseError::ElementCount {
                name: "items".to_string(),
                count: 4,
                offset: 0
            }
            .to_string(),
            "Parse error: parameter 'items' cannot have 4 elements."
        );
    }
}
