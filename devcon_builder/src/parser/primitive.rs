use std::marker::PhantomData;
use std::sync::Arc;

use crate::input::ArgumentInput;
use crate::parser::{ParameterParser, Parsable};
use crate::registry::{ParserRegistry, RegistryError, SpecialChars};

/// Consume characters up to (not including) whitespace or a special character.
pub(crate) fn scan_token(input: &mut ArgumentInput, special_chars: &SpecialChars) -> String {
    let mut token = String::default();

    while let Some(c) = input.peek(0) {
        if special_chars.terminates(c) {
            break;
        }

        token.push(c);
        input.next_char();
    }

    token
}

fn at_token_end(input: &ArgumentInput, special_chars: &SpecialChars) -> bool {
    input.peek(0).map_or(true, |c| special_chars.terminates(c))
}

/// Parses a quoted or unquoted string.
///
/// Quoted strings run to the matching unescaped quote (`'` or `"`); `\` followed by that quote escapes it.
/// Input ending before the closing quote is a failure.
/// Unquoted strings run up to whitespace or a special character, and must not be empty.
#[derive(Debug, Clone)]
pub struct StringParser {
    special_chars: SpecialChars,
}

impl StringParser {
    /// Create a string parser against the registry's special characters.
    pub fn new(registry: &ParserRegistry) -> Self {
        Self {
            special_chars: registry.special_chars(),
        }
    }
}

impl ParameterParser<String> for StringParser {
    fn try_parse(&self, input: &mut ArgumentInput) -> Option<String> {
        match input.peek(0)? {
            quote @ ('"' | '\'') => {
                input.next_char();
                let mut out = String::default();

                loop {
                    match input.next_char()? {
                        '\\' if input.peek(0) == Some(quote) => {
                            input.next_char();
                            out.push(quote);
                        }
                        c if c == quote => return Some(out),
                        c => out.push(c),
                    }
                }
            }
            _ => {
                let token = scan_token(input, &self.special_chars);

                if token.is_empty() {
                    None
                } else {
                    Some(token)
                }
            }
        }
    }

    fn type_name(&self) -> String {
        "String".to_string()
    }
}

impl Parsable for String {
    fn create_parser(
        registry: &ParserRegistry,
    ) -> Result<Arc<dyn ParameterParser<Self>>, RegistryError> {
        Ok(Arc::new(StringParser::new(registry)))
    }
}

/// Parses exactly one character, which must be followed by whitespace, a special character, or the end of input.
#[derive(Debug, Clone)]
pub struct CharParser {
    special_chars: SpecialChars,
}

impl CharParser {
    /// Create a char parser against the registry's special characters.
    pub fn new(registry: &ParserRegistry) -> Self {
        Self {
            special_chars: registry.special_chars(),
        }
    }
}

impl ParameterParser<char> for CharParser {
    fn try_parse(&self, input: &mut ArgumentInput) -> Option<char> {
        let c = input.peek(0)?;

        if c.is_whitespace() {
            return None;
        }

        input.next_char();

        if at_token_end(input, &self.special_chars) {
            Some(c)
        } else {
            None
        }
    }

    fn type_name(&self) -> String {
        "char".to_string()
    }
}

impl Parsable for char {
    fn create_parser(
        registry: &ParserRegistry,
    ) -> Result<Arc<dyn ParameterParser<Self>>, RegistryError> {
        Ok(Arc::new(CharParser::new(registry)))
    }
}

/// Parses `true`, `false`, `t`, `f`, `1` or `0`, ignoring case.
#[derive(Debug, Clone)]
pub struct BoolParser {
    special_chars: SpecialChars,
}

impl BoolParser {
    /// Create a bool parser against the registry's special characters.
    pub fn new(registry: &ParserRegistry) -> Self {
        Self {
            special_chars: registry.special_chars(),
        }
    }
}

impl ParameterParser<bool> for BoolParser {
    fn try_parse(&self, input: &mut ArgumentInput) -> Option<bool> {
        let token = scan_token(input, &self.special_chars);

        match token.to_lowercase().as_str() {
            "true" | "t" | "1" => Some(true),
            "false" | "f" | "0" => Some(false),
            _ => None,
        }
    }

    fn type_name(&self) -> String {
        "bool".to_string()
    }

    fn format(&self) -> Option<String> {
        Some("t/f".to_string())
    }
}

impl Parsable for bool {
    fn create_parser(
        registry: &ParserRegistry,
    ) -> Result<Arc<dyn ParameterParser<Self>>, RegistryError> {
        Ok(Arc::new(BoolParser::new(registry)))
    }
}

/// Parses an optionally signed run of digits into an integer of type `T`.
/// Out of range values are a failure.
#[derive(Debug)]
pub struct IntegralParser<T> {
    special_chars: SpecialChars,
    _phantom: PhantomData<fn() -> T>,
}

impl<T> IntegralParser<T> {
    /// Create an integer parser against the registry's special characters.
    pub fn new(registry: &ParserRegistry) -> Self {
        Self {
            special_chars: registry.special_chars(),
            _phantom: PhantomData,
        }
    }

    fn scan(&self, input: &mut ArgumentInput) -> Option<String> {
        let mut text = String::default();
        let mut digits = 0;

        if let Some(sign @ ('+' | '-')) = input.peek(0) {
            text.push(sign);
            input.next_char();
        }

        while let Some(c) = input.peek(0) {
            if !c.is_ascii_digit() {
                break;
            }

            digits += 1;
            text.push(c);
            input.next_char();
        }

        if digits == 0 || !at_token_end(input, &self.special_chars) {
            None
        } else {
            Some(text)
        }
    }
}

/// Parses an optionally signed decimal number with at most one `.` into a float of type `T`.
/// Values too large to be represented are a failure.
#[derive(Debug)]
pub struct FloatParser<T> {
    special_chars: SpecialChars,
    _phantom: PhantomData<fn() -> T>,
}

impl<T> FloatParser<T> {
    /// Create a float parser against the registry's special characters.
    pub fn new(registry: &ParserRegistry) -> Self {
        Self {
            special_chars: registry.special_chars(),
            _phantom: PhantomData,
        }
    }

    fn scan(&self, input: &mut ArgumentInput) -> Option<String> {
        let mut text = String::default();
        let mut digits = 0;
        let mut period = false;

        if let Some(sign @ ('+' | '-')) = input.peek(0) {
            text.push(sign);
            input.next_char();
        }

        while let Some(c) = input.peek(0) {
            match c {
                '0'..='9' => digits += 1,
                '.' if !period => period = true,
                _ => break,
            }

            text.push(c);
            input.next_char();
        }

        if digits == 0 || !at_token_end(input, &self.special_chars) {
            None
        } else {
            Some(text)
        }
    }
}

macro_rules! integral_parsers {
    ($($t:ty),* $(,)?) => {
        $(
            impl ParameterParser<$t> for IntegralParser<$t> {
                fn try_parse(&self, input: &mut ArgumentInput) -> Option<$t> {
                    self.scan(input)?.parse::<$t>().ok()
                }

                fn type_name(&self) -> String {
                    stringify!($t).to_string()
                }
            }

            impl Parsable for $t {
                fn create_parser(
                    registry: &ParserRegistry,
                ) -> Result<Arc<dyn ParameterParser<Self>>, RegistryError> {
                    Ok(Arc::new(IntegralParser::<$t>::new(registry)))
                }
            }
        )*
    };
}

macro_rules! float_parsers {
    ($($t:ty),* $(,)?) => {
        $(
            impl ParameterParser<$t> for FloatParser<$t> {
                fn try_parse(&self, input: &mut ArgumentInput) -> Option<$t> {
                    self.scan(input)?
                        .parse::<$t>()
                        .ok()
                        .filter(|value| value.is_finite())
                }

                fn type_name(&self) -> String {
                    stringify!($t).to_string()
                }
            }

            impl Parsable for $t {
                fn create_parser(
                    registry: &ParserRegistry,
                ) -> Result<Arc<dyn ParameterParser<Self>>, RegistryError> {
                    Ok(Arc::new(FloatParser::<$t>::new(registry)))
                }
            }
        )*
    };
}

integral_parsers!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
float_parsers!(f32, f64);
