use std::collections::{BTreeSet, HashSet, VecDeque};
use std::hash::Hash;
use std::sync::Arc;

use crate::constant::*;
use crate::input::ArgumentInput;
use crate::parser::{ElementCount, ParameterParser, Parsable};
use crate::registry::{ParserRegistry, RegistryError};

/// Parse a grouped run of elements, such as `[a, b c]`.
///
/// `element` is called once per element with the input positioned at its first character.
/// Elements may be separated by a single `separator`; duplicate, leading and trailing separators are a failure.
/// Returns the number of elements parsed.
pub(crate) fn parse_grouped(
    input: &mut ArgumentInput,
    grouping: &[(char, char)],
    separator: char,
    mut element: impl FnMut(&mut ArgumentInput) -> Option<()>,
) -> Option<usize> {
    let first = input.peek(0)?;
    let (_, close) = grouping.iter().find(|(open, _)| *open == first)?;
    input.next_char();
    let mut count = 0;
    let mut separated = false;

    loop {
        input.trim_whitespace();
        let next = input.peek(0)?;

        if next == *close {
            if separated {
                return None;
            }

            input.next_char();
            return Some(count);
        }

        if next == separator {
            return None;
        }

        element(input)?;
        count += 1;
        input.trim_whitespace();
        separated = input.peek(0) == Some(separator);

        if separated {
            input.next_char();
        }
    }
}

pub(crate) fn register_grouping(
    registry: &ParserRegistry,
    grouping: &[(char, char)],
    separator: char,
) {
    let mut characters: Vec<char> = grouping
        .iter()
        .flat_map(|(open, close)| [*open, *close])
        .collect();
    characters.push(separator);
    registry.register_special_chars(&characters);
}

/// Parses a grouped run of `T` elements, then converts the elements into the container `C`.
///
/// Every sequence-like container shares this parser and differs only in its grouping characters and conversion.
pub struct SequenceParser<T, C> {
    element: Arc<dyn ParameterParser<T>>,
    grouping: &'static [(char, char)],
    type_name: String,
    convert: fn(Vec<T>) -> Option<C>,
}

impl<T: Parsable, C> SequenceParser<T, C>
where
    C: FromIterator<T>,
{
    /// Create a parser for a `[..]` or `(..)` grouped container.
    /// The container is named `container` in help messages.
    pub fn sequence(
        registry: &ParserRegistry,
        container: &str,
    ) -> Result<Self, RegistryError> {
        Self::new(registry, SEQUENCE_GROUPING, container, |items| {
            Some(items.into_iter().collect())
        })
    }

    /// Create a parser for a `{..}` grouped container.
    /// The container is named `container` in help messages.
    pub fn set(registry: &ParserRegistry, container: &str) -> Result<Self, RegistryError> {
        Self::new(registry, SET_GROUPING, container, |items| {
            Some(items.into_iter().collect())
        })
    }
}

impl<T: Parsable, C> SequenceParser<T, C> {
    /// Create a parser for a container with custom grouping and conversion.
    /// `convert` may reject the parsed elements by returning `None`.
    pub fn new(
        registry: &ParserRegistry,
        grouping: &'static [(char, char)],
        container: &str,
        convert: fn(Vec<T>) -> Option<C>,
    ) -> Result<Self, RegistryError> {
        register_grouping(registry, grouping, SEPARATOR);
        let element = registry.resolve::<T>()?;
        let type_name = format!("{container}<{}>", element.type_name());
        Ok(Self {
            element,
            grouping,
            type_name,
            convert,
        })
    }
}

impl<T, C> SequenceParser<T, C> {
    /// Rename the container as shown in help messages.
    pub fn named(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = type_name.into();
        self
    }

    fn element_format(&self) -> String {
        self.element
            .format()
            .unwrap_or_else(|| self.element.type_name())
    }
}

impl<T: 'static, C: 'static> ParameterParser<C> for SequenceParser<T, C> {
    fn try_parse(&self, input: &mut ArgumentInput) -> Option<C> {
        let mut items = Vec::default();
        parse_grouped(input, self.grouping, SEPARATOR, |input| {
            items.push(self.element.try_parse(input)?);
            Some(())
        })?;
        (self.convert)(items)
    }

    fn type_name(&self) -> String {
        self.type_name.clone()
    }

    fn format(&self) -> Option<String> {
        let (open, close) = self.grouping[0];
        Some(format!("{open}{} ...{close}", self.element_format()))
    }
}

/// A last-in first-out collection.
/// Built from a sequence literal so that the last parsed element is popped first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stack<T>(Vec<T>);

impl<T> Stack<T> {
    /// Create an empty stack.
    pub fn new() -> Self {
        Self(Vec::default())
    }

    /// Push onto the top.
    pub fn push(&mut self, item: T) {
        self.0.push(item);
    }

    /// Pop from the top.
    pub fn pop(&mut self) -> Option<T> {
        self.0.pop()
    }

    /// The top of the stack.
    pub fn peek(&self) -> Option<&T> {
        self.0.last()
    }

    /// The number of items.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no items.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<T> FromIterator<T> for Stack<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<T: Parsable> Parsable for Vec<T> {
    fn create_parser(
        registry: &ParserRegistry,
    ) -> Result<Arc<dyn ParameterParser<Self>>, RegistryError> {
        Ok(Arc::new(SequenceParser::<T, Self>::sequence(registry, "Vec")?))
    }
}

impl<T: Parsable> Parsable for VecDeque<T> {
    fn create_parser(
        registry: &ParserRegistry,
    ) -> Result<Arc<dyn ParameterParser<Self>>, RegistryError> {
        Ok(Arc::new(SequenceParser::<T, Self>::sequence(
            registry, "VecDeque",
        )?))
    }
}

impl<T: Parsable> Parsable for Stack<T> {
    fn create_parser(
        registry: &ParserRegistry,
    ) -> Result<Arc<dyn ParameterParser<Self>>, RegistryError> {
        Ok(Arc::new(SequenceParser::<T, Self>::sequence(registry, "Stack")?))
    }
}

impl<T: Parsable> Parsable for Box<[T]> {
    fn create_parser(
        registry: &ParserRegistry,
    ) -> Result<Arc<dyn ParameterParser<Self>>, RegistryError> {
        let parser = SequenceParser::<T, Self>::sequence(registry, "Box")?;
        let name = format!("[{}]", parser.element.type_name());
        Ok(Arc::new(parser.named(name)))
    }
}

impl<T: Parsable, const N: usize> Parsable for [T; N] {
    fn create_parser(
        registry: &ParserRegistry,
    ) -> Result<Arc<dyn ParameterParser<Self>>, RegistryError> {
        let parser = SequenceParser::<T, Self>::new(registry, SEQUENCE_GROUPING, "", |items| {
            <[T; N]>::try_from(items).ok()
        })?;
        let name = format!("[{}; {N}]", parser.element.type_name());
        Ok(Arc::new(parser.named(name)))
    }
}

impl<T: Parsable + Eq + Hash> Parsable for HashSet<T> {
    fn create_parser(
        registry: &ParserRegistry,
    ) -> Result<Arc<dyn ParameterParser<Self>>, RegistryError> {
        Ok(Arc::new(SequenceParser::<T, Self>::set(registry, "HashSet")?))
    }
}

impl<T: Parsable + Ord> Parsable for BTreeSet<T> {
    fn create_parser(
        registry: &ParserRegistry,
    ) -> Result<Arc<dyn ParameterParser<Self>>, RegistryError> {
        Ok(Arc::new(SequenceParser::<T, Self>::set(registry, "BTreeSet")?))
    }
}

macro_rules! element_count {
    ($($container:ty => [$($generics:tt)*]),* $(,)?) => {
        $(
            impl<$($generics)*> ElementCount for $container {
                fn element_count(&self) -> usize {
                    self.len()
                }
            }
        )*
    };
}

element_count!(
    Vec<T> => [T],
    VecDeque<T> => [T],
    Stack<T> => [T],
    Box<[T]> => [T],
    HashSet<T> => [T],
    BTreeSet<T> => [T],
);

impl<T, const N: usize> ElementCount for [T; N] {
    fn element_count(&self) -> usize {
        N
    }
}

impl<C: ElementCount> ElementCount for Option<C> {
    fn element_count(&self) -> usize {
        self.as_ref().map_or(0, ElementCount::element_count)
    }
}
