use std::any::Any;
use std::sync::Arc;

use crate::input::ArgumentInput;
use crate::registry::{ParserRegistry, RegistryError};

mod compound;
mod map;
mod nullable;
mod primitive;
mod sequence;

pub use compound::*;
pub use map::*;
pub use nullable::*;
pub use primitive::*;
pub use sequence::*;

/// A parser for values of type `T`.
///
/// A parser claims characters from the front of the [`ArgumentInput`] as it recognizes them.
/// Failure is silent: `try_parse` returns `None` and the caller decides how to report it.
/// A failed parse may leave the input partially consumed.
pub trait ParameterParser<T>: Send + Sync {
    /// Attempt to parse a `T` from the front of the input.
    fn try_parse(&self, input: &mut ArgumentInput) -> Option<T>;

    /// The human readable name of the parsed type.
    fn type_name(&self) -> String;

    /// The literal template for the parsed type, if it needs one (ex: `[x y z]`).
    fn format(&self) -> Option<String> {
        None
    }
}

/// A type which the [`ParserRegistry`] knows how to parse.
///
/// Types that are only ever parsed through [`ParserRegistry::register`] may rely on the provided `create_parser`.
/// Types that can build their own parser (primitives, containers, tuples, compounds) override it.
///
/// ### Example
/// ```
/// use devcon_builder::*;
/// use std::sync::Arc;
///
/// #[derive(Debug, PartialEq)]
/// struct Bag<T>(Vec<T>);
///
/// impl<T> FromIterator<T> for Bag<T> {
///     fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
///         Bag(iter.into_iter().collect())
///     }
/// }
///
/// impl<T: Parsable> Parsable for Bag<T> {
///     fn create_parser(
///         registry: &ParserRegistry,
///     ) -> Result<Arc<dyn ParameterParser<Self>>, RegistryError> {
///         Ok(Arc::new(SequenceParser::sequence(registry, "Bag")?))
///     }
/// }
///
/// let registry = ParserRegistry::new();
/// let parser = registry.resolve::<Bag<u8>>().unwrap();
/// let value = parser.try_parse(&mut ArgumentInput::new("[1 2]"));
/// assert_eq!(value, Some(Bag(vec![1, 2])));
/// ```
pub trait Parsable: Sized + 'static {
    /// Create the parser for this type.
    /// Called at most once per registry, the result is memoized.
    fn create_parser(
        _registry: &ParserRegistry,
    ) -> Result<Arc<dyn ParameterParser<Self>>, RegistryError> {
        Err(RegistryError::ParserNotFound(
            std::any::type_name::<Self>().to_string(),
        ))
    }
}

/// A container type whose element count may be bounded by a parameter's min/max.
pub trait ElementCount {
    /// The number of elements in the container.
    fn element_count(&self) -> usize;
}

/// A type erased parsed value.
pub struct Value(Box<dyn Any>);

impl Value {
    /// Erase the value.
    pub fn new<T: 'static>(value: T) -> Self {
        Self(Box::new(value))
    }

    /// Recover the typed value, or give back the erased value if `T` is the wrong type.
    pub fn downcast<T: 'static>(self) -> Result<T, Value> {
        self.0.downcast::<T>().map(|value| *value).map_err(Value)
    }

    /// Borrow the typed value, if `T` is the right type.
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }
}

impl std::fmt::Debug for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Value(..)")
    }
}

/// Produces a fresh default value each time it is called.
pub(crate) type DefaultFactory = Arc<dyn Fn() -> Value + Send + Sync>;

/// A parser whose output type has been erased.
pub(crate) trait AnonymousParser: Send + Sync {
    fn try_parse(&self, input: &mut ArgumentInput) -> Option<Value>;

    fn type_name(&self) -> String;

    fn format(&self) -> Option<String>;
}

struct AnonymousParse<T> {
    parser: Arc<dyn ParameterParser<T>>,
}

impl<T: 'static> AnonymousParser for AnonymousParse<T> {
    fn try_parse(&self, input: &mut ArgumentInput) -> Option<Value> {
        self.parser.try_parse(input).map(Value::new)
    }

    fn type_name(&self) -> String {
        self.parser.type_name()
    }

    fn format(&self) -> Option<String> {
        self.parser.format()
    }
}

pub(crate) fn anonymous<T: 'static>(
    parser: Arc<dyn ParameterParser<T>>,
) -> Arc<dyn AnonymousParser> {
    Arc::new(AnonymousParse { parser })
}
