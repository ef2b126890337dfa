use std::marker::PhantomData;
use std::sync::Arc;

use crate::constant::*;
use crate::input::ArgumentInput;
use crate::parser::sequence::{parse_grouped, register_grouping};
use crate::parser::{anonymous, AnonymousParser, DefaultFactory, ParameterParser, Parsable, Value};
use crate::registry::{ParserRegistry, RegistryError};

/// One element position of a [`Compound`] literal.
pub struct Slot {
    parser: Arc<dyn AnonymousParser>,
    default: Option<DefaultFactory>,
}

impl Slot {
    /// A slot which must always be supplied.
    pub fn required<T: Parsable>(registry: &ParserRegistry) -> Result<Self, RegistryError> {
        Ok(Self {
            parser: anonymous(registry.resolve::<T>()?),
            default: None,
        })
    }

    /// A slot which takes `default` when the literal closes before reaching it.
    pub fn with_default<T>(registry: &ParserRegistry, default: T) -> Result<Self, RegistryError>
    where
        T: Parsable + Clone + Send + Sync,
    {
        Ok(Self {
            parser: anonymous(registry.resolve::<T>()?),
            default: Some(Arc::new(move || Value::new(default.clone()))),
        })
    }

    /// Whether the slot has a default.
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    /// The name of the slot's type.
    pub fn type_name(&self) -> String {
        self.parser.type_name()
    }

    /// The slot's literal template, or else its type name.
    pub fn format_or_name(&self) -> String {
        self.parser.format().unwrap_or_else(|| self.parser.type_name())
    }
}

/// The parsed values of a compound literal, in slot order.
pub struct Elements(std::vec::IntoIter<Value>);

impl Elements {
    /// Take the next element, which must be a `T`.
    pub fn take<T: 'static>(&mut self) -> Option<T> {
        self.0.next()?.downcast::<T>().ok()
    }
}

/// A fixed arity record parsed from a grouped literal, such as `[1.0 2.5 0]` or `(a, 4)`.
///
/// Elements may be separated by a single `,`.
/// When the literal closes early, the remaining slots take their defaults, provided every one of them has a default.
///
/// ### Example
/// ```
/// use devcon_builder::*;
/// use std::sync::Arc;
///
/// #[derive(Debug, PartialEq)]
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// impl Compound for Point {
///     fn slots(registry: &ParserRegistry) -> Result<Vec<Slot>, RegistryError> {
///         Ok(vec![
///             Slot::required::<i32>(registry)?,
///             Slot::with_default::<i32>(registry, 0)?,
///         ])
///     }
///
///     fn assemble(elements: &mut Elements) -> Option<Self> {
///         Some(Point {
///             x: elements.take()?,
///             y: elements.take()?,
///         })
///     }
/// }
///
/// impl Parsable for Point {
///     fn create_parser(
///         registry: &ParserRegistry,
///     ) -> Result<Arc<dyn ParameterParser<Self>>, RegistryError> {
///         compound_parser::<Self>(registry)
///     }
/// }
///
/// let registry = ParserRegistry::new();
/// let parser = registry.resolve::<Point>().unwrap();
/// assert_eq!(parser.try_parse(&mut ArgumentInput::new("[3]")), Some(Point { x: 3, y: 0 }));
/// assert_eq!(parser.format(), Some("[i32 i32]".to_string()));
/// ```
pub trait Compound: Sized + 'static {
    /// The element slots, in literal order.
    fn slots(registry: &ParserRegistry) -> Result<Vec<Slot>, RegistryError>;

    /// Build the value from one element per slot.
    /// Returning `None` rejects the literal.
    fn assemble(elements: &mut Elements) -> Option<Self>;

    /// The name of the type in help messages.
    fn type_name(_slots: &[Slot]) -> String {
        short_type_name(std::any::type_name::<Self>())
    }

    /// The literal template in help messages.
    fn format(slots: &[Slot]) -> String {
        let (open, close) = Self::grouping()[0];
        let elements: Vec<String> = slots.iter().map(Slot::format_or_name).collect();
        format!("{open}{}{close}", elements.join(" "))
    }

    /// The accepted (open, close) grouping pairs.
    fn grouping() -> &'static [(char, char)] {
        COMPOUND_GROUPING
    }

    /// The optional element separator.
    fn separator() -> char {
        SEPARATOR
    }
}

/// Drop module paths from a fully qualified type name.
fn short_type_name(full: &str) -> String {
    let mut out = String::default();
    let mut segment = String::default();

    for c in full.chars() {
        if c.is_alphanumeric() || c == '_' || c == ':' {
            segment.push(c);
        } else {
            out.push_str(segment.rsplit("::").next().unwrap_or_default());
            segment.clear();
            out.push(c);
        }
    }

    out.push_str(segment.rsplit("::").next().unwrap_or_default());
    out
}

/// Parses a [`Compound`].
pub struct CompoundParser<T> {
    slots: Vec<Slot>,
    type_name: String,
    format: String,
    _phantom: PhantomData<fn() -> T>,
}

impl<T: Compound> CompoundParser<T> {
    /// Create the parser for `T`, resolving a parser for each of its slots.
    pub fn new(registry: &ParserRegistry) -> Result<Self, RegistryError> {
        register_grouping(registry, T::grouping(), T::separator());
        let slots = T::slots(registry)?;
        Ok(Self {
            type_name: T::type_name(&slots),
            format: T::format(&slots),
            slots,
            _phantom: PhantomData,
        })
    }
}

impl<T: Compound> ParameterParser<T> for CompoundParser<T> {
    fn try_parse(&self, input: &mut ArgumentInput) -> Option<T> {
        let mut values = Vec::with_capacity(self.slots.len());
        let count = parse_grouped(input, T::grouping(), T::separator(), |input| {
            let slot = self.slots.get(values.len())?;
            values.push(slot.parser.try_parse(input)?);
            Some(())
        })?;

        for slot in &self.slots[count..] {
            let default = slot.default.as_ref()?;
            values.push(default());
        }

        T::assemble(&mut Elements(values.into_iter()))
    }

    fn type_name(&self) -> String {
        self.type_name.clone()
    }

    fn format(&self) -> Option<String> {
        Some(self.format.clone())
    }
}

/// The [`Parsable::create_parser`] for a [`Compound`] type.
pub fn compound_parser<T: Compound>(
    registry: &ParserRegistry,
) -> Result<Arc<dyn ParameterParser<T>>, RegistryError> {
    Ok(Arc::new(CompoundParser::<T>::new(registry)?))
}

fn tuple_name(slots: &[Slot]) -> String {
    let names: Vec<String> = slots.iter().map(Slot::type_name).collect();

    if names.len() == 1 {
        format!("({},)", names[0])
    } else {
        format!("({})", names.join(", "))
    }
}

macro_rules! tuple_compounds {
    ($(($($name:ident),+)),+ $(,)?) => {
        $(
            impl<$($name: Parsable),+> Compound for ($($name,)+) {
                fn slots(registry: &ParserRegistry) -> Result<Vec<Slot>, RegistryError> {
                    Ok(vec![$(Slot::required::<$name>(registry)?),+])
                }

                fn assemble(elements: &mut Elements) -> Option<Self> {
                    Some(($(elements.take::<$name>()?,)+))
                }

                fn type_name(slots: &[Slot]) -> String {
                    tuple_name(slots)
                }
            }

            impl<$($name: Parsable),+> Parsable for ($($name,)+) {
                fn create_parser(
                    registry: &ParserRegistry,
                ) -> Result<Arc<dyn ParameterParser<Self>>, RegistryError> {
                    compound_parser::<Self>(registry)
                }
            }
        )+
    };
}

tuple_compounds!(
    (A),
    (A, B),
    (A, B, C),
    (A, B, C, D),
    (A, B, C, D, E),
    (A, B, C, D, E, F),
    (A, B, C, D, E, F, G),
    (A, B, C, D, E, F, G, H),
);
