use thiserror::Error;

use crate::parser::Value;

/// Error for retrieving a parsed argument.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArgumentError {
    /// No argument is held at the index (ex: it was already taken).
    #[error("No argument at index {0}.")]
    Missing(usize),

    /// The argument is of a different type.
    #[error("The argument at index {index} is not a '{expected}'.")]
    WrongType {
        /// The index of the argument.
        index: usize,
        /// The requested type.
        expected: &'static str,
    },
}

/// The values parsed for each parameter of a grammar, indexed by declaration order.
///
/// Every parameter holds a value after a successful parse: either the supplied one or its default.
#[derive(Debug)]
pub struct Arguments {
    values: Vec<Option<Value>>,
}

impl Arguments {
    pub(crate) fn new(values: Vec<Value>) -> Self {
        Self {
            values: values.into_iter().map(Some).collect(),
        }
    }

    /// The number of arguments, including those already taken.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the grammar had no parameters.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Borrow the argument at `index`, if it is held and is a `T`.
    pub fn get<T: 'static>(&self, index: usize) -> Option<&T> {
        self.values
            .get(index)
            .and_then(Option::as_ref)
            .and_then(Value::downcast_ref::<T>)
    }

    /// Take the argument at `index` out of the arguments.
    /// An argument of the wrong type is left in place.
    pub fn take<T: 'static>(&mut self, index: usize) -> Result<T, ArgumentError> {
        let slot = self
            .values
            .get_mut(index)
            .ok_or(ArgumentError::Missing(index))?;
        let value = slot.take().ok_or(ArgumentError::Missing(index))?;

        match value.downcast::<T>() {
            Ok(value) => Ok(value),
            Err(value) => {
                slot.replace(value);
                Err(ArgumentError::WrongType {
                    index,
                    expected: std::any::type_name::<T>(),
                })
            }
        }
    }

    /// Release the erased values, in declaration order.
    pub fn into_values(self) -> Vec<Option<Value>> {
        self.values
    }
}
