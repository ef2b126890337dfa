use std::sync::Arc;

use crate::input::ArgumentInput;
use crate::parser::{ParameterParser, Parsable};
use crate::registry::{ParserRegistry, RegistryError};

/// Parses an `Option<T>` by delegating to the parser for `T`.
///
/// There is no literal for `None`; it only arises from an omitted optional parameter.
pub struct NullableParser<T> {
    inner: Arc<dyn ParameterParser<T>>,
}

impl<T: Parsable> NullableParser<T> {
    /// Create an option parser from the registry's parser for `T`.
    pub fn new(registry: &ParserRegistry) -> Result<Self, RegistryError> {
        Ok(Self {
            inner: registry.resolve::<T>()?,
        })
    }
}

impl<T: 'static> ParameterParser<Option<T>> for NullableParser<T> {
    fn try_parse(&self, input: &mut ArgumentInput) -> Option<Option<T>> {
        self.inner.try_parse(input).map(Some)
    }

    fn type_name(&self) -> String {
        format!("Option<{}>", self.inner.type_name())
    }

    fn format(&self) -> Option<String> {
        self.inner.format()
    }
}

impl<T: Parsable> Parsable for Option<T> {
    fn create_parser(
        registry: &ParserRegistry,
    ) -> Result<Arc<dyn ParameterParser<Self>>, RegistryError> {
        Ok(Arc::new(NullableParser::<T>::new(registry)?))
    }
}
