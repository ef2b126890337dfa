use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;
use std::sync::Arc;

use crate::constant::*;
use crate::input::ArgumentInput;
use crate::parser::sequence::{parse_grouped, register_grouping};
use crate::parser::{ElementCount, ParameterParser, Parsable};
use crate::registry::{ParserRegistry, RegistryError};

/// A single `key: value` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyValue<K, V> {
    /// The key.
    pub key: K,
    /// The value.
    pub value: V,
}

impl<K, V> From<KeyValue<K, V>> for (K, V) {
    fn from(pair: KeyValue<K, V>) -> Self {
        (pair.key, pair.value)
    }
}

/// Parses `key : value`, with optional whitespace around the colon.
pub struct KeyValueParser<K, V> {
    key: Arc<dyn ParameterParser<K>>,
    value: Arc<dyn ParameterParser<V>>,
}

impl<K: Parsable, V: Parsable> KeyValueParser<K, V> {
    /// Create a pair parser from the registry's key and value parsers.
    pub fn new(registry: &ParserRegistry) -> Result<Self, RegistryError> {
        registry.register_special_chars(&[KEY_VALUE_SEPARATOR]);
        Ok(Self {
            key: registry.resolve::<K>()?,
            value: registry.resolve::<V>()?,
        })
    }
}

impl<K: 'static, V: 'static> ParameterParser<KeyValue<K, V>> for KeyValueParser<K, V> {
    fn try_parse(&self, input: &mut ArgumentInput) -> Option<KeyValue<K, V>> {
        let key = self.key.try_parse(input)?;
        input.trim_whitespace();

        if input.next_char()? != KEY_VALUE_SEPARATOR {
            return None;
        }

        input.trim_whitespace();
        let value = self.value.try_parse(input)?;
        Some(KeyValue { key, value })
    }

    fn type_name(&self) -> String {
        format!(
            "KeyValue<{}, {}>",
            self.key.type_name(),
            self.value.type_name()
        )
    }

    fn format(&self) -> Option<String> {
        Some(format!(
            "{}: {}",
            self.key.format().unwrap_or_else(|| "key".to_string()),
            self.value.format().unwrap_or_else(|| "value".to_string())
        ))
    }
}

impl<K: Parsable, V: Parsable> Parsable for KeyValue<K, V> {
    fn create_parser(
        registry: &ParserRegistry,
    ) -> Result<Arc<dyn ParameterParser<Self>>, RegistryError> {
        Ok(Arc::new(KeyValueParser::<K, V>::new(registry)?))
    }
}

/// Parses a `{key: value, ..}` map into `M`.
/// A key appearing twice is a failure.
pub struct MapParser<K, V, M> {
    pair: Arc<dyn ParameterParser<KeyValue<K, V>>>,
    type_name: String,
    insert: fn(&mut M, K, V) -> bool,
}

impl<K: Parsable, V: Parsable, M> MapParser<K, V, M> {
    /// Create a map parser named `container` in help messages.
    /// `insert` adds the pair and returns whether the key was new.
    pub fn new(
        registry: &ParserRegistry,
        container: &str,
        insert: fn(&mut M, K, V) -> bool,
    ) -> Result<Self, RegistryError> {
        register_grouping(registry, MAP_GROUPING, SEPARATOR);
        let type_name = format!(
            "{container}<{}, {}>",
            registry.resolve::<K>()?.type_name(),
            registry.resolve::<V>()?.type_name()
        );
        Ok(Self {
            pair: registry.resolve::<KeyValue<K, V>>()?,
            type_name,
            insert,
        })
    }
}

impl<K: Parsable, V: Parsable, M: Default + 'static> ParameterParser<M> for MapParser<K, V, M> {
    fn try_parse(&self, input: &mut ArgumentInput) -> Option<M> {
        let mut map = M::default();
        let mut unique = true;
        parse_grouped(input, MAP_GROUPING, SEPARATOR, |input| {
            let KeyValue { key, value } = self.pair.try_parse(input)?;
            unique &= (self.insert)(&mut map, key, value);
            Some(())
        })?;

        if unique {
            Some(map)
        } else {
            None
        }
    }

    fn type_name(&self) -> String {
        self.type_name.clone()
    }

    fn format(&self) -> Option<String> {
        let (open, close) = MAP_GROUPING[0];
        let pair = self.pair.format().unwrap_or_else(|| self.pair.type_name());
        Some(format!("{open}{pair} ...{close}"))
    }
}

impl<K: Parsable + Eq + Hash, V: Parsable> Parsable for HashMap<K, V> {
    fn create_parser(
        registry: &ParserRegistry,
    ) -> Result<Arc<dyn ParameterParser<Self>>, RegistryError> {
        Ok(Arc::new(MapParser::<K, V, Self>::new(
            registry,
            "HashMap",
            |map, key, value| map.insert(key, value).is_none(),
        )?))
    }
}

impl<K: Parsable + Ord, V: Parsable> Parsable for BTreeMap<K, V> {
    fn create_parser(
        registry: &ParserRegistry,
    ) -> Result<Arc<dyn ParameterParser<Self>>, RegistryError> {
        Ok(Arc::new(MapParser::<K, V, Self>::new(
            registry,
            "BTreeMap",
            |map, key, value| map.insert(key, value).is_none(),
        )?))
    }
}

impl<K, V> ElementCount for HashMap<K, V> {
    fn element_count(&self) -> usize {
        self.len()
    }
}

impl<K, V> ElementCount for BTreeMap<K, V> {
    fn element_count(&self) -> usize {
        self.len()
    }
}
