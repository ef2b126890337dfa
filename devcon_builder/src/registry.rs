use std::any::{Any, TypeId};
use std::cell::Cell;
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, PoisonError, RwLock};
use thiserror::Error;

use crate::constant::BUILTIN_SPECIAL_CHARS;
use crate::parser::{ParameterParser, Parsable};

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// The deepest chain of nested parser creation a single resolution may trigger.
pub const MAX_RESOLVE_DEPTH: usize = 64;

/// Error for parser resolution.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// Neither a registered parser nor a parser binding exists for the type.
    #[error("No parser is available for type '{0}'.")]
    ParserNotFound(String),

    /// Creating the parser nested deeper than [`MAX_RESOLVE_DEPTH`] (ex: a self referential type).
    #[error("Resolving a parser for type '{0}' exceeded the nesting limit of {MAX_RESOLVE_DEPTH}.")]
    RecursionLimit(String),
}

/// The characters which terminate unquoted scalar tokens, even without whitespace.
///
/// Owned by a [`ParserRegistry`] and shared by handle with every parser it constructs.
/// The built-in grouping, separator and key-value characters are special from the registry's creation.
/// Custom [`Compound`](crate::Compound) groupings are added when their parser is created.
#[derive(Debug, Clone, Default)]
pub struct SpecialChars(Arc<RwLock<BTreeSet<char>>>);

impl SpecialChars {
    /// Whether `character` is special.
    pub fn contains(&self, character: char) -> bool {
        self.0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&character)
    }

    /// Whether `character` ends an unquoted token: whitespace or a special character.
    pub fn terminates(&self, character: char) -> bool {
        character.is_whitespace() || self.contains(character)
    }

    fn insert(&self, characters: &[char]) {
        let mut special = self.0.write().unwrap_or_else(PoisonError::into_inner);
        special.extend(characters.iter().copied());
    }

    fn snapshot(&self) -> Vec<char> {
        self.0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .copied()
            .collect()
    }
}

// Holds an `Arc<dyn ParameterParser<T>>` for the `T` it is keyed under.
type ParserEntry = Box<dyn Any + Send + Sync>;

struct RegistryInner {
    parsers: RwLock<HashMap<TypeId, ParserEntry>>,
    special_chars: SpecialChars,
}

/// The table of parsers, keyed by the type they parse.
///
/// Resolution first looks for an exact registration, then synthesizes a parser through the type's [`Parsable`] binding.
/// Synthesized parsers are memoized for the life of the registry.
/// The registry is a cheap handle: clones share the same table.
///
/// ### Example
/// ```
/// use devcon_builder::*;
///
/// let registry = ParserRegistry::new();
/// let parser = registry.resolve::<Vec<Vec<u32>>>().unwrap();
/// let value = parser.try_parse(&mut ArgumentInput::new("[[1, 2] [3]]"));
/// assert_eq!(value, Some(vec![vec![1, 2], vec![3]]));
/// ```
#[derive(Clone)]
pub struct ParserRegistry {
    inner: Arc<RegistryInner>,
}

impl Default for ParserRegistry {
    fn default() -> Self {
        let special_chars = SpecialChars::default();
        special_chars.insert(BUILTIN_SPECIAL_CHARS);
        Self {
            inner: Arc::new(RegistryInner {
                parsers: RwLock::default(),
                special_chars,
            }),
        }
    }
}

thread_local! {
    static RESOLVE_DEPTH: Cell<usize> = Cell::new(0);
}

struct DepthGuard;

impl DepthGuard {
    fn enter() -> Option<Self> {
        RESOLVE_DEPTH.with(|depth| {
            if depth.get() >= MAX_RESOLVE_DEPTH {
                None
            } else {
                depth.set(depth.get() + 1);
                Some(DepthGuard)
            }
        })
    }
}

impl Drop for DepthGuard {
    fn drop(&mut self) {
        RESOLVE_DEPTH.with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}

impl ParserRegistry {
    /// Create a registry with no registered parsers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the parser for `T`, replacing any existing parser.
    /// Parsers already created from the replaced parser keep using it.
    pub fn register<T: 'static>(&self, parser: impl ParameterParser<T> + 'static) {
        self.register_shared::<T>(Arc::new(parser));
    }

    /// Register the shared parser for `T`, replacing any existing parser.
    pub fn register_shared<T: 'static>(&self, parser: Arc<dyn ParameterParser<T>>) {
        #[cfg(feature = "tracing_debug")]
        {
            debug!(
                "Registering parser for '{}'.",
                std::any::type_name::<T>()
            );
        }

        let mut parsers = self
            .inner
            .parsers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        parsers.insert(TypeId::of::<T>(), Box::new(parser));
    }

    /// The parser registered (or previously resolved) for exactly `T`.
    pub fn lookup<T: 'static>(&self) -> Option<Arc<dyn ParameterParser<T>>> {
        let parsers = self
            .inner
            .parsers
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        parsers.get(&TypeId::of::<T>()).map(|entry| {
            entry
                .downcast_ref::<Arc<dyn ParameterParser<T>>>()
                .expect("internal error - parser entry must match its key type")
                .clone()
        })
    }

    /// Resolve the parser for `T`, synthesizing and memoizing it on first request.
    ///
    /// Concurrent first requests may both synthesize a parser; the first to be stored wins and both callers receive it.
    pub fn resolve<T: Parsable>(&self) -> Result<Arc<dyn ParameterParser<T>>, RegistryError> {
        if let Some(parser) = self.lookup::<T>() {
            return Ok(parser);
        }

        let created = {
            let _guard = DepthGuard::enter().ok_or_else(|| {
                RegistryError::RecursionLimit(std::any::type_name::<T>().to_string())
            })?;
            T::create_parser(self)?
        };

        #[cfg(feature = "tracing_debug")]
        {
            debug!(
                "Synthesized parser for '{}' ({}).",
                std::any::type_name::<T>(),
                created.type_name()
            );
        }

        let mut parsers = self
            .inner
            .parsers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let entry = parsers
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(created));
        Ok(entry
            .downcast_ref::<Arc<dyn ParameterParser<T>>>()
            .expect("internal error - parser entry must match its key type")
            .clone())
    }

    /// The special character set shared by this registry's parsers.
    pub fn special_chars(&self) -> SpecialChars {
        self.inner.special_chars.clone()
    }

    /// Mark the characters as special.
    pub fn register_special_chars(&self, characters: &[char]) {
        self.inner.special_chars.insert(characters);
    }

    /// Whether `character` is special to this registry's parsers.
    pub fn is_special(&self, character: char) -> bool {
        self.inner.special_chars.contains(character)
    }
}

impl std::fmt::Debug for ParserRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parsers = self
            .inner
            .parsers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len();
        f.debug_struct("ParserRegistry")
            .field("parsers", &parsers)
            .field("special_chars", &self.inner.special_chars.snapshot())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::ArgumentInput;
    use crate::parser::SequenceParser;
    use std::thread;

    struct Shout;

    impl ParameterParser<String> for Shout {
        fn try_parse(&self, input: &mut ArgumentInput) -> Option<String> {
            let mut out = String::default();

            while let Some(c) = input.peek(0) {
                if c.is_whitespace() {
                    break;
                }

                out.push(c.to_ascii_uppercase());
                input.next_char();
            }

            Some(out)
        }

        fn type_name(&self) -> String {
            "shout".to_string()
        }
    }

    #[derive(Debug)]
    struct Node(Vec<Node>);

    impl Parsable for Node {
        fn create_parser(
            registry: &ParserRegistry,
        ) -> Result<Arc<dyn ParameterParser<Self>>, RegistryError> {
            let children = registry.resolve::<Vec<Node>>()?;
            Ok(Arc::new(NodeParser(children)))
        }
    }

    struct NodeParser(Arc<dyn ParameterParser<Vec<Node>>>);

    impl ParameterParser<Node> for NodeParser {
        fn try_parse(&self, input: &mut ArgumentInput) -> Option<Node> {
            self.0.try_parse(input).map(Node)
        }

        fn type_name(&self) -> String {
            "Node".to_string()
        }
    }

    struct Opaque;

    impl Parsable for Opaque {}

    #[test]
    fn resolve_memoized() {
        // Setup
        let registry = ParserRegistry::new();

        // Execute
        let first = registry.resolve::<Vec<i32>>().unwrap();
        let second = registry.resolve::<Vec<i32>>().unwrap();

        // Verify
        assert!(Arc::ptr_eq(&first, &second));
        assert!(registry.lookup::<i32>().is_some());
        assert!(registry.lookup::<u64>().is_none());
    }

    #[test]
    fn resolve_nested() {
        // Setup
        let registry = ParserRegistry::new();

        // Execute
        let parser = registry.resolve::<Vec<Vec<(f32, f32)>>>().unwrap();

        // Verify
        assert_eq!(parser.type_name(), "Vec<Vec<(f32, f32)>>");
        assert_eq!(
            parser.try_parse(&mut ArgumentInput::new("[[(1 2) [3, 4]] []]")),
            Some(vec![vec![(1.0, 2.0), (3.0, 4.0)], vec![]])
        );
    }

    #[test]
    fn register_overwrites() {
        // Setup
        let registry = ParserRegistry::new();
        registry.resolve::<String>().unwrap();

        // Execute
        registry.register::<String>(Shout);

        // Verify
        let parser = registry.resolve::<String>().unwrap();
        assert_eq!(parser.type_name(), "shout");
        assert_eq!(
            parser.try_parse(&mut ArgumentInput::new("abc")),
            Some("ABC".to_string())
        );
    }

    #[test]
    fn register_twice() {
        // Setup
        let registry = ParserRegistry::new();

        // Execute
        registry.register::<String>(Shout);
        registry.register::<String>(Shout);

        // Verify
        assert_eq!(registry.resolve::<String>().unwrap().type_name(), "shout");
    }

    #[test]
    fn registered_element_used_by_container() {
        // Setup
        let registry = ParserRegistry::new();
        registry.register::<String>(Shout);

        // Execute
        let parser = registry.resolve::<Vec<String>>().unwrap();

        // Verify
        assert_eq!(parser.type_name(), "Vec<shout>");
    }

    #[test]
    fn resolve_not_found() {
        // Setup
        let registry = ParserRegistry::new();

        // Execute
        let result = registry.resolve::<Vec<Opaque>>();

        // Verify
        assert_matches!(result.map(|_| ()), Err(RegistryError::ParserNotFound(_)));
        assert!(registry.lookup::<Vec<Opaque>>().is_none());
    }

    #[test]
    fn resolve_registered_only() {
        // Setup
        let registry = ParserRegistry::new();
        registry.register::<Opaque>(OpaqueParser);

        // Execute
        let parser = registry.resolve::<Vec<Opaque>>().unwrap();

        // Verify
        assert_eq!(parser.type_name(), "Vec<opaque>");
    }

    struct OpaqueParser;

    impl ParameterParser<Opaque> for OpaqueParser {
        fn try_parse(&self, input: &mut ArgumentInput) -> Option<Opaque> {
            input.matches("x").then(|| {
                input.next_char();
                Opaque
            })
        }

        fn type_name(&self) -> String {
            "opaque".to_string()
        }
    }

    #[test]
    fn resolve_recursive_type() {
        // Setup
        let registry = ParserRegistry::new();

        // Execute
        let result = registry.resolve::<Node>();

        // Verify
        assert_matches!(result.map(|_| ()), Err(RegistryError::RecursionLimit(_)));

        // The depth counter must unwind after failure.
        assert!(registry.resolve::<Vec<u8>>().is_ok());
    }

    #[test]
    fn special_chars_builtin() {
        // Execute
        let registry = ParserRegistry::new();

        // Verify
        for c in ['[', ']', '(', ')', '{', '}', ',', ':'] {
            assert!(registry.is_special(c), "{c}");
        }
        assert!(!registry.is_special('<'));
        assert!(registry.special_chars().terminates(' '));
    }

    #[test]
    fn special_chars_registered_by_combinators() {
        // Setup
        let registry = ParserRegistry::new();
        assert!(!registry.is_special('<'));

        // Execute
        let _ = SequenceParser::<u8, Vec<u8>>::new(&registry, &[('<', '>')], "Angled", |items| {
            Some(items)
        })
        .unwrap();

        // Verify
        assert!(registry.is_special('<'));
        assert!(registry.is_special('>'));
    }

    #[test]
    fn special_chars_stable_across_resolution() {
        // Setup
        let registry = ParserRegistry::new();
        let url = registry.resolve::<String>().unwrap();
        let before = url.try_parse(&mut ArgumentInput::new("http://host,a"));

        // Execute
        registry.resolve::<HashMap<String, u8>>().unwrap();
        registry.resolve::<Vec<u8>>().unwrap();
        let after = url.try_parse(&mut ArgumentInput::new("http://host,a"));

        // Verify
        assert_eq!(before, Some("http".to_string()));
        assert_eq!(after, before);
    }

    #[test]
    fn special_chars_per_registry() {
        // Setup
        let left = ParserRegistry::new();
        let right = ParserRegistry::new();

        // Execute
        left.register_special_chars(&['#']);

        // Verify
        assert!(left.is_special('#'));
        assert!(!right.is_special('#'));
        assert!(left.clone().is_special('#'));
    }

    #[test]
    fn resolve_concurrently() {
        // Setup
        let registry = ParserRegistry::new();

        // Execute
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = registry.clone();
                thread::spawn(move || registry.resolve::<Vec<Vec<i64>>>().unwrap())
            })
            .collect();
        let parsers: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        // Verify
        let stored = registry.lookup::<Vec<Vec<i64>>>().unwrap();
        assert!(parsers.iter().any(|p| Arc::ptr_eq(p, &stored)));
        for parser in parsers {
            assert_eq!(
                parser.try_parse(&mut ArgumentInput::new("[[1] [-2]]")),
                Some(vec![vec![1], vec![-2]])
            );
        }
    }
}
