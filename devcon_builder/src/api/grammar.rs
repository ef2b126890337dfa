use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;

use crate::api::parameter::{CountFn, ParameterDefault, ParameterInner};
use crate::api::{Arguments, Parameter};
use crate::constant::*;
use crate::matcher::{interpret, ParseError};
use crate::model::{Arity, ParameterKind};
use crate::parser::{AnonymousParser, Parsable};
use crate::printer::Printer;
use crate::registry::{ParserRegistry, RegistryError};

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// Error for an invalid grammar configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Two switches share a long name.
    #[error("Config error: cannot duplicate the long name '--{0}'.")]
    DuplicateLong(String),

    /// Two switches share a short name.
    #[error("Config error: cannot duplicate the short name '-{0}'.")]
    DuplicateShort(char),

    /// Two parameters share a meta name.
    #[error("Config error: cannot duplicate the meta name '{0}'.")]
    DuplicateMeta(String),

    /// A required positional follows an optional one, so it could never be filled alone.
    #[error("Config error: the required positional '{0}' cannot follow an optional positional.")]
    RequiredAfterOptional(String),

    /// The short name cannot be typed as `-x`.
    #[error("Config error: invalid short name '{0}'.")]
    InvalidShort(char),

    /// The long name cannot be typed as `--name`.
    #[error("Config error: invalid long name '{0}'.")]
    InvalidLong(String),

    /// The meta name is empty.
    #[error("Config error: a parameter's meta name cannot be empty.")]
    EmptyMeta,

    /// The minimum element count exceeds the maximum.
    #[error("Config error: the parameter '{name}' cannot have a minimum of {min} above its maximum of {max}.")]
    InvalidArity {
        /// The parameter's meta name.
        name: String,
        /// The configured minimum.
        min: usize,
        /// The configured maximum.
        max: usize,
    },

    /// The parameter's type has no parser.
    #[error("Config error: {0}")]
    Registry(#[from] RegistryError),
}

/// A fully resolved parameter of a [`Grammar`].
pub struct ParameterDescriptor {
    index: usize,
    kind: ParameterKind,
    meta: String,
    short: Option<char>,
    long: Option<String>,
    required: bool,
    arity: Arity,
    description: Option<String>,
    pub(crate) parser: Arc<dyn AnonymousParser>,
    pub(crate) default: Option<ParameterDefault>,
    pub(crate) count: Option<CountFn>,
}

impl ParameterDescriptor {
    /// The position of the parameter in declaration order, which is also its index in the parsed [`Arguments`].
    pub fn index(&self) -> usize {
        self.index
    }

    /// How the parameter is supplied.
    pub fn kind(&self) -> ParameterKind {
        self.kind
    }

    /// The name shown for the parameter's value.
    pub fn meta(&self) -> &str {
        &self.meta
    }

    /// The `-x` name of a switch or flag.
    pub fn short(&self) -> Option<char> {
        self.short
    }

    /// The `--name` of a switch or flag.
    pub fn long(&self) -> Option<&str> {
        self.long.as_deref()
    }

    /// Whether the parameter must be supplied.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// The permitted element count.
    pub fn arity(&self) -> Arity {
        self.arity
    }

    /// The documentation for the parameter.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The human readable name of the parameter's type.
    pub fn type_name(&self) -> String {
        self.parser.type_name()
    }

    /// The literal template of the parameter's type, if it has one.
    pub fn format(&self) -> Option<String> {
        self.parser.format()
    }

    /// The name the parameter is listed under: the meta name of a positional, `-x, --name` otherwise.
    pub fn display_name(&self) -> String {
        match (self.kind, self.short, &self.long) {
            (ParameterKind::Positional, _, _) => self.meta.clone(),
            (_, Some(short), Some(long)) => format!("{SHORT_PREFIX}{short}, {LONG_PREFIX}{long}"),
            (_, Some(short), None) => format!("{SHORT_PREFIX}{short}"),
            (_, None, Some(long)) => format!("{LONG_PREFIX}{long}"),
            (_, None, None) => self.meta.clone(),
        }
    }

    /// The name a user would type: the meta name of a positional, `--name` or `-x` otherwise.
    pub(crate) fn label(&self) -> String {
        match (self.kind, self.short, &self.long) {
            (ParameterKind::Positional, _, _) => self.meta.clone(),
            (_, _, Some(long)) => format!("{LONG_PREFIX}{long}"),
            (_, Some(short), None) => format!("{SHORT_PREFIX}{short}"),
            (_, None, None) => self.meta.clone(),
        }
    }
}

impl std::fmt::Debug for ParameterDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let required = if self.required { "required" } else { "optional" };
        write!(
            f,
            "{kind}[{index}, {name}, {t}, {required}]",
            kind = self.kind,
            index = self.index,
            name = self.display_name(),
            t = self.type_name(),
        )
    }
}

/// Collects the parameters of a command, then resolves and validates them into a [`Grammar`].
///
/// ### Example
/// ```
/// use devcon_builder::*;
///
/// let registry = ParserRegistry::new();
/// let grammar = GrammarBuilder::new()
///     .add(Parameter::<String>::positional("greeting"))
///     .add(Parameter::<u8>::switch('n').long("repeat"))
///     .build(&registry)
///     .unwrap();
///
/// assert_eq!(grammar.parameters().len(), 2);
/// assert_eq!(grammar.usage("greet"), "usage: greet greeting [-n repeat]");
/// ```
#[derive(Default)]
pub struct GrammarBuilder {
    parameters: Vec<ParameterInner>,
}

impl GrammarBuilder {
    /// Create an empty grammar builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter.
    /// Parameters are indexed in the order they are added.
    pub fn add<T: Parsable>(mut self, parameter: Parameter<T>) -> Self {
        self.parameters.push(ParameterInner::from(parameter));
        self
    }

    /// Build the grammar, resolving each parameter's parser from `registry`.
    /// This finalizes the configuration and checks for errors (ex: a repeated short name).
    pub fn build(self, registry: &ParserRegistry) -> Result<Grammar, ConfigError> {
        let mut longs = HashSet::new();
        let mut shorts = HashSet::new();
        let mut metas = HashSet::new();
        let mut optional_positional = false;
        let mut parameters = Vec::with_capacity(self.parameters.len());

        for (index, inner) in self.parameters.into_iter().enumerate() {
            if inner.meta.is_empty() {
                return Err(ConfigError::EmptyMeta);
            }

            if !metas.insert(inner.meta.clone()) {
                return Err(ConfigError::DuplicateMeta(inner.meta));
            }

            if let Some(short) = inner.short {
                if short.is_whitespace()
                    || short == SHORT_PREFIX
                    || short == LONG_VALUE_SEPARATOR
                {
                    return Err(ConfigError::InvalidShort(short));
                }

                if !shorts.insert(short) {
                    return Err(ConfigError::DuplicateShort(short));
                }
            }

            if let Some(long) = &inner.long {
                if long.is_empty()
                    || long.starts_with(SHORT_PREFIX)
                    || long.contains(LONG_VALUE_SEPARATOR)
                {
                    return Err(ConfigError::InvalidLong(long.clone()));
                }

                if !longs.insert(long.clone()) {
                    return Err(ConfigError::DuplicateLong(long.clone()));
                }
            }

            if inner.kind == ParameterKind::Positional {
                if inner.required && optional_positional {
                    return Err(ConfigError::RequiredAfterOptional(inner.meta));
                }

                optional_positional |= !inner.required;
            }

            if let (Some(min), Some(max)) = (inner.arity.min, inner.arity.max) {
                if min > max {
                    return Err(ConfigError::InvalidArity {
                        name: inner.meta,
                        min,
                        max,
                    });
                }
            }

            let parser = (inner.resolver)(registry)?;
            parameters.push(ParameterDescriptor {
                index,
                kind: inner.kind,
                meta: inner.meta,
                short: inner.short,
                long: inner.long,
                required: inner.required,
                arity: inner.arity,
                description: inner.description,
                parser,
                default: inner.default,
                count: inner.count,
            });
        }

        #[cfg(feature = "tracing_debug")]
        {
            debug!("Built grammar: {parameters:?}.");
        }

        Ok(Grammar { parameters })
    }
}

/// The validated parameters of a command.
///
/// A grammar is immutable once built, and may be shared between threads to parse concurrently.
pub struct Grammar {
    parameters: Vec<ParameterDescriptor>,
}

impl Grammar {
    /// All parameters, in declaration order.
    pub fn parameters(&self) -> &[ParameterDescriptor] {
        &self.parameters
    }

    /// The positional parameters, in the order they are filled.
    pub fn positionals(&self) -> impl Iterator<Item = &ParameterDescriptor> {
        self.parameters
            .iter()
            .filter(|p| p.kind == ParameterKind::Positional)
    }

    /// The switches and flags, in declaration order.
    pub fn switches(&self) -> impl Iterator<Item = &ParameterDescriptor> {
        self.parameters
            .iter()
            .filter(|p| p.kind != ParameterKind::Positional)
    }

    /// The switch or flag with the short name.
    pub fn find_short(&self, short: char) -> Option<&ParameterDescriptor> {
        self.switches().find(|p| p.short == Some(short))
    }

    /// The switch or flag with the long name.
    pub fn find_long(&self, long: &str) -> Option<&ParameterDescriptor> {
        self.switches().find(|p| p.long.as_deref() == Some(long))
    }

    /// Parse one line of argument text.
    ///
    /// ### Example
    /// ```
    /// use devcon_builder::*;
    ///
    /// let registry = ParserRegistry::new();
    /// let grammar = GrammarBuilder::new()
    ///     .add(Parameter::<String>::positional("greeting"))
    ///     .add(Parameter::<i32>::positional("count").optional())
    ///     .add(Parameter::<bool>::switch('l').long("loud"))
    ///     .build(&registry)
    ///     .unwrap();
    ///
    /// let mut arguments = grammar.parse("hello -l").unwrap();
    /// assert_eq!(arguments.take::<String>(0).unwrap(), "hello");
    /// assert_eq!(arguments.take::<i32>(1).unwrap(), 0);
    /// assert_eq!(arguments.take::<bool>(2).unwrap(), true);
    ///
    /// assert!(grammar.parse("").is_err());
    /// ```
    pub fn parse(&self, text: &str) -> Result<Arguments, ParseError> {
        interpret(self, text)
    }

    /// The one line usage summary of the grammar, for `command`.
    pub fn usage(&self, command: &str) -> String {
        Printer::unbounded().usage(command, self)
    }

    /// The full help message of the grammar, for `command`, without line wrapping.
    pub fn help(&self, command: &str) -> String {
        Printer::unbounded().help(command, None, self)
    }
}

impl std::fmt::Debug for Grammar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.parameters.iter()).finish()
    }
}
