use std::any::TypeId;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::input::ArgumentInput;
use crate::model::{Arity, ParameterKind};
use crate::parser::{
    anonymous, AnonymousParser, DefaultFactory, ElementCount, ParameterParser, Parsable, Value,
};
use crate::registry::{ParserRegistry, RegistryError};

#[cfg(feature = "tracing_debug")]
use tracing::debug;

type Resolver = Box<dyn FnOnce(&ParserRegistry) -> Result<Arc<dyn AnonymousParser>, RegistryError>>;
pub(crate) type CountFn = Arc<dyn Fn(&Value) -> Option<usize> + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum DeclaredKind {
    Positional,
    Switch,
}

/// The value an unfilled optional parameter receives.
#[derive(Clone)]
pub(crate) enum ParameterDefault {
    Value(DefaultFactory),
    Raw {
        text: String,
        zero: DefaultFactory,
    },
}

impl ParameterDefault {
    /// Produce the default, parsing raw text with `parser`.
    /// Raw text which fails to parse falls back to the type's zero value.
    pub(crate) fn produce(&self, parser: &dyn AnonymousParser) -> Value {
        match self {
            ParameterDefault::Value(factory) => factory(),
            ParameterDefault::Raw { text, zero } => {
                let mut input = ArgumentInput::new(text);
                input.trim_whitespace();

                match parser.try_parse(&mut input) {
                    Some(value) => value,
                    None => {
                        #[cfg(feature = "tracing_debug")]
                        {
                            debug!("Default '{text}' does not parse, using the zero value.");
                        }

                        zero()
                    }
                }
            }
        }
    }
}

/// A parameter definition for a command grammar.
///
/// Parameters are either positional (identified by their order) or switches (identified by `-x`/`--long`).
/// A switch over `bool` becomes a flag unless flag mode is disabled: its presence alone sets it to `true`.
///
/// ### Example
/// ```
/// use devcon_builder::*;
///
/// let registry = ParserRegistry::new();
/// let grammar = GrammarBuilder::new()
///     .add(Parameter::<String>::positional("message").description("The text to print."))
///     .add(Parameter::<u32>::positional("count").optional())
///     .add(Parameter::<bool>::switch('v').long("verbose"))
///     .add(Parameter::<Vec<u8>>::switch('b').long("bytes").max(4))
///     .build(&registry)
///     .unwrap();
///
/// let arguments = grammar.parse("hi 3 -v --bytes=[1 2]").unwrap();
/// assert_eq!(arguments.get::<String>(0), Some(&"hi".to_string()));
/// assert_eq!(arguments.get::<u32>(1), Some(&3));
/// assert_eq!(arguments.get::<bool>(2), Some(&true));
/// assert_eq!(arguments.get::<Vec<u8>>(3), Some(&vec![1, 2]));
/// ```
pub struct Parameter<T> {
    pub(super) kind: DeclaredKind,
    pub(super) meta: Option<String>,
    pub(super) short: Option<char>,
    pub(super) long: Option<String>,
    pub(super) required: bool,
    pub(super) flag: bool,
    pub(super) arity: Arity,
    pub(super) description: Option<String>,
    pub(super) default: Option<ParameterDefault>,
    pub(super) count: Option<CountFn>,
    pub(super) resolver: Resolver,
    _phantom: PhantomData<fn() -> T>,
}

impl<T: Parsable> Parameter<T> {
    fn new(kind: DeclaredKind, meta: Option<String>, short: Option<char>, required: bool) -> Self {
        Self {
            kind,
            meta,
            short,
            long: None,
            required,
            flag: true,
            arity: Arity::default(),
            description: None,
            default: None,
            count: None,
            resolver: Box::new(|registry| Ok(anonymous(registry.resolve::<T>()?))),
            _phantom: PhantomData,
        }
    }

    /// Create a required positional parameter, shown as `meta` in help messages.
    pub fn positional(meta: impl Into<String>) -> Self {
        Self::new(DeclaredKind::Positional, Some(meta.into()), None, true)
    }

    /// Create a required switch, supplied as `-short VALUE`.
    pub fn required_switch(short: char) -> Self {
        Self::new(DeclaredKind::Switch, None, Some(short), true)
    }

    /// Set the long name, supplied as `--long VALUE` or `--long=VALUE`.
    /// Whitespace in the name is replaced by `-`.
    pub fn long(mut self, long: impl Into<String>) -> Self {
        let long: String = long.into();
        let long = long
            .trim()
            .chars()
            .map(|c| if c.is_whitespace() { '-' } else { c })
            .collect();
        self.long = Some(long);
        self
    }

    /// Set the name shown for the parameter's value in help messages.
    /// A switch otherwise shows its long name, or else its short name.
    pub fn meta(mut self, meta: impl Into<String>) -> Self {
        self.meta = Some(meta.into());
        self
    }

    /// Document the parameter in help messages.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Require the parameter to be supplied.
    pub fn required(mut self) -> Self {
        self.required = true;
        self.default = None;
        self
    }

    /// Enable or disable flag mode (enabled by default).
    /// Only switches over `bool` are affected: in flag mode they take no value.
    pub fn flag(mut self, enabled: bool) -> Self {
        self.flag = enabled;
        self
    }

    /// Parse the parameter with `parser` instead of the registry's parser for `T`.
    pub fn parser(mut self, parser: impl ParameterParser<T> + 'static) -> Self {
        let parser: Arc<dyn ParameterParser<T>> = Arc::new(parser);
        self.resolver = Box::new(move |_| Ok(anonymous(parser)));
        self
    }

    pub(super) fn is_flag(&self) -> bool {
        self.kind == DeclaredKind::Switch && self.flag && TypeId::of::<T>() == TypeId::of::<bool>()
    }

    pub(super) fn declared_kind(&self) -> ParameterKind {
        match self.kind {
            DeclaredKind::Positional => ParameterKind::Positional,
            DeclaredKind::Switch if self.is_flag() => ParameterKind::Flag,
            DeclaredKind::Switch => ParameterKind::Switch,
        }
    }
}

impl<T: Parsable + Default> Parameter<T> {
    /// Create an optional switch, supplied as `-short VALUE`.
    /// When omitted it takes `T::default()`.
    pub fn switch(short: char) -> Self {
        Self::new(DeclaredKind::Switch, None, Some(short), true).optional()
    }

    /// Make the parameter optional.
    /// When omitted it takes `T::default()`.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self.default = Some(ParameterDefault::Value(Arc::new(|| Value::new(T::default()))));
        self
    }

    /// Make the parameter optional, defaulting to `text` parsed as a `T`.
    /// When `text` does not parse the parameter takes `T::default()`.
    pub fn default_raw(mut self, text: impl Into<String>) -> Self {
        self.required = false;
        self.default = Some(ParameterDefault::Raw {
            text: text.into(),
            zero: Arc::new(|| Value::new(T::default())),
        });
        self
    }
}

impl<T: Parsable + Clone + Send + Sync> Parameter<T> {
    /// Make the parameter optional, defaulting to `value`.
    pub fn default_value(mut self, value: T) -> Self {
        self.required = false;
        self.default = Some(ParameterDefault::Value(Arc::new(move || {
            Value::new(value.clone())
        })));
        self
    }
}

impl<T: Parsable + ElementCount> Parameter<T> {
    /// Require at least `min` elements.
    pub fn min(mut self, min: usize) -> Self {
        self.arity.min = Some(min);
        self.count = Some(Self::counter());
        self
    }

    /// Require at most `max` elements.
    pub fn max(mut self, max: usize) -> Self {
        self.arity.max = Some(max);
        self.count = Some(Self::counter());
        self
    }

    fn counter() -> CountFn {
        Arc::new(|value: &Value| value.downcast_ref::<T>().map(ElementCount::element_count))
    }
}

impl Parameter<bool> {
    /// Create an optional flag, supplied as `-short`.
    pub fn flag_switch(short: char) -> Self {
        Self::switch(short)
    }
}

// The typed parameter, erased once added to a grammar builder.
pub(super) struct ParameterInner {
    pub(super) kind: ParameterKind,
    pub(super) meta: String,
    pub(super) short: Option<char>,
    pub(super) long: Option<String>,
    pub(super) required: bool,
    pub(super) arity: Arity,
    pub(super) description: Option<String>,
    pub(super) default: Option<ParameterDefault>,
    pub(super) count: Option<CountFn>,
    pub(super) resolver: Resolver,
}

impl<T: Parsable> From<Parameter<T>> for ParameterInner {
    fn from(parameter: Parameter<T>) -> Self {
        let kind = parameter.declared_kind();
        let meta = match (&parameter.meta, &parameter.long, &parameter.short) {
            (Some(meta), _, _) => meta.trim().to_string(),
            (None, Some(long), _) => long.clone(),
            (None, None, Some(short)) => short.to_string(),
            (None, None, None) => String::default(),
        };

        Self {
            kind,
            meta,
            short: parameter.short,
            long: parameter.long,
            required: parameter.required,
            arity: parameter.arity,
            description: parameter.description,
            default: parameter.default,
            count: parameter.count,
            resolver: parameter.resolver,
        }
    }
}

impl<T> std::fmt::Debug for Parameter<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match (&self.kind, &self.meta, &self.short, &self.long) {
            (DeclaredKind::Positional, Some(meta), _, _) => meta.clone(),
            (_, _, Some(short), Some(long)) => format!("-{short}, --{long}"),
            (_, _, Some(short), None) => format!("-{short}"),
            _ => "?".to_string(),
        };
        let required = if self.required { "required" } else { "optional" };

        write!(
            f,
            "{kind:?}[{t}, {name}, {required}]",
            kind = self.kind,
            t = std::any::type_name::<T>(),
        )
    }
}
