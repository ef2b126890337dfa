//! A command table for an in-application console.
//!
//! Each registered command pairs a [`Grammar`] with a handler.
//! [`Console::execute`] splits a line into the command name and its argument text, parses the argument text, and invokes the handler.
//! Commands may instead take their argument text unparsed ([`Console::register_raw`]), or dispatch on a verb (`git push`, `git pull`) through [`Console::register_verbs`].
//!
//! ### Example
//! ```
//! use devcon::console::Console;
//! use devcon::{GrammarBuilder, Parameter};
//!
//! let mut console = Console::new();
//! let grammar = GrammarBuilder::new()
//!     .add(Parameter::<String>::positional("name"))
//!     .build(console.registry())
//!     .unwrap();
//! console
//!     .register("greet", "Greet someone.", grammar, |mut arguments| {
//!         Ok(format!("Hello, {}!", arguments.take::<String>(0)?))
//!     })
//!     .unwrap();
//! console
//!     .register_raw("echo", "Repeat the text.", |text| text.to_string())
//!     .unwrap();
//!
//! assert_eq!(console.execute("greet world").unwrap(), "Hello, world!");
//! assert_eq!(
//!     console.execute("greet").unwrap_err().to_string(),
//!     "usage: greet name\nTry 'help greet' for more information."
//! );
//! assert_eq!(console.execute("echo  [not parsed").unwrap(), "[not parsed");
//! ```
//!
//! ### Verbs
//! ```
//! use devcon::console::Console;
//! use devcon::{GrammarBuilder, Parameter};
//!
//! let mut console = Console::new();
//! console.register_verbs("layer", "Manage layers.").unwrap();
//! let grammar = GrammarBuilder::new()
//!     .add(Parameter::<String>::positional("name"))
//!     .build(console.registry())
//!     .unwrap();
//! console
//!     .register_verb("layer", "add", "Add a layer.", grammar, |mut arguments| {
//!         Ok(format!("Added {}.", arguments.take::<String>(0)?))
//!     })
//!     .unwrap();
//!
//! assert_eq!(console.execute("layer add sky").unwrap(), "Added sky.");
//! assert_eq!(
//!     console.execute("layer drop sky").unwrap_err().to_string(),
//!     "'layer': no such verb 'drop'.\nPossible subcommands are:\n    * layer add"
//! );
//! ```
use std::collections::BTreeMap;

use devcon_builder::{
    ArgumentError, Arguments, ConfigError, Grammar, GrammarBuilder, Parameter, ParseError,
    ParserRegistry, Printer,
};
use thiserror::Error;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

const HELP: &str = "help";
const HELP_DESCRIPTION: &str = "Show the commands, or the help of one command.";
const INDENT: usize = 4;
const PADDING: usize = 8;

/// A command whose grammar is declared by its type, typically via [`derive::Command`](crate::derive::Command).
pub trait Command: Sized {
    /// Build the grammar of the command.
    fn grammar(registry: &ParserRegistry) -> Result<Grammar, ConfigError>;

    /// Build the command from the arguments its grammar parsed.
    fn from_arguments(arguments: Arguments) -> Result<Self, ArgumentError>;
}

/// An error changing the command table.
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// The command name is empty or contains whitespace.
    #[error("Console error: invalid command name '{0}'.")]
    InvalidName(String),

    /// The command name is already registered.
    #[error("Console error: command '{0}' is already registered.")]
    DuplicateCommand(String),

    /// No command is registered under the name.
    #[error("Console error: no command '{0}' is registered.")]
    UnknownCommand(String),

    /// The command was not registered with [`Console::register_verbs`].
    #[error("Console error: command '{0}' does not take verbs.")]
    NotVerbCommand(String),

    /// The verb command has no such verb.
    #[error("Console error: command '{command}' has no verb '{verb}'.")]
    UnknownVerb {
        /// The command name.
        command: String,
        /// The verb name.
        verb: String,
    },

    /// The command grammar is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// An error executing a command line.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExecuteError {
    /// No command is registered under the name.
    #[error("Unknown command '{0}'")]
    UnknownCommand(String),

    /// The verb command has no such verb.
    #[error("'{command}': no such verb '{verb}'.{}", possible_verbs(.command, .verbs))]
    UnknownVerb {
        /// The command name.
        command: String,
        /// The verb as given.
        verb: String,
        /// The verbs the command does have, ordered by name.
        verbs: Vec<String>,
    },

    /// The argument text does not match the command grammar.
    #[error("{usage}\nTry 'help {name}' for more information.")]
    Usage {
        /// The command name, followed by the verb for verb commands.
        name: String,
        /// The usage summary of the command.
        usage: String,
        /// The parse failure.
        #[source]
        error: ParseError,
    },

    /// The handler could not take its arguments.
    #[error(transparent)]
    Arguments(#[from] ArgumentError),
}

impl ExecuteError {
    /// The parse failure, if any, rendered against the argument text with a caret under the failure position.
    pub fn context(&self, line: &str) -> Option<String> {
        match self {
            ExecuteError::Usage { name, error, .. } => {
                // Skip the command name, and the verb when there is one.
                let arguments = name
                    .split(' ')
                    .fold(line, |rest, _| split(rest).map_or("", |(_, rest)| rest));
                Some(error.context(arguments))
            }
            _ => None,
        }
    }
}

fn possible_verbs(command: &str, verbs: &[String]) -> String {
    if verbs.is_empty() {
        return String::default();
    }

    let mut listing = "\nPossible subcommands are:".to_string();

    for verb in verbs {
        listing.push_str(&format!("\n    * {command} {verb}"));
    }

    listing
}

type Handler = Box<dyn FnMut(Arguments) -> Result<String, ArgumentError> + Send>;
type RawHandler = Box<dyn FnMut(&str) -> String + Send>;

enum Action {
    Parsed { grammar: Grammar, handler: Handler },
    Raw(RawHandler),
    Verbs(BTreeMap<String, Entry>),
}

struct Entry {
    description: String,
    action: Action,
}

impl Entry {
    fn parsed(
        description: String,
        grammar: Grammar,
        handler: impl FnMut(Arguments) -> Result<String, ArgumentError> + Send + 'static,
    ) -> Self {
        Self {
            description,
            action: Action::Parsed {
                grammar,
                handler: Box::new(handler),
            },
        }
    }

    fn raw(description: String, handler: impl FnMut(&str) -> String + Send + 'static) -> Self {
        Self {
            description,
            action: Action::Raw(Box::new(handler)),
        }
    }

    fn usage(&self, printer: &Printer, name: &str) -> String {
        match &self.action {
            Action::Parsed { grammar, .. } => printer.usage(name, grammar),
            Action::Raw(_) => format!("usage: {name} ..."),
            Action::Verbs(_) => format!("usage: {name} VERB ..."),
        }
    }

    fn help(&self, printer: &Printer, name: &str) -> String {
        if let Action::Parsed { grammar, .. } = &self.action {
            return printer.help(name, Some(&self.description), grammar);
        }

        let mut lines = vec![self.usage(printer, name)];
        let description = self.description.trim();

        if !description.is_empty() {
            lines.push(String::default());
            lines.push(description.to_string());
        }

        if let Action::Verbs(verbs) = &self.action {
            if !verbs.is_empty() {
                lines.push(String::default());
                lines.push(table(
                    "Verbs:",
                    verbs
                        .iter()
                        .map(|(verb, entry)| (verb.as_str(), entry.description.as_str()))
                        .collect(),
                ));
            }
        }

        lines.join("\n")
    }

    // Verbs do not nest: a verb entry is always parsed or raw.
    fn invoke(&mut self, printer: &Printer, name: &str, text: &str) -> Result<String, ExecuteError> {
        match &mut self.action {
            Action::Parsed { grammar, handler } => match grammar.parse(text) {
                Ok(arguments) => Ok(handler(arguments)?),
                Err(error) => {
                    #[cfg(feature = "tracing_debug")]
                    {
                        debug!("Command '{name}' rejected '{text}': {error}");
                    }

                    Err(ExecuteError::Usage {
                        name: name.to_string(),
                        usage: printer.usage(name, grammar),
                        error,
                    })
                }
            },
            Action::Raw(handler) => Ok(handler(text.trim())),
            Action::Verbs(verbs) => {
                let (verb, text) = match split(text) {
                    Some(parts) => parts,
                    None => return Ok(self.help(printer, name)),
                };
                let verb = verb.to_lowercase();

                match verbs.get_mut(&verb) {
                    Some(entry) => entry.invoke(printer, &format!("{name} {verb}"), text),
                    None => Err(ExecuteError::UnknownVerb {
                        command: name.to_string(),
                        verb,
                        verbs: verbs.keys().cloned().collect(),
                    }),
                }
            }
        }
    }
}

/// The command table of a developer console.
///
/// Command and verb names are case insensitive.
/// The `help` command is built in: `help` lists the commands, `help <name> [verb]` shows the full help of one command.
pub struct Console {
    registry: ParserRegistry,
    printer: Printer,
    help: Grammar,
    commands: BTreeMap<String, Entry>,
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}

impl Console {
    /// Create an empty console with its own parser registry.
    pub fn new() -> Self {
        Self::with_registry(ParserRegistry::new())
    }

    /// Create an empty console that builds grammars from `registry`.
    pub fn with_registry(registry: ParserRegistry) -> Self {
        let help = GrammarBuilder::new()
            .add(Parameter::<String>::positional("command").optional())
            .add(Parameter::<String>::positional("verb").optional())
            .build(&registry)
            .expect("internal error - the help grammar must build");

        Self {
            registry,
            printer: Printer::unbounded(),
            help,
            commands: BTreeMap::default(),
        }
    }

    /// Use `printer` for help messages.
    pub fn printer(mut self, printer: Printer) -> Self {
        self.printer = printer;
        self
    }

    /// The parser registry commands are built from.
    pub fn registry(&self) -> &ParserRegistry {
        &self.registry
    }

    /// Register a command under `name`.
    ///
    /// The name is trimmed and lower-cased.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        grammar: Grammar,
        handler: impl FnMut(Arguments) -> Result<String, ArgumentError> + Send + 'static,
    ) -> Result<(), ConsoleError> {
        #[cfg(feature = "tracing_debug")]
        {
            debug!("Registering grammar {grammar:?}.");
        }

        self.insert(name.into(), Entry::parsed(description.into(), grammar, handler))
    }

    /// Register the [`Command`] `C` under `name`.
    pub fn register_command<C: Command + 'static>(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        mut handler: impl FnMut(C) -> String + Send + 'static,
    ) -> Result<(), ConsoleError> {
        let grammar = C::grammar(&self.registry)?;
        self.register(name, description, grammar, move |arguments| {
            Ok(handler(C::from_arguments(arguments)?))
        })
    }

    /// Register a command under `name` whose handler receives the argument text unparsed, trimmed.
    pub fn register_raw(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        handler: impl FnMut(&str) -> String + Send + 'static,
    ) -> Result<(), ConsoleError> {
        self.insert(name.into(), Entry::raw(description.into(), handler))
    }

    /// Register a command under `name` which dispatches on its first word, the verb.
    ///
    /// Add verbs with [`Console::register_verb`] and [`Console::register_raw_verb`].
    /// Executing the command without a verb shows its help.
    pub fn register_verbs(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<(), ConsoleError> {
        self.insert(
            name.into(),
            Entry {
                description: description.into(),
                action: Action::Verbs(BTreeMap::default()),
            },
        )
    }

    /// Register the verb `verb` of the verb command `command`.
    pub fn register_verb(
        &mut self,
        command: &str,
        verb: impl Into<String>,
        description: impl Into<String>,
        grammar: Grammar,
        handler: impl FnMut(Arguments) -> Result<String, ArgumentError> + Send + 'static,
    ) -> Result<(), ConsoleError> {
        self.insert_verb(
            command,
            verb.into(),
            Entry::parsed(description.into(), grammar, handler),
        )
    }

    /// Register the [`Command`] `C` as the verb `verb` of the verb command `command`.
    pub fn register_verb_command<C: Command + 'static>(
        &mut self,
        command: &str,
        verb: impl Into<String>,
        description: impl Into<String>,
        mut handler: impl FnMut(C) -> String + Send + 'static,
    ) -> Result<(), ConsoleError> {
        let grammar = C::grammar(&self.registry)?;
        self.register_verb(command, verb, description, grammar, move |arguments| {
            Ok(handler(C::from_arguments(arguments)?))
        })
    }

    /// Register the verb `verb` of the verb command `command`, whose handler receives the argument text unparsed, trimmed.
    pub fn register_raw_verb(
        &mut self,
        command: &str,
        verb: impl Into<String>,
        description: impl Into<String>,
        handler: impl FnMut(&str) -> String + Send + 'static,
    ) -> Result<(), ConsoleError> {
        self.insert_verb(command, verb.into(), Entry::raw(description.into(), handler))
    }

    /// Remove the command `name`.
    pub fn unregister(&mut self, name: &str) -> Result<(), ConsoleError> {
        let name = name.trim().to_lowercase();

        match self.commands.remove(&name) {
            Some(_) => Ok(()),
            None => Err(ConsoleError::UnknownCommand(name)),
        }
    }

    /// Remove the verb `verb` from the verb command `command`.
    pub fn unregister_verb(&mut self, command: &str, verb: &str) -> Result<(), ConsoleError> {
        let (command, verbs) = self.verbs_mut(command)?;
        let verb = verb.trim().to_lowercase();

        match verbs.remove(&verb) {
            Some(_) => Ok(()),
            None => Err(ConsoleError::UnknownVerb { command, verb }),
        }
    }

    /// The registered commands and their descriptions, ordered by name.
    pub fn commands(&self) -> impl Iterator<Item = (&str, &str)> {
        self.commands
            .iter()
            .map(|(name, entry)| (name.as_str(), entry.description.as_str()))
    }

    /// The verbs of the verb command `command` and their descriptions, ordered by name.
    pub fn verbs(&self, command: &str) -> Option<Vec<(&str, &str)>> {
        match self.commands.get(&command.trim().to_lowercase()) {
            Some(Entry {
                action: Action::Verbs(verbs),
                ..
            }) => Some(
                verbs
                    .iter()
                    .map(|(verb, entry)| (verb.as_str(), entry.description.as_str()))
                    .collect(),
            ),
            _ => None,
        }
    }

    /// The usage summary of the command `name`.
    pub fn usage(&self, name: &str) -> Option<String> {
        let name = name.trim().to_lowercase();

        if name == HELP {
            return Some(self.printer.usage(HELP, &self.help));
        }

        self.commands
            .get(&name)
            .map(|entry| entry.usage(&self.printer, &name))
    }

    /// Execute one command line, returning the command output.
    ///
    /// A blank line does nothing.
    pub fn execute(&mut self, line: &str) -> Result<String, ExecuteError> {
        let (name, text) = match split(line) {
            Some(parts) => parts,
            None => return Ok(String::default()),
        };
        let name = name.to_lowercase();

        if name == HELP {
            let mut arguments = self.help.parse(text).map_err(|error| ExecuteError::Usage {
                name: HELP.to_string(),
                usage: self.printer.usage(HELP, &self.help),
                error,
            })?;
            let command = arguments.take::<String>(0)?;
            let verb = arguments.take::<String>(1)?;
            return self.help_text(&command, &verb);
        }

        match self.commands.get_mut(&name) {
            Some(entry) => entry.invoke(&self.printer, &name, text),
            None => {
                #[cfg(feature = "tracing_debug")]
                {
                    debug!("Unknown command '{name}'.");
                }

                Err(ExecuteError::UnknownCommand(name))
            }
        }
    }

    fn insert(&mut self, name: String, entry: Entry) -> Result<(), ConsoleError> {
        let name = normalize(name)?;

        if name == HELP || self.commands.contains_key(&name) {
            return Err(ConsoleError::DuplicateCommand(name));
        }

        #[cfg(feature = "tracing_debug")]
        {
            debug!("Registering command '{name}'.");
        }

        self.commands.insert(name, entry);
        Ok(())
    }

    fn insert_verb(&mut self, command: &str, verb: String, entry: Entry) -> Result<(), ConsoleError> {
        let verb = normalize(verb)?;
        let (command, verbs) = self.verbs_mut(command)?;

        if verbs.contains_key(&verb) {
            return Err(ConsoleError::DuplicateCommand(format!("{command} {verb}")));
        }

        #[cfg(feature = "tracing_debug")]
        {
            debug!("Registering verb '{command} {verb}'.");
        }

        verbs.insert(verb, entry);
        Ok(())
    }

    fn verbs_mut(
        &mut self,
        command: &str,
    ) -> Result<(String, &mut BTreeMap<String, Entry>), ConsoleError> {
        let command = command.trim().to_lowercase();

        match self.commands.get_mut(&command) {
            Some(Entry {
                action: Action::Verbs(verbs),
                ..
            }) => Ok((command, verbs)),
            Some(_) => Err(ConsoleError::NotVerbCommand(command)),
            None => Err(ConsoleError::UnknownCommand(command)),
        }
    }

    fn help_text(&self, command: &str, verb: &str) -> Result<String, ExecuteError> {
        let command = command.trim().to_lowercase();
        let verb = verb.trim().to_lowercase();

        if command.is_empty() {
            let mut rows = vec![(HELP, HELP_DESCRIPTION)];
            rows.extend(self.commands());
            rows.sort();
            return Ok(table("Commands:", rows));
        }

        if command == HELP {
            return Ok(self
                .printer
                .help(HELP, Some(HELP_DESCRIPTION), &self.help));
        }

        let entry = match self.commands.get(&command) {
            Some(entry) => entry,
            None => return Err(ExecuteError::UnknownCommand(command)),
        };

        if verb.is_empty() {
            return Ok(entry.help(&self.printer, &command));
        }

        let verbs = match &entry.action {
            Action::Verbs(verbs) => Some(verbs),
            _ => None,
        };

        match verbs.and_then(|verbs| verbs.get(&verb)) {
            Some(inner) => Ok(inner.help(&self.printer, &format!("{command} {verb}"))),
            None => Err(ExecuteError::UnknownVerb {
                verbs: verbs
                    .map(|verbs| verbs.keys().cloned().collect())
                    .unwrap_or_default(),
                command,
                verb,
            }),
        }
    }
}

// A titled two column listing, names padded to the longest name.
fn table(title: &str, rows: Vec<(&str, &str)>) -> String {
    let width = rows
        .iter()
        .map(|(name, _)| name.chars().count())
        .max()
        .unwrap_or_default();
    let mut lines = vec![title.to_string()];

    for (name, description) in rows {
        let line = format!(
            "{:indent$}{name:width$}{:padding$}{description}",
            "",
            "",
            indent = INDENT,
            padding = PADDING
        );
        lines.push(line.trim_end().to_string());
    }

    lines.join("\n")
}

fn normalize(name: String) -> Result<String, ConsoleError> {
    let normalized = name.trim().to_lowercase();

    if normalized.is_empty() || normalized.chars().any(char::is_whitespace) {
        Err(ConsoleError::InvalidName(name))
    } else {
        Ok(normalized)
    }
}

/// Split a line into its first word and the text after it.
fn split(line: &str) -> Option<(&str, &str)> {
    let line = line.trim_start();

    if line.trim_end().is_empty() {
        return None;
    }

    match line.find(char::is_whitespace) {
        Some(index) => Some((&line[..index], &line[index..])),
        None => Some((line, "")),
    }
}
