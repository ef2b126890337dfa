use terminal_size::{terminal_size, Width};

use crate::api::{Grammar, ParameterDescriptor};
use crate::constant::*;
use crate::model::ParameterKind;

mod column;

use column::{
    chunk, ColumnRenderer, LeftWidth, MiddleWidth, PaddingWidth, RightWidth, TotalWidth,
    MINIMUM_MIDDLE_WIDTH,
};

/// Renders the usage line and help message of a [`Grammar`].
///
/// A printer either wraps its help message to a fixed width, or never wraps it.
///
/// ### Example
/// ```
/// use devcon_builder::*;
///
/// let registry = ParserRegistry::new();
/// let grammar = GrammarBuilder::new()
///     .add(Parameter::<String>::positional("name").description("Who to greet."))
///     .add(Parameter::<bool>::switch('l').long("loud"))
///     .build(&registry)
///     .unwrap();
///
/// let help = Printer::unbounded().help("greet", Some("Say hello."), &grammar);
/// assert_eq!(
///     help,
///     "usage: greet name [-l]
///
/// Say hello.
///
/// Format:
///     name        String
///
/// Mandatory Parameters:
///     name        Who to greet."
/// );
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Printer {
    width: Option<usize>,
}

impl Printer {
    /// A printer which never wraps.
    pub fn unbounded() -> Self {
        Self { width: None }
    }

    /// A printer which wraps to `width` characters where it can.
    pub fn new(width: usize) -> Self {
        Self { width: Some(width) }
    }

    /// A printer which wraps to the width of the current terminal, or never wraps when there is no terminal.
    pub fn terminal() -> Self {
        let width = if let Some((Width(width), _)) = terminal_size() {
            Some(width as usize)
        } else {
            None
        };

        Self { width }
    }

    /// The width this printer wraps to.
    pub fn width(&self) -> Option<usize> {
        self.width
    }

    /// The one line usage summary: `usage: command REQUIRED [OPTIONAL [..]] -x VALUE [-y]`.
    pub fn usage(&self, command: &str, grammar: &Grammar) -> String {
        let mut summary = vec![format!("usage: {command}")];
        let mut optionals = Vec::default();

        for positional in grammar.positionals() {
            if positional.is_required() {
                summary.push(positional.meta().to_string());
            } else {
                optionals.push(positional.meta());
            }
        }

        let nested = optionals.iter().rev().fold(String::default(), |inner, meta| {
            if inner.is_empty() {
                format!("[{meta}]")
            } else {
                format!("[{meta} {inner}]")
            }
        });

        if !nested.is_empty() {
            summary.push(nested);
        }

        for switch in grammar.switches().filter(|p| p.is_required()) {
            summary.push(switch_usage(switch));
        }

        for switch in grammar.switches().filter(|p| !p.is_required()) {
            summary.push(format!("[{}]", switch_usage(switch)));
        }

        summary.join(" ").trim_end().to_string()
    }

    /// The full help message: the usage line, the description, then the `Format`, `Mandatory Parameters` and `Optional Parameters` sections.
    /// Parameters with neither a description nor an element count bound are not listed, and empty sections are left out.
    /// The first column is aligned across all sections.
    pub fn help(&self, command: &str, description: Option<&str>, grammar: &Grammar) -> String {
        let mut lines = vec![self.usage(command, grammar)];

        if let Some(description) = description.map(str::trim).filter(|d| !d.is_empty()) {
            lines.push(String::default());

            match self.width {
                Some(width) => {
                    lines.extend(chunk(description, std::cmp::max(width, MINIMUM_MIDDLE_WIDTH)))
                }
                None => lines.push(description.to_string()),
            }
        }

        let formats = format_rows(grammar);
        // Parameters with neither a description nor an arity have nothing to show.
        let parameters: Vec<(String, String, bool)> = grammar
            .parameters()
            .iter()
            .map(|p| (p.display_name(), parameter_text(p), p.is_required()))
            .filter(|(_, text, _)| !text.is_empty())
            .collect();
        // One left column across every section.
        let left = formats
            .iter()
            .map(|row| row.0.chars().count())
            .chain(parameters.iter().map(|row| row.0.chars().count()))
            .max()
            .unwrap_or(1);

        if !formats.is_empty() {
            lines.push(String::default());
            lines.push("Format:".to_string());
            let renderer = self.renderer(left, &formats);

            for (names, type_name, template) in &formats {
                let rights: Vec<String> = template.iter().cloned().collect();
                lines.extend(renderer.render(names, type_name, &rights));
            }
        }

        let renderer = self.renderer(
            left,
            &parameters
                .iter()
                .map(|(name, text, _)| (name.clone(), text.clone(), None))
                .collect::<Vec<_>>(),
        );

        for (title, required) in [("Mandatory Parameters:", true), ("Optional Parameters:", false)] {
            let rows: Vec<&(String, String, bool)> =
                parameters.iter().filter(|row| row.2 == required).collect();

            if rows.is_empty() {
                continue;
            }

            lines.push(String::default());
            lines.push(title.to_string());

            for (name, text, _) in rows {
                lines.extend(renderer.render(name, text, &[]));
            }
        }

        lines.join("\n")
    }

    fn renderer(&self, left: usize, rows: &[(String, String, Option<String>)]) -> ColumnRenderer {
        let middle = rows.iter().map(|r| r.1.chars().count()).max().unwrap_or(2);
        let right = rows
            .iter()
            .filter_map(|r| r.2.as_ref().map(|t| t.chars().count()))
            .max();

        let padding = PaddingWidth::new(HELP_PADDING).expect("internal error - padding is non-zero");
        let left = LeftWidth::new(std::cmp::max(left, 1)).expect("internal error - left is non-zero");
        let middle =
            MiddleWidth::new(std::cmp::max(middle, 2)).expect("internal error - middle is at least 2");
        let rights: Vec<RightWidth> = right
            .filter(|width| *width > 0)
            .and_then(|width| RightWidth::new(width).ok())
            .into_iter()
            .collect();

        match self.width {
            Some(width) => {
                ColumnRenderer::guided(HELP_INDENT, padding, left, middle, rights, TotalWidth(width))
            }
            None => ColumnRenderer::new(HELP_INDENT, padding, left, middle, rights),
        }
    }
}

fn switch_usage(switch: &ParameterDescriptor) -> String {
    let name = match switch.short() {
        Some(short) => format!("{SHORT_PREFIX}{short}"),
        None => switch.label(),
    };

    match switch.kind() {
        ParameterKind::Flag => name,
        _ => format!("{name} {}", switch.meta()),
    }
}

// One row per distinct type (flags aside): the metas of its parameters, its name, and its template.
// Templated types come first.
fn format_rows(grammar: &Grammar) -> Vec<(String, String, Option<String>)> {
    let mut groups: Vec<(Vec<&str>, String, Option<String>)> = Vec::default();

    for parameter in grammar
        .parameters()
        .iter()
        .filter(|p| p.kind() != ParameterKind::Flag)
    {
        let type_name = parameter.type_name();

        match groups.iter_mut().find(|(_, name, _)| *name == type_name) {
            Some((metas, _, _)) => metas.push(parameter.meta()),
            None => groups.push((vec![parameter.meta()], type_name, parameter.format())),
        }
    }

    groups.sort_by_key(|(_, _, template)| template.is_none());
    groups
        .into_iter()
        .map(|(metas, type_name, template)| (metas.join(", "), type_name, template))
        .collect()
}

fn parameter_text(parameter: &ParameterDescriptor) -> String {
    let arity = parameter.arity().describe().map(|a| format!("{a}."));

    match (parameter.description(), arity) {
        (Some(description), Some(arity)) => format!("{description} {arity}"),
        (Some(description), None) => description.to_string(),
        (None, Some(arity)) => arity,
        (None, None) => String::default(),
    }
}

/// The argument text with a caret under the character at `offset`.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct ErrorContext {
    offset: usize,
    text: String,
}

impl ErrorContext {
    pub(crate) fn new(offset: usize, text: &str) -> Self {
        Self {
            offset,
            text: text.to_string(),
        }
    }
}

impl std::fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let width = std::cmp::min(self.offset, self.text.chars().count());
        write!(f, "{}\n{:width$}^", self.text, "")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{GrammarBuilder, Parameter};
    use crate::registry::ParserRegistry;
    use rstest::rstest;

    fn sum() -> Grammar {
        GrammarBuilder::new()
            .add(Parameter::<String>::positional("message").description("The text to print."))
            .add(
                Parameter::<Vec<i32>>::positional("items")
                    .optional()
                    .min(1)
                    .description("Values to sum."),
            )
            .add(
                Parameter::<i32>::switch('c')
                    .long("count")
                    .description("How many times."),
            )
            .add(
                Parameter::<bool>::switch('v')
                    .long("verbose")
                    .description("Print more."),
            )
            .add(Parameter::<(f32, f32)>::required_switch('p').long("point"))
            .build(&ParserRegistry::new())
            .unwrap()
    }

    #[test]
    fn usage_empty() {
        // Setup
        let grammar = GrammarBuilder::new().build(&ParserRegistry::new()).unwrap();

        // Execute
        let usage = Printer::unbounded().usage("noop", &grammar);

        // Verify
        assert_eq!(usage, "usage: noop");
    }

    #[test]
    fn usage() {
        // Execute
        let usage = Printer::unbounded().usage("sum", &sum());

        // Verify
        assert_eq!(usage, "usage: sum message [items] -p point [-c count] [-v]");
    }

    #[test]
    fn usage_greet() {
        // Setup
        let grammar = GrammarBuilder::new()
            .add(Parameter::<String>::positional("hello"))
            .add(Parameter::<i32>::positional("5").optional())
            .add(Parameter::<bool>::switch('v'))
            .build(&ParserRegistry::new())
            .unwrap();

        // Execute
        let usage = grammar.usage("greet");

        // Verify
        assert_eq!(usage, "usage: greet hello [5] [-v]");
    }

    #[test]
    fn usage_nested_optionals() {
        // Setup
        let grammar = GrammarBuilder::new()
            .add(Parameter::<u8>::positional("a"))
            .add(Parameter::<u8>::positional("b").optional())
            .add(Parameter::<u8>::positional("c").optional())
            .add(Parameter::<u8>::positional("d").default_value(1))
            .add(Parameter::<bool>::switch('f').required())
            .add(Parameter::<u8>::switch('n').meta("N"))
            .build(&ParserRegistry::new())
            .unwrap();

        // Execute
        let usage = grammar.usage("nest");

        // Verify
        assert_eq!(usage, "usage: nest a [b [c [d]]] -f [-n N]");
    }

    #[test]
    fn help_empty() {
        // Setup
        let grammar = GrammarBuilder::new().build(&ParserRegistry::new()).unwrap();

        // Execute
        let help = Printer::unbounded().help("noop", None, &grammar);

        // Verify
        assert_eq!(help, "usage: noop");
    }

    #[test]
    fn help() {
        // Execute
        let help = Printer::unbounded().help("sum", Some("  Sum some values.  "), &sum());

        // Verify
        assert_eq!(
            help,
            r#"usage: sum message [items] -p point [-c count] [-v]

Sum some values.

Format:
    items                Vec<i32>          [i32 ...]
    point                (f32, f32)        [f32 f32]
    message              String
    count                i32

Mandatory Parameters:
    message              The text to print.

Optional Parameters:
    items                Values to sum. Must have at least 1 element.
    -c, --count          How many times.
    -v, --verbose        Print more."#
        );
    }

    #[test]
    fn help_wrapped() {
        // Setup
        let grammar = GrammarBuilder::new()
            .add(
                Parameter::<Vec<u8>>::positional("bytes")
                    .min(2)
                    .max(4)
                    .description("The bytes to write out to the target device."),
            )
            .build(&ParserRegistry::new())
            .unwrap();

        // Execute
        let help = Printer::new(40).help(
            "write",
            Some("Write bytes to the device under test."),
            &grammar,
        );

        // Verify
        assert_eq!(
            help,
            r#"usage: write bytes

Write bytes to the device under test.

Format:
    bytes        Vec<u8>                  [u8 ...]

Mandatory Parameters:
    bytes        The bytes to write
                 out to the target
                 device. May have
                 between 2 and 4
                 elements."#
        );
    }

    #[test]
    fn help_aligned_across_sections() {
        // Setup
        let grammar = GrammarBuilder::new()
            .add(Parameter::<u8>::positional("n").description("Count."))
            .add(Parameter::<bool>::switch('v').long("verbose").description("Louder."))
            .add(Parameter::<bool>::switch('q'))
            .build(&ParserRegistry::new())
            .unwrap();

        // Execute
        let help = grammar.help("x");

        // Verify
        assert_eq!(
            help,
            format!(
                "usage: x n [-v] [-q]\n\nFormat:\n    n{pad}u8\n\nMandatory Parameters:\n    n{pad}Count.\n\nOptional Parameters:\n    -v, --verbose        Louder.",
                pad = " ".repeat(20)
            )
        );
    }

    #[test]
    fn help_shared_types() {
        // Setup
        let grammar = GrammarBuilder::new()
            .add(Parameter::<u8>::positional("a"))
            .add(Parameter::<u8>::positional("b"))
            .add(Parameter::<u8>::switch('c'))
            .add(Parameter::<bool>::switch('d'))
            .add(Parameter::<bool>::switch('e').flag(false))
            .build(&ParserRegistry::new())
            .unwrap();

        // Execute
        let help = grammar.help("shared");

        // Verify
        assert_eq!(
            help,
            r#"usage: shared a b [-c c] [-d] [-e e]

Format:
    e              bool        t/f
    a, b, c        u8"#
        );
    }

    #[test]
    fn terminal() {
        // Execute
        let printer = Printer::terminal();

        // Verify
        assert_eq!(
            printer.width(),
            terminal_size().map(|(Width(width), _)| width as usize)
        );
    }

    #[rstest]
    #[case(0, "abc", "abc\n^")]
    #[case(2, "abc", "abc\n  ^")]
    #[case(3, "abc", "abc\n   ^")]
    #[case(9, "abc", "abc\n   ^")]
    #[case(1, "äbc", "äbc\n ^")]
    fn error_context(#[case] offset: usize, #[case] text: &str, #[case] expected: &str) {
        assert_eq!(ErrorContext::new(offset, text).to_string(), expected);
    }
}
