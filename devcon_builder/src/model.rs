/// How a parameter is supplied in the argument text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterKind {
    /// Identified by order: `value`.
    Positional,
    /// Introduced by a dash and followed by a value: `-n 5`, `--count=5`.
    Switch,
    /// A dashed boolean set by its presence alone: `-v`, `--verbose`.
    Flag,
}

impl std::fmt::Display for ParameterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParameterKind::Positional => write!(f, "positional"),
            ParameterKind::Switch => write!(f, "switch"),
            ParameterKind::Flag => write!(f, "flag"),
        }
    }
}

/// The permitted element count of a container parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Arity {
    /// The fewest elements allowed.
    pub min: Option<usize>,
    /// The most elements allowed.
    pub max: Option<usize>,
}

impl Arity {
    /// Whether the arity constrains anything.
    pub fn is_bounded(&self) -> bool {
        self.min.is_some() || self.max.is_some()
    }

    /// Whether `count` elements are permitted.
    pub fn permits(&self, count: usize) -> bool {
        self.min.map_or(true, |min| count >= min) && self.max.map_or(true, |max| count <= max)
    }

    /// The arity in prose, for help messages.
    pub fn describe(&self) -> Option<String> {
        match (self.min, self.max) {
            (None, None) => None,
            (Some(0), Some(0)) => Some("May not contain any elements".to_string()),
            (Some(min), Some(max)) if min == max => Some(format!(
                "May contain {min} and only {min} {}",
                plural(min, "element")
            )),
            (Some(min), Some(max)) => Some(format!("May have between {min} and {max} elements")),
            (Some(min), None) => Some(format!(
                "Must have at least {min} {}",
                plural(min, "element")
            )),
            (None, Some(max)) => Some(format!(
                "Can have at most {max} {}",
                plural(max, "element")
            )),
        }
    }
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        noun.to_string()
    } else {
        format!("{noun}s")
    }
}
