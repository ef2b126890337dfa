pub(crate) const SEQUENCE_GROUPING: &[(char, char)] = &[('[', ']'), ('(', ')')];
pub(crate) const SET_GROUPING: &[(char, char)] = &[('{', '}')];
pub(crate) const MAP_GROUPING: &[(char, char)] = &[('{', '}')];
pub(crate) const COMPOUND_GROUPING: &[(char, char)] = &[('[', ']'), ('(', ')')];
pub(crate) const SEPARATOR: char = ',';
pub(crate) const KEY_VALUE_SEPARATOR: char = ':';
pub(crate) const BUILTIN_SPECIAL_CHARS: &[char] = &['[', ']', '(', ')', '{', '}', SEPARATOR, KEY_VALUE_SEPARATOR];

pub(crate) const LONG_PREFIX: &str = "--";
pub(crate) const SHORT_PREFIX: char = '-';
pub(crate) const LONG_VALUE_SEPARATOR: char = '=';

pub(crate) const HELP_INDENT: usize = 4;
pub(crate) const HELP_PADDING: usize = 8;
