use thiserror::Error;

/// Error for cursor operations that step outside the unconsumed input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CursorError {
    /// Indexed beyond the unconsumed input.
    #[error("Index {index} is outside the remaining input of length {length}.")]
    Index {
        /// The requested index.
        index: usize,
        /// The remaining length at the time of the request.
        length: usize,
    },

    /// Claimed more characters than remain.
    #[error("Cannot claim {count} characters from the remaining input of length {length}.")]
    Range {
        /// The requested claim.
        count: usize,
        /// The remaining length at the time of the request.
        length: usize,
    },
}

/// A consumable view over one line of raw argument text.
///
/// Every parser operates on an `ArgumentInput`, claiming characters from its front as it recognizes them.
/// Claimed characters are never given back, so the remaining length only shrinks during a parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentInput {
    characters: Vec<char>,
    position: usize,
}

impl ArgumentInput {
    /// Create an input over the text.
    pub fn new(text: impl AsRef<str>) -> Self {
        Self {
            characters: text.as_ref().chars().collect(),
            position: 0,
        }
    }

    /// The number of unconsumed characters.
    pub fn len(&self) -> usize {
        self.characters.len() - self.position
    }

    /// Whether the input has been fully consumed.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The number of characters consumed so far.
    pub fn offset(&self) -> usize {
        self.position
    }

    /// The unconsumed character at `index`.
    pub fn at(&self, index: usize) -> Result<char, CursorError> {
        self.peek(index).ok_or(CursorError::Index {
            index,
            length: self.len(),
        })
    }

    /// The unconsumed character at `index`, if there is one.
    pub fn peek(&self, index: usize) -> Option<char> {
        self.characters.get(self.position + index).copied()
    }

    /// Consume `count` characters from the front.
    pub fn claim(&mut self, count: usize) -> Result<(), CursorError> {
        if count > self.len() {
            return Err(CursorError::Range {
                count,
                length: self.len(),
            });
        }

        self.position += count;
        Ok(())
    }

    /// Consume and return the front character.
    pub fn next_char(&mut self) -> Option<char> {
        let character = self.peek(0)?;
        self.position += 1;
        Some(character)
    }

    /// Whether the unconsumed input begins with `literal`.
    /// Nothing is consumed.
    pub fn matches(&self, literal: &str) -> bool {
        let mut index = 0;

        for expected in literal.chars() {
            match self.peek(index) {
                Some(actual) if actual == expected => index += 1,
                _ => return false,
            }
        }

        true
    }

    /// Whether the front character is whitespace, or the input is exhausted.
    pub fn at_boundary(&self) -> bool {
        self.peek(0).map_or(true, char::is_whitespace)
    }

    /// Consume leading whitespace.
    pub fn trim_whitespace(&mut self) {
        while self.peek(0).map_or(false, char::is_whitespace) {
            self.position += 1;
        }
    }
}

impl std::fmt::Display for ArgumentInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let remaining: String = self.characters[self.position..].iter().collect();
        write!(f, "{remaining}")
    }
}
