use serde::{Deserialize, Serialize};

/// A single peg colour, identified by the character used for it in clue files.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Symbol(pub char);

impl Symbol {
    pub fn new(value: char) -> Self {
        Self(value)
    }

    pub fn value(&self) -> char {
        self.0
    }

    /// Split a guess like "ABCD" into one symbol per character.
    pub fn sequence(s: &str) -> Vec<Symbol> {
        s.chars().map(Symbol).collect()
    }
}

impl From<char> for Symbol {
    fn from(value: char) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Debug for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
