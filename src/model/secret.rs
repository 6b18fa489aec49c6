use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::model::Symbol;

/// A candidate hidden code: one symbol per position.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Secret(Vec<Symbol>);

impl Secret {
    pub fn new(symbols: Vec<Symbol>) -> Self {
        Self(symbols)
    }

    pub fn parse(s: &str) -> Self {
        Self(Symbol::sequence(s))
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, symbol: Symbol) -> bool {
        self.0.contains(&symbol)
    }
}

impl From<Vec<Symbol>> for Secret {
    fn from(symbols: Vec<Symbol>) -> Self {
        Self(symbols)
    }
}

impl std::fmt::Display for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.iter().join(""))
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_and_json() {
        let secret = Secret::parse("BA");
        assert_eq!(secret.to_string(), "BA");
        assert_eq!(serde_json::to_string(&secret).unwrap(), "[\"B\",\"A\"]");
    }
}
