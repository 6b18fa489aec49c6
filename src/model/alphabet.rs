use std::collections::BTreeSet;

use itertools::Itertools;

use crate::model::Symbol;

/// The ordered set of symbols a secret may use.
///
/// Symbols are kept sorted so that every symbol has a stable index, which the
/// model builder uses to lay out its variables.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Alphabet {
    symbols: Vec<Symbol>,
}

impl Alphabet {
    pub fn new<I: IntoIterator<Item = Symbol>>(symbols: I) -> Self {
        let unique: BTreeSet<Symbol> = symbols.into_iter().collect();
        Self {
            symbols: unique.into_iter().collect(),
        }
    }

    #[cfg(test)]
    pub fn parse(s: &str) -> Self {
        Self::new(Symbol::sequence(s))
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn contains(&self, symbol: Symbol) -> bool {
        self.symbols.binary_search(&symbol).is_ok()
    }

    pub fn index_of(&self, symbol: Symbol) -> Option<usize> {
        self.symbols.binary_search(&symbol).ok()
    }

    pub fn symbol_at(&self, index: usize) -> Option<Symbol> {
        self.symbols.get(index).copied()
    }

    pub fn iter(&self) -> std::iter::Copied<std::slice::Iter<'_, Symbol>> {
        self.symbols.iter().copied()
    }
}

impl std::fmt::Display for Alphabet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{{}}}", self.symbols.iter().join(","))
    }
}

impl std::fmt::Debug for Alphabet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_and_sort() {
        let alphabet = Alphabet::parse("cabca");
        assert_eq!(alphabet.len(), 3);
        assert_eq!(alphabet.to_string(), "{a,b,c}");
        assert_eq!(alphabet.index_of(Symbol('c')), Some(2));
        assert_eq!(alphabet.symbol_at(1), Some(Symbol('b')));
        assert_eq!(alphabet.index_of(Symbol('z')), None);
        assert!(!alphabet.contains(Symbol('z')));
    }
}
