use std::collections::BTreeSet;
use std::fmt::Debug;

use itertools::Itertools;

use crate::error::{CodebreakerError, Result};
use crate::model::{Secret, Symbol};

/// One observed guess together with its two scores.
///
/// `total_matches` counts the distinct symbol values of the guess that appear
/// anywhere in the secret. A symbol repeated in the guess is counted once, no
/// matter how often it occurs in the secret. This is a set count, not the
/// multiset intersection used by classic Mastermind scoring, and clue files
/// are scored under this convention.
///
/// `exact_matches` counts positions where guess and secret hold the same symbol.
#[derive(Clone, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct Clue {
    pub guess: Vec<Symbol>,
    pub total_matches: usize,
    pub exact_matches: usize,
}

impl Clue {
    pub fn new(guess: Vec<Symbol>, total_matches: usize, exact_matches: usize) -> Self {
        Self {
            guess,
            total_matches,
            exact_matches,
        }
    }

    /// Parse a clue of the form "ABCD 3 1" (guess, total matches, exact matches).
    #[cfg(test)]
    pub fn parse(s: &str) -> Self {
        let mut parts = s.split_whitespace();
        let guess = Symbol::sequence(parts.next().unwrap());
        let total_matches = parts.next().unwrap().parse().unwrap();
        let exact_matches = parts.next().unwrap().parse().unwrap();
        Self::new(guess, total_matches, exact_matches)
    }

    pub fn len(&self) -> usize {
        self.guess.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guess.is_empty()
    }

    pub fn guess_string(&self) -> String {
        self.guess.iter().join("")
    }

    /// Distinct symbol values of the guess, each listed once.
    pub fn distinct_symbols(&self) -> BTreeSet<Symbol> {
        self.guess.iter().copied().collect()
    }

    /// Check the clue against the code length it is expected to have.
    pub fn validate(&self, code_length: usize) -> Result<()> {
        if self.guess.len() != code_length {
            return Err(CodebreakerError::invalid_input(format!(
                "clue {:?} has {} symbols, expected {}",
                self,
                self.guess.len(),
                code_length
            )));
        }
        if self.exact_matches > self.total_matches {
            return Err(CodebreakerError::invalid_input(format!(
                "clue {:?} has more exact matches than total matches",
                self
            )));
        }
        if self.total_matches > code_length {
            return Err(CodebreakerError::invalid_input(format!(
                "clue {:?} has more total matches than positions",
                self
            )));
        }
        Ok(())
    }

    /// Score a secret against this guess, returning `(total_matches, exact_matches)`.
    pub fn score(&self, secret: &Secret) -> (usize, usize) {
        let total = self
            .distinct_symbols()
            .into_iter()
            .filter(|symbol| secret.contains(*symbol))
            .count();
        let exact = self
            .guess
            .iter()
            .zip(secret.symbols())
            .filter(|(a, b)| a == b)
            .count();
        (total, exact)
    }

    pub fn is_satisfied_by(&self, secret: &Secret) -> bool {
        secret.len() == self.guess.len()
            && self.score(secret) == (self.total_matches, self.exact_matches)
    }
}

impl Debug for Clue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} total={} exact={}",
            self.guess_string(),
            self.total_matches,
            self.exact_matches
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_counts_distinct_symbols_once() {
        let clue = Clue::parse("AAB 1 0");
        // A repeated in the guess still only counts once.
        assert_eq!(clue.score(&Secret::parse("CCA")), (1, 0));
        assert_eq!(clue.score(&Secret::parse("AAA")), (1, 2));
        assert_eq!(clue.score(&Secret::parse("BAC")), (2, 1));
    }

    #[test]
    fn test_is_satisfied_by() {
        let clue = Clue::parse("AB 2 1");
        assert!(!clue.is_satisfied_by(&Secret::parse("AB")));
        assert!(!clue.is_satisfied_by(&Secret::parse("BA")));
        let clue = Clue::parse("AB 2 0");
        assert!(clue.is_satisfied_by(&Secret::parse("BA")));
        assert!(!clue.is_satisfied_by(&Secret::parse("BAA")));
    }

    #[test]
    fn test_validate() {
        assert!(Clue::parse("111 1 3").validate(3).unwrap_err().is_invalid_input());
        assert!(Clue::parse("12 1 1").validate(3).unwrap_err().is_invalid_input());
        assert!(Clue::parse("12 3 1").validate(2).unwrap_err().is_invalid_input());
        assert!(Clue::parse("123 2 1").validate(3).is_ok());
    }
}
