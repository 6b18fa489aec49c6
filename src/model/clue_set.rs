use std::collections::BTreeSet;

use itertools::Itertools;
use log::{trace, warn};

use crate::error::{CodebreakerError, Result};
use crate::model::{Alphabet, Clue, Secret, Symbol};

/// A validated collection of clues sharing one code length.
///
/// Clues are keyed by their guess: the same guess may only be scored once.
#[derive(Debug, Clone)]
pub struct ClueSet {
    clues: Vec<Clue>,
    alphabet: Alphabet,
    code_length: usize,
}

impl ClueSet {
    pub fn new(clues: Vec<Clue>) -> Result<Self> {
        let Some(first) = clues.first() else {
            return Err(CodebreakerError::invalid_input("at least one clue is required"));
        };
        let code_length = first.len();
        if code_length == 0 {
            return Err(CodebreakerError::invalid_input("clues must have at least one symbol"));
        }

        let mut seen: BTreeSet<&[Symbol]> = BTreeSet::new();
        for clue in clues.iter() {
            clue.validate(code_length)?;
            if !seen.insert(&clue.guess) {
                return Err(CodebreakerError::invalid_input(format!(
                    "guess {} appears more than once",
                    clue.guess_string()
                )));
            }
            let distinct = clue.distinct_symbols().len();
            if clue.total_matches > distinct {
                warn!(
                    target: "clue_set",
                    "Clue {:?} claims more total matches than it has distinct symbols ({}); no secret can satisfy it",
                    clue,
                    distinct
                );
            }
        }

        let alphabet = Alphabet::new(clues.iter().flat_map(|clue| clue.guess.iter().copied()));
        trace!(
            target: "clue_set",
            "Clue set of {} clues, code length {}, alphabet {}",
            clues.len(),
            code_length,
            alphabet
        );

        Ok(Self {
            clues,
            alphabet,
            code_length,
        })
    }

    #[cfg(test)]
    pub fn parse(lines: &[&str]) -> Self {
        Self::new(lines.iter().map(|line| Clue::parse(line)).collect()).unwrap()
    }

    pub fn clues(&self) -> &[Clue] {
        &self.clues
    }

    pub fn len(&self) -> usize {
        self.clues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clues.is_empty()
    }

    /// All symbols observed across the guesses.
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    pub fn code_length(&self) -> usize {
        self.code_length
    }

    pub fn is_consistent(&self, secret: &Secret) -> bool {
        self.clues.iter().all(|clue| clue.is_satisfied_by(secret))
    }

    /// Every consistent secret, found by scoring all `|alphabet|^code_length`
    /// candidates. Only practical for small puzzles; useful as a cross-check.
    pub fn brute_force_secrets(&self) -> Vec<Secret> {
        (0..self.code_length)
            .map(|_| self.alphabet.iter())
            .multi_cartesian_product()
            .map(Secret::new)
            .filter(|secret| self.is_consistent(secret))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derives_alphabet_and_length() {
        let clue_set = ClueSet::parse(&["ABC 2 1", "CDD 1 0"]);
        assert_eq!(clue_set.code_length(), 3);
        assert_eq!(clue_set.alphabet().to_string(), "{A,B,C,D}");
        assert_eq!(clue_set.len(), 2);
    }

    #[test]
    fn test_rejects_empty() {
        let err = ClueSet::new(vec![]).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_rejects_duplicate_guess() {
        let err = ClueSet::new(vec![Clue::parse("AB 1 0"), Clue::parse("AB 2 0")]).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_rejects_mismatched_length() {
        let err = ClueSet::new(vec![Clue::parse("AB 1 0"), Clue::parse("ABC 1 0")]).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_rejects_exact_above_total() {
        let err = ClueSet::new(vec![Clue::parse("111 1 3")]).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_brute_force() {
        let clue_set = ClueSet::parse(&["AB 2 0"]);
        assert_eq!(clue_set.brute_force_secrets(), vec![Secret::parse("BA")]);

        let clue_set = ClueSet::parse(&["AB 2 1"]);
        assert!(clue_set.brute_force_secrets().is_empty());

        let clue_set = ClueSet::parse(&["AB 1 1"]);
        // A in place with no B, or B in place with no A.
        assert_eq!(
            clue_set.brute_force_secrets(),
            vec![Secret::parse("AA"), Secret::parse("BB")]
        );
    }
}
