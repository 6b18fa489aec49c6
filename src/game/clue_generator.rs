use std::collections::BTreeSet;

use log::{info, trace};
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

use crate::error::{CodebreakerError, Result};
use crate::model::{Clue, ClueSet, Secret, Symbol};
use crate::solver::enumerate_secrets;

pub const MAX_CLUES: usize = 64;

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub code_length: usize,
    pub symbols: Vec<Symbol>,
    /// Stop adding clues once this many have been generated, unique or not.
    pub max_clues: usize,
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            code_length: 4,
            symbols: Symbol::sequence("ABCDEF"),
            max_clues: 12,
            seed: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GeneratedPuzzle {
    pub secret: Secret,
    pub clue_set: ClueSet,
    pub seed: u64,
    /// Whether the clues pin down the secret.
    pub unique: bool,
}

/// Repeated or unscorable guesses tolerated before giving up.
const MAX_SKIPPED_GUESSES: usize = 10_000;

/// Pick a random secret and score random guesses against it until the clues
/// leave exactly one candidate, or `max_clues` is reached.
///
/// Until every symbol has appeared in some guess, guesses are drawn from the
/// symbols not seen yet, so the alphabet derived from the clues always
/// contains the secret's symbols. A guess that repeats a symbol can score more
/// exact than total matches, since the total counts each distinct symbol
/// once. Such a guess is not a valid clue and is skipped.
pub fn generate_clues(config: &GeneratorConfig) -> Result<GeneratedPuzzle> {
    let mut symbols = config.symbols.clone();
    symbols.sort();
    symbols.dedup();
    if symbols.is_empty() || config.code_length == 0 {
        return Err(CodebreakerError::invalid_input(
            "puzzles need at least one symbol and one position",
        ));
    }
    if symbols.len() == 1 && config.code_length > 1 {
        return Err(CodebreakerError::invalid_input(
            "a single symbol repeated over several positions cannot be scored",
        ));
    }
    let covering = symbols.len().div_ceil(config.code_length);
    if config.max_clues < covering || config.max_clues > MAX_CLUES {
        return Err(CodebreakerError::invalid_input(format!(
            "max clues must be between {} and {}",
            covering, MAX_CLUES
        )));
    }

    let seed = config.seed.unwrap_or_else(rand::random);
    let mut rng = StdRng::seed_from_u64(seed);

    let secret = Secret::new(random_guess(&symbols, config.code_length, &mut rng));
    trace!(target: "clue_generator", "Seed {} secret {}", seed, secret);

    let mut clues: Vec<Clue> = Vec::new();
    let mut unseen: BTreeSet<Symbol> = symbols.iter().copied().collect();
    let mut skipped = 0;
    loop {
        let guess = if unseen.is_empty() {
            random_guess(&symbols, config.code_length, &mut rng)
        } else {
            covering_guess(&unseen, &symbols, config.code_length, &mut rng)
        };
        let unscored = Clue::new(guess, 0, 0);
        let (total_matches, exact_matches) = unscored.score(&secret);
        let clue = Clue::new(unscored.guess, total_matches, exact_matches);
        let repeated = clues.iter().any(|other| other.guess == clue.guess);
        if repeated || exact_matches > total_matches {
            trace!(target: "clue_generator", "Skipping guess {:?}", clue);
            skipped += 1;
            if skipped > MAX_SKIPPED_GUESSES {
                return Err(CodebreakerError::invalid_input(format!(
                    "ran out of new scorable guesses for secret {} (seed {})",
                    secret, seed
                )));
            }
            continue;
        }
        for symbol in clue.guess.iter() {
            unseen.remove(symbol);
        }
        clues.push(clue);
        trace!(target: "clue_generator", "Added clue {:?}", clues.last());

        if !unseen.is_empty() {
            continue;
        }
        let clue_set = ClueSet::new(clues.clone())?;
        let candidates = enumerate_secrets(&clue_set)?.take(2).collect::<Result<Vec<_>>>()?;
        let unique = candidates.len() == 1;
        if unique || clues.len() >= config.max_clues {
            info!(
                target: "clue_generator",
                "Generated {} clues (seed {}, unique: {})",
                clue_set.len(),
                seed,
                unique
            );
            return Ok(GeneratedPuzzle {
                secret,
                clue_set,
                seed,
                unique,
            });
        }
    }
}

/// A guess using as many unseen symbols as fit, padded first with other
/// distinct symbols and only then with repeats.
fn covering_guess(
    unseen: &BTreeSet<Symbol>,
    symbols: &[Symbol],
    code_length: usize,
    rng: &mut StdRng,
) -> Vec<Symbol> {
    let mut fresh: Vec<Symbol> = unseen.iter().copied().collect();
    fresh.shuffle(rng);
    let mut seen: Vec<Symbol> = symbols
        .iter()
        .copied()
        .filter(|symbol| !unseen.contains(symbol))
        .collect();
    seen.shuffle(rng);

    let mut guess: Vec<Symbol> = fresh.into_iter().chain(seen).take(code_length).collect();
    while guess.len() < code_length {
        guess.push(symbols[rng.random_range(0..symbols.len())]);
    }
    guess.shuffle(rng);
    guess
}

fn random_guess(symbols: &[Symbol], code_length: usize, rng: &mut StdRng) -> Vec<Symbol> {
    (0..code_length)
        .map(|_| symbols[rng.random_range(0..symbols.len())])
        .collect()
}
