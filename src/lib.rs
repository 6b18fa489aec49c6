//! Deduce every secret code consistent with a set of Mastermind-style clues.
//!
//! Clues are translated into a 0/1 linear model ([`solver::build_model`]) and
//! a [`solver::SolutionEnumerator`] pulls satisfying assignments out of it one
//! at a time, blocking each one before asking for the next.
//!
//! ```no_run
//! use codebreaker::game::{parse_clue_file, ClueConvention};
//! use codebreaker::solver::enumerate_secrets;
//!
//! let clues = parse_clue_file("ABCD 1 2\nBADC 0 0\n", ClueConvention::WhitePegs, "#")?;
//! for secret in enumerate_secrets(&clues)? {
//!     println!("{}", secret?);
//! }
//! # Ok::<(), codebreaker::error::CodebreakerError>(())
//! ```

pub mod error;
pub mod game;
pub mod model;
pub mod solver;

pub use error::{CodebreakerError, Result};
