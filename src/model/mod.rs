mod alphabet;
mod clue;
mod clue_set;
mod secret;
mod symbol;

pub use alphabet::Alphabet;
pub use clue::Clue;
pub use clue_set::ClueSet;
pub use secret::Secret;
pub use symbol::Symbol;
