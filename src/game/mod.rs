pub mod clue_file;
pub mod clue_generator;
pub mod settings;

pub use clue_file::{format_clue_file, parse_clue_file, read_clue_file};
pub use clue_generator::{generate_clues, GeneratedPuzzle, GeneratorConfig};
pub use settings::{ClueConvention, Settings};
