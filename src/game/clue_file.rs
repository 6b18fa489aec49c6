//! Reading and writing clue files.
//!
//! One clue per line: the guess, the matches column, and the exact matches,
//! separated by whitespace. For example, under the white-pegs convention
//!
//! ```text
//! # guess  right-symbol-wrong-place  right-place
//! ABCD 1 2
//! ```
//!
//! scores the guess `ABCD` with three total matches, two of them exact.

use std::fs;
use std::path::Path;

use log::{debug, trace};

use crate::error::{CodebreakerError, Result};
use crate::game::settings::{ClueConvention, Settings};
use crate::model::{Clue, ClueSet, Symbol};

pub fn read_clue_file(path: &Path, settings: &Settings) -> Result<ClueSet> {
    let contents = fs::read_to_string(path)?;
    debug!(target: "clue_file", "Reading clues from {}", path.display());
    parse_clue_file(&contents, settings.convention, &settings.comment_prefixes)
}

pub fn parse_clue_file(
    contents: &str,
    convention: ClueConvention,
    comment_prefixes: &str,
) -> Result<ClueSet> {
    let mut clues = Vec::new();
    for (idx, line) in contents.lines().enumerate() {
        let line = line.trim();
        match line.chars().next() {
            None => continue,
            Some(c) if comment_prefixes.contains(c) => continue,
            Some(_) => {}
        }
        let clue = parse_clue_line(line, convention).map_err(|message| CodebreakerError::Parse {
            line: idx + 1,
            message,
        })?;
        trace!(target: "clue_file", "Line {}: {:?}", idx + 1, clue);
        clues.push(clue);
    }
    ClueSet::new(clues)
}

fn parse_clue_line(line: &str, convention: ClueConvention) -> std::result::Result<Clue, String> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    let [guess, matches, exact] = fields.as_slice() else {
        return Err(format!(
            "expected `<guess> <matches> <exact>`, found {} fields",
            fields.len()
        ));
    };
    let matches: usize = matches
        .parse()
        .map_err(|_| format!("matches {:?} is not a number", matches))?;
    let exact_matches: usize = exact
        .parse()
        .map_err(|_| format!("exact matches {:?} is not a number", exact))?;
    let total_matches = convention
        .total_matches(matches, exact_matches)
        .ok_or_else(|| {
            format!(
                "matches {} plus exact matches {} overflows",
                matches, exact_matches
            )
        })?;
    Ok(Clue::new(Symbol::sequence(guess), total_matches, exact_matches))
}

pub fn format_clue(clue: &Clue, convention: ClueConvention) -> Result<String> {
    let matches = convention
        .matches_column(clue.total_matches, clue.exact_matches)
        .ok_or_else(|| {
            CodebreakerError::invalid_input(format!(
                "clue {:?} has more exact matches than total matches",
                clue
            ))
        })?;
    Ok(format!(
        "{} {} {}",
        clue.guess_string(),
        matches,
        clue.exact_matches
    ))
}

pub fn format_clue_file(clue_set: &ClueSet, convention: ClueConvention) -> Result<String> {
    let header = match convention {
        ClueConvention::WhitePegs => "# guess  wrong-place  right-place",
        ClueConvention::Total => "# guess  total  right-place",
    };
    let mut output = String::from(header);
    output.push('\n');
    for clue in clue_set.clues() {
        output.push_str(&format_clue(clue, convention)?);
        output.push('\n');
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use super::*;

    const SAMPLE: &str = "
        # a comment
        ! another
        ; and another

        ABCD 1 2
        BADC 0 0
    ";

    #[test]
    fn test_white_pegs() {
        let clue_set = parse_clue_file(SAMPLE, ClueConvention::WhitePegs, "!;#").unwrap();
        assert_eq!(clue_set.len(), 2);
        assert_eq!(clue_set.code_length(), 4);
        assert_eq!(clue_set.clues()[0], Clue::parse("ABCD 3 2"));
        assert_eq!(clue_set.clues()[1], Clue::parse("BADC 0 0"));
    }

    #[test]
    fn test_total() {
        let clue_set = parse_clue_file("ABCD 3 2\nBADC 0 0", ClueConvention::Total, "#").unwrap();
        assert_eq!(clue_set.clues()[0], Clue::parse("ABCD 3 2"));
        // exact above total is caught by the clue set
        let err = parse_clue_file("ABCD 1 2", ClueConvention::Total, "#").unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_custom_comment_prefixes() {
        let err = parse_clue_file("; ABCD 1 2\nABCD 1 1", ClueConvention::WhitePegs, "#")
            .unwrap_err();
        assert!(matches!(err, CodebreakerError::Parse { line: 1, .. }));
    }

    #[test]
    fn test_parse_errors() {
        let err = parse_clue_file("ABCD 1\n", ClueConvention::WhitePegs, "#").unwrap_err();
        assert!(matches!(err, CodebreakerError::Parse { line: 1, .. }));

        let err = parse_clue_file("# x\nABCD one 1\n", ClueConvention::WhitePegs, "#").unwrap_err();
        assert!(matches!(err, CodebreakerError::Parse { line: 2, .. }));
        assert_eq!(err.to_string(), "line 2: matches \"one\" is not a number");
    }

    #[test]
    fn test_match_count_overflow() {
        let err = parse_clue_file("AB 18446744073709551615 1\n", ClueConvention::WhitePegs, "#")
            .unwrap_err();
        assert!(matches!(err, CodebreakerError::Parse { line: 1, .. }));

        let err = parse_clue_file("AB 99999999999999999999 1\n", ClueConvention::Total, "#")
            .unwrap_err();
        assert!(matches!(err, CodebreakerError::Parse { line: 1, .. }));
    }

    #[test]
    fn test_requires_clues() {
        let err = parse_clue_file("# only comments\n\n", ClueConvention::WhitePegs, "#").unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_duplicate_guess() {
        let err = parse_clue_file("AB 0 1\nAB 1 0\n", ClueConvention::WhitePegs, "#").unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_format_round_trip() {
        let clue_set = parse_clue_file(SAMPLE, ClueConvention::WhitePegs, "!;#").unwrap();
        for convention in [ClueConvention::WhitePegs, ClueConvention::Total] {
            let text = format_clue_file(&clue_set, convention).unwrap();
            let reparsed = parse_clue_file(&text, convention, "#").unwrap();
            assert_eq!(reparsed.clues(), clue_set.clues());
        }
    }

    #[test]
    fn test_read_sample_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/sample_clues.txt");
        let clue_set = read_clue_file(&path, &Settings::default()).unwrap();
        assert_eq!(clue_set.len(), 5);
        assert_eq!(clue_set.clues()[4], Clue::parse("BADE 2 2"));

        let found: Vec<String> = crate::solver::enumerate_secrets(&clue_set)
            .unwrap()
            .map(|secret| secret.unwrap().to_string())
            .sorted()
            .collect();
        assert_eq!(found, vec!["BCFE", "CAFE"]);
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_clue_file(Path::new("/nonexistent/clues.txt"), &Settings::default())
            .unwrap_err();
        assert!(matches!(err, CodebreakerError::Io(_)));
    }
}
