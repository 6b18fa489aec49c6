use clap::ValueEnum;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// How the middle column of a clue file line is scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ClueConvention {
    /// Right symbol, wrong place. Total matches is this plus the exact matches.
    #[default]
    WhitePegs,
    /// The column already holds the total matches.
    Total,
}

impl ClueConvention {
    /// `None` if the two columns overflow when added.
    pub fn total_matches(&self, matches: usize, exact_matches: usize) -> Option<usize> {
        match self {
            ClueConvention::WhitePegs => matches.checked_add(exact_matches),
            ClueConvention::Total => Some(matches),
        }
    }

    /// Inverse of `total_matches`: the value to write in the middle column.
    /// `None` if the clue cannot be expressed, i.e. exact exceeds total.
    pub fn matches_column(&self, total_matches: usize, exact_matches: usize) -> Option<usize> {
        match self {
            ClueConvention::WhitePegs => total_matches.checked_sub(exact_matches),
            ClueConvention::Total => Some(total_matches),
        }
    }
}

pub const DEFAULT_MODEL_DUMP: &str = "mastermind_model.lp";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Settings {
    #[serde(default = "default_version")]
    version: u32,

    #[serde(default)]
    pub convention: ClueConvention,

    /// Lines starting with any of these characters are ignored.
    #[serde(default = "default_comment_prefixes")]
    pub comment_prefixes: String,

    #[serde(default)]
    pub node_limit: Option<u64>,

    #[serde(default)]
    pub dump_model: Option<PathBuf>,
}

fn default_version() -> u32 {
    1
}

fn default_comment_prefixes() -> String {
    "!;#".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            version: 1,
            convention: ClueConvention::default(),
            comment_prefixes: default_comment_prefixes(),
            node_limit: None,
            dump_model: None,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file, falling back to defaults when no file
    /// is given or it does not exist, then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = match path {
            Some(path) if path.exists() => {
                let contents = fs::read_to_string(path)?;
                let mut settings = serde_json::from_str::<Settings>(&contents)?;
                settings.migrate();
                settings
            }
            Some(path) => {
                debug!(target: "settings", "No settings at {}, using defaults", path.display());
                Settings::default()
            }
            None => Settings::default(),
        };
        settings.apply_env_overrides();
        Ok(settings)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    fn migrate(&mut self) {
        match self.version {
            0 => {
                self.version = 1;
            }
            _ => (),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Some(limit) = Self::node_limit_from_env() {
            self.node_limit = Some(limit);
        }
        if Self::is_debug_mode() && self.dump_model.is_none() {
            self.dump_model = Some(PathBuf::from(DEFAULT_MODEL_DUMP));
        }
    }

    pub fn is_debug_mode() -> bool {
        std::env::var("DEBUG").map(|v| v == "1").unwrap_or(false)
    }

    pub fn node_limit_from_env() -> Option<u64> {
        let value = std::env::var("NODE_LIMIT").ok()?;
        match value.parse::<u64>() {
            Ok(limit) => Some(limit),
            Err(_) => {
                warn!(target: "settings", "Ignoring NODE_LIMIT={:?}: not a number", value);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("codebreaker-settings-{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn test_conventions() {
        assert_eq!(ClueConvention::WhitePegs.total_matches(1, 2), Some(3));
        assert_eq!(ClueConvention::WhitePegs.total_matches(usize::MAX, 1), None);
        assert_eq!(ClueConvention::Total.total_matches(3, 2), Some(3));
        assert_eq!(ClueConvention::WhitePegs.matches_column(3, 2), Some(1));
        assert_eq!(ClueConvention::WhitePegs.matches_column(1, 2), None);
        assert_eq!(ClueConvention::Total.matches_column(3, 2), Some(3));
    }

    #[test]
    #[serial]
    fn test_missing_file_uses_defaults() {
        std::env::remove_var("DEBUG");
        std::env::remove_var("NODE_LIMIT");
        let settings = Settings::load(Some(&scratch_path("missing.json"))).unwrap();
        assert_eq!(settings.convention, ClueConvention::WhitePegs);
        assert_eq!(settings.comment_prefixes, "!;#");
        assert_eq!(settings.node_limit, None);
        assert_eq!(settings.dump_model, None);
    }

    #[test]
    #[serial]
    fn test_partial_file_and_migration() {
        std::env::remove_var("DEBUG");
        std::env::remove_var("NODE_LIMIT");
        let path = scratch_path("partial.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, r#"{"version": 0, "convention": "total"}"#).unwrap();

        let settings = Settings::load(Some(&path)).unwrap();
        assert_eq!(settings.version(), 1);
        assert_eq!(settings.convention, ClueConvention::Total);
        assert_eq!(settings.comment_prefixes, "!;#");
    }

    #[test]
    #[serial]
    fn test_save_round_trip() {
        std::env::remove_var("DEBUG");
        std::env::remove_var("NODE_LIMIT");
        let path = scratch_path("saved.json");
        let settings = Settings {
            node_limit: Some(500),
            ..Settings::default()
        };
        settings.save(&path).unwrap();
        let loaded = Settings::load(Some(&path)).unwrap();
        assert_eq!(loaded.node_limit, Some(500));
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        std::env::set_var("DEBUG", "1");
        std::env::set_var("NODE_LIMIT", "42");
        let settings = Settings::load(None).unwrap();
        std::env::remove_var("DEBUG");
        std::env::remove_var("NODE_LIMIT");

        assert_eq!(settings.node_limit, Some(42));
        assert_eq!(settings.dump_model, Some(PathBuf::from(DEFAULT_MODEL_DUMP)));
    }

    #[test]
    #[serial]
    fn test_bad_env_is_ignored() {
        std::env::remove_var("DEBUG");
        std::env::set_var("NODE_LIMIT", "lots");
        let settings = Settings::load(None).unwrap();
        std::env::remove_var("NODE_LIMIT");
        assert_eq!(settings.node_limit, None);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let path = scratch_path("broken.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            Settings::load(Some(&path)),
            Err(crate::error::CodebreakerError::Json(_))
        ));
    }
}
