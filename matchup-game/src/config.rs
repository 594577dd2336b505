//! Game configuration loading and validation.
//!
//! The external contract is a YAML document:
//!
//! ```yaml
//! name: Fruit Face-Off
//! text:
//!   welcome: "Welcome!"
//!   instructions: "Vote by number."
//!   console_prompt: "matchup"
//! rounds:
//!   - prompt: Pick a fruit
//!     options: [apple, banana]
//! tiebreakers:
//!   - prompt: "Cats or dogs?"
//!     answers: [cats, dogs]
//! ```
//!
//! `text` and `tiebreakers` are optional. Every round needs at least two
//! unique options; every tiebreaker needs at least two answers.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or validating a game configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("configuration is not valid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("configuration must contain at least one round")]
    NoRounds,
    #[error("round {round} ({prompt:?}) needs at least two options")]
    NotEnoughOptions { round: usize, prompt: String },
    #[error("round {round} lists option {option:?} more than once")]
    DuplicateOption { round: usize, option: String },
    #[error("tiebreaker {prompt:?} needs at least two answers")]
    BadTiebreaker { prompt: String },
}

/// Presentation strings shown by the shell. All optional in the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameText {
    #[serde(default = "GameText::default_welcome")]
    pub welcome: String,
    #[serde(default = "GameText::default_instructions")]
    pub instructions: String,
    #[serde(default = "GameText::default_console_prompt")]
    pub console_prompt: String,
}

impl GameText {
    fn default_welcome() -> String {
        "Welcome to Matchup!".to_string()
    }

    fn default_instructions() -> String {
        "Each round lists its options by number. Argue, then vote.".to_string()
    }

    fn default_console_prompt() -> String {
        "matchup".to_string()
    }
}

impl Default for GameText {
    fn default() -> Self {
        Self {
            welcome: Self::default_welcome(),
            instructions: Self::default_instructions(),
            console_prompt: Self::default_console_prompt(),
        }
    }
}

/// One comparison unit: a prompt and the options competing under it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    pub prompt: String,
    pub options: Vec<String>,
}

/// An unrelated question used to break ties. Its shuffled answers are
/// mapped onto the tied options and voted on in place of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TiebreakQuestion {
    pub prompt: String,
    pub answers: Vec<String>,
}

/// A complete game definition, immutable after load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub name: String,
    #[serde(default)]
    pub text: GameText,
    pub rounds: Vec<Round>,
    #[serde(default)]
    pub tiebreakers: Vec<TiebreakQuestion>,
}

impl GameConfig {
    /// Load and validate a game configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid YAML, or
    /// violates a configuration invariant.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&raw)
    }

    /// Parse and validate a game configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid YAML or violates a
    /// configuration invariant.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        log::debug!(
            "loaded game {:?} with {} rounds and {} tiebreakers",
            config.name,
            config.rounds.len(),
            config.tiebreakers.len()
        );
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.rounds.is_empty() {
            return Err(ConfigError::NoRounds);
        }
        for (index, round) in self.rounds.iter().enumerate() {
            if round.options.len() < 2 {
                return Err(ConfigError::NotEnoughOptions {
                    round: index + 1,
                    prompt: round.prompt.clone(),
                });
            }
            let mut seen = HashSet::new();
            for option in &round.options {
                if !seen.insert(option.as_str()) {
                    return Err(ConfigError::DuplicateOption {
                        round: index + 1,
                        option: option.clone(),
                    });
                }
            }
        }
        for tiebreaker in &self.tiebreakers {
            if tiebreaker.answers.len() < 2 {
                return Err(ConfigError::BadTiebreaker {
                    prompt: tiebreaker.prompt.clone(),
                });
            }
        }
        Ok(())
    }
}
