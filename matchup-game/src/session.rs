//! Per-play session state machine.
//!
//! A session is one complete pass through a configuration's rounds. The
//! cursor starts at zero, advances once per recorded winner, and the
//! session is complete when the cursor reaches the round count. A result
//! exists for every round index below the cursor.

use serde::Serialize;
use thiserror::Error;

use crate::config::{GameConfig, Round};

/// Errors raised while recording winners against a session.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("{option:?} is not one of the current round's options")]
    InvalidSelection { option: String },
    #[error("option {index} is out of range for the current round")]
    IndexOutOfRange { index: usize },
    #[error("all rounds are already complete")]
    Complete,
}

/// Where a session stands in its pass through the rounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    InProgress,
    Complete,
}

/// One line of the end-of-game summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundResult {
    pub prompt: String,
    pub winner: String,
}

/// Drives one complete pass through all rounds of a configuration.
#[derive(Debug)]
pub struct GameSession<'a> {
    config: &'a GameConfig,
    cursor: usize,
    results: Vec<usize>,
}

impl<'a> GameSession<'a> {
    /// Start a fresh session: cursor at zero, no results.
    #[must_use]
    pub const fn new(config: &'a GameConfig) -> Self {
        Self {
            config,
            cursor: 0,
            results: Vec::new(),
        }
    }

    /// The round at the cursor, or `None` once every round is complete.
    #[must_use]
    pub fn current_round(&self) -> Option<&'a Round> {
        self.config.rounds.get(self.cursor)
    }

    /// True once the cursor has passed the final round.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.cursor == self.config.rounds.len()
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        if self.is_complete() {
            SessionPhase::Complete
        } else {
            SessionPhase::InProgress
        }
    }

    /// Number of rounds with a recorded winner.
    #[must_use]
    pub fn rounds_played(&self) -> usize {
        self.cursor
    }

    /// Record `option` as the current round's winner and advance.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Complete`] when the session is terminal and
    /// [`SessionError::InvalidSelection`] when `option` is not among the
    /// current round's options; the cursor is unchanged in both cases.
    pub fn record_winner(&mut self, option: &str) -> Result<(), SessionError> {
        let round = self.current_round().ok_or(SessionError::Complete)?;
        let index = round
            .options
            .iter()
            .position(|candidate| candidate == option)
            .ok_or_else(|| SessionError::InvalidSelection {
                option: option.to_string(),
            })?;
        self.advance(index);
        Ok(())
    }

    /// Record the current round's winner by option index and advance.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Complete`] when the session is terminal and
    /// [`SessionError::IndexOutOfRange`] when `index` does not name one of
    /// the current round's options.
    pub fn record_winner_index(&mut self, index: usize) -> Result<(), SessionError> {
        let round = self.current_round().ok_or(SessionError::Complete)?;
        if index >= round.options.len() {
            return Err(SessionError::IndexOutOfRange { index });
        }
        self.advance(index);
        Ok(())
    }

    fn advance(&mut self, winner: usize) {
        log::debug!(
            "round {} winner: {:?}",
            self.cursor + 1,
            self.config.rounds[self.cursor].options[winner]
        );
        self.results.push(winner);
        self.cursor += 1;
    }

    /// The `(prompt, winner)` pairs for every round, `Some` iff complete.
    #[must_use]
    pub fn summary(&self) -> Option<Vec<RoundResult>> {
        if !self.is_complete() {
            return None;
        }
        Some(
            self.config
                .rounds
                .iter()
                .zip(&self.results)
                .map(|(round, &winner)| RoundResult {
                    prompt: round.prompt.clone(),
                    winner: round.options[winner].clone(),
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fruit_config() -> GameConfig {
        GameConfig::from_yaml(
            "
name: Fruit Face-Off
rounds:
  - prompt: Pick a fruit
    options: [apple, banana]
",
        )
        .unwrap()
    }

    fn three_round_config() -> GameConfig {
        GameConfig::from_yaml(
            "
name: Bracket
rounds:
  - prompt: Round one
    options: [a, b]
  - prompt: Round two
    options: [c, d, e]
  - prompt: Round three
    options: [f, g]
",
        )
        .unwrap()
    }

    #[test]
    fn full_pass_records_every_round() {
        let config = three_round_config();
        let mut session = GameSession::new(&config);
        assert_eq!(session.phase(), SessionPhase::InProgress);

        session.record_winner("a").unwrap();
        session.record_winner("e").unwrap();
        session.record_winner("g").unwrap();

        assert!(session.is_complete());
        assert_eq!(session.phase(), SessionPhase::Complete);
        assert_eq!(session.rounds_played(), 3);
        let summary = session.summary().unwrap();
        assert_eq!(summary.len(), 3);
        assert_eq!(summary[1].prompt, "Round two");
        assert_eq!(summary[1].winner, "e");
    }

    #[test]
    fn invalid_selection_leaves_cursor_unchanged() {
        let config = fruit_config();
        let mut session = GameSession::new(&config);

        let err = session.record_winner("cherry").unwrap_err();
        assert_eq!(
            err,
            SessionError::InvalidSelection {
                option: "cherry".to_string()
            }
        );
        assert_eq!(session.rounds_played(), 0);
        assert!(session.current_round().is_some());

        session.record_winner("apple").unwrap();
        assert_eq!(
            session.summary().unwrap(),
            vec![RoundResult {
                prompt: "Pick a fruit".to_string(),
                winner: "apple".to_string()
            }]
        );
    }

    #[test]
    fn summary_is_defined_iff_complete() {
        let config = fruit_config();
        let mut session = GameSession::new(&config);
        assert!(session.summary().is_none());
        session.record_winner("banana").unwrap();
        assert!(session.summary().is_some());
    }

    #[test]
    fn terminal_session_rejects_further_winners() {
        let config = fruit_config();
        let mut session = GameSession::new(&config);
        session.record_winner("banana").unwrap();
        assert!(session.current_round().is_none());
        assert_eq!(session.record_winner("apple"), Err(SessionError::Complete));
        assert_eq!(
            session.record_winner_index(0),
            Err(SessionError::Complete)
        );
    }

    #[test]
    fn winner_index_is_bounds_checked() {
        let config = fruit_config();
        let mut session = GameSession::new(&config);
        assert_eq!(
            session.record_winner_index(2),
            Err(SessionError::IndexOutOfRange { index: 2 })
        );
        session.record_winner_index(1).unwrap();
        assert_eq!(session.summary().unwrap()[0].winner, "banana");
    }

    #[test]
    fn fresh_sessions_are_independent() {
        let config = fruit_config();
        let mut first = GameSession::new(&config);
        first.record_winner("apple").unwrap();

        let mut second = GameSession::new(&config);
        assert_eq!(second.rounds_played(), 0);
        second.record_winner("banana").unwrap();
        assert_eq!(second.summary().unwrap()[0].winner, "banana");
        assert_eq!(first.summary().unwrap()[0].winner, "apple");
    }

    #[test]
    fn summary_serializes_for_reports() {
        let config = fruit_config();
        let mut session = GameSession::new(&config);
        session.record_winner("banana").unwrap();
        let json = serde_json::to_string(&session.summary().unwrap()).unwrap();
        assert_eq!(
            json,
            r#"[{"prompt":"Pick a fruit","winner":"banana"}]"#
        );
    }
}
