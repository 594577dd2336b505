//! Ballot parsing for round votes.
//!
//! A ballot is one line of whitespace-separated 1-based option numbers.
//! More than one number means the named options tied and a tiebreak is
//! needed to pick between them.

use thiserror::Error;

/// Errors raised while parsing a ballot line.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BallotError {
    #[error("enter at least one option number")]
    Empty,
    #[error("{token:?} is not an option number")]
    NotANumber { token: String },
    #[error("{number} is out of range (choose 1-{max})")]
    OutOfRange { number: usize, max: usize },
}

/// Parse a ballot line against a round with `option_count` options.
///
/// Returns the picked options as 0-based indices, deduplicated and in the
/// order first mentioned.
///
/// # Errors
///
/// Returns an error when the line holds no numbers, a token is not a
/// number, or a number falls outside `1..=option_count`.
pub fn parse_ballot(line: &str, option_count: usize) -> Result<Vec<usize>, BallotError> {
    let mut picks = Vec::new();
    for token in line.split_whitespace() {
        let number: usize = token.parse().map_err(|_| BallotError::NotANumber {
            token: token.to_string(),
        })?;
        if number == 0 || number > option_count {
            return Err(BallotError::OutOfRange {
                number,
                max: option_count,
            });
        }
        let index = number - 1;
        if !picks.contains(&index) {
            picks.push(index);
        }
    }
    if picks.is_empty() {
        return Err(BallotError::Empty);
    }
    Ok(picks)
}
