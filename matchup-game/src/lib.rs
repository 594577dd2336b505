//! Matchup Game Engine
//!
//! Platform-agnostic core logic for matchup-based voting games: a YAML
//! configuration describes rounds of competing options, and a session
//! walks through them recording one winner per round. This crate holds
//! the configuration loader, the per-play session state machine, ballot
//! parsing, and tiebreak resolution; terminal I/O lives in the CLI crate.

pub mod ballot;
pub mod config;
pub mod session;
pub mod tiebreak;

// Re-export commonly used types
pub use ballot::{BallotError, parse_ballot};
pub use config::{ConfigError, GameConfig, GameText, Round, TiebreakQuestion};
pub use session::{GameSession, RoundResult, SessionError, SessionPhase};
pub use tiebreak::{TieResolution, TiebreakDeck, TiebreakVote};
