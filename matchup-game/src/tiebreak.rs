//! Tiebreak resolution.
//!
//! When a round vote ties, the deck deals an unrelated question: its
//! shuffled answers each stand in for one tied option, and the players
//! vote on the answers instead. Once the deck runs out, ties fall back
//! to a random pick. Resolution is deterministic for a fixed seed.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::config::TiebreakQuestion;

/// A tiebreak ready to present: a question whose shuffled answers each
/// stand in for one tied option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TiebreakVote {
    pub prompt: String,
    pub answers: Vec<String>,
    to_option: Vec<usize>,
}

impl TiebreakVote {
    /// Map a picked answer index back to the tied option it stands for.
    #[must_use]
    pub fn option_for_answer(&self, answer_index: usize) -> Option<usize> {
        self.to_option.get(answer_index).copied()
    }
}

/// How the deck proposes to resolve one tie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TieResolution {
    /// Put a tiebreak question to a vote.
    Vote(TiebreakVote),
    /// Deck exhausted: this tied option index wins outright.
    Random(usize),
}

/// A once-shuffled deck of tiebreak questions for a single play-through.
#[derive(Debug)]
pub struct TiebreakDeck {
    questions: Vec<TiebreakQuestion>,
    rng: ChaCha20Rng,
}

impl TiebreakDeck {
    /// Shuffle `questions` into a fresh deck seeded with `seed`.
    #[must_use]
    pub fn new(questions: &[TiebreakQuestion], seed: u64) -> Self {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let mut questions = questions.to_vec();
        questions.shuffle(&mut rng);
        Self { questions, rng }
    }

    /// Number of questions still available.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.questions.len()
    }

    /// Deal a resolution for the options in `tied` (0-based indices into
    /// the round's options; at least two).
    ///
    /// While questions remain this is a [`TieResolution::Vote`] whose
    /// answers map one-to-one onto `tied` (surplus answers are dropped;
    /// with fewer answers than tied options only the covered options stay
    /// reachable, matching the question's breadth). Afterwards it is a
    /// [`TieResolution::Random`] pick among `tied`.
    pub fn next_resolution(&mut self, tied: &[usize]) -> TieResolution {
        debug_assert!(tied.len() >= 2, "a tie needs at least two options");
        if let Some(question) = self.questions.pop() {
            let mut answers = question.answers;
            answers.shuffle(&mut self.rng);
            answers.truncate(tied.len());
            let to_option = tied.iter().copied().take(answers.len()).collect();
            log::debug!("tiebreak via question {:?}", question.prompt);
            TieResolution::Vote(TiebreakVote {
                prompt: question.prompt,
                answers,
                to_option,
            })
        } else {
            let index = tied[self.rng.gen_range(0..tied.len())];
            log::debug!("tiebreak deck empty, random pick: option {index}");
            TieResolution::Random(index)
        }
    }
}
