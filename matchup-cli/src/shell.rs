//! The interactive command shell.
//!
//! A line-oriented read-eval-print loop over three commands: `play`
//! drives one session through every round of the loaded configuration,
//! `help` lists the commands, and `quit` (or end-of-input, anywhere in
//! the loop) leaves the shell. The shell is generic over its input and
//! output streams so tests can feed it scripted lines.

use std::io::{BufRead, Write};
use std::str::FromStr;

use anyhow::Result;
use colored::Colorize;
use matchup_game::{
    GameConfig, GameSession, Round, RoundResult, TieResolution, TiebreakDeck, parse_ballot,
};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::ReportFormat;

/// Shell commands, matched case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Play,
    Help,
    Quit,
}

#[derive(Debug, PartialEq, Eq)]
struct ParseCommandError;

impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "play" => Ok(Self::Play),
            "help" => Ok(Self::Help),
            "quit" => Ok(Self::Quit),
            _ => Err(ParseCommandError),
        }
    }
}

/// The command loop bound to a loaded configuration and I/O streams.
pub struct Shell<'a, I, O> {
    config: &'a GameConfig,
    report: ReportFormat,
    rng: ChaCha20Rng,
    input: I,
    out: O,
}

impl<'a, I: BufRead, O: Write> Shell<'a, I, O> {
    pub fn new(config: &'a GameConfig, report: ReportFormat, seed: u64, input: I, out: O) -> Self {
        Self {
            config,
            report,
            rng: ChaCha20Rng::seed_from_u64(seed),
            input,
            out,
        }
    }

    /// Run the command loop until `quit` or end-of-input.
    ///
    /// # Errors
    ///
    /// Returns an error only when the output stream fails; user mistakes
    /// are reported and re-prompted, never propagated.
    pub fn run(&mut self) -> Result<()> {
        loop {
            self.prompt()?;
            let Some(line) = self.read_line()? else {
                writeln!(self.out)?;
                break;
            };
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match trimmed.parse() {
                Ok(Command::Play) => self.play()?,
                Ok(Command::Help) => self.help()?,
                Ok(Command::Quit) => break,
                Err(ParseCommandError) => {
                    self.alert(&format!("command not recognized: {trimmed}"))?;
                }
            }
        }
        log::debug!("shell loop ended");
        Ok(())
    }

    /// One full pass through the rounds. End-of-input mid-round discards
    /// the session; the loop above then winds down on its next read.
    fn play(&mut self) -> Result<()> {
        let config = self.config;
        self.heading(&config.text.welcome)?;
        writeln!(self.out, "{}", config.text.instructions)?;

        let deck_seed = self.rng.next_u64();
        let mut deck = TiebreakDeck::new(&config.tiebreakers, deck_seed);
        let mut session = GameSession::new(config);

        while let Some(round) = session.current_round() {
            let Some(winner) = self.run_round(round, &mut deck)? else {
                log::debug!("input ended mid-play; session discarded");
                return Ok(());
            };
            session.record_winner_index(winner)?;
        }

        let results = session.summary().unwrap_or_default();
        self.print_summary(&results)?;
        Ok(())
    }

    /// Present one round and collect its winner. `None` means end-of-input.
    fn run_round(&mut self, round: &Round, deck: &mut TiebreakDeck) -> Result<Option<usize>> {
        self.heading(&round.prompt)?;
        self.list(&round.options)?;
        let Some(mut winners) = self.read_ballot(round.options.len())? else {
            return Ok(None);
        };
        while winners.len() > 1 {
            let Some(next) = self.break_tie(&winners, &round.options, deck)? else {
                return Ok(None);
            };
            winners = next;
        }
        let winner = winners[0];
        writeln!(self.out, "{}", format!("{} won", round.options[winner]).green())?;
        Ok(Some(winner))
    }

    /// Resolve one tie through the deck. A further tie on the tiebreak
    /// vote hands back multiple winners for another pass.
    fn break_tie(
        &mut self,
        tied: &[usize],
        options: &[String],
        deck: &mut TiebreakDeck,
    ) -> Result<Option<Vec<usize>>> {
        self.event("Tiebreak!")?;
        match deck.next_resolution(tied) {
            TieResolution::Vote(vote) => {
                writeln!(self.out, "{}", vote.prompt)?;
                self.list(&vote.answers)?;
                let Some(picks) = self.read_ballot(vote.answers.len())? else {
                    return Ok(None);
                };
                let mut winners = Vec::new();
                for pick in picks {
                    if let Some(option) = vote.option_for_answer(pick) {
                        self.event(&format!("  {} > {}", vote.answers[pick], options[option]))?;
                        if !winners.contains(&option) {
                            winners.push(option);
                        }
                    }
                }
                Ok(Some(winners))
            }
            TieResolution::Random(index) => {
                self.event(&format!("Random... {}", options[index]))?;
                Ok(Some(vec![index]))
            }
        }
    }

    /// Prompt for ballots until one parses. `None` means end-of-input.
    fn read_ballot(&mut self, option_count: usize) -> Result<Option<Vec<usize>>> {
        loop {
            write!(self.out, "{} ", "Vote!".red().bold())?;
            self.out.flush()?;
            let Some(line) = self.read_line()? else {
                return Ok(None);
            };
            match parse_ballot(&line, option_count) {
                Ok(picks) => return Ok(Some(picks)),
                Err(err) => self.alert(&err.to_string())?,
            }
        }
    }

    fn print_summary(&mut self, results: &[RoundResult]) -> Result<()> {
        match self.report {
            ReportFormat::Json => {
                let json = serde_json::to_string_pretty(results)?;
                writeln!(self.out, "{json}")?;
            }
            ReportFormat::Console => {
                self.heading("Summary")?;
                for result in results {
                    writeln!(
                        self.out,
                        "  {}: {}",
                        result.prompt,
                        result.winner.as_str().green()
                    )?;
                }
            }
        }
        writeln!(self.out, "Fin")?;
        Ok(())
    }

    fn help(&mut self) -> Result<()> {
        writeln!(self.out, "Commands:")?;
        writeln!(self.out, "  play  - play the game in the loaded configuration")?;
        writeln!(self.out, "  help  - list the recognized commands")?;
        writeln!(self.out, "  quit  - leave the shell")?;
        Ok(())
    }

    fn list(&mut self, items: &[String]) -> Result<()> {
        for (number, item) in items.iter().enumerate() {
            writeln!(self.out, "  {}. {item}", number + 1)?;
        }
        Ok(())
    }

    fn prompt(&mut self) -> Result<()> {
        let tag = format!("<{}>", self.config.text.console_prompt);
        write!(self.out, "{} ", tag.cyan().bold())?;
        self.out.flush()?;
        Ok(())
    }

    fn heading(&mut self, text: &str) -> Result<()> {
        writeln!(self.out, "{}", text.green().bold())?;
        Ok(())
    }

    fn event(&mut self, text: &str) -> Result<()> {
        writeln!(self.out, "{}", text.magenta())?;
        Ok(())
    }

    fn alert(&mut self, text: &str) -> Result<()> {
        writeln!(self.out, "{}", text.red())?;
        Ok(())
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        let bytes = self.input.read_line(&mut line)?;
        if bytes == 0 { Ok(None) } else { Ok(Some(line)) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const FRUIT_YAML: &str = "
name: Fruit Face-Off
rounds:
  - prompt: Pick a fruit
    options: [apple, banana]
";

    const BRACKET_YAML: &str = "
name: Snack Bracket
rounds:
  - prompt: Salty or sweet?
    options: [pretzels, fudge]
  - prompt: Hot or cold?
    options: [soup, ice cream]
tiebreakers:
  - prompt: Cats or dogs?
    answers: [cats, dogs]
";

    fn run_shell(config: &GameConfig, report: ReportFormat, input: &str) -> String {
        colored::control::set_override(false);
        let mut out = Vec::new();
        let mut shell = Shell::new(config, report, 7, Cursor::new(input.to_string()), &mut out);
        shell.run().unwrap();
        String::from_utf8(out).unwrap()
    }

    fn fruit_config() -> GameConfig {
        GameConfig::from_yaml(FRUIT_YAML).unwrap()
    }

    #[test]
    fn commands_parse_case_insensitively() {
        assert_eq!("play".parse(), Ok(Command::Play));
        assert_eq!("HELP".parse(), Ok(Command::Help));
        assert_eq!("Quit".parse(), Ok(Command::Quit));
        assert_eq!("dance".parse::<Command>(), Err(ParseCommandError));
    }

    #[test]
    fn help_lists_the_commands() {
        let config = fruit_config();
        let output = run_shell(&config, ReportFormat::Console, "help\nquit\n");
        assert!(output.contains("Commands:"));
        assert!(output.contains("play"));
        assert!(output.contains("quit"));
    }

    #[test]
    fn immediate_end_of_input_exits_cleanly() {
        let config = fruit_config();
        let output = run_shell(&config, ReportFormat::Console, "");
        assert!(output.contains("<matchup>"));
        assert!(!output.contains("Summary"));
    }

    #[test]
    fn unrecognized_command_reprompts() {
        let config = fruit_config();
        let output = run_shell(&config, ReportFormat::Console, "dance\nquit\n");
        assert!(output.contains("command not recognized: dance"));
    }

    #[test]
    fn empty_lines_are_ignored() {
        let config = fruit_config();
        let output = run_shell(&config, ReportFormat::Console, "\n   \nquit\n");
        assert!(!output.contains("command not recognized"));
    }

    #[test]
    fn play_records_a_winner_and_summarizes() {
        let config = fruit_config();
        let output = run_shell(&config, ReportFormat::Console, "play\n2\nquit\n");
        assert!(output.contains("Pick a fruit"));
        assert!(output.contains("1. apple"));
        assert!(output.contains("2. banana"));
        assert!(output.contains("banana won"));
        assert!(output.contains("Summary"));
        assert!(output.contains("Pick a fruit: banana"));
        assert!(output.contains("Fin"));
    }

    #[test]
    fn invalid_selection_reprompts_the_same_round() {
        let config = fruit_config();
        let output = run_shell(&config, ReportFormat::Console, "play\n9\ncherry\n1\nquit\n");
        assert!(output.contains("9 is out of range (choose 1-2)"));
        assert!(output.contains("\"cherry\" is not an option number"));
        assert!(output.contains("apple won"));
        assert!(output.contains("Pick a fruit: apple"));
    }

    #[test]
    fn end_of_input_mid_play_discards_the_session() {
        let config = fruit_config();
        let output = run_shell(&config, ReportFormat::Console, "play\n");
        assert!(output.contains("Pick a fruit"));
        assert!(!output.contains("Summary"));
        assert!(!output.contains("won"));
    }

    #[test]
    fn play_twice_yields_independent_sessions() {
        let config = fruit_config();
        let output = run_shell(&config, ReportFormat::Console, "play\n1\nplay\n2\nquit\n");
        assert!(output.contains("Pick a fruit: apple"));
        assert!(output.contains("Pick a fruit: banana"));
    }

    #[test]
    fn tied_ballot_runs_a_tiebreak_question() {
        let config = GameConfig::from_yaml(BRACKET_YAML).unwrap();
        let output = run_shell(
            &config,
            ReportFormat::Console,
            "play\n1 2\n1\n1\nquit\n",
        );
        assert!(output.contains("Tiebreak!"));
        assert!(output.contains("Cats or dogs?"));
        assert!(output.contains("won"));
    }

    #[test]
    fn exhausted_deck_falls_back_to_random() {
        let config = fruit_config();
        let output = run_shell(&config, ReportFormat::Console, "play\n1 2\nquit\n");
        assert!(output.contains("Tiebreak!"));
        assert!(output.contains("Random..."));
        assert!(output.contains("won"));
    }

    #[test]
    fn json_report_emits_the_summary_as_json() {
        let config = fruit_config();
        let output = run_shell(&config, ReportFormat::Json, "play\n2\nquit\n");
        assert!(output.contains("\"prompt\": \"Pick a fruit\""));
        assert!(output.contains("\"winner\": \"banana\""));
    }
}
