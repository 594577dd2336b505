mod shell;

use std::io::{BufWriter, stdin, stdout};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use matchup_game::GameConfig;

use shell::Shell;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable summary on the console
    Console,
    /// Machine-readable JSON summary
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "matchup", version)]
#[command(about = "CLI for matchup-based voting games")]
struct Args {
    /// Path to the game configuration (YAML)
    config: PathBuf,

    /// Format for the end-of-game summary
    #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
    report: ReportFormat,

    /// Seed for deterministic tiebreak shuffling
    #[arg(long)]
    seed: Option<u64>,

    /// Verbose output (debug-level logging)
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let mut builder = env_logger::Builder::from_default_env();
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = GameConfig::from_path(&args.config).with_context(|| {
        format!(
            "failed to load game configuration from {}",
            args.config.display()
        )
    })?;
    log::info!("starting shell for game {:?}", config.name);

    let seed = args.seed.unwrap_or_else(rand::random);
    let stdin = stdin();
    let out = BufWriter::new(stdout());
    let mut shell = Shell::new(&config, args.report, seed, stdin.lock(), out);
    shell.run()
}
