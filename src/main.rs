use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use log::{info, LevelFilter};
use simplelog::{ColorChoice, TermLogger, TerminalMode};

use sequoia::driver::{self, Config};

/// Builds a sequoia tree from a two-line file of keys: the first line is inserted, the second
/// removed. The tree is written to the output after each phase.
#[derive(Debug, Parser)]
#[command(name = "sequoia", version, about)]
struct Cli {
    /// Keys to insert on line 1, keys to remove on line 2.
    #[arg(long, short, value_name = "FILE", default_value = "input.txt")]
    input: PathBuf,

    /// Receives the tree after inserting and again after removing.
    #[arg(long, short, value_name = "FILE", default_value = "output.txt")]
    output: PathBuf,

    /// Log more. Repeat for rotations.
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        Self {
            input: cli.input,
            output: cli.output,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    TermLogger::init(
        cli.level(),
        simplelog::Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )?;

    let config = Config::from(cli);
    let tree = driver::run(&config)?;
    info!(
        "wrote {} with {} keys left",
        config.output.display(),
        tree.len()
    );
    Ok(())
}
