#![deny(clippy::pedantic)]
#![deny(clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]
use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_derive::Args;
use clio::Input;
use lfsr_cli::runner::{describe_taps, read_config, render_value, sequence};
use lfsr_runner::harness::{self, HarnessConfig};
use lfsr_runner::register::LfsrConfig;
use lfsr_runner::state::Direction;
use log::debug;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[clap(flatten)]
    verbose: clap_verbosity_flag::Verbosity,
    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, Args)]
pub struct SequenceArgs {
    /// Register width
    #[arg(long)]
    width: usize,
    /// Shift down, feeding back into the MSB
    #[arg(long)]
    reverse: bool,
    /// Escape the all-ones lock state
    #[arg(long)]
    non_locking: bool,
    #[arg(long, default_value_t = 1)]
    seed: u64,
    /// Number of values to print, the seed included
    #[arg(long, default_value_t = 16)]
    count: usize,
}

#[derive(Clone, Debug, Args)]
pub struct VerifyArgs {
    /// JSON harness configuration, fields left out keep their defaults
    #[arg(long)]
    config: Option<Input>,
    /// Upper bound on widths of the period, mirror and reversibility sweeps
    #[arg(long)]
    max_tested_width: Option<usize>,
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Clone, Debug, Subcommand)]
enum Command {
    /// Print the tap table entry for a width
    Taps { width: usize },
    /// Print the values a register steps through
    Sequence(SequenceArgs),
    /// Run the verification sweep and report every failing case
    Verify(VerifyArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::new()
        .filter_level(cli.verbose.log_level_filter())
        .init();
    match cli.command {
        Command::Taps { width } => println!("{}", describe_taps(width)?),
        Command::Sequence(SequenceArgs {
            width,
            reverse,
            non_locking,
            seed,
            count,
        }) => {
            let config = LfsrConfig {
                width,
                direction: Direction::from(reverse),
                non_locking,
            };
            for value in sequence(config, seed, count)? {
                println!("{}", render_value(value, width));
            }
        }
        Command::Verify(VerifyArgs {
            config,
            max_tested_width,
            seed,
        }) => {
            let mut config = config.map_or_else(|| Ok(HarnessConfig::default()), read_config)?;
            if let Some(max_tested_width) = max_tested_width {
                config = config.with_max_tested_width(max_tested_width);
            }
            if let Some(seed) = seed {
                config.seed = seed;
            }
            debug!("{config:?}");
            let report = harness::run(&config);
            println!("{report}");
            report.ensure_success()?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_is_well_formed() { Cli::command().debug_assert(); }

    #[test]
    fn parses_sequence() {
        let cli = Cli::try_parse_from([
            "lfsr",
            "sequence",
            "--width",
            "5",
            "--reverse",
            "--count",
            "3",
        ])
        .unwrap();
        let args = match cli.command {
            Command::Sequence(args) => args,
            other => panic!("expected sequence, got {other:?}"),
        };
        assert_eq!(args.width, 5);
        assert!(args.reverse);
        assert!(!args.non_locking);
        assert_eq!(args.seed, 1);
        assert_eq!(args.count, 3);
    }

    #[test]
    fn parses_verify_without_config() {
        let cli = Cli::try_parse_from(["lfsr", "-v", "verify", "--max-tested-width", "6"]).unwrap();
        let args = match cli.command {
            Command::Verify(args) => args,
            other => panic!("expected verify, got {other:?}"),
        };
        assert!(args.config.is_none());
        assert_eq!(args.max_tested_width, Some(6));
        assert_eq!(args.seed, None);
    }

    #[test]
    fn taps_needs_a_width() { assert!(Cli::try_parse_from(["lfsr", "taps"]).is_err()); }
}
