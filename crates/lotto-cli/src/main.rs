//! lottosim: long-run lottery simulator
//!
//! Usage:
//!   lottosim --preset lotto-6-49 years 10          - Play ten years
//!   lottosim --config my.yaml until-won 1          - Play until the top prize is won
//!   lottosim --preset euro-5-plus-2 batch 100 20   - 100 independent 20-year runs
//!   lottosim --preset pick3 show-config            - Print the resolved config

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

use lotto_core::{GuessInput, LotteryConfig, PRESET_NAMES, SimulationResults, StrategySpec, Value, run_batch};

#[derive(Parser)]
#[command(name = "lottosim", about = "Estimate long-run outcomes of playing a lottery")]
struct Cli {
    /// Lottery config file (.json, .yaml or .yml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Built-in lottery, used when no config file is given
    #[arg(short, long, global = true, default_value = "lotto-6-49")]
    preset: String,

    /// Seed for reproducible runs
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Override rounds played per week
    #[arg(long, global = true)]
    rounds_per_week: Option<u32>,

    /// Fixed numbers: sections split by `;`, values by `,` (e.g. "1,2,3,4,5;6,7")
    #[arg(short, long, global = true, conflicts_with_all = ["quick_pick", "every_round"])]
    guess: Option<String>,

    /// One random pick for the whole run
    #[arg(long, global = true, conflicts_with = "every_round")]
    quick_pick: bool,

    /// A new random pick every round
    #[arg(long, global = true)]
    every_round: bool,

    /// Log a snapshot after every simulated year
    #[arg(long, global = true)]
    log_yearly: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a number of years
    Years {
        years: u32,
    },
    /// Simulate whole years until the top prize was won often enough
    UntilWon {
        #[arg(default_value_t = 1)]
        wins: u64,
        /// Give up after this many years
        #[arg(long)]
        max_years: Option<u64>,
    },
    /// Run many independent simulations in parallel
    Batch {
        runs: u32,
        years: u32,
    },
    /// Print the resolved config
    ShowConfig,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.log_yearly { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    let config = resolve_config(&cli)?;
    log::info!("Lottery `{}`, price {}", config.name, config.guess_price);

    match cli.command {
        Commands::Years { years } => {
            let mut sim = config.build().context("Failed to set up lottery")?;
            sim.simulate_years(years, cli.log_yearly)?;
            print_results(&sim.results(), cli.json)
        }
        Commands::UntilWon { wins, max_years } => {
            let mut sim = config.build().context("Failed to set up lottery")?;
            let reached = sim.simulate_until_won_or(wins, cli.log_yearly, |results| {
                max_years.is_some_and(|max| results.years_passed >= max)
            })?;
            if !reached {
                log::warn!("Gave up before winning the top prize {} time(s)", wins);
            }
            print_results(&sim.results(), cli.json)
        }
        Commands::Batch { runs, years } => {
            let report = run_batch(&config, runs, years)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("base seed: {}", report.base_seed);
                println!("{}", report.totals);
            }
            Ok(())
        }
        Commands::ShowConfig => {
            if cli.json {
                println!("{}", config.to_json()?);
            } else {
                print!("{}", config.to_yaml()?);
            }
            Ok(())
        }
    }
}

/// Load the config file or preset and apply command-line overrides
fn resolve_config(cli: &Cli) -> Result<LotteryConfig> {
    let mut config = match &cli.config {
        Some(path) => LotteryConfig::load(path).with_context(|| format!("Failed to load {}", path.display()))?,
        None => LotteryConfig::preset(&cli.preset)
            .with_context(|| format!("Known presets: {}", PRESET_NAMES.join(", ")))?,
    };

    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }
    if let Some(rounds) = cli.rounds_per_week {
        config.rounds_per_week = rounds;
    }
    if let Some(guess) = &cli.guess {
        config.strategy = StrategySpec::Fixed {
            guess: parse_guess(guess)?,
        };
    } else if cli.quick_pick {
        config.strategy = StrategySpec::QuickPick;
    } else if cli.every_round {
        config.strategy = StrategySpec::QuickPickEveryRound;
    }

    Ok(config)
}

/// "1,2,3;4,5" → sectioned, "1,2,3,4,5" → flat
fn parse_guess(text: &str) -> Result<GuessInput> {
    let sections: Vec<Vec<Value>> = text
        .split(';')
        .map(|section| {
            section
                .split(',')
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(|v| v.parse::<i64>().map(Value::Int).unwrap_or_else(|_| Value::from(v)))
                .collect()
        })
        .collect();

    if sections.iter().any(Vec::is_empty) {
        bail!("Guess `{}` has an empty section", text);
    }

    Ok(match <[Vec<Value>; 1]>::try_from(sections) {
        Ok([flat]) => GuessInput::Flat(flat),
        Err(sections) => GuessInput::Sectioned(sections),
    })
}

fn print_results(results: &SimulationResults, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(results)?);
    } else {
        println!("{}", results);
    }
    Ok(())
}
