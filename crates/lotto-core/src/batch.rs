//! Batch runner: many independent simulations of one config
//!
//! Each run is an ordinary single-threaded [`Simulation`](crate::Simulation)
//! with its own seed (`base_seed + run index`); runs share nothing and are
//! spread over the rayon thread pool.

use std::fmt;

use rayon::prelude::*;
use serde::Serialize;

use crate::config::LotteryConfig;
use crate::error::LottoResult;
use crate::simulation::SimulationResults;

/// Raw counters summed over all runs
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchTotals {
    pub runs: u64,
    pub games_played: u64,
    pub money_spent: f64,
    pub money_earned: f64,
    pub top_prize_wins: u64,
    pub runs_in_profit: u64,
    pub best_balance: f64,
    pub worst_balance: f64,
}

impl BatchTotals {
    fn from_results(results: &[SimulationResults]) -> Self {
        let mut totals = Self {
            runs: results.len() as u64,
            best_balance: f64::NEG_INFINITY,
            worst_balance: f64::INFINITY,
            ..Default::default()
        };

        for r in results {
            totals.games_played += r.games_played;
            totals.money_spent += r.money_spent;
            totals.money_earned += r.money_earned;
            totals.top_prize_wins += r.top_prize_wins;
            if r.total_balance > 0.0 {
                totals.runs_in_profit += 1;
            }
            totals.best_balance = totals.best_balance.max(r.total_balance);
            totals.worst_balance = totals.worst_balance.min(r.total_balance);
        }

        if results.is_empty() {
            totals.best_balance = 0.0;
            totals.worst_balance = 0.0;
        }
        totals
    }
}

impl fmt::Display for BatchTotals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "runs: {} ({} in profit)", self.runs, self.runs_in_profit)?;
        writeln!(f, "games played: {}", self.games_played)?;
        writeln!(f, "money spent: {:.2}", self.money_spent)?;
        writeln!(f, "money won: {:.2}", self.money_earned)?;
        writeln!(f, "best balance: {:.2}", self.best_balance)?;
        writeln!(f, "worst balance: {:.2}", self.worst_balance)?;
        write!(f, "won the top prize {} times", self.top_prize_wins)
    }
}

/// Per-run results plus totals
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub base_seed: u64,
    pub runs: Vec<SimulationResults>,
    pub totals: BatchTotals,
}

/// Run `runs` independent simulations of `years` years each
///
/// Seeds start at `config.seed`, or at a random value when unset, so a
/// seeded config reproduces the whole batch. The first failing run aborts the
/// batch.
pub fn run_batch(config: &LotteryConfig, runs: u32, years: u32) -> LottoResult<BatchReport> {
    let base_seed = config.seed.unwrap_or_else(rand::random);
    log::info!(
        "Batch `{}`: {} run(s) x {} year(s), base seed {}",
        config.name,
        runs,
        years,
        base_seed
    );

    let results: Vec<SimulationResults> = (0..runs)
        .into_par_iter()
        .map(|i| {
            let mut sim = config.build_seeded(Some(base_seed.wrapping_add(i as u64)))?;
            sim.simulate_years(years, false)?;
            Ok(sim.results())
        })
        .collect::<LottoResult<Vec<_>>>()?;

    let totals = BatchTotals::from_results(&results);
    Ok(BatchReport {
        base_seed,
        runs: results,
        totals,
    })
}
