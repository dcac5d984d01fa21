//! Simulation driver: weeks, years and aggregate counters
//!
//! ```text
//! simulate_years / simulate_until_won
//!     └── simulate_year   (52 weeks)
//!           └── simulate_week   (rounds_per_week rounds)
//!                 └── LotteryEngine::play_round
//! ```
//!
//! Counters only ever grow, and only through the stepping methods.
//! Engine errors are never caught here; they stop the run.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::draw::{DrawSource, RandomDraws};
use crate::engine::LotteryEngine;
use crate::error::{LottoError, LottoResult};
use crate::player::Player;

pub const WEEKS_PER_YEAR: u32 = 52;

/// How the player's numbers change over a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickStrategy {
    /// Play the same guess every round
    #[default]
    Fixed,
    /// Fresh quick pick before every round
    QuickPickEveryRound,
}

/// Snapshot of a simulation's counters and the player's ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResults {
    pub years_passed: u64,
    pub weeks_passed: u64,
    pub games_played: u64,
    pub money_spent: f64,
    pub money_earned: f64,
    pub total_balance: f64,
    pub top_prize_wins: u64,
}

impl fmt::Display for SimulationResults {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "simulated {} years", self.years_passed)?;
        writeln!(f, "money spent: {:.2}", self.money_spent)?;
        writeln!(f, "money won: {:.2}", self.money_earned)?;
        writeln!(f, "total balance: {:.2}", self.total_balance)?;
        write!(f, "won the top prize {} times", self.top_prize_wins)
    }
}

/// Long-run simulation of one player in one lottery
pub struct Simulation<S: DrawSource = RandomDraws> {
    engine: LotteryEngine<S>,
    player: Player,
    strategy: PickStrategy,
    rounds_per_week: u32,
    years_passed: u64,
    weeks_passed: u64,
    games_played: u64,
    top_prize_wins: u64,
}

impl<S: DrawSource> Simulation<S> {
    /// Create a simulation with zeroed counters
    pub fn new(engine: LotteryEngine<S>, player: Player, rounds_per_week: u32) -> LottoResult<Self> {
        if rounds_per_week == 0 {
            return Err(LottoError::InvalidRoundsPerWeek);
        }

        Ok(Self {
            engine,
            player,
            strategy: PickStrategy::Fixed,
            rounds_per_week,
            years_passed: 0,
            weeks_passed: 0,
            games_played: 0,
            top_prize_wins: 0,
        })
    }

    /// Set the pick strategy
    pub fn with_strategy(mut self, strategy: PickStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn engine(&self) -> &LotteryEngine<S> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut LotteryEngine<S> {
        &mut self.engine
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn strategy(&self) -> PickStrategy {
        self.strategy
    }

    pub fn rounds_per_week(&self) -> u32 {
        self.rounds_per_week
    }

    pub fn top_prize_wins(&self) -> u64 {
        self.top_prize_wins
    }

    pub fn balance(&self) -> f64 {
        self.player.balance()
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // STEPPING
    // ═══════════════════════════════════════════════════════════════════════════

    /// Play `rounds_per_week` rounds
    pub fn simulate_week(&mut self) -> LottoResult<()> {
        for _ in 0..self.rounds_per_week {
            if self.strategy == PickStrategy::QuickPickEveryRound {
                self.player.generate_guess(&mut self.engine)?;
            }
            if self.engine.play_round(&mut self.player)? {
                self.top_prize_wins += 1;
            }
            self.games_played += 1;
        }
        self.weeks_passed += 1;
        Ok(())
    }

    /// Play 52 weeks
    pub fn simulate_year(&mut self) -> LottoResult<()> {
        for _ in 0..WEEKS_PER_YEAR {
            self.simulate_week()?;
        }
        self.years_passed += 1;
        Ok(())
    }

    /// Play `years` years, logging a snapshot after each when `log` is set
    pub fn simulate_years(&mut self, years: u32, log: bool) -> LottoResult<()> {
        for _ in 0..years {
            self.simulate_year()?;
            if log {
                self.log_results();
            }
        }
        Ok(())
    }

    /// Play whole years until the top prize was won `target_wins` times
    ///
    /// Unbounded: the caller must make sure a top prize is possible.
    pub fn simulate_until_won(&mut self, target_wins: u64, log: bool) -> LottoResult<()> {
        self.simulate_until_won_or(target_wins, log, |_| false).map(|_| ())
    }

    /// Like [`simulate_until_won`](Self::simulate_until_won), but `should_stop`
    /// is asked before every year and can end the run early
    ///
    /// Returns `true` when the target was reached.
    pub fn simulate_until_won_or<F>(&mut self, target_wins: u64, log: bool, mut should_stop: F) -> LottoResult<bool>
    where
        F: FnMut(&SimulationResults) -> bool,
    {
        while self.top_prize_wins < target_wins {
            if should_stop(&self.results()) {
                log::debug!(
                    "Run stopped after {} year(s) with {}/{} top prize win(s)",
                    self.years_passed,
                    self.top_prize_wins,
                    target_wins
                );
                return Ok(false);
            }
            self.simulate_year()?;
            if log {
                self.log_results();
            }
        }
        Ok(true)
    }

    /// Snapshot of the counters and ledger
    pub fn results(&self) -> SimulationResults {
        SimulationResults {
            years_passed: self.years_passed,
            weeks_passed: self.weeks_passed,
            games_played: self.games_played,
            money_spent: self.player.money_spent(),
            money_earned: self.player.money_earned(),
            total_balance: self.player.balance(),
            top_prize_wins: self.top_prize_wins,
        }
    }

    fn log_results(&self) {
        log::info!("{}", self.results());
    }
}
