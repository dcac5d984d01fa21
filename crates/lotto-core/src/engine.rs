//! Lottery engine: draws, scoring and single rounds

use serde::Serialize;

use crate::draw::{DrawSource, RandomDraws};
use crate::error::{LottoError, LottoResult};
use crate::guess::{Guess, GuessCodec};
use crate::player::Player;
use crate::reward::{RewardRule, correct_counts};
use crate::table::GuessTable;

/// Outcome of scoring one guess against one draw
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundScore {
    /// Correct matches per section
    pub correct: Vec<u32>,
    /// Every section matched perfectly
    pub won_top_prize: bool,
    /// Amount granted for this round
    pub payout: f64,
}

/// Runs rounds of one lottery
///
/// Owns the table, the reward rule, the ticket price and the single draw
/// source used for every draw.
pub struct LotteryEngine<S: DrawSource = RandomDraws> {
    table: GuessTable,
    rewards: RewardRule,
    guess_price: f64,
    source: S,
    last_draw: Option<Guess>,
    last_score: Option<RoundScore>,
    rounds_played: u64,
}

impl<S: DrawSource> LotteryEngine<S> {
    /// Create an engine; fails on a bad price or a reward rule that does not
    /// cover the table
    pub fn new(table: GuessTable, rewards: RewardRule, guess_price: f64, source: S) -> LottoResult<Self> {
        if !guess_price.is_finite() || guess_price <= 0.0 {
            return Err(LottoError::InvalidPrice(guess_price));
        }
        rewards.validate_against(&table)?;

        log::debug!(
            "Lottery ready: price {}, {} payout(s), top payout {}",
            guess_price,
            rewards.len(),
            rewards.top_payout()
        );

        Ok(Self {
            table,
            rewards,
            guess_price,
            source,
            last_draw: None,
            last_score: None,
            rounds_played: 0,
        })
    }

    pub fn table(&self) -> &GuessTable {
        &self.table
    }

    pub fn rewards(&self) -> &RewardRule {
        &self.rewards
    }

    pub fn guess_price(&self) -> f64 {
        self.guess_price
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Winning numbers of the most recent round
    pub fn last_draw(&self) -> Option<&Guess> {
        self.last_draw.as_ref()
    }

    /// Score of the most recent round
    pub fn last_score(&self) -> Option<&RoundScore> {
        self.last_score.as_ref()
    }

    pub fn rounds_played(&self) -> u64 {
        self.rounds_played
    }

    /// Random table-shaped guess from the shared draw source
    pub fn draw_guess(&mut self) -> LottoResult<Guess> {
        self.source.draw(&self.table)
    }

    /// Draw new winning numbers, replacing the previous draw
    pub fn draw_winning_numbers(&mut self) -> LottoResult<&Guess> {
        let draw = self.source.draw(&self.table)?;
        Ok(self.last_draw.insert(draw))
    }

    /// Score a guess against winning numbers
    ///
    /// Fails only when the reward rule has no entry for the correct counts.
    pub fn score(&self, guess: &Guess, winning: &Guess) -> LottoResult<RoundScore> {
        score_round(&self.table, &self.rewards, guess, winning)
    }

    /// Play one round for `player`; returns whether the top prize was won
    ///
    /// The guess is checked against this engine's table before anything is
    /// drawn. The new draw replaces the previous one before scoring. The ticket
    /// price is debited and the payout credited every round.
    pub fn play_round(&mut self, player: &mut Player) -> LottoResult<bool> {
        let Some(guess) = player.guess() else {
            return Err(LottoError::NoGuess);
        };
        GuessCodec::check(guess.sections(), &self.table)?;

        let draw = self.source.draw(&self.table)?;
        self.last_score = None;
        let winning = self.last_draw.insert(draw);
        let score = score_round(&self.table, &self.rewards, guess, winning)?;

        player.spend(self.guess_price);
        player.grant(score.payout);
        self.rounds_played += 1;

        let won = score.won_top_prize;
        if won {
            log::info!(
                "Top prize hit on round {}: {} (payout {})",
                self.rounds_played,
                winning,
                score.payout
            );
        }

        self.last_score = Some(score);
        Ok(won)
    }
}

fn score_round(table: &GuessTable, rewards: &RewardRule, guess: &Guess, winning: &Guess) -> LottoResult<RoundScore> {
    let correct = correct_counts(guess, winning);
    let won_top_prize = correct
        .iter()
        .zip(table.sections())
        .all(|(&count, section)| count as usize == section.len());
    let payout = rewards.payout(&correct)?;

    Ok(RoundScore {
        correct,
        won_top_prize,
        payout,
    })
}
