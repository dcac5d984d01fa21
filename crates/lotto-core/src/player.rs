//! Player: a guess and a money ledger

use serde::Serialize;

use crate::draw::DrawSource;
use crate::engine::LotteryEngine;
use crate::error::LottoResult;
use crate::guess::{Guess, GuessCodec, GuessInput, GuessRejection};
use crate::table::GuessTable;

/// A player of one lottery
///
/// Balance is always derived from the two running totals.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Player {
    guess: Option<Guess>,
    money_spent: f64,
    money_earned: f64,
}

impl Player {
    /// Player without a guess and with an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the guess if `input` fits `table`
    ///
    /// Flat input is split into sections first. On rejection the previous
    /// guess stays in place.
    pub fn set_guess(&mut self, input: &GuessInput, table: &GuessTable) -> Result<&Guess, GuessRejection> {
        match GuessCodec::accept(input, table) {
            Ok(guess) => Ok(self.guess.insert(guess)),
            Err(reason) => {
                log::warn!("Guess rejected: {}", reason);
                Err(reason)
            }
        }
    }

    /// Replace the guess with a quick pick from the engine's draw source
    pub fn generate_guess<S: DrawSource>(&mut self, engine: &mut LotteryEngine<S>) -> LottoResult<&Guess> {
        let guess = engine.draw_guess()?;
        Ok(self.guess.insert(guess))
    }

    pub fn guess(&self) -> Option<&Guess> {
        self.guess.as_ref()
    }

    pub fn money_spent(&self) -> f64 {
        self.money_spent
    }

    pub fn money_earned(&self) -> f64 {
        self.money_earned
    }

    /// Earned minus spent
    pub fn balance(&self) -> f64 {
        self.money_earned - self.money_spent
    }

    pub(crate) fn spend(&mut self, amount: f64) {
        self.money_spent += amount;
    }

    pub(crate) fn grant(&mut self, amount: f64) {
        self.money_earned += amount;
    }
}
