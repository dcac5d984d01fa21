//! Draw sources: where winning numbers and quick picks come from

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::error::{LottoError, LottoResult};
use crate::guess::{Guess, GuessCodec, GuessInput};
use crate::table::GuessTable;
use crate::value::Value;

/// Produces table-shaped guesses
///
/// One source is shared for every draw of a simulation run, so a seeded
/// source reproduces the whole run.
pub trait DrawSource {
    fn draw(&mut self, table: &GuessTable) -> LottoResult<Guess>;
}

/// Uniform per-slot rejection sampling
///
/// Slots are filled in order. A value already taken in the same section is
/// redrawn from the same slot's eligible set. Termination is guaranteed by the
/// starvation check in [`GuessTable::new`].
pub struct RandomDraws<R: Rng = ChaCha8Rng> {
    rng: R,
}

impl RandomDraws<ChaCha8Rng> {
    /// Reproducible source
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Source seeded from the OS
    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha8Rng::from_os_rng(),
        }
    }

    /// Seeded when `seed` is set, otherwise from the OS
    pub fn with_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(s) => Self::seeded(s),
            None => Self::from_entropy(),
        }
    }
}

impl<R: Rng> RandomDraws<R> {
    pub fn from_rng(rng: R) -> Self {
        Self { rng }
    }

    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }
}

impl<R: Rng> DrawSource for RandomDraws<R> {
    fn draw(&mut self, table: &GuessTable) -> LottoResult<Guess> {
        let mut sections = Vec::with_capacity(table.section_count());

        for section in table.sections() {
            let mut picked: Vec<Value> = Vec::with_capacity(section.len());

            for slot in section.slots() {
                let mut value = slot
                    .values()
                    .choose(&mut self.rng)
                    .ok_or(LottoError::DrawSourceEmpty)?;
                while picked.contains(value) {
                    value = slot
                        .values()
                        .choose(&mut self.rng)
                        .ok_or(LottoError::DrawSourceEmpty)?;
                }
                picked.push(value.clone());
            }

            sections.push(picked);
        }

        Ok(Guess::from_checked(sections))
    }
}

/// Replays prepared draws in order, starting over when exhausted
///
/// Every scripted draw is checked against the table when it is drawn.
#[derive(Debug, Clone)]
pub struct ScriptedDraws {
    script: Vec<GuessInput>,
    position: usize,
}

impl ScriptedDraws {
    pub fn new(script: Vec<GuessInput>) -> Self {
        Self { script, position: 0 }
    }

    /// The same draw every time
    pub fn repeat(draw: GuessInput) -> Self {
        Self::new(vec![draw])
    }

    /// Number of draws taken so far
    pub fn position(&self) -> usize {
        self.position
    }
}

impl DrawSource for ScriptedDraws {
    fn draw(&mut self, table: &GuessTable) -> LottoResult<Guess> {
        if self.script.is_empty() {
            return Err(LottoError::DrawSourceEmpty);
        }
        let input = &self.script[self.position % self.script.len()];
        self.position += 1;
        GuessCodec::accept(input, table).map_err(LottoError::MalformedDraw)
    }
}
