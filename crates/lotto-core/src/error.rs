//! Error types for the lottery engine

use thiserror::Error;

use crate::guess::GuessRejection;

/// Core error type
///
/// Configuration variants are fatal at construction time. Runtime variants
/// abort the round that raised them; the simulation driver never masks them.
#[derive(Error, Debug)]
pub enum LottoError {
    #[error("Guess table has no sections")]
    EmptyTable,

    #[error("Section {section} has no slots")]
    EmptySection { section: usize },

    #[error("Slot {slot} of section {section} has no eligible values")]
    EmptySlot { section: usize, slot: usize },

    #[error("Guess table mixes integer and string values")]
    MixedValueKinds,

    #[error("Slot {slot} of section {section} can be exhausted by earlier slots")]
    UnsatisfiableSlot { section: usize, slot: usize },

    #[error("Invalid guess price: {0}")]
    InvalidPrice(f64),

    #[error("Rounds per week must be positive")]
    InvalidRoundsPerWeek,

    #[error("Reward key is not a correct-count: {0:?}")]
    InvalidRewardKey(String),

    #[error("Reward table mixes integer and string keys")]
    MixedRewardKeys,

    #[error("Reward table is nested incorrectly: {0}")]
    RewardShape(String),

    #[error("Reward key {counts:?} does not fit the guess table")]
    RewardKeyOutOfRange { counts: Vec<u32> },

    #[error("Invalid reward amount {amount} for {counts:?}")]
    InvalidRewardAmount { counts: Vec<u32>, amount: f64 },

    #[error("Reward table has no payout for {counts:?}")]
    IncompleteRewardTable { counts: Vec<u32> },

    #[error("No payout defined for correct counts {counts:?}")]
    MissingReward { counts: Vec<u32> },

    #[error("Drawn numbers do not fit the guess table: {0}")]
    MalformedDraw(GuessRejection),

    #[error("Draw source has nothing to draw")]
    DrawSourceEmpty,

    #[error("Player has no guess")]
    NoGuess,

    #[error("Guess rejected: {0}")]
    Rejected(#[from] GuessRejection),

    #[error("Unknown preset: {0}")]
    UnknownPreset(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias
pub type LottoResult<T> = Result<T, LottoError>;
