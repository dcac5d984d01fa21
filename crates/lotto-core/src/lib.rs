//! # lotto-core: sectioned-number lottery engine and simulator
//!
//! Estimates the long-run financial outcome of playing a lottery week after
//! week with a fixed or randomized pick strategy.
//!
//! ## Features
//!
//! - **Guess Table**: sections of slots, each slot with its own eligible values
//! - **Guess Codec**: validation plus flat-to-sectioned normalization
//! - **Reward Rule**: payouts keyed by per-section correct counts, checked for
//!   completeness at load time
//! - **Draw Sources**: seeded rejection sampling or scripted draws
//! - **Simulation**: weeks, years, run-until-won, parallel batches
//! - **Config**: JSON / YAML files and built-in presets
//!
//! ## Architecture
//!
//! ```text
//! Simulation
//!     │
//!     ├── Player (guess + ledger)
//!     └── LotteryEngine
//!           ├── GuessTable (sections × slots)
//!           ├── RewardRule (correct counts → payout)
//!           └── DrawSource (RandomDraws | ScriptedDraws)
//!                 │
//!                 v
//!           RoundScore → ledger update → SimulationResults
//! ```

pub mod batch;
pub mod config;
pub mod draw;
pub mod engine;
pub mod error;
pub mod guess;
pub mod player;
pub mod reward;
pub mod simulation;
pub mod table;
pub mod value;

pub use batch::*;
pub use config::*;
pub use draw::*;
pub use engine::*;
pub use error::*;
pub use guess::*;
pub use player::*;
pub use reward::*;
pub use simulation::*;
pub use table::*;
pub use value::*;
