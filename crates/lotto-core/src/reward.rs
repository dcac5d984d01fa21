//! Reward rule: payout lookup keyed by per-section correct counts
//!
//! Payouts are stored under the full tuple of correct counts, one count per
//! section. Config files describe the same thing as a nested map, one level
//! per section, keyed by integers or by their string form; [`RewardTree`]
//! is that boundary format and is flattened once at load time.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{LottoError, LottoResult};
use crate::guess::Guess;
use crate::table::GuessTable;

/// A key of one nesting level in a config reward map
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RewardKey {
    Int(u64),
    Str(String),
}

impl RewardKey {
    fn style(&self) -> KeyStyle {
        match self {
            RewardKey::Int(_) => KeyStyle::Integer,
            RewardKey::Str(_) => KeyStyle::Text,
        }
    }

    fn count(&self) -> LottoResult<u32> {
        match self {
            RewardKey::Int(n) => u32::try_from(*n).map_err(|_| LottoError::InvalidRewardKey(n.to_string())),
            RewardKey::Str(s) => s
                .trim()
                .parse::<u32>()
                .map_err(|_| LottoError::InvalidRewardKey(s.clone())),
        }
    }
}

/// How the keys of a reward map were written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyStyle {
    #[default]
    Integer,
    Text,
}

/// Nested reward map as written in config files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RewardTree {
    Amount(f64),
    Level(BTreeMap<RewardKey, RewardTree>),
}

impl RewardTree {
    /// Nest flat entries into a tree with integer keys
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = (&'a [u32], f64)>) -> Self {
        let mut root = RewardTree::Level(BTreeMap::new());
        for (counts, amount) in entries {
            root.insert(counts, amount);
        }
        root
    }

    fn insert(&mut self, counts: &[u32], amount: f64) {
        let Some((&count, rest)) = counts.split_first() else {
            *self = RewardTree::Amount(amount);
            return;
        };
        if matches!(self, RewardTree::Amount(_)) {
            *self = RewardTree::Level(BTreeMap::new());
        }
        if let RewardTree::Level(map) = self {
            map.entry(RewardKey::Int(count as u64))
                .or_insert_with(|| RewardTree::Level(BTreeMap::new()))
                .insert(rest, amount);
        }
    }
}

/// Payout table keyed by the full tuple of correct counts
#[derive(Debug, Clone, PartialEq)]
pub struct RewardRule {
    payouts: HashMap<Vec<u32>, f64>,
    key_style: KeyStyle,
}

impl RewardRule {
    /// Rule from `(counts, amount)` pairs; not yet checked against a table
    pub fn from_entries(entries: impl IntoIterator<Item = (Vec<u32>, f64)>) -> Self {
        Self {
            payouts: entries.into_iter().collect(),
            key_style: KeyStyle::Integer,
        }
    }

    /// Single-section rule where `amounts[n]` pays for `n` correct
    pub fn by_count(amounts: &[f64]) -> Self {
        Self::from_entries(
            amounts
                .iter()
                .enumerate()
                .map(|(n, &amount)| (vec![n as u32], amount)),
        )
    }

    /// Flatten a nested config map
    ///
    /// String keys must parse as non-negative integers and a map may not mix
    /// integer and string keys.
    pub fn from_tree(tree: &RewardTree) -> LottoResult<Self> {
        let mut payouts = HashMap::new();
        let mut style = None;
        let mut path = Vec::new();
        flatten_tree(tree, &mut path, &mut payouts, &mut style)?;

        if payouts.contains_key(&path) {
            return Err(LottoError::RewardShape("payout given without any section level".into()));
        }

        let key_style = style.unwrap_or_default();
        log::debug!("Reward tree flattened: {} payout(s), {:?} keys", payouts.len(), key_style);
        Ok(Self { payouts, key_style })
    }

    /// Check this rule covers every correct-count combination the table can produce
    pub fn validate_against(&self, table: &GuessTable) -> LottoResult<()> {
        let lengths: Vec<u32> = table.slot_counts().into_iter().map(|n| n as u32).collect();

        // Sorted so the first reported problem is deterministic.
        let mut keys: Vec<&Vec<u32>> = self.payouts.keys().collect();
        keys.sort();
        for counts in keys {
            let fits = counts.len() == lengths.len()
                && counts.iter().zip(&lengths).all(|(c, len)| c <= len);
            if !fits {
                return Err(LottoError::RewardKeyOutOfRange { counts: counts.clone() });
            }
            let amount = self.payouts[counts];
            if !amount.is_finite() || amount < 0.0 {
                return Err(LottoError::InvalidRewardAmount {
                    counts: counts.clone(),
                    amount,
                });
            }
        }

        let mut combinations = 0usize;
        let mut counts = vec![0u32; lengths.len()];
        loop {
            if !self.payouts.contains_key(&counts) {
                return Err(LottoError::IncompleteRewardTable { counts });
            }
            combinations += 1;
            if !advance(&mut counts, &lengths) {
                break;
            }
        }

        log::debug!("Reward rule covers all {} combination(s)", combinations);
        Ok(())
    }

    /// Payout for a tuple of correct counts
    pub fn payout(&self, counts: &[u32]) -> LottoResult<f64> {
        self.payouts
            .get(counts)
            .copied()
            .ok_or_else(|| LottoError::MissingReward { counts: counts.to_vec() })
    }

    pub fn key_style(&self) -> KeyStyle {
        self.key_style
    }

    pub fn len(&self) -> usize {
        self.payouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payouts.is_empty()
    }

    /// Largest payout in the table
    pub fn top_payout(&self) -> f64 {
        self.payouts.values().copied().fold(0.0, f64::max)
    }
}

fn flatten_tree(
    node: &RewardTree,
    path: &mut Vec<u32>,
    payouts: &mut HashMap<Vec<u32>, f64>,
    style: &mut Option<KeyStyle>,
) -> LottoResult<()> {
    match node {
        RewardTree::Amount(amount) => {
            payouts.insert(path.clone(), *amount);
        }
        RewardTree::Level(map) => {
            if map.is_empty() {
                return Err(LottoError::RewardShape(format!("empty map under {:?}", path)));
            }
            for (key, child) in map {
                match style {
                    None => *style = Some(key.style()),
                    Some(s) if *s != key.style() => return Err(LottoError::MixedRewardKeys),
                    Some(_) => {}
                }
                let count = key.count()?;
                path.push(count);
                if payouts.contains_key(path.as_slice()) {
                    return Err(LottoError::RewardShape(format!("duplicate key {:?}", path)));
                }
                flatten_tree(child, path, payouts, style)?;
                path.pop();
            }
        }
    }
    Ok(())
}

/// Odometer step over `0..=lengths[i]`; false once every combination was visited
fn advance(counts: &mut [u32], lengths: &[u32]) -> bool {
    for i in (0..counts.len()).rev() {
        if counts[i] < lengths[i] {
            counts[i] += 1;
            return true;
        }
        counts[i] = 0;
    }
    false
}

/// Correct matches per section: size of the set intersection
pub fn correct_counts(guess: &Guess, winning: &Guess) -> Vec<u32> {
    guess
        .sections()
        .iter()
        .zip(winning.sections())
        .map(|(mine, drawn)| mine.iter().filter(|v| drawn.contains(v)).count() as u32)
        .collect()
}

impl fmt::Display for KeyStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyStyle::Integer => f.write_str("integer"),
            KeyStyle::Text => f.write_str("string"),
        }
    }
}
