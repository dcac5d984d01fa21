//! Lottery configuration: file loading and built-in presets
//!
//! Config files are JSON or YAML, picked by file extension. Everything here is
//! boundary format: it is converted into validated core types by
//! [`LotteryConfig::build`], and any problem is a fatal configuration error.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::draw::RandomDraws;
use crate::engine::LotteryEngine;
use crate::error::{LottoError, LottoResult};
use crate::guess::GuessInput;
use crate::player::Player;
use crate::reward::{RewardRule, RewardTree};
use crate::simulation::{PickStrategy, Simulation};
use crate::table::{GuessTable, Section, Slot};
use crate::value::Value;

/// Names accepted by [`LotteryConfig::preset`]
pub const PRESET_NAMES: &[&str] = &["pick3", "lotto-6-49", "euro-5-plus-2"];

/// Compact integer section: `slots` distinct picks from `from..=to`
///
/// Only decodes from a map, so a plain list of numbers is never mistaken
/// for a range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, i64>", into = "BTreeMap<String, i64>")]
pub struct RangeSection {
    pub slots: usize,
    pub from: i64,
    pub to: i64,
}

impl TryFrom<BTreeMap<String, i64>> for RangeSection {
    type Error = String;

    fn try_from(map: BTreeMap<String, i64>) -> Result<Self, Self::Error> {
        if let Some(unknown) = map.keys().find(|k| !matches!(k.as_str(), "slots" | "from" | "to")) {
            return Err(format!("unknown range field `{}`", unknown));
        }
        let field = |name: &str| map.get(name).copied().ok_or_else(|| format!("range is missing `{}`", name));
        let slots = usize::try_from(field("slots")?).map_err(|_| "range `slots` must be non-negative".to_string())?;
        Ok(Self {
            slots,
            from: field("from")?,
            to: field("to")?,
        })
    }
}

impl From<RangeSection> for BTreeMap<String, i64> {
    fn from(range: RangeSection) -> Self {
        BTreeMap::from([
            ("slots".to_string(), range.slots as i64),
            ("from".to_string(), range.from),
            ("to".to_string(), range.to),
        ])
    }
}

/// One section as written in a config file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SectionSpec {
    /// Eligible values listed per slot
    Slots(Vec<Vec<Value>>),
    Range(RangeSection),
}

impl SectionSpec {
    fn build(&self) -> Section {
        match self {
            SectionSpec::Slots(slots) => Section::new(slots.iter().cloned().map(Slot::new).collect()),
            SectionSpec::Range(r) => Section::range(r.slots, r.from..=r.to),
        }
    }
}

/// A guess table as written in a config file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TableSpec {
    Sections(Vec<SectionSpec>),
    /// A bare list of slots, treated as one section
    SingleSection(Vec<Vec<Value>>),
}

impl TableSpec {
    pub fn build(&self) -> LottoResult<GuessTable> {
        match self {
            TableSpec::Sections(sections) => GuessTable::new(sections.iter().map(SectionSpec::build).collect()),
            TableSpec::SingleSection(slots) => {
                GuessTable::single(SectionSpec::Slots(slots.clone()).build())
            }
        }
    }
}

/// How the player picks numbers
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StrategySpec {
    /// The same numbers every round
    Fixed { guess: GuessInput },
    /// One random pick kept for the whole run
    #[default]
    QuickPick,
    /// A new random pick every round
    QuickPickEveryRound,
}

/// Complete description of a lottery and a player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LotteryConfig {
    #[serde(default = "default_name")]
    pub name: String,
    pub table: TableSpec,
    pub rewards: RewardTree,
    pub guess_price: f64,
    #[serde(default = "default_rounds_per_week")]
    pub rounds_per_week: u32,
    /// Seed for the shared random source (None = seed from the OS)
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub strategy: StrategySpec,
}

fn default_name() -> String {
    "custom".into()
}

fn default_rounds_per_week() -> u32 {
    1
}

impl LotteryConfig {
    // ═══════════════════════════════════════════════════════════════════════════
    // LOADING
    // ═══════════════════════════════════════════════════════════════════════════

    /// Load from a `.json`, `.yaml` or `.yml` file
    pub fn load(path: impl AsRef<Path>) -> LottoResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        let config = match ext.as_str() {
            "json" => Self::from_json_str(&text)?,
            "yaml" | "yml" => Self::from_yaml_str(&text)?,
            other => {
                return Err(LottoError::Config(format!(
                    "unsupported config extension `{}` ({})",
                    other,
                    path.display()
                )));
            }
        };
        log::debug!("Loaded config `{}` from {}", config.name, path.display());
        Ok(config)
    }

    pub fn from_json_str(json: &str) -> LottoResult<Self> {
        serde_json::from_str(json).map_err(|e| LottoError::Config(format!("Invalid JSON config: {}", e)))
    }

    pub fn from_yaml_str(yaml: &str) -> LottoResult<Self> {
        serde_yml::from_str(yaml).map_err(|e| LottoError::Config(format!("Invalid YAML config: {}", e)))
    }

    pub fn to_json(&self) -> LottoResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| LottoError::Config(e.to_string()))
    }

    pub fn to_yaml(&self) -> LottoResult<String> {
        serde_yml::to_string(self).map_err(|e| LottoError::Config(e.to_string()))
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // BUILDING
    // ═══════════════════════════════════════════════════════════════════════════

    /// Build a ready simulation seeded with `self.seed`
    pub fn build(&self) -> LottoResult<Simulation<RandomDraws>> {
        self.build_seeded(self.seed)
    }

    /// Build a ready simulation with an explicit seed
    pub fn build_seeded(&self, seed: Option<u64>) -> LottoResult<Simulation<RandomDraws>> {
        let table = self.table.build()?;
        let rewards = RewardRule::from_tree(&self.rewards)?;
        log::debug!("Config `{}`: reward keys written as {}", self.name, rewards.key_style());

        let mut engine = LotteryEngine::new(table, rewards, self.guess_price, RandomDraws::with_seed(seed))?;
        let mut player = Player::new();

        let strategy = match &self.strategy {
            StrategySpec::Fixed { guess } => {
                player.set_guess(guess, engine.table())?;
                PickStrategy::Fixed
            }
            StrategySpec::QuickPick => {
                player.generate_guess(&mut engine)?;
                PickStrategy::Fixed
            }
            StrategySpec::QuickPickEveryRound => PickStrategy::QuickPickEveryRound,
        };

        Ok(Simulation::new(engine, player, self.rounds_per_week)?.with_strategy(strategy))
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // PRESETS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Built-in lottery by name, see [`PRESET_NAMES`]
    pub fn preset(name: &str) -> LottoResult<Self> {
        match name {
            "pick3" => Ok(Self::pick3()),
            "lotto-6-49" => Ok(Self::lotto_6_49()),
            "euro-5-plus-2" => Ok(Self::euro_5_plus_2()),
            other => Err(LottoError::UnknownPreset(other.to_string())),
        }
    }

    /// Three distinct picks from 1–3; only a full match pays
    pub fn pick3() -> Self {
        Self {
            name: "pick3".into(),
            table: TableSpec::Sections(vec![SectionSpec::Range(RangeSection { slots: 3, from: 1, to: 3 })]),
            rewards: by_count_tree(&[0.0, 0.0, 0.0, 100.0]),
            guess_price: 10.0,
            rounds_per_week: 1,
            seed: None,
            strategy: StrategySpec::Fixed {
                guess: GuessInput::sectioned([[1, 2, 3]]),
            },
        }
    }

    /// Classic 6 of 49
    pub fn lotto_6_49() -> Self {
        Self {
            name: "lotto-6-49".into(),
            table: TableSpec::Sections(vec![SectionSpec::Range(RangeSection { slots: 6, from: 1, to: 49 })]),
            rewards: by_count_tree(&[0.0, 0.0, 0.0, 10.0, 50.0, 1_500.0, 2_000_000.0]),
            guess_price: 2.0,
            rounds_per_week: 2,
            seed: None,
            strategy: StrategySpec::QuickPick,
        }
    }

    /// Five of 50 plus two of 12
    pub fn euro_5_plus_2() -> Self {
        let paying: &[([u32; 2], f64)] = &[
            ([5, 2], 10_000_000.0),
            ([5, 1], 500_000.0),
            ([5, 0], 100_000.0),
            ([4, 2], 4_000.0),
            ([4, 1], 200.0),
            ([4, 0], 100.0),
            ([3, 2], 60.0),
            ([2, 2], 20.0),
            ([3, 1], 15.0),
            ([3, 0], 14.0),
            ([1, 2], 10.0),
            ([2, 1], 8.0),
        ];
        let mut entries: Vec<([u32; 2], f64)> = Vec::new();
        for main in 0..=5u32 {
            for stars in 0..=2u32 {
                let amount = paying
                    .iter()
                    .find(|(k, _)| *k == [main, stars])
                    .map(|(_, a)| *a)
                    .unwrap_or(0.0);
                entries.push(([main, stars], amount));
            }
        }

        Self {
            name: "euro-5-plus-2".into(),
            table: TableSpec::Sections(vec![
                SectionSpec::Range(RangeSection { slots: 5, from: 1, to: 50 }),
                SectionSpec::Range(RangeSection { slots: 2, from: 1, to: 12 }),
            ]),
            rewards: RewardTree::from_entries(entries.iter().map(|(k, a)| (k.as_slice(), *a))),
            guess_price: 2.0,
            rounds_per_week: 2,
            seed: None,
            strategy: StrategySpec::QuickPick,
        }
    }
}

fn by_count_tree(amounts: &[f64]) -> RewardTree {
    let keys: Vec<[u32; 1]> = (0..amounts.len() as u32).map(|n| [n]).collect();
    RewardTree::from_entries(keys.iter().zip(amounts).map(|(k, a)| (k.as_slice(), *a)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reward::KeyStyle;
    use crate::value::values;

    #[test]
    fn test_presets_build() {
        for name in PRESET_NAMES {
            let config = LotteryConfig::preset(name).unwrap();
            let sim = config.build_seeded(Some(1)).unwrap();
            assert!(sim.player().guess().is_some() || sim.strategy() == PickStrategy::QuickPickEveryRound);
        }
        assert!(matches!(LotteryConfig::preset("keno"), Err(LottoError::UnknownPreset(_))));
    }

    #[test]
    fn test_preset_names_match_constructors() {
        assert_eq!(PRESET_NAMES, &["pick3", "lotto-6-49", "euro-5-plus-2"]);
        assert_eq!(LotteryConfig::preset("pick3").unwrap(), LotteryConfig::pick3());
        assert_eq!(LotteryConfig::preset("lotto-6-49").unwrap(), LotteryConfig::lotto_6_49());
        assert_eq!(LotteryConfig::preset("euro-5-plus-2").unwrap(), LotteryConfig::euro_5_plus_2());
        assert!(LotteryConfig::preset("lotto_6_49").is_err());
    }

    #[test]
    fn test_quick_pick_builds_fixed_strategy() {
        let sim = LotteryConfig::lotto_6_49().build_seeded(Some(2)).unwrap();
        assert_eq!(sim.strategy(), PickStrategy::Fixed);
        assert!(sim.player().guess().is_some());
    }

    #[test]
    fn test_json_config_with_string_keys() {
        let json = r#"{
            "name": "tiny",
            "table": [[[1, 2, 3], [1, 2, 3], [1, 2, 3]]],
            "rewards": {"0": 0, "1": 0, "2": 0, "3": 100},
            "guess_price": 10,
            "seed": 4,
            "strategy": {"kind": "fixed", "guess": [3, 2, 1]}
        }"#;
        let config = LotteryConfig::from_json_str(json).unwrap();
        assert_eq!(config.rounds_per_week, 1);
        let sim = config.build().unwrap();
        assert_eq!(sim.player().guess().unwrap().sections(), &[values([3, 2, 1])]);
        assert_eq!(sim.engine().rewards().key_style(), KeyStyle::Text);
    }

    #[test]
    fn test_bare_single_section_table() {
        let yaml = "
table: [[1, 2, 3], [1, 2, 3]]
rewards: {0: 0, 1: 1, 2: 5}
guess_price: 1
strategy: {kind: quick_pick_every_round}
";
        let config = LotteryConfig::from_yaml_str(yaml).unwrap();
        let table = config.table.build().unwrap();
        assert_eq!(table.slot_counts(), vec![2]);
        let sim = config.build().unwrap();
        assert_eq!(sim.strategy(), PickStrategy::QuickPickEveryRound);
    }

    #[test]
    fn test_range_and_slot_sections_mix() {
        let yaml = "
table:
  - {slots: 5, from: 1, to: 50}
  - [[1, 2], [3, 4]]
rewards: {}
guess_price: 1
";
        let config = LotteryConfig::from_yaml_str(yaml).unwrap();
        let table = config.table.build().unwrap();
        assert_eq!(table.slot_counts(), vec![5, 2]);
    }

    #[test]
    fn test_range_rejects_unknown_field() {
        let yaml = "
table:
  - {slots: 5, from: 1, upto: 50}
rewards: {0: 0}
guess_price: 1
";
        assert!(matches!(LotteryConfig::from_yaml_str(yaml), Err(LottoError::Config(_))));
    }

    #[test]
    fn test_incomplete_rewards_fail_build() {
        let mut config = LotteryConfig::pick3();
        config.rewards = by_count_tree(&[0.0, 0.0, 100.0]);
        assert!(matches!(config.build(), Err(LottoError::IncompleteRewardTable { .. })));
    }

    #[test]
    fn test_invalid_fixed_guess_fails_build() {
        let mut config = LotteryConfig::pick3();
        config.strategy = StrategySpec::Fixed {
            guess: GuessInput::flat([1, 1, 2]),
        };
        assert!(matches!(config.build(), Err(LottoError::Rejected(_))));
    }

    #[test]
    fn test_malformed_table_is_fatal() {
        let json = r#"{"table": 5, "rewards": {"0": 0}, "guess_price": 1}"#;
        assert!(matches!(LotteryConfig::from_json_str(json), Err(LottoError::Config(_))));
    }

    #[test]
    fn test_yaml_round_trip() {
        let config = LotteryConfig::euro_5_plus_2();
        let yaml = config.to_yaml().unwrap();
        assert_eq!(LotteryConfig::from_yaml_str(&yaml).unwrap(), config);
    }

    #[test]
    fn test_load_by_extension() {
        let dir = std::env::temp_dir().join(format!("lotto-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let json_path = dir.join("pick3.json");
        std::fs::write(&json_path, LotteryConfig::pick3().to_json().unwrap()).unwrap();
        let loaded = LotteryConfig::load(&json_path).unwrap();
        // JSON map keys come back as strings
        assert_eq!(loaded.table, LotteryConfig::pick3().table);
        assert_eq!(loaded.build().unwrap().engine().rewards().key_style(), KeyStyle::Text);

        let yaml_path = dir.join("pick3.yaml");
        std::fs::write(&yaml_path, LotteryConfig::pick3().to_yaml().unwrap()).unwrap();
        assert_eq!(LotteryConfig::load(&yaml_path).unwrap(), LotteryConfig::pick3());

        let txt_path = dir.join("pick3.txt");
        std::fs::write(&txt_path, "{}").unwrap();
        assert!(matches!(LotteryConfig::load(&txt_path), Err(LottoError::Config(_))));

        assert!(matches!(LotteryConfig::load(dir.join("missing.yaml")), Err(LottoError::Io(_))));
        std::fs::remove_dir_all(&dir).ok();
    }
}
