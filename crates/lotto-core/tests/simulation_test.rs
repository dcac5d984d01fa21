//! End-to-End Lottery Simulation Tests
//!
//! Exercises the whole chain:
//! - Guess acceptance (flat and sectioned)
//! - Drawing, scoring and ledger updates
//! - Driver counters over whole years

use approx::assert_relative_eq;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use lotto_core::{
    DrawSource, GuessCodec, GuessInput, GuessTable, LotteryConfig, LotteryEngine, Player, RandomDraws,
    RewardRule, ScriptedDraws, Section, Simulation, WEEKS_PER_YEAR, values,
};

const SEEDS: [u64; 4] = [1, 42, 2024, 987_654_321];

fn euro_table() -> GuessTable {
    GuessTable::new(vec![Section::range(5, 1..=50), Section::range(2, 1..=12)]).unwrap()
}

fn euro_engine(seed: u64) -> LotteryEngine {
    let config = LotteryConfig::euro_5_plus_2();
    let table = config.table.build().unwrap();
    let rewards = RewardRule::from_tree(&config.rewards).unwrap();
    LotteryEngine::new(table, rewards, config.guess_price, RandomDraws::seeded(seed)).unwrap()
}

// ═══════════════════════════════════════════════════════════════════════════════
// GUESS PROPERTIES
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_generated_guesses_validate_and_are_distinct() {
    let table = euro_table();
    for seed in SEEDS {
        let mut source = RandomDraws::seeded(seed);
        for _ in 0..250 {
            let guess = source.draw(&table).unwrap();
            assert!(GuessCodec::validate(&GuessInput::from(guess.clone()), &table));
            for section in guess.sections() {
                for (i, v) in section.iter().enumerate() {
                    assert!(!section[..i].contains(v), "repeat in {}", guess);
                }
            }
        }
    }
}

#[test]
fn test_flatten_then_normalize_reproduces_guess() {
    let table = euro_table();
    let mut source = RandomDraws::seeded(5);
    for _ in 0..100 {
        let guess = source.draw(&table).unwrap();
        let flat = GuessInput::Flat(guess.flatten());
        assert_eq!(GuessCodec::normalize(&flat, &table).unwrap(), guess.sections());
    }
}

#[test]
fn test_flat_two_section_equivalence() {
    let table = GuessTable::new(vec![Section::range(2, 1..=9), Section::range(3, 1..=9)]).unwrap();
    let flat = GuessInput::flat([7, 3, 9, 1, 5]);
    let sectioned = GuessInput::sectioned([vec![7, 3], vec![9, 1, 5]]);

    assert_eq!(
        GuessCodec::normalize(&flat, &table).unwrap(),
        vec![values([7, 3]), values([9, 1, 5])]
    );
    assert_eq!(
        GuessCodec::accept(&flat, &table).unwrap(),
        GuessCodec::accept(&sectioned, &table).unwrap()
    );
}

// ═══════════════════════════════════════════════════════════════════════════════
// SCORING PROPERTIES
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_top_prize_iff_every_section_matches_as_set() {
    let engine = euro_engine(0);
    let table = engine.table().clone();
    let mut source = RandomDraws::seeded(8);

    for _ in 0..300 {
        let guess = source.draw(&table).unwrap();
        let winning = source.draw(&table).unwrap();
        let score = engine.score(&guess, &winning).unwrap();

        let sets_equal = guess.sections().iter().zip(winning.sections()).all(|(a, b)| {
            let mut a = a.clone();
            let mut b = b.clone();
            a.sort();
            b.sort();
            a == b
        });
        assert_eq!(score.won_top_prize, sets_equal);
    }

    // A shuffled copy of the guess always wins.
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    for _ in 0..50 {
        let guess = source.draw(&table).unwrap();
        let shuffled: Vec<Vec<_>> = guess
            .sections()
            .iter()
            .map(|s| {
                let mut s = s.clone();
                s.shuffle(&mut rng);
                s
            })
            .collect();
        let winning = GuessCodec::accept(&GuessInput::Sectioned(shuffled), &table).unwrap();
        let score = engine.score(&guess, &winning).unwrap();
        assert!(score.won_top_prize);
        assert_relative_eq!(score.payout, 10_000_000.0);
    }
}

#[test]
fn test_ledger_additivity_over_random_rounds() {
    let mut engine = euro_engine(17);
    let mut player = Player::new();
    player.generate_guess(&mut engine).unwrap();

    let rounds = 500;
    let mut payouts = 0.0;
    for _ in 0..rounds {
        engine.play_round(&mut player).unwrap();
        payouts += engine.last_score().unwrap().payout;
    }

    assert_eq!(engine.rounds_played(), rounds);
    assert_relative_eq!(player.money_spent(), rounds as f64 * 2.0);
    assert_relative_eq!(player.money_earned(), payouts);
    assert_relative_eq!(player.balance(), payouts - rounds as f64 * 2.0);
}

// ═══════════════════════════════════════════════════════════════════════════════
// CONCRETE SCENARIOS
// ═══════════════════════════════════════════════════════════════════════════════

fn pick3_with(draws: Vec<GuessInput>) -> (LotteryEngine<ScriptedDraws>, Player) {
    let table = GuessTable::single(Section::range(3, 1..=3)).unwrap();
    let rewards = RewardRule::by_count(&[0.0, 0.0, 0.0, 100.0]);
    let engine = LotteryEngine::new(table, rewards, 10.0, ScriptedDraws::new(draws)).unwrap();
    let mut player = Player::new();
    player.set_guess(&GuessInput::sectioned([[1, 2, 3]]), engine.table()).unwrap();
    (engine, player)
}

#[test]
fn test_pick3_exact_match() {
    let (mut engine, mut player) = pick3_with(vec![GuessInput::sectioned([[1, 2, 3]])]);
    assert!(engine.play_round(&mut player).unwrap());
    assert_relative_eq!(engine.last_score().unwrap().payout, 100.0);
    assert_relative_eq!(player.balance(), 90.0);
}

#[test]
fn test_pick3_reversed_match() {
    let (mut engine, mut player) = pick3_with(vec![GuessInput::sectioned([[3, 2, 1]])]);
    assert!(engine.play_round(&mut player).unwrap());
    assert_eq!(engine.last_score().unwrap().correct, vec![3]);
}

#[test]
fn test_pick3_out_of_table_draw() {
    let (mut engine, mut player) = pick3_with(vec![GuessInput::sectioned([[1, 2, 4]])]);
    assert!(engine.play_round(&mut player).is_err());
    assert_eq!(player.money_spent(), 0.0);
}

// ═══════════════════════════════════════════════════════════════════════════════
// DRIVER
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_counters_after_whole_years() {
    for rounds_per_week in [1, 3] {
        let mut engine = euro_engine(99);
        let mut player = Player::new();
        player.generate_guess(&mut engine).unwrap();
        let mut sim = Simulation::new(engine, player, rounds_per_week).unwrap();

        sim.simulate_years(2, false).unwrap();
        let results = sim.results();
        assert_eq!(results.years_passed, 2);
        assert_eq!(results.weeks_passed, results.years_passed * WEEKS_PER_YEAR as u64);
        assert_eq!(results.games_played, results.weeks_passed * rounds_per_week as u64);
        assert_relative_eq!(results.money_spent, results.games_played as f64 * 2.0);
        assert_relative_eq!(results.total_balance, results.money_earned - results.money_spent);
    }
}

#[test]
fn test_same_seed_same_run() {
    let run = |seed| {
        let mut config = LotteryConfig::lotto_6_49();
        config.seed = Some(seed);
        let mut sim = config.build().unwrap();
        sim.simulate_years(3, false).unwrap();
        sim.results()
    };
    assert_eq!(run(31), run(31));
}

#[test]
fn test_until_won_with_random_draws() {
    let mut config = LotteryConfig::pick3();
    config.seed = Some(6);
    let mut sim = config.build().unwrap();
    sim.simulate_until_won(10, false).unwrap();

    let results = sim.results();
    assert!(results.top_prize_wins >= 10);
    assert!(results.years_passed >= 1);
    assert_eq!(results.games_played, results.years_passed * WEEKS_PER_YEAR as u64);
    assert_relative_eq!(results.money_earned, results.top_prize_wins as f64 * 100.0);
}
