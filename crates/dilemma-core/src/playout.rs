//! Sampled playout of one iterated match
//!
//! Plays two memory-one strategies against each other round by round. The
//! empirical state frequencies approach the stationary distribution, which
//! makes a playout a cross-check for the Markov solution and a replay source
//! for front ends.

use serde::{Deserialize, Serialize};
use crate::payoff::PayoffParameters;
use crate::random::SeededRng;
use crate::strategy::{JointState, Move, StrategyVector};

/// Result of a single round
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundResult {
    pub round: u32,
    pub move_x: Move,
    pub move_y: Move,
    pub score_x: f64,
    pub score_y: f64,
}

/// Length of a playout and how much of it is kept for replay
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayoutConfig {
    pub rounds: u32,
    /// Leading rounds recorded in `PlayoutResult::rounds`
    pub replay: u32,
}

impl PlayoutConfig {
    /// Long enough to estimate frequencies to about two decimals
    pub fn standard() -> Self {
        Self { rounds: 100_000, replay: 50 }
    }

    /// Short match for on-screen replay
    pub fn replay(rounds: u32) -> Self {
        Self { rounds, replay: rounds }
    }
}

impl Default for PlayoutConfig {
    fn default() -> Self {
        Self::standard()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayoutResult {
    pub rounds: Vec<RoundResult>,
    pub round_count: u32,
    /// Rounds that ended in CC, CD, DC, DD
    pub state_counts: [u32; 4],
    pub total_x: f64,
    pub total_y: f64,
}

impl PlayoutResult {
    /// Share of rounds per state; zeros for an empty playout
    pub fn frequencies(&self) -> [f64; 4] {
        if self.round_count == 0 {
            return [0.0; 4];
        }
        self.state_counts.map(|c| c as f64 / self.round_count as f64)
    }

    pub fn mean_x(&self) -> f64 {
        if self.round_count == 0 { 0.0 } else { self.total_x / self.round_count as f64 }
    }

    pub fn mean_y(&self) -> f64 {
        if self.round_count == 0 { 0.0 } else { self.total_y / self.round_count as f64 }
    }
}

/// Play `x` against `y`.
///
/// Both players open with cooperation; every later move is drawn from the
/// player's cooperation probability for the previous round's state as that
/// player saw it. Each player draws from its own stream of `seed`.
pub fn run_playout(
    x: &StrategyVector,
    y: &StrategyVector,
    payoffs: &PayoffParameters,
    seed: &[u8; 32],
    config: &PlayoutConfig,
) -> PlayoutResult {
    let mut rng_x = SeededRng::new(seed, 0);
    let mut rng_y = SeededRng::new(seed, 1);

    let mut rounds = Vec::with_capacity(config.replay.min(config.rounds) as usize);
    let mut state_counts = [0u32; 4];
    let mut total_x = 0.0;
    let mut total_y = 0.0;
    let mut previous: Option<JointState> = None;

    for round in 0..config.rounds {
        let (move_x, move_y) = match previous {
            None => (Move::Cooperate, Move::Cooperate),
            Some(state) => (
                draw(&mut rng_x, x.cooperate_after(state)),
                draw(&mut rng_y, y.cooperate_after(state.mirrored())),
            ),
        };

        let (score_x, score_y) = payoffs.score(move_x, move_y);
        total_x += score_x;
        total_y += score_y;

        let state = JointState::from_moves(move_x, move_y);
        state_counts[state.index()] += 1;
        previous = Some(state);

        if round < config.replay {
            rounds.push(RoundResult { round, move_x, move_y, score_x, score_y });
        }
    }

    log::debug!(
        "playout of {} rounds: states {:?}, totals ({}, {})",
        config.rounds,
        state_counts,
        total_x,
        total_y
    );

    PlayoutResult {
        rounds,
        round_count: config.rounds,
        state_counts,
        total_x,
        total_y,
    }
}

fn draw(rng: &mut SeededRng, cooperate: f64) -> Move {
    if rng.chance(cooperate) {
        Move::Cooperate
    } else {
        Move::Defect
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markov::stationary_between;
    use crate::strategy::StrategyBase;

    const SEED: [u8; 32] = [42u8; 32];

    fn base(b: StrategyBase) -> StrategyVector {
        StrategyVector::from(b)
    }

    #[test]
    fn test_playout_determinism() {
        let x = StrategyVector::new([0.9, 0.2, 0.7, 0.4]).unwrap();
        let y = base(StrategyBase::Random);
        let config = PlayoutConfig::replay(200);

        let result1 = run_playout(&x, &y, &PayoffParameters::standard(), &SEED, &config);
        let result2 = run_playout(&x, &y, &PayoffParameters::standard(), &SEED, &config);
        assert_eq!(result1, result2);
    }

    #[test]
    fn test_different_seeds_differ() {
        let r = base(StrategyBase::Random);
        let config = PlayoutConfig::replay(100);
        let result1 = run_playout(&r, &r, &PayoffParameters::standard(), &[1u8; 32], &config);
        let result2 = run_playout(&r, &r, &PayoffParameters::standard(), &[2u8; 32], &config);

        let moves1: Vec<_> = result1.rounds.iter().map(|r| (r.move_x, r.move_y)).collect();
        let moves2: Vec<_> = result2.rounds.iter().map(|r| (r.move_x, r.move_y)).collect();
        assert_ne!(moves1, moves2);
    }

    #[test]
    fn test_cooperate_vs_defect() {
        let result = run_playout(
            &base(StrategyBase::AlwaysCooperate),
            &base(StrategyBase::AlwaysDefect),
            &PayoffParameters::standard(),
            &SEED,
            &PlayoutConfig::replay(30),
        );

        // opening round is mutual cooperation, then AllD defects forever
        assert_eq!(result.rounds[0].move_y, Move::Cooperate);
        for round in result.rounds.iter().skip(1) {
            assert_eq!(round.move_x, Move::Cooperate);
            assert_eq!(round.move_y, Move::Defect);
            assert_eq!((round.score_x, round.score_y), (0.0, 5.0));
        }
        assert_eq!(result.state_counts, [1, 29, 0, 0]);
        assert_eq!(result.total_y, 3.0 + 29.0 * 5.0);
    }

    #[test]
    fn test_tft_vs_tft_keeps_cooperating() {
        let tft = base(StrategyBase::TitForTat);
        let config = PlayoutConfig::replay(40);
        let result = run_playout(&tft, &tft, &PayoffParameters::standard(), &SEED, &config);
        assert_eq!(result.state_counts, [40, 0, 0, 0]);
        assert_eq!(result.mean_x(), 3.0);
    }

    #[test]
    fn test_replay_window() {
        let config = PlayoutConfig { rounds: 500, replay: 10 };
        let r = base(StrategyBase::Random);
        let result = run_playout(&r, &r, &PayoffParameters::standard(), &SEED, &config);
        assert_eq!(result.rounds.len(), 10);
        assert_eq!(result.round_count, 500);
        assert_eq!(result.state_counts.iter().sum::<u32>(), 500);
    }

    #[test]
    fn test_empty_playout() {
        let r = base(StrategyBase::Random);
        let config = PlayoutConfig { rounds: 0, replay: 10 };
        let result = run_playout(&r, &r, &PayoffParameters::standard(), &SEED, &config);
        assert_eq!(result.frequencies(), [0.0; 4]);
        assert_eq!(result.mean_y(), 0.0);
    }

    #[test]
    fn test_frequencies_approach_stationary() {
        let x = StrategyVector::new([0.9, 0.2, 0.7, 0.4]).unwrap();
        let y = StrategyVector::new([0.6, 0.3, 0.8, 0.1]).unwrap();
        let stationary = stationary_between(&x, &y);
        let payoffs = PayoffParameters::standard();
        let result = run_playout(&x, &y, &payoffs, &SEED, &PlayoutConfig::standard());

        for (sampled, expected) in result.frequencies().iter().zip(stationary.distribution.iter()) {
            assert!((sampled - expected).abs() < 0.01, "{} vs {}", sampled, expected);
        }
        let expected_x = stationary.expected_payoff(&payoffs.row_vector());
        assert!((result.mean_x() - expected_x).abs() < 0.05);
    }
}
