//! Outcome engine
//!
//! Fills the N×N payoff matrix for a roster and derives the per-player
//! aggregates and pairwise matchups the ranking table and chord diagram
//! are drawn from. Every call recomputes from scratch.

use serde::Serialize;
use crate::error::Mode;
use crate::input::{ResultPlayer, Roster, StrategyPlayer};
use crate::markov::stationary_between;
use crate::payoff::PayoffParameters;

/// Square matrix; `get(i, j)` is the expected payoff to `i` against `j`
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(transparent)]
pub struct OutcomeMatrix {
    rows: Vec<Vec<f64>>,
}

impl OutcomeMatrix {
    fn square(size: usize) -> Self {
        Self { rows: vec![vec![0.0; size]; size] }
    }

    pub fn size(&self) -> usize {
        self.rows.len()
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.rows[i][j]
    }

    fn set(&mut self, i: usize, j: usize, value: f64) {
        self.rows[i][j] = value;
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Points player `i` receives from everyone
    pub fn row_sum(&self, i: usize) -> f64 {
        self.rows[i].iter().sum()
    }

    /// Points everyone receives from player `i`
    pub fn column_sum(&self, i: usize) -> f64 {
        self.rows.iter().map(|row| row[i]).sum()
    }
}

/// Table columns for one player
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlayerAggregate {
    pub name: String,
    pub gets: f64,
    pub gives: f64,
    /// `gets / gives`; `None` when `gives` is zero
    pub ratio: Option<f64>,
    pub wins: u32,
    pub average_gets: f64,
    pub average_gives: f64,
    /// Mean cooperation probability, strategy sessions only
    pub generosity: Option<f64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Verdict {
    Tie,
    Winner(usize),
}

/// Both sides of one pairing, `first < second`
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Matchup {
    pub first: usize,
    pub second: usize,
    pub first_payoff: f64,
    pub second_payoff: f64,
    pub verdict: Verdict,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Outcome {
    pub mode: Mode,
    pub players: Vec<String>,
    pub matrix: OutcomeMatrix,
    pub aggregates: Vec<PlayerAggregate>,
    pub matchups: Vec<Matchup>,
}

/// Round half up to two decimals; two payoffs tie when these agree
pub fn round_to_cents(value: f64) -> f64 {
    (value * 100.0 + 0.5).floor() / 100.0
}

/// Compute the outcome matrix and aggregates for a roster.
///
/// `payoffs` is only consulted for strategy rosters. An empty roster gives
/// an empty matrix and no aggregates.
pub fn compute_outcome(roster: &Roster, payoffs: &PayoffParameters) -> Outcome {
    log::debug!("computing {} outcomes for {} players", roster.mode(), roster.len());

    let (matrix, generosity): (OutcomeMatrix, Vec<Option<f64>>) = match roster {
        Roster::Strategies(players) => (
            strategy_matrix(players, payoffs),
            players.iter().map(|p| Some(p.strategy.generosity())).collect(),
        ),
        Roster::ResultMatrix(players) => (result_matrix(players), vec![None; players.len()]),
    };

    let players = roster.names();
    let aggregates = aggregate(&players, &matrix, &generosity);
    let matchups = matchups(&matrix);

    Outcome {
        mode: roster.mode(),
        players,
        matrix,
        aggregates,
        matchups,
    }
}

/// Each unordered pair is solved once; the chain for (Y, X) is the chain for
/// (X, Y) with CD and DC swapped, so it yields the same two payoffs.
fn strategy_matrix(players: &[StrategyPlayer], payoffs: &PayoffParameters) -> OutcomeMatrix {
    let row_payoffs = payoffs.row_vector();
    let column_payoffs = payoffs.column_vector();
    let mut matrix = OutcomeMatrix::square(players.len());

    for (i, x) in players.iter().enumerate() {
        for (j, y) in players.iter().enumerate().skip(i) {
            let stationary = stationary_between(&x.strategy, &y.strategy);
            let to_x = stationary.expected_payoff(&row_payoffs);
            let to_y = stationary.expected_payoff(&column_payoffs);
            log::trace!(
                "{} vs {}: {:?} via {:?} -> ({}, {})",
                x.name,
                y.name,
                stationary.distribution,
                stationary.solver,
                to_x,
                to_y
            );
            matrix.set(j, i, to_y);
            matrix.set(i, j, to_x);
        }
    }
    matrix
}

fn result_matrix(players: &[ResultPlayer]) -> OutcomeMatrix {
    let mut matrix = OutcomeMatrix::square(players.len());
    for (i, player) in players.iter().enumerate() {
        for (j, value) in player.results.iter().enumerate() {
            matrix.set(i, j, *value);
        }
    }
    matrix
}

fn aggregate(
    names: &[String],
    matrix: &OutcomeMatrix,
    generosity: &[Option<f64>],
) -> Vec<PlayerAggregate> {
    let n = matrix.size();
    (0..n)
        .map(|i| {
            let gets = matrix.row_sum(i);
            let gives = matrix.column_sum(i);
            let ratio = if gives == 0.0 {
                log::debug!("{} gives nothing, ratio undefined", names[i]);
                None
            } else {
                Some(gets / gives)
            };
            let wins = (0..n)
                .filter(|&j| round_to_cents(matrix.get(i, j)) > round_to_cents(matrix.get(j, i)))
                .count() as u32;
            PlayerAggregate {
                name: names[i].clone(),
                gets,
                gives,
                ratio,
                wins,
                average_gets: gets / n as f64,
                average_gives: gives / n as f64,
                generosity: generosity[i],
            }
        })
        .collect()
}

fn matchups(matrix: &OutcomeMatrix) -> Vec<Matchup> {
    let n = matrix.size();
    let mut matchups = Vec::with_capacity(n * n.saturating_sub(1) / 2);
    for first in 0..n {
        for second in first + 1..n {
            let first_payoff = matrix.get(first, second);
            let second_payoff = matrix.get(second, first);
            let (a, b) = (round_to_cents(first_payoff), round_to_cents(second_payoff));
            let verdict = if a == b {
                Verdict::Tie
            } else if a > b {
                Verdict::Winner(first)
            } else {
                Verdict::Winner(second)
            };
            matchups.push(Matchup { first, second, first_payoff, second_payoff, verdict });
        }
    }
    matchups
}
