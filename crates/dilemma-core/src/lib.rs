//! Outcome engine for iterated Prisoner's Dilemma tables
//!
//! Turns a strategy table (four conditional cooperation probabilities per
//! player) or a hand-written result table into the pairwise payoff matrix
//! and the per-player standings a ranking table or chord diagram shows.
//! This crate is compiled to:
//! - Native (for the CLI)
//! - WASM (for the browser front end)

mod error;
mod input;
mod markov;
mod outcome;
mod payoff;
mod playout;
mod random;
mod standings;
mod strategy;

#[cfg(feature = "wasm")]
mod wasm;

use serde::Serialize;

pub use error::{DilemmaError, Fault, Mode, NormalizeError, PayoffError, PayoffField};
pub use input::{
    normalize, normalize_result_matrix, normalize_strategies, parse_number, Cell, ResultPlayer,
    Roster, StrategyPlayer, STRATEGY_COLUMNS,
};
pub use markov::{stationary_between, Solver, Stationary, TransitionMatrix, TOLERANCE};
pub use outcome::{
    compute_outcome, round_to_cents, Matchup, Outcome, OutcomeMatrix, PlayerAggregate, Verdict,
};
pub use payoff::PayoffParameters;
pub use playout::{run_playout, PlayoutConfig, PlayoutResult, RoundResult};
pub use random::SeededRng;
pub use standings::{SortKey, Standings};
pub use strategy::{JointState, Move, StrategyBase, StrategyVector};

/// Normalize `text` as a `mode` table and compute its outcome.
///
/// Stateless: the caller owns the session and passes its current table and
/// payoffs on every call.
pub fn compute(
    text: &str,
    mode: Mode,
    payoffs: &PayoffParameters,
) -> Result<Outcome, DilemmaError> {
    let roster = normalize(text, mode)?;
    Ok(compute_outcome(&roster, payoffs))
}

/// Outcome of one session pass, with the validity flag a front end needs
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SessionReport {
    /// Input block the report is about
    pub block: Mode,
    pub faulty: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
}

impl SessionReport {
    pub fn new(mode: Mode, result: Result<Outcome, DilemmaError>) -> Self {
        match result {
            Ok(outcome) => Self { block: mode, faulty: false, error: None, outcome: Some(outcome) },
            Err(e) => {
                log::debug!("session rejected: {}", e);
                Self {
                    block: e.faulty_block(),
                    faulty: true,
                    error: Some(e.to_string()),
                    outcome: None,
                }
            }
        }
    }
}
