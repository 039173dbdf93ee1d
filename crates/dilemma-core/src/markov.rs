//! Four-state Markov chain of a pair of memory-one players
//!
//! States are the previous round's joint moves CC, CD, DC, DD seen from the
//! row player `x`. The stationary distribution is the left eigenvector of
//! the transition matrix for eigenvalue 1, scaled to sum to 1.

use nalgebra::{Matrix4, RowVector4, Vector4};
use serde::{Deserialize, Serialize};
use crate::strategy::{JointState, StrategyVector};

/// Residual allowed when checking `πT = π` and `Σπ = 1`
pub const TOLERANCE: f64 = 1e-9;

/// Period multiple covering every cycle length a 4-state chain can have
const CYCLE_LCM: usize = 12;

/// Squarings applied to `T^12` when taking the multi-class limit
const LIMIT_SQUARINGS: usize = 40;

/// How a stationary distribution was obtained
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Solver {
    /// Unique solution of `π(T - I) = 0, Σπ = 1`.
    NullVector,
    /// Several closed classes; long-run average from a uniform opening.
    CesaroLimit,
    /// Two exact Tit-for-Tat players, pinned to mutual cooperation.
    Pinned,
}

/// Probabilities over CC, CD, DC, DD
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stationary {
    pub distribution: [f64; 4],
    pub solver: Solver,
}

impl Stationary {
    pub fn probability(&self, state: JointState) -> f64 {
        self.distribution[state.index()]
    }

    /// Expected payoff per round for a payoff vector over CC, CD, DC, DD
    pub fn expected_payoff(&self, payoffs: &[f64; 4]) -> f64 {
        self.distribution
            .iter()
            .zip(payoffs.iter())
            .map(|(p, s)| p * s)
            .sum()
    }
}

/// Row-stochastic transition matrix; `T[from][to]`
#[derive(Clone, Debug, PartialEq)]
pub struct TransitionMatrix(Matrix4<f64>);

impl TransitionMatrix {
    /// Build the chain for `x` (row player) against `y`.
    ///
    /// From state CD, `x` acts on its own CD entry while `y` sees the round
    /// as DC, and the other way round from DC.
    pub fn between(x: &StrategyVector, y: &StrategyVector) -> Self {
        let mut t = Matrix4::<f64>::zeros();
        for from in JointState::ALL {
            let a = x.cooperate_after(from);
            let b = y.cooperate_after(from.mirrored());
            let row = RowVector4::new(
                a * b,
                a * (1.0 - b),
                (1.0 - a) * b,
                (1.0 - a) * (1.0 - b),
            );
            t.set_row(from.index(), &row);
        }
        Self(t)
    }

    pub fn probability(&self, from: JointState, to: JointState) -> f64 {
        self.0[(from.index(), to.index())]
    }

    pub fn matrix(&self) -> &Matrix4<f64> {
        &self.0
    }

    /// Largest deviation of `πT` from `π`
    pub fn residual(&self, distribution: &[f64; 4]) -> f64 {
        let pi = RowVector4::from_row_slice(distribution);
        (pi * self.0 - pi).amax()
    }

    /// Stationary distribution, chosen as the eigenvalue-1 left eigenvector.
    ///
    /// When the chain has a single closed class the eigenvector is unique
    /// and is solved for directly. Otherwise eigenvalue 1 has a
    /// multi-dimensional eigenspace and the long-run average starting from
    /// a uniform opening state is used.
    pub fn stationary(&self) -> Stationary {
        match self.null_vector() {
            Some(distribution) => Stationary { distribution, solver: Solver::NullVector },
            None => {
                log::debug!("transition matrix has several closed classes, using long-run average");
                Stationary { distribution: self.cesaro_limit(), solver: Solver::CesaroLimit }
            }
        }
    }

    /// Solve `(Tᵀ - I)πᵀ = 0` with the last equation replaced by `Σπ = 1`
    fn null_vector(&self) -> Option<[f64; 4]> {
        let mut system = self.0.transpose() - Matrix4::identity();
        system.set_row(3, &RowVector4::from_element(1.0));
        let solution = system.lu().solve(&Vector4::new(0.0, 0.0, 0.0, 1.0))?;

        let distribution = [solution[0], solution[1], solution[2], solution[3]];
        let admissible = distribution
            .iter()
            .all(|p| p.is_finite() && *p >= -TOLERANCE && *p <= 1.0 + TOLERANCE);
        if !admissible || self.residual(&distribution) > TOLERANCE {
            return None;
        }
        Some(normalized(distribution.map(|p| p.max(0.0))))
    }

    /// `u · lim (1/n) Σ T^k` for the uniform opening distribution `u`
    fn cesaro_limit(&self) -> [f64; 4] {
        let t = self.0;
        let mut powers = Vec::with_capacity(CYCLE_LCM);
        let mut power = Matrix4::<f64>::identity();
        for _ in 0..CYCLE_LCM {
            powers.push(power);
            power *= t;
        }
        // T^12 is aperiodic on every closed class; squaring flushes transients
        let mut settled = power;
        for _ in 0..LIMIT_SQUARINGS {
            settled = settled * settled;
        }
        let average = powers
            .iter()
            .fold(Matrix4::<f64>::zeros(), |acc, p| acc + settled * p)
            / CYCLE_LCM as f64;

        let opening = RowVector4::from_element(0.25);
        let limit = opening * average;
        normalized([limit[0], limit[1], limit[2], limit[3]])
    }
}

fn normalized(distribution: [f64; 4]) -> [f64; 4] {
    let total: f64 = distribution.iter().sum();
    distribution.map(|p| p / total)
}

/// Stationary distribution for the pair, including the Tit-for-Tat override.
///
/// Two exact Tit-for-Tat players are pinned to (1, 0, 0, 0): their opening
/// move is taken to be cooperation, where the eigenspace alone would admit
/// the mutual-defection and alternating outcomes too.
pub fn stationary_between(x: &StrategyVector, y: &StrategyVector) -> Stationary {
    if x.is_tit_for_tat() && y.is_tit_for_tat() {
        return Stationary { distribution: [1.0, 0.0, 0.0, 0.0], solver: Solver::Pinned };
    }
    TransitionMatrix::between(x, y).stationary()
}
