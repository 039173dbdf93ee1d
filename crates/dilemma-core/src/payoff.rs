//! Single-round payoff configuration

use serde::{Deserialize, Serialize};
use crate::error::{PayoffError, PayoffField};
use crate::input::parse_number;
use crate::strategy::{JointState, Move};

/// Reward, Sucker, Temptation and Punishment values of one round
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PayoffParameters {
    pub reward: f64,
    pub sucker: f64,
    pub temptation: f64,
    pub punishment: f64,
}

impl PayoffParameters {
    pub fn new(reward: f64, sucker: f64, temptation: f64, punishment: f64) -> Self {
        Self { reward, sucker, temptation, punishment }
    }

    /// Axelrod's tournament values: T=5, R=3, P=1, S=0
    pub fn standard() -> Self {
        Self::new(3.0, 0.0, 5.0, 1.0)
    }

    /// Years in prison as negative payoffs: T=0, R=-1, P=-2, S=-3
    pub fn traditional() -> Self {
        Self::new(-1.0, -3.0, 0.0, -2.0)
    }

    /// Parse the four fields from raw text.
    ///
    /// Accepts the same numbers as table cells, including `a/b`.
    pub fn parse(
        reward: &str,
        sucker: &str,
        temptation: &str,
        punishment: &str,
    ) -> Result<Self, PayoffError> {
        Self::standard()
            .with_field(PayoffField::Reward, reward)?
            .with_field(PayoffField::Sucker, sucker)?
            .with_field(PayoffField::Temptation, temptation)?
            .with_field(PayoffField::Punishment, punishment)
    }

    /// Replace one field with a value parsed from `raw`
    pub fn with_field(mut self, field: PayoffField, raw: &str) -> Result<Self, PayoffError> {
        let value = parse_number(raw.trim()).ok_or_else(|| PayoffError {
            field,
            text: raw.to_string(),
        })?;
        *self.field_mut(field) = value;
        Ok(self)
    }

    pub fn get(&self, field: PayoffField) -> f64 {
        match field {
            PayoffField::Reward => self.reward,
            PayoffField::Sucker => self.sucker,
            PayoffField::Temptation => self.temptation,
            PayoffField::Punishment => self.punishment,
        }
    }

    fn field_mut(&mut self, field: PayoffField) -> &mut f64 {
        match field {
            PayoffField::Reward => &mut self.reward,
            PayoffField::Sucker => &mut self.sucker,
            PayoffField::Temptation => &mut self.temptation,
            PayoffField::Punishment => &mut self.punishment,
        }
    }

    /// Row player's payoff per state CC, CD, DC, DD
    pub fn row_vector(&self) -> [f64; 4] {
        [self.reward, self.sucker, self.temptation, self.punishment]
    }

    /// Column player's payoff per state; Sucker and Temptation trade places
    pub fn column_vector(&self) -> [f64; 4] {
        [self.reward, self.temptation, self.sucker, self.punishment]
    }

    /// Returns (score_a, score_b) for one round
    pub fn score(&self, a: Move, b: Move) -> (f64, f64) {
        let state = JointState::from_moves(a, b).index();
        (self.row_vector()[state], self.column_vector()[state])
    }
}

impl Default for PayoffParameters {
    fn default() -> Self {
        Self::standard()
    }
}
