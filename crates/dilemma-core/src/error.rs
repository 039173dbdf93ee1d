//! Error types for input normalization and payoff configuration

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which kind of table a session was fed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    /// Name plus four cooperation probabilities per row.
    Strategies,
    /// Name plus one precomputed payoff per opponent.
    ResultMatrix,
}

impl core::fmt::Display for Mode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Mode::Strategies => write!(f, "strategy"),
            Mode::ResultMatrix => write!(f, "result matrix"),
        }
    }
}

/// A single reason a table was rejected. Lines and columns are 1-based.
#[derive(Error, Clone, Debug, PartialEq)]
pub enum Fault {
    #[error("line {line}: expected {expected} columns, found {found}")]
    WrongWidth { line: u64, expected: usize, found: usize },

    #[error("line {line}: {found} result columns for {expected} players")]
    DimensionMismatch { line: u64, expected: usize, found: usize },

    #[error("line {line}: player name is empty")]
    EmptyName { line: u64 },

    #[error("line {line}, column {column}: '{text}' is not a number")]
    NotANumber { line: u64, column: usize, text: String },

    #[error("line {line}, column {column}: probability {value} outside [0, 1]")]
    OutOfRange { line: u64, column: usize, value: f64 },
}

impl Fault {
    /// Row width disagrees with the number of players in a result table
    pub fn is_dimension_mismatch(&self) -> bool {
        matches!(self, Fault::DimensionMismatch { .. })
    }

    pub fn line(&self) -> u64 {
        match self {
            Fault::WrongWidth { line, .. }
            | Fault::DimensionMismatch { line, .. }
            | Fault::EmptyName { line }
            | Fault::NotANumber { line, .. }
            | Fault::OutOfRange { line, .. } => *line,
        }
    }
}

/// A table failed normalization. No partial player list survives.
#[derive(Error, Clone, Debug, PartialEq)]
#[error("{mode} input is faulty: {fault}")]
pub struct NormalizeError {
    pub mode: Mode,
    #[source]
    pub fault: Fault,
}

/// One of the four payoff fields
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PayoffField {
    Reward,
    Sucker,
    Temptation,
    Punishment,
}

impl core::fmt::Display for PayoffField {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            PayoffField::Reward => write!(f, "reward"),
            PayoffField::Sucker => write!(f, "sucker"),
            PayoffField::Temptation => write!(f, "temptation"),
            PayoffField::Punishment => write!(f, "punishment"),
        }
    }
}

#[derive(Error, Clone, Debug, PartialEq)]
#[error("{field} payoff '{text}' is not a number")]
pub struct PayoffError {
    pub field: PayoffField,
    pub text: String,
}

#[derive(Error, Clone, Debug, PartialEq)]
pub enum DilemmaError {
    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    #[error(transparent)]
    Payoff(#[from] PayoffError),
}

impl DilemmaError {
    /// The input block a front end should mark as faulty.
    ///
    /// Payoff fields only take part in strategy sessions, so a bad payoff
    /// marks the strategy block.
    pub fn faulty_block(&self) -> Mode {
        match self {
            DilemmaError::Normalize(e) => e.mode,
            DilemmaError::Payoff(_) => Mode::Strategies,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fault_messages_carry_position() {
        let fault = Fault::OutOfRange { line: 2, column: 3, value: 1.2 };
        assert_eq!(fault.to_string(), "line 2, column 3: probability 1.2 outside [0, 1]");
        assert_eq!(fault.line(), 2);
    }

    #[test]
    fn test_normalize_error_names_mode() {
        let err = NormalizeError {
            mode: Mode::ResultMatrix,
            fault: Fault::DimensionMismatch { line: 1, expected: 3, found: 2 },
        };
        assert!(err.to_string().starts_with("result matrix input is faulty"));
        assert!(err.fault.is_dimension_mismatch());
    }

    #[test]
    fn test_faulty_block() {
        let err: DilemmaError = PayoffError { field: PayoffField::Sucker, text: "x".into() }.into();
        assert_eq!(err.faulty_block(), Mode::Strategies);

        let err: DilemmaError = NormalizeError {
            mode: Mode::ResultMatrix,
            fault: Fault::EmptyName { line: 4 },
        }
        .into();
        assert_eq!(err.faulty_block(), Mode::ResultMatrix);
    }
}
