//! Input normalizer
//!
//! Turns a pasted table (one player per line, comma-separated cells, `#`
//! starting a trailing comment inside a cell) into a typed [`Roster`].
//! Normalization is all-or-nothing: the first faulty cell rejects the whole
//! table and no partial roster is returned.

use serde::{Deserialize, Serialize};
use crate::error::{Fault, Mode, NormalizeError};
use crate::strategy::StrategyVector;

/// Columns in a strategy row: name plus p1..p4
pub const STRATEGY_COLUMNS: usize = 5;

/// One cell after trimming and comment stripping
#[derive(Clone, Debug, PartialEq)]
pub enum Cell {
    Name(String),
    Number(f64),
    Invalid(Fault),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StrategyPlayer {
    pub name: String,
    pub strategy: StrategyVector,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResultPlayer {
    pub name: String,
    /// One payoff per opponent, self included, in roster order
    pub results: Vec<f64>,
}

/// Players of one session; a session never mixes the two kinds
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Roster {
    Strategies(Vec<StrategyPlayer>),
    ResultMatrix(Vec<ResultPlayer>),
}

impl Roster {
    pub fn mode(&self) -> Mode {
        match self {
            Roster::Strategies(_) => Mode::Strategies,
            Roster::ResultMatrix(_) => Mode::ResultMatrix,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Roster::Strategies(players) => players.len(),
            Roster::ResultMatrix(players) => players.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn names(&self) -> Vec<String> {
        match self {
            Roster::Strategies(players) => players.iter().map(|p| p.name.clone()).collect(),
            Roster::ResultMatrix(players) => players.iter().map(|p| p.name.clone()).collect(),
        }
    }
}

/// Parse a numeric cell: a plain decimal or a single `a/b` division.
///
/// Empty text and non-finite results (`1/0`, `inf`, `NaN`) are rejected.
pub fn parse_number(text: &str) -> Option<f64> {
    let value = match text.split_once('/') {
        Some((_, denominator)) if denominator.contains('/') => return None,
        Some((numerator, denominator)) => parse_plain(numerator)? / parse_plain(denominator)?,
        None => parse_plain(text)?,
    };
    value.is_finite().then_some(value)
}

fn parse_plain(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    text.parse::<f64>().ok()
}

/// Cut a cell at its first `#` and trim what is left
fn strip_comment(raw: &str) -> &str {
    raw.split_once('#').map_or(raw, |(head, _)| head).trim()
}

/// Resolve a row's cells; column 0 is the name, the rest are numbers
fn resolve_row(line: u64, cells: &[String]) -> Vec<Cell> {
    cells
        .iter()
        .enumerate()
        .map(|(i, text)| match i {
            0 if text.is_empty() => Cell::Invalid(Fault::EmptyName { line }),
            0 => Cell::Name(text.clone()),
            _ => match parse_number(text) {
                Some(value) => Cell::Number(value),
                None => Cell::Invalid(Fault::NotANumber {
                    line,
                    column: i + 1,
                    text: text.clone(),
                }),
            },
        })
        .collect()
}

/// Split resolved cells into name and numbers, surfacing the first fault
fn assemble(cells: Vec<Cell>) -> Result<(String, Vec<f64>), Fault> {
    let mut name = String::new();
    let mut numbers = Vec::with_capacity(cells.len().saturating_sub(1));
    for cell in cells {
        match cell {
            Cell::Name(text) => name = text,
            Cell::Number(value) => numbers.push(value),
            Cell::Invalid(fault) => return Err(fault),
        }
    }
    Ok((name, numbers))
}

/// Read lines and cells; each row is (1-based line, stripped cells)
fn read_rows(text: &str) -> Vec<(u64, Vec<String>)> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let body = text.trim();
    let leading = text.len() - text.trim_start().len();
    let offset = text[..leading].matches('\n').count() as u64;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(body.as_bytes());

    // valid UTF-8 from a slice with flexible widths: records cannot fail
    let mut rows = Vec::new();
    for record in reader.records().flatten() {
        let line = record
            .position()
            .map_or(rows.len() as u64 + 1, |p| p.line())
            + offset;
        let cells = record.iter().map(|c| strip_comment(c).to_string()).collect();
        rows.push((line, cells));
    }
    rows
}

/// Normalize a strategy table: `name, p1, p2, p3, p4` per line
pub fn normalize_strategies(text: &str) -> Result<Roster, NormalizeError> {
    let mode = Mode::Strategies;
    let fail = |fault| NormalizeError { mode, fault };

    let rows = read_rows(text);
    let mut players = Vec::with_capacity(rows.len());
    for (line, cells) in rows {
        if cells.len() != STRATEGY_COLUMNS {
            return Err(fail(Fault::WrongWidth {
                line,
                expected: STRATEGY_COLUMNS,
                found: cells.len(),
            }));
        }
        let (name, numbers) = assemble(resolve_row(line, &cells)).map_err(fail)?;
        let probabilities = [numbers[0], numbers[1], numbers[2], numbers[3]];
        let strategy = StrategyVector::new(probabilities).ok_or_else(|| {
            let i = numbers.iter().position(|p| !(0.0..=1.0).contains(p)).unwrap_or(0);
            fail(Fault::OutOfRange { line, column: i + 2, value: numbers[i] })
        })?;
        players.push(StrategyPlayer { name, strategy });
    }
    log::debug!("normalized {} strategy rows", players.len());
    Ok(Roster::Strategies(players))
}

/// Normalize a result table: `name, r1 .. rN` per line, N = number of lines
pub fn normalize_result_matrix(text: &str) -> Result<Roster, NormalizeError> {
    let mode = Mode::ResultMatrix;
    let fail = |fault| NormalizeError { mode, fault };

    let rows = read_rows(text);
    let count = rows.len();
    let mut players = Vec::with_capacity(count);
    for (line, cells) in rows {
        if cells.len() != count + 1 {
            return Err(fail(Fault::DimensionMismatch {
                line,
                expected: count,
                found: cells.len().saturating_sub(1),
            }));
        }
        let (name, results) = assemble(resolve_row(line, &cells)).map_err(fail)?;
        players.push(ResultPlayer { name, results });
    }
    log::debug!("normalized {} result rows", players.len());
    Ok(Roster::ResultMatrix(players))
}

pub fn normalize(text: &str, mode: Mode) -> Result<Roster, NormalizeError> {
    match mode {
        Mode::Strategies => normalize_strategies(text),
        Mode::ResultMatrix => normalize_result_matrix(text),
    }
}
