//! WASM bindings for the browser front end

#![cfg(feature = "wasm")]

use wasm_bindgen::prelude::*;
use crate::{compute, run_playout, SessionReport};
use crate::{DilemmaError, Mode, PayoffParameters, PlayoutConfig, StrategyBase, StrategyVector};

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsError> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

/// Compute a strategy session from the textarea and the four payoff fields.
///
/// Returns a `SessionReport`: `{block, faulty, error?, outcome?}`.
/// Never throws for bad input; the report marks the faulty block.
#[wasm_bindgen]
pub fn compute_strategies(
    text: &str,
    reward: &str,
    sucker: &str,
    temptation: &str,
    punishment: &str,
) -> Result<JsValue, JsError> {
    let result = PayoffParameters::parse(reward, sucker, temptation, punishment)
        .map_err(DilemmaError::from)
        .and_then(|payoffs| compute(text, Mode::Strategies, &payoffs));
    to_js(&SessionReport::new(Mode::Strategies, result))
}

/// Compute a session from a hand-written result matrix
#[wasm_bindgen]
pub fn compute_result_matrix(text: &str) -> Result<JsValue, JsError> {
    let result = compute(text, Mode::ResultMatrix, &PayoffParameters::default());
    to_js(&SessionReport::new(Mode::ResultMatrix, result))
}

#[derive(serde::Serialize)]
struct PresetInfo {
    id: &'static str,
    name: &'static str,
    payoffs: PayoffParameters,
}

/// Named payoff presets for the payoff form buttons
#[wasm_bindgen]
pub fn payoff_presets() -> Result<JsValue, JsError> {
    let presets = [
        PresetInfo { id: "standard", name: "Standard", payoffs: PayoffParameters::standard() },
        PresetInfo {
            id: "traditional",
            name: "Traditional",
            payoffs: PayoffParameters::traditional(),
        },
    ];
    to_js(&presets)
}

#[derive(serde::Serialize)]
struct StrategyInfo {
    id: String,
    name: &'static str,
    description: &'static str,
    probabilities: [f64; 4],
}

/// Classic memory-one strategies for the "insert example" menu
#[wasm_bindgen]
pub fn get_strategy_types() -> Result<JsValue, JsError> {
    let types: Vec<StrategyInfo> = StrategyBase::ALL
        .iter()
        .map(|base| StrategyInfo {
            id: format!("{:?}", base),
            name: base.name(),
            description: base.describe(),
            probabilities: base.probabilities(),
        })
        .collect();
    to_js(&types)
}

/// Replay a short match between two strategy vectors
///
/// # Arguments
/// * `x_json` / `y_json` - JSON arrays of four cooperation probabilities
/// * `payoffs_json` - JSON serialized PayoffParameters
/// * `seed` - 32-byte seed
/// * `rounds` - Number of rounds to play and record
///
/// # Returns
/// JSON serialized PlayoutResult
#[wasm_bindgen]
pub fn replay_playout(
    x_json: &str,
    y_json: &str,
    payoffs_json: &str,
    seed: &[u8],
    rounds: u32,
) -> Result<JsValue, JsError> {
    let x: StrategyVector = serde_json::from_str(x_json)
        .map_err(|e| JsError::new(&format!("Invalid strategy X: {}", e)))?;
    let y: StrategyVector = serde_json::from_str(y_json)
        .map_err(|e| JsError::new(&format!("Invalid strategy Y: {}", e)))?;
    let payoffs: PayoffParameters = serde_json::from_str(payoffs_json)
        .map_err(|e| JsError::new(&format!("Invalid payoffs: {}", e)))?;

    let seed_arr: [u8; 32] = seed.try_into()
        .map_err(|_| JsError::new("Seed must be exactly 32 bytes"))?;

    let result = run_playout(&x, &y, &payoffs, &seed_arr, &PlayoutConfig::replay(rounds));
    to_js(&result)
}
