//! WASM bindings for the experiment frontend

#![cfg(feature = "wasm")]

use wasm_bindgen::prelude::*;

use crate::config::ExperimentConfig;
use crate::money::Currency;
use crate::payoff::{Move, Role, Tier};
use crate::random::{Purpose, SeededRng};
use crate::settlement::settle;
use crate::treatment::resolve;
use crate::vote::{share_limit, Decision};

fn parse_config(config_json: &str) -> Result<ExperimentConfig, JsError> {
    ExperimentConfig::from_json(config_json)
        .map_err(|e| JsError::new(&format!("Invalid config: {}", e)))
}

fn parse_seed(seed: &[u8]) -> Result<[u8; 32], JsError> {
    seed.try_into()
        .map_err(|_| JsError::new("Seed must be exactly 32 bytes"))
}

/// Full 2×2 payoff matrix for one role and tier, as the instructions page
/// shows it.
///
/// Returns `[[CC, CD], [DC, DD]]` from the viewing player's side.
#[wasm_bindgen]
pub fn get_payoff_matrix(config_json: &str, cooperative: bool, high_role: bool) -> Result<JsValue, JsError> {
    let config = parse_config(config_json)?;
    let table = config.payoff_table();
    let tier = if cooperative { Tier::Cooperative } else { Tier::Base };
    let role = if high_role { Role::High } else { Role::Low };

    let mut matrix = [[0i64; 2]; 2];
    for (i, own) in [Move::Cooperate, Move::Defect].into_iter().enumerate() {
        for (j, opponent) in [Move::Cooperate, Move::Defect].into_iter().enumerate() {
            matrix[i][j] = table
                .lookup(tier, role, own, opponent)
                .map_err(|e| JsError::new(&e.to_string()))?
                .points();
        }
    }

    serde_wasm_bindgen::to_value(&matrix)
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

/// Largest purchase the vote page will accept for a given game-1 total
#[wasm_bindgen]
pub fn get_share_limit(config_json: &str, cum_payoff_game1: i64) -> Result<u32, JsError> {
    let config = parse_config(config_json)?;
    Ok(share_limit(
        Currency::new(cum_payoff_game1),
        config.cost_per_share,
        config.max_additional_shares,
    ))
}

/// Replay a group's treatment draw
///
/// # Arguments
/// * `decision` - "Yes", "No" or "Tie"
/// * `seed` - 32-byte session seed
/// * `group_index` - Index of the group in the session
/// * `vote_round` - Round the vote was held in
///
/// # Returns
/// JSON serialized Resolution
#[wasm_bindgen]
pub fn replay_treatment(
    decision: &str,
    seed: &[u8],
    group_index: u32,
    vote_round: u32,
) -> Result<JsValue, JsError> {
    let decision = match decision {
        "Yes" => Decision::Yes,
        "No" => Decision::No,
        "Tie" => Decision::Tie,
        _ => return Err(JsError::new(&format!("Unknown decision: {}", decision))),
    };
    let seed = parse_seed(seed)?;
    let mut rng = SeededRng::for_group(&seed, group_index).for_round(vote_round, Purpose::Treatment);

    serde_wasm_bindgen::to_value(&resolve(decision, &mut rng))
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

/// Final payment breakdown for the summary page
#[wasm_bindgen]
pub fn get_settlement(
    config_json: &str,
    cum_payoff_game1: i64,
    cum_payoff_game2: i64,
    additional_shares: u32,
) -> Result<JsValue, JsError> {
    let config = parse_config(config_json)?;
    let settlement = settle(
        Currency::new(cum_payoff_game1),
        Currency::new(cum_payoff_game2),
        additional_shares,
        config.cost_per_share,
    )
    .map_err(|e| JsError::new(&e.to_string()))?;

    serde_wasm_bindgen::to_value(&settlement)
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}
