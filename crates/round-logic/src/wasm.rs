//! WASM bindings for frontend round replay

#![cfg(feature = "wasm")]

use wasm_bindgen::prelude::*;

use crate::{generate_round, resolve_round, DoorName, PartnerProfile, RoundContext, SeededRng};

fn parse_door(label: &str) -> Result<DoorName, JsError> {
    label
        .parse::<DoorName>()
        .map_err(|e| JsError::new(&e))
}

fn seed_from_bytes(seed: &[u8]) -> Result<[u8; 32], JsError> {
    seed.try_into()
        .map_err(|_| JsError::new("Seed must be exactly 32 bytes"))
}

/// Generate the context a given round of a run would start with.
///
/// # Arguments
/// * `seed` - 32-byte session randomness seed
/// * `round_number` - 1-based round number (also the RNG stream index)
///
/// # Returns
/// JSON serialized RoundContext
#[wasm_bindgen]
pub fn preview_round(seed: &[u8], round_number: u32) -> Result<JsValue, JsError> {
    let seed_arr = seed_from_bytes(seed)?;
    let mut rng = SeededRng::new(&seed_arr, round_number);
    let context = generate_round(round_number, &PartnerProfile::default(), &mut rng);

    serde_wasm_bindgen::to_value(&context)
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

/// Replay one round end to end from its seed and the participant's inputs.
///
/// `player_message` and `player_door_choice` are display labels
/// (`"Door A"`..`"Door D"`).
///
/// # Returns
/// JSON serialized RoundOutcome
#[wasm_bindgen]
pub fn replay_round(
    seed: &[u8],
    round_number: u32,
    player_message: &str,
    player_door_choice: &str,
) -> Result<JsValue, JsError> {
    let seed_arr = seed_from_bytes(seed)?;
    let message = parse_door(player_message)?;
    let choice = parse_door(player_door_choice)?;

    let mut rng = SeededRng::new(&seed_arr, round_number);
    let context = generate_round(round_number, &PartnerProfile::default(), &mut rng);

    if !context.partner_doors.contains(message) {
        return Err(JsError::new(&format!("{} is not a partner door", message)));
    }
    if !context.player_doors.contains(choice) {
        return Err(JsError::new(&format!("{} is not a player door", choice)));
    }

    let outcome = resolve_round(&context, message, choice);

    serde_wasm_bindgen::to_value(&outcome)
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

/// Resolve a previously generated round context against the participant's
/// inputs.
///
/// # Arguments
/// * `context_json` - JSON serialized RoundContext (as from `preview_round`)
/// * `player_message` / `player_door_choice` - display labels
///
/// # Returns
/// JSON serialized RoundOutcome
#[wasm_bindgen]
pub fn resolve_round_json(
    context_json: &str,
    player_message: &str,
    player_door_choice: &str,
) -> Result<JsValue, JsError> {
    let context: RoundContext = serde_json::from_str(context_json)
        .map_err(|e| JsError::new(&format!("Invalid round context: {}", e)))?;
    let message = parse_door(player_message)?;
    let choice = parse_door(player_door_choice)?;

    if !context.partner_doors.contains(message) {
        return Err(JsError::new(&format!("{} is not a partner door", message)));
    }
    if !context.player_doors.contains(choice) {
        return Err(JsError::new(&format!("{} is not a player door", choice)));
    }

    let outcome = resolve_round(&context, message, choice);

    serde_wasm_bindgen::to_value(&outcome)
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}
