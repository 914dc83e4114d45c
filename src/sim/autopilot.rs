//! Idle/demo mode steering
//!
//! A simple heuristic that keeps the car alive for attract-mode and headless
//! runs. It never touches state; it only suggests the next command.

use super::input::Steer;
use super::state::{GameState, Obstacle};
use crate::consts::*;

/// Obstacles this close horizontally are treated as in our lane
const DANGER_LANE: f32 = 2.0 * COLLISION_X_THRESHOLD + CAR_STEP;
/// Ignore obstacles still high up the field
const LOOKAHEAD_TOP: f32 = 40.0;

/// Pick a steering command for this tick, or `None` to hold position
pub fn choose_steer(state: &GameState) -> Option<Steer> {
    let threat = most_urgent_threat(state)?;
    let dx = state.player_x - threat.pos.x;

    // Pinned against a wall: the only way out is back across
    if state.player_x <= FIELD_MIN {
        return Some(Steer::Right);
    }
    if state.player_x >= FIELD_MAX {
        return Some(Steer::Left);
    }

    if dx > 0.0 {
        Some(Steer::Right)
    } else if dx < 0.0 {
        Some(Steer::Left)
    } else if state.player_x < (FIELD_MIN + FIELD_MAX) / 2.0 {
        // Dead center on the threat: dodge toward the wider side
        Some(Steer::Right)
    } else {
        Some(Steer::Left)
    }
}

/// The lowest obstacle in our lane that has not yet passed the car
fn most_urgent_threat(state: &GameState) -> Option<&Obstacle> {
    state
        .obstacles
        .iter()
        .filter(|o| o.pos.y >= LOOKAHEAD_TOP && o.pos.y < COLLISION_BAND_BOTTOM)
        .filter(|o| (o.pos.x - state.player_x).abs() < DANGER_LANE)
        .max_by(|a, b| {
            a.pos
                .y
                .partial_cmp(&b.pos.y)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
}
