//! Steering input
//!
//! Two logical commands move the car. Physical keys are mapped through a
//! `Keymap`; anything unmapped is ignored.

use serde::{Deserialize, Serialize};

use super::state::GameState;
use crate::clamp_to_field;
use crate::consts::CAR_STEP;

/// Logical steering command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Steer {
    Left,
    Right,
}

/// Maps `KeyboardEvent.key` names to steering commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Keymap {
    /// Also accept `a` / `d`
    pub alternate_keys: bool,
}

impl Keymap {
    pub fn steer_for(&self, key: &str) -> Option<Steer> {
        match key {
            "ArrowLeft" => Some(Steer::Left),
            "ArrowRight" => Some(Steer::Right),
            "a" | "A" if self.alternate_keys => Some(Steer::Left),
            "d" | "D" if self.alternate_keys => Some(Steer::Right),
            _ => None,
        }
    }
}

/// Apply one steering command, reading the current position (never a stale copy)
pub fn steer(state: &mut GameState, command: Steer) {
    let delta = match command {
        Steer::Left => -CAR_STEP,
        Steer::Right => CAR_STEP,
    };
    state.player_x = clamp_to_field(state.player_x + delta);
}
