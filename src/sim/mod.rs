//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Randomness only through an injected `SpawnSource`
//! - Stable obstacle order (spawn order, ids ascending)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod input;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{check_collision, in_collision_band, obstacle_hits_player};
pub use input::{Keymap, Steer, steer};
pub use spawn::{NoSpawn, ScriptedSpawner, SeededSpawner, SpawnSource};
pub use state::{GamePhase, GameState, Obstacle};
pub use tick::{TickOutcome, tick};
