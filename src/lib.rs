//! Road Dodge - a lane-dodging arcade mini-game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, spawning, collisions, game state)
//! - `engine`: Game loop engine owning the state and the ticker/listener lifecycle
//! - `platform`: Host abstraction (timers, key listeners, notifications)
//! - `view`: Render snapshots for the presentation layer
//! - `persistence`: Local key/value JSON storage

pub mod engine;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod view;

pub use engine::Engine;
pub use highscores::HighScores;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation tick interval (20 Hz)
    pub const TICK_INTERVAL_MS: u64 = 50;

    /// Play field bounds (both axes are percentages of the field)
    pub const FIELD_MIN: f32 = 0.0;
    pub const FIELD_MAX: f32 = 100.0;

    /// Car starts centered
    pub const PLAYER_START_X: f32 = 50.0;
    /// Lateral distance moved per key press
    pub const CAR_STEP: f32 = 5.0;

    /// Distance every obstacle falls per tick
    pub const OBSTACLE_SPEED: f32 = 3.0;
    /// Per-tick probability of spawning one obstacle
    pub const SPAWN_CHANCE: f32 = 0.05;

    /// Horizontal distance below which an obstacle touches the car
    pub const COLLISION_X_THRESHOLD: f32 = 5.0;
    /// Vertical band occupied by the car (exclusive on both ends)
    pub const COLLISION_BAND_TOP: f32 = 80.0;
    pub const COLLISION_BAND_BOTTOM: f32 = 100.0;
}

/// Clamp a lateral position to the play field
#[inline]
pub fn clamp_to_field(x: f32) -> f32 {
    x.clamp(consts::FIELD_MIN, consts::FIELD_MAX)
}
