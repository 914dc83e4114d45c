//! Game state and core simulation types
//!
//! Everything the presentation layer needs to draw a frame lives here.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the start control (also the state after a crash)
    #[default]
    Stopped,
    /// Loop is active: ticker and key listener are registered
    Running,
}

/// A falling obstacle (a tree on the road)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    /// Stable id for render keys, assigned in spawn order
    pub id: u32,
    /// `x` is fixed at spawn, `y` grows every tick
    pub pos: Vec2,
}

impl Obstacle {
    pub fn new(id: u32, x: f32, y: f32) -> Self {
        Self {
            id,
            pos: Vec2::new(x, y),
        }
    }

    /// Move down the field by `speed` units
    pub fn fall(&mut self, speed: f32) {
        self.pos.y += speed;
    }

    /// True once the obstacle has left the bottom of the field
    pub fn is_off_field(&self) -> bool {
        self.pos.y >= FIELD_MAX
    }
}

/// Complete game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Current phase
    pub phase: GamePhase,
    /// Car lateral position, always within [0, 100]
    pub player_x: f32,
    /// Live obstacles in spawn order
    pub obstacles: Vec<Obstacle>,
    /// Score (one point per tick survived)
    pub score: u64,
    /// Simulation tick counter for the current run
    pub time_ticks: u64,
    /// Next obstacle id
    next_id: u32,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// Create a fresh, stopped game state
    pub fn new() -> Self {
        Self {
            phase: GamePhase::Stopped,
            player_x: PLAYER_START_X,
            obstacles: Vec::new(),
            score: 0,
            time_ticks: 0,
            next_id: 1,
        }
    }

    pub fn running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    /// Reset for a new run and enter `Running`
    pub fn begin_run(&mut self) {
        self.player_x = PLAYER_START_X;
        self.obstacles.clear();
        self.score = 0;
        self.time_ticks = 0;
        self.phase = GamePhase::Running;
    }

    /// Allocate a new obstacle id
    pub fn next_obstacle_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    /// Push a new obstacle at the given position, returning its id
    pub fn spawn_obstacle(&mut self, x: f32, y: f32) -> u32 {
        let id = self.next_obstacle_id();
        self.obstacles.push(Obstacle::new(id, x, y));
        id
    }
}
