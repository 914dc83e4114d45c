//! Render snapshots
//!
//! The engine does no drawing. After every state change the presentation
//! layer captures a `Frame` and maps it onto its own elements.

use serde::Serialize;

use crate::sim::GameState;

/// Obstacle position for drawing, keyed by its stable id
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ObstacleView {
    pub id: u32,
    /// Left offset, percent of field width
    pub x: f32,
    /// Top offset, percent of field height
    pub y: f32,
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub running: bool,
    pub player_x: f32,
    pub score: u64,
    pub obstacles: Vec<ObstacleView>,
}

impl Frame {
    pub fn capture(state: &GameState) -> Self {
        Self {
            running: state.running(),
            player_x: state.player_x,
            score: state.score,
            obstacles: state
                .obstacles
                .iter()
                .map(|o| ObstacleView {
                    id: o.id,
                    x: o.pos.x,
                    y: o.pos.y,
                })
                .collect(),
        }
    }

    pub fn status_line(&self) -> String {
        format!("Score: {}", self.score)
    }
}

/// Text shown when a run ends
pub fn game_over_message(score: u64) -> String {
    format!("Game Over! Your score: {}", score)
}
