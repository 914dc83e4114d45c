//! Fixed timestep simulation tick
//!
//! Core game loop step that advances the simulation deterministically.

use super::collision::check_collision;
use super::spawn::SpawnSource;
use super::state::{GamePhase, GameState};
use crate::consts::*;

/// What happened during one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// State was not running; nothing changed
    Idle,
    /// Simulation advanced and the car survived
    Advanced,
    /// An obstacle hit the car; phase is now `Stopped`
    Crashed { score: u64 },
}

/// Advance the game state by one fixed timestep
///
/// Order is fixed: fall, prune, spawn, score, collide. An obstacle spawned
/// this tick sits at `y = 0` and cannot collide until much later.
pub fn tick(state: &mut GameState, spawner: &mut impl SpawnSource) -> TickOutcome {
    if state.phase != GamePhase::Running {
        return TickOutcome::Idle;
    }

    for obstacle in &mut state.obstacles {
        obstacle.fall(OBSTACLE_SPEED);
    }
    state.obstacles.retain(|o| !o.is_off_field());

    // At most one spawn per tick; the x roll is only drawn when spawning
    if spawner.roll() < SPAWN_CHANCE {
        let x = spawner.roll() * FIELD_MAX;
        let id = state.spawn_obstacle(x, 0.0);
        log::trace!("Spawned obstacle {} at x={:.1}", id, x);
    }

    state.score += 1;
    state.time_ticks += 1;

    if let Some(hit) = check_collision(state) {
        log::debug!(
            "Crash with obstacle {} at ({:.1}, {:.1}), car at {:.1}",
            hit.id,
            hit.pos.x,
            hit.pos.y,
            state.player_x
        );
        state.phase = GamePhase::Stopped;
        return TickOutcome::Crashed { score: state.score };
    }

    TickOutcome::Advanced
}
