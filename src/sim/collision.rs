//! Collision detection between the car and falling obstacles
//!
//! The car sits at a fixed height near the bottom of the field, so contact is
//! an axis-aligned test: close enough horizontally and inside the car's band.

use super::state::{GameState, Obstacle};
use crate::consts::*;

/// True if `y` lies strictly inside the car's vertical band
#[inline]
pub fn in_collision_band(y: f32) -> bool {
    y > COLLISION_BAND_TOP && y < COLLISION_BAND_BOTTOM
}

/// Check a single obstacle against the car position
pub fn obstacle_hits_player(obstacle: &Obstacle, player_x: f32) -> bool {
    (obstacle.pos.x - player_x).abs() < COLLISION_X_THRESHOLD && in_collision_band(obstacle.pos.y)
}

/// Returns the first obstacle touching the car, if any
pub fn check_collision(state: &GameState) -> Option<&Obstacle> {
    state
        .obstacles
        .iter()
        .find(|obs| obstacle_hits_player(obs, state.player_x))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_inside_band_and_threshold() {
        let obs = Obstacle::new(1, 52.0, 90.0);
        assert!(obstacle_hits_player(&obs, 50.0));
    }

    #[test]
    fn test_miss_above_band() {
        // Within horizontal threshold but still above the car
        let obs = Obstacle::new(1, 52.0, 70.0);
        assert!(!obstacle_hits_player(&obs, 50.0));
    }

    #[test]
    fn test_band_is_exclusive() {
        assert!(!in_collision_band(80.0));
        assert!(in_collision_band(80.5));
        assert!(in_collision_band(99.9));
        assert!(!in_collision_band(100.0));
    }

    #[test]
    fn test_horizontal_threshold_is_exclusive() {
        assert!(!obstacle_hits_player(&Obstacle::new(1, 55.0, 90.0), 50.0));
        assert!(obstacle_hits_player(&Obstacle::new(1, 45.5, 90.0), 50.0));
    }

    #[test]
    fn test_any_obstacle_triggers() {
        let mut state = GameState::new();
        state.spawn_obstacle(10.0, 90.0);
        state.spawn_obstacle(20.0, 10.0);
        assert!(check_collision(&state).is_none());

        let id = state.spawn_obstacle(48.0, 85.0);
        assert_eq!(check_collision(&state).map(|o| o.id), Some(id));
    }
}
