//! Random sources for obstacle spawning
//!
//! The tick never touches a global RNG. Each engine owns a `SpawnSource`, so
//! tests can swap in a scripted or silent source.

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// A source of uniform samples in `[0, 1)`
pub trait SpawnSource {
    fn roll(&mut self) -> f32;
}

/// Seeded PCG32 source (the production spawner)
#[derive(Debug, Clone)]
pub struct SeededSpawner {
    rng: Pcg32,
}

impl SeededSpawner {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }
}

impl SpawnSource for SeededSpawner {
    fn roll(&mut self) -> f32 {
        self.rng.random::<f32>()
    }
}

/// Never spawns (every roll is 1.0, above any spawn chance)
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSpawn;

impl SpawnSource for NoSpawn {
    fn roll(&mut self) -> f32 {
        1.0
    }
}

/// Replays a fixed list of samples, then behaves like `NoSpawn`
#[derive(Debug, Clone, Default)]
pub struct ScriptedSpawner {
    rolls: VecDeque<f32>,
}

impl ScriptedSpawner {
    pub fn new(rolls: impl IntoIterator<Item = f32>) -> Self {
        Self {
            rolls: rolls.into_iter().collect(),
        }
    }

    /// Samples not yet consumed
    pub fn remaining(&self) -> usize {
        self.rolls.len()
    }
}

impl SpawnSource for ScriptedSpawner {
    fn roll(&mut self) -> f32 {
        self.rolls.pop_front().unwrap_or(1.0)
    }
}
