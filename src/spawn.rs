//! Spawn context for particle initialization.
//!
//! Owns the random source used both when the collection is (re)built and when
//! the speed floor needs a fresh velocity component, so a seeded context
//! makes an entire run reproducible.

use glam::Vec2;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::config::SimulationConfig;
use crate::particle::Particle;

/// Random source plus the spawn ranges it draws from.
///
/// ```ignore
/// let mut ctx = SpawnContext::with_seed(&config.simulation, 7);
/// let particles = ctx.spawn_many(80, Vec2::new(1280.0, 720.0));
/// ```
#[derive(Debug, Clone)]
pub struct SpawnContext {
    /// Half-width of the per-axis velocity range.
    pub spawn_speed: f32,
    pub min_radius: f32,
    pub max_radius: f32,
    rng: SmallRng,
}

impl SpawnContext {
    /// Create a context seeded from the operating system's entropy source.
    pub fn new(config: &SimulationConfig) -> Self {
        Self::from_rng(config, SmallRng::from_entropy())
    }

    /// Create a deterministic context.
    pub fn with_seed(config: &SimulationConfig, seed: u64) -> Self {
        Self::from_rng(config, SmallRng::seed_from_u64(seed))
    }

    fn from_rng(config: &SimulationConfig, rng: SmallRng) -> Self {
        Self {
            spawn_speed: config.spawn_speed,
            min_radius: config.min_radius,
            max_radius: config.max_radius,
            rng,
        }
    }

    // ========== Random primitives ==========

    /// Random f32 between 0.0 and 1.0.
    #[inline]
    pub fn random(&mut self) -> f32 {
        self.rng.gen()
    }

    /// Random f32 in `[min, max)`.
    #[inline]
    pub fn random_range(&mut self, min: f32, max: f32) -> f32 {
        self.rng.gen_range(min..max)
    }

    // ========== Particle helpers ==========

    /// Random point inside a `size.x` by `size.y` canvas.
    ///
    /// A zero-sized axis yields 0.0 on that axis instead of panicking.
    pub fn random_position(&mut self, size: Vec2) -> Vec2 {
        Vec2::new(self.random() * size.x, self.random() * size.y)
    }

    /// One velocity component from the spawn range `[-spawn_speed, spawn_speed)`.
    #[inline]
    pub fn random_velocity_component(&mut self) -> f32 {
        (self.random() - 0.5) * 2.0 * self.spawn_speed
    }

    pub fn random_velocity(&mut self) -> Vec2 {
        Vec2::new(
            self.random_velocity_component(),
            self.random_velocity_component(),
        )
    }

    pub fn random_radius(&mut self) -> f32 {
        self.random_range(self.min_radius, self.max_radius)
    }

    /// A fresh particle anywhere on a canvas of the given size.
    pub fn spawn(&mut self, size: Vec2) -> Particle {
        Particle::new(
            self.random_position(size),
            self.random_velocity(),
            self.random_radius(),
        )
    }

    pub fn spawn_many(&mut self, count: usize, size: Vec2) -> Vec<Particle> {
        (0..count).map(|_| self.spawn(size)).collect()
    }
}
