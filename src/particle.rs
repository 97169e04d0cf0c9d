//! The particle data unit.

use glam::Vec2;

/// One node of the network.
///
/// Particles carry no behavior; the step rules in [`crate::rules`] mutate
/// them in place and the [`crate::render::Renderer`] reads them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    /// Position in canvas pixels, origin top-left.
    pub position: Vec2,
    /// Displacement per frame, in pixels.
    pub velocity: Vec2,
    /// Base radius before the device size multiplier is applied.
    pub radius: f32,
}

impl Particle {
    pub fn new(position: Vec2, velocity: Vec2, radius: f32) -> Self {
        Self {
            position,
            velocity,
            radius,
        }
    }

    /// Euclidean distance between two particles' centers.
    #[inline]
    pub fn distance(&self, other: &Particle) -> f32 {
        self.position.distance(other.position)
    }
}
