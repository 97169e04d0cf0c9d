//! Per-frame motion rules.
//!
//! A frame applies an ordered list of [`Rule`]s to every particle. The
//! default list, built by [`Rule::defaults`], is:
//!
//! ```ignore
//! Rule::Integrate                              // pos += vel
//! Rule::BounceEdges                            // reflect off canvas edges
//! Rule::Damping(0.995)                         // drag
//! Rule::SpeedFloor { min: 0.05 }               // never stall
//! Rule::PointerRepel { strength: 0.15 }        // push away from pointer
//! ```
//!
//! Damping keeps repeated pointer impulses from accumulating into runaway
//! speeds, and the speed floor keeps damping from bringing particles to a
//! standstill.

use glam::Vec2;

use crate::config::SimulationConfig;
use crate::input::PointerState;
use crate::particle::Particle;
use crate::spawn::SpawnContext;

/// Everything a rule may read besides the particle itself.
pub struct StepContext<'a> {
    /// Canvas size in pixels.
    pub bounds: Vec2,
    pub pointer: &'a PointerState,
    /// Random source for re-randomized velocities.
    pub spawn: &'a mut SpawnContext,
}

/// One stage of the per-particle update.
#[derive(Clone, Debug, PartialEq)]
pub enum Rule {
    /// Advance position by one frame of velocity.
    Integrate,

    /// Elastic reflection off the canvas edges.
    ///
    /// Positions are not clamped: a particle may sit briefly outside the
    /// canvas, but its velocity on that axis points back inside from the
    /// frame the crossing is detected.
    BounceEdges,

    /// Multiply velocity by this factor every frame.
    Damping(f32),

    /// Replace any velocity component whose magnitude is below `min` with a
    /// fresh value from the spawn range.
    SpeedFloor { min: f32 },

    /// Linear-falloff push away from the pointer while it is within its
    /// radius. Does nothing when the pointer is absent.
    PointerRepel { strength: f32 },
}

impl Rule {
    /// The standard rule list for a configuration.
    pub fn defaults(config: &SimulationConfig) -> Vec<Rule> {
        vec![
            Rule::Integrate,
            Rule::BounceEdges,
            Rule::Damping(config.damping),
            Rule::SpeedFloor {
                min: config.min_speed,
            },
            Rule::PointerRepel {
                strength: config.pointer_strength,
            },
        ]
    }

    pub fn apply(&self, p: &mut Particle, ctx: &mut StepContext<'_>) {
        match *self {
            Rule::Integrate => {
                p.position += p.velocity;
            }

            Rule::BounceEdges => {
                if p.position.x < 0.0 {
                    p.velocity.x = p.velocity.x.abs();
                } else if p.position.x > ctx.bounds.x {
                    p.velocity.x = -p.velocity.x.abs();
                }
                if p.position.y < 0.0 {
                    p.velocity.y = p.velocity.y.abs();
                } else if p.position.y > ctx.bounds.y {
                    p.velocity.y = -p.velocity.y.abs();
                }
            }

            Rule::Damping(factor) => {
                p.velocity *= factor;
            }

            Rule::SpeedFloor { min } => {
                if p.velocity.x.abs() < min {
                    p.velocity.x = floor_component(ctx.spawn, min);
                }
                if p.velocity.y.abs() < min {
                    p.velocity.y = floor_component(ctx.spawn, min);
                }
            }

            Rule::PointerRepel { strength } => {
                let Some(pointer) = ctx.pointer.position else {
                    return;
                };
                let radius = ctx.pointer.radius;
                let delta = pointer - p.position;
                let distance = delta.length();

                if distance < radius {
                    let force = (radius - distance) / radius;
                    let angle = delta.y.atan2(delta.x);
                    p.velocity -= Vec2::new(angle.cos(), angle.sin()) * force * strength;
                }
            }
        }
    }

    /// Whether this rule reads the pointer.
    pub fn uses_pointer(&self) -> bool {
        matches!(self, Rule::PointerRepel { .. })
    }
}

/// A spawn-range component whose magnitude is at least `min`, so the floor
/// never has to fire twice in a row for the same reason.
fn floor_component(spawn: &mut SpawnContext, min: f32) -> f32 {
    let max = spawn.spawn_speed;
    if max <= min {
        return spawn.random_velocity_component();
    }
    let magnitude = spawn.random_range(min, max);
    if spawn.random() < 0.5 {
        -magnitude
    } else {
        magnitude
    }
}

/// Run every rule, in order, on every particle.
pub fn step_all(particles: &mut [Particle], rules: &[Rule], ctx: &mut StepContext<'_>) {
    for p in particles.iter_mut() {
        for rule in rules {
            rule.apply(p, ctx);
        }
    }
}
