//! Frame rendering: glowing particles and proximity connections.

use crate::canvas::{Canvas2d, Glow};
use crate::config::{Rgba, VisualConfig};
use crate::particle::Particle;
use crate::profile::DeviceProfile;

/// Opacity of the line joining two particles `distance` apart.
///
/// Falls linearly from `peak` at zero distance to zero at `max_distance`.
/// Returns `None` at or beyond `max_distance`, where no line is drawn.
#[inline]
pub fn connection_opacity(distance: f32, max_distance: f32, peak: f32) -> Option<f32> {
    if distance < max_distance {
        Some((1.0 - distance / max_distance) * peak)
    } else {
        None
    }
}

/// Stateless drawer; all parameters come from the config and the profile.
#[derive(Debug, Clone)]
pub struct Renderer {
    particle_color: Rgba,
    glow_color: Rgba,
    line_color: Rgba,
    max_distance: f32,
    connection_alpha: f32,
}

/// Counts from one [`Renderer::draw`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub particles: usize,
    pub connections: usize,
}

impl Renderer {
    pub fn new(visuals: &VisualConfig) -> Self {
        Self {
            particle_color: visuals.particle_color,
            glow_color: visuals.glow_color,
            line_color: visuals.line_color,
            max_distance: visuals.max_distance,
            connection_alpha: visuals.connection_alpha,
        }
    }

    /// Clear the canvas and draw one frame.
    pub fn draw<C: Canvas2d + ?Sized>(
        &self,
        canvas: &mut C,
        particles: &[Particle],
        profile: &DeviceProfile,
    ) -> FrameStats {
        canvas.clear();

        let glow = Glow {
            blur: profile.glow_radius,
            color: self.glow_color,
        };
        let mut stats = FrameStats {
            particles: particles.len(),
            connections: 0,
        };

        for (i, particle) in particles.iter().enumerate() {
            let radius = particle.radius * profile.size_multiplier;

            // Plain fill, then the same fill again with the glow on.
            canvas.fill_circle(particle.position, radius, self.particle_color);
            canvas.set_glow(glow);
            canvas.fill_circle(particle.position, radius, self.particle_color);
            canvas.set_glow(Glow::NONE);

            for other in &particles[i + 1..] {
                let distance = particle.distance(other);
                if let Some(opacity) =
                    connection_opacity(distance, self.max_distance, self.connection_alpha)
                {
                    canvas.stroke_line(
                        particle.position,
                        other.position,
                        profile.line_width,
                        self.line_color.with_alpha(opacity),
                    );
                    stats.connections += 1;
                }
            }
        }

        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{DrawCommand, Recorder};
    use crate::config::ProfileConfig;
    use crate::profile::Viewport;
    use glam::Vec2;

    fn desktop() -> DeviceProfile {
        DeviceProfile::resolve(&Viewport::new(1200.0, 800.0), &ProfileConfig::default())
    }

    fn at(x: f32, y: f32) -> Particle {
        Particle::new(Vec2::new(x, y), Vec2::new(0.1, 0.1), 2.0)
    }

    #[test]
    fn test_opacity_is_monotonic_and_zero_at_max() {
        let mut last = f32::INFINITY;
        for d in (0..150).map(|d| d as f32) {
            let o = connection_opacity(d, 150.0, 0.8).unwrap();
            assert!(o < last || d == 0.0);
            assert!(o >= 0.0);
            last = o;
        }
        assert_eq!(connection_opacity(0.0, 150.0, 0.8), Some(0.8));
        assert_eq!(connection_opacity(150.0, 150.0, 0.8), None);
        assert_eq!(connection_opacity(151.0, 150.0, 0.8), None);
    }

    #[test]
    fn test_two_particles_one_line() {
        let renderer = Renderer::new(&VisualConfig::default());
        let mut canvas = Recorder::new(800, 600);
        let stats = renderer.draw(&mut canvas, &[at(100.0, 100.0), at(200.0, 100.0)], &desktop());

        assert_eq!(stats.connections, 1);
        let lines: Vec<_> = canvas.lines().collect();
        assert_eq!(lines.len(), 1);
        match lines[0] {
            DrawCommand::Line { color, width, .. } => {
                assert!((color.a - 0.2667).abs() < 1e-4);
                assert_eq!(*width, 2.5);
            }
            other => panic!("expected a line, got {:?}", other),
        }
    }

    #[test]
    fn test_pairs_are_unordered() {
        let renderer = Renderer::new(&VisualConfig::default());
        let mut canvas = Recorder::new(800, 600);
        let particles = [at(10.0, 10.0), at(20.0, 10.0), at(30.0, 10.0)];
        let stats = renderer.draw(&mut canvas, &particles, &desktop());
        assert_eq!(stats.connections, 3);
    }

    #[test]
    fn test_glow_reset_before_lines() {
        let renderer = Renderer::new(&VisualConfig::default());
        let mut canvas = Recorder::new(800, 600);
        renderer.draw(&mut canvas, &[at(10.0, 10.0), at(20.0, 10.0)], &desktop());

        let frame = canvas.last_frame();
        assert!(matches!(frame[0], DrawCommand::Clear { .. }));

        let mut glow_on = false;
        for command in frame {
            match command {
                DrawCommand::SetGlow(glow) => glow_on = glow.is_visible(),
                DrawCommand::Line { .. } => assert!(!glow_on),
                _ => {}
            }
        }
    }

    #[test]
    fn test_circle_size_uses_multiplier() {
        let renderer = Renderer::new(&VisualConfig::default());
        let mut canvas = Recorder::new(800, 600);
        renderer.draw(&mut canvas, &[at(10.0, 10.0)], &desktop());

        let glows: Vec<f32> = canvas
            .circles()
            .map(|c| match c {
                DrawCommand::Circle { radius, glow, .. } => {
                    assert_eq!(*radius, 3.0);
                    glow.blur
                }
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(glows, vec![0.0, 8.0]);
    }
}
