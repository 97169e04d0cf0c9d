//! Tunable parameters for the backdrop and the page effects.
//!
//! Every value has a default matching the behavior of the live site, so an
//! empty JSON object (`{}`) is a complete configuration. Configurations can
//! be round-tripped through JSON with [`BackdropConfig::load`] and
//! [`BackdropConfig::save`].
//!
//! ```ignore
//! let mut config = BackdropConfig::default();
//! config.simulation.pointer_strength = 0.3;
//! config.save("backdrop.json")?;
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::ConfigError;

/// An RGBA color with straight (non-premultiplied) alpha, channels in 0.0-1.0.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Build a color from 8-bit channels and a float alpha, like CSS `rgba()`.
    pub fn from_rgb8(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, a)
    }

    /// Same color with a different alpha.
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// CSS representation, e.g. `rgba(0, 217, 255, 0.95)`.
    pub fn to_css(self) -> String {
        format!(
            "rgba({}, {}, {}, {})",
            (self.r * 255.0).round() as u8,
            (self.g * 255.0).round() as u8,
            (self.b * 255.0).round() as u8,
            self.a
        )
    }
}

/// Visual and population parameters for one device class.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TierConfig {
    pub particle_count: usize,
    /// Multiplier applied to each particle's radius when drawing.
    pub size_multiplier: f32,
    /// Shadow blur used for the glow pass.
    pub glow_radius: f32,
    /// Stroke width of connection lines.
    pub line_width: f32,
}

/// Device classification thresholds and the two tiers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    /// Viewports at or below this width (in CSS pixels) count as mobile.
    pub mobile_breakpoint: f32,
    pub mobile: TierConfig,
    pub desktop: TierConfig,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            mobile_breakpoint: 768.0,
            mobile: TierConfig {
                particle_count: 35,
                size_multiplier: 1.3,
                glow_radius: 4.0,
                line_width: 1.5,
            },
            desktop: TierConfig {
                particle_count: 80,
                size_multiplier: 1.5,
                glow_radius: 8.0,
                line_width: 2.5,
            },
        }
    }
}

/// Per-frame motion parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Multiplicative velocity decay applied every frame.
    pub damping: f32,
    /// Velocity components below this magnitude are re-randomized.
    pub min_speed: f32,
    /// Half-width of the spawn velocity range, per axis.
    pub spawn_speed: f32,
    /// Radius range of spawned particles, `[min, max)`.
    pub min_radius: f32,
    pub max_radius: f32,
    /// Radius of the pointer's influence.
    pub pointer_radius: f32,
    /// Scale of the pointer's repulsion impulse.
    pub pointer_strength: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            damping: 0.995,
            min_speed: 0.05,
            spawn_speed: 0.1,
            min_radius: 1.0,
            max_radius: 3.0,
            pointer_radius: 150.0,
            pointer_strength: 0.15,
        }
    }
}

/// Colors and connection parameters used by the renderer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualConfig {
    pub particle_color: Rgba,
    pub glow_color: Rgba,
    /// Line RGB; alpha is computed per connection.
    pub line_color: Rgba,
    /// Pairs closer than this are connected.
    pub max_distance: f32,
    /// Opacity of a connection between two coincident particles.
    pub connection_alpha: f32,
    /// Clear color of the native window. The web canvas clears to transparent.
    pub background: Rgba,
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self {
            particle_color: Rgba::from_rgb8(0, 217, 255, 0.95),
            glow_color: Rgba::from_rgb8(0, 217, 255, 0.8),
            line_color: Rgba::from_rgb8(0, 217, 255, 1.0),
            max_distance: 150.0,
            connection_alpha: 0.8,
            background: Rgba::from_rgb8(10, 14, 39, 1.0),
        }
    }
}

/// Hero typing animation settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypingConfig {
    pub phrases: Vec<String>,
    pub type_delay_ms: u64,
    pub delete_delay_ms: u64,
    /// Pause after a phrase is fully typed.
    pub hold_delay_ms: u64,
    /// Pause after a phrase is fully deleted.
    pub next_delay_ms: u64,
}

impl Default for TypingConfig {
    fn default() -> Self {
        Self {
            phrases: [
                "ML Engineer",
                "Deep Learning Researcher",
                "LLM & GenAI Developer",
                "Data Pipeline Architect",
                "DevOps Specialist",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            type_delay_ms: 100,
            delete_delay_ms: 50,
            hold_delay_ms: 2000,
            next_delay_ms: 500,
        }
    }
}

/// Complete configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackdropConfig {
    pub profile: ProfileConfig,
    pub simulation: SimulationConfig,
    pub visuals: VisualConfig,
    pub typing: TypingConfig,
    /// Treat the device as touch capable regardless of events seen.
    pub touch: bool,
    /// Honor a reduced-motion preference (logged; animations keep running).
    pub reduced_motion: bool,
}

impl BackdropConfig {
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make the simulation degenerate.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sim = &self.simulation;
        if !(0.0..=1.0).contains(&sim.damping) {
            return Err(ConfigError::Invalid(format!(
                "damping must be within 0.0..=1.0, got {}",
                sim.damping
            )));
        }
        if sim.spawn_speed <= sim.min_speed {
            return Err(ConfigError::Invalid(format!(
                "spawn_speed ({}) must exceed min_speed ({})",
                sim.spawn_speed, sim.min_speed
            )));
        }
        if sim.max_radius <= sim.min_radius {
            return Err(ConfigError::Invalid(
                "max_radius must exceed min_radius".into(),
            ));
        }
        if sim.pointer_radius <= 0.0 || self.visuals.max_distance <= 0.0 {
            return Err(ConfigError::Invalid(
                "pointer_radius and max_distance must be positive".into(),
            ));
        }
        if self.typing.phrases.iter().all(|p| p.is_empty()) {
            return Err(ConfigError::Invalid(
                "typing needs at least one non-empty phrase".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_is_default() {
        let config: BackdropConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, BackdropConfig::default());
    }

    #[test]
    fn test_partial_json_keeps_other_defaults() {
        let config: BackdropConfig =
            serde_json::from_str(r#"{ "simulation": { "pointer_strength": 0.3 } }"#).unwrap();
        assert_eq!(config.simulation.pointer_strength, 0.3);
        assert_eq!(config.simulation.damping, 0.995);
        assert_eq!(config.profile.desktop.particle_count, 80);
    }

    #[test]
    fn test_save_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("backdrop.json");

        let mut config = BackdropConfig::default();
        config.touch = true;
        config.profile.mobile.particle_count = 20;
        config.save(&path).unwrap();

        let loaded = BackdropConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_validate_rejects_stalling_floor() {
        let mut config = BackdropConfig::default();
        config.simulation.min_speed = 0.2;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_css_color() {
        assert_eq!(
            VisualConfig::default().particle_color.to_css(),
            "rgba(0, 217, 255, 0.95)"
        );
    }
}
