//! Device classification and the parameter tier it selects.

use glam::Vec2;

use crate::config::{ProfileConfig, TierConfig};

/// Host viewport metrics, in CSS/logical pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    /// Whether the host supports touch input.
    pub touch_capable: bool,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            touch_capable: false,
        }
    }

    pub fn with_touch(mut self, touch_capable: bool) -> Self {
        self.touch_capable = touch_capable;
        self
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeviceClass {
    Mobile,
    Desktop,
}

impl DeviceClass {
    /// Narrow viewports and any touch-capable device are treated as mobile.
    pub fn classify(viewport: &Viewport, breakpoint: f32) -> Self {
        if viewport.width <= breakpoint || viewport.touch_capable {
            DeviceClass::Mobile
        } else {
            DeviceClass::Desktop
        }
    }
}

/// The resolved parameter set for the current device.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DeviceProfile {
    pub class: DeviceClass,
    pub particle_count: usize,
    pub size_multiplier: f32,
    pub glow_radius: f32,
    pub line_width: f32,
}

impl DeviceProfile {
    pub fn resolve(viewport: &Viewport, config: &ProfileConfig) -> Self {
        let class = DeviceClass::classify(viewport, config.mobile_breakpoint);
        let tier = match class {
            DeviceClass::Mobile => &config.mobile,
            DeviceClass::Desktop => &config.desktop,
        };
        Self::from_tier(class, tier)
    }

    fn from_tier(class: DeviceClass, tier: &TierConfig) -> Self {
        Self {
            class,
            particle_count: tier.particle_count,
            size_multiplier: tier.size_multiplier,
            glow_radius: tier.glow_radius,
            line_width: tier.line_width,
        }
    }

    pub fn is_mobile(&self) -> bool {
        self.class == DeviceClass::Mobile
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(width: f32, touch: bool) -> DeviceProfile {
        DeviceProfile::resolve(
            &Viewport::new(width, 800.0).with_touch(touch),
            &ProfileConfig::default(),
        )
    }

    #[test]
    fn test_narrow_viewport_is_mobile() {
        let profile = resolve(500.0, false);
        assert_eq!(profile.class, DeviceClass::Mobile);
        assert_eq!(profile.particle_count, 35);
        assert_eq!(profile.size_multiplier, 1.3);
        assert_eq!(profile.glow_radius, 4.0);
        assert_eq!(profile.line_width, 1.5);
    }

    #[test]
    fn test_wide_viewport_is_desktop() {
        let profile = resolve(1200.0, false);
        assert_eq!(profile.class, DeviceClass::Desktop);
        assert_eq!(profile.particle_count, 80);
        assert_eq!(profile.size_multiplier, 1.5);
        assert_eq!(profile.glow_radius, 8.0);
        assert_eq!(profile.line_width, 2.5);
    }

    #[test]
    fn test_breakpoint_is_inclusive() {
        assert!(resolve(768.0, false).is_mobile());
        assert!(!resolve(769.0, false).is_mobile());
    }

    #[test]
    fn test_touch_forces_mobile() {
        assert!(resolve(1920.0, true).is_mobile());
    }
}
