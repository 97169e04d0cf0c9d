//! Scroll-driven page effects, project-card hover and the section-title
//! hue cycle.

/// Navbar switches to its compact style past this scroll offset.
pub const NAVBAR_THRESHOLD: f32 = 100.0;
/// The back-to-top button shows past this scroll offset.
pub const BACK_TO_TOP_THRESHOLD: f32 = 500.0;
const PARALLAX_FACTOR: f32 = 0.3;
/// Scroll distance over which the hero fades out completely.
const PARALLAX_FADE: f32 = 700.0;
/// A section becomes active this far before its top reaches the viewport top.
const ACTIVE_SECTION_LEAD: f32 = 200.0;
/// Height of the fixed navbar, kept clear when jumping to an anchor.
const ANCHOR_OFFSET: f32 = 80.0;
/// Interval between title hue steps.
pub const HUE_TICK_MS: u32 = 50;

/// Everything derived from the vertical scroll offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollEffects {
    pub navbar_scrolled: bool,
    pub back_to_top_visible: bool,
    /// Hero content translation in pixels.
    pub hero_offset: f32,
    pub hero_opacity: f32,
}

impl ScrollEffects {
    pub fn at(scroll_y: f32) -> Self {
        Self {
            navbar_scrolled: scroll_y > NAVBAR_THRESHOLD,
            back_to_top_visible: scroll_y > BACK_TO_TOP_THRESHOLD,
            hero_offset: scroll_y * PARALLAX_FACTOR,
            hero_opacity: (1.0 - scroll_y / PARALLAX_FADE).clamp(0.0, 1.0),
        }
    }

    pub fn hero_transform(&self) -> String {
        format!("translateY({}px)", self.hero_offset)
    }
}

/// Id of the last section (in document order) whose top is at or above
/// `scroll_y + 200`.
pub fn active_section<'a, I>(sections: I, scroll_y: f32) -> Option<&'a str>
where
    I: IntoIterator<Item = (&'a str, f32)>,
{
    sections
        .into_iter()
        .filter(|(_, top)| scroll_y >= top - ACTIVE_SECTION_LEAD)
        .last()
        .map(|(id, _)| id)
}

/// Scroll position that brings a section at `offset_top` just below the navbar.
pub fn smooth_scroll_target(offset_top: f32) -> f32 {
    offset_top - ANCHOR_OFFSET
}

const CARD_HOVER_TRANSFORM: &str = "translateY(-8px) scale(1.02)";
const CARD_REST_TRANSFORM: &str = "translateY(0) scale(1)";

/// Inline transform for a project card: lifted and slightly enlarged under
/// the pointer.
pub fn card_transform(hovered: bool) -> &'static str {
    if hovered {
        CARD_HOVER_TRANSFORM
    } else {
        CARD_REST_TRANSFORM
    }
}

/// Hue of the animated section-title gradient.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TitleHue {
    hue: u16,
}

impl TitleHue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance one degree, wrapping at 360.
    pub fn tick(&mut self) -> u16 {
        self.hue = (self.hue + 1) % 360;
        self.hue
    }

    pub fn gradient(&self) -> String {
        let stop = |offset: u16| (self.hue + offset) % 360;
        format!(
            "linear-gradient(135deg, hsl({}, 100%, 60%) 0%, hsl({}, 100%, 60%) 50%, hsl({}, 100%, 60%) 100%)",
            self.hue,
            stop(60),
            stop(120)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thresholds_are_exclusive() {
        let top = ScrollEffects::at(0.0);
        assert!(!top.navbar_scrolled);
        assert!(!top.back_to_top_visible);
        assert_eq!(top.hero_opacity, 1.0);

        assert!(!ScrollEffects::at(100.0).navbar_scrolled);
        assert!(ScrollEffects::at(101.0).navbar_scrolled);
        assert!(!ScrollEffects::at(500.0).back_to_top_visible);
        assert!(ScrollEffects::at(501.0).back_to_top_visible);
    }

    #[test]
    fn test_parallax() {
        let effects = ScrollEffects::at(350.0);
        assert_eq!(effects.hero_transform(), "translateY(105px)");
        assert!((effects.hero_opacity - 0.5).abs() < 1e-6);
        assert_eq!(ScrollEffects::at(2000.0).hero_opacity, 0.0);
    }

    #[test]
    fn test_active_section_picks_last_reached() {
        let sections = [("home", 0.0), ("about", 800.0), ("projects", 1600.0)];
        assert_eq!(active_section(sections, 0.0), Some("home"));
        assert_eq!(active_section(sections, 599.0), Some("home"));
        assert_eq!(active_section(sections, 600.0), Some("about"));
        assert_eq!(active_section(sections, 5000.0), Some("projects"));
        assert_eq!(active_section([("late", 900.0)], 0.0), None);
    }

    #[test]
    fn test_smooth_scroll_clears_navbar() {
        assert_eq!(smooth_scroll_target(1000.0), 920.0);
    }

    #[test]
    fn test_card_lift() {
        assert_eq!(card_transform(true), "translateY(-8px) scale(1.02)");
        assert_eq!(card_transform(false), "translateY(0) scale(1)");
    }

    #[test]
    fn test_hue_wraps_and_builds_gradient() {
        let mut hue = TitleHue { hue: 358 };
        assert_eq!(hue.tick(), 359);
        assert_eq!(hue.tick(), 0);

        let mut hue = TitleHue { hue: 299 };
        hue.tick();
        assert_eq!(
            hue.gradient(),
            "linear-gradient(135deg, hsl(300, 100%, 60%) 0%, hsl(0, 100%, 60%) 50%, hsl(60, 100%, 60%) 100%)"
        );
    }
}
