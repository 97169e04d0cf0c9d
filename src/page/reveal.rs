//! Reveal-on-scroll for content blocks.
//!
//! Blocks start hidden and gain the `visible` class the first time they
//! scroll into view. The class is never removed again.

/// Fraction of a block that must be on screen.
pub const REVEAL_THRESHOLD: f64 = 0.1;
/// Shrinks the viewport bottom so blocks reveal a little after they appear.
pub const REVEAL_ROOT_MARGIN: &str = "0px 0px -100px 0px";
pub const REVEALED_CLASS: &str = "visible";

/// Every block observed for reveal.
pub const REVEAL_SELECTORS: [&str; 4] = [
    "[data-animate]",
    ".project-card",
    ".skill-category",
    ".timeline-item",
];

/// Whether an intersection report should reveal its block.
pub fn should_reveal(is_intersecting: bool) -> bool {
    is_intersecting
}

/// Selector list suitable for a single `querySelectorAll` call.
pub fn reveal_selector() -> String {
    REVEAL_SELECTORS.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_covers_every_block() {
        assert_eq!(
            reveal_selector(),
            "[data-animate], .project-card, .skill-category, .timeline-item"
        );
    }

    #[test]
    fn test_only_intersecting_reveals() {
        assert!(should_reveal(true));
        assert!(!should_reveal(false));
    }
}
