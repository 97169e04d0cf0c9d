//! Click-to-copy for contact details.

pub const COPIED_LABEL: &str = "Copied!";
/// How long the confirmation replaces the copied text.
pub const COPIED_RESTORE_MS: u32 = 2000;

/// Text to put on the clipboard for a clicked contact item, or `None` when
/// the click should follow its link as usual.
///
/// Web links (`http…`) are followed. Anything else with visible text, such
/// as a `mailto:` or `tel:` link, is copied instead. Items without an
/// `href` are left alone.
pub fn copy_target<'a>(href: Option<&str>, text: Option<&'a str>) -> Option<&'a str> {
    let text = text.filter(|t| !t.is_empty())?;
    let href = href?;
    (!href.starts_with("http")).then_some(text)
}
