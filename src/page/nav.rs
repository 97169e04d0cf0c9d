//! Open/closed state of the collapsible mobile navigation menu.

/// Key that closes the menu from anywhere on the page.
pub const CLOSE_KEY: &str = "Escape";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavMenu {
    open: bool,
}

impl NavMenu {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// The hamburger button was pressed.
    pub fn toggle(&mut self) -> bool {
        self.open = !self.open;
        self.open
    }

    /// A menu link was followed.
    pub fn close(&mut self) -> bool {
        self.open = false;
        self.open
    }

    /// A click landed somewhere on the document. Clicks on the toggle or
    /// inside the menu leave it alone; anything else closes it.
    pub fn on_document_click(&mut self, inside_toggle: bool, inside_menu: bool) -> bool {
        if !inside_toggle && !inside_menu {
            self.open = false;
        }
        self.open
    }

    pub fn on_key(&mut self, key: &str) -> bool {
        if key == CLOSE_KEY {
            self.open = false;
        }
        self.open
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_and_link_close() {
        let mut menu = NavMenu::new();
        assert!(!menu.is_open());
        assert!(menu.toggle());
        assert!(!menu.toggle());
        menu.toggle();
        assert!(!menu.close());
        assert!(!menu.close());
    }

    #[test]
    fn test_outside_click_closes() {
        let mut menu = NavMenu::new();
        menu.toggle();
        assert!(menu.on_document_click(true, false));
        assert!(menu.on_document_click(false, true));
        assert!(!menu.on_document_click(false, false));
    }

    #[test]
    fn test_only_escape_closes() {
        let mut menu = NavMenu::new();
        menu.toggle();
        assert!(menu.on_key("Enter"));
        assert!(menu.on_key("escape"));
        assert!(!menu.on_key("Escape"));
    }
}
