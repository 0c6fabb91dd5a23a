//! Navbar visibility and the mobile menu.

/// Change to apply to the navbar after a scroll event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavbarChange {
    Hide,
    Show,
    Keep,
}

/// Scroll tracker that hides the navbar while scrolling down.
#[derive(Debug, Clone)]
pub struct NavbarScroll {
    height: f64,
    last_offset: f64,
}

impl NavbarScroll {
    pub fn new(height: f64) -> Self {
        Self {
            height,
            last_offset: 0.0,
        }
    }

    pub fn on_scroll(&mut self, offset: f64) -> NavbarChange {
        let change = if offset > self.last_offset && offset > self.height {
            NavbarChange::Hide
        } else if offset < self.last_offset || offset <= 0.0 {
            NavbarChange::Show
        } else {
            NavbarChange::Keep
        };
        // Overscroll on touch devices reports negative offsets.
        self.last_offset = offset.max(0.0);
        change
    }
}

/// How the navigation links should be laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuLayout {
    /// Wide screen: links always visible, no toggle classes.
    Desktop,
    Expanded,
    Collapsed,
}

#[derive(Debug, Clone)]
pub struct MobileMenu {
    breakpoint: u32,
    expanded: bool,
}

impl MobileMenu {
    pub fn new(breakpoint: u32) -> Self {
        Self {
            breakpoint,
            expanded: false,
        }
    }

    pub fn toggle(&mut self) -> MenuLayout {
        self.expanded = !self.expanded;
        self.layout()
    }

    /// Apply a viewport width. Crossing into desktop forgets an expanded
    /// menu, so shrinking the window again starts collapsed.
    pub fn on_resize(&mut self, width: u32) -> MenuLayout {
        if width >= self.breakpoint {
            self.expanded = false;
            MenuLayout::Desktop
        } else {
            self.layout()
        }
    }

    fn layout(&self) -> MenuLayout {
        if self.expanded {
            MenuLayout::Expanded
        } else {
            MenuLayout::Collapsed
        }
    }
}
