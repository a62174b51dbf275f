//! Link activation routing
//!
//! Elements can carry hyperlinks; when one is activated the shell decides
//! whether to intercept it for host-side routing or let the engine perform
//! default navigation. Internal links (absolute paths or links into the
//! current origin) opened without modifier keys are intercepted; modified
//! clicks and external links fall through.

/// Keyboard modifiers held during a link activation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Ctrl held (open in new tab)
    pub ctrl: bool,
    /// Meta/Cmd held (open in new tab)
    pub meta: bool,
    /// Shift held (open in new window)
    pub shift: bool,
}

impl Modifiers {
    /// No modifiers held
    pub const NONE: Self = Self {
        ctrl: false,
        meta: false,
        shift: false,
    };

    fn any(self) -> bool {
        self.ctrl || self.meta || self.shift
    }
}

/// Disposition of an activated link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkAction {
    /// Suppress default navigation; the host routes the link itself
    Intercept,
    /// Let the engine perform default navigation
    Default,
}

/// Decide what to do with an activated link
#[must_use]
pub fn route_link(link: &str, modifiers: Modifiers, origin: &str) -> LinkAction {
    let internal = link.starts_with('/') || (!origin.is_empty() && link.contains(origin));
    if internal && !modifiers.any() {
        LinkAction::Intercept
    } else {
        LinkAction::Default
    }
}
