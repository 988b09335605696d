/*! Element roles relevant to window tracking. */

/// Accessibility role of an element, reduced to what the tracker cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
  Application,
  /// A top-level window; the only role that is ever decorated.
  Window,
  Sheet,
  Drawer,
  Popover,
  Menu,
  Unknown,
}

impl Role {
  pub const fn is_window(self) -> bool {
    matches!(self, Self::Window)
  }
}
