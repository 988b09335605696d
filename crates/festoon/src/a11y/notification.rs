/*! Closed set of accessibility notifications.

Only the first four kinds drive the registry. The remaining application
lifecycle kinds are registered alongside them and dropped on arrival.
*/

/// A notification delivered by an accessibility subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Notification {
  /// A window appeared in an observed application.
  WindowCreated,
  /// The element the subscription was registered on was destroyed.
  Destroyed,
  WindowMoved,
  WindowResized,
  Ignored(IgnoredNotification),
}

/// Lifecycle notifications registered but never acted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IgnoredNotification {
  ApplicationActivated,
  ApplicationDeactivated,
  ApplicationShown,
  ApplicationHidden,
  FocusedWindowChanged,
}

impl Notification {
  /// Registered on every observed application element.
  pub const APPLICATION: [Self; 8] = [
    Self::WindowCreated,
    Self::WindowMoved,
    Self::WindowResized,
    Self::Ignored(IgnoredNotification::ApplicationActivated),
    Self::Ignored(IgnoredNotification::ApplicationDeactivated),
    Self::Ignored(IgnoredNotification::ApplicationShown),
    Self::Ignored(IgnoredNotification::ApplicationHidden),
    Self::Ignored(IgnoredNotification::FocusedWindowChanged),
  ];

  /// Registered on each tracked window element.
  pub const WINDOW: [Self; 1] = [Self::Destroyed];

  pub const fn is_ignored(self) -> bool {
    matches!(self, Self::Ignored(_))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn application_set_has_three_actionable_kinds() {
    let actionable = Notification::APPLICATION
      .iter()
      .filter(|n| !n.is_ignored())
      .count();
    assert_eq!(actionable, 3);
  }

  #[test]
  fn destruction_is_only_registered_per_window() {
    assert!(!Notification::APPLICATION.contains(&Notification::Destroyed));
    assert_eq!(Notification::WINDOW, [Notification::Destroyed]);
  }
}
