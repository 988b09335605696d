/*!
Mappings between festoon's accessibility types and macOS AX* strings.
*/

use crate::a11y::{IgnoredNotification, Notification, Role};

/// macOS notification names (kAX*Notification).
pub(super) mod ax_notification {
  pub(in super::super) const WINDOW_CREATED: &str = "AXWindowCreated";
  pub(in super::super) const DESTROYED: &str = "AXUIElementDestroyed";
  pub(in super::super) const WINDOW_MOVED: &str = "AXWindowMoved";
  pub(in super::super) const WINDOW_RESIZED: &str = "AXWindowResized";
  pub(in super::super) const APPLICATION_ACTIVATED: &str = "AXApplicationActivated";
  pub(in super::super) const APPLICATION_DEACTIVATED: &str = "AXApplicationDeactivated";
  pub(in super::super) const APPLICATION_SHOWN: &str = "AXApplicationShown";
  pub(in super::super) const APPLICATION_HIDDEN: &str = "AXApplicationHidden";
  pub(in super::super) const FOCUSED_WINDOW_CHANGED: &str = "AXFocusedWindowChanged";
}

/// macOS role names (kAX*Role).
pub(super) mod ax_role {
  pub(in super::super) const APPLICATION: &str = "AXApplication";
  pub(in super::super) const WINDOW: &str = "AXWindow";
  pub(in super::super) const SHEET: &str = "AXSheet";
  pub(in super::super) const DRAWER: &str = "AXDrawer";
  pub(in super::super) const POPOVER: &str = "AXPopover";
  pub(in super::super) const MENU: &str = "AXMenu";
}

pub(super) const fn notification_to_macos(n: Notification) -> &'static str {
  use ax_notification as ax;
  match n {
    Notification::WindowCreated => ax::WINDOW_CREATED,
    Notification::Destroyed => ax::DESTROYED,
    Notification::WindowMoved => ax::WINDOW_MOVED,
    Notification::WindowResized => ax::WINDOW_RESIZED,
    Notification::Ignored(IgnoredNotification::ApplicationActivated) => ax::APPLICATION_ACTIVATED,
    Notification::Ignored(IgnoredNotification::ApplicationDeactivated) => ax::APPLICATION_DEACTIVATED,
    Notification::Ignored(IgnoredNotification::ApplicationShown) => ax::APPLICATION_SHOWN,
    Notification::Ignored(IgnoredNotification::ApplicationHidden) => ax::APPLICATION_HIDDEN,
    Notification::Ignored(IgnoredNotification::FocusedWindowChanged) => ax::FOCUSED_WINDOW_CHANGED,
  }
}

pub(super) fn notification_from_macos(s: &str) -> Option<Notification> {
  use ax_notification as ax;
  let n = match s {
    ax::WINDOW_CREATED => Notification::WindowCreated,
    ax::DESTROYED => Notification::Destroyed,
    ax::WINDOW_MOVED => Notification::WindowMoved,
    ax::WINDOW_RESIZED => Notification::WindowResized,
    ax::APPLICATION_ACTIVATED => Notification::Ignored(IgnoredNotification::ApplicationActivated),
    ax::APPLICATION_DEACTIVATED => Notification::Ignored(IgnoredNotification::ApplicationDeactivated),
    ax::APPLICATION_SHOWN => Notification::Ignored(IgnoredNotification::ApplicationShown),
    ax::APPLICATION_HIDDEN => Notification::Ignored(IgnoredNotification::ApplicationHidden),
    ax::FOCUSED_WINDOW_CHANGED => Notification::Ignored(IgnoredNotification::FocusedWindowChanged),
    _ => return None,
  };
  Some(n)
}

pub(super) fn role_from_macos(s: &str) -> Role {
  match s {
    ax_role::APPLICATION => Role::Application,
    ax_role::WINDOW => Role::Window,
    ax_role::SHEET => Role::Sheet,
    ax_role::DRAWER => Role::Drawer,
    ax_role::POPOVER => Role::Popover,
    ax_role::MENU => Role::Menu,
    _ => Role::Unknown,
  }
}
