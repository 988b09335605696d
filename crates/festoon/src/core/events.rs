/*!
Accessibility notification handling.

Callbacks arrive with the [`ContextToken`] their subscription was registered
under. The token, not the element, says which window or application the
notification concerns: a destroyed element can no longer be queried.
*/

use super::registry::{ContextTarget, WindowCandidate};
use super::Festoon;
use crate::a11y::Notification;
use crate::platform::AccessibilityElement;
use crate::types::{ContextToken, ProcessId, WindowId};

/// What handling a notification changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
  /// A window started being tracked; its destruction subscription must be
  /// registered under `token`.
  Tracked { window: WindowId, token: ContextToken },
  Untracked(WindowId),
  FrameUpdated(WindowId),
  /// Stale token, ignored kind, rejected candidate or unknown window.
  Ignored,
}

impl Festoon {
  /// Apply one notification delivered for the subscription behind `token`.
  pub fn handle_notification<E>(
    &mut self,
    token: ContextToken,
    notification: Notification,
    element: &E,
  ) -> EventOutcome
  where
    E: AccessibilityElement + ?Sized,
  {
    let Some(target) = self.registry.resolve(token) else {
      log::trace!("Dropping {notification:?} for stale context {token}");
      return EventOutcome::Ignored;
    };

    match notification {
      Notification::WindowCreated => match target {
        ContextTarget::Application(pid) => self.window_created(pid, element),
        ContextTarget::Window(_) => EventOutcome::Ignored,
      },
      Notification::Destroyed => match target {
        ContextTarget::Window(id) => {
          if self.registry.untrack(id) {
            EventOutcome::Untracked(id)
          } else {
            EventOutcome::Ignored
          }
        }
        // Application exit is driven by the running-application list.
        ContextTarget::Application(_) => EventOutcome::Ignored,
      },
      Notification::WindowMoved | Notification::WindowResized => {
        let id = match target {
          ContextTarget::Window(id) => Some(id),
          ContextTarget::Application(_) => element.window_id(),
        };
        id.map_or(EventOutcome::Ignored, |id| self.window_changed(id, element))
      }
      Notification::Ignored(_) => EventOutcome::Ignored,
    }
  }

  fn window_created<E>(&mut self, pid: ProcessId, element: &E) -> EventOutcome
  where
    E: AccessibilityElement + ?Sized,
  {
    let Some(id) = element.window_id() else {
      return EventOutcome::Ignored;
    };
    let (ox, oy) = self.registry.origin();
    let candidate = WindowCandidate {
      id,
      role: element.role(),
      frame: element.frame().map(|f| f.relative_to(ox, oy)),
    };
    match self.registry.track(&candidate, pid) {
      Some(token) => EventOutcome::Tracked { window: id, token },
      None => EventOutcome::Ignored,
    }
  }

  fn window_changed<E>(&mut self, id: WindowId, element: &E) -> EventOutcome
  where
    E: AccessibilityElement + ?Sized,
  {
    let Some(frame) = element.frame() else {
      return EventOutcome::Ignored;
    };
    let (ox, oy) = self.registry.origin();
    if self.registry.update_frame(id, frame.relative_to(ox, oy)) {
      EventOutcome::FrameUpdated(id)
    } else {
      EventOutcome::Ignored
    }
  }
}
