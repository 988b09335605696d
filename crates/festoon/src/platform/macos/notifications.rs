/*!
Subscription lifetimes.

A [`Registration`] owns the notifications it added and the refcon they
share; dropping it removes both. Applications additionally own their
observer's run loop source.
*/

#![allow(unsafe_code)]

use objc2_application_services::AXError;
use objc2_core_foundation::CFString;
use std::cell::RefCell;
use std::ffi::c_void;
use std::rc::{Rc, Weak};

use super::handles::{ElementHandle, ObserverHandle};
use super::mapping::notification_to_macos;
use super::observer::{create_observer, detach_observer, dispatch, free_refcon, into_refcon, CallbackContext, SharedState};
use super::util::enable_manual_accessibility;
use crate::a11y::Notification;
use crate::core::Festoon;
use crate::platform::AppSubscription;
use crate::types::{ContextToken, FestoonError, FestoonResult, ProcessId};

/// Notifications registered on one element under one context.
pub(crate) struct Registration {
  observer: ObserverHandle,
  element: ElementHandle,
  context: *mut CallbackContext,
  notifications: Vec<Notification>,
}

impl Registration {
  fn register(
    observer: &ObserverHandle,
    element: &ElementHandle,
    notifications: &[Notification],
    token: ContextToken,
    state: &Weak<RefCell<Festoon>>,
  ) -> FestoonResult<Self> {
    let context = into_refcon(token, state);

    let mut registered = Vec::with_capacity(notifications.len());
    for notification in notifications {
      let name = CFString::from_str(notification_to_macos(*notification));
      let result = unsafe {
        observer
          .inner()
          .add_notification(element.inner(), &name, context.cast::<c_void>())
      };
      if result == AXError::Success {
        registered.push(*notification);
      } else {
        log::trace!("add_notification({notification:?}) for {token}: {result:?}");
      }
    }

    if registered.is_empty() {
      free_refcon(context);
      return Err(FestoonError::ObserverError(format!(
        "no notifications accepted for {token}"
      )));
    }

    Ok(Self {
      observer: observer.clone(),
      element: element.clone(),
      context,
      notifications: registered,
    })
  }
}

impl Drop for Registration {
  fn drop(&mut self) {
    for notification in &self.notifications {
      let name = CFString::from_str(notification_to_macos(*notification));
      unsafe {
        let _ = self
          .observer
          .inner()
          .remove_notification(self.element.inner(), &name);
      }
    }
    free_refcon(self.context);
  }
}

/// Application-level registration plus the observer's run loop source.
pub(crate) struct AppSubscriptionInner {
  observer: ObserverHandle,
  _registration: Registration,
}

impl Drop for AppSubscriptionInner {
  fn drop(&mut self) {
    detach_observer(&self.observer);
  }
}

/// Subscribe to destruction of a freshly tracked window.
pub(super) fn watch_destruction(
  observer: &ObserverHandle,
  element: &ElementHandle,
  token: ContextToken,
  state: &Weak<RefCell<Festoon>>,
) -> FestoonResult<Registration> {
  Registration::register(observer, element, &Notification::WINDOW, token, state)
}

/// Start observing an application the registry just began tracking.
///
/// Windows that already exist never send `AXWindowCreated`, so each one is
/// replayed through the same path as a live notification.
pub(super) fn subscribe_application(state: &SharedState, pid: ProcessId, token: ContextToken) {
  enable_manual_accessibility(pid);

  let observer = match create_observer(pid) {
    Ok(observer) => observer,
    Err(e) => {
      log::debug!("Not observing {pid}: {e}");
      return;
    }
  };
  let app = ElementHandle::application(pid);
  let registration = match Registration::register(
    &observer,
    &app,
    &Notification::APPLICATION,
    token,
    &Rc::downgrade(state),
  ) {
    Ok(registration) => registration,
    Err(e) => {
      detach_observer(&observer);
      log::debug!("Not observing {pid}: {e}");
      return;
    }
  };

  let subscription = AppSubscription {
    _inner: AppSubscriptionInner {
      observer: observer.clone(),
      _registration: registration,
    },
  };
  match state.try_borrow_mut() {
    Ok(mut festoon) => festoon.registry_mut().attach_subscription(pid, subscription),
    Err(_) => {
      log::warn!("State busy while subscribing {pid}");
      return;
    }
  }

  for window in app.windows() {
    dispatch(state, &observer, token, Notification::WindowCreated, &window);
  }
}
