/*!
`AXObserver` creation and the notification callback.

Each subscription hands the OS a boxed [`CallbackContext`] as its refcon.
The context carries the subscription's [`ContextToken`] and a weak link to
the shared state. The token is resolved through the registry on every
delivery, so a callback that races an untrack lands on a revoked token and
does nothing.
*/

#![allow(unsafe_code)]

use objc2_application_services::{AXError, AXObserver, AXUIElement};
use objc2_core_foundation::{kCFRunLoopDefaultMode, CFRetained, CFRunLoop, CFString};
use std::cell::RefCell;
use std::ffi::c_void;
use std::panic::AssertUnwindSafe;
use std::ptr::NonNull;
use std::rc::{Rc, Weak};

use super::handles::{ElementHandle, ObserverHandle};
use super::mapping::notification_from_macos;
use super::notifications::watch_destruction;
use crate::a11y::Notification;
use crate::core::{EventOutcome, Festoon};
use crate::platform::WindowWatch;
use crate::types::{ContextToken, FestoonError, FestoonResult, ProcessId};

pub(super) type SharedState = Rc<RefCell<Festoon>>;

/// Refcon payload of one subscription.
pub(super) struct CallbackContext {
  token: ContextToken,
  state: Weak<RefCell<Festoon>>,
}

pub(super) fn into_refcon(token: ContextToken, state: &Weak<RefCell<Festoon>>) -> *mut CallbackContext {
  Box::into_raw(Box::new(CallbackContext {
    token,
    state: state.clone(),
  }))
}

/// Free a refcon produced by [`into_refcon`]. Notifications using it must
/// already be removed.
pub(super) fn free_refcon(context: *mut CallbackContext) {
  if !context.is_null() {
    drop(unsafe { Box::from_raw(context) });
  }
}

/// Create an observer for `pid` and attach it to the main run loop.
#[allow(clippy::cast_possible_wrap)]
pub(super) fn create_observer(pid: ProcessId) -> FestoonResult<ObserverHandle> {
  let observer = unsafe {
    let mut observer_ptr: *mut AXObserver = std::ptr::null_mut();
    let out = NonNull::new(&raw mut observer_ptr)
      .ok_or_else(|| FestoonError::ObserverError("null out-pointer".into()))?;
    let result = AXObserver::create(pid.0 as i32, Some(observer_callback), out);
    if result != AXError::Success {
      return Err(FestoonError::ObserverError(format!(
        "AXObserverCreate failed for {pid}: {result:?}"
      )));
    }
    CFRetained::from_raw(
      NonNull::new(observer_ptr)
        .ok_or_else(|| FestoonError::ObserverError("AXObserverCreate returned null".into()))?,
    )
  };

  unsafe {
    let source = observer.run_loop_source();
    if let Some(main) = CFRunLoop::main() {
      main.add_source(Some(&source), kCFRunLoopDefaultMode);
    }
  }
  Ok(ObserverHandle::new(observer))
}

/// Take the observer's source off the main run loop.
pub(super) fn detach_observer(observer: &ObserverHandle) {
  unsafe {
    let source = observer.inner().run_loop_source();
    if let Some(main) = CFRunLoop::main() {
      main.remove_source(Some(&source), kCFRunLoopDefaultMode);
    }
  }
}

unsafe extern "C-unwind" fn observer_callback(
  observer: NonNull<AXObserver>,
  element: NonNull<AXUIElement>,
  notification: NonNull<CFString>,
  refcon: *mut c_void,
) {
  let result = std::panic::catch_unwind(AssertUnwindSafe(|| {
    if refcon.is_null() {
      return;
    }
    let name = notification.as_ref().to_string();
    let Some(notification) = notification_from_macos(&name) else {
      log::warn!("Unknown accessibility notification: {name}");
      return;
    };
    if notification.is_ignored() {
      return;
    }

    // Copy out before dispatching: handling Destroyed frees this context.
    let (token, state) = {
      let context = &*refcon.cast::<CallbackContext>();
      (context.token, context.state.clone())
    };
    let Some(state) = state.upgrade() else {
      return;
    };

    let observer = ObserverHandle::new(CFRetained::retain(observer));
    let element = ElementHandle::new(CFRetained::retain(element));
    dispatch(&state, &observer, token, notification, &element);
  }));

  if result.is_err() {
    log::warn!("Accessibility callback panicked");
  }
}

/// Apply a notification and, when it started tracking a window, subscribe
/// to that window's destruction on the same observer.
pub(super) fn dispatch(
  state: &SharedState,
  observer: &ObserverHandle,
  token: ContextToken,
  notification: Notification,
  element: &ElementHandle,
) {
  let outcome = match state.try_borrow_mut() {
    Ok(mut festoon) => festoon.handle_notification(token, notification, element),
    Err(_) => {
      log::warn!("Dropping {notification:?}: state is busy");
      return;
    }
  };

  let EventOutcome::Tracked { window, token } = outcome else {
    return;
  };
  let watch = match watch_destruction(observer, element, token, &Rc::downgrade(state)) {
    Ok(registration) => Some(WindowWatch { _inner: registration }),
    Err(e) => {
      log::debug!("No destruction watch for window {window}, untracking: {e}");
      None
    }
  };
  match state.try_borrow_mut() {
    Ok(mut festoon) => festoon.registry_mut().attach_watch(window, watch),
    Err(_) => log::warn!("Dropping watch for window {window}: state is busy"),
  }
}
