/*!
Running-application tracking.

The registry's application table follows `NSWorkspace.runningApplications`
(regular-policy apps only). Launch and terminate notifications trigger a
resync rather than being applied individually, so a missed notification
heals on the next one.
*/

#![allow(unsafe_code)]

use block2::RcBlock;
use objc2::rc::Retained;
use objc2::runtime::{AnyObject, ProtocolObject};
use objc2_app_kit::{
  NSApplicationActivationPolicy, NSWorkspace, NSWorkspaceDidLaunchApplicationNotification,
  NSWorkspaceDidTerminateApplicationNotification,
};
use objc2_foundation::{NSNotification, NSNotificationCenter, NSObjectProtocol, NSOperationQueue};
use std::panic::AssertUnwindSafe;
use std::ptr::NonNull;
use std::rc::Rc;

use super::notifications::subscribe_application;
use super::observer::SharedState;
use crate::types::ProcessId;

/// Workspace notification observers. Removed on drop.
pub(super) struct WorkspaceMonitor {
  center: Retained<NSNotificationCenter>,
  observers: Vec<Retained<ProtocolObject<dyn NSObjectProtocol>>>,
}

impl WorkspaceMonitor {
  /// Sync once, then resync on every launch and termination.
  pub(super) fn start(state: &SharedState) -> Self {
    sync(state);

    let center = NSWorkspace::sharedWorkspace().notificationCenter();
    let queue = NSOperationQueue::mainQueue();
    let names = unsafe {
      [
        NSWorkspaceDidLaunchApplicationNotification,
        NSWorkspaceDidTerminateApplicationNotification,
      ]
    };

    let observers = names
      .into_iter()
      .map(|name| {
        let state = Rc::downgrade(state);
        let block = RcBlock::new(move |_notification: NonNull<NSNotification>| {
          let Some(state) = state.upgrade() else {
            return;
          };
          if std::panic::catch_unwind(AssertUnwindSafe(|| sync(&state))).is_err() {
            log::warn!("Workspace sync panicked");
          }
        });
        unsafe { center.addObserverForName_object_queue_usingBlock(Some(name), None, Some(&queue), &block) }
      })
      .collect();

    Self { center, observers }
  }
}

impl Drop for WorkspaceMonitor {
  fn drop(&mut self) {
    for observer in &self.observers {
      let observer: &AnyObject = (**observer).as_ref();
      unsafe { self.center.removeObserver(observer) };
    }
  }
}

#[allow(clippy::cast_sign_loss)]
fn running_applications() -> Vec<ProcessId> {
  NSWorkspace::sharedWorkspace()
    .runningApplications()
    .iter()
    .filter(|app| app.activationPolicy() == NSApplicationActivationPolicy::Regular)
    .map(|app| app.processIdentifier())
    .filter(|pid| *pid > 0)
    .map(|pid| ProcessId(pid as u32))
    .collect()
}

fn sync(state: &SharedState) {
  let running = running_applications();
  let changes = match state.try_borrow_mut() {
    Ok(mut festoon) => festoon.sync_applications(&running),
    Err(_) => {
      log::warn!("State busy; skipping application sync");
      return;
    }
  };
  if !changes.added.is_empty() || !changes.removed.is_empty() {
    log::debug!(
      "Applications: +{} -{}",
      changes.added.len(),
      changes.removed.len()
    );
  }
  for (pid, token) in changes.added {
    subscribe_application(state, pid, token);
  }
}
