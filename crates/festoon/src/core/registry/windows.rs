/*!
Window operations for the Registry.

CRUD: `track`, `update_frame`, `untrack`, `attach_watch`
Query: `window`, `windows`, `window_ids`
Ordering: `reconcile`
*/

use super::{ContextTarget, Registry};
use crate::a11y::Role;
use crate::platform::WindowWatch;
use crate::snapshot::Snapshot;
use crate::types::{Bounds, ContextToken, ProcessId, TrackedWindow, WindowId};

/// What an accessibility element reported about a possible window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowCandidate {
  pub id: WindowId,
  pub role: Option<Role>,
  pub frame: Option<Bounds>,
}

impl Registry {
  /// Start tracking a window of a tracked application.
  ///
  /// Returns the token to register the window's destruction subscription
  /// under, or `None` when the candidate is rejected: not a window role,
  /// missing or undersized frame, unknown application, or already tracked.
  pub fn track(&mut self, candidate: &WindowCandidate, process_id: ProcessId) -> Option<ContextToken> {
    if !candidate.role.is_some_and(Role::is_window) {
      log::trace!("Ignoring {}: role {:?}", candidate.id, candidate.role);
      return None;
    }
    let Some(frame) = candidate.frame.filter(|f| self.fits(f)) else {
      log::trace!("Ignoring {}: frame {:?}", candidate.id, candidate.frame);
      return None;
    };
    if !self.applications.contains_key(&process_id) {
      log::trace!("Ignoring {}: application {process_id} not tracked", candidate.id);
      return None;
    }
    if self.windows.contains_key(&candidate.id) {
      return None;
    }

    let token = self.issue_token(ContextTarget::Window(candidate.id));
    self.windows.insert(
      candidate.id,
      TrackedWindow::new(candidate.id, process_id, token, frame),
    );
    log::debug!("Tracking window {} of {process_id}", candidate.id);
    Some(token)
  }

  fn fits(&self, frame: &Bounds) -> bool {
    !frame.is_degenerate() && frame.w > self.filter.min_width && frame.h >= self.filter.min_height
  }

  /// Attach the destruction subscription for a tracked window. Dropped
  /// immediately when the window is already gone. Without a subscription the
  /// window could never leave the registry, so `None` untracks it.
  pub(crate) fn attach_watch(&mut self, id: WindowId, watch: Option<WindowWatch>) {
    let Some(watch) = watch else {
      self.untrack(id);
      return;
    };
    if let Some(window) = self.windows.get_mut(&id) {
      window.attach_watch(watch);
    }
  }

  /// Overwrite a window's frame. No-op for unknown ids.
  pub fn update_frame(&mut self, id: WindowId, frame: Bounds) -> bool {
    let Some(window) = self.windows.get_mut(&id) else {
      return false;
    };
    window.set_frame(frame);
    true
  }

  /// Stop tracking a window. No-op for unknown ids.
  pub fn untrack(&mut self, id: WindowId) -> bool {
    let Some(window) = self.windows.remove(&id) else {
      return false;
    };
    self.revoke_token(window.token());
    log::debug!("Untracked window {id}");
    true
  }

  pub fn window(&self, id: WindowId) -> Option<&TrackedWindow> {
    self.windows.get(&id)
  }

  pub fn windows(&self) -> impl Iterator<Item = &TrackedWindow> {
    self.windows.values()
  }

  pub fn window_ids(&self) -> impl Iterator<Item = WindowId> + '_ {
    self.windows.keys().copied()
  }

  pub fn window_count(&self) -> usize {
    self.windows.len()
  }

  /// Rank tracked windows by the snapshot's front-to-back order.
  ///
  /// Matched windows get ranks 0, 1, 2, ... in traversal order and their
  /// frame replaced by the snapshot bounds relative to the overlay origin.
  /// Everything else is hidden, never removed. A screen-capture snapshot
  /// hides every window and leaves frames untouched.
  pub fn reconcile(&mut self, snapshot: &Snapshot) {
    for window in self.windows.values_mut() {
      window.set_order(None);
    }

    let Snapshot::Windows(stack) = snapshot else {
      return;
    };

    let (ox, oy) = stack.origin();
    self.origin = (ox, oy);

    let mut rank = 0;
    for entry in stack.entries() {
      let Some(window) = self.windows.get_mut(&entry.id) else {
        continue;
      };
      if window.is_visible() {
        continue;
      }
      window.set_order(Some(rank));
      window.set_frame(entry.bounds.relative_to(ox, oy));
      rank += 1;
    }
  }
}
