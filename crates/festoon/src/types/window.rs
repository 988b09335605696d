/*! Registry records: one per decorated window, one per observed application. */

use std::fmt;

use super::{Bounds, ContextToken, ProcessId, Vec2, WindowId};
use crate::platform::{AppSubscription, WindowWatch};

/// A window currently carrying a decoration.
///
/// `order` is the draw rank from the last reconciliation: `Some(0)` is the
/// frontmost matched window, `None` means hidden (not drawn).
pub struct TrackedWindow {
  id: WindowId,
  process_id: ProcessId,
  token: ContextToken,
  frame: Bounds,
  order: Option<u32>,
  position: Vec2,
  size: Vec2,
  watch: Option<WindowWatch>,
}

impl TrackedWindow {
  pub(crate) fn new(id: WindowId, process_id: ProcessId, token: ContextToken, frame: Bounds) -> Self {
    Self {
      id,
      process_id,
      token,
      frame,
      order: None,
      position: frame.position(),
      size: frame.size(),
      watch: None,
    }
  }

  pub const fn id(&self) -> WindowId {
    self.id
  }

  pub const fn process_id(&self) -> ProcessId {
    self.process_id
  }

  /// Token the destruction subscription was registered with.
  pub const fn token(&self) -> ContextToken {
    self.token
  }

  pub const fn frame(&self) -> Bounds {
    self.frame
  }

  pub const fn order(&self) -> Option<u32> {
    self.order
  }

  /// Cached `frame` origin, kept in sync by every frame update.
  pub const fn position(&self) -> Vec2 {
    self.position
  }

  /// Cached `frame` size, kept in sync by every frame update.
  pub const fn size(&self) -> Vec2 {
    self.size
  }

  pub const fn is_visible(&self) -> bool {
    self.order.is_some()
  }

  /// Whether a destruction subscription is attached.
  pub const fn is_watched(&self) -> bool {
    self.watch.is_some()
  }

  pub(crate) fn set_frame(&mut self, frame: Bounds) {
    self.frame = frame;
    self.position = frame.position();
    self.size = frame.size();
  }

  pub(crate) fn set_order(&mut self, order: Option<u32>) {
    self.order = order;
  }

  pub(crate) fn attach_watch(&mut self, watch: WindowWatch) {
    self.watch = Some(watch);
  }
}

impl fmt::Debug for TrackedWindow {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("TrackedWindow")
      .field("id", &self.id)
      .field("process_id", &self.process_id)
      .field("frame", &self.frame)
      .field("order", &self.order)
      .field("watched", &self.watch.is_some())
      .finish_non_exhaustive()
  }
}

/// A running application whose windows are observed.
pub struct TrackedApplication {
  process_id: ProcessId,
  token: ContextToken,
  subscription: Option<AppSubscription>,
}

impl TrackedApplication {
  pub(crate) const fn new(process_id: ProcessId, token: ContextToken) -> Self {
    Self {
      process_id,
      token,
      subscription: None,
    }
  }

  pub const fn process_id(&self) -> ProcessId {
    self.process_id
  }

  /// Token the application-level subscription was registered with.
  pub const fn token(&self) -> ContextToken {
    self.token
  }

  pub const fn is_subscribed(&self) -> bool {
    self.subscription.is_some()
  }

  pub(crate) fn attach_subscription(&mut self, subscription: AppSubscription) {
    self.subscription = Some(subscription);
  }
}

impl fmt::Debug for TrackedApplication {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("TrackedApplication")
      .field("process_id", &self.process_id)
      .field("token", &self.token)
      .field("subscribed", &self.subscription.is_some())
      .finish()
  }
}
