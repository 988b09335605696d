/*!
Seams between the tracking core and the operating system.

The macOS implementations live in `platform::macos`; tests drive the core
through in-memory fakes of the same traits.
*/

use crate::a11y::Role;
use crate::render::FramePlan;
use crate::snapshot::SnapshotEntry;
use crate::types::{Bounds, WindowId};

/// Source of the on-screen window list.
pub trait WindowServer {
  /// Every on-screen window, front to back. Empty when the query fails.
  fn window_list(&self) -> Vec<SnapshotEntry>;
}

/// The transparent, click-through surface that hosts every decoration.
pub trait OverlayHost {
  /// Bring the surface on screen and in front.
  fn show(&mut self);
  /// Take the surface off screen.
  fn hide(&mut self);
  /// Screen rectangle the surface spans, in points.
  fn frame(&self) -> Bounds;
}

/// Consumer of a frame's decoration list (the GPU side).
pub trait DecorationSurface {
  /// Draw `plan` back to front and present it. Failures are the surface's
  /// to log; a dropped frame is never fatal.
  fn draw(&mut self, plan: &FramePlan);
}

/// The element an accessibility notification refers to.
///
/// Every query may fail: the element can already be gone by the time the
/// notification is handled.
pub trait AccessibilityElement {
  fn window_id(&self) -> Option<WindowId>;
  fn role(&self) -> Option<Role>;
  /// Absolute screen frame.
  fn frame(&self) -> Option<Bounds>;
}
