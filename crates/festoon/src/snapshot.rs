/*!
Interpretation of the raw window-server list.

The platform supplies every on-screen window front to back. This module
applies the screen-capture guard, pulls out the overlay's own entry (its
origin becomes the coordinate offset for every decoration), and drops the
entries that can never be decorated.
*/

use crate::types::{Bounds, ProcessId, WindowId};

/// Window-server layer of ordinary application windows.
pub const NORMAL_WINDOW_LAYER: i32 = 0;

/// One window as reported by the window server.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotEntry {
  pub id: WindowId,
  /// Absolute screen bounds.
  pub bounds: Bounds,
  pub owner_name: String,
  pub owner_pid: ProcessId,
  pub layer: i32,
}

/// How the overlay shows up in the window list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayIdentity {
  pub process_id: ProcessId,
  /// Fallback match when the entry carries no usable pid.
  pub owner_name: String,
}

impl OverlayIdentity {
  fn matches_pid(&self, entry: &SnapshotEntry) -> bool {
    entry.owner_pid == self.process_id
  }

  fn matches_name(&self, entry: &SnapshotEntry) -> bool {
    !self.owner_name.is_empty() && entry.owner_name == self.owner_name
  }
}

/// Inputs that shape one interpretation pass.
#[derive(Debug, Clone, Copy)]
pub struct SnapshotRules<'a> {
  pub overlay: &'a OverlayIdentity,
  /// Width of the display the overlay spans, in points.
  pub display_width: f64,
  /// Frontmost owner names that suppress the frame.
  pub capture_owners: &'a [String],
}

/// Result of one window-server query.
#[derive(Debug, Clone, PartialEq)]
pub enum Snapshot {
  /// A screen-capture tool is frontmost; nothing may be drawn this frame.
  ScreenCapture,
  Windows(WindowStack),
}

/// Decoratable windows front to back, plus the overlay's own placement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WindowStack {
  overlay: Option<Bounds>,
  entries: Vec<SnapshotEntry>,
}

impl WindowStack {
  pub const fn new(overlay: Option<Bounds>, entries: Vec<SnapshotEntry>) -> Self {
    Self { overlay, entries }
  }

  /// Overlay origin that all frames are made relative to. `(0, 0)` when the
  /// overlay is not in the list.
  pub fn origin(&self) -> (f64, f64) {
    self.overlay.map_or((0.0, 0.0), |b| (b.x, b.y))
  }

  pub const fn overlay(&self) -> Option<Bounds> {
    self.overlay
  }

  /// Front to back.
  pub fn entries(&self) -> &[SnapshotEntry] {
    &self.entries
  }
}

/// Turn the raw front-to-back list into a [`Snapshot`].
pub fn interpret(raw: Vec<SnapshotEntry>, rules: &SnapshotRules<'_>) -> Snapshot {
  if let Some(front) = raw.first() {
    if rules.capture_owners.iter().any(|owner| *owner == front.owner_name) {
      return Snapshot::ScreenCapture;
    }
  }

  let mut entries = raw;
  let overlay_index = entries
    .iter()
    .position(|e| rules.overlay.matches_pid(e))
    .or_else(|| entries.iter().position(|e| rules.overlay.matches_name(e)));
  let overlay = overlay_index.map(|i| entries.remove(i).bounds);
  let (ox, oy) = overlay.map_or((0.0, 0.0), |b| (b.x, b.y));

  entries.retain(|e| {
    e.layer == NORMAL_WINDOW_LAYER
      && !e
        .bounds
        .relative_to(ox, oy)
        .outside_horizontal_extent(rules.display_width)
  });

  Snapshot::Windows(WindowStack { overlay, entries })
}

#[cfg(test)]
mod tests {
  use super::*;

  const DISPLAY_WIDTH: f64 = 1000.0;

  fn overlay() -> OverlayIdentity {
    OverlayIdentity {
      process_id: ProcessId(7),
      owner_name: "festoon".to_string(),
    }
  }

  fn capture_owners() -> Vec<String> {
    vec!["Screenshot".to_string()]
  }

  fn entry(id: u32, pid: u32, owner: &str, x: f64, w: f64) -> SnapshotEntry {
    SnapshotEntry {
      id: WindowId(id),
      bounds: Bounds::new(x, 0.0, w, 100.0),
      owner_name: owner.to_string(),
      owner_pid: ProcessId(pid),
      layer: NORMAL_WINDOW_LAYER,
    }
  }

  fn run(raw: Vec<SnapshotEntry>) -> Snapshot {
    let overlay = overlay();
    let owners = capture_owners();
    interpret(
      raw,
      &SnapshotRules {
        overlay: &overlay,
        display_width: DISPLAY_WIDTH,
        capture_owners: &owners,
      },
    )
  }

  fn stack(snapshot: Snapshot) -> WindowStack {
    match snapshot {
      Snapshot::Windows(stack) => stack,
      Snapshot::ScreenCapture => panic!("expected a window stack"),
    }
  }

  mod capture_guard {
    use super::*;

    #[test]
    fn frontmost_screenshot_suppresses_frame() {
      let raw = vec![entry(1, 99, "Screenshot", 0.0, 500.0), entry(2, 42, "Safari", 0.0, 500.0)];
      assert_eq!(run(raw), Snapshot::ScreenCapture);
    }

    #[test]
    fn screenshot_behind_other_windows_is_ignored() {
      let raw = vec![entry(2, 42, "Safari", 0.0, 500.0), entry(1, 99, "Screenshot", 0.0, 500.0)];
      assert!(matches!(run(raw), Snapshot::Windows(_)));
    }

    #[test]
    fn empty_list_is_an_empty_stack() {
      let s = stack(run(Vec::new()));
      assert!(s.entries().is_empty());
      assert_eq!(s.origin(), (0.0, 0.0));
    }
  }

  mod overlay_lookup {
    use super::*;

    #[test]
    fn overlay_found_by_pid_and_removed() {
      let mut own = entry(10, 7, "renamed", 50.0, 1000.0);
      own.bounds.y = 25.0;
      let s = stack(run(vec![own, entry(1, 42, "Safari", 0.0, 200.0)]));
      assert_eq!(s.origin(), (50.0, 25.0));
      assert_eq!(s.entries().len(), 1);
      assert_eq!(s.entries()[0].id, WindowId(1));
    }

    #[test]
    fn overlay_falls_back_to_owner_name() {
      let s = stack(run(vec![
        entry(1, 42, "Safari", 0.0, 200.0),
        entry(10, 0, "festoon", 30.0, 1000.0),
      ]));
      assert_eq!(s.origin(), (30.0, 0.0));
      assert!(s.entries().iter().all(|e| e.id != WindowId(10)));
    }

    #[test]
    fn overlay_kept_even_off_normal_layer() {
      let mut own = entry(10, 7, "festoon", 50.0, 1000.0);
      own.layer = 101;
      let s = stack(run(vec![own]));
      assert_eq!(s.overlay(), Some(Bounds::new(50.0, 0.0, 1000.0, 100.0)));
    }

    #[test]
    fn missing_overlay_means_zero_offset() {
      let s = stack(run(vec![entry(1, 42, "Safari", 10.0, 200.0)]));
      assert_eq!(s.overlay(), None);
      assert_eq!(s.origin(), (0.0, 0.0));
    }
  }

  mod entry_filtering {
    use super::*;

    #[test]
    fn non_normal_layers_are_dropped() {
      let mut menu = entry(2, 42, "Safari", 0.0, 200.0);
      menu.layer = 24;
      let s = stack(run(vec![menu, entry(1, 42, "Safari", 0.0, 200.0)]));
      assert_eq!(s.entries().len(), 1);
      assert_eq!(s.entries()[0].id, WindowId(1));
    }

    #[test]
    fn windows_beyond_display_are_dropped() {
      let s = stack(run(vec![
        entry(1, 42, "Safari", DISPLAY_WIDTH + 10.0, 200.0),
        entry(2, 42, "Safari", -400.0, 300.0),
        entry(3, 42, "Safari", 900.0, 200.0),
      ]));
      let ids: Vec<_> = s.entries().iter().map(|e| e.id).collect();
      assert_eq!(ids, vec![WindowId(3)]);
    }

    #[test]
    fn extent_is_measured_relative_to_overlay() {
      // Absolute x = 1040 is on the display once the overlay's x = 100 is removed.
      let s = stack(run(vec![
        entry(10, 7, "festoon", 100.0, DISPLAY_WIDTH),
        entry(1, 42, "Safari", 1040.0, 200.0),
      ]));
      assert_eq!(s.entries().len(), 1);
    }

    #[test]
    fn order_is_preserved() {
      let s = stack(run(vec![
        entry(3, 42, "Safari", 0.0, 200.0),
        entry(1, 43, "Notes", 0.0, 200.0),
        entry(2, 42, "Safari", 0.0, 200.0),
      ]));
      let ids: Vec<_> = s.entries().iter().map(|e| e.id.0).collect();
      assert_eq!(ids, vec![3, 1, 2]);
    }
  }
}
