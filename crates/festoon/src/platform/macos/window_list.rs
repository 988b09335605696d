/*! Window enumeration via `CGWindowListCopyWindowInfo`. */

#![allow(unsafe_code)]
#![allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]

use objc2_core_foundation::{CFArray, CFDictionary};
use objc2_core_graphics::{kCGNullWindowID, CGWindowListCopyWindowInfo, CGWindowListOption};

use super::cf_utils::WindowInfo;
use crate::platform::WindowServer;
use crate::snapshot::SnapshotEntry;
use crate::types::{Bounds, ProcessId, WindowId};

/// The window server, queried fresh each frame.
#[derive(Debug, Clone, Copy, Default)]
pub(super) struct MacWindowServer;

impl WindowServer for MacWindowServer {
  fn window_list(&self) -> Vec<SnapshotEntry> {
    // CG hands back autoreleased objects; drain them every frame.
    objc2::rc::autoreleasepool(|_pool| list_windows())
  }
}

fn list_windows() -> Vec<SnapshotEntry> {
  let option = CGWindowListOption::OptionOnScreenOnly | CGWindowListOption::ExcludeDesktopElements;
  let Some(list) = CGWindowListCopyWindowInfo(option, kCGNullWindowID) else {
    log::trace!("CGWindowListCopyWindowInfo returned nothing");
    return Vec::new();
  };

  let count = CFArray::count(&list);
  let mut entries = Vec::with_capacity(count.max(0) as usize);
  for idx in 0..count {
    let raw = unsafe { CFArray::value_at_index(&list, idx).cast::<CFDictionary>() };
    let Some(info) = WindowInfo::retain(raw) else {
      continue;
    };
    if let Some(entry) = parse_entry(&info) {
      entries.push(entry);
    }
  }
  entries
}

fn parse_entry(info: &WindowInfo) -> Option<SnapshotEntry> {
  let id = info.number("kCGWindowNumber")?;
  let rect = info.bounds()?;
  Some(SnapshotEntry {
    id: WindowId(id as u32),
    bounds: Bounds::new(rect.origin.x, rect.origin.y, rect.size.width, rect.size.height),
    owner_name: info.string("kCGWindowOwnerName").unwrap_or_default(),
    owner_pid: ProcessId(info.number("kCGWindowOwnerPID").unwrap_or(0) as u32),
    layer: info.number("kCGWindowLayer").unwrap_or(0) as i32,
  })
}
