/*! Private Accessibility SPI.

`_AXUIElementGetWindow` maps a window element to its window-server number,
the key shared with `CGWindowListCopyWindowInfo`. Undocumented but stable
across releases.
*/

#![allow(unsafe_code)]

use objc2_application_services::{AXError, AXUIElement};

#[link(name = "ApplicationServices", kind = "framework")]
extern "C" {
  fn _AXUIElementGetWindow(element: &AXUIElement, out_window_id: *mut u32) -> AXError;
}

/// Window-server number for a window element. `None` for non-windows and
/// elements that are already gone.
pub(super) fn window_number(element: &AXUIElement) -> Option<u32> {
  let mut window_id: u32 = 0;
  let result = unsafe { _AXUIElementGetWindow(element, &raw mut window_id) };
  (result == AXError::Success && window_id != 0).then_some(window_id)
}
