/*! Process-level accessibility helpers. */

#![allow(unsafe_code)]

use objc2_application_services::{AXError, AXIsProcessTrusted, AXUIElement};
use objc2_core_foundation::{CFBoolean, CFRetained, CFString};

use crate::types::ProcessId;

#[allow(clippy::cast_possible_wrap)] // pids fit in i32
pub(super) fn app_element(pid: ProcessId) -> CFRetained<AXUIElement> {
  unsafe { AXUIElement::new_application(pid.0 as i32) }
}

/// Whether this process may use the Accessibility API.
pub(super) fn has_permissions() -> bool {
  unsafe { AXIsProcessTrusted() }
}

/// Ask Chromium/Electron apps to build their accessibility tree.
/// Native apps reject the attribute; that is expected.
pub(super) fn enable_manual_accessibility(pid: ProcessId) {
  let app = app_element(pid);
  let attr = CFString::from_static_str("AXManualAccessibility");
  let result = unsafe { app.set_attribute_value(&attr, CFBoolean::new(true)) };
  if result == AXError::Success {
    log::debug!("Enabled manual accessibility for {pid}");
  } else if result != AXError::AttributeUnsupported {
    log::trace!("AXManualAccessibility on {pid}: {result:?}");
  }
}
