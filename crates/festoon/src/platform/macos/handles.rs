/*! Retained AX handles with safe accessors. */

#![allow(unsafe_code)]

use objc2_application_services::{AXError, AXObserver, AXUIElement, AXValue as AXValueRef, AXValueType};
use objc2_core_foundation::{CFArray, CFRetained, CFString, CFType, CGPoint, CGSize};
use std::ffi::c_void;
use std::ptr::NonNull;

use super::ax_private::window_number;
use super::mapping::{ax_role, role_from_macos};
use super::util::app_element;
use crate::a11y::Role;
use crate::platform::AccessibilityElement;
use crate::types::{Bounds, ProcessId, WindowId};

/// A UI element. Clone is a retain.
#[derive(Clone)]
pub(super) struct ElementHandle(CFRetained<AXUIElement>);

impl ElementHandle {
  pub(super) fn new(element: CFRetained<AXUIElement>) -> Self {
    Self(element)
  }

  pub(super) fn application(pid: ProcessId) -> Self {
    Self(app_element(pid))
  }

  pub(super) fn inner(&self) -> &AXUIElement {
    &self.0
  }

  fn raw_attr(&self, attr: &CFString) -> Option<CFRetained<CFType>> {
    unsafe {
      let mut value: *const CFType = std::ptr::null();
      let result = self.0.copy_attribute_value(attr, NonNull::new(&raw mut value)?);
      if result != AXError::Success {
        return None;
      }
      Some(CFRetained::from_raw(NonNull::new(value.cast_mut())?))
    }
  }

  pub(super) fn string(&self, attr: &str) -> Option<String> {
    let value = self.raw_attr(&CFString::from_str(attr))?;
    let s = value.downcast_ref::<CFString>()?.to_string();
    (!s.is_empty()).then_some(s)
  }

  /// Top-level windows of an application element (`AXWindows`, role
  /// `AXWindow` only).
  pub(super) fn windows(&self) -> Vec<ElementHandle> {
    let Some(value) = self.raw_attr(&CFString::from_static_str("AXWindows")) else {
      return Vec::new();
    };
    let Ok(array) = value.downcast::<CFArray>() else {
      return Vec::new();
    };
    // SAFETY: AXWindows is always an array of AXUIElements.
    let typed: CFRetained<CFArray<AXUIElement>> = unsafe { CFRetained::cast_unchecked(array) };
    (0..typed.len())
      .filter_map(|i| typed.get(i))
      .map(ElementHandle::new)
      .filter(|w| w.string("AXRole").as_deref() == Some(ax_role::WINDOW))
      .collect()
  }

  fn bounds(&self) -> Option<Bounds> {
    let pos = self.raw_attr(&CFString::from_static_str("AXPosition"))?;
    let size = self.raw_attr(&CFString::from_static_str("AXSize"))?;
    let pos = pos.downcast_ref::<AXValueRef>()?;
    let size = size.downcast_ref::<AXValueRef>()?;

    let mut point = CGPoint::default();
    let mut extent = CGSize::default();
    unsafe {
      if pos.r#type() != AXValueType::CGPoint || size.r#type() != AXValueType::CGSize {
        return None;
      }
      if !pos.value(AXValueType::CGPoint, NonNull::new((&raw mut point).cast::<c_void>())?) {
        return None;
      }
      if !size.value(AXValueType::CGSize, NonNull::new((&raw mut extent).cast::<c_void>())?) {
        return None;
      }
    }
    Some(Bounds::new(point.x, point.y, extent.width, extent.height))
  }
}

impl AccessibilityElement for ElementHandle {
  fn window_id(&self) -> Option<WindowId> {
    window_number(&self.0).map(WindowId)
  }

  fn role(&self) -> Option<Role> {
    self.string("AXRole").map(|r| role_from_macos(&r))
  }

  fn frame(&self) -> Option<Bounds> {
    self.bounds()
  }
}

/// An `AXObserver` for one process. Clone is a retain.
#[derive(Clone)]
pub(super) struct ObserverHandle(CFRetained<AXObserver>);

impl ObserverHandle {
  pub(super) fn new(observer: CFRetained<AXObserver>) -> Self {
    Self(observer)
  }

  pub(super) fn inner(&self) -> &AXObserver {
    &self.0
  }
}
