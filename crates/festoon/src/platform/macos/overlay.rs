/*!
The overlay panel: borderless, transparent, click-through, above normal
windows on every Space, and excluded from screen capture.
*/

#![allow(unsafe_code)]
#![allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]

use objc2::rc::Retained;
use objc2::MainThreadOnly;
use objc2_app_kit::{
  NSBackingStoreType, NSColor, NSPanel, NSScreen, NSView, NSWindowCollectionBehavior, NSWindowLevel,
  NSWindowSharingType, NSWindowStyleMask,
};
use objc2_foundation::MainThreadMarker;
use std::ffi::c_void;
use std::ptr::NonNull;

use crate::platform::OverlayHost;
use crate::types::{Bounds, FestoonError, FestoonResult};

/// `NSStatusWindowLevel`.
const OVERLAY_LEVEL: NSWindowLevel = 25;

pub(super) struct Overlay {
  panel: Retained<NSPanel>,
  view: Retained<NSView>,
  frame: Bounds,
  scale: f64,
  visible: bool,
}

impl Overlay {
  /// A panel covering the main display.
  pub(super) fn new(mtm: MainThreadMarker) -> FestoonResult<Self> {
    let screen = NSScreen::screens(mtm)
      .firstObject()
      .ok_or_else(|| FestoonError::Overlay("no display attached".into()))?;
    let rect = screen.frame();

    let style = NSWindowStyleMask::Borderless | NSWindowStyleMask::NonactivatingPanel;
    let panel = unsafe {
      NSPanel::initWithContentRect_styleMask_backing_defer(
        NSPanel::alloc(mtm),
        rect,
        style,
        NSBackingStoreType::Buffered,
        false,
      )
    };
    unsafe { panel.setReleasedWhenClosed(false) };
    panel.setOpaque(false);
    panel.setHasShadow(false);
    panel.setIgnoresMouseEvents(true);
    panel.setHidesOnDeactivate(false);
    panel.setBackgroundColor(Some(&NSColor::clearColor()));
    panel.setLevel(OVERLAY_LEVEL);
    panel.setSharingType(NSWindowSharingType::None);
    panel.setCollectionBehavior(
      NSWindowCollectionBehavior::CanJoinAllSpaces
        | NSWindowCollectionBehavior::Stationary
        | NSWindowCollectionBehavior::IgnoresCycle
        | NSWindowCollectionBehavior::FullScreenAuxiliary,
    );

    let view = panel
      .contentView()
      .ok_or_else(|| FestoonError::Overlay("panel has no content view".into()))?;
    view.setWantsLayer(true);

    let scale = panel.backingScaleFactor();
    // The main display's origin is the global origin.
    let frame = Bounds::new(0.0, 0.0, rect.size.width, rect.size.height);
    log::info!("Overlay spans {}x{} points at {scale}x", frame.w, frame.h);

    Ok(Self {
      panel,
      view,
      frame,
      scale,
      visible: false,
    })
  }

  /// The content view, for the GPU surface.
  pub(super) fn view_ptr(&self) -> NonNull<c_void> {
    NonNull::from(&*self.view).cast()
  }

  pub(super) fn pixel_size(&self) -> (u32, u32) {
    (
      (self.frame.w * self.scale).round().max(1.0) as u32,
      (self.frame.h * self.scale).round().max(1.0) as u32,
    )
  }

  pub(super) fn close(&mut self) {
    self.hide();
    self.panel.close();
  }
}

impl OverlayHost for Overlay {
  fn show(&mut self) {
    if !self.visible {
      self.panel.orderFrontRegardless();
      self.visible = true;
    }
  }

  fn hide(&mut self) {
    if self.visible {
      self.panel.orderOut(None);
      self.visible = false;
    }
  }

  fn frame(&self) -> Bounds {
    self.frame
  }
}
