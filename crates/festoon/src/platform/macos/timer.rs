/*! Main-run-loop frame timer. */

#![allow(unsafe_code)]

use block2::RcBlock;
use objc2::rc::Retained;
use objc2_foundation::{NSRunLoop, NSRunLoopCommonModes, NSTimer};
use std::panic::AssertUnwindSafe;
use std::ptr::NonNull;

/// Repeating `NSTimer`. Invalidated on drop.
pub(super) struct FrameTimer {
  timer: Retained<NSTimer>,
}

impl FrameTimer {
  /// Fire `tick` every `interval` seconds, including while the user drags
  /// windows or tracks menus.
  pub(super) fn start(interval: f32, tick: impl Fn() + 'static) -> Self {
    let block = RcBlock::new(move |_timer: NonNull<NSTimer>| {
      if std::panic::catch_unwind(AssertUnwindSafe(&tick)).is_err() {
        log::warn!("Frame tick panicked");
      }
    });
    let timer = unsafe { NSTimer::timerWithTimeInterval_repeats_block(f64::from(interval), true, &block) };
    unsafe { NSRunLoop::mainRunLoop().addTimer_forMode(&timer, NSRunLoopCommonModes) };
    Self { timer }
  }
}

impl Drop for FrameTimer {
  fn drop(&mut self) {
    self.timer.invalidate();
  }
}
