/*! Animation clock advanced once per rendered frame. */

#![allow(clippy::cast_possible_truncation)]

use crate::types::WindowId;

/// Shared frame clock plus a fixed per-window phase offset.
///
/// The running total is kept in `f64`: an `f32` total stops absorbing a
/// 1/120 s step after about 2^18 s of uptime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationClock {
  time: f64,
  step: f64,
  phase_span: f32,
}

impl AnimationClock {
  /// `step` seconds per frame; per-window offsets fall in `[0, phase_span)`.
  pub fn new(step: f32, phase_span: f32) -> Self {
    Self {
      time: 0.0,
      step: f64::from(step),
      phase_span,
    }
  }

  pub fn advance(&mut self) {
    self.time += self.step;
  }

  pub fn time(&self) -> f32 {
    self.time as f32
  }

  /// Clock value for one window's decoration.
  pub fn time_for(&self, id: WindowId) -> f32 {
    (self.time + f64::from(phase_offset(id, self.phase_span))) as f32
  }
}

/// Deterministic offset in `[0, span)` for a window (Fibonacci hashing), so
/// neighbouring windows blink out of step.
pub fn phase_offset(id: WindowId, span: f32) -> f32 {
  const GOLDEN: u32 = 0x9E37_79B9;
  if span <= 0.0 {
    return 0.0;
  }
  let hashed = id.0.wrapping_mul(GOLDEN);
  let unit = f64::from(hashed) / (f64::from(u32::MAX) + 1.0);
  let offset = (unit * f64::from(span)) as f32;
  // Narrowing to f32 can round up onto `span` itself.
  if offset < span {
    offset
  } else {
    f32::from_bits(span.to_bits() - 1)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn advance_accumulates_steps() {
    let mut clock = AnimationClock::new(0.5, 3.0);
    clock.advance();
    clock.advance();
    assert!((clock.time() - 1.0).abs() < f32::EPSILON);
  }

  #[test]
  fn advance_still_moves_after_days_of_uptime() {
    let step = 1.0 / 120.0;
    let mut clock = AnimationClock {
      time: 3.0e5,
      step,
      phase_span: 3.0,
    };
    let before = clock.time;
    clock.advance();
    assert!((clock.time - before - step).abs() < 1e-9);

    let start = clock.time();
    for _ in 0..120 {
      clock.advance();
    }
    assert!((clock.time() - start - 1.0).abs() < 0.05);
  }

  #[test]
  fn phase_stays_below_span_when_rounding_up() {
    // Hashes to u32::MAX, which narrows to exactly `span`.
    let id = WindowId(0xEBB3_4377);
    assert_eq!(id.0.wrapping_mul(0x9E37_79B9), u32::MAX);
    let offset = phase_offset(id, 3.0);
    assert!(offset < 3.0);
    assert!(offset > 2.99);
    assert_eq!(phase_offset(WindowId(7), 0.0), 0.0);
  }

  #[test]
  fn phase_is_stable_and_distinct() {
    let a = phase_offset(WindowId(101), 3.0);
    assert_eq!(a, phase_offset(WindowId(101), 3.0));
    assert_ne!(a, phase_offset(WindowId(102), 3.0));
  }

  #[test]
  fn window_zero_has_no_offset() {
    let clock = AnimationClock::new(0.1, 3.0);
    assert_eq!(clock.time_for(WindowId(0)), clock.time());
  }
}

#[cfg(test)]
mod proptests {
  use super::*;
  use proptest::prelude::*;

  proptest! {
    #[test]
    fn phase_within_span(id in any::<u32>(), span in 0.1..100.0f32) {
      let offset = phase_offset(WindowId(id), span);
      prop_assert!(offset >= 0.0);
      prop_assert!(offset < span);
    }
  }
}
