/*! Geometry in screen points (top-left origin, y growing downward). */

#![allow(clippy::cast_possible_truncation)] // f64 -> f32 only for GPU upload

/// Rectangle in screen coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
  pub x: f64,
  pub y: f64,
  pub w: f64,
  pub h: f64,
}

impl Bounds {
  pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
    Self { x, y, w, h }
  }

  /// The same rectangle expressed relative to `(origin_x, origin_y)`.
  pub fn relative_to(&self, origin_x: f64, origin_y: f64) -> Self {
    Self {
      x: self.x - origin_x,
      y: self.y - origin_y,
      w: self.w,
      h: self.h,
    }
  }

  /// Zero, negative or non-finite extent.
  pub fn is_degenerate(&self) -> bool {
    !(self.w.is_finite() && self.h.is_finite() && self.x.is_finite() && self.y.is_finite())
      || self.w <= 0.0
      || self.h <= 0.0
  }

  /// True when no part of the horizontal span lies inside `[0, width)`.
  pub fn outside_horizontal_extent(&self, width: f64) -> bool {
    self.x >= width || self.x + self.w <= 0.0
  }

  /// Top-left corner as a GPU vector.
  pub fn position(&self) -> Vec2 {
    Vec2::new(self.x as f32, self.y as f32)
  }

  /// Width and height as a GPU vector.
  pub fn size(&self) -> Vec2 {
    Vec2::new(self.w as f32, self.h as f32)
  }
}

/// Single-precision pair, the layout the shader consumes.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec2 {
  pub x: f32,
  pub y: f32,
}

impl Vec2 {
  pub const fn new(x: f32, y: f32) -> Self {
    Self { x, y }
  }
}


#[cfg(test)]
mod proptests {
  use super::*;
  use proptest::prelude::*;

  fn coord() -> impl Strategy<Value = f64> {
    -10000.0..10000.0f64
  }

  fn dimension() -> impl Strategy<Value = f64> {
    0.0..5000.0f64
  }

  proptest! {
    /// Translating never changes the size.
    #[test]
    fn relative_to_preserves_size(x in coord(), y in coord(), w in dimension(), h in dimension(), ox in coord(), oy in coord()) {
      let moved = Bounds { x, y, w, h }.relative_to(ox, oy);
      prop_assert_eq!(moved.w, w);
      prop_assert_eq!(moved.h, h);
    }

    /// A rectangle starting inside the display is never outside it.
    #[test]
    fn origin_on_display_is_inside(x in 0.0..1000.0f64, w in 1.0..5000.0f64) {
      let b = Bounds { x, y: 0.0, w, h: 10.0 };
      prop_assert!(!b.outside_horizontal_extent(1000.5));
    }
  }
}
