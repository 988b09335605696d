/*!
Lamp-row inputs for one decoration: how many bulbs, where they hang, which
are lit and how far each swings.
*/

#![allow(
  clippy::cast_possible_truncation,
  clippy::cast_precision_loss,
  clippy::cast_sign_loss
)]

use std::f32::consts::PI;

/// Width of one bulb including its glow, in points.
pub const LAMP_WIDTH: f32 = 12.0;

const MIN_ANGLE: f32 = -5.0;
const MAX_ANGLE: f32 = 5.0;
const OSCILLATIONS: f32 = 3.0;
const SWING_SPEED: f32 = 2.0;

/// One bulb hanging from the top edge of a window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lamp {
  /// Horizontal centre, relative to the window's left edge.
  pub center_x: f32,
  /// Swing around the hanging point, in degrees.
  pub angle: f32,
  pub lit: bool,
}

/// Spacing and blink cadence shared by all decorations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LampStyle {
  spacing: f32,
  blink_interval: f32,
}

impl LampStyle {
  pub const fn new(spacing: f32, blink_interval: f32) -> Self {
    Self {
      spacing,
      blink_interval,
    }
  }

  /// `floor(width / spacing)`. A row always hangs `count + 1` bulbs.
  pub fn count(&self, width: f32) -> u32 {
    if width <= 0.0 || self.spacing <= 0.0 {
      return 0;
    }
    (width / self.spacing).floor() as u32
  }

  /// Even and odd bulbs swap state every `blink_interval` seconds.
  pub fn is_lit(&self, index: u32, time: f32) -> bool {
    let period = (time / self.blink_interval).floor() as i64;
    (index % 2 == 0) == (period.rem_euclid(2) == 0)
  }

  /// Swing angle in degrees, within `[-5, 5]`.
  pub fn rotation(index: u32, count: u32, time: f32) -> f32 {
    let ratio = if count == 0 {
      0.0
    } else {
      index as f32 / count as f32
    };
    MIN_ANGLE + (MAX_ANGLE - MIN_ANGLE) * 0.5 * (1.0 + (ratio * OSCILLATIONS * PI + time * SWING_SPEED).sin())
  }

  /// Bulbs spread edge to edge: first flush left, last flush right.
  pub fn center(index: u32, count: u32, width: f32) -> f32 {
    if count == 0 {
      return width / 2.0;
    }
    let usable = (width - LAMP_WIDTH).max(0.0);
    LAMP_WIDTH / 2.0 + usable * index as f32 / count as f32
  }

  /// The full row for a window of `width` at `time`.
  pub fn row(&self, width: f32, time: f32) -> Vec<Lamp> {
    let count = self.count(width);
    (0..=count)
      .map(|index| Lamp {
        center_x: Self::center(index, count, width),
        angle: Self::rotation(index, count, time),
        lit: self.is_lit(index, time),
      })
      .collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn style() -> LampStyle {
    LampStyle::new(30.0, 1.5)
  }

  mod count_tests {
    use super::*;

    #[test]
    fn floor_of_width_over_spacing() {
      assert_eq!(style().count(200.0), 6);
      assert_eq!(style().count(59.9), 1);
      assert_eq!(style().count(29.0), 0);
    }

    #[test]
    fn row_hangs_one_more_than_count() {
      assert_eq!(style().row(200.0, 0.0).len(), 7);
      assert_eq!(style().row(10.0, 0.0).len(), 1);
    }
  }

  mod is_lit_tests {
    use super::*;

    #[test]
    fn checkerboard_alternates() {
      let s = style();
      assert!(s.is_lit(0, 0.0));
      assert!(!s.is_lit(1, 0.0));
      assert!(!s.is_lit(0, 1.5));
      assert!(s.is_lit(1, 1.5));
      assert!(s.is_lit(0, 3.2));
    }
  }

  mod rotation_tests {
    use super::*;

    #[test]
    fn starts_centred() {
      assert!(LampStyle::rotation(0, 6, 0.0).abs() < 1e-5);
    }

    #[test]
    fn single_bulb_does_not_divide_by_zero() {
      assert!(LampStyle::rotation(0, 0, 1.0).is_finite());
    }
  }

  mod center_tests {
    use super::*;

    #[test]
    fn first_and_last_touch_edges() {
      let first = LampStyle::center(0, 6, 200.0);
      let last = LampStyle::center(6, 6, 200.0);
      assert!((first - LAMP_WIDTH / 2.0).abs() < 1e-5);
      assert!((last - (200.0 - LAMP_WIDTH / 2.0)).abs() < 1e-3);
    }

    #[test]
    fn lone_bulb_is_centred() {
      assert_eq!(LampStyle::center(0, 0, 20.0), 10.0);
    }
  }
}
