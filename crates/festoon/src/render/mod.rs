/*!
Frame orchestration.

Each tick reconciles the registry against a fresh snapshot, hides the
overlay while a screen capture is in progress or no tracked window is
visible, advances the animation clock and hands the surface a back-to-front
[`FramePlan`].
*/

mod clock;
mod lamps;

pub use clock::{phase_offset, AnimationClock};
pub use lamps::{Lamp, LampStyle, LAMP_WIDTH};

use crate::config::Config;
use crate::core::Registry;
use crate::platform::{DecorationSurface, OverlayHost};
use crate::snapshot::Snapshot;
use crate::types::{TrackedWindow, Vec2, WindowId};

/// One decoration: a hole over the window plus its row of lamps.
#[derive(Debug, Clone, PartialEq)]
pub struct DecorationDraw {
  pub window: WindowId,
  /// Overlay-relative top-left corner.
  pub position: Vec2,
  pub size: Vec2,
  /// Clock value for this window, phase offset included.
  pub time: f32,
  pub lamps: Vec<Lamp>,
}

/// Everything the surface draws for one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FramePlan {
  pub time: f32,
  pub bulb_scale: f32,
  /// Back to front: the frontmost window comes last.
  pub draws: Vec<DecorationDraw>,
}

/// What a tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
  /// A screen capture was in progress; the overlay is hidden.
  Suppressed,
  /// No tracked window is visible; the overlay is hidden and nothing is
  /// presented.
  Idle,
  Drawn { decorations: usize },
}

/// Fixed-cadence frame driver.
#[derive(Debug)]
pub struct Renderer {
  clock: AnimationClock,
  lamps: LampStyle,
  bulb_scale: f32,
  suppressed: bool,
}

impl Renderer {
  pub fn new(config: &Config) -> Self {
    Self {
      clock: AnimationClock::new(config.frame_interval(), 2.0 * config.blink_interval),
      lamps: LampStyle::new(config.lamp_spacing, config.blink_interval),
      bulb_scale: config.bulb_scale,
      suppressed: false,
    }
  }

  pub fn time(&self) -> f32 {
    self.clock.time()
  }

  /// Run one frame.
  pub fn tick<H, S>(
    &mut self,
    registry: &mut Registry,
    snapshot: &Snapshot,
    host: &mut H,
    surface: &mut S,
  ) -> FrameOutcome
  where
    H: OverlayHost + ?Sized,
    S: DecorationSurface + ?Sized,
  {
    registry.reconcile(snapshot);

    if matches!(snapshot, Snapshot::ScreenCapture) {
      if !self.suppressed {
        log::debug!("Screen capture in progress, hiding overlay");
        self.suppressed = true;
      }
      host.hide();
      return FrameOutcome::Suppressed;
    }
    if self.suppressed {
      log::debug!("Screen capture finished");
      self.suppressed = false;
    }

    self.clock.advance();
    let plan = self.plan(registry);
    if plan.draws.is_empty() {
      host.hide();
      return FrameOutcome::Idle;
    }
    host.show();
    surface.draw(&plan);
    FrameOutcome::Drawn {
      decorations: plan.draws.len(),
    }
  }

  /// Visible windows, back to front, with their lamp rows.
  pub fn plan(&self, registry: &Registry) -> FramePlan {
    let mut visible: Vec<&TrackedWindow> = registry.windows().filter(|w| w.is_visible()).collect();
    visible.sort_by(|a, b| b.order().cmp(&a.order()));

    let draws = visible
      .into_iter()
      .map(|window| {
        let time = self.clock.time_for(window.id());
        DecorationDraw {
          window: window.id(),
          position: window.position(),
          size: window.size(),
          time,
          lamps: self.lamps.row(window.size().x, time),
        }
      })
      .collect();

    FramePlan {
      time: self.clock.time(),
      bulb_scale: self.bulb_scale,
      draws,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::a11y::Role;
  use crate::core::WindowCandidate;
  use crate::snapshot::{SnapshotEntry, WindowStack};
  use crate::types::{Bounds, ProcessId};

  #[derive(Default)]
  struct Host {
    visible: bool,
    shows: usize,
    hides: usize,
  }

  impl OverlayHost for Host {
    fn show(&mut self) {
      self.visible = true;
      self.shows += 1;
    }

    fn hide(&mut self) {
      self.visible = false;
      self.hides += 1;
    }

    fn frame(&self) -> Bounds {
      Bounds::new(0.0, 0.0, 1000.0, 800.0)
    }
  }

  #[derive(Default)]
  struct Surface {
    plans: Vec<FramePlan>,
  }

  impl DecorationSurface for Surface {
    fn draw(&mut self, plan: &FramePlan) {
      self.plans.push(plan.clone());
    }
  }

  fn registry_with(ids: &[u32]) -> Registry {
    let mut registry = Registry::new(&Config::default());
    registry.track_application(ProcessId(42));
    for id in ids {
      registry.track(
        &WindowCandidate {
          id: WindowId(*id),
          role: Some(Role::Window),
          frame: Some(Bounds::new(0.0, 0.0, 200.0, 100.0)),
        },
        ProcessId(42),
      );
    }
    registry
  }

  fn stack(ids: &[u32]) -> Snapshot {
    let entries = ids
      .iter()
      .map(|id| SnapshotEntry {
        id: WindowId(*id),
        bounds: Bounds::new(f64::from(*id), 0.0, 200.0, 100.0),
        owner_name: "App".to_string(),
        owner_pid: ProcessId(42),
        layer: 0,
      })
      .collect();
    Snapshot::Windows(WindowStack::new(None, entries))
  }

  mod tick_tests {
    use super::*;

    #[test]
    fn draws_back_to_front() {
      let mut registry = registry_with(&[1, 2, 3]);
      let mut renderer = Renderer::new(&Config::default());
      let (mut host, mut surface) = (Host::default(), Surface::default());

      let outcome = renderer.tick(&mut registry, &stack(&[2, 3, 1]), &mut host, &mut surface);
      assert_eq!(outcome, FrameOutcome::Drawn { decorations: 3 });
      let order: Vec<_> = surface.plans[0].draws.iter().map(|d| d.window.0).collect();
      assert_eq!(order, vec![1, 3, 2], "frontmost window 2 is drawn last");
      assert!(host.visible);
    }

    #[test]
    fn screen_capture_hides_and_skips_drawing() {
      let mut registry = registry_with(&[1]);
      let mut renderer = Renderer::new(&Config::default());
      let (mut host, mut surface) = (Host::default(), Surface::default());

      renderer.tick(&mut registry, &stack(&[1]), &mut host, &mut surface);
      let time = renderer.time();
      let outcome = renderer.tick(&mut registry, &Snapshot::ScreenCapture, &mut host, &mut surface);

      assert_eq!(outcome, FrameOutcome::Suppressed);
      assert!(!host.visible);
      assert_eq!(host.hides, 1);
      assert_eq!(surface.plans.len(), 1);
      assert_eq!(renderer.time(), time, "clock holds while suppressed");
    }

    #[test]
    fn clock_advances_one_interval_per_frame() {
      let config = Config::default();
      let mut registry = registry_with(&[1]);
      let mut renderer = Renderer::new(&config);
      let (mut host, mut surface) = (Host::default(), Surface::default());
      for _ in 0..3 {
        renderer.tick(&mut registry, &stack(&[1]), &mut host, &mut surface);
      }
      assert!((renderer.time() - 3.0 * config.frame_interval()).abs() < 1e-6);
      assert_eq!(host.shows, 3);
    }

    #[test]
    fn nothing_visible_hides_without_presenting() {
      let mut registry = registry_with(&[1]);
      let mut renderer = Renderer::new(&Config::default());
      let (mut host, mut surface) = (Host::default(), Surface::default());

      renderer.tick(&mut registry, &stack(&[1]), &mut host, &mut surface);
      assert!(host.visible);

      // Window 1 left the screen; it stays tracked but hidden.
      let outcome = renderer.tick(&mut registry, &stack(&[]), &mut host, &mut surface);
      assert_eq!(outcome, FrameOutcome::Idle);
      assert!(!host.visible);
      assert_eq!(surface.plans.len(), 1, "idle frames are not presented");
      assert_eq!(registry.window_count(), 1);

      let outcome = renderer.tick(&mut registry, &stack(&[1]), &mut host, &mut surface);
      assert_eq!(outcome, FrameOutcome::Drawn { decorations: 1 });
      assert!(host.visible);
    }
  }

  mod plan_tests {
    use super::*;

    #[test]
    fn hidden_windows_are_not_planned() {
      let mut registry = registry_with(&[1, 2]);
      registry.reconcile(&stack(&[2]));
      let plan = Renderer::new(&Config::default()).plan(&registry);
      assert_eq!(plan.draws.len(), 1);
      assert_eq!(plan.draws[0].window, WindowId(2));
    }

    #[test]
    fn draw_carries_cached_geometry_and_lamps() {
      let mut registry = registry_with(&[5]);
      registry.reconcile(&stack(&[5]));
      let renderer = Renderer::new(&Config::default());
      let plan = renderer.plan(&registry);
      let draw = &plan.draws[0];
      assert_eq!(draw.position, Vec2::new(5.0, 0.0));
      assert_eq!(draw.size, Vec2::new(200.0, 100.0));
      assert_eq!(draw.lamps.len(), 7);
      assert_eq!(draw.time, renderer.clock.time_for(WindowId(5)));
      assert_eq!(plan.bulb_scale, 1.5);
    }
  }
}
