/*!
Process-wide tracking state.

[`Festoon`] owns the registry and the renderer. It is created once at
startup and shared by the accessibility callbacks, the workspace observer
and the frame timer, all of which run on the main run loop. Nothing here
blocks or yields mid-mutation.
*/

mod events;
mod registry;

pub use events::EventOutcome;
pub use registry::{ApplicationChanges, ContextTarget, Registry, WindowCandidate};

use crate::config::Config;
use crate::platform::{DecorationSurface, OverlayHost, WindowServer};
use crate::render::{FrameOutcome, Renderer};
use crate::snapshot::{interpret, OverlayIdentity, Snapshot, SnapshotRules};
use crate::types::{Bounds, ProcessId};

/// Registry, renderer and the overlay's identity.
#[derive(Debug)]
pub struct Festoon {
  registry: Registry,
  renderer: Renderer,
  overlay: OverlayIdentity,
  capture_owners: Vec<String>,
}

impl Festoon {
  pub fn new(config: &Config, overlay: OverlayIdentity) -> Self {
    Self {
      registry: Registry::new(config),
      renderer: Renderer::new(config),
      overlay,
      capture_owners: config.screen_capture_owners.clone(),
    }
  }

  pub const fn registry(&self) -> &Registry {
    &self.registry
  }

  pub fn registry_mut(&mut self) -> &mut Registry {
    &mut self.registry
  }

  pub const fn renderer(&self) -> &Renderer {
    &self.renderer
  }

  pub const fn overlay(&self) -> &OverlayIdentity {
    &self.overlay
  }

  /// Query the window server and interpret the result for a display
  /// spanning `display`.
  pub fn snapshot<W: WindowServer + ?Sized>(&self, server: &W, display: Bounds) -> Snapshot {
    interpret(
      server.window_list(),
      &SnapshotRules {
        overlay: &self.overlay,
        display_width: display.w,
        capture_owners: &self.capture_owners,
      },
    )
  }

  /// One frame: snapshot, reconcile, draw.
  pub fn tick<W, H, S>(&mut self, server: &W, host: &mut H, surface: &mut S) -> FrameOutcome
  where
    W: WindowServer + ?Sized,
    H: OverlayHost + ?Sized,
    S: DecorationSurface + ?Sized,
  {
    let snapshot = self.snapshot(server, host.frame());
    self.renderer.tick(&mut self.registry, &snapshot, host, surface)
  }

  /// Sync the application table with the running list, never tracking the
  /// overlay's own process.
  pub fn sync_applications(&mut self, running: &[ProcessId]) -> ApplicationChanges {
    self.registry.sync_applications(running, self.overlay.process_id)
  }

  /// Release every subscription. The registry is empty afterwards.
  pub fn shutdown(&mut self) {
    self.registry.clear();
  }
}
