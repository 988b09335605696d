/*!
Process lifetime: build the overlay, start observing, run the main loop.

Everything runs on the main thread. Shared state is an `Rc<RefCell<_>>`;
callbacks hold `Weak` links so a late delivery after teardown is a no-op.
*/

#![allow(unsafe_code)]

use block2::RcBlock;
use objc2_app_kit::{NSApplication, NSApplicationActivationPolicy, NSApplicationWillTerminateNotification};
use objc2_foundation::{MainThreadMarker, NSNotification, NSNotificationCenter, NSOperationQueue};
use std::cell::RefCell;
use std::ptr::NonNull;
use std::rc::Rc;

use super::gpu::GpuSurface;
use super::observer::SharedState;
use super::overlay::Overlay;
use super::timer::FrameTimer;
use super::util::has_permissions;
use super::window_list::MacWindowServer;
use super::workspace::WorkspaceMonitor;
use crate::config::Config;
use crate::core::Festoon;
use crate::snapshot::OverlayIdentity;
use crate::types::{FestoonError, FestoonResult, ProcessId};

/// Overlay and the surface drawing into it. The surface is declared first
/// so it drops before the view it renders to.
struct Display {
  surface: GpuSurface,
  overlay: Overlay,
}

/// Everything torn down on termination, in field order.
struct Session {
  _timer: FrameTimer,
  _workspace: WorkspaceMonitor,
  state: SharedState,
  display: Rc<RefCell<Display>>,
}

impl Drop for Session {
  fn drop(&mut self) {
    if let Ok(mut festoon) = self.state.try_borrow_mut() {
      festoon.shutdown();
    }
    if let Ok(mut display) = self.display.try_borrow_mut() {
      display.overlay.close();
    }
    log::info!("Stopped");
  }
}

/// Run the overlay until the application terminates.
pub fn run(config: Config) -> FestoonResult<()> {
  let mtm = MainThreadMarker::new()
    .ok_or_else(|| FestoonError::Unsupported("must run on the main thread".into()))?;
  if !has_permissions() {
    return Err(FestoonError::PermissionDenied);
  }

  let app = NSApplication::sharedApplication(mtm);
  app.setActivationPolicy(NSApplicationActivationPolicy::Accessory);

  let overlay = Overlay::new(mtm)?;
  let surface = futures::executor::block_on(GpuSurface::new(&overlay))?;
  let display = Rc::new(RefCell::new(Display { surface, overlay }));

  let identity = OverlayIdentity {
    process_id: ProcessId::current(),
    owner_name: process_name(),
  };
  let state: SharedState = Rc::new(RefCell::new(Festoon::new(&config, identity)));
  let workspace = WorkspaceMonitor::start(&state);

  let timer = {
    let state = Rc::downgrade(&state);
    let display = Rc::downgrade(&display);
    FrameTimer::start(config.frame_interval(), move || {
      let (Some(state), Some(display)) = (state.upgrade(), display.upgrade()) else {
        return;
      };
      let Ok(mut festoon) = state.try_borrow_mut() else {
        return;
      };
      let Ok(mut display) = display.try_borrow_mut() else {
        return;
      };
      let Display { surface, overlay } = &mut *display;
      festoon.tick(&MacWindowServer, overlay, surface);
    })
  };

  log::info!(
    "Decorating windows at {} fps ({} applications)",
    config.frames_per_second,
    state.borrow().registry().applications().count()
  );

  let session = Rc::new(RefCell::new(Some(Session {
    _timer: timer,
    _workspace: workspace,
    state,
    display,
  })));
  let _terminate = {
    let block = RcBlock::new(move |_notification: NonNull<NSNotification>| {
      drop(session.borrow_mut().take());
    });
    unsafe {
      NSNotificationCenter::defaultCenter().addObserverForName_object_queue_usingBlock(
        Some(NSApplicationWillTerminateNotification),
        None,
        Some(&NSOperationQueue::mainQueue()),
        &block,
      )
    }
  };

  unsafe { app.run() };
  Ok(())
}

fn process_name() -> String {
  std::env::current_exe()
    .ok()
    .and_then(|path| path.file_name().map(|name| name.to_string_lossy().into_owned()))
    .unwrap_or_default()
}
