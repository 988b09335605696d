/*!
Platform layer.

`traits` defines what the core needs from the OS. On macOS, `macos`
implements it with the Accessibility API, `CGWindowList`, `AppKit` and wgpu.
Subscription handles are opaque here and unsubscribe when dropped.
*/

mod traits;

pub use traits::{AccessibilityElement, DecorationSurface, OverlayHost, WindowServer};

#[cfg(target_os = "macos")]
pub(crate) mod macos;

#[cfg(target_os = "macos")]
pub use macos::run;

/// Destruction subscription on one tracked window. Unsubscribes on drop.
#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
pub(crate) struct WindowWatch {
  #[cfg(target_os = "macos")]
  pub(crate) _inner: macos::WindowWatchInner,
}

/// Observer plus application-level subscriptions for one process.
/// Unsubscribes and releases the observer on drop.
#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
pub(crate) struct AppSubscription {
  #[cfg(target_os = "macos")]
  pub(crate) _inner: macos::AppSubscriptionInner,
}

/// Run the overlay until the process terminates.
#[cfg(not(target_os = "macos"))]
pub fn run(_config: crate::Config) -> crate::FestoonResult<()> {
  Err(crate::types::FestoonError::Unsupported(format!(
    "festoon draws on macOS only (running on {})",
    std::env::consts::OS
  )))
}
