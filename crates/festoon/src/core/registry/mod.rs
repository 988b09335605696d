/*!
Window registry: the single owner of every tracked window and application.

- `windows.rs`: track / `update_frame` / untrack / reconcile
- `applications.rs`: application table, cascade removal, running-list sync

Every subscription handed to the OS is keyed by a [`ContextToken`] that
resolves through `contexts`. Removing an entry removes its token, so a late
callback for it resolves to nothing and is dropped.
*/

mod applications;
mod windows;

pub use applications::ApplicationChanges;
pub use windows::WindowCandidate;

use std::collections::HashMap;

use crate::config::Config;
use crate::types::{ContextToken, ProcessId, TrackedApplication, TrackedWindow, WindowId};

/// What a [`ContextToken`] points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextTarget {
  Window(WindowId),
  Application(ProcessId),
}

/// Minimum-size rule applied by `track`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct SizeFilter {
  pub(crate) min_width: f64,
  pub(crate) min_height: f64,
}

impl SizeFilter {
  pub(crate) fn from_config(config: &Config) -> Self {
    Self {
      min_width: config.min_window_width,
      min_height: config.min_window_height,
    }
  }
}

/// Tracked windows and applications.
#[derive(Debug)]
pub struct Registry {
  windows: HashMap<WindowId, TrackedWindow>,
  applications: HashMap<ProcessId, TrackedApplication>,
  contexts: HashMap<ContextToken, ContextTarget>,
  next_token: u64,
  filter: SizeFilter,
  /// Overlay origin seen by the last reconciliation.
  origin: (f64, f64),
}

impl Registry {
  pub fn new(config: &Config) -> Self {
    Self {
      windows: HashMap::new(),
      applications: HashMap::new(),
      contexts: HashMap::new(),
      next_token: 1,
      filter: SizeFilter::from_config(config),
      origin: (0.0, 0.0),
    }
  }

  /// Resolve a subscription token. `None` for tokens whose target is gone.
  pub fn resolve(&self, token: ContextToken) -> Option<ContextTarget> {
    self.contexts.get(&token).copied()
  }

  /// Overlay origin recorded by the last reconciliation.
  pub const fn origin(&self) -> (f64, f64) {
    self.origin
  }

  fn issue_token(&mut self, target: ContextTarget) -> ContextToken {
    let token = ContextToken(self.next_token);
    self.next_token += 1;
    self.contexts.insert(token, target);
    token
  }

  fn revoke_token(&mut self, token: ContextToken) {
    self.contexts.remove(&token);
  }

  /// Drop everything, windows first. Each entry's subscription is released
  /// as it goes.
  pub fn clear(&mut self) {
    let windows = self.windows.len();
    let applications = self.applications.len();
    self.windows.clear();
    self.applications.clear();
    self.contexts.clear();
    log::debug!("Registry cleared ({windows} windows, {applications} applications)");
  }
}
