/*!
Application operations for the Registry.

CRUD: `track_application`, `untrack_application`, `attach_subscription`
Query: `application`, `applications`
Lifecycle: `sync_applications`
*/

use std::collections::HashSet;

use super::{ContextTarget, Registry};
use crate::platform::AppSubscription;
use crate::types::{ContextToken, ProcessId, TrackedApplication, WindowId};

/// Outcome of syncing against the running-application list.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ApplicationChanges {
  /// Newly tracked applications and the token to subscribe each under.
  pub added: Vec<(ProcessId, ContextToken)>,
  /// Applications that exited; their windows are already gone.
  pub removed: Vec<ProcessId>,
}

impl Registry {
  /// Start observing an application. `None` if it is already tracked.
  pub fn track_application(&mut self, process_id: ProcessId) -> Option<ContextToken> {
    if self.applications.contains_key(&process_id) {
      return None;
    }
    let token = self.issue_token(ContextTarget::Application(process_id));
    self
      .applications
      .insert(process_id, TrackedApplication::new(process_id, token));
    log::info!("Observing application {process_id}");
    Some(token)
  }

  pub(crate) fn attach_subscription(&mut self, process_id: ProcessId, subscription: AppSubscription) {
    if let Some(app) = self.applications.get_mut(&process_id) {
      app.attach_subscription(subscription);
    }
  }

  /// Remove an application and, first, every window it owns.
  /// Returns how many windows were removed.
  pub fn untrack_application(&mut self, process_id: ProcessId) -> usize {
    let owned: Vec<WindowId> = self
      .windows
      .values()
      .filter(|w| w.process_id() == process_id)
      .map(|w| w.id())
      .collect();
    for id in &owned {
      self.untrack(*id);
    }

    if let Some(app) = self.applications.remove(&process_id) {
      self.revoke_token(app.token());
      log::info!("Forgot application {process_id} ({} windows)", owned.len());
    }
    owned.len()
  }

  pub fn application(&self, process_id: ProcessId) -> Option<&TrackedApplication> {
    self.applications.get(&process_id)
  }

  pub fn applications(&self) -> impl Iterator<Item = &TrackedApplication> {
    self.applications.values()
  }

  /// Bring the application table in line with the running list.
  ///
  /// `exclude` (the overlay's own process) is never tracked.
  pub fn sync_applications(&mut self, running: &[ProcessId], exclude: ProcessId) -> ApplicationChanges {
    let live: HashSet<ProcessId> = running.iter().copied().filter(|p| *p != exclude).collect();

    let mut removed: Vec<ProcessId> = self
      .applications
      .keys()
      .copied()
      .filter(|pid| !live.contains(pid))
      .collect();
    removed.sort_unstable();
    for pid in &removed {
      self.untrack_application(*pid);
    }

    let mut added = Vec::new();
    for pid in running {
      if *pid == exclude {
        continue;
      }
      if let Some(token) = self.track_application(*pid) {
        added.push((*pid, token));
      }
    }

    ApplicationChanges { added, removed }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::a11y::Role;
  use crate::config::Config;
  use crate::core::registry::WindowCandidate;
  use crate::types::Bounds;

  const OWN: ProcessId = ProcessId(1);

  fn track_window(r: &mut Registry, id: u32, pid: u32) {
    r.track(
      &WindowCandidate {
        id: WindowId(id),
        role: Some(Role::Window),
        frame: Some(Bounds::new(0.0, 0.0, 200.0, 100.0)),
      },
      ProcessId(pid),
    );
  }

  mod untrack_application_tests {
    use super::*;

    #[test]
    fn removes_only_owned_windows() {
      let mut r = Registry::new(&Config::default());
      r.track_application(ProcessId(42));
      r.track_application(ProcessId(43));
      track_window(&mut r, 1, 42);
      track_window(&mut r, 2, 42);
      track_window(&mut r, 3, 43);

      assert_eq!(r.untrack_application(ProcessId(42)), 2);
      assert!(r.window(WindowId(1)).is_none());
      assert!(r.window(WindowId(2)).is_none());
      assert!(r.window(WindowId(3)).is_some());
      assert!(r.application(ProcessId(42)).is_none());
      assert!(r.application(ProcessId(43)).is_some());
    }

    #[test]
    fn revokes_application_token() {
      let mut r = Registry::new(&Config::default());
      let token = r.track_application(ProcessId(42)).unwrap();
      assert_eq!(r.resolve(token), Some(ContextTarget::Application(ProcessId(42))));
      r.untrack_application(ProcessId(42));
      assert_eq!(r.resolve(token), None);
    }

    #[test]
    fn unknown_application_is_noop() {
      let mut r = Registry::new(&Config::default());
      assert_eq!(r.untrack_application(ProcessId(5)), 0);
    }
  }

  mod sync_applications_tests {
    use super::*;

    #[test]
    fn adds_new_and_skips_own_process() {
      let mut r = Registry::new(&Config::default());
      let changes = r.sync_applications(&[OWN, ProcessId(10), ProcessId(11)], OWN);
      let added: Vec<_> = changes.added.iter().map(|(pid, _)| *pid).collect();
      assert_eq!(added, vec![ProcessId(10), ProcessId(11)]);
      assert!(changes.removed.is_empty());
      assert!(r.application(OWN).is_none());
    }

    #[test]
    fn removes_exited_with_cascade() {
      let mut r = Registry::new(&Config::default());
      r.sync_applications(&[ProcessId(10), ProcessId(11)], OWN);
      track_window(&mut r, 1, 10);
      track_window(&mut r, 2, 11);

      let changes = r.sync_applications(&[ProcessId(11)], OWN);
      assert!(changes.added.is_empty());
      assert_eq!(changes.removed, vec![ProcessId(10)]);
      assert!(r.window(WindowId(1)).is_none());
      assert!(r.window(WindowId(2)).is_some());
    }

    #[test]
    fn unchanged_list_is_quiet() {
      let mut r = Registry::new(&Config::default());
      r.sync_applications(&[ProcessId(10)], OWN);
      assert_eq!(r.sync_applications(&[ProcessId(10)], OWN), ApplicationChanges::default());
    }
  }
}

#[cfg(test)]
mod proptests {
  use super::*;
  use crate::a11y::Role;
  use crate::config::Config;
  use crate::core::registry::WindowCandidate;
  use crate::types::Bounds;
  use proptest::prelude::*;

  proptest! {
    /// Cascade removes exactly the windows owned by the application.
    #[test]
    fn cascade_is_exact(owners in prop::collection::vec(1..5u32, 0..40), victim in 1..5u32) {
      let mut r = Registry::new(&Config::default());
      for pid in 1..5 {
        r.track_application(ProcessId(pid));
      }
      for (id, pid) in owners.iter().enumerate() {
        r.track(
          &WindowCandidate {
            id: WindowId(u32::try_from(id).unwrap()),
            role: Some(Role::Window),
            frame: Some(Bounds::new(0.0, 0.0, 200.0, 100.0)),
          },
          ProcessId(*pid),
        );
      }

      let expected_removed = owners.iter().filter(|p| **p == victim).count();
      let expected_left = owners.len() - expected_removed;
      prop_assert_eq!(r.untrack_application(ProcessId(victim)), expected_removed);
      prop_assert_eq!(r.window_count(), expected_left);
      prop_assert!(r.windows().all(|w| w.process_id() != ProcessId(victim)));
    }
  }
}
