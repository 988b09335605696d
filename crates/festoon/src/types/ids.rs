/*! Identifier newtypes. */

use derive_more::{Display, From, Into};

/// Window-server window number, stable for the lifetime of the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Into)]
pub struct WindowId(pub u32);

/// OS process identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Into)]
pub struct ProcessId(pub u32);

impl ProcessId {
  /// The running process.
  pub fn current() -> Self {
    Self(std::process::id())
  }
}

/// Key carried by an accessibility subscription and resolved through the registry.
///
/// Tokens are handed out monotonically and never reused, so a callback that
/// arrives after its target was removed simply misses the lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Into)]
pub struct ContextToken(pub u64);
