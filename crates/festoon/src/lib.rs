/*!
Festoon - festive lights strung along the top edge of every on-screen window.

```ignore
use festoon::Config;

// macOS: observe applications, track their windows and draw at 120 Hz
// until the process terminates.
festoon::platform::run(Config::load()?)?;
```

The tracking core is platform independent and can be driven directly:

```ignore
use festoon::{Config, Festoon, OverlayIdentity, ProcessId};

let mut festoon = Festoon::new(&Config::default(), OverlayIdentity {
  process_id: ProcessId::current(),
  owner_name: "festoon".into(),
});
let changes = festoon.sync_applications(&running_pids);
// ... subscribe `changes.added`, feed notifications:
festoon.handle_notification(token, notification, &element);
// ... once per frame:
festoon.tick(&window_server, &mut overlay, &mut surface);
```
*/

mod config;
mod core;
mod snapshot;
mod types;

pub mod a11y;
pub mod platform;
pub mod render;

pub use crate::config::{Config, CONFIG_ENV};
pub use crate::core::{
  ApplicationChanges, ContextTarget, EventOutcome, Festoon, Registry, WindowCandidate,
};
pub use crate::snapshot::{
  interpret, OverlayIdentity, Snapshot, SnapshotEntry, SnapshotRules, WindowStack,
  NORMAL_WINDOW_LAYER,
};
pub use types::*;
