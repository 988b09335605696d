/*!
macOS platform implementation.

Implements the traits in `platform/traits.rs` and wires them to the main
run loop. All Accessibility, Core Foundation and AppKit calls stay inside
this module.
*/

mod ax_private;
mod cf_utils;
mod gpu;
mod handles;
mod mapping;
mod notifications;
mod observer;
mod overlay;
mod session;
mod timer;
mod util;
mod window_list;
mod workspace;

pub use session::run;

pub(crate) type WindowWatchInner = notifications::Registration;
pub(crate) type AppSubscriptionInner = notifications::AppSubscriptionInner;
