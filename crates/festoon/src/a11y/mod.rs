/*! Accessibility vocabulary: the notifications the tracker listens for and
the element roles it distinguishes. Platform string mapping lives in
`platform::macos::mapping`. */

mod notification;
mod role;

pub use notification::{IgnoredNotification, Notification};
pub use role::Role;
