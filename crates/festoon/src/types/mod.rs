/*! Core types shared by the registry, renderer and platform layer. */

#![allow(missing_docs)]

mod error;
mod geometry;
mod ids;
mod window;

pub use error::{FestoonError, FestoonResult};
pub use geometry::{Bounds, Vec2};
pub use ids::{ContextToken, ProcessId, WindowId};
pub use window::{TrackedApplication, TrackedWindow};
