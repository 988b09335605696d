/*! Error types for festoon startup and platform operations. */

/// Errors surfaced while bringing the overlay up.
///
/// The tracking core itself never fails: stale tokens, unknown windows and
/// empty window-server queries are absorbed as no-ops.
#[derive(Debug, thiserror::Error)]
pub enum FestoonError {
  #[error("Accessibility permission not granted")]
  PermissionDenied,

  #[error("Observer error: {0}")]
  ObserverError(String),

  #[error("GPU error: {0}")]
  Gpu(String),

  #[error("Overlay error: {0}")]
  Overlay(String),

  #[error("Config error: {0}")]
  Config(String),

  #[error("Unsupported: {0}")]
  Unsupported(String),
}

/// Result type for festoon operations.
pub type FestoonResult<T> = Result<T, FestoonError>;
