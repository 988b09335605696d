/*! Startup configuration.

Defaults reproduce the stock look. A JSON file named by `FESTOON_CONFIG`
overrides any subset of fields.
*/

use std::path::Path;

use serde::Deserialize;

use crate::types::{FestoonError, FestoonResult};

/// Environment variable naming an optional JSON config file.
pub const CONFIG_ENV: &str = "FESTOON_CONFIG";

/// Environment switches that disable the overlay entirely.
const DISABLE_ENV: [&str; 2] = ["FESTOON_DISABLE", "XCODE_RUNNING_FOR_PREVIEWS"];

/// Tunables for tracking and rendering.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Render cadence.
  pub frames_per_second: u32,
  /// Points between bulbs; the lamp count is `floor(width / spacing)`.
  pub lamp_spacing: f32,
  /// Seconds between lit/unlit alternations.
  pub blink_interval: f32,
  /// Bulb scale handed to the shader.
  pub bulb_scale: f32,
  /// Windows this narrow or narrower are never tracked.
  pub min_window_width: f64,
  /// Shorter windows are never tracked.
  pub min_window_height: f64,
  /// Owner names that, when frontmost, suppress a whole frame.
  pub screen_capture_owners: Vec<String>,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      frames_per_second: 120,
      lamp_spacing: 30.0,
      blink_interval: 1.5,
      bulb_scale: 1.5,
      min_window_width: 50.0,
      min_window_height: 1.0,
      screen_capture_owners: vec!["Screenshot".to_string(), "screencaptureui".to_string()],
    }
  }
}

impl Config {
  /// Load from `FESTOON_CONFIG` when set, defaults otherwise.
  pub fn load() -> FestoonResult<Self> {
    match std::env::var_os(CONFIG_ENV) {
      Some(path) => Self::from_path(Path::new(&path)),
      None => Ok(Self::default()),
    }
  }

  pub fn from_path(path: &Path) -> FestoonResult<Self> {
    let text = std::fs::read_to_string(path)
      .map_err(|e| FestoonError::Config(format!("{}: {e}", path.display())))?;
    Self::from_json(&text)
  }

  pub fn from_json(text: &str) -> FestoonResult<Self> {
    let config: Self =
      serde_json::from_str(text).map_err(|e| FestoonError::Config(e.to_string()))?;
    config.validate()?;
    Ok(config)
  }

  fn validate(&self) -> FestoonResult<()> {
    if self.frames_per_second == 0 {
      return Err(FestoonError::Config("frames_per_second must be positive".into()));
    }
    if self.lamp_spacing <= 0.0 || !self.lamp_spacing.is_finite() {
      return Err(FestoonError::Config("lamp_spacing must be positive".into()));
    }
    if self.blink_interval <= 0.0 || !self.blink_interval.is_finite() {
      return Err(FestoonError::Config("blink_interval must be positive".into()));
    }
    Ok(())
  }

  /// Seconds per frame.
  #[allow(clippy::cast_precision_loss)]
  pub fn frame_interval(&self) -> f32 {
    1.0 / self.frames_per_second.max(1) as f32
  }

  /// Whether the process environment asks for the overlay to stay off.
  pub fn disabled_by_env() -> bool {
    DISABLE_ENV
      .iter()
      .any(|key| std::env::var(key).is_ok_and(|v| v == "1"))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn partial_json_keeps_defaults() {
    let config = Config::from_json(r#"{ "frames_per_second": 60 }"#).unwrap();
    assert_eq!(config.frames_per_second, 60);
    assert_eq!(config.lamp_spacing, 30.0);
    assert_eq!(config.screen_capture_owners, Config::default().screen_capture_owners);
  }

  #[test]
  fn empty_object_is_default() {
    assert_eq!(Config::from_json("{}").unwrap(), Config::default());
  }

  #[test]
  fn zero_fps_is_rejected() {
    let err = Config::from_json(r#"{ "frames_per_second": 0 }"#).unwrap_err();
    assert!(matches!(err, FestoonError::Config(_)));
  }

  #[test]
  fn malformed_json_is_config_error() {
    assert!(matches!(
      Config::from_json("{ not json"),
      Err(FestoonError::Config(_))
    ));
  }

  #[test]
  fn missing_file_is_config_error() {
    let err = Config::from_path(Path::new("/nonexistent/festoon.json")).unwrap_err();
    assert!(matches!(err, FestoonError::Config(_)));
  }

  #[test]
  fn frame_interval_matches_cadence() {
    let config = Config::default();
    assert!((config.frame_interval() - 1.0 / 120.0).abs() < 1e-7);
  }
}
