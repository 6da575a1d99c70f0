//! Configuration type definitions

use serde::{Deserialize, Serialize};

use crate::mapping::ScreenSize;

/// Target screen
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenConfig {
    /// Screen width in pixels
    #[serde(default = "default_screen_width")]
    pub width: u32,

    /// Screen height in pixels
    #[serde(default = "default_screen_height")]
    pub height: u32,
}

fn default_screen_width() -> u32 {
    1080
}
fn default_screen_height() -> u32 {
    2400
}

impl ScreenConfig {
    /// Screen size in the mapper's units
    pub fn size(&self) -> ScreenSize {
        ScreenSize::new(self.width as f32, self.height as f32)
    }
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            width: default_screen_width(),
            height: default_screen_height(),
        }
    }
}

/// Landmark tracking options
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackingConfig {
    /// Drive the cursor and blink detection from the primary eye only.
    /// Distance and position effects still use both eyes.
    #[serde(default)]
    pub use_one_eye: bool,
}

/// Position mapper tuning. Effects of 0 and multipliers of 0 disable the
/// corresponding amplification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingConfig {
    /// Horizontal range amplification strength
    #[serde(default)]
    pub eye_position_x_effect: f32,

    /// Scale applied to the horizontal effect
    #[serde(default = "default_multiplier")]
    pub eye_position_x_multiplier: f32,

    /// Vertical range amplification strength
    #[serde(default)]
    pub eye_position_y_effect: f32,

    /// Scale applied to the vertical effect
    #[serde(default = "default_multiplier")]
    pub eye_position_y_multiplier: f32,

    /// Horizontal amplification per unit of distance proxy
    #[serde(default)]
    pub distance_x_multiplier: f32,

    /// Vertical amplification per unit of distance proxy
    #[serde(default)]
    pub distance_y_multiplier: f32,

    /// Overall horizontal movement scale
    #[serde(default = "default_multiplier")]
    pub x_movement_multiplier: f32,

    /// Overall vertical movement scale
    #[serde(default = "default_multiplier")]
    pub y_movement_multiplier: f32,
}

fn default_multiplier() -> f32 {
    1.0
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            eye_position_x_effect: 0.0,
            eye_position_x_multiplier: default_multiplier(),
            eye_position_y_effect: 0.0,
            eye_position_y_multiplier: default_multiplier(),
            distance_x_multiplier: 0.0,
            distance_y_multiplier: 0.0,
            x_movement_multiplier: default_multiplier(),
            y_movement_multiplier: default_multiplier(),
        }
    }
}

/// Blink gesture detector sensitivity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Tap sensitivity: openness must drop below `1 - blink_threshold` and the
    /// closing acceleration must exceed it (0.01-1.0)
    #[serde(default = "default_blink_threshold")]
    pub blink_threshold: f32,

    /// Acceleration jump that starts a half-blink drag (0.01-1.0)
    #[serde(default = "default_half_blink_accel_threshold")]
    pub half_blink_accel_threshold: f32,

    /// Click delay in milliseconds (0-1000). Carried for settings
    /// compatibility; the tap cooldown itself is fixed.
    #[serde(default = "default_click_delay_ms")]
    pub click_delay_ms: u64,
}

fn default_blink_threshold() -> f32 {
    0.3
}
fn default_half_blink_accel_threshold() -> f32 {
    0.15
}
fn default_click_delay_ms() -> u64 {
    200
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            blink_threshold: default_blink_threshold(),
            half_blink_accel_threshold: default_half_blink_accel_threshold(),
            click_delay_ms: default_click_delay_ms(),
        }
    }
}

/// Cursor dispatch behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CursorConfig {
    /// Exponential smoothing factor (0.0-1.0, higher = smoother/slower)
    #[serde(default = "default_smoothing_factor")]
    pub smoothing_factor: f32,

    /// Minimum milliseconds between pointer updates (8-100)
    #[serde(default = "default_update_interval_ms")]
    pub update_interval_ms: u64,

    /// Stroke duration of a plain pointer move
    #[serde(default = "default_move_stroke_ms")]
    pub move_stroke_ms: u64,

    /// Stroke duration of a move while dragging
    #[serde(default = "default_drag_stroke_ms")]
    pub drag_stroke_ms: u64,

    /// Stroke duration of a tap
    #[serde(default = "default_tap_stroke_ms")]
    pub tap_stroke_ms: u64,
}

fn default_smoothing_factor() -> f32 {
    0.7
}
fn default_update_interval_ms() -> u64 {
    16
}
fn default_move_stroke_ms() -> u64 {
    1
}
fn default_drag_stroke_ms() -> u64 {
    16
}
fn default_tap_stroke_ms() -> u64 {
    50
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            smoothing_factor: default_smoothing_factor(),
            update_interval_ms: default_update_interval_ms(),
            move_stroke_ms: default_move_stroke_ms(),
            drag_stroke_ms: default_drag_stroke_ms(),
            tap_stroke_ms: default_tap_stroke_ms(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level for this crate ("trace", "debug", "info", "warn", "error")
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format ("pretty", "compact", "json")
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}
