//! Configuration management
//!
//! Handles loading, validation, clamping and live reloading of configuration
//! from:
//! - TOML files
//! - CLI arguments
//!
//! The pipeline never caches configuration: every frame reads a fresh
//! snapshot from [`SharedConfig`], so edits apply on the next frame.

use anyhow::{Context, Result};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

pub mod types;

pub use types::{
    CursorConfig, DetectorConfig, LoggingConfig, MappingConfig, ScreenConfig, TrackingConfig,
};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Target screen
    #[serde(default)]
    pub screen: ScreenConfig,
    /// Landmark tracking
    #[serde(default)]
    pub tracking: TrackingConfig,
    /// Position mapping
    #[serde(default)]
    pub mapping: MappingConfig,
    /// Blink gesture detection
    #[serde(default)]
    pub detector: DetectorConfig,
    /// Cursor dispatch
    #[serde(default)]
    pub cursor: CursorConfig,
    /// Logging
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&content)
    }

    /// Parse, clamp and validate a TOML document
    pub fn from_toml(content: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(content).context("Failed to parse config file")?;

        config.sanitize();
        config.validate()?;
        Ok(config)
    }

    /// Clamp tunables into the ranges the settings layer allows
    pub fn sanitize(&mut self) {
        let d = &mut self.detector;
        d.blink_threshold = d.blink_threshold.clamp(0.01, 1.0);
        d.half_blink_accel_threshold = d.half_blink_accel_threshold.clamp(0.01, 1.0);
        d.click_delay_ms = d.click_delay_ms.min(1000);

        let c = &mut self.cursor;
        c.smoothing_factor = c.smoothing_factor.clamp(0.0, 1.0);
        c.update_interval_ms = c.update_interval_ms.clamp(8, 100);
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.screen.width == 0 || self.screen.height == 0 {
            anyhow::bail!(
                "Invalid screen size: {}x{}",
                self.screen.width,
                self.screen.height
            );
        }

        let m = &self.mapping;
        let mapping_values = [
            m.eye_position_x_effect,
            m.eye_position_x_multiplier,
            m.eye_position_y_effect,
            m.eye_position_y_multiplier,
            m.distance_x_multiplier,
            m.distance_y_multiplier,
            m.x_movement_multiplier,
            m.y_movement_multiplier,
        ];
        if mapping_values.iter().any(|v| !v.is_finite()) {
            anyhow::bail!("Mapping config contains a non-finite value: {:?}", m);
        }

        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!("Invalid log level: {}", self.logging.level),
        }

        match self.logging.format.as_str() {
            "pretty" | "compact" | "json" => {}
            _ => anyhow::bail!("Invalid log format: {}", self.logging.format),
        }

        Ok(())
    }

    /// Override config with CLI arguments
    pub fn with_overrides(
        mut self,
        width: Option<u32>,
        height: Option<u32>,
        use_one_eye: bool,
    ) -> Self {
        if let Some(width) = width {
            self.screen.width = width;
        }
        if let Some(height) = height {
            self.screen.height = height;
        }
        if use_one_eye {
            self.tracking.use_one_eye = true;
        }

        self
    }
}

/// Configuration shared between the frame producer, the actuation thread and
/// whoever edits settings
#[derive(Debug, Clone, Default)]
pub struct SharedConfig {
    inner: Arc<RwLock<Config>>,
}

impl SharedConfig {
    /// Share a configuration
    pub fn new(config: Config) -> Self {
        Self {
            inner: Arc::new(RwLock::new(config)),
        }
    }

    /// Copy of the current configuration
    pub fn snapshot(&self) -> Config {
        self.inner.read().clone()
    }

    /// Read one section without cloning the rest
    pub fn read<T>(&self, f: impl FnOnce(&Config) -> T) -> T {
        f(&self.inner.read())
    }

    /// Edit in place; the result is clamped before other readers see it
    pub fn update(&self, f: impl FnOnce(&mut Config)) {
        let mut guard = self.inner.write();
        f(&mut guard);
        guard.sanitize();
        debug!("Configuration updated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.detector.blink_threshold, 0.3);
        assert_eq!(config.detector.half_blink_accel_threshold, 0.15);
        assert_eq!(config.cursor.update_interval_ms, 16);
        assert_eq!(config.cursor.smoothing_factor, 0.7);
        assert_eq!(config.mapping.x_movement_multiplier, 1.0);
        assert!(!config.tracking.use_one_eye);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = Config::from_toml(
            r#"
            [mapping]
            distance_x_multiplier = 2.0

            [tracking]
            use_one_eye = true
            "#,
        )
        .unwrap();
        assert_eq!(config.mapping.distance_x_multiplier, 2.0);
        assert_eq!(config.mapping.eye_position_x_multiplier, 1.0);
        assert!(config.tracking.use_one_eye);
        assert_eq!(config.screen.width, 1080);
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let config = Config::from_toml(
            r#"
            [detector]
            blink_threshold = 4.0
            half_blink_accel_threshold = 0.0
            click_delay_ms = 5000

            [cursor]
            smoothing_factor = -1.0
            update_interval_ms = 1
            "#,
        )
        .unwrap();
        assert_eq!(config.detector.blink_threshold, 1.0);
        assert_eq!(config.detector.half_blink_accel_threshold, 0.01);
        assert_eq!(config.detector.click_delay_ms, 1000);
        assert_eq!(config.cursor.smoothing_factor, 0.0);
        assert_eq!(config.cursor.update_interval_ms, 8);
    }

    #[test]
    fn test_config_validation_zero_screen() {
        let mut config = Config::default();
        config.screen.width = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_invalid_log_format() {
        let mut config = Config::default();
        config.logging.format = "xml".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[screen]\nwidth = 1920\nheight = 1080").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.screen.width, 1920);
        assert_eq!(config.screen.height, 1080);
    }

    #[test]
    fn test_load_missing_file_fails() {
        assert!(Config::load("/nonexistent/gaze-pointer.toml").is_err());
    }

    #[test]
    fn test_overrides() {
        let config = Config::default().with_overrides(Some(800), None, true);
        assert_eq!(config.screen.width, 800);
        assert_eq!(config.screen.height, 2400);
        assert!(config.tracking.use_one_eye);
    }

    #[test]
    fn test_shared_config_update_is_visible_and_clamped() {
        let shared = SharedConfig::new(Config::default());
        let reader = shared.clone();

        shared.update(|c| c.detector.blink_threshold = 0.0);
        assert_eq!(reader.read(|c| c.detector.blink_threshold), 0.01);
        assert_eq!(reader.snapshot().detector.blink_threshold, 0.01);
    }
}
